//! Text search orchestration tests.

mod common;

use std::sync::Arc;

use serde_json::{Value, json};

use ac_mediator::error::{AuthError, FilterParsingError, TransportError};
use ac_mediator::registry::FieldRegistry;
use ac_mediator::transport::AuthScheme;
use ac_mediator::{
    CommonSearchParams, Mediator, MediatorError, StaticCredentials, TextSearchRequest,
};

use common::{
    IdentityAdapter, MockReply, MockTransport, SortSupport, identity_response, identity_result,
};

fn mediator(transport: &Arc<MockTransport>) -> Mediator {
    Mediator::new(transport.clone(), Arc::new(StaticCredentials::new()))
}

fn fields(names: &[&str]) -> CommonSearchParams {
    CommonSearchParams::default().with_fields(names.iter().copied())
}

// ============================================================================
// Query parameters
// ============================================================================

#[tokio::test]
async fn test_full_request_parameters() {
    let transport = Arc::new(MockTransport::json(identity_response(vec![])));
    let adapter = IdentityAdapter::new();
    let request = TextSearchRequest::new("dogs")
        .with_filter("format:wav AND duration:[1,5]")
        .with_sort("-duration")
        .with_common(CommonSearchParams::default().with_size(20).with_page(3));

    let envelope = mediator(&transport)
        .text_search(&adapter, &request)
        .await
        .unwrap();

    assert!(envelope.warnings.is_empty(), "{:?}", envelope.warnings);

    let sent = transport.single_request();
    assert_eq!(sent.endpoint, "https://identity.example/search");
    assert_eq!(sent.params["q"], "dogs");
    assert_eq!(sent.params["f"], "format:\"wav\" AND duration:[1,5]");
    assert_eq!(sent.params["sort"], "-duration");
    assert_eq!(sent.params["size"], "20");
    assert_eq!(sent.params["page"], "3");
    assert!(sent.auth.is_empty());
}

#[tokio::test]
async fn test_extra_params_do_not_override() {
    let transport = Arc::new(MockTransport::json(identity_response(vec![])));

    mediator(&transport)
        .text_search(&IdentityAdapter::new(), &TextSearchRequest::new("rain"))
        .await
        .unwrap();

    let sent = transport.single_request();
    assert_eq!(sent.params["q"], "rain");
    assert_eq!(sent.params["format"], "json");
    assert_eq!(sent.params["size"], "15");
    assert!(!sent.params.contains_key("page"));
}

#[tokio::test]
async fn test_unsupported_parameters_become_warnings() {
    let transport = Arc::new(MockTransport::json(identity_response(vec![])));
    let adapter = IdentityAdapter::new()
        .without_filtering()
        .without_paging()
        .with_sorting(SortSupport::Absent);
    let request = TextSearchRequest::new("x")
        .with_filter("format:wav")
        .with_sort("duration")
        .with_common(CommonSearchParams::default().with_page(2));

    let envelope = mediator(&transport)
        .text_search(&adapter, &request)
        .await
        .unwrap();

    assert_eq!(
        envelope.warnings,
        vec![
            "Parameter 'f' not supported",
            "Parameter 's' not supported",
            "Parameter 'size' not supported",
            "Parameter 'page' not supported",
        ]
    );
    let sent = transport.single_request();
    assert!(!sent.params.contains_key("f"));
    assert!(!sent.params.contains_key("sort"));
}

#[tokio::test]
async fn test_unknown_sort_option_is_a_warning() {
    let transport = Arc::new(MockTransport::json(identity_response(vec![])));

    let envelope = mediator(&transport)
        .text_search(
            &IdentityAdapter::new(),
            &TextSearchRequest::new("x").with_sort("-loudness"),
        )
        .await
        .unwrap();

    assert_eq!(
        envelope.warnings,
        vec!["sorting criteria '-loudness' not supported"]
    );
    assert!(!transport.single_request().params.contains_key("sort"));
}

#[tokio::test]
async fn test_not_implemented_sorting_is_a_warning() {
    let transport = Arc::new(MockTransport::json(identity_response(vec![])));
    let adapter = IdentityAdapter::new().with_sorting(SortSupport::NotImplemented);

    let envelope = mediator(&transport)
        .text_search(&adapter, &TextSearchRequest::new("x").with_sort("created"))
        .await
        .unwrap();

    assert_eq!(envelope.warnings, vec!["Parameter 's' not supported"]);
}

// ============================================================================
// Fatal errors
// ============================================================================

#[tokio::test]
async fn test_filter_errors_abort_before_sending() {
    let transport = Arc::new(MockTransport::json(identity_response(vec![])));

    let result = mediator(&transport)
        .text_search(
            &IdentityAdapter::new(),
            &TextSearchRequest::new("x").with_filter("format:wav AND"),
        )
        .await;

    assert!(matches!(
        result,
        Err(MediatorError::FilterParsing(FilterParsingError::Syntax { .. }))
    ));
    assert!(transport.requests().is_empty());

    let result = mediator(&transport)
        .text_search(
            &IdentityAdapter::new(),
            &TextSearchRequest::new("x").with_filter("loudness:[1,2]"),
        )
        .await;
    assert!(matches!(result, Err(MediatorError::FilterTranslate(_))));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_transport_errors_propagate() {
    let transport = Arc::new(MockTransport::new(MockReply::Status(
        503,
        "maintenance".to_string(),
    )));
    let result = mediator(&transport)
        .text_search(&IdentityAdapter::new(), &TextSearchRequest::new("x"))
        .await;
    match result {
        Err(MediatorError::Transport(TransportError::Status { status, message, .. })) => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("Expected transport status error, got {:?}", other),
    }

    let transport = Arc::new(MockTransport::new(MockReply::Timeout));
    let result = mediator(&transport)
        .text_search(&IdentityAdapter::new(), &TextSearchRequest::new("x"))
        .await;
    assert!(matches!(
        result,
        Err(MediatorError::Transport(TransportError::Timeout { .. }))
    ));
}

#[tokio::test]
async fn test_missing_credentials_propagate() {
    let transport = Arc::new(MockTransport::json(identity_response(vec![])));
    let adapter = IdentityAdapter::new().with_auth(AuthScheme::ApiKey { param: "key" });

    let result = mediator(&transport)
        .text_search(&adapter, &TextSearchRequest::new("x"))
        .await;

    assert!(matches!(
        result,
        Err(MediatorError::Auth(AuthError::MissingCredentials { .. }))
    ));
    assert!(transport.requests().is_empty());

    let credentials = StaticCredentials::new().with_api_key("Identity", "s3cret");
    let mediator = Mediator::new(transport.clone(), Arc::new(credentials));
    mediator
        .text_search(&adapter, &TextSearchRequest::new("x"))
        .await
        .unwrap();
    assert_eq!(transport.single_request().auth.query["key"], "s3cret");
}

#[tokio::test]
async fn test_unexpected_response_shape() {
    let transport = Arc::new(MockTransport::json(json!({"detail": "nope"})));
    let result = mediator(&transport)
        .text_search(&IdentityAdapter::new(), &TextSearchRequest::new("x"))
        .await;
    assert!(matches!(
        result,
        Err(MediatorError::UnexpectedResponse { .. })
    ));
}

// ============================================================================
// Response translation
// ============================================================================

#[tokio::test]
async fn test_requested_fields_are_returned() {
    let transport = Arc::new(MockTransport::json(identity_response(vec![
        identity_result("1"),
        identity_result("2"),
    ])));
    let request =
        TextSearchRequest::new("x").with_common(fields(&["id", "name", "duration"]));

    let envelope = mediator(&transport)
        .text_search(&IdentityAdapter::new(), &request)
        .await
        .unwrap();

    assert_eq!(envelope.total_result_count, 2);
    assert_eq!(envelope.results.len(), 2);
    assert_eq!(envelope.results[0]["id"], "Identity:1");
    assert_eq!(envelope.results[1]["name"], "sound 2");
    assert_eq!(envelope.results[1]["duration"], 1.5);
    assert!(envelope.warnings.is_empty());
}

#[tokio::test]
async fn test_no_requested_fields_gives_empty_objects() {
    let transport = Arc::new(MockTransport::json(identity_response(vec![
        identity_result("1"),
    ])));

    let envelope = mediator(&transport)
        .text_search(&IdentityAdapter::new(), &TextSearchRequest::new("x"))
        .await
        .unwrap();

    assert_eq!(envelope.results.len(), 1);
    assert!(envelope.results[0].is_empty());
}

#[tokio::test]
async fn test_one_failing_field_out_of_three() {
    let transport = Arc::new(MockTransport::json(identity_response(vec![
        identity_result("1"),
    ])));
    let adapter = IdentityAdapter::new().with_fields(
        FieldRegistry::builder()
            .direct("name", "name")
            .direct("format", "format")
            .translator("license", |_: &Value| Err("license service unavailable".into()))
            .build(),
    );
    let request =
        TextSearchRequest::new("x").with_common(fields(&["name", "license", "format"]));

    let envelope = mediator(&transport)
        .text_search(&adapter, &request)
        .await
        .unwrap();

    let result = &envelope.results[0];
    assert_eq!(result.len(), 2);
    assert_eq!(result["name"], "sound 1");
    assert_eq!(result["format"], "wav");
    assert!(!result.contains_key("license"));
    assert_eq!(
        envelope.warnings,
        vec!["Can't return unsupported field license"]
    );
}

#[tokio::test]
async fn test_request_warnings_come_before_response_warnings() {
    let transport = Arc::new(MockTransport::json(identity_response(vec![
        identity_result("1"),
        identity_result("2"),
    ])));
    let adapter = IdentityAdapter::new().without_filtering();
    let request = TextSearchRequest::new("x")
        .with_filter("format:wav")
        .with_common(fields(&["name", "bitdepth"]));

    let envelope = mediator(&transport)
        .text_search(&adapter, &request)
        .await
        .unwrap();

    assert_eq!(
        envelope.warnings,
        vec![
            "Parameter 'f' not supported",
            "Can't return unsupported field bitdepth",
        ]
    );
    assert!(envelope.results.iter().all(|r| r.len() == 1));
}
