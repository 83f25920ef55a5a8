//! Provider response fixtures, shaped like the real APIs.

use serde_json::{Value, json};

/// A Freesound `search/text/` response with two sounds.
pub fn freesound_response() -> Value {
    json!({
        "count": 2,
        "next": null,
        "previous": null,
        "results": [
            {
                "id": 1234,
                "url": "https://freesound.org/people/alice/sounds/1234/",
                "name": "dog bark.wav",
                "username": "alice",
                "license": "http://creativecommons.org/publicdomain/zero/1.0/",
                "tags": ["dog", "bark"],
                "duration": 2.31,
                "type": "wav",
                "previews": {
                    "preview-hq-ogg": "https://cdn.freesound.org/previews/1/1234-hq.ogg"
                },
                "images": {
                    "waveform_m": "https://cdn.freesound.org/displays/1/1234_wave_M.png"
                }
            },
            {
                "id": 5678,
                "url": "https://freesound.org/people/bob/sounds/5678/",
                "name": "rain",
                "username": "bob",
                "license": "http://creativecommons.org/licenses/by-nc/3.0/",
                "tags": ["rain"],
                "duration": 61.0,
                "type": "mp3"
            }
        ]
    })
}

/// A Europeana `search.json` response with one sound object.
pub fn europeana_response() -> Value {
    json!({
        "apikey": "api2demo",
        "success": true,
        "requestNumber": 999,
        "itemsCount": 1,
        "totalResults": 483,
        "items": [
            {
                "id": "/2059208/data_sounds_T483",
                "guid": "https://www.europeana.eu/item/2059208/data_sounds_T483",
                "title": ["Birdsong at dawn"],
                "dcCreator": ["Field recordist"],
                "rights": ["http://creativecommons.org/licenses/by-sa/3.0/"],
                "edmIsShownBy": ["https://sounds.example.org/T483.mp3"],
                "type": "SOUND"
            }
        ]
    })
}

/// A result keyed by canonical field names.
pub fn identity_result(id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("sound {}", id),
        "license": "CC0",
        "duration": 1.5,
        "format": "wav"
    })
}

/// An identity-adapter response wrapping `results`.
pub fn identity_response(results: Vec<Value>) -> Value {
    json!({
        "count": results.len(),
        "results": results
    })
}
