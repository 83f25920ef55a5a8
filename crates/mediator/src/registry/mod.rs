//! Translation registries built once per adapter.
//!
//! Both registries are read-only after [`build`](FieldRegistryBuilder::build)
//! and can be shared between threads without locking.

pub mod field;
pub mod filter;

pub use field::{FieldEntry, FieldRegistry, FieldRegistryBuilder, FieldTranslatorFn};
pub use filter::{FilterRegistry, FilterRegistryBuilder, FilterTranslatorFn};
