//! Test infrastructure for the mediator.
//!
//! Provides a recording mock transport, an identity adapter that renders
//! filters back in canonical syntax, and provider response fixtures.

#![allow(dead_code)]

pub mod adapters;
pub mod fixtures;
pub mod transport;

pub use adapters::*;
pub use fixtures::*;
pub use transport::*;
