//! Infrastructure layer - external services and background tasks
//!
//! This layer contains:
//! - HTTP sources for the weather and dolar widgets
//! - Tokio runtime bridge driving the clock and the polling loops

pub mod runtime;
pub mod sources;
