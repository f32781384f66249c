//! careform-core
//!
//! Pure domain types and API path conventions. No network dependency.
//! This is the shared vocabulary of the questionnaire engine: question
//! trees, flat response records, validation errors and the batch
//! submission wire format.

pub mod error;
pub mod models;
pub mod paths;
