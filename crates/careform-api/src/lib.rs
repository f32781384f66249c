//! careform-api
//!
//! Talks to the questionnaire API: fetching questionnaires, building the
//! batch submission payload, sending it, and routing the reply back to
//! the forms that produced it.

pub mod client;
pub mod demux;
pub mod error;
pub mod notify;
pub mod payload;
pub mod submit;
pub mod transport;
