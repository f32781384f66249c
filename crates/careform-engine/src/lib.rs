//! careform-engine
//!
//! Questionnaire evaluation. Pure logic, no network dependency: decides
//! which questions are enabled, reconciles edits into the flat response
//! list, lays out the question tree for rendering, and tracks the set of
//! questionnaires being answered together in one session.

pub mod enablement;
pub mod error;
pub mod navigation;
pub mod picker;
pub mod reconcile;
pub mod render;
pub mod required;
pub mod session;
