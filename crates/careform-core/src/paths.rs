//! API path conventions.
//!
//! Pure string functions, relative to the API base URL. These define the
//! canonical endpoints the questionnaire engine talks to.

pub const QUESTIONNAIRE_LIST: &str = "/api/v1/questionnaire/";

pub const BATCH_REQUESTS: &str = "/api/v1/batch_requests/";

pub fn questionnaire_detail(slug: &str) -> String {
    format!("/api/v1/questionnaire/{slug}/")
}

pub fn questionnaire_submit(slug: &str) -> String {
    format!("/api/v1/questionnaire/{slug}/submit/")
}
