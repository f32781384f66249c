pub mod batch;
pub mod question;
pub mod questionnaire;
pub mod response;
