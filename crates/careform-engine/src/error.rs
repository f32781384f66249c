use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("questionnaire not in session: {0}")]
    UnknownQuestionnaire(String),

    #[error("questionnaire {0} was part of the initial set and cannot be removed")]
    SeededQuestionnaire(String),

    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error("no responses to submit")]
    NothingToSubmit,
}
