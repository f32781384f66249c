use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("duplicate question id: {0}")]
    DuplicateQuestionId(String),

    #[error("duplicate link id: {0}")]
    DuplicateLinkId(String),

    #[error("question {0} is not a group but declares child questions")]
    ChildrenOnLeaf(String),

    #[error("structured question {0} has no structured_type")]
    MissingStructuredType(String),

    #[error("more than one response for question {0}")]
    DuplicateResponse(String),
}
