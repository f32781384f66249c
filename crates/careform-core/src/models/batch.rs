//! Wire format of the batch submission endpoint.
//!
//! A batch carries one sub-request per questionnaire. Results come back
//! positionally aligned with the request array; there is no correlation id.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::question::Coding;
use super::response::QuestionValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum HttpMethod {
    Post,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BatchRequest {
    pub requests: Vec<BatchSubRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BatchSubRequest {
    pub url: String,
    pub method: HttpMethod,
    pub body: SubmitBody,
}

/// Body of a single questionnaire submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitBody {
    pub resource_id: Uuid,
    pub encounter: Option<Uuid>,
    pub results: Vec<SubmitResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitResult {
    pub question_id: String,
    pub values: Vec<SubmitValue>,
    pub note: Option<String>,
    pub taken_at: Option<jiff::Timestamp>,
    pub body_site: Option<Coding>,
    pub method: Option<Coding>,
}

/// Submitted answers are either coded or stringified scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum SubmitValue {
    Coded { code: Coding },
    Value { value: String },
}

/// Successful batch reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BatchResponse {
    pub results: Vec<BatchSubmissionResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BatchSubmissionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Rejected batch reply: one entry per sub-request, index-aligned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BatchErrorEnvelope {
    pub results: Vec<ValidationErrorResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ValidationErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub data: Option<ValidationErrorData>,
}

impl ValidationErrorResponse {
    pub fn errors(&self) -> &[ReportedError] {
        self.data.as_ref().map(|d| d.errors.as_slice()).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ValidationErrorData {
    #[serde(default)]
    pub errors: Vec<ReportedError>,
}

/// Field-path style error (`loc` + `msg`), not tied to a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DetailedValidationError {
    pub loc: Vec<serde_json::Value>,
    pub msg: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl DetailedValidationError {
    /// The leading `loc` segment, rendered as text.
    pub fn field(&self) -> Option<String> {
        self.loc.first().map(|segment| match segment {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// Inline text for a question error that came without a message.
pub const FALLBACK_QUESTION_ERROR: &str = "Invalid answer";

/// One error reported for a sub-request.
///
/// Anything carrying a string `question_id` is a question error, whatever
/// else it holds; its text is `error`, else `msg`. Otherwise a `loc` +
/// `msg` entry is a detailed error, and the rest is kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum ReportedError {
    Question(QuestionValidationError),
    Detailed(DetailedValidationError),
    Other(serde_json::Value),
}

impl<'de> Deserialize<'de> for ReportedError {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;

        if let Some(question_id) = raw.get("question_id").and_then(|v| v.as_str()) {
            let error = ["error", "msg"]
                .iter()
                .find_map(|key| raw.get(*key).and_then(|v| v.as_str()))
                .unwrap_or(FALLBACK_QUESTION_ERROR);
            return Ok(ReportedError::Question(QuestionValidationError {
                question_id: question_id.to_string(),
                error: error.to_string(),
            }));
        }

        match serde_json::from_value::<DetailedValidationError>(raw.clone()) {
            Ok(detailed) => Ok(ReportedError::Detailed(detailed)),
            Err(_) => Ok(ReportedError::Other(raw)),
        }
    }
}
