use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::question::Coding;
use crate::error::CoreError;

/// A scalar answer as it arrives from the form controls.
///
/// Equality is strict: `Number(1.0)` never equals `Text("1")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum ScalarValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ScalarValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(b) => write!(f, "{b}"),
            ScalarValue::Number(n) => write!(f, "{n}"),
            ScalarValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Number(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Number(value as f64)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Text(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Text(value)
    }
}

/// One entry of a response's `values`: either a coded answer or a scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum ResponseValue {
    Coded { code: Coding },
    /// `value` is `None` when the control sent `null` or nothing at all.
    Scalar {
        #[serde(default)]
        value: Option<ScalarValue>,
    },
}

impl ResponseValue {
    pub fn scalar(value: impl Into<ScalarValue>) -> Self {
        ResponseValue::Scalar {
            value: Some(value.into()),
        }
    }

    /// The scalar payload, `None` for coded and null answers.
    pub fn value(&self) -> Option<&ScalarValue> {
        match self {
            ResponseValue::Scalar { value } => value.as_ref(),
            ResponseValue::Coded { .. } => None,
        }
    }

    /// A scalar entry that carries no value.
    pub fn is_null(&self) -> bool {
        matches!(self, ResponseValue::Scalar { value: None })
    }
}

/// The answer to a single question. Flat: responses are keyed by
/// `question_id` and never nest, whatever the shape of the question tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionnaireResponse {
    pub question_id: String,
    pub link_id: String,
    #[serde(default)]
    pub values: Vec<ResponseValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taken_at: Option<jiff::Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_site: Option<Coding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<Coding>,
}

impl QuestionnaireResponse {
    pub fn new(
        question_id: impl Into<String>,
        link_id: impl Into<String>,
        values: Vec<ResponseValue>,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            link_id: link_id.into(),
            values,
            note: None,
            taken_at: None,
            body_site: None,
            method: None,
        }
    }

    pub fn first_value(&self) -> Option<&ResponseValue> {
        self.values.first()
    }
}

/// A validation failure attributed to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionValidationError {
    pub question_id: String,
    pub error: String,
}

/// Parse a JSON array of responses, rejecting more than one entry per
/// `question_id`.
pub fn parse_responses(json: &str) -> Result<Vec<QuestionnaireResponse>, CoreError> {
    let responses: Vec<QuestionnaireResponse> = serde_json::from_str(json)?;
    let mut seen = HashSet::new();
    for response in &responses {
        if !seen.insert(response.question_id.as_str()) {
            return Err(CoreError::DuplicateResponse(response.question_id.clone()));
        }
    }
    Ok(responses)
}
