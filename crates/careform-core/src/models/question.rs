use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::response::ScalarValue;

/// The closed set of question kinds.
///
/// `Group` carries no value of its own; it only holds child questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum QuestionType {
    Group,
    Boolean,
    Decimal,
    Integer,
    Date,
    DateTime,
    Time,
    String,
    Text,
    Url,
    Choice,
    Quantity,
    Structured,
}

/// Refines `QuestionType::Structured` into the clinical record it captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum StructuredQuestionType {
    AllergyIntolerance,
    MedicationRequest,
    MedicationStatement,
    Symptom,
    Diagnosis,
    Encounter,
    Appointment,
}

/// A coded concept (terminology system + code + display text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Coding {
    pub system: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// One permitted value of a `choice` question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnswerOption {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// Comparison applied by an `enable_when` condition.
///
/// Operators this build does not know deserialize as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EnableOperator {
    Exists,
    Equals,
    NotEquals,
    Greater,
    Less,
    GreaterOrEquals,
    LessOrEquals,
    #[serde(other)]
    Unknown,
}

/// A single enablement condition, referencing another question by `link_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EnableWhen {
    pub question: String,
    pub operator: EnableOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<ScalarValue>,
}

/// How multiple `enable_when` conditions combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EnableBehavior {
    #[default]
    All,
    Any,
}

/// Opaque CSS-class hints, passed through to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StylingMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_classes: Option<String>,
}

/// A node in a questionnaire's question tree.
///
/// `id` identifies the node; `link_id` is the business identifier that
/// `enable_when` conditions and responses refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Question {
    pub id: String,
    pub link_id: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Coding>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub repeats: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub collect_time: bool,
    #[serde(default)]
    pub collect_performer: bool,
    #[serde(default)]
    pub collect_body_site: bool,
    #[serde(default)]
    pub collect_method: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answer_option: Vec<AnswerOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_value_set: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enable_when: Vec<EnableWhen>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_behavior: Option<EnableBehavior>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_type: Option<StructuredQuestionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styling_metadata: Option<StylingMetadata>,
}

impl Question {
    /// A leaf question with every flag off.
    pub fn new(id: impl Into<String>, link_id: impl Into<String>, kind: QuestionType) -> Self {
        Self {
            id: id.into(),
            link_id: link_id.into(),
            kind,
            text: String::new(),
            description: None,
            code: None,
            required: false,
            repeats: false,
            read_only: false,
            collect_time: false,
            collect_performer: false,
            collect_body_site: false,
            collect_method: false,
            answer_option: Vec::new(),
            answer_value_set: None,
            enable_when: Vec::new(),
            enable_behavior: None,
            questions: Vec::new(),
            structured_type: None,
            styling_metadata: None,
        }
    }

    /// A group question wrapping `children`.
    pub fn group(id: impl Into<String>, link_id: impl Into<String>, children: Vec<Question>) -> Self {
        Self {
            questions: children,
            ..Self::new(id, link_id, QuestionType::Group)
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_enable_when(mut self, conditions: Vec<EnableWhen>, behavior: EnableBehavior) -> Self {
        self.enable_when = conditions;
        self.enable_behavior = Some(behavior);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn is_group(&self) -> bool {
        self.kind == QuestionType::Group
    }

    /// Effective combination rule; `All` when unset.
    pub fn behavior(&self) -> EnableBehavior {
        self.enable_behavior.unwrap_or_default()
    }
}
