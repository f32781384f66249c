use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::question::{Question, QuestionType};
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum QuestionnaireStatus {
    #[default]
    Active,
    Draft,
    Retired,
}

/// What a questionnaire's responses are recorded against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SubjectType {
    #[default]
    Patient,
    Encounter,
}

/// A named, versioned tree of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Questionnaire {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: QuestionnaireStatus,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub subject_type: SubjectType,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Questionnaire {
    pub fn new(id: impl Into<String>, slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            title: title.into(),
            description: None,
            status: QuestionnaireStatus::default(),
            version: "1.0".to_string(),
            subject_type: SubjectType::default(),
            questions: Vec::new(),
        }
    }

    pub fn with_questions(mut self, questions: Vec<Question>) -> Self {
        self.questions = questions;
        self
    }

    /// Depth-first lookup by question `id`.
    pub fn find_question(&self, id: &str) -> Option<&Question> {
        fn walk<'a>(questions: &'a [Question], id: &str) -> Option<&'a Question> {
            for q in questions {
                if q.id == id {
                    return Some(q);
                }
                if let Some(found) = walk(&q.questions, id) {
                    return Some(found);
                }
            }
            None
        }
        walk(&self.questions, id)
    }

    /// Check the structural rules the engine relies on: unique ids and
    /// link ids across the whole tree, children only under groups, and a
    /// `structured_type` on every structured question.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut ids = HashSet::new();
        let mut link_ids = HashSet::new();
        let mut stack: Vec<&Question> = self.questions.iter().collect();

        while let Some(q) = stack.pop() {
            if !ids.insert(q.id.as_str()) {
                return Err(CoreError::DuplicateQuestionId(q.id.clone()));
            }
            if !link_ids.insert(q.link_id.as_str()) {
                return Err(CoreError::DuplicateLinkId(q.link_id.clone()));
            }
            if !q.is_group() && !q.questions.is_empty() {
                return Err(CoreError::ChildrenOnLeaf(q.id.clone()));
            }
            if q.kind == QuestionType::Structured && q.structured_type.is_none() {
                return Err(CoreError::MissingStructuredType(q.id.clone()));
            }
            stack.extend(q.questions.iter());
        }
        Ok(())
    }
}
