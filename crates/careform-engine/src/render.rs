//! Question tree layout.
//!
//! Walks a question tree against the current responses and errors and
//! produces a render plan: groups become containers, leaves become typed
//! controls with their current answer and inline errors. Disabled
//! questions, and the whole subtree of a disabled group, are left out.
//!
//! Every node is keyed by its question `id`, never by position, so a
//! front end can keep focus and scroll state while siblings appear and
//! disappear.

use serde::Serialize;

use careform_core::models::question::{
    AnswerOption, Question, QuestionType, StructuredQuestionType, StylingMetadata,
};
use careform_core::models::response::{
    QuestionValidationError, QuestionnaireResponse, ResponseValue,
};

use crate::enablement::is_enabled;
use crate::reconcile::response_for;

/// The input control for a leaf question.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum Control<'a> {
    Toggle,
    Decimal,
    Integer,
    Date,
    DateTime,
    Time,
    SingleLine,
    MultiLine,
    Url,
    Choice {
        options: &'a [AnswerOption],
        value_set: Option<&'a str>,
        multiple: bool,
    },
    Quantity {
        units: &'a [AnswerOption],
    },
    Structured {
        kind: StructuredQuestionType,
    },
}

impl<'a> Control<'a> {
    /// `None` for groups, and for structured questions missing their
    /// `structured_type`.
    pub fn for_question(question: &'a Question) -> Option<Self> {
        let control = match question.kind {
            QuestionType::Group => return None,
            QuestionType::Boolean => Control::Toggle,
            QuestionType::Decimal => Control::Decimal,
            QuestionType::Integer => Control::Integer,
            QuestionType::Date => Control::Date,
            QuestionType::DateTime => Control::DateTime,
            QuestionType::Time => Control::Time,
            QuestionType::String => Control::SingleLine,
            QuestionType::Text => Control::MultiLine,
            QuestionType::Url => Control::Url,
            QuestionType::Choice => Control::Choice {
                options: &question.answer_option,
                value_set: question.answer_value_set.as_deref(),
                multiple: question.repeats,
            },
            QuestionType::Quantity => Control::Quantity {
                units: &question.answer_option,
            },
            QuestionType::Structured => Control::Structured {
                kind: question.structured_type?,
            },
        };
        Some(control)
    }
}

/// Which optional metadata inputs accompany a leaf.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollectFlags {
    pub time: bool,
    pub performer: bool,
    pub body_site: bool,
    pub method: bool,
}

impl CollectFlags {
    fn of(question: &Question) -> Self {
        Self {
            time: question.collect_time,
            performer: question.collect_performer,
            body_site: question.collect_body_site,
            method: question.collect_method,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupNode<'a> {
    pub key: &'a str,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styling: Option<&'a StylingMetadata>,
    pub children: Vec<RenderNode<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldNode<'a> {
    pub key: &'a str,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub control: Control<'a>,
    pub required: bool,
    pub read_only: bool,
    pub collect: CollectFlags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styling: Option<&'a StylingMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<&'a QuestionnaireResponse>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<&'a str>,
    #[serde(skip)]
    pub question: &'a Question,
}

impl FieldNode<'_> {
    /// Build the updated response for a change to this field. Metadata
    /// already captured (note, time, body site, method) is carried over.
    pub fn answer(&self, values: Vec<ResponseValue>) -> QuestionnaireResponse {
        match self.response {
            Some(existing) => QuestionnaireResponse {
                values,
                ..existing.clone()
            },
            None => QuestionnaireResponse::new(&self.question.id, &self.question.link_id, values),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum RenderNode<'a> {
    Group(GroupNode<'a>),
    Field(FieldNode<'a>),
}

impl<'a> RenderNode<'a> {
    pub fn key(&self) -> &'a str {
        match self {
            RenderNode::Group(g) => g.key,
            RenderNode::Field(f) => f.key,
        }
    }
}

/// Lay out `questions` against the current responses and errors.
pub fn render_tree<'a>(
    questions: &'a [Question],
    responses: &'a [QuestionnaireResponse],
    errors: &'a [QuestionValidationError],
) -> Vec<RenderNode<'a>> {
    questions
        .iter()
        .filter(|q| is_enabled(q, responses))
        .filter_map(|q| render_question(q, responses, errors))
        .collect()
}

fn render_question<'a>(
    question: &'a Question,
    responses: &'a [QuestionnaireResponse],
    errors: &'a [QuestionValidationError],
) -> Option<RenderNode<'a>> {
    if question.is_group() {
        return Some(RenderNode::Group(GroupNode {
            key: &question.id,
            text: &question.text,
            styling: question.styling_metadata.as_ref(),
            children: render_tree(&question.questions, responses, errors),
        }));
    }

    let Some(control) = Control::for_question(question) else {
        tracing::warn!(question_id = %question.id, "structured question without structured_type, skipping");
        return None;
    };

    Some(RenderNode::Field(FieldNode {
        key: &question.id,
        text: &question.text,
        description: question.description.as_deref(),
        control,
        required: question.required,
        read_only: question.read_only,
        collect: CollectFlags::of(question),
        styling: question.styling_metadata.as_ref(),
        response: response_for(responses, &question.id),
        errors: errors
            .iter()
            .filter(|e| e.question_id == question.id)
            .map(|e| e.error.as_str())
            .collect(),
        question,
    }))
}

/// Depth-first search of a render plan by key.
pub fn find_node<'n, 'a>(nodes: &'n [RenderNode<'a>], key: &str) -> Option<&'n RenderNode<'a>> {
    for node in nodes {
        if node.key() == key {
            return Some(node);
        }
        if let RenderNode::Group(group) = node
            && let Some(found) = find_node(&group.children, key)
        {
            return Some(found);
        }
    }
    None
}

/// Every field in the plan, in document order.
pub fn fields<'n, 'a>(nodes: &'n [RenderNode<'a>]) -> Vec<&'n FieldNode<'a>> {
    let mut out = Vec::new();
    collect_fields(nodes, &mut out);
    out
}

fn collect_fields<'n, 'a>(nodes: &'n [RenderNode<'a>], out: &mut Vec<&'n FieldNode<'a>>) {
    for node in nodes {
        match node {
            RenderNode::Group(group) => collect_fields(&group.children, out),
            RenderNode::Field(field) => out.push(field),
        }
    }
}
