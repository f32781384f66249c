//! Enablement evaluation.
//!
//! Decides whether a question is active given the current flat response
//! list. Stateless and total: missing responses make a condition fail,
//! they never raise.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use careform_core::models::question::{EnableBehavior, EnableOperator, EnableWhen, Question};
use careform_core::models::response::{QuestionnaireResponse, ResponseValue, ScalarValue};

/// Question `id` → enabled, for every question reachable in the tree.
pub type EnablementMap = BTreeMap<String, bool>;

/// Whether `question` is enabled under `responses`.
///
/// Only looks at the question's own conditions. Suppressing the subtree
/// of a disabled group is up to the tree walkers ([`resolve_enablement`]
/// and the renderer).
pub fn is_enabled(question: &Question, responses: &[QuestionnaireResponse]) -> bool {
    if question.enable_when.is_empty() {
        return true;
    }

    let mut results = question
        .enable_when
        .iter()
        .map(|condition| condition_met(condition, responses));

    match question.behavior() {
        EnableBehavior::All => results.all(|met| met),
        EnableBehavior::Any => results.any(|met| met),
    }
}

/// Evaluate one condition against the first value of the response whose
/// `link_id` matches `condition.question`. A null first value counts as
/// no answer, so no operator is satisfied by it.
pub fn condition_met(condition: &EnableWhen, responses: &[QuestionnaireResponse]) -> bool {
    let Some(value) = responses
        .iter()
        .find(|r| r.link_id == condition.question)
        .and_then(QuestionnaireResponse::first_value)
        .filter(|v| !v.is_null())
    else {
        return false;
    };

    let answer = condition.answer.as_ref();
    match condition.operator {
        EnableOperator::Exists => true,
        EnableOperator::Equals => value.value() == answer,
        EnableOperator::NotEquals => value.value() != answer,
        EnableOperator::Greater => compare(value, answer, |o| o == Ordering::Greater),
        EnableOperator::Less => compare(value, answer, |o| o == Ordering::Less),
        EnableOperator::GreaterOrEquals => compare(value, answer, |o| o != Ordering::Less),
        EnableOperator::LessOrEquals => compare(value, answer, |o| o != Ordering::Greater),
        // Fail open.
        EnableOperator::Unknown => true,
    }
}

/// Numeric comparison. The response value must be a number; the expected
/// answer may be a number or numeric text.
fn compare<F>(value: &ResponseValue, answer: Option<&ScalarValue>, predicate: F) -> bool
where
    F: Fn(Ordering) -> bool,
{
    let Some(lhs) = value.value().and_then(ScalarValue::as_f64) else {
        return false;
    };
    let rhs = match answer {
        Some(ScalarValue::Number(n)) => *n,
        Some(ScalarValue::Text(s)) => match s.trim().parse::<f64>() {
            Ok(n) => n,
            Err(_) => return false,
        },
        _ => return false,
    };
    lhs.partial_cmp(&rhs).is_some_and(predicate)
}

/// Resolve enablement for the whole tree. Children of a disabled group
/// are recorded as disabled without evaluating their own conditions.
pub fn resolve_enablement(
    questions: &[Question],
    responses: &[QuestionnaireResponse],
) -> EnablementMap {
    let mut map = EnablementMap::new();
    walk(questions, responses, true, &mut map);
    map
}

fn walk(
    questions: &[Question],
    responses: &[QuestionnaireResponse],
    parent_enabled: bool,
    map: &mut EnablementMap,
) {
    for question in questions {
        let enabled = parent_enabled && is_enabled(question, responses);
        map.insert(question.id.clone(), enabled);
        if question.is_group() {
            walk(&question.questions, responses, enabled, map);
        }
    }
}
