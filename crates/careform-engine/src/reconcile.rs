//! Response reconciliation.
//!
//! Every function returns a fresh collection; inputs are never mutated.
//! At most one response exists per `question_id`.

use careform_core::models::response::{QuestionValidationError, QuestionnaireResponse};

/// Replace the response with the same `question_id` in place, or append
/// `updated` if there is none. Untouched entries keep their order.
pub fn upsert(
    responses: &[QuestionnaireResponse],
    updated: QuestionnaireResponse,
) -> Vec<QuestionnaireResponse> {
    let mut next = Vec::with_capacity(responses.len() + 1);
    let mut pending = Some(updated);

    for existing in responses {
        match pending.take_if(|u| u.question_id == existing.question_id) {
            Some(replacement) => next.push(replacement),
            None => next.push(existing.clone()),
        }
    }
    if let Some(appended) = pending {
        next.push(appended);
    }
    next
}

/// Drop the response for `question_id`, if any.
pub fn remove(responses: &[QuestionnaireResponse], question_id: &str) -> Vec<QuestionnaireResponse> {
    responses
        .iter()
        .filter(|r| r.question_id != question_id)
        .cloned()
        .collect()
}

/// Drop every error reported against `question_id`.
pub fn clear_errors(
    errors: &[QuestionValidationError],
    question_id: &str,
) -> Vec<QuestionValidationError> {
    errors
        .iter()
        .filter(|e| e.question_id != question_id)
        .cloned()
        .collect()
}

/// Find the response for a question.
pub fn response_for<'a>(
    responses: &'a [QuestionnaireResponse],
    question_id: &str,
) -> Option<&'a QuestionnaireResponse> {
    responses.iter().find(|r| r.question_id == question_id)
}
