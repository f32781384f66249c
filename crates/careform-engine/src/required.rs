//! Required-answer check, run before submitting.

use careform_core::models::question::Question;
use careform_core::models::response::{QuestionValidationError, QuestionnaireResponse};

use crate::enablement::is_enabled;
use crate::reconcile::response_for;

pub const REQUIRED_MESSAGE: &str = "This field is required";

/// Errors for every enabled, editable, required leaf with no value.
/// Disabled groups hide their whole subtree, as when rendering.
pub fn check_required(
    questions: &[Question],
    responses: &[QuestionnaireResponse],
) -> Vec<QuestionValidationError> {
    let mut missing = Vec::new();
    walk(questions, responses, &mut missing);
    missing
}

fn walk(
    questions: &[Question],
    responses: &[QuestionnaireResponse],
    missing: &mut Vec<QuestionValidationError>,
) {
    for question in questions.iter().filter(|q| is_enabled(q, responses)) {
        if question.is_group() {
            walk(&question.questions, responses, missing);
            continue;
        }
        if !question.required || question.read_only {
            continue;
        }
        let answered = response_for(responses, &question.id)
            .is_some_and(|r| r.values.iter().any(|v| !v.is_null()));
        if !answered {
            missing.push(QuestionValidationError {
                question_id: question.id.clone(),
                error: REQUIRED_MESSAGE.to_string(),
            });
        }
    }
}
