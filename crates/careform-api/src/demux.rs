//! Routing a rejected batch back to its forms.
//!
//! The reply carries no correlation ids: result `i` belongs to the form
//! that produced request `i`.

use careform_core::models::batch::{ReportedError, ValidationErrorResponse};
use careform_core::models::response::QuestionValidationError;
use careform_engine::session::SubmissionTicket;

/// What one form got back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFeedback {
    pub questionnaire_id: String,
    /// Shown inline at the question.
    pub question_errors: Vec<QuestionValidationError>,
    /// Form-level problems, prefixed with the questionnaire title.
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorDistribution {
    /// One entry per form, in request order.
    pub forms: Vec<FormFeedback>,
}

impl ErrorDistribution {
    /// Every form-level message across the batch, in request order.
    pub fn messages(&self) -> Vec<String> {
        self.forms
            .iter()
            .flat_map(|f| f.messages.iter().cloned())
            .collect()
    }

    pub fn question_error_count(&self) -> usize {
        self.forms.iter().map(|f| f.question_errors.len()).sum()
    }
}

pub fn distribute_errors(
    ticket: &SubmissionTicket,
    results: &[ValidationErrorResponse],
) -> ErrorDistribution {
    if results.len() != ticket.forms.len() {
        tracing::warn!(
            requests = ticket.forms.len(),
            results = results.len(),
            "batch reply length does not match request"
        );
    }

    let forms = ticket
        .forms
        .iter()
        .zip(results)
        .map(|(form, result)| {
            let mut feedback = FormFeedback {
                questionnaire_id: form.questionnaire_id.clone(),
                ..FormFeedback::default()
            };
            for error in result.errors() {
                match error {
                    ReportedError::Question(e) => feedback.question_errors.push(e.clone()),
                    ReportedError::Detailed(d) => match d.field() {
                        Some(field) => feedback
                            .messages
                            .push(format!("Error in {}: {field} - {}", form.title, d.msg)),
                        None => feedback.messages.push(format!("Error in {}", form.title)),
                    },
                    ReportedError::Other(_) => {
                        feedback.messages.push(format!("Error in {}", form.title))
                    }
                }
            }
            feedback
        })
        .collect();

    ErrorDistribution { forms }
}
