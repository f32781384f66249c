//! Batch submission driver.

use careform_core::models::batch::BatchResponse;
use careform_engine::session::{FormSession, SubmissionTicket};

use crate::demux::{ErrorDistribution, distribute_errors};
use crate::error::ApiError;
use crate::notify::Notifier;
use crate::payload::build_batch;
use crate::transport::{BatchReply, BatchTransport};

pub const SUCCESS_MESSAGE: &str = "Questionnaire submitted successfully";
pub const FAILURE_MESSAGE: &str = "Failed to submit questionnaire";

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Submitted(BatchResponse),
    /// The batch was rejected with structured, per-form errors.
    Rejected(ErrorDistribution),
    /// No structured reply; no form state was changed.
    Failed(String),
}

/// Submit every form in `session` as one batch.
///
/// Fails up front if a submission is already in flight or nothing has
/// been answered. Otherwise the session is always left resubmittable:
/// responses are never discarded, and the in-flight flag is cleared
/// whatever the transport returns. Dropping the returned future before
/// the reply arrives discards the outcome and also clears the flag.
pub async fn submit(
    session: &mut FormSession,
    transport: &dyn BatchTransport,
    notifier: &dyn Notifier,
) -> Result<SubmissionOutcome, ApiError> {
    let ticket = session.begin_submission()?;
    let batch = build_batch(&ticket);
    let mut in_flight = InFlight { session, ticket };
    tracing::info!(forms = batch.requests.len(), "submitting questionnaire batch");

    let reply = transport.send_batch(&batch).await;
    let outcome = apply_reply(&mut *in_flight.session, &in_flight.ticket, reply, notifier);
    Ok(outcome)
}

/// Ends the submission when dropped, whether the batch resolved or the
/// driving future was cancelled.
struct InFlight<'s> {
    session: &'s mut FormSession,
    ticket: SubmissionTicket,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.session.finish_submission(&self.ticket);
    }
}

/// Apply a batch reply to the session and raise notifications.
///
/// Errors are attributed by the ticket's form order. A form removed from
/// the session while the batch was in flight has its feedback dropped.
pub fn apply_reply(
    session: &mut FormSession,
    ticket: &SubmissionTicket,
    reply: Result<BatchReply, ApiError>,
    notifier: &dyn Notifier,
) -> SubmissionOutcome {
    match reply {
        Ok(BatchReply::Accepted(response)) => {
            notifier.success(SUCCESS_MESSAGE);
            SubmissionOutcome::Submitted(response)
        }
        Ok(BatchReply::Rejected(envelope)) => {
            let distribution = distribute_errors(ticket, &envelope.results);
            for form in &distribution.forms {
                if form.question_errors.is_empty() {
                    continue;
                }
                if let Err(e) =
                    session.record_errors(&form.questionnaire_id, form.question_errors.clone())
                {
                    tracing::warn!(questionnaire_id = %form.questionnaire_id, error = %e, "dropping feedback for removed form");
                }
            }

            let messages = distribution.messages();
            if !messages.is_empty() {
                notifier.bad_request(&messages);
            }
            tracing::info!(
                question_errors = distribution.question_error_count(),
                form_errors = messages.len(),
                "batch rejected"
            );
            SubmissionOutcome::Rejected(distribution)
        }
        Err(e) => {
            tracing::error!(error = %e, "batch submission failed");
            notifier.failure(FAILURE_MESSAGE);
            SubmissionOutcome::Failed(e.to_string())
        }
    }
}
