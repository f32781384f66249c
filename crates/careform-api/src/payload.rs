//! Batch payload construction.

use careform_core::models::batch::{
    BatchRequest, BatchSubRequest, HttpMethod, SubmitBody, SubmitResult, SubmitValue,
};
use careform_core::models::response::{QuestionnaireResponse, ResponseValue};
use careform_core::paths;
use careform_engine::session::{FormSnapshot, SubmissionTicket};

/// One sub-request per form in the ticket, in ticket order. Forms with no
/// responses still submit an empty `results` list.
pub fn build_batch(ticket: &SubmissionTicket) -> BatchRequest {
    BatchRequest {
        requests: ticket
            .forms
            .iter()
            .map(|form| sub_request(ticket, form))
            .collect(),
    }
}

fn sub_request(ticket: &SubmissionTicket, form: &FormSnapshot) -> BatchSubRequest {
    BatchSubRequest {
        url: paths::questionnaire_submit(&form.slug),
        method: HttpMethod::Post,
        body: SubmitBody {
            resource_id: ticket.context.resource_id,
            encounter: ticket.context.encounter,
            results: form.responses.iter().map(submit_result).collect(),
        },
    }
}

pub fn submit_result(response: &QuestionnaireResponse) -> SubmitResult {
    SubmitResult {
        question_id: response.question_id.clone(),
        values: response.values.iter().filter_map(submit_value).collect(),
        note: response.note.clone(),
        taken_at: response.taken_at,
        body_site: response.body_site.clone(),
        method: response.method.clone(),
    }
}

/// Coded answers pass through; scalars are sent as text. Null scalars
/// are not sent.
pub fn submit_value(value: &ResponseValue) -> Option<SubmitValue> {
    match value {
        ResponseValue::Coded { code } => Some(SubmitValue::Coded { code: code.clone() }),
        ResponseValue::Scalar { value } => value.as_ref().map(|v| SubmitValue::Value {
            value: v.to_string(),
        }),
    }
}
