//! Multi-form session.
//!
//! Holds the questionnaires being answered together on one screen, each
//! with its own responses and errors. Forms never share state: an edit
//! to one form leaves every other form untouched.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use careform_core::models::questionnaire::Questionnaire;
use careform_core::models::response::{QuestionValidationError, QuestionnaireResponse};

use crate::error::SessionError;
use crate::reconcile;
use crate::required;

/// One questionnaire being answered, with its responses and errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionnaireFormState {
    pub questionnaire: Questionnaire,
    pub responses: Vec<QuestionnaireResponse>,
    pub errors: Vec<QuestionValidationError>,
}

impl QuestionnaireFormState {
    pub fn new(questionnaire: Questionnaire) -> Self {
        Self {
            questionnaire,
            responses: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.questionnaire.id
    }
}

/// What the submitted responses are recorded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmissionContext {
    /// The patient the responses belong to.
    pub resource_id: Uuid,
    pub encounter: Option<Uuid>,
}

/// A frozen copy of one form at the moment a submission started.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSnapshot {
    pub questionnaire_id: String,
    pub slug: String,
    pub title: String,
    pub responses: Vec<QuestionnaireResponse>,
}

/// Issued by [`FormSession::begin_submission`]. Forms are listed in
/// request order; results are matched back to forms by that position.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionTicket {
    pub context: SubmissionContext,
    pub forms: Vec<FormSnapshot>,
}

#[derive(Debug, Clone)]
pub struct FormSession {
    context: SubmissionContext,
    forms: Vec<QuestionnaireFormState>,
    seeded: HashSet<String>,
    in_flight: bool,
}

impl FormSession {
    /// Start a session with the given questionnaires pre-seeded. Seeded
    /// forms can never be removed.
    pub fn new(context: SubmissionContext, seeded: Vec<Questionnaire>) -> Self {
        let mut session = Self {
            context,
            forms: Vec::new(),
            seeded: HashSet::new(),
            in_flight: false,
        };
        for questionnaire in seeded {
            session.seeded.insert(questionnaire.id.clone());
            session.add_questionnaire(questionnaire);
        }
        session
    }

    pub fn context(&self) -> &SubmissionContext {
        &self.context
    }

    pub fn forms(&self) -> &[QuestionnaireFormState] {
        &self.forms
    }

    pub fn form(&self, questionnaire_id: &str) -> Option<&QuestionnaireFormState> {
        self.forms.iter().find(|f| f.id() == questionnaire_id)
    }

    pub fn contains(&self, questionnaire_id: &str) -> bool {
        self.form(questionnaire_id).is_some()
    }

    /// Append a fresh form for `questionnaire`. Returns `false` and leaves
    /// the session unchanged if it is already present.
    pub fn add_questionnaire(&mut self, questionnaire: Questionnaire) -> bool {
        if self.contains(&questionnaire.id) {
            return false;
        }
        tracing::debug!(questionnaire_id = %questionnaire.id, slug = %questionnaire.slug, "questionnaire added");
        self.forms.push(QuestionnaireFormState::new(questionnaire));
        true
    }

    pub fn is_removable(&self, questionnaire_id: &str) -> bool {
        !self.seeded.contains(questionnaire_id) && self.contains(questionnaire_id)
    }

    /// Remove a form that was added after the session started. Its
    /// responses and errors go with it.
    pub fn remove_questionnaire(
        &mut self,
        questionnaire_id: &str,
    ) -> Result<QuestionnaireFormState, SessionError> {
        if self.seeded.contains(questionnaire_id) {
            return Err(SessionError::SeededQuestionnaire(questionnaire_id.to_string()));
        }
        let index = self.index_of(questionnaire_id)?;
        tracing::debug!(questionnaire_id = %questionnaire_id, "questionnaire removed");
        Ok(self.forms.remove(index))
    }

    /// Upsert `response` into one form and clear that question's errors.
    pub fn update_response(
        &mut self,
        questionnaire_id: &str,
        response: QuestionnaireResponse,
    ) -> Result<(), SessionError> {
        let index = self.index_of(questionnaire_id)?;
        let form = &self.forms[index];
        let errors = reconcile::clear_errors(&form.errors, &response.question_id);
        let responses = reconcile::upsert(&form.responses, response);

        let form = &mut self.forms[index];
        form.errors = errors;
        form.responses = responses;
        Ok(())
    }

    /// Drop the response for one question, e.g. when its answer is cleared.
    pub fn clear_response(
        &mut self,
        questionnaire_id: &str,
        question_id: &str,
    ) -> Result<(), SessionError> {
        let index = self.index_of(questionnaire_id)?;
        let form = &self.forms[index];
        let errors = reconcile::clear_errors(&form.errors, question_id);
        let responses = reconcile::remove(&form.responses, question_id);

        let form = &mut self.forms[index];
        form.errors = errors;
        form.responses = responses;
        Ok(())
    }

    /// Append errors to one form.
    pub fn record_errors(
        &mut self,
        questionnaire_id: &str,
        errors: Vec<QuestionValidationError>,
    ) -> Result<(), SessionError> {
        let index = self.index_of(questionnaire_id)?;
        let form = &mut self.forms[index];
        let mut next = form.errors.clone();
        next.extend(errors);
        form.errors = next;
        Ok(())
    }

    /// Flag every enabled required question that has no answer, across
    /// all forms. Questions that already carry an error are left alone.
    /// Returns how many errors were added.
    pub fn check_required(&mut self) -> usize {
        let mut added = 0;
        for form in &mut self.forms {
            let missing: Vec<_> = required::check_required(&form.questionnaire.questions, &form.responses)
                .into_iter()
                .filter(|m| !form.errors.iter().any(|e| e.question_id == m.question_id))
                .collect();
            if missing.is_empty() {
                continue;
            }
            added += missing.len();
            let mut next = form.errors.clone();
            next.extend(missing);
            form.errors = next;
        }
        added
    }

    pub fn has_responses(&self) -> bool {
        self.forms.iter().any(|f| !f.responses.is_empty())
    }

    pub fn has_errors(&self) -> bool {
        self.forms.iter().any(|f| !f.errors.is_empty())
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// Whether the submit action should be offered right now.
    pub fn can_submit(&self) -> bool {
        !self.in_flight && self.has_responses()
    }

    /// Freeze every form for submission and mark the session in flight.
    /// Forms without responses are included too.
    pub fn begin_submission(&mut self) -> Result<SubmissionTicket, SessionError> {
        if self.in_flight {
            return Err(SessionError::SubmissionInFlight);
        }
        if !self.has_responses() {
            return Err(SessionError::NothingToSubmit);
        }
        self.in_flight = true;

        let forms = self
            .forms
            .iter()
            .map(|f| FormSnapshot {
                questionnaire_id: f.questionnaire.id.clone(),
                slug: f.questionnaire.slug.clone(),
                title: f.questionnaire.title.clone(),
                responses: f.responses.clone(),
            })
            .collect();

        Ok(SubmissionTicket {
            context: self.context,
            forms,
        })
    }

    /// Clear the in-flight flag once the batch has resolved, whatever
    /// the outcome.
    pub fn finish_submission(&mut self, ticket: &SubmissionTicket) {
        tracing::debug!(forms = ticket.forms.len(), "submission finished");
        self.in_flight = false;
    }

    fn index_of(&self, questionnaire_id: &str) -> Result<usize, SessionError> {
        self.forms
            .iter()
            .position(|f| f.id() == questionnaire_id)
            .ok_or_else(|| SessionError::UnknownQuestionnaire(questionnaire_id.to_string()))
    }
}
