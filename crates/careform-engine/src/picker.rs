//! Questionnaire picker filter.

use careform_core::models::questionnaire::Questionnaire;

use crate::session::FormSession;

/// Candidates not yet in `session` whose title contains `query`,
/// ignoring case. An empty query matches every title.
pub fn available_questionnaires<'a>(
    candidates: &'a [Questionnaire],
    session: &FormSession,
    query: &str,
) -> Vec<&'a Questionnaire> {
    let needle = query.trim().to_lowercase();
    candidates
        .iter()
        .filter(|q| !session.contains(&q.id))
        .filter(|q| q.title.to_lowercase().contains(&needle))
        .collect()
}
