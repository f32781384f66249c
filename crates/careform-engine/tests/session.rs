use careform_core::models::question::{EnableBehavior, EnableOperator, EnableWhen, Question, QuestionType};
use careform_core::models::questionnaire::Questionnaire;
use careform_core::models::response::{QuestionValidationError, QuestionnaireResponse, ResponseValue};
use careform_engine::error::SessionError;
use careform_engine::picker::available_questionnaires;
use careform_engine::required::REQUIRED_MESSAGE;
use careform_engine::session::{FormSession, SubmissionContext};
use uuid::Uuid;

fn context() -> SubmissionContext {
    SubmissionContext {
        resource_id: Uuid::new_v4(),
        encounter: Some(Uuid::new_v4()),
    }
}

fn questionnaire(id: &str, title: &str) -> Questionnaire {
    Questionnaire::new(id, format!("{id}-slug"), title).with_questions(vec![
        Question::new(format!("{id}-q1"), format!("{id}.1"), QuestionType::String).required(),
        Question::new(format!("{id}-q2"), format!("{id}.2"), QuestionType::Integer),
    ])
}

/// Question `a-q1` carries link id `a.1`.
fn answer(question_id: &str, value: &str) -> QuestionnaireResponse {
    let link_id = question_id.replace("-q", ".");
    QuestionnaireResponse::new(question_id, link_id, vec![ResponseValue::scalar(value)])
}

#[test]
fn adding_the_same_questionnaire_twice_keeps_one_form() {
    let mut session = FormSession::new(context(), vec![]);
    assert!(session.add_questionnaire(questionnaire("a", "Vitals")));
    assert!(!session.add_questionnaire(questionnaire("a", "Vitals")));
    assert_eq!(session.forms().len(), 1);
}

#[test]
fn seeded_forms_cannot_be_removed() {
    let mut session = FormSession::new(context(), vec![questionnaire("a", "Vitals")]);
    session.add_questionnaire(questionnaire("b", "Pain score"));

    assert!(!session.is_removable("a"));
    assert!(session.is_removable("b"));
    assert!(matches!(
        session.remove_questionnaire("a"),
        Err(SessionError::SeededQuestionnaire(id)) if id == "a"
    ));

    let removed = session.remove_questionnaire("b").expect("added form is removable");
    assert_eq!(removed.questionnaire.id, "b");
    assert_eq!(session.forms().len(), 1);
    assert!(matches!(
        session.remove_questionnaire("b"),
        Err(SessionError::UnknownQuestionnaire(_))
    ));
}

#[test]
fn update_response_clears_that_questions_errors() {
    let mut session = FormSession::new(context(), vec![questionnaire("a", "Vitals")]);
    session
        .record_errors(
            "a",
            vec![
                QuestionValidationError {
                    question_id: "a-q1".to_string(),
                    error: "too short".to_string(),
                },
                QuestionValidationError {
                    question_id: "a-q2".to_string(),
                    error: "not a number".to_string(),
                },
            ],
        )
        .expect("form exists");

    session.update_response("a", answer("a-q1", "fixed")).expect("form exists");

    let form = session.form("a").expect("form exists");
    assert_eq!(form.responses.len(), 1);
    assert_eq!(form.errors.len(), 1);
    assert_eq!(form.errors[0].question_id, "a-q2");
}

#[test]
fn updates_do_not_leak_across_forms() {
    let mut session = FormSession::new(context(), vec![questionnaire("a", "Vitals"), questionnaire("b", "Pain")]);
    session
        .record_errors(
            "b",
            vec![QuestionValidationError {
                question_id: "a-q1".to_string(),
                error: "same id, other form".to_string(),
            }],
        )
        .expect("form exists");

    session.update_response("a", answer("a-q1", "x")).expect("form exists");

    let b = session.form("b").expect("form exists");
    assert!(b.responses.is_empty());
    assert_eq!(b.errors.len(), 1);
}

#[test]
fn update_unknown_form_is_an_error() {
    let mut session = FormSession::new(context(), vec![]);
    assert!(matches!(
        session.update_response("nope", answer("q", "v")),
        Err(SessionError::UnknownQuestionnaire(id)) if id == "nope"
    ));
}

#[test]
fn clear_response_removes_answer_and_errors() {
    let mut session = FormSession::new(context(), vec![questionnaire("a", "Vitals")]);
    session.update_response("a", answer("a-q1", "x")).expect("form exists");
    session
        .record_errors(
            "a",
            vec![QuestionValidationError {
                question_id: "a-q1".to_string(),
                error: "bad".to_string(),
            }],
        )
        .expect("form exists");

    session.clear_response("a", "a-q1").expect("form exists");
    let form = session.form("a").expect("form exists");
    assert!(form.responses.is_empty());
    assert!(form.errors.is_empty());
}

#[test]
fn has_responses_drives_can_submit() {
    let mut session = FormSession::new(context(), vec![questionnaire("a", "Vitals"), questionnaire("b", "Pain")]);
    assert!(!session.has_responses());
    assert!(!session.can_submit());

    session.update_response("b", answer("b-q2", "3")).expect("form exists");
    assert!(session.has_responses());
    assert!(session.can_submit());
}

#[test]
fn submission_guard_blocks_double_submit() {
    let mut session = FormSession::new(context(), vec![questionnaire("a", "Vitals"), questionnaire("b", "Pain")]);
    assert!(matches!(session.begin_submission(), Err(SessionError::NothingToSubmit)));

    session.update_response("a", answer("a-q1", "x")).expect("form exists");
    let ticket = session.begin_submission().expect("first submission starts");
    assert!(session.is_submitting());
    assert!(!session.can_submit());
    assert!(matches!(session.begin_submission(), Err(SessionError::SubmissionInFlight)));

    // Every form is part of the batch, answered or not, in session order.
    let ids: Vec<_> = ticket.forms.iter().map(|f| f.questionnaire_id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
    assert!(ticket.forms[1].responses.is_empty());

    session.finish_submission(&ticket);
    assert!(session.can_submit());
}

#[test]
fn check_required_flags_unanswered_enabled_questions() {
    let gated = Question::new("g-q", "g.q", QuestionType::String)
        .required()
        .with_enable_when(
            vec![EnableWhen {
                question: "a.2".to_string(),
                operator: EnableOperator::Exists,
                answer: None,
            }],
            EnableBehavior::All,
        );
    let mut form = questionnaire("a", "Vitals");
    form.questions.push(gated);

    let mut session = FormSession::new(context(), vec![form]);
    assert_eq!(session.check_required(), 1);
    let errors = &session.form("a").expect("form exists").errors;
    assert_eq!(errors[0].question_id, "a-q1");
    assert_eq!(errors[0].error, REQUIRED_MESSAGE);

    // Running again does not duplicate.
    assert_eq!(session.check_required(), 0);

    // Enabling the gated question makes it required too.
    session.update_response("a", answer("a-q2", "1")).expect("form exists");
    assert_eq!(session.check_required(), 1);
}

#[test]
fn null_answer_does_not_satisfy_required() {
    let mut session = FormSession::new(context(), vec![questionnaire("a", "Vitals")]);
    session
        .update_response(
            "a",
            QuestionnaireResponse::new("a-q1", "a.1", vec![ResponseValue::Scalar { value: None }]),
        )
        .expect("form exists");

    assert_eq!(session.check_required(), 1);
    assert_eq!(session.form("a").expect("form exists").errors[0].question_id, "a-q1");
}

#[test]
fn picker_excludes_present_forms_and_matches_title_case_insensitively() {
    let candidates = vec![
        questionnaire("a", "Vitals"),
        questionnaire("b", "Pain Score"),
        questionnaire("c", "Vital Signs (Paediatric)"),
    ];
    let session = FormSession::new(context(), vec![questionnaire("a", "Vitals")]);

    let titles: Vec<_> = available_questionnaires(&candidates, &session, "VITAL")
        .into_iter()
        .map(|q| q.title.as_str())
        .collect();
    assert_eq!(titles, ["Vital Signs (Paediatric)"]);

    assert_eq!(available_questionnaires(&candidates, &session, "").len(), 2);
}
