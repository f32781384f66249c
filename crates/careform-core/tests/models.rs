use careform_core::error::CoreError;
use careform_core::models::batch::{FALLBACK_QUESTION_ERROR, ReportedError, SubmitValue};
use careform_core::models::question::{EnableOperator, Question, QuestionType, StructuredQuestionType};
use careform_core::models::questionnaire::Questionnaire;
use careform_core::models::response::{parse_responses, ResponseValue, ScalarValue};
use careform_core::paths;
use serde_json::json;

fn vitals() -> Questionnaire {
    serde_json::from_value(json!({
        "id": "f1",
        "slug": "vitals",
        "title": "Vitals",
        "status": "active",
        "version": "1.0",
        "subject_type": "encounter",
        "questions": [
            {
                "id": "g1",
                "link_id": "1",
                "type": "group",
                "text": "Observations",
                "styling_metadata": { "classes": "grid-cols-2" },
                "questions": [
                    { "id": "q1", "link_id": "1.1", "type": "dateTime", "text": "Taken at" },
                    {
                        "id": "q2",
                        "link_id": "1.2",
                        "type": "decimal",
                        "text": "Temperature",
                        "enable_when": [
                            { "question": "1.1", "operator": "exists", "answer": true }
                        ]
                    }
                ]
            },
            {
                "id": "q3",
                "link_id": "2",
                "type": "structured",
                "structured_type": "allergy_intolerance",
                "text": "Allergies"
            }
        ]
    }))
    .expect("fixture should deserialize")
}

#[test]
fn questionnaire_deserializes_nested_tree() {
    let q = vitals();
    assert_eq!(q.questions.len(), 2);
    let group = &q.questions[0];
    assert!(group.is_group());
    assert_eq!(group.questions[0].kind, QuestionType::DateTime);
    assert_eq!(group.questions[1].enable_when[0].operator, EnableOperator::Exists);
    assert_eq!(
        q.questions[1].structured_type,
        Some(StructuredQuestionType::AllergyIntolerance)
    );
    assert!(!group.questions[0].required);
    assert!(q.validate().is_ok());
}

#[test]
fn unrecognized_operator_deserializes_as_unknown() {
    let q: Question = serde_json::from_value(json!({
        "id": "q9",
        "link_id": "9",
        "type": "string",
        "text": "x",
        "enable_when": [{ "question": "1", "operator": "matches_regex", "answer": "a.*" }]
    }))
    .expect("should deserialize");
    assert_eq!(q.enable_when[0].operator, EnableOperator::Unknown);
}

#[test]
fn find_question_walks_groups() {
    let q = vitals();
    assert_eq!(q.find_question("q2").map(|q| q.link_id.as_str()), Some("1.2"));
    assert!(q.find_question("missing").is_none());
}

#[test]
fn validate_rejects_duplicate_link_ids() {
    let q = Questionnaire::new("f", "f", "F").with_questions(vec![
        Question::new("a", "same", QuestionType::String),
        Question::group("g", "grp", vec![Question::new("b", "same", QuestionType::String)]),
    ]);
    assert!(matches!(q.validate(), Err(CoreError::DuplicateLinkId(id)) if id == "same"));
}

#[test]
fn validate_rejects_children_on_leaf() {
    let mut leaf = Question::new("a", "a", QuestionType::String);
    leaf.questions.push(Question::new("b", "b", QuestionType::String));
    let q = Questionnaire::new("f", "f", "F").with_questions(vec![leaf]);
    assert!(matches!(q.validate(), Err(CoreError::ChildrenOnLeaf(id)) if id == "a"));
}

#[test]
fn scalar_values_keep_their_json_type() {
    let values: Vec<ResponseValue> = serde_json::from_value(json!([
        { "value": true },
        { "value": 10 },
        { "value": "10" },
        { "code": { "system": "http://snomed.info/sct", "code": "386661006", "display": "Fever" } }
    ]))
    .expect("should deserialize");

    assert_eq!(values[0].value(), Some(&ScalarValue::Bool(true)));
    assert_eq!(values[1].value(), Some(&ScalarValue::Number(10.0)));
    assert_eq!(values[2].value(), Some(&ScalarValue::Text("10".to_string())));
    assert_ne!(values[1].value(), values[2].value());
    assert!(matches!(&values[3], ResponseValue::Coded { code } if code.code == "386661006"));
}

#[test]
fn parse_responses_accepts_null_values() {
    let json = r#"[
        { "question_id": "q1", "link_id": "l1", "values": [{ "value": null }] },
        { "question_id": "q2", "link_id": "l2", "values": [{}] }
    ]"#;
    let responses = parse_responses(json).expect("null values are allowed");

    assert!(responses[0].values[0].is_null());
    assert_eq!(responses[0].values[0].value(), None);
    assert!(responses[1].values[0].is_null());
}

#[test]
fn parse_responses_rejects_duplicates() {
    let json = r#"[
        { "question_id": "q1", "link_id": "1", "values": [{ "value": 1 }] },
        { "question_id": "q1", "link_id": "1", "values": [{ "value": 2 }] }
    ]"#;
    assert!(matches!(parse_responses(json), Err(CoreError::DuplicateResponse(id)) if id == "q1"));
}

#[test]
fn parse_responses_accepts_metadata() {
    let json = r#"[
        {
            "question_id": "q1",
            "link_id": "1",
            "values": [{ "value": 37.5 }],
            "note": "axillary",
            "taken_at": "2026-10-01T08:30:00Z"
        }
    ]"#;
    let responses = parse_responses(json).expect("should parse");
    assert_eq!(responses[0].note.as_deref(), Some("axillary"));
    assert!(responses[0].taken_at.is_some());
}

#[test]
fn any_error_with_a_question_id_stays_inline() {
    let errors: Vec<ReportedError> = serde_json::from_value(json!([
        { "question_id": "q1", "msg": "out of range", "loc": ["values", 0] },
        { "question_id": "q2" },
        { "question_id": "q3", "error": ["not", "a", "string"] }
    ]))
    .expect("should deserialize");

    let inline: Vec<_> = errors
        .iter()
        .map(|e| match e {
            ReportedError::Question(q) => (q.question_id.as_str(), q.error.as_str()),
            other => panic!("expected question error, got {other:?}"),
        })
        .collect();
    assert_eq!(
        inline,
        [
            ("q1", "out of range"),
            ("q2", FALLBACK_QUESTION_ERROR),
            ("q3", FALLBACK_QUESTION_ERROR),
        ]
    );
}

#[test]
fn reported_errors_are_classified_by_shape() {
    let errors: Vec<ReportedError> = serde_json::from_value(json!([
        { "question_id": "q1", "error": "must be positive" },
        { "loc": ["encounter"], "msg": "field required", "type": "missing" },
        { "detail": "boom" }
    ]))
    .expect("should deserialize");

    assert!(matches!(&errors[0], ReportedError::Question(e) if e.question_id == "q1"));
    match &errors[1] {
        ReportedError::Detailed(d) => assert_eq!(d.field().as_deref(), Some("encounter")),
        other => panic!("expected detailed error, got {other:?}"),
    }
    assert!(matches!(&errors[2], ReportedError::Other(_)));
}

#[test]
fn submit_values_serialize_without_tags() {
    let value = SubmitValue::Value {
        value: "true".to_string(),
    };
    assert_eq!(serde_json::to_value(&value).expect("serialize"), json!({ "value": "true" }));
}

#[test]
fn submit_path_uses_slug() {
    assert_eq!(paths::questionnaire_submit("vitals"), "/api/v1/questionnaire/vitals/submit/");
    assert_eq!(paths::questionnaire_detail("vitals"), "/api/v1/questionnaire/vitals/");
}
