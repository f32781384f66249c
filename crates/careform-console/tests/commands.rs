use std::path::PathBuf;

use careform_console::commands::{FormAnswers, write_plan};
use careform_core::models::question::{Question, QuestionType};
use careform_core::models::response::{QuestionnaireResponse, ResponseValue};
use careform_engine::render::render_tree;

#[test]
fn form_answers_parses_slug_and_path() {
    let parsed: FormAnswers = "vitals=answers/vitals.json".parse().unwrap();
    assert_eq!(parsed.slug, "vitals");
    assert_eq!(parsed.path, PathBuf::from("answers/vitals.json"));
}

#[test]
fn form_answers_rejects_missing_separator() {
    assert!("vitals".parse::<FormAnswers>().is_err());
    assert!("=answers.json".parse::<FormAnswers>().is_err());
    assert!("vitals=".parse::<FormAnswers>().is_err());
}

#[test]
fn plan_text_marks_focus_and_answers() {
    let questions = vec![Question::group(
        "g1",
        "1",
        vec![
            Question::new("q1", "1.1", QuestionType::Decimal)
                .with_text("Temperature")
                .required(),
        ],
    )
    .with_text("Vitals")];
    let responses = vec![QuestionnaireResponse::new("q1", "1.1", vec![ResponseValue::scalar(37.5)])];

    let plan = render_tree(&questions, &responses, &[]);
    let mut out = String::new();
    write_plan(&plan, 0, Some("g1"), &mut out);

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], ">[g1] Vitals");
    assert_eq!(lines[1], "   Temperature* (q1) <decimal> = 37.5");
}
