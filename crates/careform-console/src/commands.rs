use std::path::{Path, PathBuf};
use std::str::FromStr;

use uuid::Uuid;

use careform_api::client::ApiClient;
use careform_api::notify::Notifier;
use careform_api::submit::{SubmissionOutcome, submit};
use careform_core::models::questionnaire::Questionnaire;
use careform_core::models::response::{QuestionnaireResponse, ResponseValue, parse_responses};
use careform_engine::navigation::{ActiveGroup, ScrollOptions, Viewport};
use careform_engine::render::{Control, RenderNode, render_tree};
use careform_engine::session::{FormSession, SubmissionContext};

use crate::config::{self, CareformConfig, TokenSource};

/// `SLUG=ANSWERS.json` on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormAnswers {
    pub slug: String,
    pub path: PathBuf,
}

impl FromStr for FormAnswers {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (slug, path) = s
            .split_once('=')
            .ok_or_else(|| format!("expected SLUG=ANSWERS.json, got {s:?}"))?;
        if slug.is_empty() || path.is_empty() {
            return Err(format!("expected SLUG=ANSWERS.json, got {s:?}"));
        }
        Ok(Self {
            slug: slug.to_string(),
            path: PathBuf::from(path),
        })
    }
}

/// Prints notifications to the terminal.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        println!("✓ {message}");
    }

    fn bad_request(&self, messages: &[String]) {
        eprintln!("✗ Submission rejected:");
        for message in messages {
            eprintln!("  - {message}");
        }
    }

    fn failure(&self, message: &str) {
        eprintln!("✗ {message}");
    }
}

/// Remembers which node the view was asked to bring into focus.
#[derive(Debug, Default)]
pub struct TerminalViewport {
    pub focused: Option<String>,
}

impl Viewport for TerminalViewport {
    fn scroll_into_view(&mut self, key: &str, options: ScrollOptions) {
        tracing::debug!(key, ?options, "focusing node");
        self.focused = Some(key.to_string());
    }
}

pub fn configure(base_url: String, token: TokenSource) -> eyre::Result<()> {
    let config = CareformConfig {
        config_version: config::CURRENT_VERSION,
        base_url,
        token,
        created_at: jiff::Timestamp::now(),
    };
    let path = config::save_config(&config)?;
    let info = config::config_info(&config);
    println!("Saved {}", path.display());
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

pub async fn list(client: &ApiClient, search: Option<&str>) -> eyre::Result<()> {
    let page = client.list_questionnaires(search).await?;
    for q in &page.results {
        println!("{:<38} {:<32} {}", q.id, q.slug, q.title);
    }
    println!("{} of {} questionnaires", page.results.len(), page.count);
    Ok(())
}

pub async fn fetch_questionnaire(client: &ApiClient, slug: &str) -> eyre::Result<Questionnaire> {
    let questionnaire = client.get_questionnaire(slug).await?;
    questionnaire.validate()?;
    Ok(questionnaire)
}

pub fn read_questionnaire(path: &Path) -> eyre::Result<Questionnaire> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read {}: {e}", path.display()))?;
    let questionnaire: Questionnaire = serde_json::from_str(&contents)?;
    questionnaire.validate()?;
    Ok(questionnaire)
}

pub fn read_answers(path: &Path) -> eyre::Result<Vec<QuestionnaireResponse>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read {}: {e}", path.display()))?;
    Ok(parse_responses(&contents)?)
}

/// Print the evaluated question tree.
pub fn show(
    questionnaire: &Questionnaire,
    answers: &[QuestionnaireResponse],
    active: Option<&str>,
    as_json: bool,
) -> eyre::Result<()> {
    let plan = render_tree(&questionnaire.questions, answers, &[]);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let mut viewport = TerminalViewport::default();
    ActiveGroup::default().set(active, &plan, &mut viewport);

    println!("{} ({}, v{})", questionnaire.title, questionnaire.slug, questionnaire.version);
    let mut out = String::new();
    write_plan(&plan, 1, viewport.focused.as_deref(), &mut out);
    print!("{out}");
    Ok(())
}

/// Indented text rendering of a plan. The focused node is marked `>`.
pub fn write_plan(nodes: &[RenderNode<'_>], depth: usize, focused: Option<&str>, out: &mut String) {
    for node in nodes {
        let marker = if focused == Some(node.key()) { ">" } else { " " };
        let indent = "  ".repeat(depth);
        match node {
            RenderNode::Group(group) => {
                out.push_str(&format!("{marker}{indent}[{}] {}\n", group.key, group.text));
                write_plan(&group.children, depth + 1, focused, out);
            }
            RenderNode::Field(field) => {
                let required = if field.required { "*" } else { "" };
                out.push_str(&format!(
                    "{marker}{indent}{}{required} ({}) <{}>",
                    field.text,
                    field.key,
                    describe(&field.control)
                ));
                if let Some(response) = field.response {
                    let values: Vec<String> = response
                        .values
                        .iter()
                        .map(|v| match v {
                            ResponseValue::Scalar { value: Some(scalar) } => scalar.to_string(),
                            ResponseValue::Scalar { value: None } => "<empty>".to_string(),
                            ResponseValue::Coded { code } => code.code.clone(),
                        })
                        .collect();
                    out.push_str(&format!(" = {}", values.join(", ")));
                }
                out.push('\n');
                for error in &field.errors {
                    out.push_str(&format!(" {indent}  ! {error}\n"));
                }
            }
        }
    }
}

fn describe(control: &Control<'_>) -> String {
    match control {
        Control::Toggle => "yes/no".to_string(),
        Control::Decimal => "decimal".to_string(),
        Control::Integer => "integer".to_string(),
        Control::Date => "date".to_string(),
        Control::DateTime => "date-time".to_string(),
        Control::Time => "time".to_string(),
        Control::SingleLine => "text".to_string(),
        Control::MultiLine => "long text".to_string(),
        Control::Url => "url".to_string(),
        Control::Choice {
            options,
            value_set,
            multiple,
        } => {
            let source = match value_set {
                Some(vs) => format!("value set {vs}"),
                None => options
                    .iter()
                    .map(|o| o.display.as_deref().unwrap_or(&o.value))
                    .collect::<Vec<_>>()
                    .join("|"),
            };
            if *multiple {
                format!("choose many: {source}")
            } else {
                format!("choose one: {source}")
            }
        }
        Control::Quantity { units } => {
            let units: Vec<_> = units.iter().map(|u| u.value.as_str()).collect();
            format!("quantity [{}]", units.join("|"))
        }
        Control::Structured { kind } => format!("structured {kind:?}"),
    }
}

pub async fn submit_forms(
    client: &ApiClient,
    patient: Uuid,
    encounter: Option<Uuid>,
    forms: &[FormAnswers],
    skip_required: bool,
) -> eyre::Result<()> {
    let mut seeded = Vec::with_capacity(forms.len());
    let mut answers = Vec::with_capacity(forms.len());
    for form in forms {
        let questionnaire = fetch_questionnaire(client, &form.slug).await?;
        answers.push((questionnaire.id.clone(), read_answers(&form.path)?));
        seeded.push(questionnaire);
    }

    let context = SubmissionContext {
        resource_id: patient,
        encounter,
    };
    let mut session = FormSession::new(context, seeded);
    for (questionnaire_id, responses) in answers {
        for response in responses {
            session.update_response(&questionnaire_id, response)?;
        }
    }

    if !skip_required && session.check_required() > 0 {
        print_question_errors(&session);
        return Err(eyre::eyre!("required questions are unanswered"));
    }

    match submit(&mut session, client, &ConsoleNotifier).await? {
        SubmissionOutcome::Submitted(response) => {
            tracing::info!(results = response.results.len(), "batch accepted");
            Ok(())
        }
        SubmissionOutcome::Rejected(_) => {
            print_question_errors(&session);
            Err(eyre::eyre!("submission rejected"))
        }
        SubmissionOutcome::Failed(reason) => Err(eyre::eyre!("submission failed: {reason}")),
    }
}

fn print_question_errors(session: &FormSession) {
    for form in session.forms() {
        for error in &form.errors {
            let text = form
                .questionnaire
                .find_question(&error.question_id)
                .map(|q| q.text.as_str())
                .unwrap_or(error.question_id.as_str());
            eprintln!("{}: {text}: {}", form.questionnaire.title, error.error);
        }
    }
}
