use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use uuid::Uuid;

use careform_api::client::ApiClient;
use careform_console::commands::{self, FormAnswers};
use careform_console::config::{self, TokenSource};

#[derive(Debug, Parser)]
#[command(name = "careform", version, about = "Clinical questionnaire console")]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Save the API base URL and token source.
    Configure {
        #[arg(long)]
        base_url: String,
        /// Bearer token stored in the config file.
        #[arg(long, conflicts_with = "token_env")]
        token: Option<String>,
        /// Read the bearer token from this environment variable at runtime.
        #[arg(long)]
        token_env: Option<String>,
    },
    /// List questionnaires.
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Render a questionnaire against a set of answers.
    Show {
        #[arg(required_unless_present = "file")]
        slug: Option<String>,
        /// Read the questionnaire from a local JSON file instead of the API.
        #[arg(long, conflicts_with = "slug")]
        file: Option<PathBuf>,
        #[arg(long)]
        answers: Option<PathBuf>,
        /// Group to bring into focus.
        #[arg(long)]
        active: Option<String>,
        /// Print the render plan as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Submit answers for one or more questionnaires in a single batch.
    Submit {
        #[arg(long)]
        patient: Uuid,
        #[arg(long)]
        encounter: Option<Uuid>,
        /// SLUG=ANSWERS.json, repeatable.
        #[arg(long = "form", required = true)]
        forms: Vec<FormAnswers>,
        /// Let the server report missing required answers.
        #[arg(long)]
        skip_required_check: bool,
    },
}

fn client() -> Result<ApiClient> {
    let stored = match config::load_config() {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            tracing::debug!(error = %e, "no stored config");
            None
        }
    };
    let (base_url, token) = config::resolve(stored.as_ref())?;
    Ok(ApiClient::new(&base_url, token)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Command::Configure {
            base_url,
            token,
            token_env,
        } => {
            let token = match (token, token_env) {
                (Some(token), _) => TokenSource::Inline { token },
                (None, Some(var)) => TokenSource::Env { var },
                (None, None) => TokenSource::None,
            };
            commands::configure(base_url, token)
        }
        Command::List { search } => commands::list(&client()?, search.as_deref()).await,
        Command::Show {
            slug,
            file,
            answers,
            active,
            json,
        } => {
            let questionnaire = match (file, slug) {
                (Some(path), _) => commands::read_questionnaire(&path)?,
                (None, Some(slug)) => commands::fetch_questionnaire(&client()?, &slug).await?,
                (None, None) => return Err(eyre::eyre!("a slug or --file is required")),
            };
            let answers = match answers {
                Some(path) => commands::read_answers(&path)?,
                None => Vec::new(),
            };
            commands::show(&questionnaire, &answers, active.as_deref(), json)
        }
        Command::Submit {
            patient,
            encounter,
            forms,
            skip_required_check,
        } => {
            commands::submit_forms(&client()?, patient, encounter, &forms, skip_required_check)
                .await
        }
    }
}
