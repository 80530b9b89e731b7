use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use project_ledger::config::{AppConfig, SummaryFormat};
use project_ledger::form::{FieldId, FormBuilder, DATE_FORMAT, PROJECT_FORM};
use project_ledger::models::Project;
use project_ledger::session::{self, Session};

#[derive(Parser)]
#[command(name = "pledger")]
#[command(about = "Record engineering projects and track cost, profitability and estimates")]
struct Cli {
    /// Path to a JSON config file (defaults to $PLEDGER_CONFIG, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format for summaries, overriding the config file
    #[arg(long, global = true, value_enum)]
    format: Option<SummaryFormat>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive registration session
    Session,
    /// Validate a single project and print its summary
    Register(RegisterArgs),
    /// List the registration form fields
    Fields,
}

#[derive(Args)]
struct RegisterArgs {
    /// Responsible user id
    #[arg(long)]
    user: String,
    /// Project code
    #[arg(long)]
    code: String,
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    start: String,
    /// Estimated end date (YYYY-MM-DD)
    #[arg(long)]
    estimated_end: String,
    #[arg(long, default_value = "0")]
    lead_hours: String,
    #[arg(long, default_value = "0")]
    engineer_hours: String,
    #[arg(long, default_value = "0")]
    subcontracting_cost: String,
    #[arg(long, default_value = "0")]
    expenses: String,
    #[arg(long, default_value = "0")]
    revenue: String,
    #[arg(long, default_value = "0")]
    lead_rate: String,
    #[arg(long, default_value = "0")]
    engineer_rate: String,
    /// Initial status: in_progress, completed or cancelled
    #[arg(long)]
    status: Option<String>,
    /// Actual end date (YYYY-MM-DD)
    #[arg(long)]
    actual_end: Option<String>,
}

impl RegisterArgs {
    fn raw(&self, id: FieldId) -> &str {
        match id {
            FieldId::ResponsibleUserId => &self.user,
            FieldId::ProjectCode => &self.code,
            FieldId::StartDate => &self.start,
            FieldId::EstimatedEndDate => &self.estimated_end,
            FieldId::LeadHours => &self.lead_hours,
            FieldId::EngineerHours => &self.engineer_hours,
            FieldId::SubcontractingCost => &self.subcontracting_cost,
            FieldId::Expenses => &self.expenses,
            FieldId::Revenue => &self.revenue,
            FieldId::LeadHourlyRate => &self.lead_rate,
            FieldId::EngineerHourlyRate => &self.engineer_rate,
        }
    }
}

/// Initialize tracing on stderr so stdout only carries summaries and prompts
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "project_ledger=warn,pledger=warn".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = AppConfig::load(cli.config.as_deref());
    if let Some(format) = cli.format {
        config.summary_format = format;
    }

    match cli.command {
        Some(Commands::Register(args)) => register(&args, &config)?,
        Some(Commands::Fields) => {
            for spec in PROJECT_FORM {
                println!("{:<22} {}", spec.id.as_str(), spec.label);
            }
        }
        Some(Commands::Session) | None => {
            let stdin = io::stdin();
            let mut session = Session::new(stdin.lock(), io::stdout(), config);
            session.run()?;
        }
    }

    Ok(())
}

fn register(args: &RegisterArgs, config: &AppConfig) -> anyhow::Result<()> {
    let mut input = FormBuilder::default()
        .collect(|spec| args.raw(spec.id).to_string())?
        .into_create_input()?;

    input.status = args.status.clone();
    input.actual_end_date = args
        .actual_end
        .as_deref()
        .map(|raw| chrono::NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT))
        .transpose()
        .context("Invalid actual end date (expected YYYY-MM-DD)")?;

    let project = Project::new(input)?;
    tracing::info!("Validated project {}", project.project_code());

    print!(
        "{}",
        session::format_summary(&project.summarize(), config.summary_format)?
    );
    Ok(())
}
