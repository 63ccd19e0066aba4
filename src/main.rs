use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use cgpa_leaderboard::config::{Config, ConfigOverrides, StatusPolicy};
use cgpa_leaderboard::output::csv::leaderboard_to_csv;
use cgpa_leaderboard::output::json::render_leaderboard_json;
use cgpa_leaderboard::output::table::render_leaderboard_table;
use cgpa_leaderboard::output::text::render_text;
use cgpa_leaderboard::pipeline::{run_pipeline, PipelineOptions};
use cgpa_leaderboard::portal::{Endpoints, HttpFetcher, Resolver, RetryPolicy};
use cgpa_leaderboard::prompt::prompt_semester;
use cgpa_leaderboard::ranking::rank_records;
use cgpa_leaderboard::roster::load_student_ids;
use cgpa_leaderboard::semester::{generate_semesters, lookup_semester, Semester};
use cgpa_leaderboard::types::Leaderboard;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "cgpa-leaderboard",
    about = "Rank a section's students by semester CGPA from the result portal"
)]
struct Cli {
    /// Student id list, one id per line
    #[arg(short, long)]
    ids: Option<PathBuf>,
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Semester code such as 241 (Spring 2024); prompts when omitted
    #[arg(short, long)]
    semester: Option<String>,
    #[arg(long = "base-url")]
    base_url: Option<String>,
    #[arg(short, long)]
    workers: Option<usize>,
    #[arg(long = "status-policy", value_enum)]
    status_policy: Option<StatusPolicy>,
    #[arg(long)]
    top: Option<usize>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
    #[arg(long = "no-progress")]
    no_progress: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the semester codes accepted by the prompt
    Semesters,
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        base_url: cli.base_url.clone(),
        ids_path: cli.ids.as_ref().map(|p| p.display().to_string()),
        workers: cli.workers,
        status_policy: cli.status_policy,
        top_n: cli.top,
    });
    config.validate()?;

    if let Some(command @ Commands::Config { .. }) = &cli.command {
        return handle_config_command(command, &config, &config_path);
    }

    let catalogue = generate_semesters(config.semesters.start_year, config.semesters.end_year)?;
    if matches!(cli.command, Some(Commands::Semesters)) {
        for semester in &catalogue {
            println!("{semester}");
        }
        return Ok(());
    }

    let student_ids = load_student_ids(Path::new(&config.input.ids_path))?;
    if student_ids.is_empty() {
        warn!(path = %config.input.ids_path, "student id list is empty");
    }

    let semester = match cli.semester.as_deref() {
        Some(code) => lookup_semester(code, &catalogue)?,
        None => choose_semester(catalogue).await?,
    };
    info!(semester = %semester.code, label = %semester.label(), "fetching results");

    let policy = RetryPolicy::from(&config.retry);
    info!(
        attempts = policy.attempts,
        delay_secs = policy.delay.as_secs(),
        status_policy = %policy.status_policy,
        workers = config.pool.workers,
        "portal client ready"
    );
    let fetcher = HttpFetcher::new(&config.portal, policy)?;
    let resolver = Resolver::new(Arc::new(fetcher), Endpoints::new(&config.portal)?);
    let options = PipelineOptions {
        workers: config.pool.workers,
        show_progress: !cli.no_progress && io::stderr().is_terminal(),
    };

    let outcome = run_pipeline(resolver, student_ids, &semester, &options)
        .await
        .context("result fetch aborted")?;
    info!(
        requested = outcome.requested,
        named = outcome.named,
        graded = outcome.graded(),
        "fetch complete"
    );

    let leaderboard = rank_records(outcome.records, config.report.top_n);
    print_leaderboard(&leaderboard, &semester, cli.output)
}

async fn choose_semester(catalogue: Vec<Semester>) -> Result<Semester> {
    tokio::task::spawn_blocking(move || {
        let stdin = io::stdin();
        prompt_semester(&catalogue, stdin.lock(), io::stderr())
    })
    .await
    .context("semester prompt task failed")?
}

fn handle_config_command(command: &Commands, config: &Config, config_path: &Path) -> Result<()> {
    let Commands::Config { init, show } = command else {
        return Ok(());
    };
    if *init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if *show || !*init {
        println!("{}", toml::to_string_pretty(config)?);
    }
    Ok(())
}

fn print_leaderboard(board: &Leaderboard, semester: &Semester, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(board)),
        OutputFormat::Table => println!("{}", render_leaderboard_table(board, semester)),
        OutputFormat::Json => println!("{}", render_leaderboard_json(board, semester)?),
        OutputFormat::Csv => print!("{}", leaderboard_to_csv(board)?),
    }
    Ok(())
}
