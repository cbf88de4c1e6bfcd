mod logging;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use logging::{LoggingError, init_logging};
use rafflegen_generate::{
    AccountCounts, AccountKind, AmountPolicy, GenerateOptions, GenerationError, GenerationReport,
    RaffleGenerator,
};
use rafflegen_validate::{
    AmountOutcome, RosterReport, ValidationError, check_amounts_file, validate_roster_file,
};
use serde_json::json;
use settings::{
    DEFAULT_SETTINGS_PATH, GeneratorSettings, SettingsError, load_or_create_settings,
    reset_settings, save_settings,
};
use thiserror::Error;
use tokio::task::{JoinError, spawn_blocking};

#[derive(Debug, Error)]
enum CliError {
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("background task failed: {0}")]
    Task(#[from] JoinError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "rafflegen",
    version,
    about = "RaffleManager saved-variables fixture generator"
)]
struct Cli {
    /// Settings file holding generator defaults.
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_PATH)]
    config: PathBuf,
    /// Append JSON log events to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a saved-variables file.
    Generate(GenerateArgs),
    /// Check that 10-day roster counters never exceed 30-day counters.
    ValidateRoster(CheckArgs),
    /// Report how many mail amounts buy whole tickets.
    CheckAmounts(CheckArgs),
    /// Run both checks on one file.
    Validate(CheckArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Blank accounts (settings only).
    #[arg(default_value_t = 0, allow_negative_numbers = true)]
    blank: i64,
    /// Roster-only accounts.
    #[arg(default_value_t = 0, allow_negative_numbers = true)]
    roster: i64,
    /// Mail-only accounts.
    #[arg(default_value_t = 0, allow_negative_numbers = true)]
    mail: i64,
    /// Accounts with both roster and mail data.
    #[arg(default_value_t = 0, allow_negative_numbers = true)]
    mixed: i64,
    /// Gold per raffle ticket.
    #[arg(long, allow_negative_numbers = true)]
    ticket_cost: Option<i64>,
    /// Output file; a numeric suffix is added if it exists.
    #[arg(long, short = 'f')]
    filename: Option<String>,
    /// Roster entries per roster or mixed account.
    #[arg(long, allow_negative_numbers = true)]
    roster_entries: Option<i64>,
    /// Mail entries per mail or mixed account.
    #[arg(long, allow_negative_numbers = true)]
    mail_entries: Option<i64>,
    /// Restore the settings file to its defaults before generating.
    #[arg(long, default_value_t = false)]
    reset_defaults: bool,
    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Share of mail amounts that are whole multiples of the ticket cost.
    #[arg(long)]
    valid_ratio: Option<f64>,
    /// Largest remainder added to an invalid amount.
    #[arg(long, allow_negative_numbers = true)]
    max_offset: Option<i64>,
    /// Write a JSON generation report to this path.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Saved-variables file to check.
    file: PathBuf,
    /// Print the report as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(event = "command_failed", error = %err);
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    init_logging(cli.log_file.as_deref())?;

    let passed = match cli.command {
        Command::Generate(args) => run_generate(cli.config, args).await?,
        Command::ValidateRoster(args) => run_validate_roster(args).await?,
        Command::CheckAmounts(args) => run_check_amounts(args).await?,
        Command::Validate(args) => run_validate(args).await?,
    };
    Ok(exit_code(passed))
}

/// Settings are only rewritten once the requested run has been validated.
async fn run_generate(config: PathBuf, args: GenerateArgs) -> Result<bool, CliError> {
    if args.reset_defaults && [args.blank, args.roster, args.mail, args.mixed] == [0; 4] {
        reset_settings(&config)?;
        tracing::info!(event = "settings_reset", path = %config.display());
        println!("Settings reset to defaults in {}", config.display());
        return Ok(true);
    }

    let mut settings = if args.reset_defaults {
        GeneratorSettings::default()
    } else {
        load_or_create_settings(&config)?
    };
    let (options, filename) = resolve_generate(&args, &settings)?;
    if args.reset_defaults {
        reset_settings(&config)?;
        tracing::info!(event = "settings_reset", path = %config.display());
    }
    let requested = PathBuf::from(&filename);
    tracing::info!(
        event = "generate_requested",
        accounts = options.counts.total(),
        ticket_cost = options.ticket_cost,
        output = %requested.display()
    );

    let task_options = options.clone();
    let report = spawn_blocking(move || -> Result<GenerationReport, GenerationError> {
        RaffleGenerator::new(task_options)?.write_file(&requested)
    })
    .await??;

    print_generation(&report);
    if let Some(path) = &args.report {
        report.write_json(path)?;
        tracing::info!(event = "report_written", path = %path.display());
    }

    settings.record_run(&options, &filename);
    save_settings(&config, &settings)?;
    Ok(true)
}

/// Merge command-line values over the persisted defaults.
fn resolve_generate(
    args: &GenerateArgs,
    settings: &GeneratorSettings,
) -> Result<(GenerateOptions, String), CliError> {
    if [args.blank, args.roster, args.mail, args.mixed]
        .iter()
        .any(|count| *count < 0)
    {
        return Err(CliError::InvalidConfig(
            "all account counts must be non-negative".to_string(),
        ));
    }

    let counts = AccountCounts {
        blank: to_u32("blank account count", args.blank)?,
        roster: to_u32("roster account count", args.roster)?,
        mail: to_u32("mail account count", args.mail)?,
        mixed: to_u32("mixed account count", args.mixed)?,
    };
    let roster_entries = match args.roster_entries {
        Some(value) => positive_u32("roster entries", value)?,
        None => settings.roster_entries_per_account,
    };
    let mail_entries = match args.mail_entries {
        Some(value) => positive_u32("mail entries", value)?,
        None => settings.mail_entries_per_account,
    };
    let defaults = AmountPolicy::default();
    let amount_policy = AmountPolicy {
        valid_ratio: args.valid_ratio.unwrap_or(defaults.valid_ratio),
        max_offset: args.max_offset.or(defaults.max_offset),
    };

    let options = GenerateOptions {
        counts,
        ticket_cost: args.ticket_cost.unwrap_or(settings.default_ticket_cost),
        roster_entries,
        mail_entries,
        amount_policy,
        seed: args.seed,
        now: None,
    };
    options.validate()?;

    let filename = args
        .filename
        .clone()
        .unwrap_or_else(|| settings.default_output_filename.clone());
    Ok((options, filename))
}

fn to_u32(label: &str, value: i64) -> Result<u32, CliError> {
    u32::try_from(value)
        .map_err(|_| CliError::InvalidConfig(format!("{label} is out of range: {value}")))
}

fn positive_u32(label: &str, value: i64) -> Result<u32, CliError> {
    if value <= 0 {
        return Err(CliError::InvalidConfig(format!("{label} must be positive")));
    }
    to_u32(label, value)
}

fn print_generation(report: &GenerationReport) {
    let accounts = &report.summary.accounts;
    println!(
        "Generated {} with {} accounts:",
        report.output.display(),
        report.summary.total_accounts()
    );
    for kind in AccountKind::ALL {
        println!("  - {} {} accounts", accounts.get(kind), kind.label());
    }
}

async fn run_validate_roster(args: CheckArgs) -> Result<bool, CliError> {
    if !args.json {
        println!("Validating {}...", args.file.display());
    }
    let file = args.file.clone();
    let report = spawn_blocking(move || validate_roster_file(&file)).await??;
    print_roster(&report, args.json)?;
    Ok(report.is_consistent())
}

async fn run_check_amounts(args: CheckArgs) -> Result<bool, CliError> {
    let file = args.file.clone();
    let outcome = spawn_blocking(move || check_amounts_file(&file)).await??;
    print_amounts(&outcome, args.json)?;
    Ok(outcome.completed())
}

async fn run_validate(args: CheckArgs) -> Result<bool, CliError> {
    let roster_file = args.file.clone();
    let amounts_file = args.file.clone();
    let (roster, amounts) = tokio::join!(
        spawn_blocking(move || validate_roster_file(&roster_file)),
        spawn_blocking(move || check_amounts_file(&amounts_file)),
    );
    let roster = roster??;
    let amounts = amounts??;
    let passed = roster.is_consistent() && amounts.completed();
    tracing::info!(
        event = "validation_finished",
        path = %args.file.display(),
        roster_entries = roster.entries,
        violations = roster.violations.len(),
        passed
    );

    if args.json {
        let combined = json!({ "roster": roster, "amounts": amounts, "passed": passed });
        println!("{}", serde_json::to_string_pretty(&combined)?);
    } else {
        println!("Validating {}...", args.file.display());
        print_roster(&roster, false)?;
        println!();
        print_amounts(&amounts, false)?;
    }
    Ok(passed)
}

fn print_roster(report: &RosterReport, as_json: bool) -> Result<(), CliError> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

fn print_amounts(outcome: &AmountOutcome, as_json: bool) -> Result<(), CliError> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else {
        print!("{outcome}");
    }
    Ok(())
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
