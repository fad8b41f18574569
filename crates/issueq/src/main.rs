//! issueq
//!
//! A snapshot-driven CLI around the issue query engine: load a JSON export
//! of issues, filter and sort it like an issue list view, and print the result
//! for humans or machines.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::Parser;
use issueq::cli::{Cli, Commands, QueryArgs, UpdateArgs};
use issueq::commands::CommandExecutor;
use issueq::config::{EffectiveConfig, IssueqConfig};
use issueq::errors::{self, ActionableError};
use issueq::output::{
    format_issue_detail, format_issue_line, ErrorCode, ExitCode, IdsResponse, JsonError,
    JsonOutput, OutputContext, QueryResponse, ShowResponse, StatsResponse, UpdateResponse,
};
use issueq::query::QueryError;
use issueq::storage::JsonSnapshot;
use issueq::{calendar, schema};
use serde_json::json;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Classify an error into a JSON error code
fn error_code(error: &anyhow::Error) -> &'static str {
    if error.chain().any(|c| c.downcast_ref::<QueryError>().is_some()) {
        return ErrorCode::INVALID_QUERY;
    }

    let error_msg = error.to_string().to_lowercase();

    if error_msg.contains("invalid update") {
        ErrorCode::INVALID_ARGUMENT
    } else if error_msg.contains("snapshot not found") {
        ErrorCode::SNAPSHOT_NOT_FOUND
    } else if error_msg.contains("issue not found") || error_msg.contains("ambiguous id") {
        ErrorCode::ISSUE_NOT_FOUND
    } else if error.chain().any(|c| c.downcast_ref::<std::io::Error>().is_some())
        || error_msg.contains("failed to parse snapshot")
        || error_msg.contains("invalid snapshot")
    {
        ErrorCode::IO_ERROR
    } else {
        ErrorCode::GENERIC_ERROR
    }
}

/// Attach causes and remedies for the errors users can act on
fn actionable(error: &anyhow::Error, snapshot: Option<&Path>) -> ActionableError {
    if let Some(query_error) = error.chain().find_map(|c| c.downcast_ref::<QueryError>()) {
        return errors::invalid_query(query_error);
    }

    match (error_code(error), snapshot) {
        (ErrorCode::INVALID_ARGUMENT, _) => errors::invalid_update(&error.to_string()),
        (ErrorCode::SNAPSHOT_NOT_FOUND, Some(path)) => errors::snapshot_not_found(path),
        (ErrorCode::ISSUE_NOT_FOUND, _) if error.to_string().starts_with("Issue not found") => {
            let id = error
                .to_string()
                .trim_start_matches("Issue not found: ")
                .to_string();
            errors::issue_not_found(&id)
        }
        _ => ActionableError::new(format!("{:#}", error)),
    }
}

/// Structured details for errors that carry them
fn error_details(error: &anyhow::Error) -> Option<serde_json::Value> {
    match error.chain().find_map(|c| c.downcast_ref::<QueryError>())? {
        QueryError::InvalidQuery {
            field,
            value,
            expected,
        } => Some(json!({
            "field": field,
            "value": value,
            "expected": expected.split(", ").collect::<Vec<_>>(),
        })),
        QueryError::InvalidDate(value) => Some(json!({ "value": value, "expected": "YYYY-MM-DD" })),
    }
}

/// Print an error as a JSON envelope on stdout, or human-readable on stderr
fn report_error(
    json: bool,
    code: &str,
    command_name: &str,
    error: &anyhow::Error,
    hint: &ActionableError,
) {
    if json {
        let mut err = JsonError::new(code, format!("{:#}", error), command_name)
            .with_suggestions(hint.remedies().to_vec());
        if let Some(details) = error_details(error) {
            err = err.with_details(details);
        }
        match err.to_json_string() {
            Ok(text) => println!("{}", text),
            Err(_) => eprint!("{}", hint),
        }
    } else {
        eprint!("{}", hint);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("ISSUEQ_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (command_name, json_flag, snapshot) = describe(&cli.command);

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let hint = ActionableError::new(format!("{:#}", e))
                .with_remedy("Fix or remove the config file, or pass --config <file>");
            report_error(json_flag, ErrorCode::INVALID_ARGUMENT, command_name, &e, &hint);
            std::process::exit(ExitCode::InvalidArgument.code());
        }
    };

    let json = json_flag || (config.json && command_name != "schema");

    let exit_code = match run(&cli, config) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            let code = error_code(&e);
            let hint = actionable(&e, snapshot.as_deref());
            report_error(json, code, command_name, &e, &hint);
            ErrorCode::to_exit_code(code)
        }
    };

    if exit_code != ExitCode::Success {
        std::process::exit(exit_code.code());
    }
}

fn load_config(explicit: Option<&Path>) -> Result<EffectiveConfig> {
    let cwd = env::current_dir().context("Failed to determine current directory")?;
    let path = IssueqConfig::resolve_path(explicit, &cwd);
    debug!(path = %path.display(), "loading config");
    IssueqConfig::load(&path)?.effective()
}

/// Command name, `--json` flag and snapshot path, needed to report errors
fn describe(command: &Commands) -> (&'static str, bool, Option<PathBuf>) {
    match command {
        Commands::Query(args) => ("query", args.json, Some(args.source.snapshot.clone())),
        Commands::Show { source, json, .. } => ("show", *json, Some(source.snapshot.clone())),
        Commands::Stats { source, json, .. } => ("stats", *json, Some(source.snapshot.clone())),
        Commands::Update(args) => ("update", args.json, Some(args.source.snapshot.clone())),
        Commands::Schema => ("schema", false, None),
    }
}

fn resolve_today(arg: Option<&str>) -> Result<NaiveDate> {
    match arg {
        Some(value) => Ok(calendar::parse_date(value)?),
        None => Ok(Local::now().date_naive()),
    }
}

fn run(cli: &Cli, config: EffectiveConfig) -> Result<()> {
    match &cli.command {
        Commands::Query(args) => run_query(cli.quiet, args, config),

        Commands::Show { id, source, json } => {
            let output = OutputContext::new(cli.quiet, *json || config.json);
            let executor = CommandExecutor::with_config(JsonSnapshot::new(&source.snapshot), config);
            let issue = executor.show_issue(id)?;

            if output.is_json() {
                output.print_json(&JsonOutput::success(ShowResponse { issue }, "show"))?;
            } else {
                output.print_data(format_issue_detail(&issue))?;
            }
            Ok(())
        }

        Commands::Stats {
            source,
            today,
            json,
        } => {
            let output = OutputContext::new(cli.quiet, *json || config.json);
            let today = resolve_today(today.as_deref())?;
            let executor = CommandExecutor::with_config(JsonSnapshot::new(&source.snapshot), config);
            let stats = executor.stats(today)?;

            if output.is_json() {
                output.print_json(&JsonOutput::success(StatsResponse { today, stats }, "stats"))?;
            } else {
                output.print_info(format!("As of {}:", today))?;
                output.print_data(format!("total        {}", stats.total))?;
                output.print_data(format!("unassigned   {}", stats.unassigned))?;
                output.print_data(format!("confidential {}", stats.confidential))?;
                for entry in &stats.due_date {
                    output.print_data(format!("due:{:<10} {}", entry.bucket, entry.count))?;
                }
            }
            Ok(())
        }

        Commands::Update(args) => run_update(cli.quiet, args, config),

        Commands::Schema => {
            println!("{}", schema::snapshot_schema_json()?);
            Ok(())
        }
    }
}

fn run_query(quiet: bool, args: &QueryArgs, config: EffectiveConfig) -> Result<()> {
    let output = OutputContext::new(quiet, args.json || config.json);
    let today = resolve_today(args.today.as_deref())?;
    let executor = CommandExecutor::with_config(JsonSnapshot::new(&args.source.snapshot), config);

    let query = executor.parse_query(args.to_params())?;
    info!(sort = %query.sort, %today, "running query");
    let issues = executor.run_query(&query, today)?;

    if args.ids {
        let ids: Vec<String> = issues.iter().map(|i| i.id.clone()).collect();
        if output.is_json() {
            let count = ids.len();
            output.print_json(&JsonOutput::success(IdsResponse { ids, count }, "query"))?;
        } else {
            for id in &ids {
                output.print_data(id)?;
            }
        }
        return Ok(());
    }

    if output.is_json() {
        let response = QueryResponse {
            count: issues.len(),
            issues: issues.iter().map(|i| i.to_minimal()).collect(),
            query,
            today,
        };
        output.print_json(&JsonOutput::success(response, "query"))?;
    } else {
        for issue in &issues {
            output.print_data(format_issue_line(issue))?;
        }
        output.print_info(format!("{} issue(s)", issues.len()))?;
    }

    Ok(())
}

fn run_update(quiet: bool, args: &UpdateArgs, config: EffectiveConfig) -> Result<()> {
    let output = OutputContext::new(quiet, args.json || config.json);
    let update = args.to_update()?;
    let executor = CommandExecutor::with_config(JsonSnapshot::new(&args.source.snapshot), config);

    let (issue, changed) = executor.update_issue(&args.id, &update, Utc::now())?;
    info!(id = %issue.id, changed, "update finished");

    if output.is_json() {
        output.print_json(&JsonOutput::success(UpdateResponse { issue, changed }, "update"))?;
    } else if changed {
        output.print_info(format!("Updated issue {}", issue.short_id()))?;
        output.print_data(format_issue_detail(&issue))?;
    } else {
        output.print_info(format!("No changes to issue {}", issue.short_id()))?;
    }
    Ok(())
}
