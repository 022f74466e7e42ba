//! wpsclient CLI Entry Point
//!
//! Runs a WPS job file end to end: build, submit, poll, retrieve.
//!
//! # Usage
//!
//! ```bash
//! # Execute a job
//! wpsclient job.yaml
//!
//! # Print the Execute request without submitting it
//! wpsclient job.yaml --dry-run
//!
//! # Download reference outputs into a directory
//! wpsclient job.yaml --output-dir results/
//!
//! # Pick up polling of a job submitted earlier
//! wpsclient job.yaml --resume
//! ```

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use colored::Colorize;
use log::{error, info, warn};

use wpsclient::execution::{Execution, ExecutionState, OutputResult};
use wpsclient::job::{check_against_process, load_job, JobSpec};
use wpsclient::model::ExecutionStatus;
use wpsclient::request::build_execute_request;
use wpsclient::transport::ReqwestTransport;
use wpsclient::{WebProcessingService, APP_NAME, VERSION};

/// Default job file used when none is specified.
const DEFAULT_JOB: &str = "job.yaml";

/// Directory holding resume snapshots.
const STATE_DIR: &str = ".wpsclient";

/// Command-line configuration parsed from arguments.
#[derive(Debug)]
struct Config {
    job_path: String,
    dry_run: bool,
    output_dir: Option<PathBuf>,
    poll_interval: Option<u64>,
    max_polls: Option<u32>,
    resume: bool,
    describe: bool,
    json: bool,
    verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            job_path: DEFAULT_JOB.to_string(),
            dry_run: false,
            output_dir: None,
            poll_interval: None,
            max_polls: None,
            resume: false,
            describe: false,
            json: false,
            verbose: false,
        }
    }
}

/// Configures the logging system with appropriate formatting.
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            use std::io::Write;

            match record.level() {
                log::Level::Warn | log::Level::Error => {
                    writeln!(buf, "[{}] {}", record.level(), record.args())
                }
                _ => writeln!(buf, "{}", record.args()),
            }
        })
        .init();
}

/// Prints the application banner with version information.
fn print_banner() {
    println!();
    println!("{} v{}", APP_NAME.bold(), VERSION);
    println!("OGC Web Processing Service Client");
    println!();
}

/// Prints usage information.
fn print_usage() {
    println!("Usage: wpsclient [OPTIONS] <JOB_FILE>");
    println!();
    println!("Arguments:");
    println!("  <JOB_FILE>          Path to job YAML file (default: {})", DEFAULT_JOB);
    println!();
    println!("Options:");
    println!("  --dry-run           Print the Execute request without submitting it");
    println!("  --output-dir DIR    Download reference outputs into DIR");
    println!("  --poll SECS         Seconds between status polls (overrides the job file)");
    println!("  --max-polls N       Give up after N status polls");
    println!("  --resume            Resume polling a previously submitted job");
    println!("  --describe          Check inputs against DescribeProcess before executing");
    println!("  --json              Print the final result as JSON");
    println!("  --verbose           Enable debug logging");
    println!("  --help              Show this help message");
    println!("  --version           Show version information");
    println!();
    println!("Examples:");
    println!("  wpsclient statistics.yaml");
    println!("  wpsclient statistics.yaml --dry-run");
    println!("  wpsclient statistics.yaml --output-dir results --poll 10");
}

/// Returns the value following an option, advancing the cursor.
fn option_value<'a>(args: &'a [String], i: &mut usize, option: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{} requires an argument", option))
}

/// Parses command-line arguments into a Config struct.
fn parse_arguments(args: &[String]) -> Result<Config, String> {
    let mut config = Config::default();
    let mut positional_index = 0;
    let mut i = 1; // Skip program name

    while i < args.len() {
        let arg = &args[i];

        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("{} {}", APP_NAME, VERSION);
                std::process::exit(0);
            }
            "--dry-run" => config.dry_run = true,
            "--resume" => config.resume = true,
            "--describe" => config.describe = true,
            "--json" => config.json = true,
            "--verbose" | "-v" => config.verbose = true,
            "--output-dir" => {
                config.output_dir = Some(PathBuf::from(option_value(args, &mut i, arg)?));
            }
            "--poll" => {
                let value = option_value(args, &mut i, arg)?;
                config.poll_interval = Some(
                    value
                        .parse()
                        .map_err(|_| format!("Invalid poll interval: {}", value))?,
                );
            }
            "--max-polls" => {
                let value = option_value(args, &mut i, arg)?;
                config.max_polls = Some(
                    value
                        .parse()
                        .map_err(|_| format!("Invalid max polls value: {}", value))?,
                );
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            _ => {
                // Positional argument
                match positional_index {
                    0 => config.job_path = arg.clone(),
                    _ => return Err(format!("Unexpected argument: {}", arg)),
                }
                positional_index += 1;
            }
        }
        i += 1;
    }

    Ok(config)
}

/// Colours a status for terminal output.
fn paint_status(status: &ExecutionStatus) -> colored::ColoredString {
    let text = status.to_string();
    match status {
        ExecutionStatus::ProcessSucceeded => text.green().bold(),
        status if status.is_failed() => text.red().bold(),
        ExecutionStatus::Unknown(_) => text.magenta(),
        _ => text.yellow(),
    }
}

/// Submits the job, or picks up a saved one when resuming.
fn start_execution(
    service: &WebProcessingService,
    job: &JobSpec,
    state_key: &str,
    resume: bool,
) -> Result<Execution, Box<dyn std::error::Error>> {
    if resume {
        match ExecutionState::load(Path::new(STATE_DIR), state_key) {
            Ok(state) if state.is_resumable() => {
                info!("Resuming execution submitted at {}", state.created_at);
                return Ok(Execution::resume(&state, service.transport())
                    .with_credentials(job.credentials.clone()));
            }
            Ok(state) => warn!(
                "Saved execution is not resumable (status: {}), submitting again",
                state.status
            ),
            Err(e) => warn!("No saved execution to resume ({}), submitting again", e),
        }
    }

    let inputs = job.to_inputs()?;
    info!("Executing process '{}'", job.process);
    let execution = service.execute(&job.process, &inputs, job.output.as_deref(), None, None)?;
    Ok(execution)
}

/// Prints retrieved outputs.
fn print_results(results: &[OutputResult]) {
    println!();
    println!("{}", "Outputs:".bold());
    for result in results {
        match result {
            OutputResult::File { identifier, path, bytes } => {
                println!("  {} -> {} ({} bytes)", identifier, path.display(), bytes);
            }
            OutputResult::Inline { identifier, data, mime_type } => {
                let mime = mime_type.as_deref().unwrap_or("text/plain");
                println!("  {} [{}]: {}", identifier, mime, data);
            }
        }
    }
}

/// Main application entry point.
fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    // Parse arguments
    let config = parse_arguments(&args).map_err(|e| {
        eprintln!("Error: {}", e);
        eprintln!();
        print_usage();
        e
    })?;

    // Setup logging
    setup_logging(config.verbose);

    // Print banner
    if !config.json {
        print_banner();
    }

    // Load job
    let mut job = load_job(&config.job_path).map_err(|e| {
        error!("Failed to load job: {}", e);
        format!("Could not load job from '{}': {}", config.job_path, e)
    })?;

    if let Some(secs) = config.poll_interval {
        job.poll_interval = secs;
    }
    if config.max_polls.is_some() {
        job.max_polls = config.max_polls;
    }

    info!("Service: {}", job.url);
    info!("Process: {} ({} inputs)", job.process, job.inputs.len());

    if config.dry_run {
        info!("Mode: DRY RUN (request will not be submitted)");
        let inputs = job.to_inputs()?;
        let request = build_execute_request(&job.process, &inputs, job.output.as_deref());
        println!();
        println!("{}", request.to_xml_string()?);
        return Ok(());
    }

    let transport = Arc::new(ReqwestTransport::new()?);
    let mut service = WebProcessingService::new(job.url.clone(), transport)
        .with_version(job.version.clone())
        .with_credentials(job.credentials.clone());

    if config.describe {
        let process = service.describe_process(&job.process, None)?;
        let warnings = check_against_process(&job, &process);
        if warnings.is_empty() {
            info!("Inputs match the process description");
        }
    }

    let state_dir = Path::new(STATE_DIR);
    let state_key = ExecutionState::key_for_job(Path::new(&config.job_path));
    let mut execution = start_execution(&service, &job, &state_key, config.resume)?;

    let completed = if execution.is_complete()? {
        true
    } else {
        let state = execution.snapshot();
        if state.is_resumable() {
            state.save(state_dir, &state_key)?;
        }
        execution.wait_until_complete(job.poll_interval(), job.max_polls)?
    };

    if !completed {
        let state = execution.snapshot();
        state.save(state_dir, &state_key)?;
        return Err(format!(
            "Execution still {} after {} polls; run again with --resume",
            execution.status,
            job.max_polls.unwrap_or_default()
        )
        .into());
    }

    ExecutionState::delete(state_dir, &state_key)?;

    println!();
    println!("Status: {}", paint_status(&execution.status));
    for exception in &execution.errors {
        println!("  {} {}", "!".red(), exception);
    }

    let results = if execution.is_succeeded() {
        match &config.output_dir {
            Some(dir) => execution.get_output_in(dir)?,
            None => execution.get_output(None)?,
        }
    } else {
        Vec::new()
    };

    if config.json {
        let summary = serde_json::json!({
            "process": job.process,
            "status": execution.status,
            "errors": execution.errors,
            "outputs": results,
            "timeline": execution.timeline().events(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        if !results.is_empty() {
            print_results(&results);
        }
        println!("{}", execution.timeline().summary());
    }

    if !execution.is_succeeded() {
        return Err(format!("Process '{}' did not succeed", job.process).into());
    }

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
