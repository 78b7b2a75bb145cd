//! # Email Scout CLI
//!
//! Command-line interface for the Email Scout library (`email_scout_core`).
//! This binary parses arguments, sets up configuration, initializes the core
//! discovery logic, processes requests (single domain or from a file), and
//! handles output.

use email_scout_core::{
    discover_single, initialize_scout, process_requests, test_smtp_connectivity, Config,
    ConfigBuilder, DiscoveryOutcome, DiscoveryRequest, PatternSet,
};

// Dependencies specific to the CLI binary
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Discovers company email addresses.",
    long_about = "Email Scout combines website scraping, name-based pattern guessing and SMTP verification to find email addresses for a company domain."
)]
struct AppArgs {
    /// Path to the input JSON file containing discovery requests (file mode).
    #[arg(short, long, default_value = "input.json", env = "EMAIL_SCOUT_INPUT")]
    input: String,

    /// Path to the output JSON file where results will be saved.
    #[arg(
        short,
        long,
        default_value = "results.json",
        env = "EMAIL_SCOUT_OUTPUT"
    )]
    output: String,

    /// Domain or website URL to search (enables single-domain CLI mode).
    #[arg(long, env = "EMAIL_SCOUT_DOMAIN")]
    domain: Option<String>,

    /// Candidate full names ("First Last"), comma separated or repeated.
    #[arg(long, value_delimiter = ',', env = "EMAIL_SCOUT_NAMES")]
    names: Vec<String>,

    /// Print results to standard output instead of a file (single-domain mode).
    #[arg(long, default_value = "false", env = "EMAIL_SCOUT_STDOUT")]
    stdout: bool,

    /// Path to a configuration file (TOML). CLI args override file settings.
    #[arg(long, env = "EMAIL_SCOUT_CONFIG")]
    config_file: Option<String>,

    /// Maximum number of pages to fetch per domain.
    #[arg(long, env = "EMAIL_SCOUT_MAX_PAGES")]
    max_pages: Option<usize>,

    /// Disable SMTP verification of guessed addresses.
    #[arg(long, action = clap::ArgAction::SetTrue, env = "EMAIL_SCOUT_NO_VERIFY")]
    no_verify: bool,

    /// Pattern template set for guessing (basic or full).
    #[arg(long, env = "EMAIL_SCOUT_PATTERN_SET")]
    pattern_set: Option<PatternSet>,

    /// Maximum number of concurrent discovery tasks (file mode).
    #[arg(short, long, env = "EMAIL_SCOUT_CONCURRENCY")]
    concurrency: Option<usize>,

    /// Sender email address used in SMTP MAIL FROM probes.
    #[arg(long, env = "EMAIL_SCOUT_SMTP_SENDER")]
    smtp_sender: Option<String>,

    /// User agent string for HTTP scraping requests.
    #[arg(long, env = "EMAIL_SCOUT_USER_AGENT")]
    user_agent: Option<String>,

    /// SMTP connection/command timeout in seconds.
    #[arg(long, env = "EMAIL_SCOUT_SMTP_TIMEOUT")]
    smtp_timeout: Option<u64>,

    /// HTTP request timeout in seconds.
    #[arg(long, env = "EMAIL_SCOUT_REQUEST_TIMEOUT")]
    request_timeout: Option<u64>,

    /// DNS resolution timeout in seconds.
    #[arg(long, env = "EMAIL_SCOUT_DNS_TIMEOUT")]
    dns_timeout: Option<u64>,

    /// Comma-separated list of DNS servers to use for MX lookups.
    #[arg(long, value_delimiter = ',', env = "EMAIL_SCOUT_DNS_SERVERS")]
    dns_servers: Option<Vec<String>>,

    /// Skip the startup outbound port 25 connectivity probe.
    #[arg(long, action = clap::ArgAction::SetTrue, env = "EMAIL_SCOUT_SKIP_SMTP_CHECK")]
    skip_smtp_check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Setting up tracing subscriber failed")?;

    tracing::info!("Email Scout CLI v{} starting...", env!("CARGO_PKG_VERSION"));

    let args = AppArgs::parse();
    tracing::debug!("Parsed CLI arguments: {:?}", args);

    let mut config_builder = ConfigBuilder::new();

    if let Some(ref path) = args.config_file {
        config_builder = config_builder.config_file(path);
    }
    if let Some(pages) = args.max_pages {
        config_builder = config_builder.max_pages(pages);
    }
    if args.no_verify {
        config_builder = config_builder.verify_by_default(false);
    }
    if let Some(set) = args.pattern_set {
        config_builder = config_builder.pattern_set(set);
    }
    if let Some(c) = args.concurrency {
        config_builder = config_builder.max_concurrency(c);
    }
    if let Some(ref sender) = args.smtp_sender {
        config_builder = config_builder.smtp_sender_email(sender);
    }
    if let Some(ref ua) = args.user_agent {
        config_builder = config_builder.user_agent(ua);
    }
    if let Some(t) = args.smtp_timeout {
        config_builder = config_builder.smtp_timeout(Duration::from_secs(t));
    }
    if let Some(t) = args.request_timeout {
        config_builder = config_builder.request_timeout(Duration::from_secs(t));
    }
    if let Some(t) = args.dns_timeout {
        config_builder = config_builder.dns_timeout(Duration::from_secs(t));
    }
    if let Some(ref servers) = args.dns_servers {
        if !servers.is_empty() {
            config_builder = config_builder.dns_servers(servers.clone());
        }
    }

    let config = match config_builder.build() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            return Err(anyhow::anyhow!("Failed to build configuration: {}", e));
        }
    };
    tracing::debug!("Effective configuration loaded: {:?}", *config);

    let scout = match initialize_scout(&config).await {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!("Initialization error: {}", e);
            return Err(anyhow::anyhow!("Failed to initialize EmailScout core: {}", e));
        }
    };

    if config.verify_by_default && !args.skip_smtp_check {
        match test_smtp_connectivity().await {
            Ok(_) => tracing::info!(
                "SMTP connectivity test passed (outbound port 25 likely open)."
            ),
            Err(e) => {
                tracing::warn!("SMTP connectivity test failed: {}", e);
                tracing::warn!(
                    "SMTP verification may be unreliable. Use --no-verify to skip probing."
                );
            }
        }
    }

    let is_cli_mode = args.domain.is_some();
    let start_time = Instant::now();

    let execution_result = if is_cli_mode {
        process_cli_mode(&config, &scout, &args).await
    } else {
        process_file_mode(config.clone(), scout, &args, start_time).await
    };

    if let Err(e) = execution_result {
        tracing::error!("Execution failed: {}", e);
        return Err(e);
    }

    if !is_cli_mode {
        tracing::info!(
            "Processing finished successfully. Total duration: {:.2?}",
            start_time.elapsed()
        );
    }

    Ok(())
}

async fn process_cli_mode(
    config: &Config,
    scout: &email_scout_core::EmailScout,
    args: &AppArgs,
) -> Result<()> {
    tracing::info!("Running in single-domain CLI mode.");
    let start_time = Instant::now();
    let domain_input = args.domain.as_ref().cloned().unwrap_or_default();

    let names: Vec<String> = args
        .names
        .iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();

    let request = DiscoveryRequest {
        domain: Some(domain_input.clone()),
        names,
        ..DiscoveryRequest::default()
    };

    tracing::info!(
        "Discovering addresses for domain '{}' ({} candidate names)",
        domain_input,
        request.names.len()
    );

    let outcome = discover_single(config, scout, request).await;

    if args.stdout {
        print_cli_results(&outcome);
    } else {
        tracing::info!("Saving result to '{}'...", args.output);
        save_results(&[outcome], &args.output)?;
        tracing::info!("Result saved successfully to '{}'.", args.output);
    }
    tracing::info!("CLI mode finished. Duration: {:.2?}", start_time.elapsed());
    Ok(())
}

async fn process_file_mode(
    config: Arc<Config>,
    scout: Arc<email_scout_core::EmailScout>,
    args: &AppArgs,
    start_time: Instant,
) -> Result<()> {
    tracing::info!(
        "Running in file processing mode. Input: '{}', Output: '{}'",
        args.input,
        args.output
    );
    let input_path = Path::new(&args.input);
    let output_path = Path::new(&args.output);

    if !input_path.exists() || !input_path.is_file() {
        return Err(anyhow::anyhow!(
            "Input file not found or is not a file: {}",
            args.input
        ));
    }
    if let Some(parent_dir) = output_path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            std::fs::create_dir_all(parent_dir).with_context(|| {
                format!(
                    "Failed to create output directory '{}'",
                    parent_dir.display()
                )
            })?;
        }
    }
    File::create(&args.output).with_context(|| {
        format!(
            "Cannot write to output file '{}'. Check permissions.",
            args.output
        )
    })?;

    tracing::info!("Loading requests from '{}'...", args.input);
    let requests = load_requests(&args.input)?;
    let total_loaded = requests.len();
    if total_loaded == 0 {
        tracing::warn!(
            "Input file '{}' is empty or contains no valid requests. Saving empty results file.",
            args.input
        );
        save_results(&[], &args.output)?;
        return Ok(());
    }
    tracing::info!("Loaded {} records from input file.", total_loaded);

    tracing::info!(
        "Starting email discovery for {} records (concurrency: {})...",
        total_loaded,
        config.max_concurrency
    );
    let pb = ProgressBar::new(total_loaded as u64);
    pb.set_style(ProgressStyle::default_bar()
         .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) | ETA: {eta} | {msg}")
         .context("Failed to set progress bar template")?
         .progress_chars("=> "));
    pb.set_message("Processing requests...");

    let mut results = process_requests(config.clone(), scout, requests).await;

    pb.set_position(results.len() as u64);
    pb.finish_with_message(format!("Processed {} records", results.len()));

    results.sort_by(|a, b| {
        let domain_a = a.request.domain.as_deref().unwrap_or("");
        let domain_b = b.request.domain.as_deref().unwrap_or("");
        domain_a.cmp(domain_b)
    });

    tracing::info!("Saving results to '{}'...", args.output);
    save_results(&results, &args.output)?;
    tracing::info!("Results saved successfully.");

    log_summary(&results, total_loaded, start_time.elapsed());

    Ok(())
}

fn load_requests(file_path: &str) -> Result<Vec<DiscoveryRequest>> {
    let file = File::open(file_path)
        .with_context(|| format!("Failed to open input file '{}'", file_path))?;
    let reader = BufReader::new(file);

    let records: Vec<DiscoveryRequest> = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse JSON from '{}'. Ensure it's an array of request objects.",
            file_path
        )
    })?;

    Ok(records)
}

/// Saves the processed results to the specified JSON file.
fn save_results(results: &[DiscoveryOutcome], file_path: &str) -> Result<()> {
    let file = File::create(file_path)
        .with_context(|| format!("Failed to create/truncate output file '{}'", file_path))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, results)
        .with_context(|| format!("Failed to serialize results to JSON for '{}'", file_path))?;

    Ok(())
}

/// Logs a summary of the processing results to the console.
fn log_summary(results: &[DiscoveryOutcome], original_total: usize, duration: Duration) {
    let processed = results.len();
    let with_addresses = results.iter().filter(|r| !r.emails.is_empty()).count();
    let empty = results
        .iter()
        .filter(|r| !r.skipped && r.error.is_none() && r.emails.is_empty())
        .count();
    let skipped = results.iter().filter(|r| r.skipped).count();
    let errors = results.iter().filter(|r| r.error.is_some()).count();

    tracing::info!("-------------------- Processing Summary --------------------");
    tracing::info!("Total Records in Input File : {}", original_total);
    tracing::info!("Records Processed/Attempted : {}", processed);
    tracing::info!("  - Domains With Addresses  : {}", with_addresses);
    tracing::info!("  - Domains Without Results : {}", empty);
    tracing::info!("  - Skipped (Invalid Input) : {}", skipped);
    tracing::info!("  - Errors During Processing: {}", errors);
    tracing::info!("Total Time Taken            : {:.2?}", duration);
    if duration.as_secs_f64() > 0.01 && processed > 0 {
        let rate = (processed as f64) / duration.as_secs_f64();
        tracing::info!("Processing Rate             : {:.2} records/sec", rate);
    }
    tracing::info!("----------------------------------------------------------");
}

/// Prints results for a single domain to standard output (CLI mode).
fn print_cli_results(outcome: &DiscoveryOutcome) {
    const BLUE: &str = "\x1b[34m";
    const GREEN: &str = "\x1b[32m";
    const YELLOW: &str = "\x1b[33m";
    const RED: &str = "\x1b[31m";
    const RESET: &str = "\x1b[0m";

    println!("\n{BLUE}===== Email Scout Results ====={RESET}");
    println!(
        "Domain: {}",
        outcome.request.domain.as_deref().unwrap_or("N/A")
    );

    if outcome.skipped {
        println!("\n{YELLOW}Status: SKIPPED{RESET}");
        println!(
            "Reason: {}",
            outcome.skip_reason.as_deref().unwrap_or("Unknown")
        );
    } else if let Some(error) = &outcome.error {
        println!("\n{RED}Status: ERROR{RESET}");
        println!("Error:  {}", error);
    } else if outcome.emails.is_empty() {
        println!("\n{YELLOW}Status: NO ADDRESSES FOUND{RESET}");
    } else {
        println!("\n{GREEN}Status: SUCCESS{RESET}");
        println!("Addresses ({}):", outcome.emails.len());
        for email in &outcome.emails {
            let marker = outcome
                .report
                .as_ref()
                .and_then(|report| report.found.iter().find(|f| &f.email == email))
                .map(|f| match (f.source, f.verified) {
                    (_, Some(true)) => " (verified)",
                    (email_scout_core::AddressSource::Scraped, _) => " (scraped)",
                    (email_scout_core::AddressSource::Guessed, _) => " (guessed)",
                })
                .unwrap_or_default();
            println!("- {GREEN}{}{RESET}{}", email, marker);
        }
    }

    if let Some(ref report) = outcome.report {
        match report.domain_status {
            email_scout_core::DomainStatus::CatchAll => {
                println!(
                    "\n{YELLOW}Note: domain is a catch-all; guessed addresses could not be verified.{RESET}"
                );
            }
            email_scout_core::DomainStatus::NoMailServer => {
                println!(
                    "\n{YELLOW}Note: domain has no MX records; guessed addresses were dropped.{RESET}"
                );
            }
            _ => {}
        }
        if !report.pages_visited.is_empty() {
            println!("\n{BLUE}Pages visited:{RESET}");
            for page in &report.pages_visited {
                println!("- {}", page);
            }
        }
        if !report.methods_used.is_empty() {
            println!("Methods: {}", report.methods_used.join(", "));
        }
    }

    println!("{BLUE}=============================={RESET}\n");
}
