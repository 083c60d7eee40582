//! Terminal front end for the levee knowledge-base console.

use std::io::Read as _;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use console_logging::{console_info, console_warn};
use levee_api::{
    format_log_line, ApiClient, ApiSettings, BuildIndexRequest, ReportRequest, RequestContext,
};
use levee_app::config::ConsoleConfig;
use levee_app::dispatch::Dispatcher;
use levee_app::effects::EffectRunner;
use levee_app::logging;
use levee_app::render;
use levee_app::report_export;
use levee_app::runtime::{ConsoleHandle, TimerSettings};
use levee_app::session::{self, StoredSession};
use levee_core::{Msg, TrackerConfig, TrackerPhase, TrackerState};
use url::Url;

#[derive(Parser)]
#[command(
    name = "levee_console",
    about = "Terminal console for the levee flood knowledge base"
)]
struct Cli {
    /// Path to the RON config file
    #[arg(long, default_value = "levee.ron")]
    config: PathBuf,
    /// Mirror the log to the terminal as well as console.log
    #[arg(long)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Submit URLs for extraction and track the job to completion
    Extract {
        /// File with one URL per line; stdin when omitted
        input: Option<PathBuf>,
    },
    /// Generate a report and export it to the output directory
    Report {
        query: String,
        #[arg(long)]
        issuing_unit: Option<String>,
        #[arg(long)]
        report_date: Option<String>,
    },
    /// Build (or activate) the vector index of the knowledge base
    BuildIndex {
        #[arg(long)]
        index_id: Option<String>,
    },
    /// List the documents stored in the knowledge base
    Contents,
    /// Show server status and the service log tail
    Status,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.verbose);

    let config = ConsoleConfig::load(&cli.config);
    let base_url = Url::parse(&config.base_url)
        .with_context(|| format!("invalid base_url {}", config.base_url))?;
    let client = Arc::new(ApiClient::new(ApiSettings::new(base_url))?);

    let runtime = tokio::runtime::Runtime::new()?;
    let ctx = establish_context(&runtime, &client, &config);

    match cli.command.unwrap_or(Command::Extract { input: None }) {
        Command::Extract { input } => run_extract(client, ctx, &config, input.as_deref()),
        Command::Report {
            query,
            issuing_unit,
            report_date,
        } => run_report(&runtime, &client, &ctx, &config, query, issuing_unit, report_date),
        Command::BuildIndex { index_id } => {
            run_build_index(&runtime, &client, &ctx, &config, index_id)
        }
        Command::Contents => run_contents(&runtime, &client, &ctx, &config),
        Command::Status => run_status(&runtime, &client, &ctx),
    }
}

/// Logs in with the configured credentials, falls back to a saved session,
/// and goes anonymous when neither works.
fn establish_context(
    runtime: &tokio::runtime::Runtime,
    client: &ApiClient,
    config: &ConsoleConfig,
) -> RequestContext {
    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        match runtime.block_on(client.login(username, password)) {
            Ok(login) => {
                console_info!("Logged in as {}", login.user.username);
                session::save_session(
                    Path::new("."),
                    &StoredSession {
                        bearer_token: login.access_token.clone(),
                        username: login.user.username,
                    },
                );
                return RequestContext::with_token(login.access_token);
            }
            Err(err) => {
                console_warn!("Login failed, continuing anonymously: {}", err);
            }
        }
    }
    if let Some(session) = session::load_session(Path::new(".")) {
        console_info!("Reusing saved session for {}", session.username);
        return RequestContext::with_token(session.bearer_token);
    }
    RequestContext::anonymous()
}

fn run_extract(
    client: Arc<ApiClient>,
    ctx: RequestContext,
    config: &ConsoleConfig,
    input: Option<&Path>,
) -> anyhow::Result<()> {
    let text = read_url_input(input)?;

    let timers = TimerSettings {
        poll_delay: config.poll_delay(),
        backoff_delay: config.backoff_delay(),
        indicator_interval: config.indicator_interval(),
    };
    let (msg_tx, msg_rx) = mpsc::channel();
    let handle = ConsoleHandle::new(client, ctx, timers.clone());
    let runner = EffectRunner::new(handle, timers, msg_tx);
    let state = TrackerState::with_config(
        &config.kb_id,
        TrackerConfig {
            max_poll_cycles: config.max_poll_cycles,
        },
    );
    let mut dispatcher = Dispatcher::new(state, runner, msg_rx);

    dispatcher.dispatch(Msg::InputChanged(text));
    if dispatcher.dispatch(Msg::ExtractClicked) {
        print_frame(&dispatcher);
    }

    let deadline = extraction_deadline(config);
    while dispatcher.phase().is_active() {
        if Instant::now() > deadline {
            dispatcher.dispatch(Msg::CancelRequested);
            console_warn!(
                "Gave up at poll cycle {}",
                console_logging::get_poll_cycle()
            );
            bail!("gave up waiting for the extraction task");
        }
        if dispatcher.pump(Duration::from_millis(50)) {
            print_frame(&dispatcher);
        }
    }

    match dispatcher.phase() {
        TrackerPhase::Failed => bail!("extraction failed"),
        TrackerPhase::Idle => match dispatcher.view().error {
            Some(error) => bail!("{}", error),
            None => bail!("no URLs were submitted"),
        },
        _ => Ok(()),
    }
}

fn read_url_input(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read URLs from stdin")?;
            Ok(text)
        }
    }
}

fn print_frame(dispatcher: &Dispatcher) {
    println!("{}----", render::render(&dispatcher.view()));
}

/// Outer safety net; the tracker itself gives up after `max_poll_cycles`.
fn extraction_deadline(config: &ConsoleConfig) -> Instant {
    let worst_cycle_ms = config.poll_backoff_ms.max(config.poll_interval_ms) + 5_000;
    Instant::now() + Duration::from_millis(worst_cycle_ms * (config.max_poll_cycles + 5))
}

fn run_report(
    runtime: &tokio::runtime::Runtime,
    client: &ApiClient,
    ctx: &RequestContext,
    config: &ConsoleConfig,
    query: String,
    issuing_unit: Option<String>,
    report_date: Option<String>,
) -> anyhow::Result<()> {
    let request = ReportRequest {
        query: query.clone(),
        issuing_unit,
        report_date,
    };
    let generated = runtime.block_on(client.generate_report(ctx, &config.kb_id, &request))?;
    let path = report_export::export_report(&config.output_dir, &query, &generated.report)?;
    if let Some(id) = generated.id {
        console_info!("Report filed under history id {}", id);
    }
    println!("report written to {}", path.display());
    Ok(())
}

fn run_build_index(
    runtime: &tokio::runtime::Runtime,
    client: &ApiClient,
    ctx: &RequestContext,
    config: &ConsoleConfig,
    index_id: Option<String>,
) -> anyhow::Result<()> {
    let request = BuildIndexRequest {
        kb_id: config.kb_id.clone(),
        index_id,
    };
    let message = runtime.block_on(client.build_index(ctx, &request))?;
    println!("{}", message);
    Ok(())
}

fn run_contents(
    runtime: &tokio::runtime::Runtime,
    client: &ApiClient,
    ctx: &RequestContext,
    config: &ConsoleConfig,
) -> anyhow::Result<()> {
    let items = runtime.block_on(client.knowledge_base_contents(ctx, &config.kb_id))?;
    if items.is_empty() {
        println!("knowledge base {} holds no documents", config.kb_id);
        return Ok(());
    }
    println!("{} documents in {}:", items.len(), config.kb_id);
    for item in items {
        println!("  {}  {}  ({})", item.extracted_time, item.title, item.url);
    }
    Ok(())
}

fn run_status(
    runtime: &tokio::runtime::Runtime,
    client: &ApiClient,
    ctx: &RequestContext,
) -> anyhow::Result<()> {
    let status = runtime.block_on(client.system_status(ctx))?;
    let stats = &status.stats;
    println!("knowledge bases: {}", stats.knowledge_base_count);
    println!("indexed texts:   {}", stats.text_count);
    println!(
        "server:          {} {} ({})",
        stats.system_info.os, stats.system_info.version, stats.system_info.architecture
    );
    println!("last update:     {}", stats.last_update);
    if !status.logs.is_empty() {
        println!("recent log:");
        for line in &status.logs {
            println!("  {}", format_log_line(line));
        }
    }
    Ok(())
}
