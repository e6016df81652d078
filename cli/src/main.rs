//! Logscope CLI
//!
//! Terminal front end for the log search platform.
//!
//! # Usage
//!
//! ```bash
//! logscope --help
//! logscope health
//! logscope search "login and abc123" --range 15m
//! logscope search timeout --range yesterday --level error --service user-service
//! logscope search --from 2024-01-15T08:00:00Z --to 2024-01-15T09:00:00Z --analyze
//! logscope analyze abc123
//! logscope interactive
//! ```

#![deny(unsafe_code)]

mod interactive;
mod range;
mod render;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use clap::{Args, Parser, Subcommand};
use client::{
    AnalysisController, ClientConfig, Completion, HttpSearchApi, Notification, SearchApi,
    SearchController, DEFAULT_API_BASE, DEFAULT_SERVER_URL, DEFAULT_TIMEOUT_SECS,
};
use serde::Serialize;
use shared::models::{Filters, LogLevel, LogRecord, DEFAULT_PAGE_SIZE, DEFAULT_SORT_FIELD};
use shared::session::{SearchEvent, SessionState};
use shared::time::TimeRange;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

/// Logscope CLI - search logs and analyse traces from the terminal
#[derive(Parser, Debug)]
#[command(name = "logscope")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Search server origin
    #[arg(short, long, env = "LOGSCOPE_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,

    /// API root, absolute or relative to the server origin
    #[arg(long, env = "LOGSCOPE_API_BASE_URL", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Request timeout in seconds
    #[arg(long, env = "LOGSCOPE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check API server health
    Health,
    /// List searchable fields
    Fields,
    /// List services that have sent logs
    Services,
    /// Search logs
    Search(SearchArgs),
    /// Ask the AI service to explain the errors of a trace
    Analyze {
        /// Trace to analyse
        trace_id: String,
    },
    /// Start an interactive search session
    Interactive {
        #[command(flatten)]
        time: TimeArgs,

        #[command(flatten)]
        filters: FilterArgs,
    },
}

/// Time window selection.
#[derive(Args, Debug, Default)]
struct TimeArgs {
    /// Relative window or calendar shortcut (15m, 1h, 7d, today, yesterday, lastweek, ...)
    #[arg(short, long, conflicts_with_all = ["from", "to"])]
    range: Option<String>,

    /// Start of a custom window (RFC 3339 or YYYY-MM-DDTHH:MM local)
    #[arg(long)]
    from: Option<String>,

    /// End of a custom window
    #[arg(long)]
    to: Option<String>,
}

impl TimeArgs {
    /// Defaults to the last 15 minutes when nothing is given.
    fn resolve<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<TimeRange> {
        let tokens: Vec<&str> = match &self.range {
            Some(range) => vec![range.as_str()],
            None => [&self.from, &self.to]
                .into_iter()
                .flatten()
                .map(String::as_str)
                .collect(),
        };

        if tokens.is_empty() {
            return Ok(TimeRange::default());
        }
        range::parse_selection(&tokens, now)
    }
}

/// Structured filters.
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Only records of this level (ERROR, WARN, INFO, DEBUG)
    #[arg(short, long)]
    level: Option<LogLevel>,

    /// Only records from this service
    #[arg(long)]
    service: Option<String>,

    /// Only records from this environment
    #[arg(short, long)]
    env: Option<String>,
}

impl FilterArgs {
    fn filters(&self) -> Filters {
        let mut filters = Filters::new();
        if let Some(level) = self.level {
            filters = filters.with_level(level);
        }
        if let Some(service) = &self.service {
            filters = filters.with_service(service);
        }
        if let Some(env) = &self.env {
            filters = filters.with_env(env);
        }
        filters
    }
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Query text; and/or/not are operators in any case. Empty matches everything
    query: Vec<String>,

    #[command(flatten)]
    time: TimeArgs,

    #[command(flatten)]
    filters: FilterArgs,

    /// Page to fetch, 1-based
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,

    /// Records per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..=1000))]
    page_size: u32,

    /// Field to sort by
    #[arg(long, default_value = DEFAULT_SORT_FIELD)]
    sort_by: String,

    /// Oldest first
    #[arg(long)]
    asc: bool,

    /// Run AI analysis on the first trace of the page
    #[arg(long)]
    analyze: bool,

    /// Print the page as JSON
    #[arg(long, conflicts_with = "analyze")]
    json: bool,
}

impl SearchArgs {
    /// Session positioned on the requested page, plus the event that fetches it.
    fn session(&self, time_range: TimeRange) -> (SessionState, SearchEvent) {
        let state = SessionState::new(time_range)
            .with_sort(self.sort_by.as_str(), !self.asc)
            .apply(SearchEvent::FiltersChanged(self.filters.filters()))
            .apply(SearchEvent::Submit {
                query: self.query.join(" "),
                time_range,
            });
        let event = SearchEvent::PageChanged {
            page: self.page,
            page_size: self.page_size,
        };
        (state, event)
    }
}

/// Page of results as printed by `search --json`.
#[derive(Serialize)]
struct JsonPage<'a> {
    total: u64,
    took_ms: u64,
    page: u32,
    page_size: u32,
    hits: &'a [LogRecord],
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Logscope CLI v{}", env!("CARGO_PKG_VERSION"));
        println!("Use --help for usage information");
        return Ok(ExitCode::SUCCESS);
    };

    let config = ClientConfig::new(
        &cli.server_url,
        &cli.api_base,
        Duration::from_secs(cli.timeout),
    )
    .context("Invalid client configuration")?;
    tracing::debug!(api_base = %config.api_base, "Using search API");

    let api: Arc<dyn SearchApi> = Arc::new(HttpSearchApi::new(config)?);

    match command {
        Commands::Health => health(api.as_ref()).await,
        Commands::Fields => Ok(lookup("fields", api.fields().await)),
        Commands::Services => Ok(lookup("services", api.services().await)),
        Commands::Search(args) => search(api, &args).await,
        Commands::Analyze { trace_id } => {
            let mut analysis = AnalysisController::new(api);
            let code = report_analysis(analysis.analyze(&trace_id).await);
            Ok(code)
        }
        Commands::Interactive { time, filters } => {
            let time_range = time.resolve(&Local::now())?;
            let state = SessionState::new(time_range)
                .apply(SearchEvent::FiltersChanged(filters.filters()));
            interactive::run(api, state).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn health(api: &dyn SearchApi) -> Result<ExitCode> {
    match api.health().await {
        Ok(health) if health.is_healthy() => {
            println!("Server is {}", health.status);
            Ok(ExitCode::SUCCESS)
        }
        Ok(health) => {
            println!("Server reports status '{}'", health.status);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            eprintln!("{}", Notification::from_error("Health check", &e));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn lookup(title: &str, result: Result<Vec<String>, client::ClientError>) -> ExitCode {
    match result {
        Ok(items) => {
            println!("{}", render::listing(title, &items));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", Notification::from_error(&format!("Listing {title}"), &e));
            ExitCode::FAILURE
        }
    }
}

async fn search(api: Arc<dyn SearchApi>, args: &SearchArgs) -> Result<ExitCode> {
    let time_range = match args.time.resolve(&Local::now()) {
        Ok(time_range) => time_range,
        Err(e) => {
            eprintln!("warning: {e:#}; search not sent");
            return Ok(ExitCode::FAILURE);
        }
    };

    let (state, event) = args.session(time_range);
    let mut controller = SearchController::with_state(Arc::clone(&api), state);

    if controller.search(event).await == Completion::Failed {
        if let Some(notification) = &controller.view().notification {
            eprintln!("{notification}");
        }
        return Ok(ExitCode::FAILURE);
    }

    let view = controller.view();
    if args.json {
        let page = JsonPage {
            total: view.total,
            took_ms: view.took_ms,
            page: view.page,
            page_size: view.page_size,
            hits: &view.hits,
        };
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(ExitCode::SUCCESS);
    }

    print!("{}", render::search_results(view, &Local));

    if args.analyze {
        let mut analysis = AnalysisController::new(api);
        println!();
        return Ok(report_analysis(analysis.analyze_page(&view.hits).await));
    }

    Ok(ExitCode::SUCCESS)
}

fn report_analysis(view: &client::AnalysisView) -> ExitCode {
    match &view.notification {
        Some(notification) => {
            eprintln!("{notification}");
            ExitCode::FAILURE
        }
        None => {
            println!("{}", render::analysis(view));
            ExitCode::SUCCESS
        }
    }
}
