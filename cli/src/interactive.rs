//! Line-oriented interactive session.
//!
//! Free text is submitted as a query; lines starting with `:` are commands.
//! Searches run on spawned tasks so typing stays responsive, and only the
//! response to the most recent search is shown.

use crate::{range, render};
use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Local, TimeZone};
use client::{
    AnalysisController, Completion, Notification, SearchApi, SearchController, SearchOutcome,
};
use shared::models::{Filters, LogLevel};
use shared::session::{SearchEvent, SessionState};
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinHandle};

/// Help text printed on start and for `:help`.
pub const HELP: &str = "\
<text>                      search for <text> in the current time range
:range <key|shortcut>       15m, 1h, 7d, today, yesterday, lastweek, ...
:range <start> <end>        custom window (RFC 3339 or YYYY-MM-DDTHH:MM)
:level [ERROR|WARN|INFO|DEBUG]   filter by level (no argument clears)
:service [name]             filter by service (no argument clears)
:env [name]                 filter by environment (no argument clears)
:reset                      clear all filters
:page <n> [size]            go to page n
:next / :prev               next or previous page
:analyze [trace_id]         AI analysis (defaults to the first trace on the page)
:fields / :services         list searchable fields or known services
:help                       show this text
:quit                       leave";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Free-text query.
    Search(String),
    /// New time range, as raw tokens.
    Range(Vec<String>),
    /// Level filter; `None` clears it.
    Level(Option<LogLevel>),
    /// Service filter; empty clears it.
    Service(String),
    /// Environment filter; empty clears it.
    Env(String),
    /// Clear all filters.
    Reset,
    /// Jump to a page, optionally changing the page size.
    Page {
        /// Target page.
        page: u32,
        /// New page size, if given.
        page_size: Option<u32>,
    },
    /// Next page.
    Next,
    /// Previous page.
    Prev,
    /// Analyse a trace, or the first one on the page.
    Analyze(Option<String>),
    /// List fields.
    Fields,
    /// List services.
    Services,
    /// Print help.
    Help,
    /// Leave the session.
    Quit,
}

/// What the session does with a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Dispatch a search.
    Search(SearchEvent),
    /// Request AI analysis.
    Analyze(Option<String>),
    /// Print the field list.
    Fields,
    /// Print the service list.
    Services,
    /// Print help.
    Help,
    /// Leave.
    Quit,
}

/// Parses one input line. Blank lines yield `None`.
///
/// # Errors
///
/// Fails for unknown commands and malformed arguments.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Some(Command::Search(line.to_string())));
    };

    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    let command = match (name, args.as_slice()) {
        ("range", tokens) if !tokens.is_empty() => {
            Command::Range(tokens.iter().map(ToString::to_string).collect())
        }
        ("range", _) => bail!("Usage: :range <key|shortcut> or :range <start> <end>"),
        ("level", []) => Command::Level(None),
        ("level", [level]) => Command::Level(Some(level.parse()?)),
        ("service", words) => Command::Service(words.join(" ")),
        ("env", words) => Command::Env(words.join(" ")),
        ("reset", []) => Command::Reset,
        ("page", [page]) => Command::Page {
            page: parse_number(page)?,
            page_size: None,
        },
        ("page", [page, size]) => Command::Page {
            page: parse_number(page)?,
            page_size: Some(parse_number(size)?),
        },
        ("next", []) => Command::Next,
        ("prev", []) => Command::Prev,
        ("analyze", []) => Command::Analyze(None),
        ("analyze", [trace_id]) => Command::Analyze(Some((*trace_id).to_string())),
        ("fields", []) => Command::Fields,
        ("services", []) => Command::Services,
        ("help", []) => Command::Help,
        ("quit" | "q" | "exit", []) => Command::Quit,
        _ => bail!("Unknown command ':{rest}'. Type :help for the list of commands"),
    };

    Ok(Some(command))
}

fn parse_number(word: &str) -> Result<u32> {
    word.parse()
        .with_context(|| format!("'{word}' is not a positive number"))
}

/// Turns a command into an action against the current session.
///
/// Time-range tokens are resolved against `now`.
///
/// # Errors
///
/// Fails when a time range cannot be resolved or there is no page to move to.
pub fn action_for<Tz: TimeZone>(
    command: Command,
    search: &SearchController,
    now: &DateTime<Tz>,
) -> Result<Action> {
    let state = search.state();
    let filters = state.filters();

    let event = match command {
        Command::Search(query) => SearchEvent::Submit {
            query,
            time_range: *state.time_range(),
        },
        Command::Range(tokens) => {
            let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();
            let time_range = range::parse_selection(&tokens, now)
                .context("Time range not applied; search not sent")?;
            SearchEvent::Submit {
                query: state.query().to_string(),
                time_range,
            }
        }
        Command::Level(level) => SearchEvent::FiltersChanged(Filters {
            level,
            ..filters.clone()
        }),
        Command::Service(service) => SearchEvent::FiltersChanged(filters.clone().with_service(service)),
        Command::Env(env) => SearchEvent::FiltersChanged(filters.clone().with_env(env)),
        Command::Reset => SearchEvent::FiltersReset,
        Command::Page { page, page_size } => SearchEvent::PageChanged {
            page,
            page_size: page_size.unwrap_or(state.page_size()),
        },
        Command::Next => search
            .next_page()
            .ok_or_else(|| anyhow!("Already on the last page"))?,
        Command::Prev => search
            .previous_page()
            .ok_or_else(|| anyhow!("Already on the first page"))?,
        Command::Analyze(trace_id) => return Ok(Action::Analyze(trace_id)),
        Command::Fields => return Ok(Action::Fields),
        Command::Services => return Ok(Action::Services),
        Command::Help => return Ok(Action::Help),
        Command::Quit => return Ok(Action::Quit),
    };

    Ok(Action::Search(event))
}

/// State of a running interactive session.
struct Session {
    api: Arc<dyn SearchApi>,
    search: SearchController,
    analysis: AnalysisController,
    in_flight: Option<JoinHandle<SearchOutcome>>,
}

impl Session {
    fn new(api: Arc<dyn SearchApi>, state: SessionState) -> Self {
        Self {
            search: SearchController::with_state(Arc::clone(&api), state),
            analysis: AnalysisController::new(Arc::clone(&api)),
            api,
            in_flight: None,
        }
    }

    async fn handle_line(&mut self, line: &str) -> ControlFlow<()> {
        let action = parse_command(line)
            .and_then(|command| {
                command
                    .map(|command| action_for(command, &self.search, &Local::now()))
                    .transpose()
            });

        match action {
            Ok(Some(action)) => return self.perform(action).await,
            Ok(None) => {}
            Err(e) => println!("warning: {e:#}"),
        }
        ControlFlow::Continue(())
    }

    async fn perform(&mut self, action: Action) -> ControlFlow<()> {
        match action {
            Action::Search(event) => match self.search.spawn(event) {
                Some(handle) => {
                    self.in_flight = Some(handle);
                    println!("searching {}", render::session_summary(self.search.state(), &Local));
                }
                None => {
                    if let Some(notification) = &self.search.view().notification {
                        println!("{notification}");
                    }
                }
            },
            Action::Analyze(trace_id) => {
                let view = match trace_id {
                    Some(trace_id) => self.analysis.analyze(&trace_id).await,
                    None => self.analysis.analyze_page(&self.search.view().hits).await,
                };
                println!("{}", render::analysis(view));
            }
            Action::Fields => match self.api.fields().await {
                Ok(fields) => println!("{}", render::listing("fields", &fields)),
                Err(e) => println!("{}", Notification::from_error("Field lookup", &e)),
            },
            Action::Services => match self.api.services().await {
                Ok(services) => println!("{}", render::listing("services", &services)),
                Err(e) => println!("{}", Notification::from_error("Service lookup", &e)),
            },
            Action::Help => println!("{HELP}"),
            Action::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Applies a finished search and returns what to print. Superseded and
    /// cancelled searches print nothing.
    fn finish(&mut self, joined: Result<SearchOutcome, JoinError>) -> Option<String> {
        match joined {
            Ok((seq, result)) => (self.search.complete(seq, result) != Completion::Stale)
                .then(|| render::search_results(self.search.view(), &Local)),
            Err(e) if e.is_cancelled() => None,
            Err(e) => {
                tracing::warn!(error = %e, "Search task failed");
                None
            }
        }
    }

    /// Waits for the search still in flight, if any.
    async fn drain(&mut self) -> Option<String> {
        let handle = self.in_flight.take()?;
        self.finish(handle.await)
    }
}

async fn finished(in_flight: &mut Option<JoinHandle<SearchOutcome>>) -> Result<SearchOutcome, JoinError> {
    match in_flight {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

/// Runs the session on stdin until `:quit` or end of input.
///
/// # Errors
///
/// Fails only if stdin cannot be read; backend errors are printed and the
/// session continues.
pub async fn run(api: Arc<dyn SearchApi>, state: SessionState) -> Result<()> {
    let mut session = Session::new(api, state);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}\n");
    println!("{}", render::session_summary(session.search.state(), &Local));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    // Input closed: let the last search land before leaving.
                    if let Some(output) = session.drain().await {
                        print!("{output}");
                    }
                    break;
                };
                if session.handle_line(&line).await.is_break() {
                    break;
                }
            }
            joined = finished(&mut session.in_flight) => {
                session.in_flight = None;
                if let Some(output) = session.finish(joined) {
                    print!("{output}");
                }
            }
        }
    }

    if let Some(handle) = session.in_flight.take() {
        handle.abort();
    }
    Ok(())
}
