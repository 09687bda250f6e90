//! Namespaces command - list and refresh storage namespaces

use crate::api::{ApiClient, FetchError};
use crate::cli::args::{NamespacesArgs, OutputFormat};
use crate::config::Config;
use crate::error::{NsAdminError, NsAdminResult};
use crate::query::{QueryCache, QueryEntry, QueryKey};
use crate::ui::{self, LoadingSpinner, UiContext};
use crate::view::{QueryView, ViewState};
use chrono::Local;
use console::style;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const LOADING_MESSAGE: &str = "Loading namespaces...";

/// Execute the namespaces command
pub async fn execute(args: NamespacesArgs, config: &Config) -> NsAdminResult<()> {
    let client = ApiClient::from_config(&config.api)?;
    let source = client.namespaces_url().to_string();
    debug!("Namespace source: {}", source);

    let cache = QueryCache::new();
    let key = QueryKey::namespaces();
    cache.register(key.clone(), Arc::new(client));

    let view = QueryView::mount(&cache, key)?;

    if args.interactive {
        run_interactive(view, &source).await
    } else {
        run_once(view, args.format).await
    }
}

/// Wait for the first result, print it, exit
async fn run_once(mut view: QueryView, format: OutputFormat) -> NsAdminResult<()> {
    let ctx = UiContext::detect();
    let mut spinner = LoadingSpinner::new(&ctx);
    if format == OutputFormat::Table {
        spinner.start(LOADING_MESSAGE);
    }

    let state = view.settled().await;
    spinner.clear();

    match state {
        ViewState::Success(items) => print_namespaces(&ctx, &items, format),
        ViewState::Error(message) => Err(view
            .entry()
            .error()
            .cloned()
            .map(NsAdminError::from)
            .unwrap_or(NsAdminError::User(message))),
        ViewState::Idle | ViewState::Loading => Err(NsAdminError::Internal(
            "namespace query did not settle".to_string(),
        )),
    }
}

/// Keep the view mounted; each fetch is drawn to its result before the
/// next command is read
async fn run_interactive(mut view: QueryView, source: &str) -> NsAdminResult<()> {
    let ctx = UiContext::detect();
    ui::intro(&ctx, "Namespaces");
    ui::key_value(&ctx, "Source", source);
    ui::remark(&ctx, "Enter or r: refresh    q: quit");

    let mut spinner = LoadingSpinner::new(&ctx);
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut fetching = true;

    loop {
        if fetching && !show_until_settled(&ctx, &mut spinner, &mut view).await {
            break;
        }
        fetching = false;

        tokio::select! {
            line = input.next_line() => {
                let line = line.map_err(|e| NsAdminError::io("reading stdin", e))?;
                match line.as_deref().map(str::trim) {
                    Some("" | "r" | "refresh") => {
                        drop(view.trigger_refresh()?);
                        fetching = true;
                    }
                    Some("q" | "quit" | "exit") | None => break,
                    Some(other) => ui::step_warn_hint(
                        &ctx,
                        &format!("Unknown input '{}'", other),
                        "Enter refreshes, q quits",
                    ),
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    spinner.clear();
    ui::outro_success(&ctx, "Done");
    Ok(())
}

/// Render transitions until the running fetch lands.
///
/// Returns `false` when interrupted with Ctrl-C. Expects a fetch to have
/// been started for the view.
async fn show_until_settled(
    ctx: &UiContext,
    spinner: &mut LoadingSpinner,
    view: &mut QueryView,
) -> bool {
    loop {
        tokio::select! {
            state = view.next_state() => match state {
                Some(state) => {
                    render_state(ctx, spinner, &state);
                    if state.is_settled() {
                        show_entry_details(ctx, &view.entry());
                        return true;
                    }
                }
                None => return true,
            },
            _ = tokio::signal::ctrl_c() => return false,
        }
    }
}

/// When the shown result was fetched, and whether retrying may help
fn show_entry_details(ctx: &UiContext, entry: &QueryEntry) {
    if entry.error().is_some_and(FetchError::is_retryable) {
        ui::remark(ctx, "Press Enter to retry");
    } else if let Some(at) = entry.fetched_at() {
        let local = at.with_timezone(&Local);
        ui::remark(ctx, &format!("Fetched at {}", local.format("%H:%M:%S")));
    }
}

fn render_state(ctx: &UiContext, spinner: &mut LoadingSpinner, state: &ViewState) {
    match state {
        ViewState::Idle => {}
        ViewState::Loading => spinner.start(LOADING_MESSAGE),
        ViewState::Error(message) => {
            spinner.clear();
            ui::step_error_detail(ctx, "Failed to load namespaces", message);
        }
        ViewState::Success(items) if items.is_empty() => {
            spinner.clear();
            ui::step_info(ctx, "No namespaces");
        }
        ViewState::Success(items) => {
            spinner.clear();
            ui::step_ok(ctx, &format!("{} namespace(s)", items.len()));
            for namespace in items {
                println!("  {}", namespace);
            }
        }
    }
}

fn print_namespaces(ctx: &UiContext, items: &[String], format: OutputFormat) -> NsAdminResult<()> {
    match format {
        OutputFormat::Table => print_table(ctx, items),
        OutputFormat::Json => print_json(items)?,
        OutputFormat::Plain => print_plain(items),
    }
    Ok(())
}

fn print_table(ctx: &UiContext, items: &[String]) {
    if items.is_empty() {
        ui::step_info(ctx, "No namespaces");
        return;
    }

    let width = items
        .iter()
        .map(|ns| ns.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAMESPACE".len());

    println!("{}", style("NAMESPACE").bold());
    println!("{}", "-".repeat(width));
    for namespace in items {
        println!("{}", namespace);
    }

    println!();
    println!("{} namespace(s)", items.len());
}

fn print_json(items: &[String]) -> NsAdminResult<()> {
    let json = serde_json::to_string_pretty(items)?;
    println!("{}", json);
    Ok(())
}

fn print_plain(items: &[String]) {
    for namespace in items {
        println!("{}", namespace);
    }
}
