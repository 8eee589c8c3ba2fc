//! # homepanel: terminal dashboard
//!
//! Composition root for the client side: connects the dashboard's
//! components to a resource server and drives them from stdin.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Initialise `tracing` (on stderr, stdout carries the panel)
//! - Construct the reqwest-backed store and the [`Dashboard`]
//! - Fetch then render every component, print the panel
//! - Turn stdin lines into control events and re-print the panel after
//!   every state-change announcement
//!
//! ## Dependency rule
//! Wiring only, no domain logic belongs here.

mod commands;
mod config;

use std::sync::Arc;

use anyhow::Context;
use homepanel_adapter_http_reqwest::HttpStateStore;
use homepanel_app::dashboard::Dashboard;
use homepanel_app::view::Pending;
use homepanel_domain::announcement::StateChange;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::{BroadcastStream, LinesStream};
use tracing_subscriber::EnvFilter;

use crate::commands::{Command, HELP, Outcome};
use crate::config::Config;

enum Input {
    Line(std::io::Result<String>),
    EndOfInput,
    Announcement(Result<StateChange, BroadcastStreamRecvError>),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    let store = HttpStateStore::with_timeout(&config.server.url, config.timeout())
        .context("creating HTTP client")?;
    tracing::info!(url = %store.base(), "connecting to resource server");
    let dashboard = Dashboard::new(Arc::new(store), config.sync_policy())?;

    let announcements = BroadcastStream::new(dashboard.subscribe()).map(Input::Announcement);
    let mut in_flight: Vec<Pending> = dashboard.start();
    println!("{}", dashboard.render_html());
    println!("{HELP}");

    let lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines())
        .map(Input::Line)
        .chain(tokio_stream::once(Input::EndOfInput));
    let mut inputs = std::pin::pin!(lines.merge(announcements));

    while let Some(input) = inputs.next().await {
        match input {
            Input::Line(line) => {
                let line = line.context("reading stdin")?;
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>().and_then(|cmd| cmd.execute(&dashboard)) {
                    Ok(Outcome::Started(pending)) => in_flight.push(pending),
                    Ok(Outcome::Show) => println!("{}", dashboard.render_html()),
                    Ok(Outcome::Help) => println!("{HELP}"),
                    Ok(Outcome::Quit) => break,
                    Err(err) => eprintln!("{err}"),
                }
                in_flight.retain(|pending| !pending.is_finished());
            }
            Input::EndOfInput => break,
            Input::Announcement(Ok(change)) => {
                tracing::debug!(name = %change.name(), kind = %change.kind(), "state changed");
                println!("{}", dashboard.render_html());
            }
            Input::Announcement(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                tracing::warn!(skipped, "missed announcements");
                println!("{}", dashboard.render_html());
            }
        }
    }

    // let pending writes reach the server before the runtime shuts down
    for pending in in_flight {
        if let Err(err) = pending.await {
            tracing::warn!(error = %err, "background task failed");
        }
    }
    Ok(())
}
