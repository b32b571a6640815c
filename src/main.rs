//! `biogas-monitor` daemon.
//!
//! Reads config, subscribes to the five sensor paths, runs the monitor
//! session and serves the JSON API until Ctrl-C. On shutdown the server
//! drains first, then the monitor stops and drops its subscriptions.
//!
//! Logging variables are described on [`init_tracing`]; the rest live in
//! `config.rs`.
use std::{env, sync::Arc};

use axum::Router;
use dotenvy::dotenv;
use is_terminal::IsTerminal;
use tokio::sync::mpsc;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use anyhow::Result;

use biogas_monitor::config;
use biogas_monitor::effects;
use biogas_monitor::feed::FirebaseFeed;
use biogas_monitor::log_api::LogApiClient;
use biogas_monitor::monitor::{self, Effects, MonitorSettings};
use biogas_monitor::notify::{LogNotifier, Notifier, WebhookNotifier};
use biogas_monitor::routes::{self, AppState};

/// Capacity of the sensor update channel shared by the five subscriptions.
const UPDATE_CHANNEL_CAPACITY: usize = 64;

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    init_tracing();
    dotenv().ok();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    let http = cfg.http_client()?;
    let log_api = LogApiClient::new(http.clone(), &cfg.log_api_url);

    let notifier: Arc<dyn Notifier> = match &cfg.notify_webhook_url {
        Some(url) => Arc::new(WebhookNotifier::new(http.clone(), url.as_str())),
        None => Arc::new(LogNotifier),
    };

    let feed = FirebaseFeed::new(
        http.clone(),
        &cfg.firebase_url,
        cfg.firebase_auth.clone(),
        cfg.feed_poll_interval(),
    );
    let (tx, rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
    let subscriptions = feed.subscribe_all(tx);
    tracing::info!("Subscribed to {} sensor values", subscriptions.len());

    let handle = monitor::start(
        MonitorSettings::new(cfg.local_offset(), cfg.snapshot_check_interval()),
        Effects {
            notifier,
            sink: Arc::new(log_api.clone()),
            report: effects::log_failures(),
        },
        rx,
        subscriptions,
    );

    // Build app from routes gateway (EMBP)
    let app: Router = routes::router(AppState {
        monitor: handle.state(),
        log_api,
        offset: cfg.local_offset(),
    });

    tracing::info!("Listening on {}", cfg.bind_addr);

    let listener = tokio::net::TcpListener::bind(cfg.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    handle.stop().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Ctrl-C received, shutting down");
}

// ---

/// Install the global subscriber. Runs before `.env` is read, so only the
/// process environment applies.
///
/// - `RUST_LOG` wins when set; otherwise `MONITOR_LOG_LEVEL` (default
///   `debug`) with hyper and reqwest held at `info`.
/// - `MONITOR_SPAN_EVENTS`: `full` or `enter_exit`; span close events only
///   by default.
/// - `FORCE_COLOR` overrides TTY detection for ANSI output.
fn init_tracing() {
    // ---
    let span_events = match env::var("MONITOR_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("MONITOR_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("info") => "info",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => "debug",
        };
        EnvFilter::new(format!("{level},hyper=info,reqwest=info"))
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}
