#![forbid(unsafe_code)]

//! Vitrine showcase binary entry point.

use std::fs::File;
use std::sync::Arc;
use std::time::Instant;

mod app;
mod content;

use app::ShowcaseApp;

/// Set `VITRINE_LOG` to a `tracing` filter (e.g. `debug`,
/// `vitrine_core=trace`) to append logs to `vitrine.log`. Logging cannot go
/// to stdout while the alternate screen is active.
fn setup_logging() {
    let Ok(filter) = std::env::var("VITRINE_LOG") else {
        return;
    };
    let Ok(file) = File::options()
        .create(true)
        .append(true)
        .open("vitrine.log")
    else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
}

fn main() {
    setup_logging();

    let mut app = ShowcaseApp::new(Instant::now());
    if let Err(e) = vitrine_runtime::program::run(&mut app) {
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}
