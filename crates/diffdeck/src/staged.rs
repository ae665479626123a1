use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::{info, warn};

use diffdeck_core::SnapshotAssembler;
use diffdeck_git::{CommandRunner, GitCli, MutationExecutor};

use crate::api::{self, AppState};
use crate::config::Settings;

/// File name used for the rendered page when `--output` is not given
pub const OUTPUT_FILE_NAME: &str = "git-changes.html";

pub struct StagedOptions {
    pub open_browser: bool,
    pub output: Option<PathBuf>,
}

pub async fn handle_staged_command(settings: Settings, options: StagedOptions) -> Result<()> {
    let runner: Arc<dyn CommandRunner> =
        Arc::new(GitCli::new().with_timeout(settings.git_timeout));
    let server_url = settings.server_url();

    let assembler = SnapshotAssembler::new(runner.clone(), settings.projects.clone());
    let state = AppState::new(assembler, MutationExecutor::new(runner), &server_url);

    // Bind before rendering so a busy port fails before the browser opens.
    let addr = SocketAddr::from(([127, 0, 0, 1], settings.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind control server to {}", addr))?;

    let snapshots = state
        .assembler
        .assemble_all()
        .await
        .context("Failed to read repository changes")?;
    let html = state.render(&snapshots);

    let output = options
        .output
        .unwrap_or_else(|| std::env::temp_dir().join(OUTPUT_FILE_NAME));
    tokio::fs::write(&output, html)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let total: usize = snapshots
        .iter()
        .map(|s| s.repository.working_entries.len() + s.repository.staged_entries.len())
        .sum();
    info!(
        projects = snapshots.len(),
        changes = total,
        output = %output.display(),
        "Rendered change overview"
    );

    eprintln!();
    eprintln!(
        "  {} {}",
        "->".bright_green(),
        format!("Open {}", output.display()).bold()
    );
    eprintln!("  {} Control server on {}", "->".dimmed(), server_url);
    eprintln!("  {} Press {} to stop", "->".dimmed(), "Ctrl+C".bold());
    eprintln!();

    if options.open_browser {
        if let Err(e) = open::that(&output) {
            warn!(error = %e, "Failed to open browser");
            eprintln!(
                "Failed to open browser: {} (open {} manually)",
                e,
                output.display()
            );
        }
    }

    axum::serve(listener, api::create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Control server error")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    eprintln!("\nShutting down...");
}
