use std::io::BufRead;
use std::sync::Arc;

use indexwatch_core::Scheduler;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::cli::{OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

pub async fn run(
    scheduler: Arc<Scheduler>,
    args: &WatchArgs,
    format: OutputFormat,
) -> Result<(), CliError> {
    let mut snapshots = scheduler.store().subscribe();
    let mut triggers = (!args.no_stdin).then(stdin_triggers);
    let mut driver = tokio::spawn(Arc::clone(&scheduler).run(shutdown_signal()));

    loop {
        tokio::select! {
            joined = &mut driver => {
                joined.map_err(|error| CliError::Command(format!("scheduler task failed: {error}")))?;
                break;
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let latest = snapshots.borrow_and_update().clone();
                if let Some(snapshot) = latest {
                    output::render_snapshot(&snapshot, format)?;
                }
            }
            Some(()) = next_trigger(&mut triggers) => {
                info!("manual refresh requested");
                let _ = scheduler.trigger();
            }
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "ctrl-c handler unavailable; stopping");
    }
}

/// Never resolves when manual triggers are disabled.
async fn next_trigger(triggers: &mut Option<mpsc::UnboundedReceiver<()>>) -> Option<()> {
    match triggers {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Each stdin line becomes one refresh request. Reads happen on a detached
/// thread so a pending read never holds up runtime shutdown.
fn stdin_triggers() -> mpsc::UnboundedReceiver<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            if line.is_err() || tx.send(()).is_err() {
                break;
            }
        }
    });
    rx
}
