use super::app::App;
use crate::libs::formatter::format_duration;
use crate::libs::keeper::keep_alive;
use crate::libs::messages::Message;
use crate::libs::session::SessionState;
use crate::{msg_bail_anyhow, msg_info, msg_print, msg_warning};
use anyhow::Result;
use chrono::Local;
use clap::{Args, Subcommand};
use std::io::BufRead;
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    command: Option<SessionCommand>,
}

#[derive(Debug, Subcommand)]
enum SessionCommand {
    /// Show who is signed in and when the session ends
    Status,
    /// Keep the session alive while you work; every line on stdin counts as activity
    Watch,
}

pub async fn cmd(args: SessionArgs) -> Result<()> {
    match args.command.unwrap_or(SessionCommand::Status) {
        SessionCommand::Status => handle_status(),
        SessionCommand::Watch => handle_watch().await,
    }
}

fn handle_status() -> Result<()> {
    let mut app = App::load()?;
    match app.session.check_session()? {
        SessionState::Authenticated => {}
        SessionState::Expired => {
            msg_warning!(Message::SessionExpired);
            return Ok(());
        }
        SessionState::Unauthenticated => {
            msg_info!(Message::NotLoggedIn);
            return Ok(());
        }
    }

    let now = app.session.now();
    if let Some(session) = app.session.session() {
        msg_print!(Message::SessionStatus {
            name: session.user.name.clone(),
            email: session.user.email.clone(),
            role: session.user.role.to_string(),
            expires_at: session.expires_at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
            idle_for: format_duration(&(now - session.user.last_activity)),
        });
    }
    Ok(())
}

async fn handle_watch() -> Result<()> {
    let mut app = App::load()?;
    if app.session.check_session()? != SessionState::Authenticated {
        msg_bail_anyhow!(Message::NotLoggedIn);
    }
    let session_config = app.config.session();

    let (tx, rx) = mpsc::channel(16);
    // A plain thread, so a pending read never holds up runtime shutdown.
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            if line.is_err() || tx.blocking_send(()).is_err() {
                break;
            }
        }
    });

    msg_info!(Message::WatchStarted(session_config.check_interval().as_secs()));
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    let exit = keep_alive(
        &mut app.session,
        session_config.debouncer(),
        session_config.check_interval(),
        rx,
        shutdown,
    )
    .await?;

    debug!(?exit, "session watch finished");
    Ok(())
}
