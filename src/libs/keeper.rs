//! Foreground session keeper behind `session watch`.
//!
//! Runs until the session expires or is logged out elsewhere, the
//! interaction source closes, or the shutdown future resolves. Three timers drive it: the periodic validity
//! check, the debounce deadline of the last interaction, and shutdown.

use crate::libs::activity::ActivityDebouncer;
use crate::libs::clock::Clock;
use crate::libs::messages::Message;
use crate::libs::session::{SessionContext, SessionState, SessionStore};
use crate::{msg_info, msg_warning};
use anyhow::Result;
use chrono::Local;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeeperExit {
    Expired,
    /// Another command logged out.
    LoggedOut,
    Closed,
    Interrupted,
}

async fn sleep_until_due(wait: Option<Duration>) {
    match wait {
        Some(wait) => tokio::time::sleep(wait).await,
        None => std::future::pending().await,
    }
}

fn ended(state: SessionState) -> KeeperExit {
    if state == SessionState::Expired {
        msg_warning!(Message::SessionExpired);
        KeeperExit::Expired
    } else {
        msg_info!(Message::SessionEndedElsewhere);
        KeeperExit::LoggedOut
    }
}

/// Keeps `ctx` alive while interactions arrive on `interactions`.
///
/// The first validity check runs immediately.
pub async fn keep_alive<S, C>(
    ctx: &mut SessionContext<S, C>,
    mut debouncer: ActivityDebouncer,
    check_every: Duration,
    mut interactions: mpsc::Receiver<()>,
    shutdown: impl Future<Output = ()>,
) -> Result<KeeperExit>
where
    S: SessionStore,
    C: Clock,
{
    tokio::pin!(shutdown);
    let mut check = tokio::time::interval(check_every);

    loop {
        let wait = debouncer.deadline().map(|deadline| (deadline - ctx.now()).to_std().unwrap_or_default());

        tokio::select! {
            _ = check.tick() => {
                if ctx.tick()? {
                    return Ok(ended(ctx.state()));
                }
            }
            received = interactions.recv() => match received {
                Some(()) => {
                    debug!("interaction");
                    debouncer.interact(ctx.now());
                }
                None => {
                    msg_info!(Message::WatchInputClosed);
                    return Ok(KeeperExit::Closed);
                }
            },
            _ = sleep_until_due(wait) => {
                if debouncer.poll(ctx.now()) {
                    if ctx.update_user_activity()? {
                        msg_info!(Message::ActivityRecorded(ctx.now().with_timezone(&Local).format("%H:%M:%S").to_string()));
                    } else if ctx.user().is_none() {
                        return Ok(ended(ctx.state()));
                    }
                }
            }
            _ = &mut shutdown => {
                msg_info!(Message::WatchStopped);
                return Ok(KeeperExit::Interrupted);
            }
        }
    }
}
