use crate::libs::clock::SystemClock;
use crate::libs::messages::Message;
use crate::libs::session::{FileSessionStore, SessionContext};
use crate::msg_success;
use anyhow::Result;

pub fn cmd() -> Result<()> {
    let mut session = SessionContext::new(FileSessionStore::new()?, SystemClock);
    session.logout()?;
    msg_success!(Message::LoggedOut);
    Ok(())
}
