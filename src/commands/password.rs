use crate::libs::auth::hash_password;
use crate::libs::config::prompt_new_password;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;

/// Prints an Argon2 hash for the `admin.password_hash` setting.
pub fn cmd() -> Result<()> {
    let password = prompt_new_password()?;
    msg_print!(Message::PasswordHash(hash_password(&password)?));
    Ok(())
}
