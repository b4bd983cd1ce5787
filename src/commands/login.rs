use super::app::App;
use crate::libs::auth::Authenticator;
use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_success};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Input, Password};

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email; prompted for when omitted
    email: Option<String>,
}

pub async fn cmd(args: LoginArgs) -> Result<()> {
    let mut app = App::load()?;

    let email = match args.email {
        Some(email) => email,
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptEmail.to_string())
            .interact_text()?,
    };
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptPassword.to_string())
        .interact()?;

    let authenticator = Authenticator::new(app.clients.standard(), app.clients.elevated(), app.config.admin.as_ref());
    if !app.session.login(&authenticator, &email, &password).await? {
        msg_bail_anyhow!(Message::LoginFailed);
    }

    if let Some(user) = app.session.user() {
        msg_success!(Message::LoginSucceeded(user.name.clone(), user.role.to_string()));
    }
    Ok(())
}
