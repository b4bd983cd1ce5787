use super::app::App;
use crate::api::Backend;
use crate::db::members::{Member, Members, NewMember};
use crate::libs::config::prompt_new_password;
use crate::libs::messages::Message;
use crate::libs::role::{Manager, Role};
use crate::libs::view::View;
use crate::{msg_bail_anyhow, msg_info, msg_print, msg_success};
use anyhow::Result;
use chrono::Utc;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct MemberArgs {
    #[command(subcommand)]
    command: Option<MemberCommand>,
}

#[derive(Debug, Subcommand)]
enum MemberCommand {
    /// Registered members
    List,
    /// Register a member; the password is prompted for
    Add {
        email: String,
        #[arg(short, long)]
        name: String,
        #[arg(short, long, default_value = "employee")]
        role: Role,
    },
    /// Allow a member to sign in again
    Activate { id: i64 },
    /// Block a member from signing in
    Deactivate { id: i64 },
}

pub async fn cmd(args: MemberArgs) -> Result<()> {
    let mut app = App::load()?;
    app.require_executive(Manager::Members)?;
    // Member rows are only read and written with the elevated client.
    let members = Members::new(app.clients.elevated());

    match args.command.unwrap_or(MemberCommand::List) {
        MemberCommand::List => {
            let rows = members.list().await?;
            if rows.is_empty() {
                msg_info!(Message::NoMembers);
                return Ok(());
            }
            msg_print!(Message::MembersHeader, true);
            View::members(&rows)?;
        }
        MemberCommand::Add { email, name, role } => {
            let password = prompt_new_password()?;
            let member = members
                .add(
                    &NewMember {
                        email,
                        name,
                        role,
                        password,
                    },
                    Utc::now(),
                )
                .await?;
            msg_success!(Message::MemberAdded(member.email));
        }
        MemberCommand::Activate { id } => {
            let member = set_active(&members, id, true).await?;
            msg_success!(Message::MemberActivated(member.email));
        }
        MemberCommand::Deactivate { id } => {
            let member = set_active(&members, id, false).await?;
            msg_success!(Message::MemberDeactivated(member.email));
        }
    }
    Ok(())
}

async fn set_active<B: Backend>(members: &Members<'_, B>, id: i64, active: bool) -> Result<Member> {
    let Some(mut member) = members.get(id).await? else {
        msg_bail_anyhow!(Message::MemberNotFound(id));
    };
    members.set_active(id, active).await?;
    member.is_active = active;
    Ok(member)
}
