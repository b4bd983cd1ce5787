use super::app::{confirm, App};
use crate::db::news::{ArticleEdit, ArticleInput, News};
use crate::libs::messages::Message;
use crate::libs::role::{Access, Manager};
use crate::libs::view::View;
use crate::{msg_bail_anyhow, msg_info, msg_print, msg_success};
use anyhow::Result;
use chrono::Utc;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Input};

#[derive(Debug, Args)]
pub struct NewsArgs {
    #[command(subcommand)]
    command: Option<NewsCommand>,
}

#[derive(Debug, Subcommand)]
enum NewsCommand {
    /// Published articles, newest first
    List {
        /// Include drafts (executives only)
        #[arg(short, long)]
        all: bool,
    },
    /// Print one article
    Show { id: i64 },
    /// Write a new unpublished article (executives only)
    Draft {
        title: String,
        #[arg(short, long)]
        summary: Option<String>,
        /// Prompted for when omitted
        #[arg(short, long)]
        body: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Make a draft visible to everyone
    Publish { id: i64 },
    /// Take an article back to drafts
    Unpublish { id: i64 },
    /// Change an article
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        summary: Option<String>,
        #[arg(long)]
        body: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Remove an article
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn cmd(args: NewsArgs) -> Result<()> {
    let mut app = App::load()?;
    match args.command.unwrap_or(NewsCommand::List { all: false }) {
        NewsCommand::List { all } => {
            let user = app.require(Manager::News, Access::Read)?;
            let published_only = !(all && user.role.is_executive());
            let articles = News::new(app.db()).list(published_only).await?;
            if articles.is_empty() {
                msg_info!(Message::NoArticles);
                return Ok(());
            }
            msg_print!(Message::NewsHeader, true);
            View::articles(&articles)?;
        }
        NewsCommand::Show { id } => {
            let user = app.require(Manager::News, Access::Read)?;
            // Drafts stay hidden from employees.
            match News::new(app.db()).get(id).await? {
                Some(article) if article.is_published || user.role.is_executive() => View::article(&article)?,
                _ => msg_bail_anyhow!(Message::ArticleNotFound(id)),
            }
        }
        NewsCommand::Draft {
            title,
            summary,
            body,
            category,
        } => {
            let user = app.require_executive(Manager::News)?;
            let body = match body {
                Some(body) => body,
                None => Input::<String>::with_theme(&ColorfulTheme::default())
                    .with_prompt(Message::PromptArticleBody.to_string())
                    .interact_text()?,
            };
            let input = ArticleInput {
                title,
                summary,
                body,
                category,
            };
            let article = News::new(app.db()).draft(&input, user.member_id(), Utc::now()).await?;
            msg_success!(Message::ArticleDrafted(article.title));
        }
        NewsCommand::Publish { id } => {
            app.require_executive(Manager::News)?;
            let article = News::new(app.db()).publish(id, Utc::now()).await?;
            msg_success!(Message::ArticlePublished(article.title));
        }
        NewsCommand::Unpublish { id } => {
            app.require_executive(Manager::News)?;
            let article = News::new(app.db()).unpublish(id, Utc::now()).await?;
            msg_success!(Message::ArticleUnpublished(article.title));
        }
        NewsCommand::Edit {
            id,
            title,
            summary,
            body,
            category,
        } => {
            app.require_executive(Manager::News)?;
            let edit = ArticleEdit {
                title,
                summary,
                body,
                category,
            };
            if edit.title.is_none() && edit.summary.is_none() && edit.body.is_none() && edit.category.is_none() {
                msg_info!(Message::NoChangesDetected);
                return Ok(());
            }
            News::new(app.db()).update(id, &edit, Utc::now()).await?;
            msg_success!(Message::ArticleUpdated(id));
        }
        NewsCommand::Delete { id, yes } => {
            app.require_executive(Manager::News)?;
            if !yes && !confirm(&format!("article {}", id))? {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }
            News::new(app.db()).delete(id).await?;
            msg_success!(Message::ArticleDeleted(id));
        }
    }
    Ok(())
}
