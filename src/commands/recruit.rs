use super::app::{confirm, App};
use crate::db::recruitment::{CandidateInput, Recruitment, Stage};
use crate::libs::messages::Message;
use crate::libs::role::Manager;
use crate::libs::view::View;
use crate::{msg_bail_anyhow, msg_info, msg_print, msg_success};
use anyhow::Result;
use chrono::Utc;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct RecruitArgs {
    #[command(subcommand)]
    command: Option<RecruitCommand>,
}

#[derive(Debug, Subcommand)]
enum RecruitCommand {
    /// Candidates, optionally of one stage
    List {
        #[arg(short, long)]
        stage: Option<Stage>,
    },
    /// Register a new applicant
    Add {
        name: String,
        #[arg(short, long)]
        position: String,
        #[arg(short, long)]
        email: Option<String>,
        /// YYYY-MM-DD HH:MM
        #[arg(long)]
        interview: Option<String>,
        #[arg(long)]
        interviewer: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Move a candidate forward, to the next stage unless one is given
    Advance {
        id: i64,
        #[arg(short, long)]
        to: Option<Stage>,
    },
    /// Reject a candidate
    Reject { id: i64 },
    /// Set the interview time
    Schedule {
        id: i64,
        /// YYYY-MM-DD HH:MM
        at: String,
        #[arg(short, long)]
        interviewer: Option<String>,
    },
    /// Rate a candidate from 1 to 5
    Rate {
        id: i64,
        rating: u8,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Remove a candidate
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
    /// Candidate count per stage
    Pipeline,
}

pub async fn cmd(args: RecruitArgs) -> Result<()> {
    let mut app = App::load()?;
    app.require_executive(Manager::Recruitment)?;
    let recruitment = Recruitment::new(app.db());

    match args.command.unwrap_or(RecruitCommand::List { stage: None }) {
        RecruitCommand::List { stage } => {
            let candidates = recruitment.list(stage).await?;
            if candidates.is_empty() {
                msg_info!(Message::NoCandidates);
                return Ok(());
            }
            msg_print!(Message::CandidatesHeader, true);
            View::candidates(&candidates)?;
        }
        RecruitCommand::Add {
            name,
            position,
            email,
            interview,
            interviewer,
            notes,
        } => {
            let input = CandidateInput {
                candidate_name: name,
                email,
                position,
                interview_at: interview,
                interviewer,
                notes,
            };
            let candidate = recruitment.add(&input, Utc::now()).await?;
            msg_success!(Message::CandidateAdded(candidate.candidate_name));
        }
        RecruitCommand::Advance { id, to } => {
            let Some(candidate) = recruitment.get(id).await? else {
                msg_bail_anyhow!(Message::CandidateNotFound(id));
            };
            let Some(to) = to.or(candidate.stage.next()) else {
                msg_bail_anyhow!(Message::InvalidStageTransition(
                    candidate.stage.to_string(),
                    "a later stage".to_string()
                ));
            };
            let candidate = recruitment.advance(id, to).await?;
            msg_success!(Message::StageChanged(candidate.candidate_name, candidate.stage.to_string()));
        }
        RecruitCommand::Reject { id } => {
            let candidate = recruitment.advance(id, Stage::Rejected).await?;
            msg_success!(Message::StageChanged(candidate.candidate_name, candidate.stage.to_string()));
        }
        RecruitCommand::Schedule { id, at, interviewer } => {
            let candidate = recruitment.schedule_interview(id, &at, interviewer.as_deref()).await?;
            let at = candidate.interview_at.map(|t| t.format("%Y-%m-%d %H:%M").to_string()).unwrap_or_default();
            msg_success!(Message::InterviewScheduled(candidate.candidate_name, at));
        }
        RecruitCommand::Rate { id, rating, notes } => {
            let candidate = recruitment.rate(id, rating, notes.as_deref()).await?;
            msg_success!(Message::CandidateRated(candidate.candidate_name, rating));
        }
        RecruitCommand::Delete { id, yes } => {
            if !yes && !confirm(&format!("candidate {}", id))? {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }
            recruitment.delete(id).await?;
            msg_success!(Message::CandidateDeleted(id));
        }
        RecruitCommand::Pipeline => {
            msg_print!(Message::PipelineHeader, true);
            View::pipeline(&recruitment.overview().await?)?;
        }
    }
    Ok(())
}
