use super::app::{confirm, current_month, visible_member, App};
use crate::api::Database;
use crate::db::kpi::{IndicatorInput, Kpi};
use crate::libs::formatter::format_rate;
use crate::libs::messages::Message;
use crate::libs::role::{Access, Manager};
use crate::libs::session::AdminUser;
use crate::libs::view::View;
use crate::{msg_bail_anyhow, msg_info, msg_print, msg_success};
use anyhow::Result;
use chrono::Utc;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct KpiArgs {
    #[command(subcommand)]
    command: Option<KpiCommand>,
}

#[derive(Debug, Subcommand)]
enum KpiCommand {
    /// Targets of a month with their achievement rate, best first
    Overview {
        #[arg(long)]
        period: Option<String>,
        #[arg(short, long)]
        member: Option<i64>,
    },
    /// Defined indicators
    Indicators,
    /// Define a new indicator (executives only)
    AddIndicator {
        name: String,
        #[arg(short, long)]
        unit: String,
        #[arg(short, long)]
        category: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Remove an indicator that no target uses (executives only)
    DeleteIndicator {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
    /// Set a member's monthly target, replacing an existing one (executives only)
    SetTarget {
        #[arg(short, long)]
        indicator: i64,
        #[arg(short, long)]
        member: i64,
        #[arg(short, long)]
        period: Option<String>,
        value: f64,
    },
    /// Targets of a month
    Targets {
        #[arg(long)]
        period: Option<String>,
        #[arg(short, long)]
        member: Option<i64>,
    },
    /// Remove a target and its progress (executives only)
    DeleteTarget {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
    /// Append progress to a target
    Record {
        target: i64,
        value: f64,
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Progress history of a target
    Progress { target: i64 },
}

pub async fn cmd(args: KpiArgs) -> Result<()> {
    let mut app = App::load()?;
    let command = args.command.unwrap_or(KpiCommand::Overview {
        period: None,
        member: None,
    });
    match command {
        KpiCommand::Overview { period, member } => {
            let user = app.require(Manager::Kpi, Access::Read)?;
            let period = period.unwrap_or_else(current_month);
            let rows = Kpi::new(app.db()).overview(&period, visible_member(&user, member)).await?;
            if rows.is_empty() {
                msg_info!(Message::NoTargets(period));
                return Ok(());
            }
            msg_print!(Message::KpiOverviewHeader(period), true);
            View::kpi_overview(&rows, &app.names(&user).await?)?;
        }
        KpiCommand::Indicators => {
            app.require(Manager::Kpi, Access::Read)?;
            let indicators = Kpi::new(app.db()).indicators().await?;
            if indicators.is_empty() {
                msg_info!(Message::NoIndicators);
                return Ok(());
            }
            msg_print!(Message::IndicatorsHeader, true);
            View::indicators(&indicators)?;
        }
        KpiCommand::AddIndicator {
            name,
            unit,
            category,
            description,
        } => {
            app.require_executive(Manager::Kpi)?;
            let input = IndicatorInput {
                name,
                unit,
                category,
                description,
            };
            let indicator = Kpi::new(app.db()).add_indicator(&input).await?;
            msg_success!(Message::IndicatorAdded(indicator.name));
        }
        KpiCommand::DeleteIndicator { id, yes } => {
            app.require_executive(Manager::Kpi)?;
            if !yes && !confirm(&format!("indicator {}", id))? {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }
            Kpi::new(app.db()).delete_indicator(id).await?;
            msg_success!(Message::IndicatorDeleted(id));
        }
        KpiCommand::SetTarget {
            indicator,
            member,
            period,
            value,
        } => {
            app.require_executive(Manager::Kpi)?;
            let period = period.unwrap_or_else(current_month);
            let kpi = Kpi::new(app.db());
            let Some(found) = kpi.indicator(indicator).await? else {
                msg_bail_anyhow!(Message::IndicatorNotFound(indicator));
            };
            let target = kpi.set_target(indicator, member, &period, value).await?;
            msg_success!(Message::TargetSaved(found.name, target.period));
        }
        KpiCommand::Targets { period, member } => {
            let user = app.require(Manager::Kpi, Access::Read)?;
            let period = period.unwrap_or_else(current_month);
            let kpi = Kpi::new(app.db());
            let targets = kpi.targets(&period, visible_member(&user, member)).await?;
            if targets.is_empty() {
                msg_info!(Message::NoTargets(period));
                return Ok(());
            }
            msg_print!(Message::TargetsHeader(period), true);
            View::targets(&targets, &kpi.indicators().await?, &app.names(&user).await?)?;
        }
        KpiCommand::DeleteTarget { id, yes } => {
            app.require_executive(Manager::Kpi)?;
            if !yes && !confirm(&format!("target {}", id))? {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }
            Kpi::new(app.db()).delete_target(id).await?;
            msg_success!(Message::TargetDeleted(id));
        }
        KpiCommand::Record { target, value, note } => {
            let user = app.require(Manager::Kpi, Access::Write)?;
            let kpi = Kpi::new(app.db());
            ensure_own_target(&kpi, &user, target).await?;
            let (_, rate) = kpi
                .record_progress(target, value, note.as_deref(), user.member_id(), Utc::now())
                .await?;
            msg_success!(Message::ProgressRecorded(format_rate(rate)));
        }
        KpiCommand::Progress { target } => {
            let user = app.require(Manager::Kpi, Access::Read)?;
            let kpi = Kpi::new(app.db());
            ensure_own_target(&kpi, &user, target).await?;
            let records = kpi.progress(target).await?;
            if records.is_empty() {
                msg_info!(Message::NoProgress(target));
                return Ok(());
            }
            msg_print!(Message::ProgressHeader(target), true);
            View::progress(&records)?;
        }
    }
    Ok(())
}

/// Employees may only touch targets assigned to them.
async fn ensure_own_target(kpi: &Kpi<'_, Database>, user: &AdminUser, target_id: i64) -> Result<()> {
    let Some(target) = kpi.target(target_id).await? else {
        msg_bail_anyhow!(Message::TargetNotFound(target_id));
    };
    if !user.role.is_executive() && user.member_id() != Some(target.member_id) {
        msg_bail_anyhow!(Message::AccessDenied(Manager::Kpi.to_string()));
    }
    Ok(())
}
