use super::app::{confirm, current_month, App};
use crate::db::expenses::{ExpenseInput, Expenses};
use crate::libs::formatter::format_amount;
use crate::libs::messages::Message;
use crate::libs::role::Manager;
use crate::libs::view::View;
use crate::{msg_info, msg_print, msg_success};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ExpenseArgs {
    #[command(subcommand)]
    command: Option<ExpenseCommand>,
}

#[derive(Debug, Subcommand)]
enum ExpenseCommand {
    /// Expenses of a month
    List {
        #[arg(long)]
        month: Option<String>,
    },
    /// Record an expense
    Add {
        category: String,
        amount: f64,
        #[arg(long)]
        month: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Remove an expense
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
    /// Totals per category
    Summary {
        #[arg(long)]
        month: Option<String>,
    },
}

pub async fn cmd(args: ExpenseArgs) -> Result<()> {
    let mut app = App::load()?;
    let user = app.require_executive(Manager::Expenses)?;
    let expenses = Expenses::new(app.db());

    match args.command.unwrap_or(ExpenseCommand::List { month: None }) {
        ExpenseCommand::List { month } => {
            let month = month.unwrap_or_else(current_month);
            let rows = expenses.list(&month).await?;
            if rows.is_empty() {
                msg_info!(Message::NoExpenses(month));
                return Ok(());
            }
            msg_print!(Message::ExpensesHeader(month), true);
            View::expenses(&rows)?;
        }
        ExpenseCommand::Add {
            category,
            amount,
            month,
            description,
        } => {
            let input = ExpenseInput {
                month: month.unwrap_or_else(current_month),
                category,
                amount,
                description,
            };
            let expense = expenses.add(&input, user.member_id()).await?;
            msg_success!(Message::ExpenseAdded(format_amount(expense.amount)));
        }
        ExpenseCommand::Delete { id, yes } => {
            if !yes && !confirm(&format!("expense {}", id))? {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }
            expenses.delete(id).await?;
            msg_success!(Message::ExpenseDeleted(id));
        }
        ExpenseCommand::Summary { month } => {
            let month = month.unwrap_or_else(current_month);
            let summary = expenses.summary(&month).await?;
            if summary.by_category.is_empty() {
                msg_info!(Message::NoExpenses(month));
                return Ok(());
            }
            msg_print!(Message::ExpensesHeader(month), true);
            View::expense_summary(&summary)?;
            msg_print!(Message::ExpenseTotal(summary.month.clone(), format_amount(summary.total)));
        }
    }
    Ok(())
}
