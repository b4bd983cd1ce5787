use super::schema::MONTHLY_EXPENSES;
use crate::api::{Backend, Filter, Query};
use crate::libs::messages::Message;
use crate::libs::validation;
use crate::msg_bail_anyhow;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Expense {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub month: String,
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub recorded_by: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct ExpenseInput {
    pub month: String,
    pub category: String,
    pub amount: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseSummary {
    pub month: String,
    pub total: f64,
    /// Largest category first.
    pub by_category: Vec<(String, f64)>,
}

pub fn summarize(month: &str, expenses: &[Expense]) -> ExpenseSummary {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for expense in expenses {
        *totals.entry(expense.category.as_str()).or_default() += expense.amount;
    }
    let mut by_category: Vec<(String, f64)> = totals.into_iter().map(|(c, t)| (c.to_string(), t)).collect();
    by_category.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    ExpenseSummary {
        month: month.to_string(),
        total: expenses.iter().map(|e| e.amount).sum(),
        by_category,
    }
}

pub struct Expenses<'a, B: Backend> {
    backend: &'a B,
}

impl<'a, B: Backend> Expenses<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    pub async fn add(&self, input: &ExpenseInput, recorded_by: Option<i64>) -> Result<Expense> {
        let expense = Expense {
            id: None,
            month: validation::month("month", &input.month)?,
            category: validation::required("category", &input.category)?,
            amount: validation::positive("amount", input.amount)?,
            description: validation::optional(input.description.as_deref()),
            recorded_by,
        };
        Ok(self.backend.create(MONTHLY_EXPENSES, &expense).await?)
    }

    pub async fn list(&self, month: &str) -> Result<Vec<Expense>> {
        let month = validation::month("month", month)?;
        let query = Query::table(MONTHLY_EXPENSES)
            .filter(Filter::eq("month", month))
            .order_asc("category")
            .order_asc("id");
        Ok(self.backend.fetch(&query).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if self.backend.delete(MONTHLY_EXPENSES, &[Filter::eq("id", id)]).await? == 0 {
            msg_bail_anyhow!(Message::ExpenseNotFound(id));
        }
        Ok(())
    }

    pub async fn summary(&self, month: &str) -> Result<ExpenseSummary> {
        let month = validation::month("month", month)?;
        let expenses = self.list(&month).await?;
        Ok(summarize(&month, &expenses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(category: &str, amount: f64) -> Expense {
        Expense {
            id: None,
            month: "2026-10".to_string(),
            category: category.to_string(),
            amount,
            description: None,
            recorded_by: None,
        }
    }

    #[test]
    fn summary_groups_by_category() {
        let summary = summarize(
            "2026-10",
            &[expense("travel", 120.0), expense("office", 300.0), expense("travel", 250.5)],
        );
        assert_eq!(summary.total, 670.5);
        assert_eq!(summary.by_category[0], ("travel".to_string(), 370.5));
        assert_eq!(summary.by_category[1], ("office".to_string(), 300.0));
    }

    #[test]
    fn empty_month_sums_to_zero() {
        let summary = summarize("2026-11", &[]);
        assert_eq!(summary.total, 0.0);
        assert!(summary.by_category.is_empty());
    }
}
