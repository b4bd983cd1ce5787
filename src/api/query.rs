//! Table queries understood by every [`Backend`](super::Backend).
//!
//! A [`Query`] names a table plus a list of column filters, an ordering and
//! an optional limit. The hosted client renders it as PostgREST query
//! parameters, the local store renders it as a parameterized `SELECT`.
//!
//! ```rust
//! use backoffice::api::query::{Query, Filter};
//!
//! let query = Query::table("attendance_records")
//!     .filter(Filter::eq("member_id", 7))
//!     .filter(Filter::gte("work_date", "2026-10-01"))
//!     .order_desc("work_date")
//!     .limit(31);
//! ```

use serde_json::Value;

/// Comparison operator applied to a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    In,
}

impl FilterOp {
    /// PostgREST operator keyword.
    pub fn rest_keyword(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Neq => "neq",
            FilterOp::Gt => "gt",
            FilterOp::Gte => "gte",
            FilterOp::Lt => "lt",
            FilterOp::Lte => "lte",
            FilterOp::Like => "like",
            FilterOp::In => "in",
        }
    }

    /// SQL operator used by the local store. `In` is expanded separately.
    pub fn sql_operator(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Neq => "<>",
            FilterOp::Gt => ">",
            FilterOp::Gte => ">=",
            FilterOp::Lt => "<",
            FilterOp::Lte => "<=",
            FilterOp::Like => "LIKE",
            FilterOp::In => "IN",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn new(column: &str, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            column: column.to_string(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOp::Eq, value)
    }

    pub fn neq(column: &str, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOp::Neq, value)
    }

    pub fn gt(column: &str, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOp::Gt, value)
    }

    pub fn gte(column: &str, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOp::Gte, value)
    }

    pub fn lt(column: &str, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOp::Lt, value)
    }

    pub fn lte(column: &str, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOp::Lte, value)
    }

    /// SQL `LIKE` pattern; `%` is the wildcard on both backends.
    pub fn like(column: &str, pattern: &str) -> Self {
        Self::new(column, FilterOp::Like, pattern)
    }

    pub fn is_in<T: Into<Value>>(column: &str, values: Vec<T>) -> Self {
        Self::new(column, FilterOp::In, Value::Array(values.into_iter().map(Into::into).collect()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: String,
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn table(table: &str) -> Self {
        Self {
            table: table.to_string(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn filters(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filters.extend(filters);
        self
    }

    pub fn order_asc(mut self, column: &str) -> Self {
        self.order.push(Order {
            column: column.to_string(),
            ascending: true,
        });
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.order.push(Order {
            column: column.to_string(),
            ascending: false,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Renders a JSON scalar the way PostgREST expects it inside a filter value.
pub fn rest_literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(rest_literal).collect();
            format!("({})", inner.join(","))
        }
        other => other.to_string(),
    }
}

/// Builds the PostgREST query parameters for a filter list.
pub fn rest_filter_params(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|f| {
            let value = match (f.op, &f.value) {
                (FilterOp::Eq, Value::Null) => "is.null".to_string(),
                (FilterOp::Neq, Value::Null) => "not.is.null".to_string(),
                (FilterOp::Like, v) => format!("like.{}", rest_literal(v).replace('%', "*")),
                (op, v) => format!("{}.{}", op.rest_keyword(), rest_literal(v)),
            };
            (f.column.clone(), value)
        })
        .collect()
}

/// Builds the full PostgREST parameter list for a select query.
pub fn rest_query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    params.extend(rest_filter_params(&query.filters));
    if !query.order.is_empty() {
        let order: Vec<String> = query
            .order
            .iter()
            .map(|o| format!("{}.{}", o.column, if o.ascending { "asc" } else { "desc" }))
            .collect();
        params.push(("order".to_string(), order.join(",")));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}
