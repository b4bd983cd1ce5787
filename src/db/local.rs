//! SQLite implementation of [`Backend`].
//!
//! Rows travel as JSON objects, exactly like the hosted client. Statements
//! are assembled from [`schema`](super::schema) definitions only; table and
//! column names coming from callers are checked against it before they are
//! spliced into SQL, values are always bound as parameters.

use super::db::Db;
use super::schema::{self, ColumnKind, TableSchema};
use crate::api::query::{Filter, FilterOp, Query};
use crate::api::{Backend, DbError};
use crate::libs::auth::hash_password;
use anyhow::Result;
use parking_lot::Mutex;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection, Row};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct LocalStore {
    conn: Arc<Mutex<Connection>>,
}

impl fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalStore").finish_non_exhaustive()
    }
}

impl LocalStore {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::from_db(Db::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_db(Db::open_in_memory()?))
    }

    fn from_db(db: Db) -> Self {
        Self {
            conn: Arc::new(Mutex::new(db.conn)),
        }
    }
}

fn table(name: &str) -> Result<&'static TableSchema, DbError> {
    schema::table(name).ok_or_else(|| DbError::UnknownTable(name.to_string()))
}

fn column(table: &TableSchema, column: &str) -> Result<ColumnKind, DbError> {
    table.kind(column).ok_or_else(|| DbError::UnknownColumn {
        table: table.name.to_string(),
        column: column.to_string(),
    })
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(*b as i64),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn from_sql(value: ValueRef<'_>, kind: ColumnKind) -> Value {
    match (value, kind) {
        (ValueRef::Null, _) => Value::Null,
        (ValueRef::Integer(i), ColumnKind::Bool) => Value::Bool(i != 0),
        (ValueRef::Integer(i), ColumnKind::Real) => Number::from_f64(i as f64).map(Value::Number).unwrap_or(Value::Null),
        (ValueRef::Integer(i), _) => Value::Number(i.into()),
        (ValueRef::Real(r), _) => Number::from_f64(r).map(Value::Number).unwrap_or(Value::Null),
        (ValueRef::Text(t), _) => Value::String(String::from_utf8_lossy(t).into_owned()),
        (ValueRef::Blob(b), _) => Value::String(String::from_utf8_lossy(b).into_owned()),
    }
}

fn row_to_json(table: &TableSchema, row: &Row<'_>) -> rusqlite::Result<Value> {
    let mut object = Map::new();
    for (index, (name, kind)) in table.columns.iter().enumerate() {
        object.insert(name.to_string(), from_sql(row.get_ref(index)?, *kind));
    }
    Ok(Value::Object(object))
}

/// Renders a `WHERE` clause and collects its bound values.
fn where_clause(table: &TableSchema, filters: &[Filter], params: &mut Vec<SqlValue>) -> Result<String, DbError> {
    if filters.is_empty() {
        return Ok(String::new());
    }
    let mut parts = Vec::with_capacity(filters.len());
    for filter in filters {
        column(table, &filter.column)?;
        let part = match (filter.op, &filter.value) {
            (FilterOp::Eq, Value::Null) => format!("{} IS NULL", filter.column),
            (FilterOp::Neq, Value::Null) => format!("{} IS NOT NULL", filter.column),
            (FilterOp::In, Value::Array(items)) if items.is_empty() => "0".to_string(),
            (FilterOp::In, Value::Array(items)) => {
                params.extend(items.iter().map(to_sql));
                format!("{} IN ({})", filter.column, vec!["?"; items.len()].join(", "))
            }
            (FilterOp::In, single) => {
                params.push(to_sql(single));
                format!("{} IN (?)", filter.column)
            }
            (op, value) => {
                params.push(to_sql(value));
                format!("{} {} ?", filter.column, op.sql_operator())
            }
        };
        parts.push(part);
    }
    Ok(format!(" WHERE {}", parts.join(" AND ")))
}

fn object(table: &TableSchema, row: Value) -> Result<Map<String, Value>, DbError> {
    match row {
        Value::Object(map) => {
            for key in map.keys() {
                column(table, key)?;
            }
            Ok(map)
        }
        other => Err(DbError::InvalidRow(format!("expected an object for {}, got {}", table.name, other))),
    }
}

impl Backend for LocalStore {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, DbError> {
        let table = table(&query.table)?;
        let mut params = Vec::new();
        let mut sql = format!("SELECT {} FROM {}", table.column_list(), table.name);
        sql.push_str(&where_clause(table, &query.filters, &mut params)?);
        if !query.order.is_empty() {
            let mut order = Vec::with_capacity(query.order.len());
            for o in &query.order {
                column(table, &o.column)?;
                order.push(format!("{} {}", o.column, if o.ascending { "ASC" } else { "DESC" }));
            }
            sql.push_str(&format!(" ORDER BY {}", order.join(", ")));
        }
        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), |row| row_to_json(table, row))?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    async fn insert(&self, table_name: &str, row: Value) -> Result<Value, DbError> {
        let table = table(table_name)?;
        let mut map = object(table, row)?;
        // Let SQLite assign the key when the caller left it empty.
        if matches!(map.get("id"), Some(Value::Null)) {
            map.remove("id");
        }
        if map.is_empty() {
            return Err(DbError::InvalidRow(format!("empty insert into {}", table.name)));
        }

        let columns: Vec<&str> = map.keys().map(String::as_str).collect();
        let params: Vec<SqlValue> = map.values().map(to_sql).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            table.name,
            columns.join(", "),
            vec!["?"; columns.len()].join(", "),
            table.column_list()
        );

        let conn = self.conn.lock();
        let stored = conn.query_row(&sql, params_from_iter(params.iter()), |row| row_to_json(table, row))?;
        Ok(stored)
    }

    async fn update(&self, table_name: &str, filters: &[Filter], patch: Value) -> Result<usize, DbError> {
        if filters.is_empty() {
            return Err(DbError::Unfiltered("update"));
        }
        let table = table(table_name)?;
        let mut map = object(table, patch)?;
        map.remove("id");
        if map.is_empty() {
            return Ok(0);
        }

        let mut params: Vec<SqlValue> = map.values().map(to_sql).collect();
        let assignments: Vec<String> = map.keys().map(|k| format!("{} = ?", k)).collect();
        let mut sql = format!("UPDATE {} SET {}", table.name, assignments.join(", "));
        sql.push_str(&where_clause(table, filters, &mut params)?);

        let conn = self.conn.lock();
        Ok(conn.execute(&sql, params_from_iter(params.iter()))?)
    }

    async fn delete(&self, table_name: &str, filters: &[Filter]) -> Result<usize, DbError> {
        if filters.is_empty() {
            return Err(DbError::Unfiltered("delete"));
        }
        let table = table(table_name)?;
        let mut params = Vec::new();
        let mut sql = format!("DELETE FROM {}", table.name);
        sql.push_str(&where_clause(table, filters, &mut params)?);

        let conn = self.conn.lock();
        Ok(conn.execute(&sql, params_from_iter(params.iter()))?)
    }

    async fn rpc(&self, function: &str, args: Value) -> Result<Value, DbError> {
        match function {
            "hash_password" => {
                let password = args
                    .get("password")
                    .and_then(Value::as_str)
                    .ok_or_else(|| DbError::InvalidRow("hash_password needs a 'password' argument".to_string()))?;
                let hash = hash_password(password).map_err(|e| DbError::InvalidRow(e.to_string()))?;
                Ok(Value::String(hash))
            }
            other => Err(DbError::UnknownFunction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn where_clause_binds_in_order() {
        let table = schema::table(schema::ATTENDANCE_RECORDS).unwrap();
        let mut params = Vec::new();
        let sql = where_clause(
            table,
            &[
                Filter::eq("member_id", 3),
                Filter::is_in("status", vec!["late", "remote"]),
                Filter::eq("check_out", Value::Null),
            ],
            &mut params,
        )
        .unwrap();
        assert_eq!(sql, " WHERE member_id = ? AND status IN (?, ?) AND check_out IS NULL");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn rejects_unknown_columns() {
        let table = schema::table(schema::MEMBERS).unwrap();
        let err = where_clause(table, &[Filter::eq("1=1; DROP TABLE members", 1)], &mut Vec::new()).unwrap_err();
        assert!(matches!(err, DbError::UnknownColumn { .. }));
    }

    #[test]
    fn booleans_round_trip_through_integers() {
        assert_eq!(to_sql(&Value::Bool(true)), SqlValue::Integer(1));
        assert_eq!(from_sql(ValueRef::Integer(0), ColumnKind::Bool), Value::Bool(false));
    }
}
