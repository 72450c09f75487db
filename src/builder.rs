//! SQL statement builder.
//!
//! Every command maps to exactly one statement produced here. Values are
//! embedded as escaped literals, so each builder is a pure function of its
//! inputs and the resulting text can be printed verbatim by `--dry-run`.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::escape::quote_literal;
use crate::model::{NewPolicyChange, QueryFilters, ReportKey, non_empty};

/// Schema holding the tracker's table.
pub const SCHEMA: &str = "groupscholar_policy_change_tracker";

/// Fully qualified table name.
pub const TABLE: &str = "groupscholar_policy_change_tracker.policy_changes";

/// Default row limit for `list`.
pub const DEFAULT_LIST_LIMIT: i64 = 20;

/// Default row limit for `export`.
pub const DEFAULT_EXPORT_LIMIT: i64 = 500;

/// Default look-ahead window for `upcoming`, in days.
pub const DEFAULT_UPCOMING_DAYS: i64 = 30;

const SUMMARY_COLUMNS: &str = "id, effective_date, category, impact_level, title, owner";
const ALL_COLUMNS: &str =
    "id, title, category, impact_level, effective_date, owner, notes, created_at";
const EXPORT_COLUMNS: &str =
    "id, effective_date, category, impact_level, title, owner, notes, created_at";

/// Create the schema and table if they do not exist.
pub fn build_schema_statement() -> String {
    format!(
        "create schema if not exists {SCHEMA};\n\
         create table if not exists {TABLE} (\
         id bigserial primary key,\
         title text not null,\
         category text not null,\
         impact_level text not null,\
         effective_date date not null,\
         owner text not null,\
         notes text not null default '',\
         created_at timestamptz not null default now()\
         );"
    )
}

/// Insert the three fixed example records.
pub fn build_seed_statement() -> String {
    format!(
        "insert into {TABLE} (title, category, impact_level, effective_date, owner, notes) values \
         ('FAFSA dependency rule update','Compliance','High','2026-01-15','Policy Ops',\
         'Requires re-validation for dependent status.'),\
         ('Essay rubric weighting tweak','Review Ops','Medium','2026-01-20','Review Lead',\
         'Boost weight for community impact from 15% to 20%.'),\
         ('Renewal documentation simplification','Renewals','Low','2026-02-01','Program Manager',\
         'Removed redundant income verification for continuing scholars.');"
    )
}

/// Return the value if it is present and non-empty.
pub fn require_non_empty<'a>(
    label: &'static str,
    value: &'a Option<String>,
) -> Result<&'a str, ValidationError> {
    non_empty(value).ok_or(ValidationError::Required(label))
}

/// Return `value` if it is at least 1.
pub fn require_positive(label: &'static str, value: i64) -> Result<i64, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NotPositive(label));
    }
    Ok(value)
}

/// Check that `value` is a `YYYY-MM-DD` calendar date.
pub fn require_date(label: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        label,
        value: value.to_string(),
    })
}

/// Build the INSERT for a new policy change.
pub fn build_insert_statement(record: &NewPolicyChange) -> Result<String, ValidationError> {
    let title = require_non_empty("title", &record.title)?;
    let category = require_non_empty("category", &record.category)?;
    let impact_level = require_non_empty("impact_level", &record.impact_level)?;
    let effective_date = require_non_empty("effective_date", &record.effective_date)?;
    let owner = require_non_empty("owner", &record.owner)?;
    require_date("effective_date", effective_date)?;
    let notes = record.notes.as_deref().unwrap_or_default();

    let values = [title, category, impact_level, effective_date, owner, notes]
        .into_iter()
        .map(quote_literal)
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!(
        "insert into {TABLE} (title, category, impact_level, effective_date, owner, notes) values ({values});"
    ))
}

/// Build the SELECT for a single policy change.
pub fn build_select_by_id_statement(id: i64) -> Result<String, ValidationError> {
    let id = require_positive("--id", id)?;
    Ok(format!("select {ALL_COLUMNS} from {TABLE} where id = {id};"))
}

/// Combine base conditions with filter-derived conditions.
///
/// Order is base conditions, then category, impact level, owner, since, until.
/// Returns an empty string when there is nothing to filter on; otherwise the
/// result starts with `" where "`.
pub fn build_where_clause(filters: &QueryFilters, base_conditions: &[String]) -> String {
    let mut conditions: Vec<String> = base_conditions.to_vec();

    let equality = [
        ("category", &filters.category),
        ("impact_level", &filters.impact_level),
        ("owner", &filters.owner),
    ];
    for (column, value) in equality {
        if let Some(v) = non_empty(value) {
            conditions.push(format!("{} = {}", column, quote_literal(v)));
        }
    }

    if let Some(since) = non_empty(&filters.since) {
        conditions.push(format!("effective_date >= {}", quote_literal(since)));
    }
    if let Some(until) = non_empty(&filters.until) {
        conditions.push(format!("effective_date <= {}", quote_literal(until)));
    }

    if conditions.is_empty() {
        return String::new();
    }
    format!(" where {}", conditions.join(" and "))
}

/// Map a requested report key to its column; unknown keys group by category.
pub fn resolve_report_group_column(requested: &str) -> &'static str {
    ReportKey::resolve(requested).column()
}

/// Reject date bounds that are not calendar dates.
pub fn validate_filters(filters: &QueryFilters) -> Result<(), ValidationError> {
    if let Some(since) = non_empty(&filters.since) {
        require_date("--since", since)?;
    }
    if let Some(until) = non_empty(&filters.until) {
        require_date("--until", until)?;
    }
    Ok(())
}

/// Build the `list` query: summary columns, newest effective date first.
pub fn build_list_statement(filters: &QueryFilters, limit: i64) -> Result<String, ValidationError> {
    let limit = require_positive("--limit", limit)?;
    validate_filters(filters)?;
    let where_clause = build_where_clause(filters, &[]);
    Ok(format!(
        "select {SUMMARY_COLUMNS} from {TABLE}{where_clause} order by effective_date desc, id desc limit {limit};"
    ))
}

/// Build the `export` query: every column, same ordering as `list`.
pub fn build_export_statement(
    filters: &QueryFilters,
    limit: i64,
) -> Result<String, ValidationError> {
    let limit = require_positive("--limit", limit)?;
    validate_filters(filters)?;
    let where_clause = build_where_clause(filters, &[]);
    Ok(format!(
        "select {EXPORT_COLUMNS} from {TABLE}{where_clause} order by effective_date desc, id desc limit {limit};"
    ))
}

/// Build the `report` query: one count per grouping value, largest first.
pub fn build_report_statement(
    filters: &QueryFilters,
    key: ReportKey,
) -> Result<String, ValidationError> {
    validate_filters(filters)?;
    let column = key.column();
    let where_clause = build_where_clause(filters, &[]);
    Ok(format!(
        "select {column}, count(*) as count from {TABLE}{where_clause} group by {column} order by count desc, {column} asc;"
    ))
}

/// Build the `upcoming` query: effective dates within `days` of today.
pub fn build_upcoming_statement(
    filters: &QueryFilters,
    days: i64,
) -> Result<String, ValidationError> {
    let days = require_positive("--days", days)?;
    validate_filters(filters)?;
    let base_conditions = [
        "effective_date >= current_date".to_string(),
        format!("effective_date <= current_date + interval '{days} days'"),
    ];
    let where_clause = build_where_clause(filters, &base_conditions);
    Ok(format!(
        "select {SUMMARY_COLUMNS}, (effective_date - current_date) as days_until from {TABLE}{where_clause} order by effective_date asc, id asc;"
    ))
}
