//! Records, filters and report rows.
//!
//! `PolicyChange` is the persisted entity; everything else lives for a single
//! command invocation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stored policy change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyChange {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub impact_level: String,
    pub effective_date: NaiveDate,
    pub owner: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// A policy change as supplied by the user, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPolicyChange {
    pub title: Option<String>,
    pub category: Option<String>,
    pub impact_level: Option<String>,
    pub effective_date: Option<String>,
    pub owner: Option<String>,
    pub notes: Option<String>,
}

/// Summary columns returned by `list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListRow {
    pub id: i64,
    pub effective_date: NaiveDate,
    pub category: String,
    pub impact_level: String,
    pub title: String,
    pub owner: String,
}

/// Summary columns returned by `upcoming`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingRow {
    pub id: i64,
    pub effective_date: NaiveDate,
    pub days_until: i32,
    pub category: String,
    pub impact_level: String,
    pub title: String,
    pub owner: String,
}

/// Optional equality and date-range filters.
///
/// A field that is `None` or empty places no constraint on its dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilters {
    pub category: Option<String>,
    pub impact_level: Option<String>,
    pub owner: Option<String>,
    pub since: Option<String>,
    pub until: Option<String>,
}

impl QueryFilters {
    /// Filter on category only.
    pub fn category(value: impl Into<String>) -> Self {
        Self {
            category: Some(value.into()),
            ..Self::default()
        }
    }
}

/// Returns the value only when it is present and non-empty.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// The column a report groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportKey {
    #[default]
    Category,
    Impact,
    Owner,
}

impl ReportKey {
    /// Resolve a user-supplied key. Unknown or empty text falls back to category.
    pub fn resolve(requested: &str) -> Self {
        match requested {
            "impact" => Self::Impact,
            "owner" => Self::Owner,
            _ => Self::Category,
        }
    }

    /// The table column backing this key.
    pub fn column(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Impact => "impact_level",
            Self::Owner => "owner",
        }
    }

    /// Header label shown above the grouping column.
    pub fn label(self) -> &'static str {
        match self {
            Self::Impact => "impact",
            other => other.column(),
        }
    }
}

impl fmt::Display for ReportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One grouping value and how many policy changes carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub key: String,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_key_resolve() {
        assert_eq!(ReportKey::resolve("impact"), ReportKey::Impact);
        assert_eq!(ReportKey::resolve("owner"), ReportKey::Owner);
        assert_eq!(ReportKey::resolve("category"), ReportKey::Category);
        assert_eq!(ReportKey::resolve(""), ReportKey::Category);
        assert_eq!(ReportKey::resolve("Impact"), ReportKey::Category);
    }

    #[test]
    fn test_report_key_label() {
        assert_eq!(ReportKey::Impact.label(), "impact");
        assert_eq!(ReportKey::Impact.column(), "impact_level");
        assert_eq!(ReportKey::Owner.to_string(), "owner");
    }
}
