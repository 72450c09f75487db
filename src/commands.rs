//! Command dispatch.
//!
//! `plan` validates a parsed command and builds its statement without touching
//! the database; `run` executes a plan against an open session and renders the
//! result.

use colored::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

use crate::builder::{self, require_non_empty};
use crate::cli::Command;
use crate::engine::PolicyDb;
use crate::error::{TrackerError, TrackerResult, ValidationError};
use crate::model::{NewPolicyChange, QueryFilters, ReportKey};
use crate::output::{self, OutputFormat};

/// A validated command, ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Run a statement and print a confirmation.
    Execute { sql: String, done: &'static str },
    Show { sql: String },
    List { sql: String },
    Export { sql: String, output: PathBuf },
    Report { sql: String, key: ReportKey },
    Upcoming { sql: String },
}

impl Plan {
    /// The statement this plan will run.
    pub fn sql(&self) -> &str {
        match self {
            Plan::Execute { sql, .. }
            | Plan::Show { sql }
            | Plan::List { sql }
            | Plan::Export { sql, .. }
            | Plan::Report { sql, .. }
            | Plan::Upcoming { sql } => sql,
        }
    }
}

/// Validate a command and build its statement.
pub fn plan(command: &Command) -> Result<Plan, ValidationError> {
    let plan = match command {
        Command::Init => Plan::Execute {
            sql: builder::build_schema_statement(),
            done: "Schema ready.",
        },
        Command::Seed => Plan::Execute {
            sql: builder::build_seed_statement(),
            done: "Seed data inserted.",
        },
        Command::Add(args) => Plan::Execute {
            sql: builder::build_insert_statement(&NewPolicyChange::from(args))?,
            done: "Policy change added.",
        },
        Command::Show { id } => {
            let id = id.ok_or(ValidationError::Required("--id"))?;
            Plan::Show {
                sql: builder::build_select_by_id_statement(id)?,
            }
        }
        Command::List { limit, filters } => Plan::List {
            sql: builder::build_list_statement(&QueryFilters::from(filters), *limit)?,
        },
        Command::Export {
            output,
            limit,
            filters,
        } => {
            let sql = builder::build_export_statement(&QueryFilters::from(filters), *limit)?;
            let path = output.as_ref().map(|p| p.to_string_lossy().into_owned());
            require_non_empty("--output", &path)?;
            Plan::Export {
                sql,
                output: output.clone().unwrap_or_default(),
            }
        }
        Command::Report { by, filters } => {
            let key = ReportKey::resolve(by);
            Plan::Report {
                sql: builder::build_report_statement(&QueryFilters::from(filters), key)?,
                key,
            }
        }
        Command::Upcoming { days, filters } => Plan::Upcoming {
            sql: builder::build_upcoming_statement(&QueryFilters::from(filters), *days)?,
        },
    };
    Ok(plan)
}

/// Execute a plan and print its result.
pub async fn run(plan: &Plan, db: &mut PolicyDb, format: OutputFormat) -> TrackerResult<()> {
    match plan {
        Plan::Execute { sql, done } => {
            db.execute(sql).await?;
            println!("{} {}", "✓".green(), done);
        }
        Plan::Show { sql } => match db.fetch_policy_change(sql).await? {
            None => println!("No policy change found for that id."),
            Some(change) => match format {
                OutputFormat::Json => println!("{}", json(&change)?),
                OutputFormat::Table => {
                    for line in output::detail_lines(&change) {
                        println!("{line}");
                    }
                }
            },
        },
        Plan::List { sql } => {
            let rows = db.fetch_list_rows(sql).await?;
            match format {
                OutputFormat::Json => println!("{}", json(&rows)?),
                OutputFormat::Table => output::list_table(&rows).print(),
            }
        }
        Plan::Export { sql, output: path } => {
            let rows = db.fetch_policy_changes(sql).await?;
            let file = File::create(path).map_err(|source| TrackerError::OutputFile {
                path: path.clone(),
                source,
            })?;
            output::write_csv(BufWriter::new(file), &rows)?;
            info!(rows = rows.len(), path = %path.display(), "export written");
            println!("Exported {} rows to {}.", rows.len(), path.display());
        }
        Plan::Report { sql, key } => {
            let rows = db.fetch_report_rows(sql).await?;
            match format {
                OutputFormat::Json => println!("{}", json(&rows)?),
                OutputFormat::Table => output::report_table(*key, &rows).print(),
            }
        }
        Plan::Upcoming { sql } => {
            let rows = db.fetch_upcoming_rows(sql).await?;
            match format {
                OutputFormat::Json => println!("{}", json(&rows)?),
                OutputFormat::Table => output::upcoming_table(&rows).print(),
            }
        }
    }
    Ok(())
}

fn json<T: serde::Serialize + ?Sized>(value: &T) -> TrackerResult<String> {
    output::to_json(value).map_err(|e| TrackerError::Io(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{AddArgs, FilterArgs};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plan_init_and_seed() {
        let init = plan(&Command::Init).unwrap();
        assert!(init.sql().starts_with("create schema if not exists"));
        assert!(matches!(init, Plan::Execute { done: "Schema ready.", .. }));

        let seed = plan(&Command::Seed).unwrap();
        assert!(matches!(seed, Plan::Execute { done: "Seed data inserted.", .. }));
    }

    #[test]
    fn test_plan_add_requires_title() {
        let args = AddArgs {
            category: Some("Compliance".into()),
            ..AddArgs::default()
        };
        assert_eq!(
            plan(&Command::Add(args)),
            Err(ValidationError::Required("title"))
        );
    }

    #[test]
    fn test_plan_show() {
        assert_eq!(
            plan(&Command::Show { id: None }),
            Err(ValidationError::Required("--id"))
        );
        assert_eq!(
            plan(&Command::Show { id: Some(0) }),
            Err(ValidationError::NotPositive("--id"))
        );
        let show = plan(&Command::Show { id: Some(3) }).unwrap();
        assert!(show.sql().contains("where id = 3"));
    }

    #[test]
    fn test_plan_export_requires_output() {
        let export = Command::Export {
            output: None,
            limit: 500,
            filters: FilterArgs::default(),
        };
        assert_eq!(plan(&export), Err(ValidationError::Required("--output")));

        let bad_limit = Command::Export {
            output: Some("out.csv".into()),
            limit: 0,
            filters: FilterArgs::default(),
        };
        assert_eq!(plan(&bad_limit), Err(ValidationError::NotPositive("--limit")));
    }

    #[test]
    fn test_plan_report_label() {
        let report = plan(&Command::Report {
            by: "owner".into(),
            filters: FilterArgs::default(),
        })
        .unwrap();
        assert!(matches!(report, Plan::Report { key: ReportKey::Owner, .. }));
        assert!(report.sql().contains("group by owner"));

        let fallback = plan(&Command::Report {
            by: "region".into(),
            filters: FilterArgs::default(),
        })
        .unwrap();
        assert!(fallback.sql().contains("group by category"));
    }

    #[test]
    fn test_plan_upcoming_days() {
        let upcoming = Command::Upcoming {
            days: -5,
            filters: FilterArgs::default(),
        };
        assert_eq!(plan(&upcoming), Err(ValidationError::NotPositive("--days")));
    }
}
