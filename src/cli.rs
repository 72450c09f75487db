//! Command-line surface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::builder::{DEFAULT_EXPORT_LIMIT, DEFAULT_LIST_LIMIT, DEFAULT_UPCOMING_DAYS};
use crate::model::{NewPolicyChange, QueryFilters};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "policy-tracker")]
#[command(version)]
#[command(about = "Record and query policy changes", long_about = None)]
#[command(arg_required_else_help = true)]
#[command(after_help = "EXAMPLES:
    policy-tracker init
    policy-tracker add --title 'Essay rubric tweak' --category 'Review Ops' --impact Medium --effective-date 2026-01-20 --owner 'Review Lead'
    policy-tracker list --category Compliance --since 2026-01-01
    policy-tracker export --output changes.csv --impact High
    policy-tracker report --by owner
    policy-tracker upcoming --days 14")]
pub struct Cli {
    /// Database connection URL (falls back to the config file, then PG* variables)
    #[arg(long, global = true, env = "POLICY_TRACKER_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Path to a config.toml
    #[arg(long, global = true, env = "POLICY_TRACKER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for show, list, report and upcoming
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Print the SQL that would run without connecting
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Create schema and tables
    Init,
    /// Insert sample policy changes
    Seed,
    /// Add a policy change
    Add(AddArgs),
    /// Show full details for a change
    Show {
        #[arg(long, allow_negative_numbers = true)]
        id: Option<i64>,
    },
    /// List policy changes with optional filters
    List {
        #[arg(long, default_value_t = DEFAULT_LIST_LIMIT, allow_negative_numbers = true)]
        limit: i64,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Export changes to CSV
    Export {
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_EXPORT_LIMIT, allow_negative_numbers = true)]
        limit: i64,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Summarize changes by grouping
    Report {
        /// category, impact or owner
        #[arg(long, default_value = "category")]
        by: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show upcoming effective dates
    Upcoming {
        #[arg(long, default_value_t = DEFAULT_UPCOMING_DAYS, allow_negative_numbers = true)]
        days: i64,
        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct AddArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub impact: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub effective_date: Option<String>,
    #[arg(long)]
    pub owner: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl From<&AddArgs> for NewPolicyChange {
    fn from(args: &AddArgs) -> Self {
        Self {
            title: args.title.clone(),
            category: args.category.clone(),
            impact_level: args.impact.clone(),
            effective_date: args.effective_date.clone(),
            owner: args.owner.clone(),
            notes: args.notes.clone(),
        }
    }
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct FilterArgs {
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub impact: Option<String>,
    #[arg(long)]
    pub owner: Option<String>,
    /// Earliest effective date, YYYY-MM-DD
    #[arg(long)]
    pub since: Option<String>,
    /// Latest effective date, YYYY-MM-DD
    #[arg(long)]
    pub until: Option<String>,
}

impl From<&FilterArgs> for QueryFilters {
    fn from(args: &FilterArgs) -> Self {
        Self {
            category: args.category.clone(),
            impact_level: args.impact.clone(),
            owner: args.owner.clone(),
            since: args.since.clone(),
            until: args.until.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_filters() {
        let cli = Cli::try_parse_from([
            "policy-tracker",
            "list",
            "--limit",
            "5",
            "--impact",
            "High",
            "--since",
            "2026-01-01",
        ])
        .unwrap();
        let Command::List { limit, filters } = cli.command else {
            panic!("expected list");
        };
        assert_eq!(limit, 5);
        let filters = QueryFilters::from(&filters);
        assert_eq!(filters.impact_level.as_deref(), Some("High"));
        assert_eq!(filters.since.as_deref(), Some("2026-01-01"));
        assert_eq!(filters.category, None);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["policy-tracker", "upcoming"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Upcoming {
                days: 30,
                filters: FilterArgs::default()
            }
        );
        assert_eq!(cli.format, OutputFormat::Table);
    }

    #[test]
    fn test_negative_limit_is_a_value() {
        let cli = Cli::try_parse_from(["policy-tracker", "export", "--limit", "-1"]).unwrap();
        assert!(matches!(cli.command, Command::Export { limit: -1, .. }));
    }

    #[test]
    fn test_add_maps_impact() {
        let cli = Cli::try_parse_from([
            "policy-tracker",
            "add",
            "--title",
            "T",
            "--impact",
            "Low",
            "--effective-date",
            "2026-03-01",
        ])
        .unwrap();
        let Command::Add(args) = cli.command else {
            panic!("expected add");
        };
        let record = NewPolicyChange::from(&args);
        assert_eq!(record.impact_level.as_deref(), Some("Low"));
        assert_eq!(record.effective_date.as_deref(), Some("2026-03-01"));
        assert_eq!(record.owner, None);
    }

    #[test]
    fn test_missing_flag_value_is_error() {
        assert!(Cli::try_parse_from(["policy-tracker", "show", "--id"]).is_err());
    }
}
