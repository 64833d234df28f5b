//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rationale CLI - Record decisions and explore how they relate.
#[derive(Debug, Parser)]
#[command(name = "rationale")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "RATIONALE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database file, overriding the configured one
    #[arg(long, global = true, env = "RATIONALE_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a new decision
    Record(RecordArgs),

    /// Link two decisions with an explicit relationship
    Link(LinkArgs),

    /// Show the decision graph
    Graph(GraphArgs),

    /// Run similarity clustering and report what it found
    Cluster(ClusterArgs),

    /// Find decisions similar to one decision
    Similar(SimilarArgs),

    /// Show decisions reachable from one decision
    Neighborhood(NeighborhoodArgs),

    /// Search decisions by text
    Search(SearchArgs),

    /// Set the outcome of a decision
    Outcome(OutcomeArgs),

    /// Enter interactive REPL mode
    Repl,
}

/// Arguments for the record command.
#[derive(Debug, Parser)]
pub struct RecordArgs {
    /// Topic (e.g., infra)
    pub topic: String,

    /// What was decided
    pub decision: String,

    /// Why it was decided
    #[arg(short, long, default_value = "")]
    pub reasoning: String,

    /// Confidence at decision time (0.0-1.0)
    #[arg(short, long)]
    pub confidence: Option<f64>,
}

/// Arguments for the link command.
#[derive(Debug, Parser)]
pub struct LinkArgs {
    /// Source decision ID
    pub from: String,

    /// Target decision ID
    pub to: String,

    /// Relationship name (supersedes, builds_on, debates, synthesizes, or any other)
    #[arg(short, long, default_value = "builds_on")]
    pub relationship: String,

    /// Why the decisions are related
    #[arg(long)]
    pub reason: Option<String>,
}

/// Arguments for the graph command.
#[derive(Debug, Parser)]
pub struct GraphArgs {
    /// Only show decisions in this topic
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Include similarity edges
    #[arg(long)]
    pub cluster: bool,
}

/// Arguments for the cluster command.
#[derive(Debug, Parser)]
pub struct ClusterArgs {
    /// Clustering preset, overriding the configured parameters
    #[arg(short, long, value_enum)]
    pub preset: Option<PresetArg>,
}

/// Arguments for the similar command.
#[derive(Debug, Parser)]
pub struct SimilarArgs {
    /// Decision ID
    pub id: String,
}

/// Arguments for the neighborhood command.
#[derive(Debug, Parser)]
pub struct NeighborhoodArgs {
    /// Decision ID
    pub id: String,

    /// Maximum hops over explicit edges (defaults to the configured depth)
    #[arg(short, long)]
    pub depth: Option<usize>,
}

/// Arguments for the search command.
#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Case-insensitive text to look for
    pub query: String,

    /// Only search decisions in this topic
    #[arg(short, long)]
    pub topic: Option<String>,
}

/// Arguments for the outcome command.
#[derive(Debug, Parser)]
pub struct OutcomeArgs {
    /// Decision ID
    pub id: String,

    /// New outcome (pending, success, failed, partial)
    pub outcome: String,

    /// Why the outcome changed
    #[arg(short, long)]
    pub reason: Option<String>,
}

/// Clustering presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PresetArg {
    /// Larger sample, lower threshold
    Thorough,
    /// Smaller sample, higher threshold
    Fast,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<PresetArg> for rationale_graph::ClusterConfig {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Thorough => rationale_graph::ClusterConfig::thorough(),
            PresetArg::Fast => rationale_graph::ClusterConfig::fast(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_repl() {
        let cli = Cli::parse_from(["rationale"]);
        assert!(cli.command.is_none());
        assert!(!cli.no_color);
    }

    #[test]
    fn test_record_command() {
        let cli = Cli::parse_from([
            "rationale",
            "record",
            "infra",
            "Use Postgres",
            "--reasoning",
            "team knows it",
            "-c",
            "0.8",
        ]);
        match cli.command {
            Some(Command::Record(args)) => {
                assert_eq!(args.topic, "infra");
                assert_eq!(args.decision, "Use Postgres");
                assert_eq!(args.reasoning, "team knows it");
                assert_eq!(args.confidence, Some(0.8));
            }
            _ => panic!("Expected Record command"),
        }
    }

    #[test]
    fn test_link_defaults_to_builds_on() {
        let cli = Cli::parse_from(["rationale", "link", "a", "b"]);
        match cli.command {
            Some(Command::Link(args)) => {
                assert_eq!(args.relationship, "builds_on");
                assert!(args.reason.is_none());
            }
            _ => panic!("Expected Link command"),
        }
    }

    #[test]
    fn test_graph_flags_and_global_format() {
        let cli = Cli::parse_from(["rationale", "graph", "--topic", "infra", "--cluster", "-f", "json"]);
        assert_eq!(cli.format, Some(CliFormat::Json));
        match cli.command {
            Some(Command::Graph(args)) => {
                assert_eq!(args.topic.as_deref(), Some("infra"));
                assert!(args.cluster);
            }
            _ => panic!("Expected Graph command"),
        }
    }

    #[test]
    fn test_outcome_command() {
        let cli = Cli::parse_from(["rationale", "outcome", "d1", "success", "-r", "shipped"]);
        match cli.command {
            Some(Command::Outcome(args)) => {
                assert_eq!(args.id, "d1");
                assert_eq!(args.outcome, "success");
                assert_eq!(args.reason.as_deref(), Some("shipped"));
            }
            _ => panic!("Expected Outcome command"),
        }
    }

    #[test]
    fn test_preset_conversion() {
        let config: rationale_graph::ClusterConfig = PresetArg::Fast.into();
        assert_eq!(config, rationale_graph::ClusterConfig::fast());
    }
}
