use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "goalcat")]
#[command(about = "Keyword-based life-domain classifier for goal titles")]
#[command(version)]
pub struct Cli {
    /// Verbose output (debug logs)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config directory (default: ~/.goalcat)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Lexicon file to use instead of the configured one
    #[arg(long, global = true)]
    pub lexicon: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a goal title
    Classify {
        /// Goal title (e.g., "Naar de sportschool")
        title: String,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,

        /// Optional time slot (e.g., "07:00", "ochtend")
        #[arg(short, long)]
        time: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify and show matched keywords, fired rules and scores
    Explain {
        /// Goal title
        title: String,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,

        /// Optional time slot
        #[arg(short, long)]
        time: Option<String>,

        /// Print the trace as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect lexicon files
    Lexicon {
        #[command(subcommand)]
        action: LexiconAction,
    },

    /// List categories and their allowed subcategories
    Taxonomy,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum LexiconAction {
    /// Validate a lexicon file and report every problem
    Check {
        /// Lexicon file (default: configured or built-in lexicon)
        path: Option<PathBuf>,
    },

    /// Show entry counts per category
    Stats {
        /// Lexicon file (default: configured or built-in lexicon)
        path: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., scoring.confidence_floor)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., scoring.confidence_floor, lexicon.path)
        key: String,

        /// Value to set (e.g., "0.6"; an empty path restores the built-in lexicon)
        value: String,
    },

    /// List all config values
    List,

    /// Show config file path
    Path,

    /// Initialize config file with defaults
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_classify() {
        let cli = Cli::try_parse_from([
            "goalcat",
            "classify",
            "Naar de gym",
            "-d",
            "benen",
            "-t",
            "18:00",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Classify {
                title,
                description,
                time,
                json,
            }) => {
                assert_eq!(title, "Naar de gym");
                assert_eq!(description.as_deref(), Some("benen"));
                assert_eq!(time.as_deref(), Some("18:00"));
                assert!(json);
            }
            _ => panic!("expected classify"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "goalcat",
            "taxonomy",
            "--config-dir",
            "/tmp/goalcat",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/goalcat")));
    }
}
