//! CLI argument definitions for ddev.

use clap::{Parser, Subcommand};

/// ddev - Developer tooling for Datadog integrations.
///
/// Settings live in a config.toml in the user data directory; see
/// `ddev config -h`.
#[derive(Parser, Debug)]
#[command(name = "ddev")]
#[command(author, version, about = "Developer tooling for Datadog integrations", long_about = None)]
pub struct Cli {
    /// Work on `integrations-extras`
    #[arg(short = 'e', long = "extras", global = true)]
    pub extras: bool,

    /// Work on the current location
    #[arg(short = 'x', long = "here", global = true)]
    pub here: bool,

    /// Suppress warnings
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Output JSON instead of human-readable text
    #[arg(long = "json", global = true, env = "DDEV_JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Locates, updates, or restores the config file
    ///
    /// With no flags or subcommand, prints the config file location.
    Config {
        /// Updates the config file with any new fields
        #[arg(short = 'u', long)]
        update: bool,

        /// Restores the config file to default settings
        #[arg(long)]
        restore: bool,

        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Assigns values to config file entries
    ///
    /// Example: `ddev config set github.user ofek`
    Set {
        /// Dotted key, e.g. github.user
        key: String,
        /// Value; `true`/`false` and numbers are stored typed
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Dotted key, e.g. github.user or github
        key: String,
    },

    /// Show the whole configuration
    Show {
        /// Include credentials instead of masking them
        #[arg(short, long)]
        all: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_config_set() {
        let cli = Cli::parse_from(["ddev", "config", "set", "github.user", "ofek"]);
        match cli.command {
            Some(Commands::Config {
                update: false,
                restore: false,
                command: Some(ConfigCommands::Set { key, value }),
            }) => {
                assert_eq!(key, "github.user");
                assert_eq!(value, "ofek");
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["ddev", "config", "-u", "-e", "-q"]);
        assert!(cli.extras);
        assert!(cli.quiet);
        assert!(!cli.here);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                update: true,
                command: None,
                ..
            })
        ));
    }
}
