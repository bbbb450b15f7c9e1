//! Command-line interface for farm4u.

use clap::{Parser, Subcommand};

/// farm4u - farm management backend
#[derive(Parser)]
#[command(name = "farm4u")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP API server (default)
    #[command(alias = "daemon")]
    Serve,

    /// Create a default config.toml in the working directory
    #[command(alias = "init")]
    InitConfig,

    /// Load and validate configuration, then exit
    #[command(alias = "check")]
    CheckConfig,
}

impl Cli {
    /// Subcommand to run, `serve` when none was given.
    #[must_use]
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_serve() {
        let cli = Cli::try_parse_from(["farm4u"]).unwrap();
        assert_eq!(cli.command(), &Commands::Serve);
    }

    #[test]
    fn test_parses_subcommands() {
        let cli = Cli::try_parse_from(["farm4u", "init-config"]).unwrap();
        assert_eq!(cli.command(), &Commands::InitConfig);

        let cli = Cli::try_parse_from(["farm4u", "check"]).unwrap();
        assert_eq!(cli.command(), &Commands::CheckConfig);
    }

    #[test]
    fn test_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["farm4u", "harvest"]).is_err());
    }
}
