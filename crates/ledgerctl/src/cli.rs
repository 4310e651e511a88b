use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "ledgerctl")]
#[command(about = "Operator tooling for the participation and payout ledger", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, env = "DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Inspect or append payout configuration versions
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Show the breakdown a payment of `gross` would produce
    Preview {
        #[arg(long)]
        gross: Decimal,

        /// Use these rates instead of the stored configuration
        #[arg(long, requires = "tds_pct")]
        sponsor_bonus_pct: Option<Decimal>,

        #[arg(long, requires = "sponsor_bonus_pct")]
        tds_pct: Option<Decimal>,

        /// Resolve the stored configuration effective at this instant
        #[arg(long, conflicts_with = "sponsor_bonus_pct")]
        at: Option<DateTime<Utc>>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Append a new configuration version
    Set {
        #[arg(long)]
        sponsor_bonus_pct: Decimal,

        #[arg(long)]
        tds_pct: Decimal,

        /// Defaults to now; must follow the latest version
        #[arg(long)]
        effective_from: Option<DateTime<Utc>>,

        /// Admin recorded as the author of the version
        #[arg(long, env = "LEDGER_OPERATOR_ID")]
        operator: Uuid,
    },

    /// Show the configuration effective at an instant (defaults to now)
    Show {
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },

    /// List every version, oldest first
    History {
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_set() {
        let cli = Cli::try_parse_from([
            "ledgerctl",
            "--database-url",
            "postgres://localhost/ledger",
            "config",
            "set",
            "--sponsor-bonus-pct",
            "10",
            "--tds-pct",
            "5.5",
            "--effective-from",
            "2025-01-01T00:00:00Z",
            "--operator",
            "0b7e5e8c-52a1-4f6b-8f0e-b2b8a8f0c001",
        ])
        .unwrap();

        assert_eq!(
            cli.database_url.as_deref(),
            Some("postgres://localhost/ledger")
        );
        match cli.command {
            Commands::Config {
                command:
                    ConfigCommand::Set {
                        sponsor_bonus_pct,
                        tds_pct,
                        effective_from,
                        ..
                    },
            } => {
                assert_eq!(sponsor_bonus_pct, Decimal::from(10));
                assert_eq!(tds_pct, Decimal::new(55, 1));
                assert!(effective_from.is_some());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_preview_rates_come_in_pairs() {
        let result = Cli::try_parse_from([
            "ledgerctl",
            "preview",
            "--gross",
            "1000",
            "--sponsor-bonus-pct",
            "10",
        ]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from([
            "ledgerctl",
            "preview",
            "--gross",
            "1000",
            "--sponsor-bonus-pct",
            "10",
            "--tds-pct",
            "5",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Preview { .. }));
    }

    #[test]
    fn test_rejects_bad_decimal() {
        let result = Cli::try_parse_from(["ledgerctl", "preview", "--gross", "ten"]);
        assert!(result.is_err());
    }
}
