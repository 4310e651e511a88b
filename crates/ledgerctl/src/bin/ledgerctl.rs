use clap::Parser;
use ledger::models::{Identity, PayoutRates};
use ledgerctl::{Cli, Commands, ConfigCommand, commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("ledgerctl={},ledger={}", log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = cli.database_url.as_deref();

    match cli.command {
        Commands::Migrate => {
            let (db, _) = commands::connect(database_url).await?;
            commands::migrate(&db).await?;
        }
        Commands::Config { command } => {
            let (_, ledger) = commands::connect(database_url).await?;
            match command {
                ConfigCommand::Set {
                    sponsor_bonus_pct,
                    tds_pct,
                    effective_from,
                    operator,
                } => {
                    let rates = PayoutRates::new(sponsor_bonus_pct, tds_pct);
                    commands::set_config(&ledger, operator, rates, effective_from).await?;
                }
                ConfigCommand::Show { at } => {
                    commands::show_config(&ledger, at).await?;
                }
                ConfigCommand::History { json } => {
                    // Local operators read as admin
                    commands::history(&ledger, Identity::admin(Uuid::nil()), json).await?;
                }
            }
        }
        Commands::Preview {
            gross,
            sponsor_bonus_pct,
            tds_pct,
            at,
        } => match (sponsor_bonus_pct, tds_pct) {
            (Some(sponsor_bonus_pct), Some(tds_pct)) => {
                commands::preview_with_rates(gross, PayoutRates::new(sponsor_bonus_pct, tds_pct))?;
            }
            _ => {
                let (_, ledger) = commands::connect(database_url).await?;
                commands::preview_stored(&ledger, gross, at).await?;
            }
        },
    }

    Ok(())
}
