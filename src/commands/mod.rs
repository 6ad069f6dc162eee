use crate::config::Config;
use crate::db::Database;
use crate::display;
use crate::handlers::{LogNotifier, ToggleController};
use crate::models::ResidentSet;
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "resident-votes", about = "Track which residents have voted")]
pub struct Cli {
    /// Overrides DATABASE_URL
    #[arg(long)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a resident
    Add {
        full_name: String,
        /// Group ("tổ") the resident belongs to
        #[arg(long)]
        unit: Option<String>,
    },
    /// List residents with their voting flag
    List,
    /// Flip the voting flag of one resident
    Toggle { resident_id: String },
    /// Show voting completion per group
    Stats {
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(cli: Cli, mut config: Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }

    let database = Arc::new(
        Database::new(&config.database_url)
            .await?
            .with_stats_page_size(config.stats_page_size),
    );

    match cli.command {
        Command::Add { full_name, unit } => {
            let resident = database.insert_resident(&full_name, unit.as_deref()).await?;
            info!("Added resident {} ({})", resident.full_name, resident.id);
            println!("{}", resident.id);
        }
        Command::List => handle_list(&database).await?,
        Command::Toggle { resident_id } => handle_toggle(database, &config, &resident_id).await?,
        Command::Stats { json } => handle_stats(&database, json).await?,
    }

    Ok(())
}

async fn handle_list(database: &Database) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let residents = database.list_residents().await?;
    if residents.is_empty() {
        println!("No residents found.");
        return Ok(());
    }

    for resident in &residents {
        println!(
            "{} | {} | {} | {}",
            resident.full_name,
            resident.group(),
            if resident.has_voted { "x" } else { " " },
            resident.id
        );
    }
    Ok(())
}

async fn handle_toggle(
    database: Arc<Database>,
    config: &Config,
    resident_id: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let residents = ResidentSet::new(database.list_residents().await?);
    let current = match residents.flag(resident_id) {
        Some(flag) => flag,
        None => return Err(format!("Unknown resident: {}", resident_id).into()),
    };

    let controller = ToggleController::new(
        residents,
        database.clone(),
        database,
        Arc::new(LogNotifier),
    )
    .serialize_toggles(config.serialize_toggles);

    let applied = controller.toggle(resident_id, current).await?;
    println!("{} -> {}", resident_id, if applied { "voted" } else { "not voted" });
    println!("{}", display::format_summary(&controller.snapshot().await));
    Ok(())
}

async fn handle_stats(database: &Database, json: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if database.list_residents().await?.is_empty() {
        warn!("No residents, nothing to aggregate");
        return Ok(());
    }

    let snapshot = database.voting_stats().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}", display::format_summary(&snapshot));
    }
    Ok(())
}
