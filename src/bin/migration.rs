use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use qkart_api::{
    db::{establish_connection_with_config, DbConfig},
    migrator::Migrator,
};
use sea_orm_migration::MigratorTrait;
use tracing::info;

#[derive(Parser)]
#[command(name = "migration", about = "Apply or roll back the QKart schema", version)]
struct Cli {
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite://qkart.db?mode=rwc",
        help = "Database connection URL"
    )]
    database_url: String,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Apply pending migrations (default)
    Up {
        #[arg(long, help = "Number of migrations to apply; all when omitted")]
        steps: Option<u32>,
    },
    /// Roll back applied migrations
    Down {
        #[arg(long, default_value_t = 1, help = "Number of migrations to roll back")]
        steps: u32,
    },
    /// List applied and pending migrations
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();

    info!("Connecting to database: {}", cli.database_url);
    let db = establish_connection_with_config(&DbConfig {
        url: cli.database_url.clone(),
        max_connections: 1,
        ..Default::default()
    })
    .await
    .context("connecting to the database")?;

    match cli.command.unwrap_or(Command::Up { steps: None }) {
        Command::Up { steps } => {
            Migrator::up(&db, steps).await.context("applying migrations")?;
            info!("Migration completed successfully");
        }
        Command::Down { steps } => {
            Migrator::down(&db, Some(steps))
                .await
                .context("rolling back migrations")?;
            info!("Rolled back {} migration(s)", steps);
        }
        Command::Status => {
            Migrator::status(&db).await.context("reading migration status")?;
        }
    }

    Ok(())
}
