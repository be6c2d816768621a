use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use dotenvy::dotenv;
use rosterly::cli::{read_rows_from_file, render_import_result, render_validation};
use rosterly::logging::init_console_tracing;
use rosterly::modules::student_imports::service::StudentImportService;
use rosterly_config::ImportConfig;
use rosterly_db::{PgRosterStore, init_db_pool};

#[derive(Parser)]
#[command(name = "rosterly-cli")]
#[command(about = "Rosterly CLI - Batch student import tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dry-run a CSV sheet against the roster without writing anything
    Validate {
        /// Path to the CSV file
        #[arg(short = 'f', long)]
        file: PathBuf,
    },
    /// Validate, confirm, then import a CSV sheet
    Import {
        /// Path to the CSV file
        #[arg(short = 'f', long)]
        file: PathBuf,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    init_console_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n❌ {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ImportConfig::from_env();

    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let pool = init_db_pool(&database_url).await?;
    let store = PgRosterStore::new(pool);

    match cli.command {
        Commands::Validate { file } => {
            let rows = read_rows_from_file(&file, config.csv_delimiter)?;
            let outcome = StudentImportService::validate_import_data(&store, &rows)
                .await
                .map_err(|e| e.error)?;
            println!("{}", render_validation(&outcome));
        }
        Commands::Import { file, yes } => {
            let rows = read_rows_from_file(&file, config.csv_delimiter)?;
            let outcome = StudentImportService::validate_import_data(&store, &rows)
                .await
                .map_err(|e| e.error)?;
            println!("{}", render_validation(&outcome));

            let proceed = yes
                || Confirm::new()
                    .with_prompt(format!("Import {} row(s)?", rows.len()))
                    .default(outcome.valid)
                    .interact()?;

            if !proceed {
                println!("Import cancelled");
                return Ok(());
            }

            let result = StudentImportService::import_students(&store, &rows)
                .await
                .map_err(|e| e.error)?;
            println!("\n✅ {}", render_import_result(&result));
        }
    }

    Ok(())
}
