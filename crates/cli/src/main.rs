use clap::{Parser, Subcommand};
use patients_core::config::database_path_from_env_value;
use patients_core::{
    CoreConfig, PatientId, PatientRecord, PatientService, PatientStore, SqlitePatientStore,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "patients")]
#[command(about = "Patient records database CLI")]
struct Cli {
    /// SQLite database file (defaults to PATIENTS_DATABASE_PATH, then patients.sqlite)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,
    /// Insert the sample patients
    Seed,
    /// List all patients
    List,
    /// Delete a patient
    Delete {
        /// Patient id
        id: String,
    },
}

fn resolve_config(database: Option<PathBuf>) -> Result<CoreConfig, Box<dyn std::error::Error>> {
    let path = database.unwrap_or_else(|| {
        database_path_from_env_value(std::env::var("PATIENTS_DATABASE_PATH").ok())
    });
    Ok(CoreConfig::new(path)?)
}

fn describe(record: &PatientRecord) -> String {
    format!(
        "ID: {}, Name: {}, Status: {}, Addresses: {}, Fields: {}",
        record.id,
        record.full_name(),
        record.status,
        record.addresses.len(),
        record.additional_fields.len()
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'patients --help' for commands");
        return Ok(());
    };

    let cfg = resolve_config(cli.database)?;
    // Opening the store applies any pending migrations.
    let store = SqlitePatientStore::from_config(&cfg)?;

    match command {
        Commands::Migrate => {
            let version = store.schema_version().await?;
            println!(
                "Database {} is at schema version {}",
                cfg.database_path().display(),
                version
            );
        }
        Commands::Seed => {
            let added = store.seed().await?;
            println!("Seeded {} patients", added);
        }
        Commands::List => {
            let service = PatientService::new(Arc::new(store));
            let patients = service.list_patients().await?;
            if patients.is_empty() {
                println!("No patients found.");
            } else {
                for row in &patients {
                    match PatientRecord::from_row(row) {
                        Ok(record) => println!("{}", describe(&record)),
                        Err(e) => eprintln!("Error decoding patient {}: {}", row.id, e),
                    }
                }
            }
        }
        Commands::Delete { id } => {
            let id = PatientId::parse(&id)?;
            let removed = store.delete(id).await?;
            if removed == 0 {
                println!("No patient with id {}", id);
            } else {
                println!("Deleted patient with id {}", id);
            }
        }
    }

    Ok(())
}
