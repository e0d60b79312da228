use clap::{Args, Parser, Subcommand};
use patient_core::{
    database_location_from_env_value, CoreConfig, PatientError, PatientReq, PatientRes,
    PatientService, SqlitePatientStore,
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "patient")]
#[command(about = "Patient records CLI")]
struct Cli {
    /// SQLite database file, or `:memory:` for a throwaway database
    #[arg(long, global = true, env = "PATIENT_DB_PATH")]
    db: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all patients
    List,
    /// Show one patient
    Get {
        /// Patient UUID
        id: String,
    },
    /// Create a patient
    Create {
        #[command(flatten)]
        fields: PatientFields,
        /// Registration date (YYYY-MM-DD)
        #[arg(long)]
        registered_date: String,
    },
    /// Replace a patient's fields
    Update {
        /// Patient UUID
        id: String,
        #[command(flatten)]
        fields: PatientFields,
        /// Registration date (YYYY-MM-DD); unchanged if omitted
        #[arg(long)]
        registered_date: Option<String>,
    },
    /// Delete a patient
    Delete {
        /// Patient UUID
        id: String,
    },
}

#[derive(Args)]
struct PatientFields {
    /// Full name
    #[arg(long)]
    name: String,
    /// Email address
    #[arg(long)]
    email: String,
    /// Postal address
    #[arg(long)]
    address: String,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    date_of_birth: String,
}

impl PatientFields {
    fn into_request(self, registered_date: Option<String>) -> PatientReq {
        PatientReq {
            name: Some(self.name),
            email: Some(self.email),
            address: Some(self.address),
            date_of_birth: Some(self.date_of_birth),
            registered_date,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        println!("Use 'patient --help' for commands");
        return Ok(());
    };

    let cfg = CoreConfig::new(database_location_from_env_value(cli.db))?;
    let service = PatientService::new(Arc::new(SqlitePatientStore::open(&cfg)?));

    match command {
        Commands::List => {
            let patients: Vec<PatientRes> =
                service.list()?.into_iter().map(PatientRes::from).collect();
            if patients.is_empty() {
                println!("No patients found.");
            } else {
                print_json(&patients)?;
            }
        }
        Commands::Get { id } => print_json(&PatientRes::from(service.get(&id)?))?,
        Commands::Create {
            fields,
            registered_date,
        } => {
            let patient = service.create(&fields.into_request(Some(registered_date)))?;
            print_json(&PatientRes::from(patient))?;
        }
        Commands::Update {
            id,
            fields,
            registered_date,
        } => {
            let patient = service.update(&id, &fields.into_request(registered_date))?;
            print_json(&PatientRes::from(patient))?;
        }
        Commands::Delete { id } => {
            service.delete(&id)?;
            println!("Deleted patient {id}");
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<PatientError>() {
        Some(PatientError::Validation(errors)) => {
            eprintln!("Validation error:");
            for (field, message) in errors.iter() {
                eprintln!("  {field}: {message}");
            }
        }
        Some(patient_err) if patient_err.is_domain() => eprintln!("{patient_err}"),
        _ => eprintln!("Error: {err:#}"),
    }
}
