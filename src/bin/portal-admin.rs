use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use employee_portal::access::Role;
use employee_portal::auth::{Authenticator, CredentialHasher, PasswordPolicy};
use employee_portal::config::{load_or_default, PortalConfig};
use employee_portal::store::CredentialStore;

#[derive(Parser)]
#[command(name = "portal-admin")]
#[command(about = "Operator tools for the employee portal credential file", long_about = None)]
struct Cli {
    /// Portal configuration (hashing cost, password policy, credential path).
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print an Argon2id hash for seeding the credential file
    HashPassword { password: String },
    /// Report every password policy rule a candidate fails
    CheckPassword { password: String },
    /// Add an employee to the credential file
    AddUser {
        /// Credential CSV; defaults to `credentials.path` from the config
        #[arg(short, long)]
        file: Option<PathBuf>,
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        #[arg(short, long, default_value = "intern")]
        role: Role,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "employee_portal=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = load_or_default(cli.config.as_deref())?;
    let policy = PasswordPolicy::from(&config.password_policy);

    match cli.command {
        Commands::HashPassword { password } => {
            let hasher = CredentialHasher::new(&config.hashing)?;
            println!("{}", hasher.hash(&password)?);
        }
        Commands::CheckPassword { password } => {
            let violations = policy.violations(&password);
            if violations.is_empty() {
                println!("ok");
            } else {
                for violation in violations {
                    println!("- {}", violation);
                }
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::AddUser { file, username, password, role } => {
            let path = file.unwrap_or_else(|| PathBuf::from(&config.credentials.path));
            add_user(&config, path, &username, &password, role, policy)?;
            println!("Added {} ({})", username, role);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn add_user(
    config: &PortalConfig,
    path: PathBuf,
    username: &str,
    password: &str,
    role: Role,
    policy: PasswordPolicy,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(CredentialStore::load(&path, true));
    let hasher = CredentialHasher::new(&config.hashing)?;
    let authenticator = Authenticator::new(store, hasher, policy.clone())?;

    if let Err(e) = authenticator.register(username, password, role) {
        if let employee_portal::PortalError::PolicyViolation = e {
            for violation in policy.violations(password) {
                eprintln!("- {}", violation);
            }
        }
        return Err(e.into());
    }
    Ok(())
}
