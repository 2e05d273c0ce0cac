use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use tenant_gate::access::{AccessPolicy, SessionLookup, SessionState};
use tenant_gate::config::{load_config, ConfigError, GateConfig};

#[derive(Parser)]
#[command(name = "gate-cli")]
#[command(about = "Evaluate the access gate policy offline", long_about = None)]
struct Cli {
    /// Gate configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the route category of a path
    Classify { path: String },
    /// Evaluate a request path for a given session
    Decide {
        path: String,
        /// Caller is signed in
        #[arg(long)]
        authenticated: bool,
        /// Active tenant id (implies nothing without --authenticated)
        #[arg(long)]
        tenant: Option<String>,
        /// Simulate an unreachable identity service
        #[arg(long, conflicts_with_all = ["authenticated", "tenant"])]
        unavailable: bool,
    },
    /// Validate the configuration file and report every problem
    Check,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(ConfigError::Validation(errors)) => {
            eprintln!("configuration is invalid:");
            for error in errors {
                eprintln!("  - {error}");
            }
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // load() validated every pattern already.
    let policy = match AccessPolicy::from_config(&config) {
        Ok(policy) => policy,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Check => {
            println!("configuration OK");
        }
        Commands::Classify { path } => {
            let category = policy.classifier().classify(&path);
            if cli.json {
                println!("{}", serde_json::json!({ "path": path, "category": category }));
            } else {
                println!("{category}");
            }
        }
        Commands::Decide {
            path,
            authenticated,
            tenant,
            unavailable,
        } => {
            let lookup = if unavailable {
                SessionLookup::unavailable("simulated outage")
            } else {
                SessionState::from_parts(authenticated, tenant).into()
            };
            let verdict = policy.evaluate(&path, &lookup);
            if cli.json {
                println!("{}", serde_json::json!({ "path": path, "verdict": verdict }));
            } else {
                match &verdict.location {
                    Some(location) => println!(
                        "{} -> redirect ({}) to {}",
                        verdict.category,
                        verdict.decision.outcome(),
                        location
                    ),
                    None => println!("{} -> allow", verdict.category),
                }
            }
        }
    }

    ExitCode::SUCCESS
}

fn load(path: Option<&std::path::Path>) -> Result<GateConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(GateConfig::default()),
    }
}
