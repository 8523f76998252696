// ============================================================================
// keygate - command-line front end for key-gated access
// ============================================================================
// Usage:
//   keygate status                 Show saved key, age gate and settings
//   keygate accept-terms           Acknowledge the age verification disclaimer
//   keygate login <KEY>            Verify a key and save it on success
//   keygate verify                 Re-verify the saved key (app launch)
//   keygate dashboard [--json]     Show the features unlocked by the saved key
//   keygate logout                 Remove the saved key
//   keygate tiers                  Show what each tier unlocks
// ============================================================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use keygate_core::{
    mask_key, open_stores, AccessGate, AccessTier, Dashboard, KeyBackend, KeyGateConfig,
    SessionState, Verifier,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Key-gated access client
#[derive(Parser)]
#[command(name = "keygate", version, about = "Verify access keys and show unlocked features")]
struct Cli {
    /// Path to the local database (default: ~/.keygate/keygate.redb)
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Verification API base URL
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Where to keep the access key: keyring or file
    #[arg(long, global = true)]
    key_backend: Option<KeyBackend>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show saved key, age gate status and configuration
    Status,

    /// Acknowledge the age verification disclaimer
    AcceptTerms,

    /// Verify an access key and save it on success
    Login {
        /// The access key
        key: String,
    },

    /// Re-verify the saved key
    Verify,

    /// Show the dashboard for the saved key
    Dashboard {
        /// Print the dashboard as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove the saved key
    Logout,

    /// Show what each tier unlocks
    Tiers,
}

const DISCLAIMER: [&str; 4] = [
    "You are at least 18 years of age or the age of legal majority in your jurisdiction",
    "You understand the risks associated with cryptocurrency transactions",
    "You are accessing this app in compliance with the laws of your jurisdiction",
    "You accept full responsibility for your actions on this platform",
];

/// Default log filter when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "keygate=info,keygate_core=info";

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn load_config(cli: &Cli) -> Result<KeyGateConfig> {
    let mut config = KeyGateConfig::from_env().context("Invalid configuration")?;
    if let Some(path) = &cli.db_path {
        config.db_path = path.clone();
    }
    if let Some(base) = &cli.api_base {
        config.api_base = base.clone();
    }
    if let Some(secs) = cli.timeout {
        anyhow::ensure!(secs > 0, "--timeout must be greater than zero");
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(backend) = cli.key_backend {
        config.key_backend = backend;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    if let Commands::Tiers = cli.command {
        cmd_tiers();
        return Ok(());
    }

    let config = load_config(&cli)?;
    debug!("Configuration: {:?}", config);

    let stores = open_stores(&config).context("Failed to open local storage")?;
    let verifier = Verifier::new(&config.api_base, config.timeout)
        .context("Failed to build HTTP client")?;
    let keys = stores.keys.clone();
    let gate = AccessGate::new(verifier, stores.keys, stores.prefs);

    match cli.command {
        Commands::Status => cmd_status(&gate, keys.get().ok().flatten(), &config),
        Commands::AcceptTerms => cmd_accept_terms(&gate),
        Commands::Login { key } => cmd_login(&gate, &key).await,
        Commands::Verify => cmd_verify(&gate).await,
        Commands::Dashboard { json } => cmd_dashboard(&gate, json).await,
        Commands::Logout => cmd_logout(&gate).await,
        Commands::Tiers => Ok(()),
    }
}

fn cmd_status(gate: &AccessGate, saved_key: Option<String>, config: &KeyGateConfig) -> Result<()> {
    println!("=== KeyGate Status ===");
    println!("API:         {}", config.api_base);
    println!("Database:    {}", config.db_path.display());
    println!("Key backend: {:?}", config.key_backend);
    println!(
        "Saved key:   {}",
        saved_key.as_deref().map(mask_key).unwrap_or_else(|| "(none)".into())
    );
    println!(
        "Age gate:    {}",
        if gate.age_gate_accepted()? { "accepted" } else { "not accepted" }
    );
    Ok(())
}

fn cmd_accept_terms(gate: &AccessGate) -> Result<()> {
    println!("By continuing you acknowledge and agree to the following:");
    for item in DISCLAIMER {
        println!("  • {}", item);
    }
    println!();
    println!("Important: cryptocurrency investments carry significant risk.");
    gate.accept_age_gate()?;
    println!("Age verification accepted.");
    Ok(())
}

async fn cmd_login(gate: &AccessGate, key: &str) -> Result<()> {
    let state = gate.submit_key(key).await?;
    report_state(gate, &state)
}

async fn cmd_verify(gate: &AccessGate) -> Result<()> {
    let state = gate.start().await?;
    report_state(gate, &state)
}

async fn cmd_dashboard(gate: &AccessGate, json: bool) -> Result<()> {
    let state = gate.start().await?;
    match gate.dashboard() {
        Some(dashboard) if json => {
            println!("{}", serde_json::to_string_pretty(&dashboard)?);
            Ok(())
        }
        Some(dashboard) => {
            print_dashboard(&dashboard);
            Ok(())
        }
        None => report_state(gate, &state),
    }
}

async fn cmd_logout(gate: &AccessGate) -> Result<()> {
    gate.logout().await?;
    println!("Logged out.");
    Ok(())
}

fn cmd_tiers() {
    for tier in AccessTier::ALL {
        let profile = tier.profile();
        println!("{} ({})", profile.label, tier.tagline());
        for feature in profile.features {
            println!("  + {}", feature);
        }
        for feature in profile.locked {
            println!("  - {}", feature);
        }
        println!();
    }
}

fn report_state(gate: &AccessGate, state: &SessionState) -> Result<()> {
    match state {
        SessionState::Authenticated { tier, .. } => {
            println!("Access verified: {} tier", tier.display_name());
            if let Some(dashboard) = gate.dashboard() {
                print_dashboard(&dashboard);
            }
            Ok(())
        }
        SessionState::VerificationFailed { message } => {
            anyhow::bail!("{}", message)
        }
        SessionState::Unauthenticated => {
            println!("No access key saved. Run `keygate login <KEY>`.");
            Ok(())
        }
        SessionState::Verifying => {
            println!("Verifying access...");
            Ok(())
        }
    }
}

fn print_dashboard(dashboard: &Dashboard) {
    println!();
    println!("Welcome back: {} access active", dashboard.label);
    if let Some(expires) = dashboard.expires_at {
        println!("Expires: {}", expires.format("%Y-%m-%d"));
    }
    if let Some(message) = &dashboard.message {
        println!("{}", message);
    }

    println!();
    println!(
        "Quick actions ({} of {} available):",
        dashboard.enabled_actions().len(),
        dashboard.actions.len()
    );
    for status in &dashboard.actions {
        let marker = if status.available { " " } else { "🔒" };
        println!("  {} {}", marker, status.label);
    }

    println!();
    println!("Available features:");
    for feature in &dashboard.features {
        println!("  • {}", feature);
    }

    if !dashboard.locked.is_empty() {
        println!();
        if dashboard.tier.is_paid() {
            println!("Upgrade to Enterprise to unlock:");
        } else {
            println!("Upgrade to Pro or Enterprise to unlock:");
        }
        for feature in &dashboard.locked {
            println!("  • {}", feature);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_filter_parses() {
        assert!(DEFAULT_LOG_FILTER
            .parse::<tracing_subscriber::EnvFilter>()
            .is_ok());
    }
}
