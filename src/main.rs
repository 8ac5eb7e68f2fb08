// src/main.rs

//! Command-line entry point: loads a configuration, reports the resulting
//! URL layout and users, and optionally evaluates a path for a user.

use anyhow::{Result, anyhow};
use davgate::config::Config;
use davgate::core::Manager;
use std::env;
use tracing::{error, info, warn};
use tracing_subscriber::filter::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    run_app().await
}

async fn run_app() -> Result<()> {
    const VERSION: &str = env!("DAVGATE_BUILD_VERSION");

    let args: Vec<String> = env::args().collect();

    if args.contains(&"--version".to_string()) {
        println!("davgate version {VERSION}");
        return Ok(());
    }

    // Defaults to "davgate.toml" when no --config flag is given.
    let config_path = args
        .iter()
        .position(|arg| arg == "--config")
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
        .unwrap_or("davgate.toml");

    let check = match args.iter().position(|arg| arg == "--check") {
        Some(i) => match (args.get(i + 1), args.get(i + 2)) {
            (Some(identity), Some(path)) => Some((identity.clone(), path.clone())),
            _ => {
                eprintln!("Usage: davgate [--config path] --check <user|-> <path>");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let config = match Config::from_file(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration from \"{config_path}\": {e:#}");
            std::process::exit(1);
        }
    };

    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .compact()
        .with_ansi(true)
        .init();

    // Config loading runs before the subscriber exists, so report it here.
    info!("Loaded configuration from \"{config_path}\".");
    if let Some(users_file) = &config.users_file {
        info!(
            "Merged users file '{}': {} named user(s) configured.",
            users_file,
            config.users.len()
        );
    }
    for warning in config.warnings() {
        warn!("{warning}");
    }

    let manager = Manager::from_config(&config).map_err(|e| {
        error!("Failed to build gateway: {}", e);
        anyhow!(e)
    })?;

    info!("Root URL:   {}", manager.root_url());
    info!("WebDAV URL: {}", manager.webdav_url());
    info!("Default scope: '{}'", manager.default_user().scope.root());
    for name in manager.usernames() {
        let user = manager.user(name)?;
        info!(
            "User '{}': scope '{}', {} rule(s), capabilities {:?}",
            name,
            user.scope.root(),
            user.rules.len(),
            user.capabilities
        );
    }

    if let Some((identity, path)) = check {
        // "-" stands for the default user.
        let identity = if identity == "-" { "" } else { identity.as_str() };
        let verdict = manager.allowed(identity, &path)?;
        println!("{}", if verdict { "allow" } else { "deny" });
    }

    Ok(())
}
