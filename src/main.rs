use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::Path;
use tracing::{info, warn};

use certdeploy::config::{self, LoggingConfig};
use certdeploy::deployer::{previous, Deployer, TencentCdnDeployer};
use certdeploy::observability;
use certdeploy::tls;

#[derive(Parser)]
#[command(name = "certdeploy")]
#[command(about = "Deploy TLS certificates to Tencent Cloud CDN", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload the configured certificate and attach it to CDN instances
    Deploy {
        /// Deploy even if the certificate matches the previously deployed one
        #[arg(long)]
        force: bool,
    },
    /// Check whether two PEM certificates are the same certificate
    Compare { first: String, second: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Deploy { force } => run_deploy(&cli.config, force).await,
        Commands::Compare { first, second } => {
            let _guard = observability::logging::init_logging(&LoggingConfig::default());
            run_compare(&first, &second)
        }
    }
}

async fn run_deploy(config_path: &str, force: bool) -> Result<()> {
    let config = config::load_config(config_path)?;
    let _guard = observability::logging::init_logging(&config.logging);
    config::validate_config(&config)?;

    let option = config.deployer_option()?;

    let certificate = tls::parse_certificate(&option.certificate.certificate)
        .context("Failed to parse certificate")?;
    info!(
        "Loaded certificate for {:?} (expires: {})",
        certificate.domains, certificate.not_after
    );
    match tls::detect_private_key(&option.certificate.private_key) {
        Ok(key) => info!("Private key algorithm: {}", key.algorithm()),
        Err(e) => warn!("Cannot inspect private key, uploading it as-is: {}", e),
    }
    if certificate.is_expired() {
        warn!("Certificate expired at {}", certificate.not_after);
    }

    let previous_path = config.deploy.previous_certificate_path.as_deref().map(Path::new);

    if !force {
        if let Some(path) = previous_path {
            match previous::is_unchanged(path, &certificate) {
                Ok(true) => {
                    info!("Certificate is unchanged since last deployment, skipping");
                    println!("certificate already deployed, nothing to do");
                    return Ok(());
                }
                Ok(false) => {}
                Err(e) => warn!("Ignoring previous certificate: {:#}", e),
            }
        }
    }

    let certificate_pem = option.certificate.certificate.clone();
    let mut deployer = TencentCdnDeployer::new(option, &config.provider)?;
    let result = deployer.deploy().await;

    for line in deployer.info() {
        println!("{}", line);
    }

    result.with_context(|| format!("Deployment {} failed", deployer.id()))?;

    if let Some(path) = previous_path {
        if let Err(e) = previous::record_deployed(path, &certificate_pem) {
            warn!("Deployment succeeded but the certificate was not recorded: {:#}", e);
        }
    }

    Ok(())
}

fn run_compare(first: &str, second: &str) -> Result<()> {
    let first_pem = std::fs::read_to_string(first)
        .with_context(|| format!("Failed to read certificate file: {}", first))?;
    let second_pem = std::fs::read_to_string(second)
        .with_context(|| format!("Failed to read certificate file: {}", second))?;

    let equivalent = tls::pem_equivalent(&first_pem, &second_pem)?;
    println!("{}", if equivalent { "equivalent" } else { "different" });

    Ok(())
}
