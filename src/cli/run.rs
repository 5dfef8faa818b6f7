//! Check-in mode CLI logic
//!
//! Contains the core logic for one scheduled run: load configuration, read
//! accounts, process them, and publish the log for CI.

use crate::{
    Settings,
    accounts::accounts_from_env,
    batch::BatchRunner,
    config::{ConfigLoader, LoadedConfig},
    notify,
    types::BatchResult,
    utils::version,
};
use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the CI output value carrying the log
pub const CI_OUTPUT_NAME: &str = "log_content";

const GITHUB_OUTPUT_DELIMITER: &str = "ABLESCI_CHECKIN_LOG_EOF";

/// Arguments for check-in mode
#[derive(Debug, Default)]
pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub verbose: bool,
}

/// Run every configured account once
pub async fn run_checkin_mode(args: RunArgs) -> Result<BatchResult> {
    let loader = ConfigLoader::new();
    let (loaded, load_error) = match loader.load(args.config.as_deref()) {
        Ok(loaded) => (loaded, None),
        Err(e) => (loader.from_env_only(), Some(e)),
    };
    let LoadedConfig {
        mut settings,
        mut warnings,
    } = loaded;
    settings.logging.verbose |= args.verbose;

    init_tracing(&settings);

    for warning in &warnings {
        tracing::warn!("{}", warning);
    }
    if let Some(e) = load_error {
        tracing::warn!("Failed to load configuration: {}. Using defaults.", e);
        warnings.insert(0, format!("failed to load configuration ({}), using defaults", e));
    }

    tracing::info!("Starting ablesci-checkin v{}", version::get_version());

    let notifier = notify::from_settings(&settings).unwrap_or_else(|e| {
        tracing::warn!("Notifications disabled: {}", e);
        warnings.push(format!("notifications disabled ({})", e));
        None
    });

    let accounts = accounts_from_env(&settings.accounts.env_var);
    let runner = BatchRunner::from_settings(&settings, notifier).with_config_warnings(warnings);
    let result = runner.run(&accounts).await;

    if is_github_actions() {
        publish_ci_output(&result.log)?;
    }

    Ok(result)
}

/// Diagnostics go to stderr so stdout carries only the report
fn init_tracing(settings: &Settings) {
    let default_level = if settings.logging.verbose {
        "debug".to_string()
    } else {
        settings.logging.level.clone()
    };

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Whether we are running inside GitHub Actions
pub fn is_github_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// Single-line workflow command embedding the whole log
pub fn ci_output_line(log: &str) -> String {
    format!(
        "::set-output name={}::{}",
        CI_OUTPUT_NAME,
        escape_workflow_value(log)
    )
}

/// Workflow command escaping for `%`, CR and LF
fn escape_workflow_value(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Append the log as a multi-line value to a `GITHUB_OUTPUT` file
pub fn append_github_output(path: &Path, log: &str) -> std::io::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    writeln!(file, "{}<<{}", CI_OUTPUT_NAME, GITHUB_OUTPUT_DELIMITER)?;
    writeln!(file, "{}", log)?;
    writeln!(file, "{}", GITHUB_OUTPUT_DELIMITER)?;
    Ok(())
}

fn publish_ci_output(log: &str) -> Result<()> {
    println!("{}", ci_output_line(log));

    if let Some(path) = std::env::var_os("GITHUB_OUTPUT") {
        append_github_output(Path::new(&path), log)?;
    }

    Ok(())
}
