//! siteverify — verify a challenge token from the command line.
//!
//! Exit status: 0 when the token is accepted, 1 when it is rejected by
//! policy, 2 when the verification service could not be reached or
//! understood, 3 on configuration errors.

use anyhow::Context;
use clap::Parser;
use siteverify_engine::{Clock, EngineConfig, SystemClock, VerifyEngine};
use siteverify_types::{PolicyOptions, ProtocolVersion};
use siteverify_utils::{format_duration, init_logging, LogFormat};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "siteverify", about = "Verify challenge tokens against the verification service")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Service secret.
    #[arg(long, global = true, env = "SITEVERIFY_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// Protocol version: "v2" or "v3".
    #[arg(long = "protocol", global = true, env = "SITEVERIFY_PROTOCOL")]
    protocol: Option<ProtocolVersion>,

    /// Request timeout in seconds.
    #[arg(long, global = true, env = "SITEVERIFY_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Verification endpoint URL.
    #[arg(long, global = true, env = "SITEVERIFY_ENDPOINT")]
    endpoint: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "SITEVERIFY_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "SITEVERIFY_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Verify one token and report the outcome.
    Verify(VerifyArgs),
    /// Print the effective configuration as TOML (secret redacted).
    ShowConfig,
}

#[derive(clap::Args)]
struct VerifyArgs {
    /// The challenge token submitted by the end user.
    token: String,

    /// End user's IP address, forwarded to the service.
    #[arg(long)]
    remote_ip: Option<String>,

    /// Required action (V3 only).
    #[arg(long)]
    action: Option<String>,

    /// Minimum score (V3 only). 0 means the default of 0.5.
    #[arg(long)]
    threshold: Option<f32>,

    /// Required hostname.
    #[arg(long)]
    hostname: Option<String>,

    /// Required Android app package name.
    #[arg(long)]
    app_package: Option<String>,

    /// Maximum seconds between solving the challenge and verifying it.
    #[arg(long)]
    max_age_secs: Option<f64>,

    /// Print the service's result as JSON on acceptance.
    #[arg(long)]
    json: bool,
}

/// Merge the optional config file with flags and env vars. Flags win.
fn resolve_config(cli: &Cli) -> anyhow::Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(secret) = &cli.secret {
        config.secret = secret.clone();
    }
    if let Some(version) = cli.protocol {
        config.version = version;
    }
    if let Some(timeout) = cli.timeout_secs {
        config.timeout_secs = timeout;
    }
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

/// Layer per-invocation flags over the configured default policy.
fn resolve_policy(base: &PolicyOptions, args: &VerifyArgs) -> anyhow::Result<PolicyOptions> {
    let mut policy = base.clone();
    if let Some(addr) = &args.remote_ip {
        policy.caller_address = addr.clone();
    }
    if let Some(action) = &args.action {
        policy.required_action = action.clone();
    }
    if let Some(threshold) = args.threshold {
        policy.score_threshold = threshold;
    }
    if let Some(hostname) = &args.hostname {
        policy.required_hostname = hostname.clone();
    }
    if let Some(app) = &args.app_package {
        policy.required_app_package_name = app.clone();
    }
    if let Some(secs) = args.max_age_secs {
        policy.max_response_age =
            Duration::try_from_secs_f64(secs).context("--max-age-secs must be non-negative")?;
    }
    Ok(policy)
}

async fn run_verify(config: &EngineConfig, args: &VerifyArgs) -> anyhow::Result<ExitCode> {
    let engine = VerifyEngine::from_config(config)?;
    let policy = resolve_policy(&config.policy, args)?;

    tracing::info!(
        version = %engine.version(),
        endpoint = engine.endpoint(),
        "verifying challenge token"
    );

    match engine.verify_with_options(&args.token, &policy).await {
        Ok(result) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                let age = SystemClock.since(result.challenge_timestamp());
                println!(
                    "accepted: hostname={} score={:.2} solved {} ago",
                    result.hostname(),
                    result.score(),
                    format_duration(age)
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("rejected: {e}");
            if let Some(body) = e.response_body() {
                tracing::debug!(body, "raw verification response");
            }
            Ok(if e.is_transport_error() {
                ExitCode::from(2)
            } else {
                ExitCode::from(1)
            })
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(3);
        }
    };

    let format = config.log_format.parse::<LogFormat>().unwrap_or_else(|e| {
        eprintln!("warning: {e}, using human output");
        LogFormat::Human
    });
    init_logging(format, &config.log_level);

    let outcome = match &cli.command {
        Command::Verify(args) => run_verify(&config, args).await,
        Command::ShowConfig => {
            let mut shown = config.clone();
            if !shown.secret.is_empty() {
                shown.secret = "<redacted>".to_string();
            }
            shown
                .to_toml_string()
                .map(|toml| {
                    print!("{toml}");
                    ExitCode::SUCCESS
                })
                .map_err(Into::into)
        }
    };

    outcome.unwrap_or_else(|e| {
        eprintln!("error: {e:#}");
        ExitCode::from(3)
    })
}
