use clap::Parser;
use robust_input::utils::*;
use serde::Serialize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Walks through a server configuration questionnaire and prints the answers as JSON.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// How many rejected lines to tolerate per question when stdin is not a terminal.
    #[arg(long, default_value_t = 10)]
    attempts: usize,

    /// Print the summary on a single line.
    #[arg(long)]
    compact: bool,
}

#[derive(Debug, Serialize)]
struct ServerConfig {
    hostname: String,
    ip_address: String,
    port: i64,
    workers: i64,
    log_level: String,
    ssl_cert: Option<String>,
}

fn heading(style: Style) -> Vec<Style> {
    vec![style, Style::BOLD]
}

fn ask_string(builder: InputConfigBuilder, attempts: usize) -> Result<String, InputError> {
    let value = builder.max_attempts(attempts).ask()?;
    value.into_string().ok_or(InputError::EndOfInput)
}

fn collect(args: &Args) -> Result<ServerConfig, InputError> {
    let hostname = ask_string(
        InputConfig::builder("Server Hostname")
            .default("localhost")
            .min_length(3)
            .max_length(253)
            .custom_validator(is_hostname)
            .prompt_style(heading(Style::CYAN))
            .error_message("Invalid hostname format"),
        args.attempts,
    )?;

    let ip_address = ask_string(
        ip_address_config("IP Address", Some("127.0.0.1")).prompt_style(heading(Style::CYAN)),
        args.attempts,
    )?;

    let port = InputConfig::builder("Port Number")
        .target(DesiredType::Int)
        .default("8080")
        .custom_validator(|s| s.parse::<i64>().is_ok_and(|p| (1024..=65535).contains(&p)))
        .prompt_style(heading(Style::CYAN))
        .error_message("Port must be between 1024-65535")
        .max_attempts(args.attempts)
        .ask()?
        .as_int()
        .unwrap_or(8080);

    let workers = integer_config("Worker Threads", Some(4), Some(1), Some(64))
        .prompt_style(heading(Style::CYAN))
        .max_attempts(args.attempts)
        .ask()?
        .as_int()
        .unwrap_or(4);

    let log_level = ask_string(
        choice_config("Log Level", &["error", "warn", "info", "debug"], Some("info"))
            .prompt_style(heading(Style::MAGENTA)),
        args.attempts,
    )?;

    let enable_ssl = InputConfig::builder("Enable SSL")
        .target(DesiredType::Bool)
        .default("false")
        .prompt_style(heading(Style::YELLOW))
        .error_message("Please enter yes/no or true/false")
        .max_attempts(args.attempts)
        .ask()?
        .as_bool()
        .unwrap_or(false);

    let ssl_cert = if enable_ssl {
        Some(ask_string(
            InputConfig::builder("SSL Certificate Path")
                .pattern(r#"^[^<>:"|?*]+\.pem$"#)
                .allow_empty(false)
                .prompt_style(heading(Style::YELLOW))
                .error_message("Certificate path must end with .pem"),
            args.attempts,
        )?)
    } else {
        None
    };

    Ok(ServerConfig {
        hostname,
        ip_address,
        port,
        workers,
        log_level,
        ssl_cert,
    })
}

/// Reports why setup stopped and picks the process exit status.
fn failure_code(error: &InputError) -> u8 {
    match error {
        InputError::Interrupted => {
            tracing::info!("setup interrupted by the user");
            eprintln!("\nSetup cancelled.");
            130
        }
        e => {
            tracing::error!(error = %e, "setup failed");
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("{}", apply_style("Server Configuration Setup", &heading(Style::GREEN)));
    println!("{}", "=".repeat(35));

    tracing::debug!(attempts = args.attempts, compact = args.compact, "starting setup");
    let config = match collect(&args) {
        Ok(config) => config,
        Err(e) => return ExitCode::from(failure_code(&e)),
    };
    tracing::debug!(ssl = config.ssl_cert.is_some(), "setup collected");

    let rendered = if args.compact {
        serde_json::to_string(&config)
    } else {
        serde_json::to_string_pretty(&config)
    };

    match rendered {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to render the summary");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
