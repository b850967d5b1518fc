#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

use anyhow::{bail, Result};
use dotenvy::dotenv;
use std::time::Duration;

use instacore::resolve::fetcher::AttemptOutcome;
use instacore::{
    config, core::init_logger, core::log_resolver_configuration, validate_url, DownloadResponse, ResolutionResult,
    Resolver, ResolverConfig,
};

mod cli;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Load environment variables from .env if present
    let _ = dotenv();

    init_logger(&config::LOG_LEVEL)?;

    match cli.command {
        Commands::Resolve {
            url,
            json,
            deadline,
            verbose,
        } => {
            let mut config = ResolverConfig::from_env();
            if let Some(secs) = deadline {
                config = config.deadline(Duration::from_secs(secs));
            }
            run_resolve(Resolver::new(config), &url, json, verbose).await
        }
        Commands::Profiles => {
            let resolver = Resolver::from_env();
            for (i, profile) in resolver.profiles().iter().enumerate() {
                println!("{}. {}", i + 1, profile.name);
                for (name, value) in &profile.headers {
                    println!("     {}: {}", name, value);
                }
            }
            Ok(())
        }
    }
}

async fn run_resolve(resolver: Resolver, url: &str, json: bool, verbose: bool) -> Result<()> {
    let url = match validate_url(url) {
        Ok(url) => url,
        Err(response) => return print_response(&response, json),
    };

    log_resolver_configuration(resolver.config(), resolver.profiles());

    let result = resolver.resolve(url).await;
    if verbose {
        print_attempts(&result);
    }

    print_response(&DownloadResponse::from_result(&result), json)
}

fn print_attempts(result: &ResolutionResult) {
    for (i, attempt) in result.attempts_tried.iter().enumerate() {
        let outcome = match &attempt.outcome {
            AttemptOutcome::Success { status, body } => format!("HTTP {} ({} bytes)", status, body.len()),
            AttemptOutcome::Failure(err) => format!("failed: {}", err),
        };
        eprintln!(
            "{:>2}. [{}] {} via {}: {}",
            i + 1,
            attempt.source,
            attempt.target_url,
            attempt.profile,
            outcome
        );
    }
    if let Some(matched) = result.matched {
        eprintln!("matched: {} / {}", matched.source, matched.strategy);
    }
}

fn print_response(response: &DownloadResponse, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
        return Ok(());
    }

    match response {
        DownloadResponse::Success {
            media_url, media_type, ..
        } => {
            println!("{}", media_url);
            log::info!("Media type: {}", media_type);
            Ok(())
        }
        DownloadResponse::Error { error } => bail!("{}", error),
    }
}
