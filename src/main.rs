// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Smart-card command-line client
//!
//! Talks to the smart-card backend with the session stored on disk.

use anyhow::Context;
use clap::{Parser, Subcommand};
use reqwest::Method;
use smartcard_client::{config::Config, services::AuthRequest, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "smartcard")]
#[command(about = "Client for the smart-card storefront backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check whether the stored session is usable, refreshing it if needed
    Status,
    /// Store a token pair obtained from the login page
    UseTokens {
        access_token: String,
        refresh_token: String,
    },
    /// Send an authenticated request and print the raw response body
    Call {
        /// Path relative to the backend origin, e.g. /users/me
        path: String,
        #[arg(short = 'X', long, default_value = "GET")]
        method: Method,
        /// JSON request body
        #[arg(short, long)]
        data: Option<String>,
    },
    /// Browse or search the card catalog
    Cards {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Log out and forget the stored session
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!(api = %config.api_base_url, "Using backend");

    let state = AppState::from_config(config).context("Failed to build HTTP client")?;

    match cli.command {
        Command::Status => {
            if state.session.ensure_session().await {
                println!("session: valid");
            } else {
                println!("session: not logged in");
                std::process::exit(1);
            }
        }
        Command::UseTokens {
            access_token,
            refresh_token,
        } => {
            state.auth.tokens().set_tokens(&access_token, &refresh_token);
            println!("tokens stored");
        }
        Command::Call { path, method, data } => {
            let mut request = AuthRequest::new(method, path);
            if let Some(data) = data {
                let body: serde_json::Value =
                    serde_json::from_str(&data).context("--data is not valid JSON")?;
                request = request.json(&body)?;
            }

            let response = state.auth.send(&request).await?;
            let status = response.status();
            let body = response.text().await?;
            println!("{}", status);
            println!("{}", body);
        }
        Command::Cards { page, query } => {
            let result = match query {
                Some(q) => state.api.search_cards(&q, page).await?,
                None => state.api.list_cards(page).await?,
            };
            for card in &result.content {
                println!("#{:<5} {:<30} {:>12.0}", card.card_id, card.name, card.price);
            }
            println!("page {} of {}", page, result.total_pages.max(1));
        }
        Command::Logout => {
            state.api.logout().await?;
            println!("logged out");
        }
    }

    Ok(())
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("smartcard_client=info".parse().unwrap())
                .add_directive("warn".parse().unwrap()),
        )
        .with(format)
        .init();
}
