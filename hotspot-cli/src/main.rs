//! Hotspot CLI
//!
//! Command-line interface for the hotspot payment portal.

use anyhow::Result;
use clap::{Parser, Subcommand};

use hotspot_client::{PayRequest, PortalClient};
use hotspot_hex::TokenService;
use hotspot_types::{Clock, SecretKey, SystemClock, TokenWindow};

#[derive(Parser)]
#[command(name = "hotspot")]
#[command(author, version, about = "Hotspot portal CLI client", long_about = None)]
struct Cli {
    /// Base URL of the portal
    #[arg(long, env = "HOTSPOT_PORTAL_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check portal health
    Health,
    /// Request a pre-auth token
    Preauth {
        #[arg(long)]
        mac: String,
        /// Unix seconds; defaults to now
        #[arg(long)]
        timestamp: Option<i64>,
    },
    /// Start a payment and print the gateway token
    Pay {
        #[arg(long)]
        mac: String,
        #[arg(long)]
        timestamp: i64,
        #[arg(long)]
        token: String,
        #[arg(long)]
        dst: Option<String>,
        /// Payment method code (e.g. gopay, bni_va)
        #[arg(long)]
        method: Option<String>,
    },
    /// Replay a gateway finish callback and print the login redirect
    Verify {
        #[arg(long)]
        order_id: String,
        #[arg(long)]
        mac: String,
        #[arg(long)]
        dst: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Check a session token against the portal
    Auth {
        #[arg(long)]
        mac: String,
        #[arg(long)]
        timestamp: i64,
        #[arg(long)]
        token: String,
    },
    /// Offline token operations
    Token {
        #[command(subcommand)]
        action: TokenCommands,
    },
}

#[derive(Subcommand)]
enum TokenCommands {
    /// Mint a token with the shared secret
    Mint {
        #[arg(long, env = "SECRET_TOKEN_KEY")]
        secret: String,
        #[arg(long)]
        mac: String,
        /// Unix seconds; defaults to now
        #[arg(long)]
        timestamp: Option<i64>,
    },
    /// Check a token against the shared secret
    Verify {
        #[arg(long, env = "SECRET_TOKEN_KEY")]
        secret: String,
        #[arg(long)]
        mac: String,
        #[arg(long)]
        timestamp: i64,
        #[arg(long)]
        token: String,
        /// Accepted clock skew in seconds
        #[arg(long, default_value = "60")]
        window: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let now = SystemClock.unix_seconds();

    let client = PortalClient::new(&cli.api_url)?;

    match cli.command {
        Commands::Health => {
            if client.health().await? {
                println!("✓ Portal is healthy");
            } else {
                println!("✗ Portal is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Preauth { mac, timestamp } => {
            let timestamp = timestamp.unwrap_or(now);
            let token = client.pre_auth(&mac, timestamp).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "timestamp": timestamp,
                    "token": token.token,
                }))?
            );
        }

        Commands::Pay {
            mac,
            timestamp,
            token,
            dst,
            method,
        } => {
            let snap = client
                .pay(PayRequest {
                    mac,
                    timestamp,
                    token,
                    dst,
                    method,
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&snap)?);
        }

        Commands::Verify {
            order_id,
            mac,
            dst,
            status,
        } => {
            let location = client
                .verify(&order_id, &mac, dst.as_deref(), status.as_deref())
                .await?;
            println!("{}", location);
        }

        Commands::Auth {
            mac,
            timestamp,
            token,
        } => {
            client.check_session(&mac, timestamp, &token).await?;
            println!("✓ Session token accepted");
        }

        Commands::Token { action } => run_token(action, now)?,
    }

    Ok(())
}

fn run_token(action: TokenCommands, now: i64) -> Result<()> {
    match action {
        TokenCommands::Mint {
            secret,
            mac,
            timestamp,
        } => {
            let timestamp = timestamp.unwrap_or(now);
            let token = TokenService::new(SecretKey::new(secret)).generate(&mac, timestamp);
            println!("timestamp={}", timestamp);
            println!("token={}", token.as_str());
        }
        TokenCommands::Verify {
            secret,
            mac,
            timestamp,
            token,
            window,
        } => {
            let tokens = TokenService::new(SecretKey::new(secret));
            match tokens.check(&mac, timestamp, &token, TokenWindow::Symmetric(window), now) {
                Ok(()) => println!("✓ Token valid"),
                Err(rejection) => {
                    println!("✗ Token rejected: {:?}", rejection);
                    std::process::exit(1);
                }
            }
        }
    }
    Ok(())
}
