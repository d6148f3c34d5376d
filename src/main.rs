//! Sesame CLI entry point
//!
//! A small demo application driving the full login flow from a terminal:
//! open the authorization page, paste the redirect back, exchange the code.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sesame::{ApiToken, LoginClient};

#[derive(Parser)]
#[command(name = "sesame")]
#[command(about = "🔑 Sesame - OAuth2 PKCE login client")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the Sesame configuration
    Init {
        /// Base URL of the login portal
        #[arg(long)]
        login_url: String,

        /// OAuth client identifier
        #[arg(long)]
        client_id: String,

        /// Application identifier (custom redirect URI scheme)
        #[arg(long)]
        app_uid: String,
    },

    /// Run the login flow and store the obtained token
    Login,

    /// Delete the stored token on the server and locally
    Logout,

    /// Show configuration and token status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            login_url,
            client_id,
            app_uid,
        } => {
            let config = sesame::config::Config::new(login_url, client_id, app_uid);
            sesame::config::save(&config)?;
            println!("✓ Configuration saved to {:?}", sesame::config::config_path());
            println!("\nNext step: sesame login");
        }

        Commands::Login => {
            run_login().await?;
        }

        Commands::Logout => {
            run_logout().await?;
        }

        Commands::Status => {
            let config = sesame::config::load()?;
            println!("🔑 Sesame Status\n");
            println!("Login URL: {}", config.login_url);
            println!("Client ID: {}", config.client_id);
            println!("App UID:   {}", config.app_uid);

            match load_token()? {
                Some(token) => {
                    let state = if token.is_expired() { "expired" } else { "valid" };
                    println!("Token:     {} (user {})", state, token.user_id);
                }
                None => println!("Token:     not set (run 'sesame login')"),
            }
        }
    }

    Ok(())
}

async fn run_login() -> Result<()> {
    let config = sesame::config::load()?;
    let client = LoginClient::new(config.login_url, config.client_id, config.app_uid);

    println!("\n🔐 Opening browser for authorization...\n");
    let auth_url = client.start()?;
    println!("If the browser doesn't open, visit this URL:\n{}\n", auth_url);

    // A terminal app cannot receive a custom-scheme redirect, so the user
    // pastes the URI the login server redirected to.
    println!("After authorizing, paste the redirect URI here:");
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;

    let code = client.check_response(line.trim())?;
    println!("✓ Authorization received, exchanging token...\n");

    let token = client.get_token(&code).await?;
    save_token(&token)?;

    println!("✓ Logged in as user {}", token.user_id);
    if let Some(expires_at) = token.expires_at {
        println!("Token expires at {}", expires_at);
    }

    Ok(())
}

async fn run_logout() -> Result<()> {
    let token = match load_token()? {
        Some(token) => token,
        None => {
            println!("No stored token; nothing to do");
            return Ok(());
        }
    };

    let config = sesame::config::load()?;
    let client = LoginClient::new(config.login_url, config.client_id, config.app_uid);

    if let Err(e) = client.delete_token(&token).await {
        // Remove the local copy even when the server-side deletion fails
        tracing::warn!("Token deletion failed ({:?}): {}", e.status(), e);
    }

    std::fs::remove_file(sesame::config::token_path())?;
    println!("✓ Logged out successfully");

    Ok(())
}

fn load_token() -> Result<Option<ApiToken>> {
    let path = sesame::config::token_path();
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

fn save_token(token: &ApiToken) -> Result<()> {
    let path = sesame::config::token_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(&path, serde_json::to_string_pretty(token)?)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}
