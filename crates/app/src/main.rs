//! Tenant Auth CLI - log in, refresh and log out against a tenant token API.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tenant_auth::Host;
use tenant_auth_domain::{ApiResult, AuthenticationState, TokenResponse};
use tenant_auth_infrastructure::AuthClientConfig;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const PASSWORD_ENV: &str = "TENANT_AUTH_PASSWORD";

#[derive(Parser)]
#[command(name = "tenant-auth")]
#[command(about = "Tenant-scoped JWT session client")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Request a token pair and store the session
    Login {
        /// Tenant key; defaults to the configured tenant
        #[arg(short, long)]
        tenant: Option<String>,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password; read from TENANT_AUTH_PASSWORD when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Exchange the stored pair for a new one
    Refresh,
    /// Clear the stored session
    Logout,
    /// Show who the stored session belongs to
    Whoami,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AuthClientConfig::load(cli.config.as_deref())?;
    let host = Host::from_config(&config).await?;

    match cli.command {
        Command::Login {
            tenant,
            email,
            password,
        } => {
            let password = match password {
                Some(password) => password,
                None => std::env::var(PASSWORD_ENV)
                    .with_context(|| format!("no --password given and {PASSWORD_ENV} is not set"))?,
            };
            let result = host.login(tenant.as_deref(), &email, &password).await?;
            Ok(report("logged in", &result))
        }
        Command::Refresh => {
            let result = host.refresh().await?;
            Ok(report("token refreshed", &result))
        }
        Command::Logout => {
            host.logout().await?;
            if let Some(route) = host.last_route() {
                println!("logged out; next: {route}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Whoami => {
            print_state(&host.whoami().await?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn report(action: &str, result: &ApiResult<TokenResponse>) -> ExitCode {
    if result.is_success() {
        println!("{action}");
        if let Some(expiry) = result
            .success_data()
            .and_then(|data| data.refresh_token_expiry_time)
        {
            println!("refresh token valid until {expiry}");
        }
        ExitCode::SUCCESS
    } else {
        eprintln!("{action} failed: {}", result.message_line());
        ExitCode::FAILURE
    }
}

fn print_state(state: &AuthenticationState) {
    let AuthenticationState::Authenticated(claims) = state else {
        println!("anonymous");
        return;
    };
    println!("tenant:      {}", claims.tenant().unwrap_or("-"));
    println!("email:       {}", claims.email().unwrap_or("-"));
    println!("name:        {}", claims.full_name().unwrap_or("-"));
    println!("user id:     {}", claims.user_id().unwrap_or("-"));
    let permissions = claims.permissions();
    if !permissions.is_empty() {
        println!("permissions: {}", permissions.join(", "));
    }
    if let Some(expires_at) = claims.expires_at() {
        println!("expires:     {expires_at}");
    }
}
