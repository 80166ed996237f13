use anyhow::Context;
use clap::Args;
use serde_json::json;

use crate::auth::{issue_token, Identity, Role};
use crate::cli::{utils::output_success, OutputFormat};
use crate::config;

#[derive(Args, Debug)]
pub struct TokenArgs {
    #[arg(long, help = "User id the token is issued for")]
    pub id: i64,

    #[arg(long, help = "User email")]
    pub email: String,

    #[arg(long, default_value = "viewer", help = "Role tier: viewer, contributor, editor or admin")]
    pub role: Role,

    #[arg(long, help = "Display name")]
    pub name: Option<String>,

    #[arg(long, help = "Lifetime in hours (defaults to the configured expiry)")]
    pub hours: Option<u64>,
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let security = &config::config().security;
    let hours = args.hours.unwrap_or(security.jwt_expiry_hours);

    let identity = Identity {
        id: args.id,
        email: args.email,
        name: args.name,
        role: args.role,
        image: None,
    };
    let token = issue_token(&identity, &security.jwt_secret, hours).context("failed to mint token")?;

    match output_format {
        OutputFormat::Text => println!("{}", token),
        OutputFormat::Json => output_success(
            &output_format,
            &format!("Token issued for {} ({})", identity.email, identity.role),
            Some(json!({ "token": token, "expires_in_hours": hours })),
        )?,
    }
    Ok(())
}
