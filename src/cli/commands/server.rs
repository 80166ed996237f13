use anyhow::Context;
use clap::Subcommand;
use serde_json::Value;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;

const DEFAULT_URL: &str = "http://localhost:3000";

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Check server health status from API /health endpoint")]
    Ping {
        #[arg(long, default_value = DEFAULT_URL, help = "Server base URL")]
        url: String,
    },

    #[command(about = "Show server information from API root endpoint")]
    Info {
        #[arg(long, default_value = DEFAULT_URL, help = "Server base URL")]
        url: String,
    },
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = reqwest::Client::new();

    match cmd {
        ServerCommands::Ping { url } => {
            let endpoint = endpoint(&url, "/health")?;
            let response = client.get(endpoint.clone()).send().await;
            match response {
                Ok(resp) if resp.status().is_success() => {
                    let body: Value = resp.json().await.context("invalid health response")?;
                    output_success(&output_format, &format!("{} is up", url), Some(body))
                }
                Ok(resp) => {
                    output_error(&output_format, &format!("{} responded {}", url, resp.status()), Some("SERVER_DEGRADED"))?;
                    anyhow::bail!("server is degraded")
                }
                Err(e) => {
                    output_error(&output_format, &format!("{} unreachable: {}", endpoint, e), Some("SERVER_DOWN"))?;
                    anyhow::bail!("server is down")
                }
            }
        }
        ServerCommands::Info { url } => {
            let body: Value = client
                .get(endpoint(&url, "/")?)
                .send()
                .await
                .with_context(|| format!("failed to reach {}", url))?
                .error_for_status()?
                .json()
                .await
                .context("invalid root response")?;
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
    }
}

fn endpoint(base: &str, path: &str) -> anyhow::Result<url::Url> {
    let base = url::Url::parse(base).with_context(|| format!("invalid server URL '{}'", base))?;
    Ok(base.join(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_onto_base_url() {
        assert_eq!(endpoint("http://localhost:3000", "/health").unwrap().as_str(), "http://localhost:3000/health");
        assert_eq!(endpoint("https://cms.example.com/", "/").unwrap().as_str(), "https://cms.example.com/");
        assert!(endpoint("not a url", "/health").is_err());
    }
}
