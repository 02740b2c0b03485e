use clap::{Parser, Subcommand};
use serde_json::json;
use uuid::Uuid;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "codebattle-api")]
#[command(about = "Code Battle API - programmer resource server")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides CODEBATTLE_API_PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Issue a bearer token for local testing")]
    Token {
        #[arg(long, help = "User id to issue the token for (random when omitted)")]
        user_id: Option<Uuid>,
        #[arg(long, default_value = "developer", help = "Display name stored in the token")]
        name: String,
    },

    #[command(about = "Print the effective configuration")]
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli, mut config: AppConfig) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.api.port = port;
            }
            crate::server::serve(config).await
        }
        Commands::Token { user_id, name } => {
            let user_id = user_id.unwrap_or_else(Uuid::new_v4);
            let token = crate::auth::issue_token(user_id, &name, &config.security)?;
            match output_format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "user_id": user_id,
                        "name": name,
                        "token": token,
                        "expires_in_hours": config.security.jwt_expiry_hours,
                    }))?
                ),
                OutputFormat::Text => {
                    println!("User:  {} ({})", name, user_id);
                    println!("Token: {}", token);
                }
            }
            Ok(())
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["codebattle-api"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Text);
    }

    #[test]
    fn token_accepts_user_id() {
        let id = Uuid::new_v4();
        let cli = Cli::try_parse_from(["codebattle-api", "--json", "token", "--user-id", &id.to_string()]).unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
        match cli.command {
            Some(Commands::Token { user_id, name }) => {
                assert_eq!(user_id, Some(id));
                assert_eq!(name, "developer");
            }
            _ => panic!("expected token command"),
        }
    }

    #[test]
    fn serve_accepts_port() {
        let cli = Cli::try_parse_from(["codebattle-api", "serve", "--port", "4000"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve { port: Some(4000) })));
    }
}
