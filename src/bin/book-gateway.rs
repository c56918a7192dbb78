use anyhow::Result;
use book_gateway::auth::claims::UserIdentity;
use book_gateway::auth::token_service::TokenService;
use book_gateway::server;
use book_gateway::utils::config_loader;
use book_gateway::utils::logging;
use book_gateway::utils::logging::LogLevel;
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "book-gateway.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL" , value_enum)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print a signed bearer token for a user
    Token {
        #[arg(long)]
        sub: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Read args, load YAML config
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level.to_owned()).await?;

    match args.command.unwrap_or(Command::Serve) {
        // -------------------------------
        // 2a. Mint a token and exit
        // -------------------------------
        Command::Token { sub, email, name } => {
            let tokens = TokenService::new(service_config.jwt.clone());
            let token = tokens.issue_token(&UserIdentity::new(sub, email, name))?;
            println!("{}", token);
        }

        // -------------------------------
        // 2b. Start http server
        // -------------------------------
        Command::Serve => {
            info!("Service starting...");
            server::server::start(&service_config).await?;
        }
    }

    Ok(())
}
