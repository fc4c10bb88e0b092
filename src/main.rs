use anyhow::Result;
use clap::{Parser, Subcommand};

/// mailform - contact form intake and notification API
#[derive(Parser)]
#[command(name = "mailform")]
#[command(about = "Contact form backend: validate, store and email submissions", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = mailform::Config::load(cli.config)?;

    mailform::observability::init_observability("mailform", &config.logging)?;

    config.validate()?;

    match cli.command {
        Commands::Serve { host, port } => mailform::server::serve(config, host, port).await,
        Commands::Migrate => mailform::migrate::migrate(&config).await,
        Commands::Reset => mailform::migrate::reset(&config).await,
    }
}
