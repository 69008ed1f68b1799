use anyhow::Result;
use clap::{Parser, Subcommand};

mod app;
mod commands;
mod config;

use config::Overrides;

#[derive(Parser)]
#[command(name = "places", about = "Share and discover places")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Root for API requests (overrides config and environment)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Root for server-stored images (overrides config and environment)
    #[arg(long, global = true, value_name = "URL")]
    asset_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with email and password
    Login(commands::auth::LoginArgs),
    /// Create an account and log in
    Register(commands::auth::RegisterArgs),
    /// Forget the stored session
    Logout,
    /// Show who is logged in and which pages are reachable
    Status,
    /// List all users
    Users,
    /// List the places of a user
    Places(commands::places::PlacesArgs),
    /// Show, create, edit or delete a place
    Place(commands::places::PlaceArgs),
    /// Resolve a client path against the current session
    Route(commands::route::RouteArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let overrides = Overrides {
        api_url: cli.api_url,
        asset_url: cli.asset_url,
    };

    // Configuration commands never touch the session
    if let Commands::Config(args) = cli.command {
        return commands::config::run(args, &overrides);
    }

    let app = app::App::start(&overrides).await?;

    match cli.command {
        Commands::Login(args) => commands::auth::login(&app, args).await,
        Commands::Register(args) => commands::auth::register(&app, args).await,
        Commands::Logout => commands::auth::logout(&app).await,
        Commands::Status => commands::auth::status(&app),
        Commands::Users => commands::users::run(&app).await,
        Commands::Places(args) => commands::places::list(&app, args).await,
        Commands::Place(args) => commands::places::run(&app, args).await,
        Commands::Route(args) => commands::route::run(&app, args),
        Commands::Config(_) => Ok(()),
    }
}
