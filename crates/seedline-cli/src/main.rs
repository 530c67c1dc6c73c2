use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "seedline")]
#[command(about = "Seedline - client for the seedline file distribution tracker", long_about = None)]
struct Cli {
    /// Directory holding config.toml and session.json (defaults to the platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Backend base URL, overriding config and environment
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Also write logs to a daily file under the logs directory
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Create an account
    Register {
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Show the current session, optionally loading a user profile
    Whoami {
        /// Fetch and cache the profile of this user id
        #[arg(long)]
        id: Option<String>,
    },
    /// List the shared file catalog
    Files {
        /// Keep polling and print changes until interrupted
        #[arg(short, long)]
        watch: bool,
    },
    /// List files published from this device
    MyFiles,
    /// Publish a file
    Upload { path: PathBuf },
    /// Ask the backend to fetch a file onto this node
    Download { filename: String },
    /// List connected distribution nodes
    Nodes,
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration if none exists
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.config_dir.as_deref(), cli.log_file)?;

    let ctx = commands::Context {
        config_dir: cli.config_dir,
        base_url: cli.base_url,
    };

    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&ctx, &username, &password).await?
        }
        Commands::Logout => commands::auth::logout(&ctx)?,
        Commands::Register { username, password } => {
            commands::auth::register(&ctx, &username, &password).await?
        }
        Commands::Whoami { id } => commands::auth::whoami(&ctx, id.as_deref()).await?,
        Commands::Files { watch } => commands::files::shared(&ctx, watch).await?,
        Commands::MyFiles => commands::files::mine(&ctx).await?,
        Commands::Upload { path } => commands::files::upload(&ctx, &path).await?,
        Commands::Download { filename } => commands::files::download(&ctx, &filename).await?,
        Commands::Nodes => commands::nodes::list(&ctx).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&ctx)?,
            ConfigAction::Init => commands::config::init(&ctx)?,
        },
    }

    Ok(())
}
