//! Campus CLI - Command-line interface for Campus Route
//!
//! Loads a campus pathway dataset and answers route questions from the
//! terminal, or serves the graph to a map front end.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "campus")]
#[command(author = "Campus Route Contributors")]
#[command(version)]
#[command(about = "Shortest walking routes across a campus map", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to .campus/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Dataset file, overrides the config
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default config in the given directory
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Load and validate the dataset
    Check,

    /// List buildings and gates that can be used as route endpoints
    Locations,

    /// Find the shortest walking route between two locations
    Route {
        /// Start node id or landmark name
        from: String,

        /// Destination node id or landmark name
        to: String,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Emit the network and a route in canvas pixel coordinates
    Render {
        /// Start node id or landmark name
        from: String,

        /// Destination node id or landmark name
        to: String,

        /// Canvas width in pixels
        #[arg(long, default_value = "1000")]
        width: f64,

        /// Canvas height in pixels
        #[arg(long, default_value = "1000")]
        height: f64,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start the WebSocket server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "7480")]
        port: u16,

        /// Headless mode: bind to 0.0.0.0 for remote access
        #[arg(long)]
        headless: bool,

        /// Reload the dataset when the file changes
        #[arg(long)]
        watch: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let ctx = commands::Context {
        config: cli.config,
        data: cli.data,
    };

    let result = match cli.command {
        Commands::Init { path } => commands::init(&path),
        Commands::Check => commands::check(&ctx).await,
        Commands::Locations => commands::locations(&ctx).await,
        Commands::Route { from, to, json } => commands::route(&ctx, &from, &to, json).await,
        Commands::Render {
            from,
            to,
            width,
            height,
            output,
        } => commands::render(&ctx, &from, &to, width, height, output.as_deref()).await,
        Commands::Serve {
            port,
            headless,
            watch,
        } => commands::serve(&ctx, port, headless, watch).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
