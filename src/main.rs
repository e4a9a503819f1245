//! CLI entry point for folio-rs

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio-rs")]
#[command(version)]
#[command(about = "A markdown blog and portfolio generator", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ItemKind {
    Post,
    Project,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post or project
    New {
        /// Kind of item to create
        #[arg(value_enum)]
        kind: ItemKind,

        /// Title of the new item
        title: String,

        /// Category of a new post
        #[arg(long, default_value = "general")]
        category: String,
    },

    /// List site content (post, project, category)
    List {
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Render a markdown file to HTML on stdout
    Render {
        /// Markdown file, front-matter is skipped
        file: PathBuf,

        /// Print the extracted headings as JSON instead
        #[arg(long)]
        headings: bool,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a server that renders pages on request
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Clean the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio_rs=debug,info"
    } else {
        "folio_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            folio_rs::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New {
            kind,
            title,
            category,
        } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            match kind {
                ItemKind::Post => {
                    tracing::info!("Creating new post in {}: {}", category, title);
                    folio_rs::commands::new::create_post(&folio, &title, &category)?;
                }
                ItemKind::Project => {
                    tracing::info!("Creating new project: {}", title);
                    folio_rs::commands::new::create_project(&folio, &title)?;
                }
            }
        }

        Commands::List { r#type } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            folio_rs::commands::list::run(&folio, &r#type)?;
        }

        Commands::Render { file, headings } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            let file = if file.is_absolute() {
                file
            } else {
                base_dir.join(file)
            };
            folio_rs::commands::render::run(&folio, &file, headings)?;
        }

        Commands::Generate { watch } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            tracing::info!("Generating static files...");

            folio.generate()?;
            println!("Generated successfully!");

            if watch {
                tokio::task::spawn_blocking(move || folio_rs::commands::generate::watch(&folio))
                    .await??;
            }
        }

        Commands::Server { port, ip, open } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            folio_rs::server::start(&folio, &ip, port, open).await?;
        }

        Commands::Clean => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            folio.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("folio-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
