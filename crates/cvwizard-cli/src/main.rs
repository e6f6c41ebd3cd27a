use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use cvwizard_cli::commands;
use cvwizard_cli::config::{self, Backend, CliConfig};
use cvwizard_cli::runtime::Runtime;
use cvwizard_core::models::job::JobContext;
use eyre::{Result, WrapErr};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cvwizard", version, about = "Submit resumes for automated review")]
struct Cli {
    /// Config file (defaults to the per-user config directory)
    #[arg(long, global = true, env = "CVWIZARD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a PDF, evaluate it, and store the feedback
    Submit {
        /// Path to the PDF
        file: PathBuf,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "description_file")]
        description: Option<String>,
        /// Read the job description from a file
        #[arg(long)]
        description_file: Option<PathBuf>,
    },
    /// List stored records (unordered)
    List {
        /// Only records whose evaluation finished
        #[arg(long)]
        completed: bool,
    },
    /// Show one record with links to its document and preview
    Show {
        /// Record id
        id: String,
    },
    /// Delete every uploaded file and record
    Wipe {
        #[arg(long)]
        yes: bool,
    },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        sub: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Write a new config file
    Init {
        /// Store everything in this S3 bucket (otherwise use local storage)
        #[arg(long)]
        bucket: Option<String>,
        /// Local storage root
        #[arg(long, conflicts_with = "bucket")]
        local_root: Option<PathBuf>,
        #[arg(long)]
        region: Option<String>,
        /// Named AWS profile
        #[arg(long)]
        profile: Option<String>,
        #[arg(long)]
        model_id: Option<String>,
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => config::config_path()?,
    };

    let mut stdout = std::io::stdout();

    match cli.command {
        Commands::Submit {
            file,
            company,
            title,
            description,
            description_file,
        } => {
            let description = match description_file {
                Some(path) => Some(
                    tokio::fs::read_to_string(&path)
                        .await
                        .wrap_err_with(|| format!("failed to read {}", path.display()))?,
                ),
                None => description,
            };
            let job = JobContext::new(company, title, description);
            let runtime = load_runtime(&config_path).await?;
            commands::submit(&runtime, &file, job, &mut stdout).await?;
        }
        Commands::List { completed } => {
            let runtime = load_runtime(&config_path).await?;
            let count = commands::list(&runtime, completed, &mut stdout).await?;
            tracing::debug!(count, "listed records");
        }
        Commands::Show { id } => {
            let runtime = load_runtime(&config_path).await?;
            commands::show(&runtime, &id, &mut stdout).await?;
        }
        Commands::Wipe { yes } => {
            let runtime = load_runtime(&config_path).await?;
            let summary = commands::wipe(&runtime, yes).await?;
            println!("deleted {} files and all records", summary.blobs_deleted);
        }
        Commands::Config { sub } => run_config(sub, &config_path)?,
    }

    Ok(())
}

async fn load_runtime(path: &Path) -> Result<Runtime> {
    let mut config = config::load_or_default(path)?;
    config.apply_env(|name| std::env::var(name).ok());
    Runtime::build(&config).await
}

fn run_config(sub: ConfigCommands, path: &Path) -> Result<()> {
    match sub {
        ConfigCommands::Show => {
            let mut config = config::load_or_default(path)?;
            config.apply_env(|name| std::env::var(name).ok());
            println!("# {}", path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommands::Init {
            bucket,
            local_root,
            region,
            profile,
            model_id,
            force,
        } => {
            if path.exists() && !force {
                eyre::bail!("{} already exists (use --force to replace it)", path.display());
            }
            let root = match local_root {
                Some(root) => root,
                None => config::default_data_dir()?,
            };
            let mut config = CliConfig::local(root);
            if let Some(bucket) = bucket {
                config.backend = Backend::S3 { bucket };
            }
            if let Some(region) = region {
                config.region = region;
            }
            if let Some(model_id) = model_id {
                config.model_id = model_id;
            }
            config.profile = profile;
            config::save_config(path, &config)?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}

/// Human-readable logs on stderr; JSON lines when `CVWIZARD_LOG_JSON` is set.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if std::env::var_os("CVWIZARD_LOG_JSON").is_some() {
        builder.json().init();
    } else {
        builder.init();
    }
}
