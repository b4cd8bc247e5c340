use clap::{Parser, Subcommand};
use magnet::config::Config;
use magnet::core::MagnetResult;
use magnet::di::ServiceContainer;
use magnet::manager::{InstallPolicy, PackageManager};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "magnet")]
#[command(about = "Install, track and watch zip-packaged applications")]
#[command(version)]
struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the manifest of a package archive
    Info {
        /// Path to the package archive
        archive: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Install a package archive
    Install {
        /// Path to the package archive
        archive: PathBuf,
        /// Install even if the package is already recorded
        #[arg(short, long)]
        force: bool,
        /// Accept versions newer than every installed one
        #[arg(long)]
        allow_newer: bool,
        /// With --allow-newer, remove the versions being superseded
        #[arg(long, requires = "allow_newer")]
        uninstall_old: bool,
        /// Remove every installed version first
        #[arg(long)]
        uninstall_existing: bool,
    },
    /// Uninstall every version of a package
    Uninstall {
        /// Package name
        package: String,
        /// Also delete the package archive
        #[arg(long, conflicts_with = "keep_archive")]
        delete_archive: bool,
        /// Keep the package archive even if the config deletes it
        #[arg(long)]
        keep_archive: bool,
    },
    /// List installed packages
    List {
        /// Only show versions of this package
        package: Option<String>,
    },
    /// Watch installed packages for changes until interrupted
    Watch,
}

fn load_config(path: Option<&PathBuf>) -> MagnetResult<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run(cli: Cli) -> MagnetResult<()> {
    let config = load_config(cli.config.as_ref())?;
    let manager = PackageManager::new(ServiceContainer::from_config(&config)?);

    match cli.command {
        Commands::Info { archive, json } => cli::info::run(&manager, &archive, json),
        Commands::Install {
            archive,
            force,
            allow_newer,
            uninstall_old,
            uninstall_existing,
        } => {
            let policy = InstallPolicy {
                force,
                allow_newer_version: allow_newer,
                uninstall_existing,
                uninstall_old,
            };
            cli::install::run(&manager, &archive, policy).await
        }
        Commands::Uninstall {
            package,
            delete_archive,
            keep_archive,
        } => {
            let delete = delete_archive || (config.delete_archive_on_uninstall && !keep_archive);
            cli::uninstall::run(&manager, &package, delete)
        }
        Commands::List { package } => cli::list::run(&manager, package.as_deref()),
        Commands::Watch => cli::watch::run(&manager).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n{}", cli::format_error(&e));
            ExitCode::FAILURE
        }
    }
}
