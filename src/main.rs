//! romfu - Flat union view over a game library
//!
//! Usage:
//!   romfu switch fs -i <library> -o <mount_point> [-w]  - Mount the library
//!   romfu switch scan -i <library>                      - List detected games
//!   romfu unmount <mount_point>                         - Unmount
//!   romfu init                                          - Write a default config

use clap::{Parser, Subcommand};
use console::style;
use romfu::{
    assemble::{assemble, resolve_titles},
    config::Config,
    library::{ResolvedTitle, TitleOrder},
    rclone::{self, RcloneMount},
    Error, Result,
};
use std::path::{Path, PathBuf};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "romfu")]
#[command(author = "romfu Contributors")]
#[command(version)]
#[command(about = "Mount a library of game directories as one flat filesystem")]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Switch game libraries
    Switch {
        #[command(subcommand)]
        command: SwitchCommands,
    },

    /// Unmount a mounted library
    Unmount {
        /// Mount point to unmount
        mount_point: PathBuf,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum SwitchCommands {
    /// Mount the flat filesystem
    Fs {
        /// Path to directory containing subdirectories of switch games
        #[arg(short, long)]
        input_dir: Option<PathBuf>,

        /// Path to directory for mounting the flat filesystem
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Enable writing to output directory
        #[arg(short = 'w', long)]
        enable_write: bool,

        /// Print the rclone invocation instead of running it
        #[arg(long)]
        dry_run: bool,

        /// Keep directory listing order instead of sorting by name
        #[arg(long)]
        listing_order: bool,
    },

    /// List the games that would be mounted
    Scan {
        /// Path to directory containing subdirectories of switch games
        #[arg(short, long)]
        input_dir: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set up logging: {}", e);
    }

    if let Err(e) = run_command(cli.command, cli.config.as_deref()) {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_command(command: Commands, config_path: Option<&Path>) -> Result<()> {
    match command {
        Commands::Switch { command } => {
            let config = load_config(config_path)?;
            match command {
                SwitchCommands::Fs {
                    input_dir,
                    output_dir,
                    enable_write,
                    dry_run,
                    listing_order,
                } => cmd_fs(config, input_dir, output_dir, enable_write, dry_run, listing_order),

                SwitchCommands::Scan { input_dir } => cmd_scan(config, input_dir),
            }
        }

        Commands::Unmount { mount_point } => rclone::unmount(&mount_point),

        Commands::Init { force } => cmd_init(config_path, force),
    }
}

/// An explicit path must exist; the default location is optional
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load(expand_tilde(path)),
        None => Config::load_or_default(Config::default_path()),
    }
}

fn cmd_fs(
    mut config: Config,
    input_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    enable_write: bool,
    dry_run: bool,
    listing_order: bool,
) -> Result<()> {
    if let Some(dir) = input_dir {
        config.library.root = Some(dir);
    }
    if let Some(dir) = output_dir {
        config.mount.mount_point = Some(dir);
    }
    if enable_write {
        config.mount.enable_write = true;
    }
    if listing_order {
        config.library.order = TitleOrder::Listing;
    }

    let paths = config.resolve_paths()?;
    let assembly = assemble(&config, &paths)?;

    print_games(&assembly.titles);

    let mount = RcloneMount::new(&assembly.spec, &config.mount);

    if dry_run {
        println!("{}", mount.describe());
        return Ok(());
    }

    println!("Rclone command output:");
    mount.run()
}

fn cmd_scan(mut config: Config, input_dir: Option<PathBuf>) -> Result<()> {
    if let Some(dir) = input_dir {
        config.library.root = Some(dir);
    }

    let root = config.library.root.clone().ok_or_else(|| {
        Error::InvalidConfig("Library directory is required (--input-dir)".to_string())
    })?;

    let titles = resolve_titles(&config, &root)?;
    print_games(&titles);
    println!("{} games", titles.len());

    Ok(())
}

fn cmd_init(config_path: Option<&Path>, force: bool) -> Result<()> {
    let path = config_path
        .map(expand_tilde)
        .unwrap_or_else(Config::default_path);

    if path.exists() && !force {
        return Err(Error::Config(format!(
            "{:?} already exists (use --force to overwrite)",
            path
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    Config::default().save(&path)?;
    info!("Configuration saved to {:?}", path);

    Ok(())
}

fn print_games(titles: &[ResolvedTitle]) {
    println!("Games:");
    for title in titles {
        println!("{}", title.report_line(style(title.name()).blue()));
    }
    println!();
}

/// Expand ~ to home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}
