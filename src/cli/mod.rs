//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod build;
mod info;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::build::Step;
use crate::icon::IconSize;

pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// dexsprite - Turn raw monster sprite assets into game-ready sprites
#[derive(Parser)]
#[command(name = "dexsprite")]
#[command(about = "Turn raw monster sprite assets into battle, follower and icon sprites")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Path to dexsprite.toml (default: search upward from the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding one subdirectory per species
    #[arg(long, global = true)]
    pub sprites: Option<PathBuf>,

    /// Output root; sprites are written below <out>/sprites
    #[arg(long, global = true)]
    pub out: Option<PathBuf>,

    /// Directory holding sparkles.png and atlasdata.txt
    #[arg(long, global = true)]
    pub resources: Option<PathBuf>,

    /// Show debug logging and skipped species
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Options of the full build
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Skip front battle sprites
    #[arg(long)]
    pub skip_front: bool,

    /// Skip back battle sprites
    #[arg(long)]
    pub skip_back: bool,

    /// Skip overworld follower sheets
    #[arg(long)]
    pub skip_overworld: bool,

    /// Skip menu icons
    #[arg(long)]
    pub skip_icons: bool,

    /// Disable odd-width mirror correction of overworld frames
    #[arg(long)]
    pub no_mirror: bool,

    /// Build menu icons from the shiny overworld sheet
    #[arg(long)]
    pub shiny_icons: bool,

    /// Menu icon size
    #[arg(long, value_enum)]
    pub icon_size: Option<IconSize>,

    /// Number of species processed in parallel
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Report progress as JSON lines on stdout
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Regenerate every sprite (clears <out>/sprites first)
    Build(BuildArgs),

    /// Write animated front battle sprites
    Front,

    /// Write still back battle sprites
    Back,

    /// Write overworld follower sheets and copy the atlas
    Overworld {
        /// Disable odd-width mirror correction
        #[arg(long)]
        no_mirror: bool,
    },

    /// Write menu icons
    Icons {
        /// Use the shiny overworld sheet
        #[arg(long)]
        shiny: bool,

        /// Icon size
        #[arg(long, value_enum)]
        size: Option<IconSize>,
    },

    /// Print the frame timing a species' animation scripts expand to
    Track {
        /// Species directory
        dir: PathBuf,
    },

    /// Print the normal and shiny palettes of a species
    Palette {
        /// Species directory
        dir: PathBuf,
    },
}

/// Initialise logging; `RUST_LOG` overrides the default filter.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let global = &cli.global;
    match cli.command {
        Commands::Build(args) => build::run_build(global, &args),
        Commands::Front => build::run_single(global, Step::Front, Default::default()),
        Commands::Back => build::run_single(global, Step::Back, Default::default()),
        Commands::Overworld { no_mirror } => {
            let overrides = crate::config::CliOverrides {
                mirror: no_mirror.then_some(false),
                ..Default::default()
            };
            build::run_single(global, Step::Overworld, overrides)
        }
        Commands::Icons { shiny, size } => {
            let overrides = crate::config::CliOverrides {
                shiny_icons: shiny.then_some(true),
                icon_size: size,
                ..Default::default()
            };
            build::run_single(global, Step::Icons, overrides)
        }
        Commands::Track { dir } => info::run_track(&dir),
        Commands::Palette { dir } => info::run_palette(&dir),
    }
}
