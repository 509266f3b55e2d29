use crate::config::ConfigOverrides;
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nextra-codemods")]
#[command(about = "Migrate a Nextra 3 documentation site to Nextra 4", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Transform to run on PATH. Without one, runs the full interactive migration
    pub transform: Option<String>,

    /// File or directory the transform operates on
    pub path: Option<PathBuf>,

    /// Move pages/ to pages.bak/ before migrating it into app/
    #[arg(long)]
    pub auto_rename: bool,

    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Answer yes to every confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Do not run the dependency install stage
    #[arg(long)]
    pub skip_install: bool,

    /// Print the available transforms and exit
    #[arg(long)]
    pub list: bool,

    /// Hide progress spinners
    #[arg(short, long)]
    pub quiet: bool,

    /// Plain output (ASCII only, no colors)
    #[arg(long)]
    pub plain: bool,

    /// Increase verbosity level (can be repeated: -v, -vv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }

    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            auto_rename: self.auto_rename,
            assume_yes: self.yes,
            skip_install: self.skip_install,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
