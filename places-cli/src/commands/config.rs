use std::path::PathBuf;

use crate::config::{ConfigLoader, Overrides};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (merged)
    Show {
        /// Show a single file instead of the merged layers
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Show configuration file paths
    Path,
}

pub fn run(args: ConfigArgs, overrides: &Overrides) -> Result<()> {
    match args.command {
        ConfigCommands::Show { file } => show_config(file, overrides),
        ConfigCommands::Path => show_paths(),
    }
}

fn show_config(file: Option<PathBuf>, overrides: &Overrides) -> Result<()> {
    let config = match file {
        Some(path) => ConfigLoader::load_from_path(&path)?,
        None => ConfigLoader::resolve(overrides)?,
    };
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{}", toml_str);
    Ok(())
}

fn show_paths() -> Result<()> {
    println!("User config:    {}", ConfigLoader::user_config_path().display());
    println!(
        "Project config: {}",
        ConfigLoader::project_config_path().display()
    );
    println!("Session store:  {}", places_paths::data_dir().display());
    Ok(())
}
