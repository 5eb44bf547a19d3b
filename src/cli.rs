use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use clusterprep::config::PrepConfig;
use clusterprep::prep;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "clusterprep",
    about = "Clean a mixed nominal/numeric table for clustering"
)]
pub struct Cli {
    /// Also write logs to daily-rotating files in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the cleaning pipeline and print a summary of the result
    Clean {
        /// Raw dataset (CSV with a header row)
        #[arg(short, long)]
        data: PathBuf,

        /// Column type table (CSV with one row of nominal/numeric tags)
        #[arg(short, long)]
        types: PathBuf,

        /// Path to a JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Target column name. Overrides the config file.
        #[arg(long)]
        target: Option<String>,

        /// Imputation seed. Overrides the config file.
        #[arg(long)]
        seed: Option<u64>,

        /// Maximum imputation rounds. Overrides the config file.
        #[arg(long)]
        max_iter: Option<usize>,

        /// Predictor cap per regression. Overrides the config file.
        #[arg(long)]
        n_nearest: Option<usize>,
    },
}

pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Clean {
            data,
            types,
            config,
            target,
            seed,
            max_iter,
            n_nearest,
        } => {
            let mut config = match config {
                Some(path) => PrepConfig::from_file(&path)?,
                None => PrepConfig::default(),
            };
            if let Some(target) = target {
                config.target_column = target;
            }
            if let Some(seed) = seed {
                config.imputer.seed = seed;
            }
            if let Some(max_iter) = max_iter {
                config.imputer.max_iter = max_iter;
            }
            if n_nearest.is_some() {
                config.imputer.n_nearest_features = n_nearest;
            }

            handle_clean(&data, &types, &config)
        }
    }
}

fn handle_clean(data: &Path, types: &Path, config: &PrepConfig) -> Result<()> {
    let artifact = prep::clean_files(data, types, config)
        .with_context(|| format!("Failed to clean {}", data.display()))?;

    let summary = serde_json::to_string_pretty(&artifact.summary())
        .context("Failed to serialize summary")?;
    println!("{summary}");
    Ok(())
}
