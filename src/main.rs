use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use tag_curator::config::{config_path, load_config, log_path};
use tag_curator::curator::{CurationPolicy, create_registries, curate_images, split_tags};
use tag_curator::logging::init_logging;
use tag_curator::version::outlier::DEFAULT_MIN_MAJOR_GAP;
use tag_curator::version::types::ImageRef;

#[derive(Parser)]
#[command(name = "tag-curator")]
#[command(version, about = "Split container image tags into the release line and outliers")]
struct Cli {
    /// Log level for tag-curator (overrides TAG_CURATOR_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Write log lines as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split tags given on the command line without contacting a registry
    Split {
        /// Major-version jump that starts the outlier region
        #[arg(long, default_value_t = DEFAULT_MIN_MAJOR_GAP)]
        min_gap: u64,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Raw image tags
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Fetch tags from registries and split them per image
    Check {
        /// Config file (defaults to $XDG_CONFIG_HOME/tag-curator/config.json)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Images to check; defaults to the images listed in the config
        images: Vec<ImageRef>,
    },
}

impl Command {
    /// Whether failing to open the log file aborts the command
    fn requires_log_file(&self) -> bool {
        matches!(self, Command::Check { .. })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let guard = match init_logging(&log_path(), cli.log_level.as_deref(), cli.log_json) {
        Ok(guard) => Some(guard),
        Err(e) if !cli.command.requires_log_file() => {
            eprintln!("tag-curator: logging disabled: {}", e);
            None
        }
        Err(e) => return Err(e).context("Failed to initialize logging"),
    };

    match cli.command {
        Command::Split { min_gap, json, tags } => {
            let report = split_tags("tags", tags.as_slice(), min_gap)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("remaining: {}", report.remaining.join(" "));
                println!("outliers: {}", report.outliers.join(" "));
                if !report.skipped.is_empty() {
                    println!("skipped: {}", report.skipped.join(" "));
                }
            }
            Ok(())
        }
        Command::Check { config, images } => {
            let path = config.unwrap_or_else(config_path);
            let config = load_config(&path)?;
            let images = if images.is_empty() {
                config.images.clone()
            } else {
                images
            };
            anyhow::ensure!(
                !images.is_empty(),
                "No images given and none configured in {}",
                path.display()
            );

            let registries = create_registries(&config, &images);
            let policy = CurationPolicy::from(&config);
            info!("Checking {} images", images.len());

            let report = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?
                .block_on(curate_images(&registries, &images, &policy));

            println!("{}", serde_json::to_string_pretty(&report)?);

            if report.has_failures() {
                drop(guard);
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
