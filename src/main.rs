use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use docs_en_translator::{walk_roots, ChatTranslator, TranslateOptions, TranslationLibConfig};

/// Translate Chinese Markdown/JSON docs into parallel `.en` files.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Folders to scan (overrides the configured list)
    folders: Vec<PathBuf>,

    /// Configuration file; defaults to the first of docs-translator.toml,
    /// translation-config.toml, config.toml found in the working directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Chat model to use
    #[arg(short, long, env = "OPENAI_MODEL")]
    model: Option<String>,

    /// Copy fenced code blocks verbatim instead of sending them for translation
    #[arg(long)]
    skip_code_blocks: bool,

    /// Don't echo translated segments to stdout
    #[arg(short, long)]
    quiet: bool,

    /// Write an example configuration file and exit
    #[arg(long, value_name = "FILE")]
    init_config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = &args.init_config {
        TranslationLibConfig::generate_example_config(path)?;
        info!("Wrote example configuration to {}", path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = match &args.config {
        Some(path) => TranslationLibConfig::from_file(path)?,
        None => TranslationLibConfig::load_from_default_locations(),
    };
    config.apply_env()?;

    if let Some(model) = args.model {
        config.translation.model = model;
    }
    if args.skip_code_blocks {
        config.translation.translate_code_blocks = false;
    }
    if !args.folders.is_empty() {
        config.walk.folders = args.folders;
    }

    let options = TranslateOptions {
        translate_code_blocks: config.translation.translate_code_blocks,
        echo: !args.quiet,
    };
    let translator = ChatTranslator::new(config.translation.clone())?;
    info!(
        endpoint = translator.endpoint(),
        model = %config.translation.model,
        folders = config.walk.folders.len(),
        "starting translation"
    );

    let mut failed = 0usize;
    for result in walk_roots(&translator, &config.walk.folders, &options).await {
        match result {
            Ok(report) => info!(
                root = %report.root.display(),
                files = report.files.len(),
                segments = report.segments(),
                "folder done"
            ),
            Err(e) => {
                failed += 1;
                error!("{}", e);
            }
        }
    }

    if failed > 0 {
        error!("{} of {} folders stopped early", failed, config.walk.folders.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
