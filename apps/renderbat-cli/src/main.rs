use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use renderbat_shader::{MAX_TEXTURE_SLOTS, ShaderConfig, SourceAssembler, StageKind};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "renderbat-cli", about = "CLI tool for render-bat shader sources")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Shader configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and pipeline constants
    Info,
    /// Resolve a shader file and summarize its stages
    Check {
        /// Annotated shader source
        file: PathBuf,
        /// Override the configured include directory
        #[arg(long)]
        include_dir: Option<PathBuf>,
    },
    /// Print one stage's fully resolved source
    Expand {
        /// Annotated shader source
        file: PathBuf,
        /// Stage to print: vertex, geometry, fragment or compute
        #[arg(short, long)]
        stage: StageKind,
        /// Override the configured include directory
        #[arg(long)]
        include_dir: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>, include_dir: Option<PathBuf>) -> Result<ShaderConfig> {
    let config = match path {
        Some(path) => ShaderConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ShaderConfig::default(),
    };
    Ok(match include_dir {
        Some(dir) => config.with_include_dir(dir),
        None => config,
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let config = load_config(cli.config.as_deref(), None)?;
            println!("renderbat-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("shader: {}", renderbat_shader::crate_info());
            println!("include dir: {}", config.include_dir.display());
            println!("uniform location cache: {}", config.cache_uniform_locations);
            println!("texture slots: {MAX_TEXTURE_SLOTS}");
            let stages: Vec<_> = StageKind::ALL.iter().map(|s| s.as_str()).collect();
            println!("stages: {}", stages.join(", "));
        }
        Commands::Check { file, include_dir } => {
            let config = load_config(cli.config.as_deref(), include_dir)?;
            let sources = SourceAssembler::from_config(&config).assemble(&file)?;
            if sources.is_empty() {
                anyhow::bail!("{} declares no #type blocks", file.display());
            }

            println!("{}: {} stage(s)", file.display(), sources.len());
            for (stage, source) in sources.iter() {
                println!(
                    "  {stage:<8} {:>5} lines {:>7} bytes",
                    source.lines().count(),
                    source.len()
                );
            }
            println!("fingerprint: {}", sources.fingerprint());
        }
        Commands::Expand {
            file,
            stage,
            include_dir,
        } => {
            let config = load_config(cli.config.as_deref(), include_dir)?;
            let sources = SourceAssembler::from_config(&config).assemble(&file)?;
            let source = sources
                .get(stage)
                .with_context(|| format!("{} has no {stage} stage", file.display()))?;
            print!("{source}");
        }
    }

    Ok(())
}
