mod cli;
mod config;
mod errors;
mod processing;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{
    Args,
    BuildArgs,
    Commands,
    InspectArgs,
    WriteTemplateArgs,
};
use config::{
    CONFIG_TEMPLATE,
    Config,
};
use errors::CliError;

// mimalloc seems to work better for windows
#[cfg(target_os = "windows")]
use mimalloc::MiMalloc;

#[cfg(target_os = "windows")]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main_build(args: BuildArgs) -> Result<(), CliError> {
    let config = Config::from_file(&args.config)?.with_cli_args(&args)?;
    info!("Parsed configuration: {:#?}", config);
    processing::build_library(&config)?;
    Ok(())
}

fn main_inspect(args: InspectArgs) -> Result<(), CliError> {
    processing::inspect_library(&args.speclib_file, args.num_entries)?;
    Ok(())
}

fn main_write_template(args: WriteTemplateArgs) -> Result<(), CliError> {
    std::fs::write(&args.output_path, CONFIG_TEMPLATE).map_err(|e| CliError::Io {
        source: e.to_string(),
        path: Some(args.output_path.display().to_string()),
    })?;
    println!("Wrote config template to: {}", args.output_path.display());
    Ok(())
}

fn main() -> std::result::Result<(), CliError> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        ) // This uses RUST_LOG environment variable
        .init();

    let args = Args::parse();

    match args.command {
        Some(Commands::Build(args)) => main_build(args)?,
        Some(Commands::Inspect(args)) => main_inspect(args)?,
        Some(Commands::WriteTemplate(args)) => main_write_template(args)?,
        None => {
            println!("No command provided");
        }
    }
    Ok(())
}
