// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! osdlib CLI
//!
//! Runs one stream session: detections in, annotated frames out.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use clap::error::ErrorKind;

use osdlib::core::lifecycle::install_signal_handlers;
use osdlib::core::logging::init_logging;
use osdlib::{
    LoopExit, MediaEngine, OsdConfig, Pipeline, PipelineTopology, ReplayEngine, SourceLocator,
    stop_signal,
};

#[derive(Parser)]
#[command(name = "osdlib")]
#[command(author, version, about = "Annotate detections with class counts and styled boxes", long_about = None)]
struct Cli {
    /// Container file path or URI (file://, rtsp://, http://)
    #[arg(value_name = "SOURCE")]
    source: String,

    /// Inference engine configuration file
    #[arg(value_name = "INFER_CONFIG")]
    infer_config: PathBuf,

    /// Annotation settings (TOML, or YAML by extension)
    #[arg(long, value_name = "PATH")]
    osd_config: Option<PathBuf>,

    /// Write annotated frames here as JSON lines
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Pace replayed frames, in milliseconds
    #[arg(long, value_name = "MS")]
    frame_interval_ms: Option<u64>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    init_logging("info");

    match run(cli) {
        Ok(exit) => {
            match &exit {
                LoopExit::EndOfStream => println!("End-of-stream"),
                LoopExit::Error(message) => eprintln!("Error: {}", message),
                LoopExit::Stopped => println!("Stopped"),
                LoopExit::Disconnected => eprintln!("Error: engine went away without end-of-stream"),
            }
            ExitCode::from(exit.exit_code() as u8)
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<LoopExit> {
    if !cli.infer_config.is_file() {
        bail!("Inference config not found: {}", cli.infer_config.display());
    }
    tracing::info!("Inference config: {}", cli.infer_config.display());

    let config = match &cli.osd_config {
        Some(path) => OsdConfig::load(path)?,
        None => OsdConfig::default(),
    };

    let source = SourceLocator::parse(&cli.source);
    let live = config.muxer.is_live(source.is_live());
    tracing::info!(
        "Source {} (live: {}), muxer {}x{} batch {}",
        source,
        live,
        config.muxer.width,
        config.muxer.height,
        config.muxer.batch_size
    );

    let mut engine = ReplayEngine::open(&source)
        .with_context(|| format!("Failed to open source {}", source))?;
    if let Some(output) = cli.output {
        engine = engine.with_sink(output);
    }
    if let Some(ms) = cli.frame_interval_ms {
        engine = engine.with_frame_interval(Duration::from_millis(ms));
    }

    let topology = PipelineTopology::for_source(&source);
    let pipeline = Pipeline::new(Arc::new(config), topology, engine.attacher())
        .context("Failed to build pipeline")?;

    let (stop_handle, stop) = stop_signal();
    install_signal_handlers(stop_handle).context("Failed to install signal handlers")?;

    Ok(pipeline.run(&mut engine, &stop)?)
}
