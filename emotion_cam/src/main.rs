mod camera;
mod classifier;
mod frame;
mod models;
mod window;

use anyhow::{Context, Result};
use camera::Camera;
use classifier::OpenCvEmotionClassifier;
use emotion_wise::console::{LAUNCH_PROMPT, wait_for_acknowledgment, write_instructions};
use emotion_wise::{Clock, EmotionSession, SessionConfig, SystemClock};
use models::ModelPaths;
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;
use window::PreviewWindow;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();

    // --- 1. Session Start & Instructions ---
    let config = SessionConfig::default();
    let clock = SystemClock;
    let started_at = clock.now();

    write_instructions(&mut io::stdout().lock(), &config)?;
    wait_for_acknowledgment(&mut io::stdin().lock(), &mut io::stdout(), LAUNCH_PROMPT)?;

    // --- 2. Model & Device Initialization ---
    let paths = ModelPaths::from_env();
    let mut classifier = OpenCvEmotionClassifier::load(&paths)?;
    let mut camera =
        Camera::open(config.camera_index).with_context(|| format!("opening camera {}", config.camera_index))?;
    let mut window = PreviewWindow::open(&config).context("opening preview window")?;

    // --- 3. Main Processing Loop ---
    let mut session = EmotionSession::new(&config, started_at);
    let summary = session.run(&mut camera, &mut classifier, &mut window, &clock)?;

    info!(
        frames = summary.frames,
        records = summary.records_written,
        log = %config.log_path.display(),
        "EmotionWise closed"
    );
    Ok(())
}
