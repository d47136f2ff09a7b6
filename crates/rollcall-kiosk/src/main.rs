use anyhow::{Context, Result};
use rollcall_aws::AwsServices;
use rollcall_core::Settings;
use rollcall_hw::V4lSource;
use std::sync::mpsc;
use tracing_subscriber::EnvFilter;

mod capture;
mod commands;
mod controller;
mod view;

use capture::PipelineCapture;
use controller::Controller;
use view::TerminalView;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env();
    tracing::info!(
        camera = %settings.camera_device,
        bucket = %settings.bucket,
        table = %settings.table_name,
        threshold = settings.similarity_threshold,
        "rollcall-kiosk starting"
    );

    let services = AwsServices::connect(&settings).await;
    let handler = PipelineCapture::new(
        services.pipeline(&settings),
        tokio::runtime::Handle::current(),
        std::env::temp_dir(),
    );
    let source = V4lSource::new(settings.camera_device.clone());

    let mut view = TerminalView::stdout();
    view.instructions();

    let (tx, rx) = mpsc::channel();
    commands::spawn_stdin_reader(tx).context("failed to spawn stdin reader")?;

    let mut controller = Controller::new(source, handler, view);

    // Camera reads and pipeline calls block; keep them off the async workers.
    tokio::task::spawn_blocking(move || controller.run(&rx))
        .await
        .context("controller thread panicked")?;

    tracing::info!("rollcall-kiosk shutting down");
    Ok(())
}
