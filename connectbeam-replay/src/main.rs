use anyhow::Context;
use clap::Parser;
use connectbeam_core::view::ViewConverter;
use kurbo::Vec2;
use std::path::PathBuf;

mod config;
use config::AppConfig;

mod scene;
use scene::Scene;

mod script;
use script::{Replay, Script};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "connectbeam-replay")]
#[command(
    author,
    version,
    about = "Replay an event script through the connection tool",
    long_about = None
)]
struct Args {
    /// Scene file (JSON) with the starting shapes
    #[arg(long)]
    scene: PathBuf,

    /// Event script (JSON)
    #[arg(long)]
    script: PathBuf,

    /// Write the report here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Grab distance in view pixels
    #[arg(long)]
    grab_sensitivity: Option<f64>,

    /// Painted handle radius in view pixels
    #[arg(long)]
    handle_radius: Option<f64>,

    /// Registry key of the connector shape to create
    #[arg(long)]
    connector_type: Option<String>,

    /// View zoom factor
    #[arg(long, default_value_t = 1.0)]
    zoom: f64,

    /// Store the effective tool resources as the new defaults
    #[arg(long)]
    save_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("connectbeam-replay v{}", env!("CARGO_PKG_VERSION"));

    let mut config = AppConfig::load();
    if let Some(grab_sensitivity) = args.grab_sensitivity {
        config.resources.grab_sensitivity = grab_sensitivity;
    }
    if let Some(handle_radius) = args.handle_radius {
        config.resources.handle_radius = handle_radius;
    }
    if let Some(connector_type) = &args.connector_type {
        config.resources.connector_type = connector_type.clone();
    }
    config.resources.validate()?;
    if !(args.zoom.is_finite() && args.zoom > 0.0) {
        anyhow::bail!("zoom must be positive, got {}", args.zoom);
    }

    let scene = Scene::from_path(&args.scene)?;
    let script = Script::from_path(&args.script)?;
    log::info!(
        "Replaying {} events on {} shapes",
        script.events.len(),
        scene.shapes.len()
    );

    let view = ViewConverter::new(args.zoom, Vec2::ZERO);
    let mut replay = Replay::new(scene.to_document(), config.resources.clone(), view);
    replay.run(&script);
    let report = replay.finish();
    log::info!(
        "Finished with {} shapes, {} undoable actions",
        report.document.shape_count(),
        report.undo_history.len()
    );

    let json = serde_json::to_string_pretty(&report).context("serializing report")?;
    match &args.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?,
        None => println!("{}", json),
    }

    config.add_recent_scene(args.scene);
    if args.save_config {
        config.save();
    }

    Ok(())
}
