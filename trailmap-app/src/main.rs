use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use trailmap::{DirectoryBridge, LayerTrait, MapSession, SessionOptions};

/// Replays host commands against a map session and prints its state
#[derive(Parser, Debug)]
#[command(name = "trailmap-app", version, about)]
struct Cli {
    /// Directory holding current_map.json, samples.json, ...
    #[arg(value_hint = clap::ValueHint::DirPath)]
    fixtures: PathBuf,

    /// Commands to dispatch in order, e.g. DisplaySamples HideKML
    commands: Vec<String>,

    /// Session options as JSON
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    options: Option<PathBuf>,

    /// Root directory of map packages and KML files
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    storage_root: Option<PathBuf>,

    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    trailmap::init_logging(cli.verbose);

    let mut options = match &cli.options {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading options {}", path.display()))?;
            SessionOptions::from_json_str(&text)?
        }
        None => SessionOptions::default(),
    };
    if let Some(root) = &cli.storage_root {
        options.storage_root = root.clone();
    }

    let bridge = DirectoryBridge::new(&cli.fixtures);
    let mut session = MapSession::builder()
        .with_options(options)
        .init(Box::new(bridge))
        .with_context(|| format!("starting session from {}", cli.fixtures.display()))?;

    for command in &cli.commands {
        log::info!("dispatching {}", command);
        session.dispatch(command);
    }

    let tiles: Vec<String> = session
        .redraw()
        .iter()
        .map(|tile| tile.as_str().to_string())
        .collect();

    let layers: Vec<serde_json::Value> = session
        .layers()
        .layers()
        .map(|layer| {
            serde_json::json!({
                "id": layer.id(),
                "name": layer.name(),
                "features": layer.len(),
            })
        })
        .collect();

    let view = session.view();
    let summary = serde_json::json!({
        "map": session.config().name,
        "projection": session.config().projection.code(),
        "zoom": view.zoom,
        "center": [view.center.x, view.center.y],
        "layers": layers,
        "popup": session.popup().map(|p| p.content.clone()),
        "tiles": tiles,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
