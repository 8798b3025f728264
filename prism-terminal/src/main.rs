//! PrismCore Terminal Demo
//!
//! Renders a small scene with the software path into the terminal.
//!
//! Usage: prism-terminal [--config <file.toml>] [model.obj ...]
//!
//! Without models a red and a green cube are shown. Models that fail to
//! load are skipped with a warning. Logs go to stderr, so
//! redirect it (`2> prism.log`) to keep the picture clean.
//! Controls:
//!   - WASD / Space: Move (Shift = fast, Ctrl = slow)
//!   - Arrow Keys: Look around
//!   - P: Cycle filled / wireframe / points
//!   - L: Toggle debug rays
//!   - F / Enter / Left click: Pick
//!   - Q/ESC: Quit

use std::env;
use std::path::PathBuf;
use std::process;

use log::{error, info};
use prism_terminal::{build_scene, AppConfig, AppError, TerminalApp};

struct Args {
    config: Option<PathBuf>,
    models: Vec<PathBuf>,
}

fn parse_args() -> Result<Args, AppError> {
    let mut config = None;
    let mut models = Vec::new();
    let mut args = env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args
                    .next()
                    .ok_or_else(|| AppError::Usage("--config needs a path".to_string()))?;
                config = Some(PathBuf::from(path));
            }
            "--help" | "-h" => {
                return Err(AppError::Usage(
                    "usage: prism-terminal [--config <file.toml>] [model.obj ...]".to_string(),
                ))
            }
            _ => models.push(PathBuf::from(arg)),
        }
    }

    Ok(Args { config, models })
}

fn run() -> Result<(), AppError> {
    let args = parse_args()?;
    let config = AppConfig::load(args.config.as_deref())?;
    let scene = build_scene(&args.models)?;

    let (vertices, faces) = scene.stats();
    info!(
        "Scene ready: {} objects, {} vertices, {} faces",
        scene.objects().len(),
        vertices,
        faces
    );

    let mut app = TerminalApp::new(scene, config)?;
    app.run()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("{}", e);
        eprintln!("prism-terminal: {e}");
        process::exit(1);
    }
}
