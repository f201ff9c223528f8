use engine::{resolve_app_paths, LoopConfig, Scene, StartupError};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{load_board_config, ConfigError};
use super::puzzle;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) menu_scene: Box<dyn Scene>,
    pub(crate) board_scene: Box<dyn Scene>,
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== River Crossing Startup ===");

    let paths = resolve_app_paths()?;
    info!(
        root = %paths.root.display(),
        assets = %paths.assets_dir.display(),
        "startup_paths_resolved"
    );

    let (board_config, source) = load_board_config(&paths.root)?;
    info!(source = %source, "config_loaded");

    let config = LoopConfig {
        asset_root: paths.assets_dir,
        ..LoopConfig::default()
    };
    let (menu_scene, board_scene) =
        puzzle::build_scene_pair(board_config, config.board_width, config.board_height);
    Ok(AppWiring {
        config,
        menu_scene,
        board_scene,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
