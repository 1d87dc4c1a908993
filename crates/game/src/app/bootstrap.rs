use std::path::PathBuf;

use engine::{resolve_app_paths, LoopConfig, Scene};
use platformer::config::{load_sim_config, SimConfig, CONFIG_FILE_NAME};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::scene::PlatformerScene;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== Scroller Startup ===");

    let sim_config = resolve_sim_config();
    let config = LoopConfig {
        window_title: "Scroller".to_string(),
        window_width: sim_config.viewport_width.round() as u32,
        window_height: sim_config.viewport_height.round() as u32,
        ..LoopConfig::default()
    };

    AppWiring {
        config,
        scene: Box::new(PlatformerScene::new(sim_config)),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn config_path() -> Option<PathBuf> {
    match resolve_app_paths() {
        Ok(paths) => {
            info!(
                root = %paths.root.display(),
                config_dir = %paths.config_dir.display(),
                "startup"
            );
            Some(paths.config_dir.join(CONFIG_FILE_NAME))
        }
        Err(error) => {
            warn!(error = %error, "project_root_unresolved; using default sim config");
            None
        }
    }
}

/// A broken config file or seed override is reported and replaced by the
/// defaults; it never stops the game from starting.
fn resolve_sim_config() -> SimConfig {
    let loaded = match config_path() {
        Some(path) => load_sim_config(&path),
        None => Ok(SimConfig::default()),
    };
    let config = loaded.and_then(SimConfig::with_env_overrides);
    match config {
        Ok(config) => {
            info!(
                seed = ?config.seed,
                level_complete_x = config.level_complete_x,
                "sim_config_loaded"
            );
            config
        }
        Err(error) => {
            warn!(error = %error, "sim_config_invalid; using defaults");
            SimConfig::default()
        }
    }
}
