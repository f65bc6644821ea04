use std::path::PathBuf;

use depths_engine::{resolve_app_paths, DirSource, Game, GameConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::cli::CliOptions;
use super::loop_runner::AppError;
use super::script::InputScript;

pub(crate) struct AppWiring {
    pub(crate) game: Game,
    pub(crate) script: InputScript,
}

pub(crate) fn build_app(options: CliOptions) -> Result<AppWiring, AppError> {
    init_tracing();
    info!("=== Lower Depths Startup ===");

    let (assets_dir, config_path) = resolve_locations(&options)?;
    let config = match &config_path {
        Some(path) => GameConfig::load_or_default(path)?,
        None => GameConfig::default(),
    };
    let script = InputScript::load(&options.script_path)?;
    info!(
        assets = %assets_dir.display(),
        config = ?config_path.as_ref().map(|path| path.display().to_string()),
        script = %options.script_path.display(),
        frames_per_second = script.frames_per_second,
        steps = script.steps.len(),
        "startup_resolved"
    );

    let game = Game::new(Box::new(DirSource::new(assets_dir)), config)?;
    Ok(AppWiring { game, script })
}

/// An explicit `--assets` skips root detection entirely; the config is then
/// only read when `--config` names one.
fn resolve_locations(options: &CliOptions) -> Result<(PathBuf, Option<PathBuf>), AppError> {
    if let Some(assets_dir) = &options.assets_dir {
        return Ok((assets_dir.clone(), options.config_path.clone()));
    }
    let paths = resolve_app_paths()?;
    let config_path = options
        .config_path
        .clone()
        .unwrap_or(paths.config_path);
    Ok((paths.assets_dir, Some(config_path)))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_assets_bypass_root_detection() {
        let options = CliOptions {
            assets_dir: Some(PathBuf::from("custom/lab")),
            config_path: None,
            script_path: PathBuf::from("run.json"),
        };
        let (assets_dir, config_path) = resolve_locations(&options).expect("resolves");
        assert_eq!(assets_dir, PathBuf::from("custom/lab"));
        assert_eq!(config_path, None);
    }
}
