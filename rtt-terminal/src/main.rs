/// RTT Terminal Demo - Lit primitives around an orbiting lamp
///
/// Usage: rtt-terminal [config.toml]
/// Controls:
///   - A/D / Left/Right: Orbit the camera
///   - Q/ESC: Quit
use std::env;
use std::path::Path;

use rtt_terminal::logging::{init_logging, LoggingConfig};
use rtt_terminal::{Scene, TerminalApp, ViewerConfig, ViewerError};

fn main() -> Result<(), ViewerError> {
    let config = match env::args().nth(1) {
        Some(path) => ViewerConfig::load(Path::new(&path))?,
        None => ViewerConfig::default(),
    };

    init_logging(LoggingConfig {
        env_filter: config.log_filter.clone(),
        file: config.log_file.clone(),
    })?;

    let scene = Scene::demo(config.sphere_density, config.light_speed)?;

    let mut app = TerminalApp::new(scene, &config)?;
    app.run()
}
