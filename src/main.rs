//! Triple T: tic-tac-toe on the Triton 2D engine
//!
//! Start-up order:
//! - crash logging, then logging
//! - configuration (fully validated before any window exists)
//! - window, resources, scene
//! - main loop until Escape or window close

use std::cell::Cell;
use std::process::ExitCode;
use std::rc::Rc;

use macroquad::prelude::Conf;
use macroquad::Window;

use triton::app::App;
use triton::config::{Config, CONFIG_PATH};
use triton::error::{EngineResult, EXIT_CODE_ERROR};
use triton::{game, logging, VERSION};

fn window_conf(config: &Config) -> Conf {
    Conf {
        window_title: config.title.clone(),
        window_width: config.resolution.width as i32,
        window_height: config.resolution.height as i32,
        window_resizable: false,
        fullscreen: config.fullscreen,
        ..Default::default()
    }
}

fn main() -> ExitCode {
    // Crash logging first, before any other code
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    logging::init();
    log::info!("Triple T v{}", VERSION);

    let config = match Config::load(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::from(EXIT_CODE_ERROR);
        }
    };
    logging::set_level(config.log_level);

    let status = Rc::new(Cell::new(0));
    log::debug!("Creating main window");
    Window::from_config(window_conf(&config), run(config, status.clone()));

    ExitCode::from(status.get())
}

/// Everything that needs the window. Failures are logged here and reported
/// through `status` once the window is gone.
async fn run(config: Config, status: Rc<Cell<u8>>) {
    if let Err(e) = start(config).await {
        log::error!("{}", e);
        status.set(EXIT_CODE_ERROR);
    }
}

async fn start(config: Config) -> EngineResult<()> {
    let mut app = App::new(config)?;
    app.initialize()?;
    game::setup(app.context_mut())?;
    app.run().await
}
