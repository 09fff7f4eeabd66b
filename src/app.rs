//! Application lifecycle and main loop
//!
//! `App` owns the [`Context`] and drives it through a fixed sequence:
//!
//! ```text
//! Uninitialized --initialize()--> Initialized --run()--> Running --quit--> Terminated
//! ```
//!
//! Each frame renders first (one `CameraRenderEvent` per camera, then a
//! `RenderEvent`), then drains the input gathered since the previous frame.
//! `App` is also the emitter type of every engine event.

use std::path::Path;

use macroquad::prelude::{clear_background, get_time, is_quit_requested, next_frame, prevent_quit, KeyCode, WHITE};

use crate::config::Config;
use crate::engine::components::FpsController;
use crate::engine::event::{
    CameraRenderEvent, KeyDownEvent, MouseButtonDownEvent, MouseButtonUpEvent, MouseMoveEvent, RenderEvent,
};
use crate::engine::input::{InputEvent, InputQueue};
use crate::engine::resources::{FONTS_DIR, IMAGES_DIR};
use crate::engine::types::Size;
use crate::engine::{Context, ObjectId};
use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Uninitialized,
    Initialized,
    Running,
    Terminated,
}

impl AppState {
    pub fn name(self) -> &'static str {
        match self {
            AppState::Uninitialized => "uninitialized",
            AppState::Initialized => "initialized",
            AppState::Running => "running",
            AppState::Terminated => "terminated",
        }
    }
}

/// Whether the main loop keeps going after an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    state: AppState,
    config: Config,
    ctx: Context,
    input: InputQueue,
    /// Holds engine-level components such as the FPS controller
    root: ObjectId,
    frame: u64,
    shut_down: bool,
}

impl App {
    pub fn new(config: Config) -> EngineResult<Self> {
        let screen = Size::new(config.resolution.width as f32, config.resolution.height as f32);
        let mut ctx = Context::new(config.pixel_per_unit, screen);

        let root = ctx.spawn("root");
        ctx.add_component(root, FpsController::with_cap(config.fps_cap.unwrap_or(0)))?;

        Ok(Self {
            state: AppState::Uninitialized,
            config,
            ctx,
            input: InputQueue::new(),
            root,
            frame: 0,
            shut_down: false,
        })
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    pub fn root(&self) -> ObjectId {
        self.root
    }

    /// Frames rendered so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    fn require(&self, expected: AppState, action: &'static str) -> EngineResult<()> {
        if self.state != expected {
            return Err(EngineError::InvalidState {
                action,
                state: self.state.name(),
            });
        }
        Ok(())
    }

    /// Load every configured image, then every configured font.
    pub fn initialize(&mut self) -> EngineResult<()> {
        self.require(AppState::Uninitialized, "initialize")?;

        log::info!("Loading resources");
        for (name, file) in &self.config.assets.images {
            self.ctx.resources.load_image(name, Path::new(IMAGES_DIR).join(file))?;
        }
        for (name, file) in &self.config.assets.fonts {
            self.ctx.resources.load_font(name, Path::new(FONTS_DIR).join(file))?;
        }
        log::info!(
            "Loaded {} image(s) and {} font(s)",
            self.ctx.resources.image_count(),
            self.ctx.resources.font_count()
        );

        self.state = AppState::Initialized;
        Ok(())
    }

    /// Run the main loop until the window closes or Escape is pressed, then
    /// shut down.
    pub async fn run(&mut self) -> EngineResult<()> {
        self.require(AppState::Initialized, "run")?;
        self.state = AppState::Running;
        prevent_quit();
        log::info!("Entering main loop");

        loop {
            self.render();

            self.input.collect();
            if is_quit_requested() {
                self.input.push(InputEvent::Quit);
            }
            if self.drain_input() == Flow::Quit {
                break;
            }

            next_frame().await;
        }

        log::info!("Leaving main loop after {} frame(s)", self.frame);
        self.state = AppState::Terminated;
        self.shutdown();
        Ok(())
    }

    fn render(&mut self) {
        clear_background(WHITE);

        let cameras = self.ctx.cameras.clone();
        for camera in cameras {
            self.ctx.emit::<App, _>(None, CameraRenderEvent { camera });
        }
        self.ctx.emit::<App, _>(
            None,
            RenderEvent {
                frame: self.frame,
                time: get_time(),
            },
        );
        self.frame += 1;
    }

    /// Handle every queued event, stopping at the first that quits.
    fn drain_input(&mut self) -> Flow {
        while let Some(event) = self.input.poll() {
            if self.handle_event(event) == Flow::Quit {
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    /// Translate one input event into engine events.
    pub fn handle_event(&mut self, event: InputEvent) -> Flow {
        match event {
            InputEvent::Quit => {
                log::info!("Window close requested");
                return Flow::Quit;
            }
            InputEvent::KeyDown(KeyCode::Escape) => {
                log::info!("Escape pressed");
                return Flow::Quit;
            }
            InputEvent::KeyDown(key) => {
                self.ctx.emit::<App, _>(None, KeyDownEvent { key });
            }
            InputEvent::MouseMove { x, y } => {
                self.ctx.emit::<App, _>(None, MouseMoveEvent { x, y });
            }
            InputEvent::MouseButtonDown { button, x, y } => {
                self.ctx.emit::<App, _>(None, MouseButtonDownEvent { button, x, y });
            }
            InputEvent::MouseButtonUp { button, x, y } => {
                self.ctx.emit::<App, _>(None, MouseButtonUpEvent { button, x, y });
            }
            InputEvent::Unrecognized(kind) => {
                log::debug!("Ignoring unrecognized input: {}", kind);
            }
        }
        Flow::Continue
    }

    /// Release everything in reverse acquisition order. Safe to call twice.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        log::info!("Shutting down");

        self.ctx.clear();
        log::debug!("Closing main window");
        self.state = AppState::Terminated;
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}
