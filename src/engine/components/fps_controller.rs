//! Frame counter and frame rate cap

use macroquad::prelude::get_time;

use crate::app::App;
use crate::engine::component::Component;
use crate::engine::event::{EventBus, Propagation, RenderEvent, SubscriptionId};
use crate::engine::object::ObjectId;

/// Counts rendered frames per second and optionally holds each frame until
/// its time budget is spent.
#[derive(Debug, Default)]
pub struct FpsController {
    /// Target frames per second (None = uncapped)
    cap: Option<u32>,
    fps: u32,
    frames: u32,
    window_start: Option<f64>,
    last_frame: Option<f64>,
    subscription: Option<SubscriptionId>,
}

impl FpsController {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cap of 0 means uncapped.
    pub fn with_cap(cap: u32) -> Self {
        let mut controller = Self::new();
        controller.set_cap(cap);
        controller
    }

    pub fn set_cap(&mut self, cap: u32) {
        self.cap = (cap > 0).then_some(cap);
    }

    pub fn cap(&self) -> Option<u32> {
        self.cap
    }

    /// Frames counted over the last full second
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Seconds one frame may take, if capped
    pub fn frame_time(&self) -> Option<f64> {
        self.cap.map(|cap| 1.0 / cap as f64)
    }

    /// Record a frame rendered at `now` (seconds). Returns how long to wait
    /// before the next frame to honour the cap.
    pub fn tick(&mut self, now: f64) -> f64 {
        let start = *self.window_start.get_or_insert(now);
        if now - start >= 1.0 {
            self.fps = self.frames;
            self.frames = 0;
            self.window_start = Some(now);
            log::trace!("FPS: {}", self.fps);
        }
        self.frames += 1;

        let wait = match (self.frame_time(), self.last_frame) {
            (Some(budget), Some(last)) => (budget - (now - last)).max(0.0),
            _ => 0.0,
        };
        self.last_frame = Some(now + wait);
        wait
    }
}

/// Sleep for the bulk of `seconds`, then spin for precision.
fn wait_for(seconds: f64) {
    let deadline = get_time() + seconds;

    #[cfg(not(target_arch = "wasm32"))]
    {
        let spin_margin = 0.002;
        while get_time() + spin_margin < deadline {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
    }
    while get_time() < deadline {
        std::hint::spin_loop();
    }
}

impl Component for FpsController {
    fn on_enable(&mut self, object: ObjectId, events: &mut EventBus) {
        self.subscription = Some(events.subscribe::<App, RenderEvent, _>(move |ctx, args| {
            let wait = match ctx.scene.component_mut::<FpsController>(object) {
                Some(controller) => controller.tick(args.event.time),
                None => 0.0,
            };
            if wait > 0.0 {
                wait_for(wait);
            }
            Propagation::Continue
        }));
    }

    fn on_disable(&mut self, _object: ObjectId, events: &mut EventBus) {
        if let Some(id) = self.subscription.take() {
            events.unsubscribe(id);
        }
    }
}
