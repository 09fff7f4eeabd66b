//! Triton engine
//!
//! GameObjects own components; components talk through a typed event bus.
//! All shared state lives in one [`Context`] that every handler receives.

pub mod component;
pub mod components;
pub mod context;
pub mod event;
pub mod input;
pub mod object;
pub mod resources;
pub mod scene;
pub mod types;

pub use component::Component;
pub use context::Context;
pub use event::{EventArgs, EventBus, Propagation, SubscriptionId};
pub use object::ObjectId;
pub use resources::Resources;
pub use scene::{GameObject, Scene};
pub use types::{Rect, Size, Vector};
