//! Built-in components
//!
//! - [`Camera`]: render viewpoint, one `CameraRenderEvent` per frame
//! - [`Sprite`]: draws an image at its owner's position
//! - [`Label`]: draws a line of text
//! - [`MouseListener2D`]: turns raw pointer events into enter/leave/down/up
//!   events for its owner
//! - [`FpsController`]: counts frames and optionally caps the frame rate

mod camera;
mod fps_controller;
mod label;
mod mouse_listener;
mod sprite;

pub use camera::Camera;
pub use fps_controller::FpsController;
pub use label::Label;
pub use mouse_listener::MouseListener2D;
pub use sprite::Sprite;
