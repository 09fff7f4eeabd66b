//! 2D camera

use crate::engine::component::Component;
use crate::engine::types::Vector;

/// A render viewpoint. `position` is the world point shown at the top-left
/// corner of the screen.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera {
    pub position: Vector,
}

impl Camera {
    pub fn new(position: Vector) -> Self {
        Self { position }
    }

    /// World units → screen pixels
    pub fn world_to_screen(&self, world: Vector, pixel_per_unit: f32) -> Vector {
        (world - self.position) * pixel_per_unit
    }

    /// Screen pixels → world units
    pub fn screen_to_world(&self, screen: Vector, pixel_per_unit: f32) -> Vector {
        Vector::new(screen.x / pixel_per_unit, screen.y / pixel_per_unit) + self.position
    }
}

impl Component for Camera {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_offset_camera() {
        let camera = Camera::new(Vector::new(1.0, -2.0));
        let screen = camera.world_to_screen(Vector::new(3.0, 0.5), 100.0);
        assert_eq!(screen, Vector::new(200.0, 250.0));
        assert_eq!(camera.screen_to_world(screen, 100.0), Vector::new(3.0, 0.5));
    }

    #[test]
    fn test_default_camera_is_identity_offset() {
        let camera = Camera::default();
        assert_eq!(camera.screen_to_world(Vector::new(50.0, 25.0), 50.0), Vector::new(1.0, 0.5));
    }
}
