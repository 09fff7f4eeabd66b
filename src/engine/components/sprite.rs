//! Image drawing component

use macroquad::prelude::{draw_texture_ex, vec2, Color, DrawTextureParams};

use super::Camera;
use crate::app::App;
use crate::engine::component::Component;
use crate::engine::context::Context;
use crate::engine::event::{CameraRenderEvent, EventBus, Propagation, SubscriptionId};
use crate::engine::object::ObjectId;
use crate::engine::types::Size;

/// Draws a named image with its top-left corner at the owner's world
/// position, once per camera per frame.
#[derive(Debug, Clone)]
pub struct Sprite {
    image: Option<String>,
    /// Size in world units (None = the image's pixel size)
    pub size: Option<Size>,
    visible: bool,
    opacity: f32,
    subscription: Option<SubscriptionId>,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            image: None,
            size: None,
            visible: true,
            opacity: 1.0,
            subscription: None,
        }
    }
}

impl Sprite {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: Some(image.into()),
            ..Self::default()
        }
    }

    /// A sprite with no image yet.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn set_image(&mut self, image: impl Into<String>) {
        self.image = Some(image.into());
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Clamped to 0..=1
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Draws at all this frame
    pub fn is_drawn(&self) -> bool {
        self.visible && self.opacity > 0.0 && self.image.is_some()
    }
}

fn draw_sprite(ctx: &Context, object: ObjectId, camera: ObjectId) {
    let Some(sprite) = ctx.scene.component::<Sprite>(object) else {
        return;
    };
    if !sprite.is_drawn() {
        return;
    }
    let Some(name) = sprite.image() else {
        return;
    };
    let Some(image) = ctx.resources.image(name) else {
        log::trace!("Sprite on {} references unknown image '{}'", object, name);
        return;
    };
    let (Some(camera), Some(world)) = (ctx.scene.component::<Camera>(camera), ctx.scene.world_position(object)) else {
        return;
    };

    let screen = camera.world_to_screen(world, ctx.pixel_per_unit);
    let dest = match sprite.size {
        Some(size) => vec2(ctx.units(size.width), ctx.units(size.height)),
        None => vec2(image.size.width, image.size.height),
    };
    draw_texture_ex(
        &image.texture,
        screen.x,
        screen.y,
        Color::new(1.0, 1.0, 1.0, sprite.opacity),
        DrawTextureParams {
            dest_size: Some(dest),
            ..Default::default()
        },
    );
}

impl Component for Sprite {
    fn on_enable(&mut self, object: ObjectId, events: &mut EventBus) {
        self.subscription = Some(events.subscribe::<App, CameraRenderEvent, _>(move |ctx, args| {
            draw_sprite(ctx, object, args.event.camera);
            Propagation::Continue
        }));
    }

    fn on_disable(&mut self, _object: ObjectId, events: &mut EventBus) {
        if let Some(id) = self.subscription.take() {
            events.unsubscribe(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opacity_is_clamped() {
        let mut sprite = Sprite::new("board");
        sprite.set_opacity(1.7);
        assert_eq!(sprite.opacity(), 1.0);
        sprite.set_opacity(-0.2);
        assert_eq!(sprite.opacity(), 0.0);
        assert!(!sprite.is_drawn());
    }

    #[test]
    fn test_hidden_and_empty_are_not_drawn() {
        assert!(Sprite::new("cross").is_drawn());
        assert!(!Sprite::new("cross").hidden().is_drawn());
        assert!(!Sprite::empty().is_drawn());

        let mut sprite = Sprite::empty();
        sprite.set_image("circle");
        assert_eq!(sprite.image(), Some("circle"));
        assert!(sprite.is_drawn());
    }

    #[test]
    fn test_enable_and_disable_manage_subscription() {
        let mut ctx = Context::default();
        let id = ctx.spawn("sprite");
        ctx.add_component(id, Sprite::new("board").with_size(Size::square(3.0))).unwrap();
        assert_eq!(ctx.events.subscriber_count::<App, CameraRenderEvent>(), 1);

        ctx.despawn(id);
        assert_eq!(ctx.events.subscriber_count::<App, CameraRenderEvent>(), 0);
    }
}
