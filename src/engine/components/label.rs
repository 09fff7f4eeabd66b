//! Text drawing component

use macroquad::prelude::{draw_text_ex, Color, TextParams, WHITE};

use super::Camera;
use crate::app::App;
use crate::engine::component::Component;
use crate::engine::context::Context;
use crate::engine::event::{CameraRenderEvent, EventBus, Propagation, SubscriptionId};
use crate::engine::object::ObjectId;

/// A line of text drawn with its baseline at the owner's world position.
/// Uses the named font if loaded, the built-in font otherwise.
#[derive(Debug, Clone)]
pub struct Label {
    pub text: String,
    pub font: Option<String>,
    pub font_size: u16,
    pub color: Color,
    subscription: Option<SubscriptionId>,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: None,
            font_size: 32,
            color: WHITE,
            subscription: None,
        }
    }

    pub fn with_font(mut self, font: impl Into<String>, size: u16) -> Self {
        self.font = Some(font.into());
        self.font_size = size;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

fn draw_label(ctx: &Context, object: ObjectId, camera: ObjectId) {
    let Some(label) = ctx.scene.component::<Label>(object) else {
        return;
    };
    if label.text.is_empty() {
        return;
    }
    let (Some(camera), Some(world)) = (ctx.scene.component::<Camera>(camera), ctx.scene.world_position(object)) else {
        return;
    };

    let font = label
        .font
        .as_deref()
        .and_then(|name| ctx.resources.font(name))
        .map(|resource| &resource.font);
    let screen = camera.world_to_screen(world, ctx.pixel_per_unit);
    draw_text_ex(
        &label.text,
        screen.x,
        screen.y,
        TextParams {
            font,
            font_size: label.font_size,
            color: label.color,
            ..Default::default()
        },
    );
}

impl Component for Label {
    fn on_enable(&mut self, object: ObjectId, events: &mut EventBus) {
        self.subscription = Some(events.subscribe::<App, CameraRenderEvent, _>(move |ctx, args| {
            draw_label(ctx, object, args.event.camera);
            Propagation::Continue
        }));
    }

    fn on_disable(&mut self, _object: ObjectId, events: &mut EventBus) {
        if let Some(id) = self.subscription.take() {
            events.unsubscribe(id);
        }
    }
}
