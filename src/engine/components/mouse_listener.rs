//! Pointer hit-testing component
//!
//! Listens to the raw App mouse events and re-emits them as
//! `(MouseListener2D, …)` events with the owning object as sender, but only
//! when the pointer is over the owner's area:
//!
//! - `MouseEnterEvent` / `MouseLeaveEvent` when the pointer crosses the edge
//! - `MouseDownEvent` when a button is pressed inside
//! - `MouseUpEvent` when a button is released inside

use macroquad::prelude::MouseButton;

use crate::app::App;
use crate::engine::component::Component;
use crate::engine::context::Context;
use crate::engine::event::{
    EventBus, MouseButtonDownEvent, MouseButtonUpEvent, MouseDownEvent, MouseEnterEvent, MouseLeaveEvent,
    MouseMoveEvent, MouseUpEvent, Propagation, SubscriptionId,
};
use crate::engine::object::ObjectId;
use crate::engine::types::{Rect, Size, Vector};

#[derive(Debug, Clone, Default)]
pub struct MouseListener2D {
    /// Hit area in world units, anchored at the owner's world position
    pub area: Size,
    hovered: bool,
    pressed: bool,
    subscriptions: Vec<SubscriptionId>,
}

impl MouseListener2D {
    pub fn new(area: Size) -> Self {
        Self {
            area,
            ..Self::default()
        }
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// A button went down inside and has not been released yet
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

/// Whether the screen point lies over the listener on `object`.
/// None if the object or its listener is gone.
fn hit_test(ctx: &Context, object: ObjectId, x: f32, y: f32) -> Option<bool> {
    let listener = ctx.scene.component::<MouseListener2D>(object)?;
    let origin = ctx.scene.world_position(object)?;
    let world = ctx.screen_to_world(Vector::new(x, y));
    Some(Rect::from_parts(origin, listener.area).contains(world))
}

fn on_mouse_move(ctx: &mut Context, object: ObjectId, x: f32, y: f32) {
    let Some(inside) = hit_test(ctx, object, x, y) else {
        return;
    };
    let was_hovered = match ctx.scene.component_mut::<MouseListener2D>(object) {
        Some(listener) => std::mem::replace(&mut listener.hovered, inside),
        None => return,
    };

    match (was_hovered, inside) {
        (false, true) => {
            ctx.emit::<MouseListener2D, _>(Some(object), MouseEnterEvent { x, y });
        }
        (true, false) => {
            ctx.emit::<MouseListener2D, _>(Some(object), MouseLeaveEvent { x, y });
        }
        _ => {}
    }
}

fn on_button_down(ctx: &mut Context, object: ObjectId, button: MouseButton, x: f32, y: f32) {
    if hit_test(ctx, object, x, y) != Some(true) {
        return;
    }
    if let Some(listener) = ctx.scene.component_mut::<MouseListener2D>(object) {
        listener.pressed = true;
    }
    ctx.emit::<MouseListener2D, _>(Some(object), MouseDownEvent { button, x, y });
}

fn on_button_up(ctx: &mut Context, object: ObjectId, button: MouseButton, x: f32, y: f32) {
    let Some(inside) = hit_test(ctx, object, x, y) else {
        return;
    };
    if let Some(listener) = ctx.scene.component_mut::<MouseListener2D>(object) {
        listener.pressed = false;
    }
    if inside {
        ctx.emit::<MouseListener2D, _>(Some(object), MouseUpEvent { button, x, y });
    }
}

impl Component for MouseListener2D {
    fn on_enable(&mut self, object: ObjectId, events: &mut EventBus) {
        self.subscriptions = vec![
            events.subscribe::<App, MouseMoveEvent, _>(move |ctx, args| {
                on_mouse_move(ctx, object, args.event.x, args.event.y);
                Propagation::Continue
            }),
            events.subscribe::<App, MouseButtonDownEvent, _>(move |ctx, args| {
                let MouseButtonDownEvent { button, x, y } = args.event;
                on_button_down(ctx, object, button, x, y);
                Propagation::Continue
            }),
            events.subscribe::<App, MouseButtonUpEvent, _>(move |ctx, args| {
                let MouseButtonUpEvent { button, x, y } = args.event;
                on_button_up(ctx, object, button, x, y);
                Propagation::Continue
            }),
        ];
    }

    fn on_disable(&mut self, _object: ObjectId, events: &mut EventBus) {
        for id in self.subscriptions.drain(..) {
            events.unsubscribe(id);
        }
    }
}
