//! Native input translation
//!
//! macroquad buffers raw window input between frames. `InputQueue` drains
//! that buffer once per frame into engine-level [`InputEvent`]s, which the
//! app then hands out one at a time.

use std::collections::VecDeque;

use macroquad::input::utils::{register_input_subscriber, repeat_all_miniquad_input};
use macroquad::miniquad::{EventHandler, KeyMods, TouchPhase};
use macroquad::prelude::{KeyCode, MouseButton};

/// One input occurrence, already stripped of the window system's types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The window asked to close
    Quit,
    KeyDown(KeyCode),
    /// Pointer position in screen pixels
    MouseMove { x: f32, y: f32 },
    MouseButtonDown { button: MouseButton, x: f32, y: f32 },
    MouseButtonUp { button: MouseButton, x: f32, y: f32 },
    /// Anything else the window reported, by kind
    Unrecognized(&'static str),
}

/// FIFO of pending input events.
#[derive(Debug, Default)]
pub struct InputQueue {
    /// Subscriber slot, registered on first `collect`
    subscriber: Option<usize>,
    pending: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pull everything the window reported since the last call.
    /// Needs a live window.
    pub fn collect(&mut self) {
        let subscriber = *self.subscriber.get_or_insert_with(register_input_subscriber);
        let mut collector = Collector(&mut self.pending);
        repeat_all_miniquad_input(&mut collector, subscriber);
    }

    pub fn push(&mut self, event: InputEvent) {
        self.pending.push_back(event);
    }

    /// Next pending event, oldest first.
    pub fn poll(&mut self) -> Option<InputEvent> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Receives replayed window input and queues it.
struct Collector<'a>(&'a mut VecDeque<InputEvent>);

impl EventHandler for Collector<'_> {
    fn update(&mut self) {}

    fn draw(&mut self) {}

    fn mouse_motion_event(&mut self, x: f32, y: f32) {
        self.0.push_back(InputEvent::MouseMove { x, y });
    }

    fn mouse_wheel_event(&mut self, _x: f32, _y: f32) {
        self.0.push_back(InputEvent::Unrecognized("mouse wheel"));
    }

    fn mouse_button_down_event(&mut self, button: MouseButton, x: f32, y: f32) {
        self.0.push_back(InputEvent::MouseButtonDown { button, x, y });
    }

    fn mouse_button_up_event(&mut self, button: MouseButton, x: f32, y: f32) {
        self.0.push_back(InputEvent::MouseButtonUp { button, x, y });
    }

    fn char_event(&mut self, _character: char, _keymods: KeyMods, _repeat: bool) {
        self.0.push_back(InputEvent::Unrecognized("text input"));
    }

    fn key_down_event(&mut self, keycode: KeyCode, _keymods: KeyMods, repeat: bool) {
        // Held keys only count once
        if !repeat {
            self.0.push_back(InputEvent::KeyDown(keycode));
        }
    }

    fn key_up_event(&mut self, _keycode: KeyCode, _keymods: KeyMods) {
        self.0.push_back(InputEvent::Unrecognized("key up"));
    }

    fn touch_event(&mut self, _phase: TouchPhase, _id: u64, _x: f32, _y: f32) {
        self.0.push_back(InputEvent::Unrecognized("touch"));
    }

    fn window_minimized_event(&mut self) {
        self.0.push_back(InputEvent::Unrecognized("window minimized"));
    }

    fn window_restored_event(&mut self) {
        self.0.push_back(InputEvent::Unrecognized("window restored"));
    }
}
