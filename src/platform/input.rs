//! Input collection
//!
//! DOM events land here as they arrive; the game loop takes one
//! [`InputSnapshot`] per tick.

use std::collections::{HashSet, VecDeque};

use crate::sim::tick::{InputSnapshot, TextEvent};

const LEFT_KEYS: [&str; 3] = ["ArrowLeft", "a", "A"];
const RIGHT_KEYS: [&str; 3] = ["ArrowRight", "d", "D"];

/// Accumulates raw key, button and pointer events
#[derive(Debug, Default)]
pub struct InputCollector {
    keys_down: HashSet<String>,
    left_button: bool,
    right_button: bool,
    /// Press point and current point of an active drag
    drag: Option<(f32, f32)>,
    text_queue: VecDeque<TextEvent>,
}

impl InputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key pressed. While name entry is shown keys become text events and are
    /// not held. Returns true if the key was consumed (caller should prevent
    /// the browser default).
    pub fn key_down(&mut self, key: &str, name_entry: bool) -> bool {
        if name_entry {
            let event = match key {
                "Enter" => Some(TextEvent::Confirm),
                "Backspace" => Some(TextEvent::Backspace),
                _ => {
                    let mut chars = key.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Some(TextEvent::Char(c)),
                        _ => None,
                    }
                }
            };
            if let Some(event) = event {
                self.text_queue.push_back(event);
                return true;
            }
            return false;
        }

        self.keys_down.insert(key.to_string());
        // Space would scroll the page
        key == " " || key == "Spacebar"
    }

    pub fn key_up(&mut self, key: &str) {
        self.keys_down.remove(key);
    }

    /// On-screen left button held
    pub fn set_left_button(&mut self, pressed: bool) {
        self.left_button = pressed;
    }

    pub fn set_right_button(&mut self, pressed: bool) {
        self.right_button = pressed;
    }

    /// Pointer or touch press at canvas `x`. Ignored unless a run is active.
    pub fn pointer_down(&mut self, x: f32, run_active: bool) {
        if run_active {
            self.drag = Some((x, x));
        }
    }

    pub fn pointer_move(&mut self, x: f32) {
        if let Some((_, current)) = self.drag.as_mut() {
            *current = x;
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Current intent plus at most one queued text event
    pub fn snapshot(&mut self) -> InputSnapshot {
        let held = |keys: &[&str]| keys.iter().any(|k| self.keys_down.contains(*k));
        let left = held(&LEFT_KEYS) || self.left_button;
        let right = held(&RIGHT_KEYS) || self.right_button;

        InputSnapshot {
            left,
            right,
            drag_delta_x: self.drag.map(|(start, current)| current - start),
            text_event: self.text_queue.pop_front(),
        }
    }

    /// Drop everything (new run, lost focus)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
