//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//

//! Input snapshot and query API.

use crate::{rect, Recti, Vec2i};
use bitflags::bitflags;
use std::collections::HashMap;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// The three mouse buttons the core distinguishes.
    pub struct MouseButtons: u32 {
        /// No button.
        const NONE = 0;
        /// Left mouse button.
        const LEFT = 1;
        /// Right mouse button.
        const RIGHT = 2;
        /// Middle mouse button.
        const MIDDLE = 4;
    }
}

/// The ordered set of named keys the library interprets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Shift modifier.
    Shift,
    /// Control modifier.
    Ctrl,
    /// Delete key.
    Del,
    /// Enter/Return key.
    Enter,
    /// Tab key.
    Tab,
    /// Backspace key.
    Backspace,
    /// Clipboard copy shortcut.
    Copy,
    /// Clipboard cut shortcut.
    Cut,
    /// Clipboard paste shortcut.
    Paste,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Switch the active text editor into insert mode.
    TextInsertMode,
    /// Switch the active text editor into replace mode.
    TextReplaceMode,
    /// Reset the active text editor back to view mode.
    TextResetMode,
    /// Move to the start of the current line.
    TextLineStart,
    /// Move to the end of the current line.
    TextLineEnd,
    /// Move to the start of the buffer.
    TextStart,
    /// Move to the end of the buffer.
    TextEnd,
    /// Undo the last edit.
    TextUndo,
    /// Redo the last undone edit.
    TextRedo,
    /// Select the entire buffer.
    TextSelectAll,
    /// Move one word to the left.
    TextWordLeft,
    /// Move one word to the right.
    TextWordRight,
    /// Scroll to the start of the content.
    ScrollStart,
    /// Scroll to the end of the content.
    ScrollEnd,
    /// Scroll down by one page/step.
    ScrollDown,
    /// Scroll up by one page/step.
    ScrollUp,
}

/// `{down, clicked}` edge-detection pair for one mouse button or key.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct EdgeState {
    down: bool,
    /// Number of down/up transitions observed since the last `input_begin`;
    /// used by the `(down && clicked>=1) || (!down && clicked>=2)` press rule.
    clicked: u32,
}

/// Mutable input state, edited between `input_begin`/`input_end`. Produces an
/// immutable [`InputSnapshot`] for the frame body to query.
#[derive(Debug)]
pub struct Input {
    mouse_pos: Vec2i,
    prev_mouse_pos: Vec2i,
    mouse_delta: Vec2i,
    scroll_delta: Vec2i,
    mouse_buttons: HashMap<MouseButtonIdx, EdgeState>,
    clicked_at: HashMap<MouseButtonIdx, Vec2i>,
    keys: HashMap<Key, EdgeState>,
    text_input: String,
    max_input_bytes: usize,
    grab_requested: bool,
    ungrab_requested: bool,
    grabbed: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum MouseButtonIdx {
    Left,
    Right,
    Middle,
}

impl Input {
    /// Creates an input state with the given max text-input bytes per frame
    /// (`Config::max_input_bytes`, default 16).
    pub fn new(max_input_bytes: usize) -> Self {
        Self {
            mouse_pos: Vec2i::default(),
            prev_mouse_pos: Vec2i::default(),
            mouse_delta: Vec2i::default(),
            scroll_delta: Vec2i::default(),
            mouse_buttons: HashMap::new(),
            clicked_at: HashMap::new(),
            keys: HashMap::new(),
            text_input: String::new(),
            max_input_bytes,
            grab_requested: false,
            ungrab_requested: false,
            grabbed: false,
        }
    }

    /// Begins a mutation window: zeroes clicked-counts and scroll delta while
    /// preserving down-state, and latches the previous mouse position.
    pub fn input_begin(&mut self) {
        self.prev_mouse_pos = self.mouse_pos;
        self.mouse_delta = Vec2i::default();
        self.scroll_delta = Vec2i::default();
        for edge in self.mouse_buttons.values_mut() {
            edge.clicked = 0;
        }
        for edge in self.keys.values_mut() {
            edge.clicked = 0;
        }
        self.text_input.clear();
    }

    /// Ends the mutation window: advances the mouse-grab state machine.
    pub fn input_end(&mut self) {
        if self.grab_requested {
            self.grabbed = true;
        }
        if self.ungrab_requested {
            self.grabbed = false;
        }
        self.grab_requested = false;
        self.ungrab_requested = false;
    }

    /// Reports absolute mouse motion; delta is computed against the last
    /// `input_begin`'s latched position.
    pub fn mouse_motion(&mut self, pos: Vec2i) {
        self.mouse_delta = Vec2i { x: pos.x - self.mouse_pos.x, y: pos.y - self.mouse_pos.y };
        self.mouse_pos = pos;
    }

    fn button_idx(button: MouseButtons) -> Option<MouseButtonIdx> {
        if button.contains(MouseButtons::LEFT) {
            Some(MouseButtonIdx::Left)
        } else if button.contains(MouseButtons::RIGHT) {
            Some(MouseButtonIdx::Right)
        } else if button.contains(MouseButtons::MIDDLE) {
            Some(MouseButtonIdx::Middle)
        } else {
            None
        }
    }

    /// Reports a mouse button transitioning to down; the current mouse
    /// position becomes the button's clicked-at position.
    pub fn mouse_down(&mut self, button: MouseButtons) {
        if let Some(idx) = Self::button_idx(button) {
            let edge = self.mouse_buttons.entry(idx).or_default();
            edge.down = true;
            edge.clicked += 1;
            self.clicked_at.insert(idx, self.mouse_pos);
        }
    }

    /// Reports a mouse button transitioning to up.
    pub fn mouse_up(&mut self, button: MouseButtons) {
        if let Some(idx) = Self::button_idx(button) {
            let edge = self.mouse_buttons.entry(idx).or_default();
            edge.down = false;
            edge.clicked += 1;
        }
    }

    /// Accumulates scroll wheel movement.
    pub fn scroll(&mut self, delta: Vec2i) {
        self.scroll_delta.x += delta.x;
        self.scroll_delta.y += delta.y;
    }

    /// Reports a key transitioning to down.
    pub fn key_down(&mut self, key: Key) {
        let edge = self.keys.entry(key).or_default();
        edge.down = true;
        edge.clicked += 1;
    }

    /// Reports a key transitioning to up.
    pub fn key_up(&mut self, key: Key) {
        let edge = self.keys.entry(key).or_default();
        edge.down = false;
        edge.clicked += 1;
    }

    /// Appends UTF-8 text input, truncating at the configured byte cap.
    /// Malformed UTF-8 is the caller's responsibility to have already
    /// replaced with U+FFFD; this only enforces the byte budget at a
    /// codepoint boundary.
    pub fn text(&mut self, text: &str) {
        let remaining = self.max_input_bytes.saturating_sub(self.text_input.len());
        if remaining == 0 {
            return;
        }
        let mut end = text.len().min(remaining);
        while end > 0 && !text.is_char_boundary(end) {
            end -= 1;
        }
        self.text_input.push_str(&text[..end]);
    }

    /// Requests a mouse grab; takes effect at the next `input_end`.
    pub fn request_grab(&mut self) { self.grab_requested = true; }

    /// Requests releasing a mouse grab; takes effect at the next `input_end`.
    pub fn request_ungrab(&mut self) { self.ungrab_requested = true; }

    /// `true` if the mouse is currently soft-locked by a dragging widget.
    pub fn is_grabbed(&self) -> bool { self.grabbed }

    /// Produces an immutable snapshot for the frame body to query against.
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            mouse_pos: self.mouse_pos,
            prev_mouse_pos: self.prev_mouse_pos,
            mouse_delta: self.mouse_delta,
            scroll_delta: self.scroll_delta,
            mouse_buttons: self.mouse_buttons.clone(),
            clicked_at: self.clicked_at.clone(),
            keys: self.keys.clone(),
            text_input: self.text_input.clone(),
            grabbed: self.grabbed,
        }
    }
}

/// Immutable per-frame copy of [`Input`], queried by widgets during the
/// frame body. Built once per frame at `frame_begin` and never mutated
/// within it — changes made between widgets are not visible to earlier
/// widgets.
#[derive(Clone, Debug)]
pub struct InputSnapshot {
    mouse_pos: Vec2i,
    prev_mouse_pos: Vec2i,
    mouse_delta: Vec2i,
    scroll_delta: Vec2i,
    mouse_buttons: HashMap<MouseButtonIdx, EdgeState>,
    clicked_at: HashMap<MouseButtonIdx, Vec2i>,
    keys: HashMap<Key, EdgeState>,
    text_input: String,
    grabbed: bool,
}

impl InputSnapshot {
    /// Current mouse position.
    pub fn mouse_pos(&self) -> Vec2i { self.mouse_pos }

    /// Mouse position as of the previous frame.
    pub fn prev_mouse_pos(&self) -> Vec2i { self.prev_mouse_pos }

    /// Mouse motion delta since the previous frame.
    pub fn mouse_delta(&self) -> Vec2i { self.mouse_delta }

    /// Accumulated scroll delta this frame.
    pub fn scroll_delta(&self) -> Vec2i { self.scroll_delta }

    /// UTF-8 text entered this frame.
    pub fn text_input(&self) -> &str { &self.text_input }

    /// `true` iff the mouse is currently soft-locked by a dragging widget.
    pub fn is_grabbed(&self) -> bool { self.grabbed }

    fn button_edge(&self, button: MouseButtons) -> EdgeState {
        Input::button_idx(button).and_then(|idx| self.mouse_buttons.get(&idx).copied()).unwrap_or_default()
    }

    /// `true` iff the given button is currently held down.
    pub fn mouse_held(&self, button: MouseButtons) -> bool { self.button_edge(button).down }

    /// Edge-detected press: `(down && clicked>=1) || (!down && clicked>=2)`.
    /// This also catches a down+up within a single frame.
    pub fn mouse_pressed(&self, button: MouseButtons) -> bool {
        let e = self.button_edge(button);
        (e.down && e.clicked >= 1) || (!e.down && e.clicked >= 2)
    }

    /// Edge-detected release: the button is up and transitioned this frame.
    pub fn mouse_released(&self, button: MouseButtons) -> bool {
        let e = self.button_edge(button);
        !e.down && e.clicked >= 1
    }

    /// Position at which the given button was last pressed down.
    pub fn clicked_at(&self, button: MouseButtons) -> Option<Vec2i> {
        Input::button_idx(button).and_then(|idx| self.clicked_at.get(&idx).copied())
    }

    fn key_edge(&self, key: Key) -> EdgeState { self.keys.get(&key).copied().unwrap_or_default() }

    /// `true` iff the given key is currently held down.
    pub fn key_down(&self, key: Key) -> bool { self.key_edge(key).down }

    /// Edge-detected key press, same parity rule as `mouse_pressed`.
    pub fn key_pressed(&self, key: Key) -> bool {
        let e = self.key_edge(key);
        (e.down && e.clicked >= 1) || (!e.down && e.clicked >= 2)
    }

    /// Edge-detected key release.
    pub fn key_released(&self, key: Key) -> bool {
        let e = self.key_edge(key);
        !e.down && e.clicked >= 1
    }

    /// `true` iff `pos` falls within `r`, for hovering queries.
    pub fn point_in_rect(pos: Vec2i, r: Recti) -> bool {
        pos.x >= r.x && pos.x < r.x + r.width && pos.y >= r.y && pos.y < r.y + r.height
    }

    /// `true` iff the current mouse position hovers `r`.
    pub fn hovering(&self, r: Recti) -> bool { Self::point_in_rect(self.mouse_pos, r) }

    /// `true` iff the previous-frame mouse position hovered `r`.
    pub fn was_hovering(&self, r: Recti) -> bool { Self::point_in_rect(self.prev_mouse_pos, r) }

    /// Edge + containment test: the button was pressed this frame and the
    /// clicked-at position falls inside `r`.
    pub fn clicked_in_rect(&self, button: MouseButtons, r: Recti) -> bool {
        self.mouse_pressed(button) && self.clicked_at(button).map(|p| Self::point_in_rect(p, r)).unwrap_or(false)
    }

    /// Down-state + containment: the button is currently held and its
    /// clicked-at position falls inside `r`.
    pub fn has_click_down_in_rect(&self, button: MouseButtons, r: Recti) -> bool {
        self.mouse_held(button) && self.clicked_at(button).map(|p| Self::point_in_rect(p, r)).unwrap_or(false)
    }
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Input::new(16).snapshot()
    }
}

/// Convenience constructor matching the crate's `rect`/`vec2` free functions.
pub fn unbounded_rect() -> Recti { rect(0, 0, i32::MAX, i32::MAX) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_detected_on_down_and_up_in_same_frame() {
        let mut input = Input::new(16);
        input.input_begin();
        input.mouse_motion(Vec2i { x: 5, y: 5 });
        input.mouse_down(MouseButtons::LEFT);
        input.mouse_up(MouseButtons::LEFT);
        let snap = input.snapshot();
        assert!(snap.mouse_pressed(MouseButtons::LEFT));
        assert!(snap.mouse_released(MouseButtons::LEFT));
    }

    #[test]
    fn down_state_persists_across_input_begin() {
        let mut input = Input::new(16);
        input.input_begin();
        input.mouse_down(MouseButtons::LEFT);
        input.input_end();
        input.input_begin();
        let snap = input.snapshot();
        assert!(snap.mouse_held(MouseButtons::LEFT));
        assert!(!snap.mouse_pressed(MouseButtons::LEFT));
    }

    #[test]
    fn text_input_is_capped_at_char_boundary() {
        let mut input = Input::new(3);
        input.input_begin();
        input.text("héllo");
        let snap = input.snapshot();
        assert!(snap.text_input().len() <= 3);
        assert!("héllo".is_char_boundary(snap.text_input().len()));
    }
}
