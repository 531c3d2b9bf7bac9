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

//! A codepoint-indexed text editing core, shared as a singleton.
//! Unlike [`crate::widgets::textbox`]/[`crate::widgets::text_area`]'s
//! byte-cursor helpers — which this module's arithmetic is grounded on — every
//! index here is a codepoint index, translated to a byte offset by scanning
//! only at the point of mutation.
//!
//! One [`TextEditState`] is meant to be owned by [`crate::Context`] as a
//! singleton and re-targeted at whichever buffer currently has focus: the
//! heavy undo/redo ring is paid for once, not once per widget.

use std::fmt;

use crate::input::{InputSnapshot, Key};

/// Editor mode. VIEW never mutates the buffer; INSERT and REPLACE are the two
/// mutating modes distinguished by what raw text input does at the cursor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Read/navigate only; no mutation accepted.
    View,
    /// Typed codepoints are inserted at the cursor.
    Insert,
    /// Typed codepoints overwrite the codepoint at the cursor.
    Replace,
}

/// Codepoint-acceptance predicate applied to raw text input and paste.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    /// Accepts every codepoint.
    Default,
    /// Accepts only ASCII codepoints.
    Ascii,
    /// Accepts ASCII digits.
    Decimal,
    /// Accepts ASCII digits, `.`, `+`, `-` (and `e`/`E` for exponents).
    Float,
    /// Accepts ASCII hex digits.
    Hex,
    /// Accepts ASCII octal digits.
    Oct,
    /// Accepts `0` or `1`.
    Binary,
}

impl Filter {
    /// `true` iff `ch` is accepted by this filter.
    pub fn accepts(self, ch: char) -> bool {
        match self {
            Filter::Default => true,
            Filter::Ascii => ch.is_ascii(),
            Filter::Decimal => ch.is_ascii_digit(),
            Filter::Float => ch.is_ascii_digit() || matches!(ch, '.' | '+' | '-' | 'e' | 'E'),
            Filter::Hex => ch.is_ascii_hexdigit(),
            Filter::Oct => matches!(ch, '0'..='7'),
            Filter::Binary => matches!(ch, '0' | '1'),
        }
    }
}

/// Host clipboard hooks, boxed so `TextEditState` doesn't need to be generic
/// over a host type.
pub trait ClipboardHost {
    /// Copies `text` to the system clipboard.
    fn copy(&mut self, text: &str);
    /// Returns the system clipboard's contents, if any.
    fn paste(&mut self) -> Option<String>;
}

/// Word-boundary characters used by the word-left/word-right motions: index
/// 0, whitespace, or one of `, ; ( ) { } [ ] |`.
fn is_boundary(ch: char) -> bool { ch.is_whitespace() || ",;(){}[]|".contains(ch) }

/// One atomic, invertible mutation. `Insert` records that `length` codepoints
/// were inserted at `where_` (undo deletes them); `Delete` records the
/// codepoints removed at `where_` so undo can reinsert them. This is the
/// record owns its deleted codepoints directly rather than addressing them
/// through a separately-indexed storage ring — see `DESIGN.md` for why that
/// simplification doesn't change observable behaviour.
#[derive(Clone, Debug)]
enum Payload {
    Insert(usize),
    Delete(Vec<char>),
}

impl Payload {
    fn char_count(&self) -> usize {
        match self {
            Payload::Insert(n) => *n,
            Payload::Delete(chars) => chars.len(),
        }
    }
}

#[derive(Clone, Debug)]
struct Record {
    where_: usize,
    payload: Payload,
}

/// Bounded undo/redo history: a record stack (≤ `max_records`, default 99)
/// and a total-codepoints budget across every record's stored text (≤
/// `max_chars`, default 999). New edits clear the redo stack; filling
/// either bound evicts the oldest undo record first.
#[derive(Clone, Debug)]
struct History {
    undo: Vec<Record>,
    redo: Vec<Record>,
    max_records: usize,
    max_chars: usize,
    char_total: usize,
}

impl History {
    fn new(max_records: usize, max_chars: usize) -> Self {
        Self { undo: Vec::new(), redo: Vec::new(), max_records, max_chars, char_total: 0 }
    }

    fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.char_total = 0;
    }

    fn evict_for(&mut self, incoming_chars: usize) {
        while (self.undo.len() + self.redo.len() >= self.max_records || self.char_total + incoming_chars > self.max_chars)
            && !self.undo.is_empty()
        {
            let oldest = self.undo.remove(0);
            self.char_total -= oldest.payload.char_count();
        }
    }

    fn push_edit(&mut self, rec: Record) {
        // A fresh user edit invalidates the redo history.
        for old in self.redo.drain(..) {
            self.char_total -= old.payload.char_count();
        }
        self.evict_for(rec.payload.char_count());
        self.char_total += rec.payload.char_count();
        self.undo.push(rec);
    }

    fn can_undo(&self) -> bool { !self.undo.is_empty() }
    fn can_redo(&self) -> bool { !self.redo.is_empty() }
}

/// Full editor state: codepoint-indexed UTF-8 buffer, anchored selection,
/// word motion, bounded undo/redo, clipboard hooks, per-codepoint filters,
/// and VIEW/INSERT/REPLACE modes.
pub struct TextEditState {
    buffer: String,
    codepoint_len: usize,
    cursor: usize,
    select_start: usize,
    select_end: usize,
    mode: Mode,
    single_line: bool,
    always_insert_mode: bool,
    read_only: bool,
    active: bool,
    preferred_x: Option<i32>,
    scroll: crate::Vec2i,
    filter: Filter,
    history: History,
    clipboard: Option<Box<dyn ClipboardHost>>,
}

impl fmt::Debug for TextEditState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextEditState")
            .field("buffer", &self.buffer)
            .field("cursor", &self.cursor)
            .field("select_start", &self.select_start)
            .field("select_end", &self.select_end)
            .field("mode", &self.mode)
            .field("active", &self.active)
            .finish()
    }
}

/// Outcome of driving the editor for one frame via [`TextEditState::handle_input`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepResult {
    /// `true` iff the buffer contents changed this frame.
    pub modified: bool,
    /// `true` iff cursor/selection moved without changing the buffer.
    pub moved: bool,
    /// `true` iff a `SIG_ENTER`-style commit was requested (Enter pressed
    /// with submit-on-enter behaviour rather than inserting a newline).
    pub committed: bool,
}

impl TextEditState {
    /// Creates an inactive editor with the given undo bounds
    /// (`Config::undo_state_count` / `Config::undo_char_count`).
    pub fn new(undo_state_count: usize, undo_char_count: usize) -> Self {
        Self {
            buffer: String::new(),
            codepoint_len: 0,
            cursor: 0,
            select_start: 0,
            select_end: 0,
            mode: Mode::View,
            single_line: true,
            always_insert_mode: false,
            read_only: false,
            active: false,
            preferred_x: None,
            scroll: crate::Vec2i { x: 0, y: 0 },
            filter: Filter::Default,
            history: History::new(undo_state_count, undo_char_count),
            clipboard: None,
        }
    }

    /// Installs a host clipboard implementation.
    pub fn set_clipboard_host(&mut self, host: Box<dyn ClipboardHost>) { self.clipboard = Some(host); }

    /// Sets the codepoint filter applied to raw text input and paste.
    pub fn set_filter(&mut self, filter: Filter) { self.filter = filter; }

    /// Re-targets the editor at `content`, clearing selection, mode, and
    /// undo history — the "re-initialised against the hosting buffer" step
    /// from the design notes' single-shared-instance strategy.
    pub fn activate(&mut self, content: &str, single_line: bool, always_insert_mode: bool, read_only: bool) {
        self.buffer.clear();
        self.buffer.push_str(content);
        self.codepoint_len = content.chars().count();
        self.cursor = self.codepoint_len;
        self.select_start = self.cursor;
        self.select_end = self.cursor;
        self.single_line = single_line;
        self.always_insert_mode = always_insert_mode;
        self.read_only = read_only;
        self.mode = if always_insert_mode && !read_only { Mode::Insert } else { Mode::View };
        self.preferred_x = None;
        self.scroll = crate::Vec2i { x: 0, y: 0 };
        self.history.clear();
        self.active = true;
    }

    /// Clears the editor back to the unfocused state (on focus loss/commit).
    pub fn deactivate(&mut self) {
        self.active = false;
        self.mode = Mode::View;
    }

    /// `true` iff an editor is currently targeting a buffer.
    pub fn is_active(&self) -> bool { self.active }

    /// Current buffer contents.
    pub fn text(&self) -> &str { &self.buffer }

    /// Codepoint length of the buffer.
    pub fn len(&self) -> usize { self.codepoint_len }

    /// `true` iff the buffer is empty.
    pub fn is_empty(&self) -> bool { self.codepoint_len == 0 }

    /// Cursor position (codepoint index).
    pub fn cursor(&self) -> usize { self.cursor }

    /// `(start, end)` selection, `start <= end`, both codepoint indices.
    pub fn selection(&self) -> (usize, usize) { (self.select_start.min(self.select_end), self.select_start.max(self.select_end)) }

    /// `true` iff a non-empty selection exists.
    pub fn has_selection(&self) -> bool { self.select_start != self.select_end }

    /// Current editor mode.
    pub fn mode(&self) -> Mode { self.mode }

    /// Current scroll offset.
    pub fn scroll(&self) -> crate::Vec2i { self.scroll }

    // -- codepoint/byte conversion -----------------------------------------

    fn byte_offset(&self, cp: usize) -> usize {
        if cp >= self.codepoint_len {
            return self.buffer.len();
        }
        self.buffer.char_indices().nth(cp).map(|(i, _)| i).unwrap_or(self.buffer.len())
    }

    fn chars(&self) -> Vec<char> { self.buffer.chars().collect() }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.codepoint_len);
        self.select_start = self.select_start.min(self.codepoint_len);
        self.select_end = self.select_end.min(self.codepoint_len);
    }

    // -- mutation primitives (update buffer + codepoint_len + history) ------

    fn raw_insert(&mut self, cp: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let byte = self.byte_offset(cp);
        self.buffer.insert_str(byte, text);
        self.codepoint_len += text.chars().count();
    }

    fn raw_delete(&mut self, start: usize, end: usize) -> Vec<char> {
        if start >= end {
            return Vec::new();
        }
        let bs = self.byte_offset(start);
        let be = self.byte_offset(end);
        let removed: Vec<char> = self.buffer[bs..be].chars().collect();
        self.buffer.replace_range(bs..be, "");
        self.codepoint_len -= removed.len();
        removed
    }

    fn do_insert(&mut self, cp: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let n = text.chars().count();
        self.raw_insert(cp, text);
        self.history.push_edit(Record { where_: cp, payload: Payload::Insert(n) });
    }

    fn do_delete(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let removed = self.raw_delete(start, end);
        self.history.push_edit(Record { where_: start, payload: Payload::Delete(removed) });
    }

    fn delete_selection_if_any(&mut self) -> bool {
        if !self.has_selection() {
            return false;
        }
        let (s, e) = self.selection();
        self.do_delete(s, e);
        self.cursor = s;
        self.select_start = s;
        self.select_end = s;
        true
    }

    // -- mouse ---------------------------------------------------------------

    /// Mouse down inside the widget: places cursor and collapses selection.
    pub fn click(&mut self, cp: usize) {
        let cp = cp.min(self.codepoint_len);
        self.cursor = cp;
        self.select_start = cp;
        self.select_end = cp;
        self.preferred_x = None;
        if self.mode == Mode::View && !self.read_only {
            self.mode = Mode::Insert;
        }
    }

    /// Mouse drag: extends the selection end to `cp`, cursor follows.
    pub fn drag_to(&mut self, cp: usize) {
        let cp = cp.min(self.codepoint_len);
        self.select_end = cp;
        self.cursor = cp;
        self.preferred_x = None;
    }

    /// Right mouse down: selects the word under `cp` (word-left then word-right).
    pub fn select_word_at(&mut self, cp: usize) {
        let chars = self.chars();
        let cp = cp.min(self.codepoint_len);
        let start = Self::word_left_from(&chars, cp);
        let end = Self::word_right_from(&chars, cp);
        self.select_start = start;
        self.select_end = end;
        self.cursor = end;
    }

    // -- word motion -----------------------------------------------------------

    fn word_left_from(chars: &[char], pos: usize) -> usize {
        let mut p = pos;
        while p > 0 && is_boundary(chars[p - 1]) {
            p -= 1;
        }
        while p > 0 && !is_boundary(chars[p - 1]) {
            p -= 1;
        }
        p
    }

    fn word_right_from(chars: &[char], pos: usize) -> usize {
        let len = chars.len();
        let mut p = pos;
        while p < len && is_boundary(chars[p]) {
            p += 1;
        }
        while p < len && !is_boundary(chars[p]) {
            p += 1;
        }
        p
    }

    /// Moves the cursor one word to the left; extends selection if `shift`.
    pub fn move_word_left(&mut self, shift: bool) {
        let chars = self.chars();
        let new_pos = Self::word_left_from(&chars, self.cursor);
        self.apply_horizontal_move(new_pos, shift);
    }

    /// Moves the cursor one word to the right; extends selection if `shift`.
    pub fn move_word_right(&mut self, shift: bool) {
        let chars = self.chars();
        let new_pos = Self::word_right_from(&chars, self.cursor);
        self.apply_horizontal_move(new_pos, shift);
    }

    // -- single-codepoint / line / document motion --------------------------

    fn apply_horizontal_move(&mut self, new_pos: usize, shift: bool) {
        self.preferred_x = None;
        if shift {
            self.select_end = new_pos;
            self.cursor = new_pos;
        } else if self.has_selection() {
            // Collapse to the nearer end of the existing selection.
            let (s, e) = self.selection();
            let collapse_to = if new_pos <= self.cursor { s } else { e };
            self.cursor = collapse_to;
            self.select_start = collapse_to;
            self.select_end = collapse_to;
        } else {
            self.cursor = new_pos;
            self.select_start = new_pos;
            self.select_end = new_pos;
        }
    }

    /// Key LEFT: move/extend one codepoint left.
    pub fn move_left(&mut self, shift: bool) {
        if !shift && self.has_selection() {
            let (s, _) = self.selection();
            self.cursor = s;
            self.select_start = s;
            self.select_end = s;
            self.preferred_x = None;
            return;
        }
        let new_pos = self.cursor.saturating_sub(1);
        self.apply_horizontal_move(new_pos, shift);
    }

    /// Key RIGHT: move/extend one codepoint right.
    pub fn move_right(&mut self, shift: bool) {
        if !shift && self.has_selection() {
            let (_, e) = self.selection();
            self.cursor = e;
            self.select_start = e;
            self.select_end = e;
            self.preferred_x = None;
            return;
        }
        let new_pos = (self.cursor + 1).min(self.codepoint_len);
        self.apply_horizontal_move(new_pos, shift);
    }

    fn line_bounds(&self, cp: usize) -> (usize, usize) {
        let chars = self.chars();
        let mut start = cp.min(chars.len());
        while start > 0 && chars[start - 1] != '\n' {
            start -= 1;
        }
        let mut end = cp.min(chars.len());
        while end < chars.len() && chars[end] != '\n' {
            end += 1;
        }
        (start, end)
    }

    /// Key HOME / `TEXT_LINE_START`.
    pub fn move_line_start(&mut self, shift: bool) {
        let (start, _) = self.line_bounds(self.cursor);
        self.apply_horizontal_move(start, shift);
    }

    /// Key END / `TEXT_LINE_END`.
    pub fn move_line_end(&mut self, shift: bool) {
        let (_, end) = self.line_bounds(self.cursor);
        self.apply_horizontal_move(end, shift);
    }

    /// `TEXT_START`: move to the beginning of the buffer.
    pub fn move_text_start(&mut self, shift: bool) { self.apply_horizontal_move(0, shift); }

    /// `TEXT_END`: move to the end of the buffer.
    pub fn move_text_end(&mut self, shift: bool) { self.apply_horizontal_move(self.codepoint_len, shift); }

    /// Key UP/DOWN (multi-line only; single-line editors remap these to
    /// LEFT/RIGHT). `measure` reports the pixel width of a `&str`
    /// slice of one row, matching the font width callback's contract.
    pub fn move_vertical(&mut self, shift: bool, down: bool, measure: &dyn Fn(&str) -> i32) {
        if self.single_line {
            if down {
                self.move_right(shift);
            } else {
                self.move_left(shift);
            }
            return;
        }
        let chars = self.chars();
        let (line_start, line_end) = self.line_bounds(self.cursor);
        let target_x = match self.preferred_x {
            Some(x) => x,
            None => {
                let prefix: String = chars[line_start..self.cursor].iter().collect();
                let x = measure(&prefix);
                self.preferred_x = Some(x);
                x
            }
        };

        let (target_start, target_end) = if down {
            if line_end >= chars.len() {
                self.preferred_x = None;
                return;
            }
            let next_start = line_end + 1;
            let mut next_end = next_start;
            while next_end < chars.len() && chars[next_end] != '\n' {
                next_end += 1;
            }
            (next_start, next_end)
        } else {
            if line_start == 0 {
                self.preferred_x = None;
                return;
            }
            let prev_end = line_start - 1;
            let mut prev_start = prev_end;
            while prev_start > 0 && chars[prev_start - 1] != '\n' {
                prev_start -= 1;
            }
            (prev_start, prev_end)
        };

        // Find the codepoint in the target row whose x is closest to target_x.
        let mut best = target_start;
        let mut best_dist = i32::MAX;
        for i in target_start..=target_end {
            let slice: String = chars[target_start..i].iter().collect();
            let x = measure(&slice);
            let dist = (x - target_x).abs();
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }
        let saved_x = self.preferred_x;
        self.apply_horizontal_move(best, shift);
        self.preferred_x = saved_x;
    }

    // -- deletion --------------------------------------------------------------

    /// Key BACKSPACE: delete selection if any, else the codepoint before the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.read_only {
            return false;
        }
        if self.delete_selection_if_any() {
            return true;
        }
        if self.cursor == 0 {
            return false;
        }
        let start = self.cursor - 1;
        self.do_delete(start, self.cursor);
        self.cursor = start;
        self.select_start = start;
        self.select_end = start;
        true
    }

    /// Key DEL: delete selection if any, else the codepoint at the cursor.
    pub fn delete(&mut self) -> bool {
        if self.read_only {
            return false;
        }
        if self.delete_selection_if_any() {
            return true;
        }
        if self.cursor >= self.codepoint_len {
            return false;
        }
        self.do_delete(self.cursor, self.cursor + 1);
        true
    }

    // -- selection / mode --------------------------------------------------

    /// `TEXT_SELECT_ALL`.
    pub fn select_all(&mut self) {
        self.select_start = 0;
        self.select_end = self.codepoint_len;
        self.cursor = self.codepoint_len;
    }

    /// `TEXT_INSERT_MODE` / `TEXT_REPLACE_MODE` / `TEXT_RESET_MODE`. READ_ONLY
    /// is authoritative over `always_insert_mode` (open question #3).
    pub fn set_mode(&mut self, mode: Mode) {
        if self.read_only {
            self.mode = Mode::View;
            return;
        }
        self.mode = mode;
    }

    // -- clipboard -----------------------------------------------------------

    /// `COPY`: sends the selection (or nothing, if empty) to the clipboard host.
    pub fn copy(&mut self) {
        let (s, e) = self.selection();
        if s == e {
            return;
        }
        let bs = self.byte_offset(s);
        let be = self.byte_offset(e);
        let text = self.buffer[bs..be].to_string();
        if let Some(host) = self.clipboard.as_mut() {
            host.copy(&text);
        }
    }

    /// `CUT`: copies then deletes the selection. No-op if read-only or no selection.
    pub fn cut(&mut self) -> bool {
        if self.read_only || !self.has_selection() {
            return false;
        }
        self.copy();
        self.delete_selection_if_any()
    }

    /// `PASTE`: inserts clipboard contents (filtered codepoint-by-codepoint),
    /// replacing any current selection first.
    pub fn paste(&mut self) -> bool {
        if self.read_only {
            return false;
        }
        let pasted = match self.clipboard.as_mut().and_then(|h| h.paste()) {
            Some(text) => text,
            None => return false,
        };
        let filtered: String = pasted.chars().filter(|c| self.filter.accepts(*c)).collect();
        if filtered.is_empty() {
            return false;
        }
        self.delete_selection_if_any();
        let at = self.cursor;
        self.do_insert(at, &filtered);
        self.cursor = at + filtered.chars().count();
        self.select_start = self.cursor;
        self.select_end = self.cursor;
        true
    }

    // -- undo/redo -----------------------------------------------------------

    /// `true` iff there is an undo record to apply.
    pub fn can_undo(&self) -> bool { self.history.can_undo() }

    /// `true` iff there is a redo record to apply.
    pub fn can_redo(&self) -> bool { self.history.can_redo() }

    /// `TEXT_UNDO`: inverts the most recent undo record.
    pub fn undo(&mut self) -> bool {
        let Some(rec) = self.history.undo.pop() else { return false };
        self.history.char_total -= rec.payload.char_count();
        let inverse = match &rec.payload {
            Payload::Insert(n) => {
                // This edit inserted `n` codepoints at `where_`; undo deletes them,
                // capturing the text so redo can reinsert it.
                let removed = self.raw_delete(rec.where_, rec.where_ + n);
                self.cursor = rec.where_;
                Record { where_: rec.where_, payload: Payload::Delete(removed) }
            }
            Payload::Delete(chars) => {
                // This edit deleted codepoints at `where_`; undo reinserts them.
                let text: String = chars.iter().collect();
                self.raw_insert(rec.where_, &text);
                self.cursor = rec.where_ + chars.len();
                Record { where_: rec.where_, payload: Payload::Insert(chars.len()) }
            }
        };
        self.history.char_total += inverse.payload.char_count();
        self.history.redo.push(inverse);
        self.select_start = self.cursor;
        self.select_end = self.cursor;
        self.clamp_cursor();
        true
    }

    /// `TEXT_REDO`: re-applies the most recently undone record.
    pub fn redo(&mut self) -> bool {
        let Some(rec) = self.history.redo.pop() else { return false };
        self.history.char_total -= rec.payload.char_count();
        let inverse = match &rec.payload {
            Payload::Insert(n) => {
                let removed = self.raw_delete(rec.where_, rec.where_ + n);
                self.cursor = rec.where_;
                Record { where_: rec.where_, payload: Payload::Delete(removed) }
            }
            Payload::Delete(chars) => {
                let text: String = chars.iter().collect();
                self.raw_insert(rec.where_, &text);
                self.cursor = rec.where_ + chars.len();
                Record { where_: rec.where_, payload: Payload::Insert(chars.len()) }
            }
        };
        self.history.char_total += inverse.payload.char_count();
        self.history.undo.push(inverse);
        self.select_start = self.cursor;
        self.select_end = self.cursor;
        self.clamp_cursor();
        true
    }

    // -- raw text input ---------------------------------------------------

    /// Inserts (INSERT mode) or overwrites (REPLACE mode) one codepoint at
    /// the cursor, if accepted by the active filter. READ_ONLY rejects all
    /// input regardless of mode (open question #3).
    pub fn input_char(&mut self, ch: char) -> bool {
        if self.read_only || self.mode == Mode::View {
            return false;
        }
        if !self.filter.accepts(ch) {
            return false;
        }
        if ch == '\n' && self.single_line {
            return false;
        }
        self.delete_selection_if_any();
        if self.mode == Mode::Replace && self.cursor < self.codepoint_len {
            self.do_delete(self.cursor, self.cursor + 1);
        }
        let at = self.cursor;
        let mut tmp = [0u8; 4];
        self.do_insert(at, ch.encode_utf8(&mut tmp));
        self.cursor = at + 1;
        self.select_start = self.cursor;
        self.select_end = self.cursor;
        true
    }

    /// Inserts a run of text, codepoint by codepoint (so each goes through
    /// the filter and REPLACE-mode overwrite individually).
    pub fn input_text(&mut self, text: &str) -> bool {
        let mut any = false;
        for ch in text.chars() {
            any |= self.input_char(ch);
        }
        any
    }

    /// Key ENTER. In multi-line mode inserts `\n` unless `sig_enter` is set,
    /// in which case no newline is inserted and `committed` is reported.
    pub fn enter(&mut self, sig_enter: bool) -> bool {
        if sig_enter {
            return true;
        }
        if self.single_line {
            return false;
        }
        self.input_char('\n')
    }

    // -- frame driver --------------------------------------------------------

    /// Drives the editor from one frame's input snapshot, dispatching the
    /// full key table. `measure` is the font width callback used for
    /// vertical motion's "closest x" search; `sig_enter` mirrors the
    /// `SIG_ENTER` flag. The caller is responsible for not invoking this at
    /// all when the widget is read-only or clipped out — input is a no-op
    /// in that case.
    pub fn handle_input(&mut self, input: &InputSnapshot, sig_enter: bool, measure: &dyn Fn(&str) -> i32) -> StepResult {
        let mut result = StepResult::default();
        let shift = input.key_down(Key::Shift);

        if input.key_pressed(Key::TextInsertMode) {
            self.set_mode(Mode::Insert);
        }
        if input.key_pressed(Key::TextReplaceMode) {
            self.set_mode(Mode::Replace);
        }
        if input.key_pressed(Key::TextResetMode) {
            self.set_mode(Mode::View);
        }

        if input.key_pressed(Key::TextWordLeft) {
            self.move_word_left(shift);
            result.moved = true;
        }
        if input.key_pressed(Key::TextWordRight) {
            self.move_word_right(shift);
            result.moved = true;
        }
        if input.key_pressed(Key::Left) {
            self.move_left(shift);
            result.moved = true;
        }
        if input.key_pressed(Key::Right) {
            self.move_right(shift);
            result.moved = true;
        }
        if input.key_pressed(Key::Up) {
            self.move_vertical(shift, false, measure);
            result.moved = true;
        }
        if input.key_pressed(Key::Down) {
            self.move_vertical(shift, true, measure);
            result.moved = true;
        }
        if input.key_pressed(Key::TextLineStart) {
            self.move_line_start(shift);
            result.moved = true;
        }
        if input.key_pressed(Key::TextLineEnd) {
            self.move_line_end(shift);
            result.moved = true;
        }
        if input.key_pressed(Key::TextStart) {
            self.move_text_start(shift);
            result.moved = true;
        }
        if input.key_pressed(Key::TextEnd) {
            self.move_text_end(shift);
            result.moved = true;
        }
        if input.key_pressed(Key::TextSelectAll) {
            self.select_all();
            result.moved = true;
        }

        if input.key_pressed(Key::Backspace) {
            result.modified |= self.backspace();
        }
        if input.key_pressed(Key::Del) {
            result.modified |= self.delete();
        }

        if input.key_pressed(Key::Copy) {
            self.copy();
        }
        if input.key_pressed(Key::Cut) {
            result.modified |= self.cut();
        }
        if input.key_pressed(Key::Paste) {
            result.modified |= self.paste();
        }

        if input.key_pressed(Key::TextUndo) {
            result.modified |= self.undo();
        }
        if input.key_pressed(Key::TextRedo) {
            result.modified |= self.redo();
        }

        if !input.text_input().is_empty() {
            result.modified |= self.input_text(input.text_input());
        }

        if input.key_pressed(Key::Enter) {
            if self.enter(sig_enter) {
                result.committed = true;
            } else {
                result.modified = true;
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> TextEditState {
        let mut e = TextEditState::new(99, 999);
        e.activate("", false, false, false);
        e
    }

    #[test]
    fn insertion_tracks_cursor_and_codepoint_length() {
        let mut e = editor();
        e.input_text("abc");
        assert_eq!(e.text(), "abc");
        assert_eq!(e.cursor(), 3);
        assert_eq!(e.len(), 3);
    }

    #[test]
    fn utf8_multibyte_round_trip() {
        let mut e = editor();
        e.input_text("héllo");
        assert_eq!(e.len(), 5);
        assert_eq!(e.cursor(), 5);
        e.backspace();
        assert_eq!(e.text(), "héll");
        assert_eq!(e.cursor(), 4);
    }

    #[test]
    fn backspace_then_undo_restores_buffer_and_cursor() {
        let mut e = editor();
        e.input_text("abc");
        e.backspace();
        assert_eq!(e.text(), "ab");
        assert_eq!(e.cursor(), 2);
        e.undo();
        assert_eq!(e.text(), "abc");
        assert_eq!(e.cursor(), 3);
    }

    #[test]
    fn undo_then_redo_matches_state_after_edit() {
        let mut e = editor();
        e.input_text("abc");
        e.backspace();
        let text_after_edit = e.text().to_string();
        let cursor_after_edit = e.cursor();
        e.undo();
        e.redo();
        assert_eq!(e.text(), text_after_edit);
        assert_eq!(e.cursor(), cursor_after_edit);
    }

    #[test]
    fn undo_is_granular_per_inserted_codepoint() {
        let mut e = editor();
        e.input_text("hello");
        let before = e.text().to_string();
        e.input_text(" world");
        // `input_text` pushes one undo record per codepoint, so a single undo
        // only reverts the last character, not the whole call.
        e.undo();
        assert_eq!(e.text(), "hello worl");
        for _ in 0..5 {
            e.undo();
        }
        assert_eq!(e.text(), before);
    }

    #[test]
    fn selection_invariants_hold_after_operations() {
        let mut e = editor();
        e.input_text("hello world");
        e.move_word_left(true);
        let (s, en) = e.selection();
        assert!(s <= e.len());
        assert!(en <= e.len());
        if !e.has_selection() {
            assert_eq!(e.cursor(), s);
            assert_eq!(e.cursor(), en);
        }
    }

    #[test]
    fn word_motion_stops_at_boundary_characters() {
        let mut e = editor();
        e.input_text("foo(bar) baz");
        e.move_text_start(false);
        e.move_word_right(false);
        assert_eq!(e.cursor(), 3); // stops right after "foo"
    }

    #[test]
    fn select_all_spans_whole_buffer() {
        let mut e = editor();
        e.input_text("abcdef");
        e.select_all();
        assert_eq!(e.selection(), (0, 6));
        assert_eq!(e.cursor(), 6);
    }

    #[test]
    fn replace_mode_overwrites_codepoint_at_cursor() {
        let mut e = editor();
        e.input_text("abc");
        e.move_text_start(false);
        e.set_mode(Mode::Replace);
        e.input_char('X');
        assert_eq!(e.text(), "Xbc");
        assert_eq!(e.cursor(), 1);
    }

    #[test]
    fn read_only_rejects_all_mutation_even_with_always_insert_mode() {
        let mut e = TextEditState::new(99, 999);
        e.activate("abc", false, true, true);
        assert_eq!(e.mode(), Mode::View);
        assert!(!e.input_char('X'));
        assert!(!e.backspace());
        assert_eq!(e.text(), "abc");
    }

    #[test]
    fn decimal_filter_rejects_non_digits() {
        let mut e = editor();
        e.set_filter(Filter::Decimal);
        e.input_text("1a2b3");
        assert_eq!(e.text(), "123");
    }

    #[test]
    fn history_respects_bounded_record_capacity() {
        let mut e = TextEditState::new(4, 999);
        e.activate("", false, false, false);
        for _ in 0..10 {
            e.input_char('a');
        }
        // Only the most recent `max_records` edits remain undoable.
        let mut undone = 0;
        while e.undo() {
            undone += 1;
        }
        assert!(undone <= 4);
    }

    #[test]
    fn cut_without_selection_is_a_no_op() {
        let mut e = editor();
        e.input_text("abc");
        assert!(!e.cut());
        assert_eq!(e.text(), "abc");
    }

    #[test]
    fn single_line_enter_without_sig_enter_does_not_insert_newline() {
        let mut e = editor();
        e.input_text("abc");
        assert!(!e.enter(false));
        assert_eq!(e.text(), "abc");
    }

    #[test]
    fn multiline_enter_inserts_newline_unless_sig_enter() {
        let mut e = TextEditState::new(99, 999);
        e.activate("", false, false, false);
        e.input_text("abc");
        assert!(e.enter(false));
        assert_eq!(e.text(), "abc\n");
        assert!(e.enter(true));
        assert_eq!(e.text(), "abc\n");
    }
}
