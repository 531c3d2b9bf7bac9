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
// -----------------------------------------------------------------------------
// Ported to rust from https://github.com/rxi/microui/ and the original license
//
// Copyright (c) 2020 rxi
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.
//
use std::cell::RefCell;
use std::rc::Rc;

use crate::config::Config;
use crate::text_edit::TextEditState;
use crate::text_layout::TextLine;
use crate::{AtlasHandle, FontId, InputSnapshot};

pub(crate) enum ReturnBehavior {
    Submit,
    Newline { submit_on_ctrl: bool },
}

pub(crate) struct TextEditOutcome {
    pub cursor: usize,
    pub changed: bool,
    pub moved: bool,
    pub submit: bool,
}

/// Per-widget handle to the shared text-editing core. `None` while the
/// widget is unfocused; a fresh [`TextEditState`] is activated against the
/// widget's buffer the moment it gains focus, and dropped the moment it
/// loses it, so undo/redo history never leaks between unrelated focus
/// sessions on the same widget.
pub(crate) type TextEditCell = Rc<RefCell<Option<TextEditState>>>;

fn byte_to_codepoint(text: &str, byte: usize) -> usize { text[..byte.min(text.len())].chars().count() }

fn codepoint_to_byte(text: &str, cp: usize) -> usize { text.char_indices().nth(cp).map(|(i, _)| i).unwrap_or(text.len()) }

/// Drives `buf`/`cursor` through [`TextEditState`] for one frame of focused
/// input, keeping the engine's own buffer as the authoritative text and
/// `buf` as the byte-indexed view the rest of the widget (layout, hit
/// testing, rendering) reads.
///
/// Only the signals the live input snapshot actually carries — arrow keys,
/// backspace/delete, raw text, and return — reach the engine. Selection,
/// clipboard, and explicit undo/redo keys exist on `TextEditState` but have
/// no live `KeyCode`/`KeyMode` bit to trigger them yet.
pub(crate) fn drive_text_edit(
    edit: &TextEditCell,
    buf: &mut String,
    cursor: usize,
    focused: bool,
    config: &Config,
    input: &InputSnapshot,
    single_line: bool,
    return_behavior: ReturnBehavior,
) -> TextEditOutcome {
    if !focused {
        edit.borrow_mut().take();
        return TextEditOutcome { cursor: buf.len(), changed: false, moved: false, submit: false };
    }

    let mut slot = edit.borrow_mut();
    if slot.is_none() {
        let mut state = TextEditState::new(config.undo_state_count, config.undo_char_count);
        state.activate(buf.as_str(), single_line, false, false);
        state.click(byte_to_codepoint(buf.as_str(), cursor));
        *slot = Some(state);
    }
    let state = slot.as_mut().unwrap();

    let mut changed = false;
    let mut moved = false;
    let mut submit = false;

    if !input.text_input.is_empty() {
        changed |= state.input_text(input.text_input.as_str());
    }

    if input.key_pressed.is_backspace() {
        changed |= state.backspace();
    }

    let delete_pressed = input.key_pressed.is_delete() || input.key_code_pressed.is_delete() || input.key_codes.is_delete();
    if delete_pressed {
        changed |= state.delete();
    }

    if input.key_code_pressed.is_left() {
        state.move_left(false);
        moved = true;
    }

    if input.key_code_pressed.is_right() {
        state.move_right(false);
        moved = true;
    }

    if input.key_pressed.is_return() {
        let sig_enter = match return_behavior {
            ReturnBehavior::Submit => true,
            ReturnBehavior::Newline { submit_on_ctrl } => submit_on_ctrl && input.key_mods.is_ctrl(),
        };
        if state.enter(sig_enter) {
            if sig_enter {
                submit = true;
            } else {
                changed = true;
            }
        }
    }

    let text = state.text().to_string();
    let byte_cursor = codepoint_to_byte(&text, state.cursor());
    *buf = text;

    TextEditOutcome { cursor: byte_cursor, changed, moved, submit }
}

pub(crate) fn line_index_for_cursor(lines: &[TextLine], cursor: usize) -> usize {
    for (idx, line) in lines.iter().enumerate() {
        if cursor <= line.end {
            return idx;
        }
    }
    lines.len().saturating_sub(1)
}

pub(crate) fn cursor_x_in_line(line: &TextLine, buf: &str, cursor: usize, font: FontId, atlas: &AtlasHandle) -> i32 {
    let end = cursor.min(line.end).max(line.start);
    if end <= line.start {
        0
    } else {
        atlas.get_text_size(font, &buf[line.start..end]).width
    }
}

pub(crate) fn cursor_from_x(line: &TextLine, buf: &str, target_x: i32, font: FontId, atlas: &AtlasHandle) -> usize {
    if target_x <= 0 {
        return line.start;
    }
    let slice = &buf[line.start..line.end];
    let mut last_width = 0;
    for (idx, ch) in slice.char_indices() {
        let next = idx + ch.len_utf8();
        let width = atlas.get_text_size(font, &slice[..next]).width;
        if target_x < width {
            if target_x < (last_width + width) / 2 {
                return line.start + idx;
            }
            return line.start + next;
        }
        last_width = width;
    }
    line.end
}

pub(crate) fn clamp_scroll(value: i32, max_value: i32) -> i32 {
    if max_value <= 0 {
        0
    } else {
        value.clamp(0, max_value)
    }
}
