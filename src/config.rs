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

//! Single configuration value collecting every runtime toggle, passed once
//! at `Context::new` and read-only afterward. There is no config file,
//! environment variable, or CLI surface here; everything is a plain field
//! with a documented default.

/// Whether a button widget reports its activation on press or on release.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ButtonTrigger {
    /// The widget reports activation the frame the mouse button goes down.
    #[default]
    OnPress,
    /// The widget reports activation the frame the mouse button is released
    /// while still hovering the widget.
    OnRelease,
}

/// Every recognised runtime option, gathered into one value. Construct with
/// `..Default::default()` to override only the fields a host cares about.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Config {
    /// Use a capacity-bounded arena that never reallocates, trading a hard
    /// allocation ceiling for predictable per-frame cost.
    pub fixed_memory: bool,
    /// Whether the renderer boundary receives pre-batched vertex buffers
    /// (via `vertex::VertexLayout`) rather than raw [`crate::command::Command`]s.
    pub vertex_output: bool,
    /// Whether commands carry an opaque host userdata tag end to end.
    pub command_userdata: bool,
    /// Zero command buffer memory on reset rather than merely resetting the
    /// cursor; slower, but avoids handing stale bytes to a host that reads
    /// the arena directly.
    pub zero_command_memory: bool,
    /// Whether buttons report activation on press or release.
    pub button_trigger: ButtonTrigger,
    /// Maximum UTF-8 bytes of text input accepted per frame.
    pub max_input_bytes: usize,
    /// Maximum bytes held in a numeric input widget's text buffer.
    pub max_number_buffer: usize,
    /// Seconds of inactivity before an auto-hiding scrollbar fades out.
    pub scrollbar_hide_timeout: f32,
    /// Maximum number of undo records retained per text editor.
    pub undo_state_count: usize,
    /// Maximum total codepoints retained across a text editor's undo ring.
    pub undo_char_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fixed_memory: false,
            vertex_output: false,
            command_userdata: false,
            zero_command_memory: false,
            button_trigger: ButtonTrigger::OnPress,
            max_input_bytes: 16,
            max_number_buffer: 64,
            scrollbar_hide_timeout: 4.0,
            undo_state_count: 99,
            undo_char_count: 999,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.max_input_bytes, 16);
        assert_eq!(config.max_number_buffer, 64);
        assert_eq!(config.undo_state_count, 99);
        assert_eq!(config.undo_char_count, 999);
        assert_eq!(config.button_trigger, ButtonTrigger::OnPress);
    }

    #[test]
    fn partial_override_via_struct_update() {
        let config = Config { button_trigger: ButtonTrigger::OnRelease, ..Default::default() };
        assert_eq!(config.button_trigger, ButtonTrigger::OnRelease);
        assert_eq!(config.max_input_bytes, 16);
    }
}
