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

//! Command buffer: the per-frame ordered sequence of drawing commands emitted
//! by widgets, and the z-order stitch performed at `frame_end`.

use crate::{Color, FontId, Image, Recti, TextureId, Vec2i};

/// One drawing primitive. A sum type rather than a header + open-ended byte
/// layout, per the redesign notes: the vertex converter becomes an
/// exhaustive match over this enum instead of reinterpreting raw bytes.
#[derive(Clone, Debug)]
pub enum Command {
    /// No-op placeholder, never emitted by widgets; used as a default/sentinel.
    Nop,
    /// Sets the active scissor/clip rectangle for subsequent commands.
    Scissor(Recti),
    /// A stroked line segment.
    Line { a: Vec2i, b: Vec2i, thickness: i32, color: Color },
    /// A stroked cubic Bezier curve.
    Curve { p0: Vec2i, p1: Vec2i, p2: Vec2i, p3: Vec2i, thickness: i32, color: Color },
    /// An unfilled rectangle outline.
    Rect { rect: Recti, thickness: i32, color: Color },
    /// A filled rectangle.
    RectFilled { rect: Recti, color: Color },
    /// A filled rectangle with one color per corner (top-left, top-right,
    /// bottom-right, bottom-left).
    RectMultiColor { rect: Recti, colors: [Color; 4] },
    /// An unfilled circle outline.
    Circle { center: Vec2i, radius: i32, thickness: i32, color: Color },
    /// A filled circle.
    CircleFilled { center: Vec2i, radius: i32, color: Color },
    /// An unfilled arc outline, angles in sixths of a full turn as the
    /// `arc_to_fast` convention expects.
    Arc { center: Vec2i, radius: i32, a_min: f32, a_max: f32, thickness: i32, color: Color },
    /// A filled arc/pie slice.
    ArcFilled { center: Vec2i, radius: i32, a_min: f32, a_max: f32, color: Color },
    /// An unfilled triangle outline.
    Triangle { p0: Vec2i, p1: Vec2i, p2: Vec2i, thickness: i32, color: Color },
    /// A filled triangle.
    TriangleFilled { p0: Vec2i, p1: Vec2i, p2: Vec2i, color: Color },
    /// An unfilled closed polygon outline.
    Polygon { points: Vec<Vec2i>, thickness: i32, color: Color },
    /// A filled convex polygon.
    PolygonFilled { points: Vec<Vec2i>, color: Color },
    /// An open or closed stroked polyline.
    Polyline { points: Vec<Vec2i>, closed: bool, thickness: i32, color: Color },
    /// A run of shaped text, pre-truncated to fit its rectangle at a glyph
    /// boundary. `bg` is `None` when no background fill was requested.
    Text { text: String, pos: Vec2i, font: FontId, fg: Color, bg: Option<Color> },
    /// A textured image/icon blit.
    Image { image: Image, rect: Recti, tint: Color },
}

impl Default for Command {
    fn default() -> Self { Command::Nop }
}

impl Command {
    /// `true` if this command would be invisible and should be dropped at
    /// source: fully transparent color, or a zero-area rect/triangle.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Command::RectFilled { rect, color } | Command::Rect { rect, color, .. } => {
                color.a == 0 || rect.width <= 0 || rect.height <= 0
            }
            Command::CircleFilled { radius, color, .. } | Command::Circle { radius, color, .. } => color.a == 0 || *radius <= 0,
            Command::TriangleFilled { color, .. } | Command::Triangle { color, .. } => color.a == 0,
            Command::Line { color, .. } | Command::Curve { color, .. } | Command::Polyline { color, .. } => color.a == 0,
            Command::Polygon { color, .. } | Command::PolygonFilled { color, .. } => color.a == 0,
            Command::Arc { color, .. } | Command::ArcFilled { color, .. } => color.a == 0,
            Command::Image { tint, .. } => tint.a == 0,
            _ => false,
        }
    }
}

/// A contiguous per-window span of commands. Several of these are stitched
/// together in z-order by [`CommandList::build`] at `frame_end`.
#[derive(Default, Clone, Debug)]
pub struct CommandBuffer {
    commands: Vec<Command>,
}

impl CommandBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self { Self::default() }

    /// Appends a command unless it is degenerate (drop-at-source rule).
    pub fn push(&mut self, cmd: Command) {
        if !cmd.is_degenerate() {
            self.commands.push(cmd);
        }
    }

    /// Clears the buffer, conceptually resetting `[begin..end)` to empty.
    pub fn clear(&mut self) { self.commands.clear(); }

    /// `true` iff no commands were emitted into this window's span.
    pub fn is_empty(&self) -> bool { self.commands.is_empty() }

    /// Borrows the commands in emission order.
    pub fn commands(&self) -> &[Command] { &self.commands }
}

/// The global, z-ordered, traversable command list built once per frame by
/// `frame_end`. Iteration order is back-to-front window z-order, followed by
/// the overlay buffer (cursor sprite).
#[derive(Default)]
pub struct CommandList {
    commands: Vec<Command>,
}

impl CommandList {
    /// Stitches per-window buffers (already in back-to-front z-order) and an
    /// overlay buffer into one iterable list.
    pub fn build<'a>(windows: impl Iterator<Item = &'a CommandBuffer>, overlay: &'a CommandBuffer) -> Self {
        let mut commands = Vec::new();
        for buf in windows {
            if !buf.is_empty() {
                commands.extend(buf.commands().iter().cloned());
            }
        }
        commands.extend(overlay.commands().iter().cloned());
        Self { commands }
    }

    /// Iterates the stitched command list in emission/z-order.
    pub fn iter(&self) -> impl Iterator<Item = &Command> { self.commands.iter() }

    /// Number of commands in the stitched list.
    pub fn len(&self) -> usize { self.commands.len() }

    /// `true` iff the stitched list has no commands at all.
    pub fn is_empty(&self) -> bool { self.commands.is_empty() }
}

/// Truncates `text` to the longest prefix whose measured width (via `measure`)
/// does not exceed `max_width`, breaking only at `char` (codepoint) boundaries
/// rather than inside one. Callers
/// that need a *glyph*-boundary (not merely codepoint-boundary) truncation
/// should use a `measure` callback that reports glyph widths; this helper
/// only guarantees the break point is a valid `char` boundary.
pub fn truncate_to_width(text: &str, max_width: i32, mut measure: impl FnMut(&str) -> i32) -> &str {
    if measure(text) <= max_width {
        return text;
    }
    let mut end = text.len();
    for (idx, _) in text.char_indices().rev() {
        end = idx;
        if measure(&text[..end]) <= max_width {
            return &text[..end];
        }
    }
    ""
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;

    #[test]
    fn transparent_rect_is_dropped() {
        let mut buf = CommandBuffer::new();
        buf.push(Command::RectFilled { rect: Recti::new(0, 0, 10, 10), color: color(0, 0, 0, 0) });
        assert!(buf.is_empty());
    }

    #[test]
    fn zero_area_rect_is_dropped() {
        let mut buf = CommandBuffer::new();
        buf.push(Command::RectFilled { rect: Recti::new(0, 0, 0, 10), color: color(255, 0, 0, 255) });
        assert!(buf.is_empty());
    }

    #[test]
    fn visible_rect_is_kept_and_iteration_is_emission_order() {
        let mut a = CommandBuffer::new();
        a.push(Command::RectFilled { rect: Recti::new(0, 0, 10, 10), color: color(255, 0, 0, 255) });
        a.push(Command::RectFilled { rect: Recti::new(5, 5, 10, 10), color: color(0, 255, 0, 255) });
        let mut b = CommandBuffer::new();
        b.push(Command::RectFilled { rect: Recti::new(20, 20, 5, 5), color: color(0, 0, 255, 255) });
        let overlay = CommandBuffer::new();
        let list = CommandList::build(vec![&a, &b].into_iter(), &overlay);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn truncation_breaks_on_char_boundary() {
        let s = "hällo";
        let out = truncate_to_width(s, 3, |t| t.chars().count() as i32);
        assert!(s.is_char_boundary(out.len()));
    }
}
