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

//! Configurable vertex layout and the path/fill/stroke geometry builder that
//! turns a stitched [`crate::command::CommandList`] into caller-batched vertex
//! and index buffers. Where [`crate::canvas::Canvas`] hard-codes a
//! single `{pos, tex, color}` vertex, [`VertexLayout`] lets a host describe
//! any attribute order, format, and stride it needs from its own pipeline.

use crate::error::{Error, Result};
use crate::{Color, Recti, TextureId, Vec2f, Vec2i};
use crate::command::{Command, CommandList};

/// The three attribute kinds a [`VertexLayout`] can place.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VertexAttribute {
    /// 2D screen-space position.
    Position,
    /// Texture/atlas coordinate, normalized `[0, 1]`.
    TexCoord,
    /// Per-vertex tint color.
    Color,
}

/// The wire format a [`VertexAttribute`] is written in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VertexFormat {
    /// Two 32-bit floats.
    Float32x2,
    /// Four unsigned normalized bytes (`[0, 255]` -> `[0.0, 1.0]`).
    UNorm8x4,
}

impl VertexFormat {
    /// Size in bytes this format occupies once written.
    pub fn size_bytes(self) -> u32 {
        match self {
            VertexFormat::Float32x2 => 8,
            VertexFormat::UNorm8x4 => 4,
        }
    }
}

/// One attribute's placement within a vertex: which logical value, in what
/// format, at what byte offset.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AttributeDesc {
    /// Which logical value this slot carries.
    pub attribute: VertexAttribute,
    /// Wire format of the slot.
    pub format: VertexFormat,
    /// Byte offset within one vertex.
    pub byte_offset: u32,
}

/// Caller-described vertex memory layout: an ordered set of attribute slots
/// within a fixed-size vertex. Validated once at construction so the
/// converter never has to
/// special-case a malformed layout mid-frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VertexLayout {
    /// Total byte size of one vertex.
    pub stride: u32,
    /// Attribute slots, in no particular order.
    pub attributes: Vec<AttributeDesc>,
}

impl VertexLayout {
    /// Builds and validates a layout. Returns an error if a required
    /// attribute (position, texcoord, color) is missing, if two attributes'
    /// byte ranges overlap, or if an attribute's range exceeds `stride`.
    pub fn new(stride: u32, attributes: Vec<AttributeDesc>) -> Result<Self> {
        let layout = Self { stride, attributes };
        layout.validate()?;
        Ok(layout)
    }

    /// The canonical `{position, texcoord, color}` layout matching
    /// [`crate::canvas::Vertex`]'s fixed field order, provided as a
    /// ready-made default for hosts that don't need a custom layout.
    pub fn default_layout() -> Self {
        Self::new(
            20,
            vec![
                AttributeDesc { attribute: VertexAttribute::Position, format: VertexFormat::Float32x2, byte_offset: 0 },
                AttributeDesc { attribute: VertexAttribute::TexCoord, format: VertexFormat::Float32x2, byte_offset: 8 },
                AttributeDesc { attribute: VertexAttribute::Color, format: VertexFormat::UNorm8x4, byte_offset: 16 },
            ],
        )
        .expect("default_layout is internally consistent")
    }

    fn find(&self, attribute: VertexAttribute) -> Option<&AttributeDesc> {
        self.attributes.iter().find(|a| a.attribute == attribute)
    }

    fn validate(&self) -> Result<()> {
        for (name, attr) in [
            ("position", VertexAttribute::Position),
            ("texcoord", VertexAttribute::TexCoord),
            ("color", VertexAttribute::Color),
        ] {
            if self.find(attr).is_none() {
                return Err(Error::VertexLayoutMissingAttribute(name));
            }
        }
        let mut sorted: Vec<&AttributeDesc> = self.attributes.iter().collect();
        sorted.sort_by_key(|a| a.byte_offset);
        let mut cursor = 0u32;
        for attr in sorted {
            if attr.byte_offset < cursor {
                return Err(Error::VertexLayoutOverlap(attr.byte_offset));
            }
            cursor = attr.byte_offset + attr.format.size_bytes();
            if cursor > self.stride {
                return Err(Error::VertexLayoutOverlap(attr.byte_offset));
            }
        }
        Ok(())
    }

    fn write(&self, out: &mut Vec<u8>, pos: Vec2f, tex: Vec2f, color: Color) {
        let base = out.len();
        out.resize(base + self.stride as usize, 0);
        for attr in &self.attributes {
            let at = base + attr.byte_offset as usize;
            match (attr.attribute, attr.format) {
                (VertexAttribute::Position, VertexFormat::Float32x2) => {
                    out[at..at + 4].copy_from_slice(&pos.x.to_le_bytes());
                    out[at + 4..at + 8].copy_from_slice(&pos.y.to_le_bytes());
                }
                (VertexAttribute::TexCoord, VertexFormat::Float32x2) => {
                    out[at..at + 4].copy_from_slice(&tex.x.to_le_bytes());
                    out[at + 4..at + 8].copy_from_slice(&tex.y.to_le_bytes());
                }
                (VertexAttribute::Color, VertexFormat::UNorm8x4) => {
                    out[at] = color.r;
                    out[at + 1] = color.g;
                    out[at + 2] = color.b;
                    out[at + 3] = color.a;
                }
                _ => {
                    // Only the combinations constructed above are ever placed
                    // in a validated layout today.
                }
            }
        }
    }
}

/// Per-vertex data the geometry builder accumulates before it is baked into
/// raw bytes by a [`VertexLayout`].
#[derive(Copy, Clone)]
struct GVertex {
    pos: Vec2f,
    tex: Vec2f,
    color: Color,
}

/// A contiguous slice of the index buffer sharing one clip rectangle and
/// texture.
#[derive(Clone, Debug)]
pub struct Batch {
    /// Clip rectangle active for this batch's draws.
    pub clip_rect: Recti,
    /// Bound texture, or `None` for solid-color geometry.
    pub texture: Option<TextureId>,
    /// Start index (inclusive) into the converter's index buffer.
    pub index_start: u32,
    /// End index (exclusive) into the converter's index buffer.
    pub index_end: u32,
}

/// Output of [`Converter::convert`]: a baked vertex buffer (bytes laid out
/// per the converter's [`VertexLayout`]), a 32-bit index buffer, and the
/// batch list a renderer should issue draw calls from, in order.
#[derive(Clone, Debug, Default)]
pub struct ConvertedBuffers {
    /// Vertex data, `stride` bytes per vertex as described by the layout.
    pub vertices: Vec<u8>,
    /// Triangle-list indices into `vertices`.
    pub indices: Vec<u32>,
    /// Draw batches in submission order.
    pub batches: Vec<Batch>,
}

const WHITE_UV: Vec2f = Vec2f { x: 0.0, y: 0.0 };

fn vec2f(x: i32, y: i32) -> Vec2f { Vec2f { x: x as f32, y: y as f32 } }

/// Appends a convex polygon's solid fill plus a 1px transparent antialiasing
/// fringe around its perimeter. `points` must describe the polygon in winding
/// order; fewer than 3 points produce no geometry.
fn push_fill(verts: &mut Vec<GVertex>, idx: &mut Vec<u32>, points: &[Vec2i], color: Color) {
    if points.len() < 3 {
        return;
    }
    let base = verts.len() as u32;
    for p in points {
        verts.push(GVertex { pos: vec2f(p.x, p.y), tex: WHITE_UV, color });
    }
    for i in 1..points.len() as u32 - 1 {
        idx.push(base);
        idx.push(base + i);
        idx.push(base + i + 1);
    }

    let centroid = {
        let (mut sx, mut sy) = (0.0f32, 0.0f32);
        for p in points {
            sx += p.x as f32;
            sy += p.y as f32;
        }
        let n = points.len() as f32;
        Vec2f { x: sx / n, y: sy / n }
    };

    let transparent = Color { a: 0, ..color };
    let fringe_base = verts.len() as u32;
    for p in points {
        let dx = p.x as f32 - centroid.x;
        let dy = p.y as f32 - centroid.y;
        let len = (dx * dx + dy * dy).sqrt().max(0.0001);
        let (nx, ny) = (dx / len, dy / len);
        verts.push(GVertex { pos: Vec2f { x: p.x as f32 + nx, y: p.y as f32 + ny }, tex: WHITE_UV, color: transparent });
    }
    let n = points.len() as u32;
    for i in 0..n {
        let inner0 = base + i;
        let inner1 = base + (i + 1) % n;
        let outer0 = fringe_base + i;
        let outer1 = fringe_base + (i + 1) % n;
        idx.push(inner0);
        idx.push(inner1);
        idx.push(outer1);
        idx.push(inner0);
        idx.push(outer1);
        idx.push(outer0);
    }
}

/// Appends a stroked polyline as a ribbon of quads plus an AA fringe on both
/// edges.
fn push_stroke(verts: &mut Vec<GVertex>, idx: &mut Vec<u32>, points: &[Vec2i], closed: bool, thickness: i32, color: Color) {
    if points.len() < 2 {
        return;
    }
    let half = (thickness.max(1) as f32) / 2.0;
    let segment_count = if closed { points.len() } else { points.len() - 1 };
    let transparent = Color { a: 0, ..color };

    for s in 0..segment_count {
        let a = points[s];
        let b = points[(s + 1) % points.len()];
        let dx = (b.x - a.x) as f32;
        let dy = (b.y - a.y) as f32;
        let len = (dx * dx + dy * dy).sqrt();
        if len < 0.0001 {
            continue;
        }
        let (nx, ny) = (-dy / len, dx / len);

        let base = verts.len() as u32;
        let inner = half;
        let outer = half + 1.0;
        verts.push(GVertex { pos: Vec2f { x: a.x as f32 + nx * inner, y: a.y as f32 + ny * inner }, tex: WHITE_UV, color });
        verts.push(GVertex { pos: Vec2f { x: b.x as f32 + nx * inner, y: b.y as f32 + ny * inner }, tex: WHITE_UV, color });
        verts.push(GVertex { pos: Vec2f { x: b.x as f32 - nx * inner, y: b.y as f32 - ny * inner }, tex: WHITE_UV, color });
        verts.push(GVertex { pos: Vec2f { x: a.x as f32 - nx * inner, y: a.y as f32 - ny * inner }, tex: WHITE_UV, color });
        idx.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);

        let fb = verts.len() as u32;
        verts.push(GVertex { pos: Vec2f { x: a.x as f32 + nx * outer, y: a.y as f32 + ny * outer }, tex: WHITE_UV, color: transparent });
        verts.push(GVertex { pos: Vec2f { x: b.x as f32 + nx * outer, y: b.y as f32 + ny * outer }, tex: WHITE_UV, color: transparent });
        idx.extend_from_slice(&[base, base + 1, fb + 1, base, fb + 1, fb]);

        let fb2 = verts.len() as u32;
        verts.push(GVertex { pos: Vec2f { x: a.x as f32 - nx * outer, y: a.y as f32 - ny * outer }, tex: WHITE_UV, color: transparent });
        verts.push(GVertex { pos: Vec2f { x: b.x as f32 - nx * outer, y: b.y as f32 - ny * outer }, tex: WHITE_UV, color: transparent });
        idx.extend_from_slice(&[base + 3, fb2, fb2 + 1, base + 3, fb2 + 1, base + 2]);
    }
}

/// Flattens a cubic Bezier `p0..p3` into `segments` line points (inclusive of
/// both endpoints).
fn flatten_cubic(p0: Vec2i, p1: Vec2i, p2: Vec2i, p3: Vec2i, segments: u32) -> Vec<Vec2i> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            let mt = 1.0 - t;
            let x = mt * mt * mt * p0.x as f32
                + 3.0 * mt * mt * t * p1.x as f32
                + 3.0 * mt * t * t * p2.x as f32
                + t * t * t * p3.x as f32;
            let y = mt * mt * mt * p0.y as f32
                + 3.0 * mt * mt * t * p1.y as f32
                + 3.0 * mt * t * t * p2.y as f32
                + t * t * t * p3.y as f32;
            Vec2i { x: x.round() as i32, y: y.round() as i32 }
        })
        .collect()
}

/// Flattens a circular arc from `a_min` to `a_max` (in sixths of a full
/// turn, matching the `arc_to_fast` convention) into line points.
fn flatten_arc(center: Vec2i, radius: i32, a_min: f32, a_max: f32) -> Vec<Vec2i> {
    let steps = 12.max((radius / 4).max(1));
    let turn = std::f32::consts::PI * 2.0 / 6.0;
    let start = a_min * turn;
    let end = a_max * turn;
    (0..=steps)
        .map(|i| {
            let t = start + (end - start) * (i as f32 / steps as f32);
            Vec2i { x: center.x + (radius as f32 * t.cos()).round() as i32, y: center.y + (radius as f32 * t.sin()).round() as i32 }
        })
        .collect()
}

/// Incremental path builder offering the
/// `line_to`/`arc_to_fast`/`arc_to`/`rect_to`/`curve_to` path API, accumulating a
/// single open or closed point list that `fill`/`stroke` then turns into
/// geometry.
#[derive(Clone, Debug, Default)]
pub struct PathBuilder {
    points: Vec<Vec2i>,
}

impl PathBuilder {
    /// Starts (or continues) a path at `p` with no points yet.
    pub fn new() -> Self { Self::default() }

    /// Appends a straight segment to `p`.
    pub fn line_to(&mut self, p: Vec2i) -> &mut Self {
        self.points.push(p);
        self
    }

    /// Appends a rectangle's four corners in clockwise order.
    pub fn rect_to(&mut self, r: Recti) -> &mut Self {
        self.points.push(Vec2i { x: r.x, y: r.y });
        self.points.push(Vec2i { x: r.x + r.width, y: r.y });
        self.points.push(Vec2i { x: r.x + r.width, y: r.y + r.height });
        self.points.push(Vec2i { x: r.x, y: r.y + r.height });
        self
    }

    /// Appends a fast (coarsely stepped) circular arc from `a_min` to
    /// `a_max` sixths of a turn.
    pub fn arc_to_fast(&mut self, center: Vec2i, radius: i32, a_min: f32, a_max: f32) -> &mut Self {
        self.points.extend(flatten_arc(center, radius, a_min, a_max));
        self
    }

    /// Appends a circular arc from `a_min` to `a_max` radians.
    pub fn arc_to(&mut self, center: Vec2i, radius: i32, a_min: f32, a_max: f32, segments: u32) -> &mut Self {
        let segments = segments.max(1);
        for i in 0..=segments {
            let t = a_min + (a_max - a_min) * (i as f32 / segments as f32);
            self.points.push(Vec2i { x: center.x + (radius as f32 * t.cos()).round() as i32, y: center.y + (radius as f32 * t.sin()).round() as i32 });
        }
        self
    }

    /// Appends a flattened cubic Bezier curve.
    pub fn curve_to(&mut self, p1: Vec2i, p2: Vec2i, p3: Vec2i, segments: u32) -> &mut Self {
        let p0 = *self.points.last().unwrap_or(&p1);
        self.points.extend(flatten_cubic(p0, p1, p2, p3, segments).into_iter().skip(1));
        self
    }

    /// The accumulated point list so far.
    pub fn points(&self) -> &[Vec2i] { &self.points }

    /// Fills the path as a convex polygon plus AA fringe, returning vertices
    /// and the triangle-list indices that reference them.
    pub fn fill(&self, color: Color) -> (Vec<GVertexHandle>, Vec<u32>) {
        let mut v = Vec::new();
        let mut i = Vec::new();
        push_fill(&mut v, &mut i, &self.points, color);
        (v.into_iter().map(GVertexHandle).collect(), i)
    }

    /// Strokes the path as a ribbon plus AA fringe.
    pub fn stroke(&self, thickness: i32, closed: bool, color: Color) -> (Vec<GVertexHandle>, Vec<u32>) {
        let mut v = Vec::new();
        let mut i = Vec::new();
        push_stroke(&mut v, &mut i, &self.points, closed, thickness, color);
        (v.into_iter().map(GVertexHandle).collect(), i)
    }
}

/// Opaque wrapper so [`PathBuilder::fill`]/[`PathBuilder::stroke`] can hand
/// back geometry without exposing [`GVertex`]'s private layout.
#[derive(Copy, Clone)]
pub struct GVertexHandle(GVertex);

/// Glyph placement info a host's font backend supplies for one codepoint,
/// the abstract counterpart of the atlas's `CharEntry` used so this module
/// stays decoupled from any one atlas implementation.
#[derive(Copy, Clone)]
pub struct GlyphPlacement {
    /// Destination rectangle in screen space.
    pub dst: Recti,
    /// Source rectangle within the bound texture, in texels.
    pub src: Recti,
}

/// Converts a stitched [`CommandList`] into batched vertex/index buffers
/// according to a [`VertexLayout`]. `texture_dim` is used to
/// normalize glyph/image source rectangles into `[0, 1]` UV space;
/// `glyph_lookup` resolves one codepoint's placement for `Command::Text`.
pub struct Converter {
    layout: VertexLayout,
    texture_dim: (i32, i32),
}

impl Converter {
    /// Creates a converter baking vertices according to `layout`, with glyph
    /// and image source rectangles measured against a `texture_dim`-sized atlas.
    pub fn new(layout: VertexLayout, texture_dim: (i32, i32)) -> Self {
        Self { layout, texture_dim }
    }

    fn normalize(&self, r: Recti) -> (Vec2f, Vec2f, Vec2f, Vec2f) {
        let (tw, th) = (self.texture_dim.0.max(1) as f32, self.texture_dim.1.max(1) as f32);
        let (x, y, w, h) = (r.x as f32 / tw, r.y as f32 / th, r.width as f32 / tw, r.height as f32 / th);
        (Vec2f { x, y }, Vec2f { x: x + w, y }, Vec2f { x: x + w, y: y + h }, Vec2f { x, y: y + h })
    }

    fn push_textured_quad(verts: &mut Vec<GVertex>, idx: &mut Vec<u32>, dst: Recti, uv: (Vec2f, Vec2f, Vec2f, Vec2f), color: Color) {
        let base = verts.len() as u32;
        verts.push(GVertex { pos: vec2f(dst.x, dst.y), tex: uv.0, color });
        verts.push(GVertex { pos: vec2f(dst.x + dst.width, dst.y), tex: uv.1, color });
        verts.push(GVertex { pos: vec2f(dst.x + dst.width, dst.y + dst.height), tex: uv.2, color });
        verts.push(GVertex { pos: vec2f(dst.x, dst.y + dst.height), tex: uv.3, color });
        idx.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Walks `commands` in order, emitting geometry and splitting draw
    /// batches whenever the active clip rectangle or texture changes.
    /// `glyph_lookup(font, ch)` resolves one
    /// character's atlas placement for `Command::Text`; returning `None`
    /// skips that character (e.g. unmapped codepoint).
    pub fn convert(
        &self,
        commands: &CommandList,
        default_texture: Option<TextureId>,
        glyph_lookup: &dyn Fn(crate::FontId, char) -> Option<GlyphPlacement>,
        image_lookup: &dyn Fn(crate::Image) -> Option<(TextureId, Recti)>,
    ) -> ConvertedBuffers {
        let mut verts: Vec<GVertex> = Vec::new();
        let mut indices: Vec<u32> = Vec::new();
        let mut batches: Vec<Batch> = Vec::new();

        let mut clip = crate::input::unbounded_rect();
        let mut active_texture = default_texture;
        let mut batch_start = 0u32;

        let mut flush_batch = |indices: &Vec<u32>, batches: &mut Vec<Batch>, batch_start: &mut u32, clip: Recti, texture: Option<TextureId>| {
            let end = indices.len() as u32;
            if end > *batch_start {
                batches.push(Batch { clip_rect: clip, texture, index_start: *batch_start, index_end: end });
            }
            *batch_start = end;
        };

        for cmd in commands.iter() {
            match cmd {
                Command::Nop => {}
                Command::Scissor(r) => {
                    flush_batch(&indices, &mut batches, &mut batch_start, clip, active_texture);
                    clip = *r;
                }
                Command::Line { a, b, thickness, color } => {
                    push_stroke(&mut verts, &mut indices, &[*a, *b], false, *thickness, *color);
                }
                Command::Curve { p0, p1, p2, p3, thickness, color } => {
                    let pts = flatten_cubic(*p0, *p1, *p2, *p3, 16);
                    push_stroke(&mut verts, &mut indices, &pts, false, *thickness, *color);
                }
                Command::Rect { rect, thickness, color } => {
                    let mut pb = PathBuilder::new();
                    pb.rect_to(*rect);
                    push_stroke(&mut verts, &mut indices, pb.points(), true, *thickness, *color);
                }
                Command::RectFilled { rect, color } => {
                    let mut pb = PathBuilder::new();
                    pb.rect_to(*rect);
                    push_fill(&mut verts, &mut indices, pb.points(), *color);
                }
                Command::RectMultiColor { rect, colors } => {
                    let base = verts.len() as u32;
                    verts.push(GVertex { pos: vec2f(rect.x, rect.y), tex: WHITE_UV, color: colors[0] });
                    verts.push(GVertex { pos: vec2f(rect.x + rect.width, rect.y), tex: WHITE_UV, color: colors[1] });
                    verts.push(GVertex { pos: vec2f(rect.x + rect.width, rect.y + rect.height), tex: WHITE_UV, color: colors[2] });
                    verts.push(GVertex { pos: vec2f(rect.x, rect.y + rect.height), tex: WHITE_UV, color: colors[3] });
                    indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
                }
                Command::Circle { center, radius, thickness, color } => {
                    let pts = flatten_arc(*center, *radius, 0.0, 6.0);
                    push_stroke(&mut verts, &mut indices, &pts, true, *thickness, *color);
                }
                Command::CircleFilled { center, radius, color } => {
                    let pts = flatten_arc(*center, *radius, 0.0, 6.0);
                    push_fill(&mut verts, &mut indices, &pts, *color);
                }
                Command::Arc { center, radius, a_min, a_max, thickness, color } => {
                    let pts = flatten_arc(*center, *radius, *a_min, *a_max);
                    push_stroke(&mut verts, &mut indices, &pts, false, *thickness, *color);
                }
                Command::ArcFilled { center, radius, a_min, a_max, color } => {
                    let mut pts = vec![*center];
                    pts.extend(flatten_arc(*center, *radius, *a_min, *a_max));
                    push_fill(&mut verts, &mut indices, &pts, *color);
                }
                Command::Triangle { p0, p1, p2, thickness, color } => {
                    push_stroke(&mut verts, &mut indices, &[*p0, *p1, *p2], true, *thickness, *color);
                }
                Command::TriangleFilled { p0, p1, p2, color } => {
                    push_fill(&mut verts, &mut indices, &[*p0, *p1, *p2], *color);
                }
                Command::Polygon { points, thickness, color } => {
                    push_stroke(&mut verts, &mut indices, points, true, *thickness, *color);
                }
                Command::PolygonFilled { points, color } => {
                    push_fill(&mut verts, &mut indices, points, *color);
                }
                Command::Polyline { points, closed, thickness, color } => {
                    push_stroke(&mut verts, &mut indices, points, *closed, *thickness, *color);
                }
                Command::Text { text, pos, font, fg, bg: _ } => {
                    // A requested background fill is expected to arrive as its own
                    // preceding `RectFilled` command; this arm only emits glyph quads.
                    let mut pen = *pos;
                    for ch in text.chars() {
                        let Some(glyph) = glyph_lookup(*font, ch) else { continue };
                        let uv = self.normalize(glyph.src);
                        let dst = crate::rect(pen.x + glyph.dst.x, pen.y + glyph.dst.y, glyph.dst.width, glyph.dst.height);
                        Self::push_textured_quad(&mut verts, &mut indices, dst, uv, *fg);
                        pen.x += glyph.dst.width;
                    }
                }
                Command::Image { image, rect, tint } => {
                    if let Some((texture, src)) = image_lookup(*image) {
                        if active_texture != Some(texture) {
                            flush_batch(&indices, &mut batches, &mut batch_start, clip, active_texture);
                            active_texture = Some(texture);
                        }
                        let uv = self.normalize(src);
                        Self::push_textured_quad(&mut verts, &mut indices, *rect, uv, *tint);
                    }
                }
            }
        }
        flush_batch(&indices, &mut batches, &mut batch_start, clip, active_texture);

        let mut vertex_bytes = Vec::with_capacity(verts.len() * self.layout.stride as usize);
        for v in &verts {
            self.layout.write(&mut vertex_bytes, v.pos, v.tex, v.color);
        }

        ConvertedBuffers { vertices: vertex_bytes, indices, batches }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandBuffer;
    use crate::{color, FontId};

    #[test]
    fn default_layout_validates() {
        let layout = VertexLayout::default_layout();
        assert_eq!(layout.stride, 20);
    }

    #[test]
    fn missing_attribute_is_rejected() {
        let err = VertexLayout::new(
            8,
            vec![AttributeDesc { attribute: VertexAttribute::Position, format: VertexFormat::Float32x2, byte_offset: 0 }],
        )
        .unwrap_err();
        assert_eq!(err, Error::VertexLayoutMissingAttribute("texcoord"));
    }

    #[test]
    fn overlapping_attributes_are_rejected() {
        let err = VertexLayout::new(
            16,
            vec![
                AttributeDesc { attribute: VertexAttribute::Position, format: VertexFormat::Float32x2, byte_offset: 0 },
                AttributeDesc { attribute: VertexAttribute::TexCoord, format: VertexFormat::Float32x2, byte_offset: 4 },
                AttributeDesc { attribute: VertexAttribute::Color, format: VertexFormat::UNorm8x4, byte_offset: 12 },
            ],
        )
        .unwrap_err();
        assert!(matches!(err, Error::VertexLayoutOverlap(_)));
    }

    #[test]
    fn rect_fill_produces_two_triangles_plus_fringe() {
        let mut v = Vec::new();
        let mut i = Vec::new();
        let mut pb = PathBuilder::new();
        pb.rect_to(crate::rect(0, 0, 10, 10));
        push_fill(&mut v, &mut i, pb.points(), color(255, 0, 0, 255));
        // 4 inner + 4 fringe vertices, 2 inner triangles + 4 fringe triangles.
        assert_eq!(v.len(), 8);
        assert_eq!(i.len(), 18);
    }

    #[test]
    fn degenerate_path_produces_no_fill_geometry() {
        let mut v = Vec::new();
        let mut i = Vec::new();
        push_fill(&mut v, &mut i, &[Vec2i { x: 0, y: 0 }, Vec2i { x: 1, y: 1 }], color(255, 255, 255, 255));
        assert!(v.is_empty());
        assert!(i.is_empty());
    }

    #[test]
    fn scissor_command_splits_batches_by_clip_rect() {
        let mut buf = CommandBuffer::new();
        buf.push(Command::RectFilled { rect: crate::rect(0, 0, 10, 10), color: color(255, 0, 0, 255) });
        buf.push(Command::Scissor(crate::rect(0, 0, 5, 5)));
        buf.push(Command::RectFilled { rect: crate::rect(0, 0, 10, 10), color: color(0, 255, 0, 255) });
        let overlay = CommandBuffer::new();
        let list = CommandList::build(std::iter::once(&buf), &overlay);

        let converter = Converter::new(VertexLayout::default_layout(), (256, 256));
        let out = converter.convert(&list, None, &|_, _| None, &|_| None);
        assert_eq!(out.batches.len(), 2);
        let (a, b) = (out.batches[0].clip_rect, out.batches[1].clip_rect);
        assert!(a.width != b.width || a.height != b.height || a.x != b.x || a.y != b.y);
    }

    #[test]
    fn nop_and_unresolved_text_produce_no_geometry() {
        let mut buf = CommandBuffer::new();
        buf.push(Command::Text { text: "hi".into(), pos: Vec2i { x: 0, y: 0 }, font: FontId::default(), fg: color(255, 255, 255, 255), bg: None });
        let overlay = CommandBuffer::new();
        let list = CommandList::build(std::iter::once(&buf), &overlay);

        let converter = Converter::new(VertexLayout::default_layout(), (256, 256));
        let out = converter.convert(&list, None, &|_, _| None, &|_| None);
        assert!(out.vertices.is_empty());
        assert!(out.indices.is_empty());
    }

    #[test]
    fn path_builder_fill_and_stroke_produce_indexed_geometry() {
        let mut pb = PathBuilder::new();
        pb.rect_to(crate::rect(0, 0, 10, 10));
        let (fv, fi) = pb.fill(color(255, 255, 255, 255));
        assert!(!fv.is_empty());
        assert!(fi.iter().all(|&i| (i as usize) < fv.len()));

        let (sv, si) = pb.stroke(2, true, color(0, 0, 0, 255));
        assert!(!sv.is_empty());
        assert!(si.iter().all(|&i| (i as usize) < sv.len()));
    }

    #[test]
    fn cubic_flatten_starts_and_ends_at_control_points() {
        let pts = flatten_cubic(Vec2i { x: 0, y: 0 }, Vec2i { x: 0, y: 10 }, Vec2i { x: 10, y: 10 }, Vec2i { x: 10, y: 0 }, 8);
        let first = pts.first().expect("at least one point");
        let last = pts.last().expect("at least one point");
        assert_eq!((first.x, first.y), (0, 0));
        assert_eq!((last.x, last.y), (10, 0));
    }
}
