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

//! Panel row layout: the nine size-policy row kinds and the cursor state
//! machine that turns them into a stream of widget rectangles.

use super::*;

/// Per-column sizing rule for a row. A row is an array of these plus one
/// [`SizePolicy`] governing its height; together they cover all nine row
/// kinds: equal-width columns use `Fixed`/`Remainder` repeated, ratio rows use
/// `Ratio`/`Remainder`, and free-placement rows bypass the cursor entirely via
/// [`LayoutManager::next_free`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SizePolicy {
    /// An absolute pixel width (or height, when used for the row's height).
    Fixed(i32),
    /// A fraction of the row's usable width (or remaining vertical space).
    Ratio(f32),
    /// Shares whatever width remains after `Fixed`/`Ratio` columns in the same
    /// row are satisfied, split equally among every `Remainder` column in
    /// that row. The payload is unused and reserved for parity with
    /// call sites that write `SizePolicy::Remainder(0)`.
    Remainder(i32),
    /// Falls back to the layout's configured default cell size.
    Auto,
}

/// One column definition for a [`LayoutManager::begin_template`] row: the
/// TEMPLATE row kind's three column flavors.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TemplateColumn {
    /// Shares remaining space equally with other `Dynamic` columns, after
    /// `Variable` minimums are met.
    Dynamic,
    /// Stretches to fill remaining space beyond its minimum width, sharing
    /// that remaining space with other `Variable` columns.
    Variable(i32),
    /// A fixed pixel width.
    Static(i32),
}

/// Saved cursor state for [`LayoutManager::snapshot_row_state`] /
/// [`LayoutManager::restore_row_state`], letting callers temporarily
/// override a row definition (see `Container::with_row`) and resume exactly
/// where they left off.
#[derive(Clone, Debug)]
pub struct RowStateSnapshot {
    col_widths: Vec<i32>,
    item_index: usize,
    row_height: i32,
    row_y: i32,
    cursor_x: i32,
}

struct Frame {
    body: Recti,
    col_widths: Vec<i32>,
    item_index: usize,
    row_height: i32,
    row_y: i32,
    cursor_x: i32,
    max: Vec2i,
    indent: i32,
}

/// Cursor-driven row layout engine owned by each `Container`/panel.
///
/// `next()` is called once per widget; it hands back the next cell's
/// rectangle and advances the cursor, wrapping to a new row (reusing the
/// last row's column definitions) once every column has been consumed — the
/// same convention `Container::with_row`'s callers rely on for tables.
pub struct LayoutManager {
    /// Style snapshot copied in at `reset()`; only `spacing`/`indent`/
    /// `default_cell_width` are consulted here.
    pub style: Style,
    body: Recti,
    col_widths: Vec<i32>,
    item_index: usize,
    row_height: i32,
    row_y: i32,
    cursor_x: i32,
    max: Vec2i,
    indent: i32,
    default_cell_height: i32,
    stack: Vec<Frame>,
    template: Vec<TemplateColumn>,
}

impl Default for LayoutManager {
    fn default() -> Self {
        Self {
            style: Style::default(),
            body: Recti::default(),
            col_widths: Vec::new(),
            item_index: 0,
            row_height: 0,
            row_y: 0,
            cursor_x: 0,
            max: Vec2i::default(),
            indent: 0,
            default_cell_height: 0,
            stack: Vec::new(),
            template: Vec::new(),
        }
    }
}

impl LayoutManager {
    fn usable_width(&self) -> i32 { (self.body.width - self.indent).max(0) }

    /// Reinitialises the layout for a new container body; `scroll` offsets
    /// the starting cursor by the container's current scroll position so
    /// that `current_max` reports unscrolled content extents.
    pub fn reset(&mut self, body: Recti, scroll: Vec2i) {
        self.body = body;
        self.col_widths.clear();
        self.item_index = 0;
        self.row_height = 0;
        self.indent = 0;
        self.row_y = body.y - scroll.y;
        self.cursor_x = body.x - scroll.x;
        self.max = Vec2i::new(body.x - scroll.x, body.y - scroll.y);
        self.stack.clear();
        self.template.clear();
    }

    /// Sets the row height used whenever a row's height policy is `Auto`.
    pub fn set_default_cell_height(&mut self, height: i32) { self.default_cell_height = height; }

    /// Increases (positive) or decreases (negative) the indent applied to
    /// subsequent rows' starting x position.
    pub fn adjust_indent(&mut self, delta: i32) { self.indent = (self.indent + delta).max(0); }

    /// The container's body rectangle, as passed to the last `reset()`.
    pub fn current_body(&self) -> Recti { self.body }

    /// The furthest bottom-right corner reached by any placed cell so far,
    /// used by the container to size its scrollable content area. `None`
    /// before any cell has been placed.
    pub fn current_max(&self) -> Option<Vec2i> {
        if self.max.x > self.body.x || self.max.y > self.body.y {
            Some(self.max)
        } else {
            None
        }
    }

    fn resolve_height(&self, height: SizePolicy) -> i32 {
        match height {
            SizePolicy::Fixed(h) => h,
            SizePolicy::Auto => self.default_cell_height,
            SizePolicy::Ratio(_) | SizePolicy::Remainder(_) => self.default_cell_height,
        }
    }

    fn resolve_widths(&self, widths: &[SizePolicy]) -> Vec<i32> {
        let usable = self.usable_width();
        let spacing = self.style.spacing;
        let gaps = spacing * (widths.len().saturating_sub(1)) as i32;
        let mut fixed_sum = 0i32;
        let mut remainder_count = 0i32;
        for w in widths {
            match w {
                SizePolicy::Fixed(px) => fixed_sum += *px,
                SizePolicy::Ratio(r) => fixed_sum += (*r * usable as f32).round() as i32,
                SizePolicy::Auto => fixed_sum += self.style.default_cell_width,
                SizePolicy::Remainder(_) => remainder_count += 1,
            }
        }
        let remaining = (usable - gaps - fixed_sum).max(0);
        let share = if remainder_count > 0 { remaining / remainder_count } else { 0 };
        widths
            .iter()
            .map(|w| match w {
                SizePolicy::Fixed(px) => *px,
                SizePolicy::Ratio(r) => (*r * usable as f32).round() as i32,
                SizePolicy::Auto => self.style.default_cell_width,
                SizePolicy::Remainder(_) => share,
            })
            .collect()
    }

    /// Starts a new row: `widths` gives each column's [`SizePolicy`] (its
    /// length is the column count for `DYNAMIC_FIXED`/`STATIC_FIXED`/
    /// `DYNAMIC_ROW`/`STATIC_ROW`/`DYNAMIC`/`STATIC`), `height` governs every
    /// cell's height in this row. Once all columns are consumed by `next()`
    /// the row definition is reused for the following row, so a table caller
    /// only needs to call `row()` once before iterating every line.
    pub fn row(&mut self, widths: &[SizePolicy], height: SizePolicy) {
        if !self.col_widths.is_empty() || self.item_index != 0 {
            self.row_y += self.row_height + self.style.spacing;
        }
        self.col_widths = self.resolve_widths(widths);
        self.row_height = self.resolve_height(height);
        self.item_index = 0;
        self.cursor_x = self.body.x + self.indent;
    }

    /// Returns the next cell's absolute rectangle, advancing the cursor.
    /// Columns beyond the configured count wrap to a new row reusing the
    /// same column widths; calling `next()` with no prior `row()` yields a
    /// single full-usable-width cell.
    pub fn next(&mut self) -> Recti {
        if self.col_widths.is_empty() {
            let widths = [SizePolicy::Remainder(0)];
            let height = SizePolicy::Fixed(self.default_cell_height);
            self.row(&widths, height);
        } else if self.item_index >= self.col_widths.len() {
            let widths = self.col_widths.clone();
            self.row_y += self.row_height + self.style.spacing;
            self.item_index = 0;
            self.cursor_x = self.body.x + self.indent;
            self.col_widths = widths;
        }
        let width = self.col_widths[self.item_index];
        let rect = Recti::new(self.cursor_x, self.row_y, width, self.row_height);
        self.cursor_x += width + self.style.spacing;
        self.item_index += 1;
        self.max.x = self.max.x.max(rect.x + rect.width);
        self.max.y = self.max.y.max(rect.y + rect.height);
        rect
    }

    /// `DYNAMIC_FREE`/`STATIC_FREE`: places a widget at an explicit
    /// rectangle relative to the container body without touching the row
    /// cursor. `normalized` selects between `(0..1)`-fraction-of-body
    /// coordinates (`DYNAMIC_FREE`) and absolute pixel coordinates relative
    /// to the body origin (`STATIC_FREE`).
    pub fn next_free(&mut self, x: f32, y: f32, w: f32, h: f32, normalized: bool) -> Recti {
        let rect = if normalized {
            Recti::new(
                self.body.x + (x * self.body.width as f32).round() as i32,
                self.body.y + (y * self.body.height as f32).round() as i32,
                (w * self.body.width as f32).round() as i32,
                (h * self.body.height as f32).round() as i32,
            )
        } else {
            Recti::new(self.body.x + x as i32, self.body.y + y as i32, w as i32, h as i32)
        };
        self.max.x = self.max.x.max(rect.x + rect.width);
        self.max.y = self.max.y.max(rect.y + rect.height);
        rect
    }

    /// Begins a `TEMPLATE` row definition; follow with repeated
    /// `push_template_column` calls and finish with `end_template`.
    pub fn begin_template(&mut self) { self.template.clear(); }

    /// Registers one column of an in-progress `TEMPLATE` row (up to 16).
    pub fn push_template_column(&mut self, column: TemplateColumn) {
        if self.template.len() < 16 {
            self.template.push(column);
        }
    }

    /// Resolves the registered template columns into concrete pixel widths
    /// and starts the row: static widths are summed first, then the
    /// remaining space is divided among
    /// `Variable` columns if their minimums all fit, otherwise among
    /// `Dynamic` columns only (variables collapse to their minimum).
    pub fn end_template(&mut self, height: SizePolicy) {
        let usable = self.usable_width();
        let gaps = self.style.spacing * (self.template.len().saturating_sub(1)) as i32;
        let static_sum: i32 = self
            .template
            .iter()
            .map(|c| match c {
                TemplateColumn::Static(px) => *px,
                _ => 0,
            })
            .sum();
        let variable_min_sum: i32 = self
            .template
            .iter()
            .map(|c| match c {
                TemplateColumn::Variable(min) => *min,
                _ => 0,
            })
            .sum();
        let variable_count = self.template.iter().filter(|c| matches!(c, TemplateColumn::Variable(_))).count() as i32;
        let dynamic_count = self.template.iter().filter(|c| matches!(c, TemplateColumn::Dynamic)).count() as i32;
        let remaining_after_static = (usable - gaps - static_sum).max(0);

        let widths: Vec<i32> = if variable_count > 0 && remaining_after_static >= variable_min_sum {
            let extra_per_variable = (remaining_after_static - variable_min_sum) / variable_count.max(1);
            self.template
                .iter()
                .map(|c| match c {
                    TemplateColumn::Static(px) => *px,
                    TemplateColumn::Variable(min) => min + extra_per_variable,
                    TemplateColumn::Dynamic => 0,
                })
                .collect()
        } else if dynamic_count > 0 {
            let share = remaining_after_static.max(0) / dynamic_count.max(1);
            self.template
                .iter()
                .map(|c| match c {
                    TemplateColumn::Static(px) => *px,
                    TemplateColumn::Variable(min) => *min,
                    TemplateColumn::Dynamic => share,
                })
                .collect()
        } else {
            self.template
                .iter()
                .map(|c| match c {
                    TemplateColumn::Static(px) => *px,
                    TemplateColumn::Variable(min) => *min,
                    TemplateColumn::Dynamic => 0,
                })
                .collect()
        };

        if !self.col_widths.is_empty() || self.item_index != 0 {
            self.row_y += self.row_height + self.style.spacing;
        }
        self.col_widths = widths;
        self.row_height = self.resolve_height(height);
        self.item_index = 0;
        self.cursor_x = self.body.x + self.indent;
    }

    /// Pushes the current row cursor so a later call can restore it,
    /// letting `Container::with_row` temporarily override the active row.
    pub fn snapshot_row_state(&self) -> RowStateSnapshot {
        RowStateSnapshot {
            col_widths: self.col_widths.clone(),
            item_index: self.item_index,
            row_height: self.row_height,
            row_y: self.row_y,
            cursor_x: self.cursor_x,
        }
    }

    /// Restores a row cursor previously captured by `snapshot_row_state`.
    pub fn restore_row_state(&mut self, snapshot: RowStateSnapshot) {
        self.col_widths = snapshot.col_widths;
        self.item_index = snapshot.item_index;
        self.row_height = snapshot.row_height;
        self.row_y = snapshot.row_y;
        self.cursor_x = snapshot.cursor_x;
    }

    /// Begins a nested column scope: the next cell of the current row
    /// becomes the body of a fresh, independent layout until `end_column`.
    pub fn begin_column(&mut self) {
        let cell = self.next();
        self.stack.push(Frame {
            body: self.body,
            col_widths: std::mem::take(&mut self.col_widths),
            item_index: self.item_index,
            row_height: self.row_height,
            row_y: self.row_y,
            cursor_x: self.cursor_x,
            max: self.max,
            indent: self.indent,
        });
        self.body = cell;
        self.col_widths.clear();
        self.item_index = 0;
        self.row_height = 0;
        self.row_y = cell.y;
        self.cursor_x = cell.x;
        self.indent = 0;
        self.max = Vec2i::new(cell.x, cell.y);
    }

    /// Ends a nested column scope, folding its content extents back into the
    /// parent so scrollable content sizing accounts for nested columns.
    pub fn end_column(&mut self) {
        let child_max = self.max;
        if let Some(parent) = self.stack.pop() {
            self.body = parent.body;
            self.col_widths = parent.col_widths;
            self.item_index = parent.item_index;
            self.row_height = parent.row_height;
            self.row_y = parent.row_y;
            self.cursor_x = parent.cursor_x;
            self.indent = parent.indent;
            self.max = Vec2i::new(parent.max.x.max(child_max.x), parent.max.y.max(child_max.y));
        }
    }

    /// Releases any per-frame-only state once a root container/panel scope
    /// finishes. Any unbalanced `begin_column` frames are discarded rather
    /// than leaking into the next container that reuses this manager.
    pub fn pop_scope(&mut self) {
        self.stack.clear();
        self.template.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_fixed_splits_body_evenly() {
        let mut layout = LayoutManager::default();
        layout.style.spacing = 0;
        layout.reset(Recti::new(0, 0, 300, 100), Vec2i::default());
        layout.row(&[SizePolicy::Remainder(0), SizePolicy::Remainder(0), SizePolicy::Remainder(0)], SizePolicy::Fixed(20));
        let a = layout.next();
        let b = layout.next();
        let c = layout.next();
        assert_eq!(a.width, 100);
        assert_eq!(b.width, 100);
        assert_eq!(c.width, 100);
        assert_eq!(b.x, a.x + 100);
        assert_eq!(c.x, b.x + 100);
    }

    #[test]
    fn row_wraps_after_last_column() {
        let mut layout = LayoutManager::default();
        layout.style.spacing = 0;
        layout.reset(Recti::new(0, 0, 100, 100), Vec2i::default());
        layout.row(&[SizePolicy::Fixed(50), SizePolicy::Fixed(50)], SizePolicy::Fixed(10));
        let _ = layout.next();
        let _ = layout.next();
        let third = layout.next();
        assert_eq!(third.y, 10);
        assert_eq!(third.x, 0);
    }

    #[test]
    fn negative_ratio_entries_split_remaining_space() {
        let mut layout = LayoutManager::default();
        layout.style.spacing = 0;
        layout.reset(Recti::new(0, 0, 200, 100), Vec2i::default());
        layout.row(&[SizePolicy::Fixed(50), SizePolicy::Remainder(0), SizePolicy::Remainder(0)], SizePolicy::Fixed(10));
        let a = layout.next();
        let b = layout.next();
        let c = layout.next();
        assert_eq!(a.width, 50);
        assert_eq!(b.width, 75);
        assert_eq!(c.width, 75);
    }

    #[test]
    fn template_variable_stretches_to_fill() {
        let mut layout = LayoutManager::default();
        layout.style.spacing = 0;
        layout.reset(Recti::new(0, 0, 300, 100), Vec2i::default());
        layout.begin_template();
        layout.push_template_column(TemplateColumn::Static(50));
        layout.push_template_column(TemplateColumn::Variable(50));
        layout.end_template(SizePolicy::Fixed(20));
        let a = layout.next();
        let b = layout.next();
        assert_eq!(a.width, 50);
        assert_eq!(b.width, 250);
    }

    #[test]
    fn column_scope_folds_max_into_parent() {
        let mut layout = LayoutManager::default();
        layout.style.spacing = 0;
        layout.reset(Recti::new(0, 0, 200, 200), Vec2i::default());
        layout.row(&[SizePolicy::Remainder(0)], SizePolicy::Fixed(10));
        layout.begin_column();
        layout.row(&[SizePolicy::Fixed(10)], SizePolicy::Fixed(500));
        let _ = layout.next();
        layout.end_column();
        let max = layout.current_max().unwrap();
        assert!(max.y >= 510);
    }
}
