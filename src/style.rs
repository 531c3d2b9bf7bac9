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

//! Bounded stack of temporary style overrides, for widgets that need to draw
//! a handful of children with a tweaked [`Style`] (a disabled-looking button,
//! a highlighted tree row) and restore the surrounding style afterwards.

use crate::error::Error;
use crate::Style;
use log::warn;

/// Default capacity; matches the atlas/arena convention of a small, fixed
/// bound rather than unbounded nesting (a runaway push/pop imbalance should
/// surface quickly rather than growing without limit).
const DEFAULT_CAPACITY: usize = 32;

/// A bounded LIFO stack of [`Style`] snapshots layered over a base style.
pub struct StyleStack {
    base: Style,
    stack: Vec<Style>,
    capacity: usize,
}

impl StyleStack {
    /// Creates a stack rooted at `base` with the default capacity.
    pub fn new(base: Style) -> Self { Self::with_capacity(base, DEFAULT_CAPACITY) }

    /// Creates a stack rooted at `base` with an explicit capacity bound.
    pub fn with_capacity(base: Style, capacity: usize) -> Self {
        Self { base, stack: Vec::with_capacity(capacity), capacity }
    }

    /// The currently active style: the top of the stack, or the base style
    /// if nothing has been pushed.
    pub fn current(&self) -> &Style { self.stack.last().unwrap_or(&self.base) }

    /// Replaces the base style outright (used by `Context::set_style`'s
    /// whole-theme swap); does not affect any pushed overrides.
    pub fn set_base(&mut self, style: Style) { self.base = style; }

    /// Pushes a new active style, returning `Err` without mutating the
    /// stack if it is already at capacity. Per the setup-time/in-band
    /// failure split, callers treat this as a non-fatal in-band condition:
    /// the widget continues to draw with the previous style.
    pub fn push(&mut self, style: Style) -> Result<(), Error> {
        if self.stack.len() >= self.capacity {
            warn!("style stack overflow: at capacity ({})", self.capacity);
            return Err(Error::StyleStackOverflow(self.capacity));
        }
        self.stack.push(style);
        Ok(())
    }

    /// Pushes a copy of the current style after applying `patch`, a
    /// convenience for the common "tweak one field" case.
    pub fn push_with(&mut self, patch: impl FnOnce(&mut Style)) -> Result<(), Error> {
        let mut style = *self.current();
        patch(&mut style);
        self.push(style)
    }

    /// Pops the most recent override. Returns `Err` if the stack is already
    /// empty (a pop with no matching push); the active style falls back to
    /// the base style either way.
    pub fn pop(&mut self) -> Result<(), Error> {
        if self.stack.pop().is_none() {
            warn!("style stack underflow: pop called with no matching push");
            return Err(Error::StyleStackUnderflow);
        }
        Ok(())
    }

    /// Number of overrides currently pushed.
    pub fn depth(&self) -> usize { self.stack.len() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_then_pop_restores_base() {
        let base = Style::default();
        let mut stack = StyleStack::new(base);
        stack.push_with(|s| s.spacing = 99).unwrap();
        assert_eq!(stack.current().spacing, 99);
        stack.pop().unwrap();
        assert_eq!(stack.current().spacing, base.spacing);
    }

    #[test]
    fn overflow_leaves_stack_unchanged() {
        let mut stack = StyleStack::with_capacity(Style::default(), 1);
        stack.push(Style::default()).unwrap();
        let err = stack.push(Style::default());
        assert!(matches!(err, Err(Error::StyleStackOverflow(1))));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn underflow_on_empty_stack() {
        let mut stack = StyleStack::new(Style::default());
        assert!(matches!(stack.pop(), Err(Error::StyleStackUnderflow)));
    }
}
