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

//! Dual-ended linear arena and a fixed-element page pool.
//!
//! The original design casts raw bytes to typed records from both ends of one
//! buffer. A safe port keeps the *shape* (two cursors, amortised O(1) bump
//! allocation, reset-to-marker) but stores typed values behind `Box<dyn Any>`
//! slots rather than reinterpreting bytes.

use std::any::Any;

/// Marker capturing an arena cursor so callers can roll back to it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Marker {
    front: usize,
    back: usize,
}

/// Which end of the arena an allocation should come from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum End {
    /// Front cursor: command/text data, grows from zero.
    Front,
    /// Back cursor: draw-batch/scratch records, shrinks from the end.
    Back,
}

/// A dual-ended linear allocator over a `Vec<Box<dyn Any>>`-style slab.
///
/// Unlike the original byte arena, slots here are typed boxes; the arena's
/// job is purely to hand out monotonically increasing/decreasing slot indices
/// and to reclaim them in O(1) via `reset`. `front` values are appended to the
/// low end, `back` values to the high end; the two must never cross.
pub struct Arena {
    slots: Vec<Option<Box<dyn Any>>>,
    front: usize,
    back: usize,
    fixed_capacity: Option<usize>,
}

impl Arena {
    /// Creates an empty, dynamically growing arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            front: 0,
            back: 0,
            fixed_capacity: None,
        }
    }

    /// Creates an arena that never grows past `capacity` slots; allocations
    /// beyond capacity return `None` rather than reallocating, matching the
    /// "fixed-memory" configuration option (`Config::fixed_memory`).
    pub fn with_fixed_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            front: 0,
            back: capacity,
            fixed_capacity: Some(capacity),
        }
    }

    fn grow_to(&mut self, needed: usize) -> bool {
        if needed <= self.slots.len() {
            return true;
        }
        if self.fixed_capacity.is_some() {
            return false;
        }
        let mut new_len = self.slots.len().max(1);
        while new_len < needed {
            new_len = new_len.next_power_of_two() * 2;
        }
        self.slots.resize_with(new_len, || None);
        true
    }

    /// Allocates one value from the requested end. Returns `None` on
    /// out-of-memory (fixed arena exhausted, or front/back cursors would
    /// cross) — callers treat this exactly as "widget not rendered this
    /// frame".
    pub fn alloc<T: Any>(&mut self, end: End, value: T) -> Option<usize> {
        match end {
            End::Front => {
                let idx = self.front;
                if idx >= self.back {
                    if !self.grow_if_dynamic(idx + 1) {
                        return None;
                    }
                }
                if idx >= self.slots.len() {
                    return None;
                }
                self.slots[idx] = Some(Box::new(value));
                self.front += 1;
                Some(idx)
            }
            End::Back => {
                if self.back == 0 || self.back - 1 < self.front {
                    if !self.grow_if_dynamic(self.front + 1) {
                        return None;
                    }
                }
                if self.back == 0 {
                    return None;
                }
                let idx = self.back - 1;
                if idx < self.front {
                    return None;
                }
                self.slots[idx] = Some(Box::new(value));
                self.back -= 1;
                Some(idx)
            }
        }
    }

    fn grow_if_dynamic(&mut self, needed: usize) -> bool {
        if self.fixed_capacity.is_some() {
            return false;
        }
        let old_len = self.slots.len();
        if !self.grow_to(needed.max(old_len * 2)) {
            return false;
        }
        // Shift the back region's logical position to the new length.
        let shift = self.slots.len() - old_len;
        if shift > 0 && self.back <= old_len {
            self.slots.copy_within(self.back..old_len, self.back + shift);
            for slot in &mut self.slots[self.back..self.back + shift] {
                *slot = None;
            }
            self.back += shift;
        }
        true
    }

    /// Returns a typed reference to a previously allocated slot.
    pub fn get<T: Any>(&self, idx: usize) -> Option<&T> {
        self.slots.get(idx).and_then(|s| s.as_ref()).and_then(|b| b.downcast_ref::<T>())
    }

    /// Returns a typed mutable reference to a previously allocated slot.
    pub fn get_mut<T: Any>(&mut self, idx: usize) -> Option<&mut T> {
        self.slots.get_mut(idx).and_then(|s| s.as_mut()).and_then(|b| b.downcast_mut::<T>())
    }

    /// Captures the current cursor positions.
    pub fn mark(&self) -> Marker {
        Marker { front: self.front, back: self.back }
    }

    /// Rolls the requested end back to `marker`, or fully empties it if
    /// `marker` is `None`.
    pub fn reset(&mut self, end: End, marker: Option<Marker>) {
        match end {
            End::Front => {
                let target = marker.map(|m| m.front).unwrap_or(0);
                for slot in &mut self.slots[target..self.front] {
                    *slot = None;
                }
                self.front = target;
            }
            End::Back => {
                let target = marker.map(|m| m.back).unwrap_or(self.slots.len());
                for slot in &mut self.slots[self.back..target] {
                    *slot = None;
                }
                self.back = target;
            }
        }
    }

    /// Number of slots currently allocated from the front.
    pub fn front_allocated(&self) -> usize { self.front }

    /// Number of slots currently allocated from the back.
    pub fn back_allocated(&self) -> usize { self.slots.len().saturating_sub(self.back) }

    /// `true` iff both cursors are at rest (no outstanding allocations).
    pub fn is_empty(&self) -> bool { self.front == 0 && self.back_allocated() == 0 }
}

impl Default for Arena {
    fn default() -> Self { Self::new() }
}

/// Fixed-size element pool for Window/Panel-sized objects, backed by a
/// freelist. Mirrors the page-element pool's contract: a free
/// slot is reused before the pool grows, and a `free()` of the most recently
/// allocated slot pops it rather than pushing onto the freelist.
pub struct Pool<T> {
    slots: Vec<Option<T>>,
    freelist: Vec<usize>,
}

impl<T> Pool<T> {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self { slots: Vec::new(), freelist: Vec::new() }
    }

    /// Allocates a new element, reusing a freed slot when one is available.
    pub fn alloc(&mut self, value: T) -> usize {
        if let Some(idx) = self.freelist.pop() {
            self.slots[idx] = Some(value);
            idx
        } else {
            self.slots.push(Some(value));
            self.slots.len() - 1
        }
    }

    /// Frees a slot. If it is the most recently pushed slot and not
    /// referenced by the freelist, the backing vector shrinks; otherwise the
    /// index is recorded on the freelist for reuse.
    pub fn free(&mut self, idx: usize) {
        if idx >= self.slots.len() {
            return;
        }
        self.slots[idx] = None;
        if idx == self.slots.len() - 1 {
            self.slots.pop();
            while matches!(self.slots.last(), Some(None)) {
                self.slots.pop();
            }
        } else {
            self.freelist.push(idx);
        }
    }

    /// Borrows an element.
    pub fn get(&self, idx: usize) -> Option<&T> { self.slots.get(idx).and_then(|s| s.as_ref()) }

    /// Mutably borrows an element.
    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> { self.slots.get_mut(idx).and_then(|s| s.as_mut()) }

    /// Iterates over occupied slots with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| s.as_ref().map(|v| (i, v)))
    }

    /// Iterates mutably over occupied slots with their indices.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, s)| s.as_mut().map(|v| (i, v)))
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_and_back_never_cross() {
        let mut arena = Arena::with_fixed_capacity(4);
        assert!(arena.alloc(End::Front, 1u32).is_some());
        assert!(arena.alloc(End::Front, 2u32).is_some());
        assert!(arena.alloc(End::Back, 3u32).is_some());
        assert!(arena.alloc(End::Back, 4u32).is_some());
        // arena is now full: front==2, back==2
        assert!(arena.alloc(End::Front, 5u32).is_none());
        assert!(arena.alloc(End::Back, 6u32).is_none());
    }

    #[test]
    fn reset_restores_marker() {
        let mut arena = Arena::new();
        let m = arena.mark();
        arena.alloc(End::Front, 1u32);
        arena.alloc(End::Front, 2u32);
        assert_eq!(arena.front_allocated(), 2);
        arena.reset(End::Front, Some(m));
        assert_eq!(arena.front_allocated(), 0);
        assert!(arena.is_empty());
    }

    #[test]
    fn pool_reuses_freed_slot() {
        let mut pool = Pool::new();
        let a = pool.alloc("a");
        let b = pool.alloc("b");
        pool.free(a);
        let c = pool.alloc("c");
        assert_eq!(c, a);
        assert_eq!(pool.get(b), Some(&"b"));
    }
}
