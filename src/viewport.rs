//! Scroll viewport and intersection tracking.
//!
//! The page is a column of rows; the viewport is the window of rows currently
//! on screen. [`VisibilityObserver`] plays the role of an intersection
//! observer: it remembers what each registered element looked like last time
//! and only reports elements whose visibility flipped.

use std::collections::HashMap;
use std::hash::Hash;

/// Rows occupied by one element, `top` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    pub top: usize,
    pub height: usize,
}

impl RowSpan {
    pub fn new(top: usize, height: usize) -> Self {
        Self { top, height }
    }

    pub fn row(top: usize) -> Self {
        Self::new(top, 1)
    }

    pub fn bottom(&self) -> usize {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub offset: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(offset: usize, height: usize) -> Self {
        Self { offset, height }
    }

    pub fn bottom(&self) -> usize {
        self.offset + self.height
    }

    /// True if any row of `span` is on screen. Zero-height spans and
    /// zero-height viewports never intersect.
    pub fn intersects(&self, span: RowSpan) -> bool {
        span.height > 0
            && self.height > 0
            && span.top < self.bottom()
            && self.offset < span.bottom()
    }

    /// Largest offset that still fills the screen for a page of `total_rows`.
    pub fn max_offset(&self, total_rows: usize) -> usize {
        total_rows.saturating_sub(self.height)
    }

    pub fn clamp_offset(&mut self, total_rows: usize) {
        self.offset = self.offset.min(self.max_offset(total_rows));
    }

    pub fn scroll_by(&mut self, delta: isize, total_rows: usize) {
        self.offset = self.offset.saturating_add_signed(delta);
        self.clamp_offset(total_rows);
    }

    pub fn scroll_to(&mut self, row: usize, total_rows: usize) {
        self.offset = row;
        self.clamp_offset(total_rows);
    }
}

#[derive(Debug, Clone)]
pub struct VisibilityObserver<K> {
    spans: Vec<(K, RowSpan)>,
    last: HashMap<K, bool>,
}

impl<K> Default for VisibilityObserver<K> {
    fn default() -> Self {
        Self {
            spans: Vec::new(),
            last: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> VisibilityObserver<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching `key`, or move it if already watched. The element is
    /// treated as not visible until the next `update`.
    pub fn observe(&mut self, key: K, span: RowSpan) {
        match self.spans.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = span,
            None => self.spans.push((key, span)),
        }
    }

    pub fn unobserve(&mut self, key: K) {
        self.spans.retain(|(k, _)| *k != key);
        self.last.remove(&key);
    }

    /// Forget everything; used when the page is rebuilt.
    pub fn clear(&mut self) {
        self.spans.clear();
        self.last.clear();
    }

    pub fn is_visible(&self, key: K) -> bool {
        self.last.get(&key).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Re-evaluate every element against `viewport`, returning only the
    /// transitions, in registration order.
    pub fn update(&mut self, viewport: Viewport) -> Vec<(K, bool)> {
        let mut changes = Vec::new();
        for (key, span) in &self.spans {
            let visible = viewport.intersects(*span);
            let was = self.last.insert(*key, visible).unwrap_or(false);
            if visible != was {
                changes.push((*key, visible));
            }
        }
        changes
    }
}
