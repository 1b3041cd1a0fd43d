use std::sync::Arc;

use crate::coords::{Rect, StTransform};
use crate::paint::Color;
use crate::path::{FillRule, Path};

use super::{SortKey, ZIndex};

/// Fill payload: shared geometry plus the per-path records the vertex stage
/// fetches by ID.
#[derive(Debug, Clone, PartialEq)]
pub struct FillCmd {
    pub path: Arc<Path>,
    pub color: Color,
    pub transform: StTransform,
    pub fill_rule: FillRule,
}

/// A single recorded fill: sort key + command + clip rect.
#[derive(Debug, Clone, PartialEq)]
pub struct FillItem {
    pub key: SortKey,
    pub fill: FillCmd,
    /// Scissor rect in screen pixels. `None` = no clipping.
    pub clip_rect: Option<Rect>,
}

/// Recorded fills for a frame.
///
/// Performance characteristics:
/// - `push_fill()` is O(1)
/// - paint-order iteration reuses an internal index buffer; no per-frame
///   allocation once warmed
///
/// # Clipping
///
/// Use [`push_clip`](Scene::push_clip) / [`pop_clip`](Scene::pop_clip) to
/// scope fills to a scissor rect. Clips intersect with the current parent.
#[derive(Debug, Default)]
pub struct Scene {
    pub(super) items: Vec<FillItem>,
    next_order: u32,

    pub(super) sorted_indices: Vec<usize>,
    sorted_dirty: bool,

    /// Top is the effective clip, already intersected with all parents.
    clip_stack: Vec<Rect>,
}

impl Scene {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded fills and the clip stack. Keeps allocated capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.sorted_dirty = true;
        self.sorted_indices.clear();
        self.clip_stack.clear();
    }

    /// Returns fills in insertion order.
    #[inline]
    pub fn items(&self) -> &[FillItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Records a fill on layer `z`. It inherits the current clip rect.
    pub fn push_fill(
        &mut self,
        z: ZIndex,
        path: Arc<Path>,
        color: Color,
        transform: StTransform,
        fill_rule: FillRule,
    ) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        self.items.push(FillItem {
            key: SortKey::new(z, order),
            fill: FillCmd {
                path,
                color,
                transform,
                fill_rule,
            },
            clip_rect: self.clip_stack.last().copied(),
        });

        self.sorted_dirty = true;
    }

    /// Records an untransformed non-zero fill of `path`.
    #[inline]
    pub fn push_path(&mut self, z: ZIndex, path: impl Into<Arc<Path>>, color: Color) {
        self.push_fill(z, path.into(), color, StTransform::IDENTITY, FillRule::NonZero);
    }

    /// Begins a scissor region; calls must be balanced with `pop_clip`.
    #[inline]
    pub fn push_clip(&mut self, rect: Rect) {
        let effective = match self.clip_stack.last() {
            None => rect.normalized(),
            // No overlap collapses to a zero-area clip; those fills are dropped at build.
            Some(&parent) => parent.intersect(rect).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0)),
        };
        self.clip_stack.push(effective);
    }

    /// Ends the most recent scissor region.
    ///
    /// # Panics
    /// Panics (debug only) if called without a matching `push_clip`.
    #[inline]
    pub fn pop_clip(&mut self) {
        debug_assert!(!self.clip_stack.is_empty(), "pop_clip called without matching push_clip");
        self.clip_stack.pop();
    }

    /// Returns indices into `items` in paint order (back-to-front).
    pub fn indices_in_paint_order(&mut self) -> &[usize] {
        self.ensure_sorted();
        &self.sorted_indices
    }

    /// Iterates fills in paint order without cloning.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &FillItem> {
        self.ensure_sorted();
        self.sorted_indices.iter().map(|&i| &self.items[i])
    }

    pub(super) fn ensure_sorted(&mut self) {
        if !self.sorted_dirty {
            return;
        }
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.items.len());

        // Keys are unique (insertion order), so an unstable sort is deterministic.
        let items = &self.items;
        self.sorted_indices.sort_unstable_by_key(|&i| items[i].key);

        self.sorted_dirty = false;
    }
}
