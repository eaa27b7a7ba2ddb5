//! The shape arena.

use crate::shapes::{Shape, ShapeId};
use crate::svg;
use kurbo::{Point, Rect};
use std::collections::HashMap;

/// Shapes keyed by id, plus their paint order (back to front).
#[derive(Debug, Clone, Default)]
pub struct CanvasDocument {
    /// All shapes in the document, keyed by ID.
    shapes: HashMap<ShapeId, Shape>,
    /// Z-order of shapes (back to front).
    z_order: Vec<ShapeId>,
}

impl CanvasDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_shapes(shapes: impl IntoIterator<Item = Shape>) -> Self {
        let mut doc = Self::new();
        for shape in shapes {
            doc.add(shape);
        }
        doc
    }

    /// Add a shape on top.
    pub fn add(&mut self, shape: Shape) {
        let index = self.z_order.len();
        self.insert_at(index, shape);
    }

    /// Insert a shape at `index` in paint order, clamped to the end.
    /// A shape whose id is already present is replaced and moved.
    pub fn insert_at(&mut self, index: usize, shape: Shape) {
        let id = shape.id();
        self.z_order.retain(|&existing| existing != id);
        let index = index.min(self.z_order.len());
        self.z_order.insert(index, id);
        self.shapes.insert(id, shape);
    }

    /// Remove a shape, returning its paint-order index and the shape.
    pub fn remove(&mut self, id: ShapeId) -> Option<(usize, Shape)> {
        let index = self.index_of(id)?;
        self.z_order.remove(index);
        self.shapes.remove(&id).map(|shape| (index, shape))
    }

    /// Clear all shapes from the document.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.z_order.clear();
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.z_order.iter().position(|&shape_id| shape_id == id)
    }

    /// Get shapes in z-order (back to front).
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Topmost shape under `point`.
    pub fn shape_at(&self, point: Point) -> Option<ShapeId> {
        self.z_order
            .iter()
            .rev()
            .copied()
            .find(|id| self.shapes.get(id).is_some_and(|s| s.hit_test(point)))
    }

    /// Topmost text shape under `point`, ignoring anything above it.
    pub fn text_at(&self, point: Point) -> Option<ShapeId> {
        self.z_order.iter().rev().copied().find(|id| {
            self.shapes
                .get(id)
                .is_some_and(|s| s.as_text().is_some() && s.hit_test(point))
        })
    }

    /// Union of every shape's bounds.
    pub fn bounds(&self) -> Option<Rect> {
        self.shapes_ordered()
            .map(Shape::bounds)
            .reduce(|acc, bounds| acc.union(bounds))
    }

    /// Element text of every shape in paint order; equal fingerprints mean
    /// equal saved files.
    pub fn fingerprint(&self) -> String {
        svg::fingerprint(self.shapes_ordered())
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.z_order.is_empty()
    }

    /// Get the number of shapes.
    pub fn len(&self) -> usize {
        self.z_order.len()
    }
}
