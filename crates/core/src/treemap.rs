//! Squarified treemap layout.
//!
//! Rows are grown while the worst aspect ratio in the row keeps improving
//! against a golden-ratio target, then laid out along the shorter side of the
//! remaining space. After every node is positioned, all boundaries are
//! rounded to whole pixels; siblings share boundary values exactly, so rounding
//! preserves the tiling.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::model::{Hierarchy, NodeId};

const PHI: f64 = 1.618_033_988_749_895;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Half-open containment: the right and bottom edges belong to the neighbour.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let w = self.x1.min(other.x1) - self.x0.max(other.x0);
        let h = self.y1.min(other.y1) - self.y0.max(other.y0);
        if w > 0.0 && h > 0.0 {
            w * h
        } else {
            0.0
        }
    }

    fn rounded(self) -> Self {
        Self {
            x0: self.x0.round(),
            y0: self.y0.round(),
            x1: self.x1.round(),
            y1: self.y1.round(),
        }
    }

    fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Debug)]
pub struct TreemapItem {
    pub id: NodeId,
    pub weight: f64,
    pub rect: Rect,
}

/// Tiles `area` with one rectangle per weight, in input order.
///
/// Weights are expected in the order the caller wants them placed (largest
/// first gives the best aspect ratios). Zero weights get zero-area slivers.
pub fn squarify(weights: &[(NodeId, f64)], area: Rect) -> Vec<TreemapItem> {
    let mut items: Vec<TreemapItem> = weights
        .iter()
        .map(|&(id, weight)| TreemapItem {
            id,
            weight,
            rect: Rect::default(),
        })
        .collect();

    let n = items.len();
    let mut value: f64 = weights.iter().map(|(_, w)| w).sum();
    let Rect {
        mut x0,
        mut y0,
        x1,
        y1,
    } = area;
    let (mut i0, mut i1) = (0usize, 0usize);

    while i0 < n {
        let dx = x1 - x0;
        let dy = y1 - y0;

        // Find the next non-empty item.
        let mut sum_value;
        loop {
            sum_value = items[i1].weight;
            i1 += 1;
            if sum_value != 0.0 || i1 >= n {
                break;
            }
        }
        let mut min_value = sum_value;
        let mut max_value = sum_value;
        let alpha = (dy / dx).max(dx / dy) / (value * PHI);
        let mut beta = sum_value * sum_value * alpha;
        let mut min_ratio = (max_value / beta).max(beta / min_value);

        // Keep adding items while the worst aspect ratio holds or improves.
        while i1 < n {
            let w = items[i1].weight;
            sum_value += w;
            min_value = min_value.min(w);
            max_value = max_value.max(w);
            beta = sum_value * sum_value * alpha;
            let new_ratio = (max_value / beta).max(beta / min_value);
            if new_ratio > min_ratio {
                sum_value -= w;
                break;
            }
            min_ratio = new_ratio;
            i1 += 1;
        }

        let row = &mut items[i0..i1];
        if dx < dy {
            let y2 = if value != 0.0 { y0 + dy * sum_value / value } else { y1 };
            dice(row, sum_value, Rect::new(x0, y0, x1, y2));
            y0 = y2;
        } else {
            let x2 = if value != 0.0 { x0 + dx * sum_value / value } else { x1 };
            slice(row, sum_value, Rect::new(x0, y0, x2, y1));
            x0 = x2;
        }
        value -= sum_value;
        i0 = i1;
    }
    items
}

/// Lays a row out left to right.
fn dice(row: &mut [TreemapItem], total: f64, area: Rect) {
    let k = if total != 0.0 { area.width() / total } else { 0.0 };
    let mut x = area.x0;
    for item in row {
        let next = x + item.weight * k;
        item.rect = Rect::new(x, area.y0, next, area.y1);
        x = next;
    }
}

/// Lays a row out top to bottom.
fn slice(row: &mut [TreemapItem], total: f64, area: Rect) {
    let k = if total != 0.0 { area.height() / total } else { 0.0 };
    let mut y = area.y0;
    for item in row {
        let next = y + item.weight * k;
        item.rect = Rect::new(area.x0, y, area.x1, next);
        y = next;
    }
}

/// Rectangles for every node of a [`Hierarchy`], indexed by [`NodeId`].
#[derive(Clone, Debug)]
pub struct Layout {
    rects: Vec<Rect>,
    leaves: Vec<NodeId>,
}

impl Layout {
    pub fn rect(&self, id: NodeId) -> Rect {
        self.rects[id.0]
    }

    /// Leaf ids in layout order.
    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves
    }

    pub fn leaf_rects(&self) -> impl Iterator<Item = (NodeId, Rect)> + '_ {
        self.leaves.iter().map(|&id| (id, self.rects[id.0]))
    }
}

/// Configured treemap engine. Padding between siblings is always zero.
#[derive(Clone, Copy, Debug)]
pub struct TreemapLayout {
    size: Size,
    round: bool,
}

impl TreemapLayout {
    pub fn new(size: Size) -> Self {
        Self { size, round: true }
    }

    pub fn round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    /// Positions every node of `tree` inside the canvas.
    pub fn compute(&self, tree: &Hierarchy) -> Result<Layout, LayoutError> {
        let Size { width, height } = self.size;
        if !(width > 0.0 && height > 0.0) {
            return Err(LayoutError::EmptyCanvas { width, height });
        }

        let mut rects = vec![Rect::default(); tree.len()];
        rects[tree.root.0] = Rect::new(0.0, 0.0, width, height);

        let order = tree.pre_order();
        for &id in &order {
            let node = tree.get(id);
            if node.is_leaf() {
                continue;
            }
            let weights: Vec<(NodeId, f64)> = node
                .children
                .iter()
                .map(|&c| (c, tree.get(c).value))
                .collect();
            for item in squarify(&weights, rects[id.0]) {
                rects[item.id.0] = item.rect;
            }
        }

        if self.round {
            for r in rects.iter_mut() {
                *r = r.rounded();
            }
        }

        let eps = 1e-6;
        let bounds = Rect::new(
            -eps,
            -eps,
            width.round().max(width) + eps,
            height.round().max(height) + eps,
        );
        for &id in &order {
            let r = rects[id.0];
            if !r.is_finite() {
                return Err(LayoutError::NonFinite { node: id.0 });
            }
            if r.x0 < bounds.x0 || r.y0 < bounds.y0 || r.x1 > bounds.x1 || r.y1 > bounds.y1 {
                return Err(LayoutError::OutOfBounds { node: id.0 });
            }
        }

        let leaves = tree.leaves();
        let collapsed = leaves
            .iter()
            .filter(|id| {
                let r = rects[id.0];
                r.width() <= 0.0 || r.height() <= 0.0
            })
            .count();
        if collapsed > 0 {
            tracing::warn!(collapsed, "leaves rounded down to zero area");
        }
        tracing::debug!(leaves = leaves.len(), width, height, "computed treemap layout");

        Ok(Layout { rects, leaves })
    }
}
