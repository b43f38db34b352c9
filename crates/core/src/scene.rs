//! Paint-ready description of the whole visualization.
//!
//! A [`Scene`] holds every tile and legend entry with final geometry and
//! colour. Painters (SVG, PDF, egui) only read it.

use serde::Serialize;

use crate::colors::{Color, ColorAssigner};
use crate::config::RenderConfig;
use crate::label::{label_lines, LabelLine};
use crate::legend::{layout_legend, LegendItem};
use crate::model::{Hierarchy, NodeId};
use crate::treemap::{Layout, Rect, Size};

/// One leaf rectangle in surface pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    pub node: NodeId,
    pub rect: Rect,
    pub fill: Color,
    pub opacity: f64,
    pub name: String,
    pub category: String,
    /// Name of the depth-1 ancestor; decides the fill.
    pub top_level: String,
    pub value: f64,
    pub label: Vec<LabelLine>,
}

impl Tile {
    pub fn width(&self) -> f64 {
        self.rect.width()
    }

    pub fn height(&self) -> f64 {
        self.rect.height()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub color: Color,
    pub total: f64,
    pub tiles: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    pub title: String,
    pub description: String,
    /// Treemap surface including margins.
    pub size: Size,
    pub legend_size: Size,
    pub tiles: Vec<Tile>,
    pub legend: Vec<LegendItem>,
}

impl Scene {
    /// Builds tiles in layout order, then the legend in dataset order.
    ///
    /// Both passes draw from `colors`, so tiles claim palette slots first.
    pub fn compose(tree: &Hierarchy, layout: &Layout, colors: &ColorAssigner, config: &RenderConfig) -> Self {
        let margins = config.canvas.margins;
        let tiles: Vec<Tile> = layout
            .leaf_rects()
            .map(|(id, r)| {
                let node = tree.get(id);
                let top = tree.get(tree.top_level_of(id));
                Tile {
                    node: id,
                    rect: Rect::new(
                        r.x0 + margins.left,
                        r.y0 + margins.top,
                        r.x1 + margins.left,
                        r.y1 + margins.top,
                    ),
                    fill: colors.color_for(&top.name),
                    opacity: config.tile.fill_opacity,
                    name: node.name.clone(),
                    category: node.category.clone().unwrap_or_else(|| top.name.clone()),
                    top_level: top.name.clone(),
                    value: node.value,
                    label: label_lines(&node.name, &config.tile),
                }
            })
            .collect();

        let legend = layout_legend(&tree.top_level_names(), colors, &config.legend);

        tracing::debug!(tiles = tiles.len(), legend = legend.len(), "composed scene");
        Self {
            title: config.page.title.clone(),
            description: config.page.description.clone(),
            size: config.canvas.outer_size(),
            legend_size: Size::new(config.legend.width, config.legend.height),
            tiles,
            legend,
        }
    }

    /// Topmost tile under a surface point.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.rect.contains(x, y))
    }

    pub fn tile_for(&self, node: NodeId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.node == node)
    }

    pub fn total(&self) -> f64 {
        self.tiles.iter().map(|t| t.value).sum()
    }

    /// Per-category totals in legend order.
    pub fn categories(&self) -> Vec<CategorySummary> {
        self.legend
            .iter()
            .map(|item| {
                let (total, tiles) = self
                    .tiles
                    .iter()
                    .filter(|t| t.top_level == item.name)
                    .fold((0.0, 0), |(v, n), t| (v + t.value, n + 1));
                CategorySummary {
                    name: item.name.clone(),
                    color: item.color,
                    total,
                    tiles,
                }
            })
            .collect()
    }
}
