use serde::Serialize;

use crate::config::TooltipConfig;
use crate::human::format_value;
use crate::scene::Tile;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Text shown in the tooltip panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipContent {
    pub name: String,
    pub category: String,
    pub value: String,
    /// Numeric value mirrored for external inspection.
    pub data_value: f64,
}

impl TooltipContent {
    pub fn from_tile(tile: &Tile) -> Self {
        Self {
            name: tile.name.clone(),
            category: tile.category.clone(),
            value: format_value(tile.value),
            data_value: tile.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum TooltipState {
    #[default]
    Hidden,
    Visible {
        content: TooltipContent,
        position: Point,
    },
}

/// Hover panel driven by pointer events over tiles.
#[derive(Debug, Clone, Default)]
pub struct TooltipController {
    config: TooltipConfig,
    state: TooltipState,
}

impl TooltipController {
    pub fn new(config: TooltipConfig) -> Self {
        Self {
            config,
            state: TooltipState::Hidden,
        }
    }

    /// Shows `tile`'s details with the panel offset from `pointer`.
    pub fn show(&mut self, tile: &Tile, pointer: Point) {
        self.state = TooltipState::Visible {
            content: TooltipContent::from_tile(tile),
            position: Point::new(pointer.x + self.config.offset_x, pointer.y + self.config.offset_y),
        };
    }

    pub fn hide(&mut self) {
        self.state = TooltipState::Hidden;
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, TooltipState::Visible { .. })
    }

    pub fn state(&self) -> &TooltipState {
        &self.state
    }
}
