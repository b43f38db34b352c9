//! Render configuration.
//!
//! Every component takes the section it needs by reference; nothing reads
//! shared mutable state. All sections default to the published page's values
//! and can be overridden from a TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::colors::{Color, PAIRED};
use crate::error::{Error, Result};
use crate::treemap::Size;

pub const DEFAULT_DATASET_URL: &str =
    "https://cdn.rawgit.com/freeCodeCamp/testable-projects-fcc/a80ce8f9/src/data/tree_map/kickstarter-funding-data.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub page: PageConfig,

    #[serde(default)]
    pub canvas: CanvasConfig,

    #[serde(default)]
    pub tile: TileConfig,

    #[serde(default)]
    pub legend: LegendConfig,

    #[serde(default)]
    pub tooltip: TooltipConfig,

    #[serde(default)]
    pub colors: ColorConfig,
}

/// Static page text and the dataset location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_description")]
    pub description: String,

    #[serde(default = "default_url")]
    pub url: String,

    /// Request timeout; `None` waits indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_title() -> String {
    "Kickstarter Pledges".to_string()
}

fn default_description() -> String {
    "Top 100 Most Pledged Kickstarter Campaigns Grouped By Category".to_string()
}

fn default_url() -> String {
    DEFAULT_DATASET_URL.to_string()
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: default_description(),
            url: default_url(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub right: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub left: f64,
}

/// Treemap canvas. The layout fills `width` × `height`; margins pad the outer surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    #[serde(default = "default_canvas_width")]
    pub width: f64,

    #[serde(default = "default_canvas_height")]
    pub height: f64,

    #[serde(default)]
    pub margins: Margins,
}

fn default_canvas_width() -> f64 {
    960.0
}

fn default_canvas_height() -> f64 {
    570.0
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
            margins: Margins::default(),
        }
    }
}

impl CanvasConfig {
    pub fn layout_size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn outer_size(&self) -> Size {
        Size::new(
            self.width + self.margins.left + self.margins.right,
            self.height + self.margins.top + self.margins.bottom,
        )
    }
}

/// Tile label placement, in pixels relative to the tile's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileConfig {
    #[serde(default = "default_label_inset")]
    pub label_inset: f64,

    #[serde(default = "default_first_baseline")]
    pub first_baseline: f64,

    #[serde(default = "default_line_height")]
    pub line_height: f64,

    #[serde(default = "default_tile_font_size")]
    pub font_size: f64,

    #[serde(default = "default_fill_opacity")]
    pub fill_opacity: f64,
}

fn default_label_inset() -> f64 {
    4.0
}

fn default_first_baseline() -> f64 {
    13.0
}

fn default_line_height() -> f64 {
    10.0
}

fn default_tile_font_size() -> f64 {
    10.0
}

fn default_fill_opacity() -> f64 {
    1.0
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            label_inset: default_label_inset(),
            first_baseline: default_first_baseline(),
            line_height: default_line_height(),
            font_size: default_tile_font_size(),
            fill_opacity: default_fill_opacity(),
        }
    }
}

/// Legend canvas and its fixed-column grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegendConfig {
    #[serde(default = "default_legend_width")]
    pub width: f64,

    #[serde(default = "default_legend_height")]
    pub height: f64,

    #[serde(default = "default_columns")]
    pub columns: usize,

    #[serde(default = "default_column_width")]
    pub column_width: f64,

    #[serde(default = "default_row_height")]
    pub row_height: f64,

    #[serde(default = "default_swatch")]
    pub swatch_width: f64,

    #[serde(default = "default_swatch")]
    pub swatch_height: f64,

    /// Grid origin relative to the legend canvas.
    #[serde(default)]
    pub origin_x: f64,

    #[serde(default = "default_origin_y")]
    pub origin_y: f64,

    /// Label position relative to its cell.
    #[serde(default = "default_label_dx")]
    pub label_dx: f64,

    #[serde(default = "default_label_dy")]
    pub label_dy: f64,

    #[serde(default = "default_legend_font_size")]
    pub font_size: f64,

    #[serde(default = "default_label_color")]
    pub label_color: Color,
}

fn default_legend_width() -> f64 {
    450.0
}

fn default_legend_height() -> f64 {
    200.0
}

fn default_columns() -> usize {
    3
}

fn default_column_width() -> f64 {
    150.0
}

fn default_row_height() -> f64 {
    25.0
}

fn default_swatch() -> f64 {
    15.0
}

fn default_origin_y() -> f64 {
    30.0
}

fn default_label_dx() -> f64 {
    25.0
}

fn default_label_dy() -> f64 {
    14.0
}

fn default_legend_font_size() -> f64 {
    14.0
}

fn default_label_color() -> Color {
    Color::rgb(0xff, 0xff, 0xff)
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            width: default_legend_width(),
            height: default_legend_height(),
            columns: default_columns(),
            column_width: default_column_width(),
            row_height: default_row_height(),
            swatch_width: default_swatch(),
            swatch_height: default_swatch(),
            origin_x: 0.0,
            origin_y: default_origin_y(),
            label_dx: default_label_dx(),
            label_dy: default_label_dy(),
            font_size: default_legend_font_size(),
            label_color: default_label_color(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipConfig {
    #[serde(default = "default_tooltip_offset")]
    pub offset_x: f64,

    #[serde(default = "default_tooltip_offset")]
    pub offset_y: f64,
}

fn default_tooltip_offset() -> f64 {
    10.0
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            offset_x: default_tooltip_offset(),
            offset_y: default_tooltip_offset(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorConfig {
    #[serde(default = "default_palette")]
    pub palette: Vec<Color>,
}

fn default_palette() -> Vec<Color> {
    PAIRED.to_vec()
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
        }
    }
}

impl RenderConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: RenderConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded render config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.canvas.width > 0.0 && self.canvas.height > 0.0) {
            return Err(Error::Config(format!(
                "canvas must have positive size, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        if self.legend.columns == 0 {
            return Err(Error::Config("legend needs at least one column".into()));
        }
        if self.colors.palette.is_empty() {
            return Err(Error::Config("palette must contain at least one colour".into()));
        }
        Ok(())
    }
}
