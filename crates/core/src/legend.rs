use serde::Serialize;

use crate::colors::{Color, ColorAssigner};
use crate::config::LegendConfig;
use crate::treemap::Rect;

/// One legend entry: swatch and label positioned in legend-canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendItem {
    pub name: String,
    pub color: Color,
    pub column: usize,
    pub row: usize,
    pub swatch: Rect,
    pub label_x: f64,
    pub label_y: f64,
}

/// `(column, row)` of the `index`-th entry in a row-major grid.
pub fn grid_position(index: usize, columns: usize) -> (usize, usize) {
    (index % columns, index / columns)
}

/// Places one entry per name, in the order given.
pub fn layout_legend(names: &[&str], colors: &ColorAssigner, config: &LegendConfig) -> Vec<LegendItem> {
    let columns = config.columns.max(1);
    let items: Vec<LegendItem> = names
        .iter()
        .enumerate()
        .map(|(i, &name)| {
            let (column, row) = grid_position(i, columns);
            let x = config.origin_x + column as f64 * config.column_width;
            let y = config.origin_y + row as f64 * config.row_height;
            LegendItem {
                name: name.to_string(),
                color: colors.color_for(name),
                column,
                row,
                swatch: Rect::new(x, y, x + config.swatch_width, y + config.swatch_height),
                label_x: x + config.label_dx,
                label_y: y + config.label_dy,
            }
        })
        .collect();

    if let Some(last) = items.last() {
        if last.swatch.y1 > config.height {
            tracing::warn!(
                entries = items.len(),
                needed = last.swatch.y1,
                height = config.height,
                "legend rows overflow the legend canvas"
            );
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEVEN: [&str; 7] = ["a", "b", "c", "d", "e", "f", "g"];

    #[test]
    fn test_grid_positions_for_seven_entries() {
        assert_eq!(grid_position(3, 3), (0, 1));
        assert_eq!(grid_position(5, 3), (2, 1));
        assert_eq!(grid_position(6, 3), (0, 2));
    }

    #[test]
    fn test_layout_places_cells() {
        let items = layout_legend(&SEVEN, &ColorAssigner::new(), &LegendConfig::default());
        assert_eq!(items.len(), 7);
        assert_eq!((items[3].column, items[3].row), (0, 1));
        assert_eq!((items[5].column, items[5].row), (2, 1));
        assert_eq!(items[5].swatch, Rect::new(300.0, 55.0, 315.0, 70.0));
        assert_eq!((items[5].label_x, items[5].label_y), (325.0, 69.0));
    }

    #[test]
    fn test_layout_uses_shared_colors() {
        let colors = ColorAssigner::new();
        let pre = colors.color_for("c");
        let items = layout_legend(&SEVEN, &colors, &LegendConfig::default());
        assert_eq!(items[2].color, pre);
        assert_eq!(items[0].color, colors.color_for("a"));
    }
}
