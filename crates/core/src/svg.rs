//! SVG and HTML painting of a [`Scene`].
//!
//! Element ids, classes and `data-*` attributes match the published page so
//! that external checks can query tiles and legend entries.

use std::fmt::Write;

use crate::config::RenderConfig;
use crate::human::format_value;
use crate::scene::Scene;

pub fn render_treemap_svg(scene: &Scene) -> String {
    let mut svg = String::with_capacity(256 * scene.tiles.len());
    let _ = write!(
        svg,
        r#"<svg id="treemap" xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
        scene.size.width, scene.size.height
    );
    for tile in &scene.tiles {
        let _ = write!(
            svg,
            r#"<g transform="translate({},{})"><title>{}&#10;{}&#10;{}</title>"#,
            tile.rect.x0,
            tile.rect.y0,
            escape_xml(&tile.name),
            escape_xml(&tile.category),
            format_value(tile.value)
        );
        let _ = write!(
            svg,
            r#"<rect class="tile" fill="{}" fill-opacity="{}" data-name="{}" data-category="{}" data-value="{}" width="{}" height="{}"/>"#,
            tile.fill,
            tile.opacity,
            escape_xml(&tile.name),
            escape_xml(&tile.category),
            format_value(tile.value),
            tile.width(),
            tile.height()
        );
        svg.push_str(r#"<text class="tile-text">"#);
        for line in &tile.label {
            let _ = write!(
                svg,
                r#"<tspan x="{}" y="{}">{}</tspan>"#,
                line.x,
                line.y,
                escape_xml(&line.text)
            );
        }
        svg.push_str("</text></g>");
    }
    svg.push_str("</svg>");
    svg
}

pub fn render_legend_svg(scene: &Scene, config: &RenderConfig) -> String {
    let legend = &config.legend;
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg id="legend" xmlns="http://www.w3.org/2000/svg" width="{}" height="{}"><g id="legend-item-wrapper">"#,
        scene.legend_size.width, scene.legend_size.height
    );
    for item in &scene.legend {
        let _ = write!(
            svg,
            r#"<g><rect class="legend-item" x="{}" y="{}" width="{}" height="{}" fill="{}"/><text x="{}" y="{}" fill="{}" font-size="{}px">{}</text></g>"#,
            item.swatch.x0,
            item.swatch.y0,
            item.swatch.width(),
            item.swatch.height(),
            item.color,
            item.label_x,
            item.label_y,
            legend.label_color,
            legend.font_size,
            escape_xml(&item.name)
        );
    }
    svg.push_str("</g></svg>");
    svg
}

/// Self-contained page: title, description, treemap, legend and a hidden tooltip panel.
pub fn render_page(scene: &Scene, config: &RenderConfig) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
<style>\nbody {{ font-family: sans-serif; background: #1e1e1e; color: #fff; }}\n\
.tile-text {{ font-size: {font}px; fill: #000; pointer-events: none; }}\n\
#tooltip {{ position: absolute; display: none; padding: 6px; background: rgba(0,0,0,0.8); }}\n\
</style>\n</head>\n<body>\n<h1 id=\"title\">{title}</h1>\n<p id=\"description\">{description}</p>\n",
        title = escape_xml(&scene.title),
        description = escape_xml(&scene.description),
        font = config.tile.font_size,
    );
    let _ = writeln!(html, "<div id=\"graph\">{}</div>", render_treemap_svg(scene));
    let _ = writeln!(
        html,
        "<div id=\"graph-info\">{}</div>",
        render_legend_svg(scene, config)
    );
    html.push_str(
        "<div id=\"tooltip\" data-value=\"\"><div class=\"name\"></div><div class=\"category\"></div><div class=\"value\"></div></div>\n",
    );
    html.push_str("</body>\n</html>\n");
    html
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
