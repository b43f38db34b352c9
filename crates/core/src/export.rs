use crate::error::{Error, Result};
use crate::human::format_value;
use crate::scene::Scene;

pub fn to_csv(scene: &Scene, mut w: impl std::io::Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(&mut w);
    writer.write_record([
        "name", "category", "top_level", "value", "x0", "y0", "x1", "y1", "width", "height", "fill",
    ])?;
    for t in &scene.tiles {
        writer.write_record([
            t.name.clone(),
            t.category.clone(),
            t.top_level.clone(),
            format_value(t.value),
            t.rect.x0.to_string(),
            t.rect.y0.to_string(),
            t.rect.x1.to_string(),
            t.rect.y1.to_string(),
            t.width().to_string(),
            t.height().to_string(),
            t.fill.to_hex(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_json(scene: &Scene) -> serde_json::Value {
    serde_json::json!({
        "title": scene.title,
        "description": scene.description,
        "generated_at": chrono::Local::now().to_rfc3339(),
        "width": scene.size.width,
        "height": scene.size.height,
        "total": scene.total(),
        "tiles": scene.tiles.iter().map(|t| serde_json::json!({
            "name": t.name,
            "category": t.category,
            "top_level": t.top_level,
            "value": t.value,
            "x0": t.rect.x0,
            "y0": t.rect.y0,
            "x1": t.rect.x1,
            "y1": t.rect.y1,
            "width": t.width(),
            "height": t.height(),
            "fill": t.fill,
        })).collect::<Vec<_>>(),
        "legend": scene.legend.iter().map(|l| serde_json::json!({
            "name": l.name,
            "color": l.color,
            "column": l.column,
            "row": l.row,
        })).collect::<Vec<_>>(),
    })
}

/// One-page PDF with the treemap on top and the legend below it.
pub fn to_pdf(scene: &Scene, out: &std::path::Path) -> Result<()> {
    use printpdf::{BuiltinFont, Mm, PdfDocument, Rgb};

    const PX_TO_MM: f64 = 25.4 / 96.0;
    const MARGIN_MM: f64 = 10.0;
    let pdf_err = |e: printpdf::Error| Error::Export(e.to_string());
    let fill = |c: crate::colors::Color| {
        printpdf::Color::Rgb(Rgb::new(
            c.r as f32 / 255.0,
            c.g as f32 / 255.0,
            c.b as f32 / 255.0,
            None,
        ))
    };

    let header_mm = 20.0;
    let page_w = scene.size.width.max(scene.legend_size.width) * PX_TO_MM + 2.0 * MARGIN_MM;
    let page_h = (scene.size.height + scene.legend_size.height) * PX_TO_MM + 2.0 * MARGIN_MM + header_mm;

    let (doc, page1, layer1) = PdfDocument::new(&scene.title, Mm(page_w as f32), Mm(page_h as f32), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;

    // PDF y grows upwards; flip surface coordinates against the page top.
    let top = page_h - MARGIN_MM - header_mm;
    let x_at = |px: f64| Mm((MARGIN_MM + px * PX_TO_MM) as f32);
    let y_at = |px: f64| Mm((top - px * PX_TO_MM) as f32);

    let black = fill(crate::colors::Color::rgb(0, 0, 0));
    layer.set_fill_color(black.clone());
    layer.use_text(
        scene.title.as_str(),
        14.0,
        Mm(MARGIN_MM as f32),
        Mm((page_h - MARGIN_MM - 6.0) as f32),
        &font,
    );
    layer.use_text(
        format!("{} (generated {})", scene.description, chrono::Local::now().format("%Y-%m-%d %H:%M")),
        8.0,
        Mm(MARGIN_MM as f32),
        Mm((page_h - MARGIN_MM - 12.0) as f32),
        &font,
    );

    for t in &scene.tiles {
        layer.set_fill_color(fill(t.fill));
        layer.add_rect(printpdf::Rect::new(
            x_at(t.rect.x0),
            y_at(t.rect.y1),
            x_at(t.rect.x1),
            y_at(t.rect.y0),
        ));
        layer.set_fill_color(black.clone());
        for line in &t.label {
            layer.use_text(
                line.text.as_str(),
                5.0,
                x_at(t.rect.x0 + line.x),
                y_at(t.rect.y0 + line.y),
                &font,
            );
        }
    }

    let legend_top = scene.size.height;
    for item in &scene.legend {
        layer.set_fill_color(fill(item.color));
        layer.add_rect(printpdf::Rect::new(
            x_at(item.swatch.x0),
            y_at(legend_top + item.swatch.y1),
            x_at(item.swatch.x1),
            y_at(legend_top + item.swatch.y0),
        ));
        layer.set_fill_color(black.clone());
        layer.use_text(
            item.name.as_str(),
            8.0,
            x_at(item.label_x),
            y_at(legend_top + item.label_y),
            &font,
        );
    }

    let file = std::fs::File::create(out)?;
    let mut buf = std::io::BufWriter::new(file);
    doc.save(&mut buf).map_err(pdf_err)?;
    tracing::info!(path = %out.display(), tiles = scene.tiles.len(), "wrote pdf");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::model::RawNode;
    use crate::session::RenderSession;

    fn scene() -> Scene {
        let session = RenderSession::new(RenderConfig::default()).unwrap();
        let raw = RawNode::branch(
            "root",
            vec![
                RawNode::branch("Games", vec![RawNode::leaf("Ouya", "Video Games", 8596474.0)]),
                RawNode::branch("Film", vec![RawNode::leaf("Veronica Mars", "Film", 5702153.0)]),
            ],
        );
        session.render(&raw).unwrap().scene
    }

    #[test]
    fn test_csv_has_row_per_tile() {
        let mut out = Vec::new();
        to_csv(&scene(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("name,category,top_level,value"));
        assert!(text.contains("Ouya,Video Games,Games,8596474,"));
    }

    #[test]
    fn test_json_lists_tiles_and_legend() {
        let json = to_json(&scene());
        assert_eq!(json["tiles"].as_array().unwrap().len(), 2);
        assert_eq!(json["legend"][0]["name"], "Games");
        assert_eq!(json["tiles"][0]["fill"], "#a6cee3");
        assert_eq!(json["width"], 960.0);
    }

    #[test]
    fn test_pdf_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("treemap.pdf");
        to_pdf(&scene(), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
