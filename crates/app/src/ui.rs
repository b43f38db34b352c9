use eframe::egui::{self, Color32, Pos2, Ui};
use egui_extras::{Column, TableBuilder};
use pledgemap_core::colors::Color;
use pledgemap_core::human::human_value;
use pledgemap_core::tooltip::{Point, TooltipState};
use pledgemap_core::treemap::Rect;

use crate::state::{AppState, Status};

pub fn draw(app: &mut AppState, ctx: &egui::Context) {
    poll_load(app, ctx);

    // Keep repainting while the dataset is in flight
    if app.load_rx.is_some() {
        ctx.request_repaint();
    }

    egui::TopBottomPanel::top("top").show(ctx, |ui| {
        top_bar(ui, app);
    });

    egui::TopBottomPanel::bottom("legend").resizable(false).show(ctx, |ui| {
        legend(ui, app);
    });

    egui::SidePanel::left("sidebar").resizable(true).default_width(300.0).show(ctx, |ui| {
        ui.heading("Categories");
        ui.separator();
        category_table(ui, app);
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        match &app.status {
            Status::Idle => {
                ui.label("No dataset loaded");
                return;
            }
            Status::Loading(source) => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(format!("Loading {source}…"));
                });
                return;
            }
            Status::Failed(message) => {
                ui.colored_label(Color32::LIGHT_RED, format!("Could not render treemap: {message}"));
                return;
            }
            Status::Ready => {}
        }
        egui::ScrollArea::both().show(ui, |ui| {
            treemap(ui, app);
        });
    });
}

fn poll_load(app: &mut AppState, ctx: &egui::Context) {
    if app.poll_load() {
        ctx.request_repaint();
    }
}

fn top_bar(ui: &mut Ui, app: &mut AppState) {
    ui.heading(&app.config.page.title);
    ui.label(&app.config.page.description);
    ui.horizontal(|ui| {
        let ready = app.scene.is_some();
        if ui.add_enabled(ready, egui::Button::new("Export page…")).clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("HTML", &["html"])
                .set_file_name("pledgemap.html")
                .save_file()
            {
                if let Err(e) = app.export_page(&path) {
                    tracing::error!(error = %e, "export failed");
                    app.status = Status::Failed(e.to_string());
                }
            }
        }
        if ui.button("Open dataset").clicked() {
            if let Err(e) = open::that(&app.config.page.url) {
                tracing::warn!(error = %e, "could not open dataset url");
            }
        }
        ui.separator();
        ui.label("Search:");
        if ui.text_edit_singleline(&mut app.search).changed() {
            app.update_search();
        }
        if !app.search.is_empty() {
            ui.label(format!("{} matches", app.matches.len()));
        }
        if let Some(scene) = &app.scene {
            ui.separator();
            ui.label(format!("Total pledged: {}", human_value(scene.total())));
        }
    });
}

fn treemap(ui: &mut Ui, app: &mut AppState) {
    let Some(scene) = &app.scene else { return };
    let font_size = app.config.tile.font_size as f32;
    let size = egui::vec2(scene.size.width as f32, scene.size.height as f32);
    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
    let origin = response.rect.min;

    for (i, tile) in scene.tiles.iter().enumerate() {
        let rect = to_screen(origin, &tile.rect);
        painter.rect_filled(rect, 0.0, color32(tile.fill, tile.opacity));
        for line in &tile.label {
            painter.text(
                rect.min + egui::vec2(line.x as f32, line.y as f32),
                egui::Align2::LEFT_BOTTOM,
                &line.text,
                egui::FontId::proportional(font_size),
                Color32::BLACK,
            );
        }
        if app.matches.contains(&i) {
            painter.rect_stroke(rect.shrink(1.0), 0.0, egui::Stroke::new(2.0, Color32::WHITE));
        }
    }

    let hovered = response.hover_pos().and_then(|pos| {
        let local = pos - origin;
        scene
            .hit_test(local.x as f64, local.y as f64)
            .map(|tile| (tile, Point::new(local.x as f64, local.y as f64)))
    });
    match hovered {
        Some((tile, pointer)) => app.session.tooltip_mut().show(tile, pointer),
        None => app.session.tooltip_mut().hide(),
    }

    if let TooltipState::Visible { content, position } = app.session.tooltip().state() {
        egui::Area::new(egui::Id::new("tile-tooltip"))
            .order(egui::Order::Tooltip)
            .interactable(false)
            .fixed_pos(origin + egui::vec2(position.x as f32, position.y as f32))
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.strong(&content.name);
                    ui.label(format!("Category: {}", content.category));
                    ui.label(format!("Value: {}", content.value));
                });
            });
    }
}

fn legend(ui: &mut Ui, app: &AppState) {
    let Some(scene) = &app.scene else { return };
    let legend = &app.config.legend;
    let size = egui::vec2(scene.legend_size.width as f32, scene.legend_size.height as f32);
    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
    let origin = response.rect.min;
    for item in &scene.legend {
        painter.rect_filled(to_screen(origin, &item.swatch), 0.0, color32(item.color, 1.0));
        painter.text(
            origin + egui::vec2(item.label_x as f32, item.label_y as f32),
            egui::Align2::LEFT_BOTTOM,
            &item.name,
            egui::FontId::proportional(legend.font_size as f32),
            color32(legend.label_color, 1.0),
        );
    }
}

fn category_table(ui: &mut Ui, app: &AppState) {
    let Some(scene) = &app.scene else {
        ui.label("Waiting for data");
        return;
    };
    let categories = scene.categories();
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::exact(18.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::auto())
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|_| {});
            header.col(|ui| {
                ui.strong("Category");
            });
            header.col(|ui| {
                ui.strong("Tiles");
            });
            header.col(|ui| {
                ui.strong("Pledged");
            });
        })
        .body(|mut body| {
            for category in &categories {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                        ui.painter().rect_filled(rect, 0.0, color32(category.color, 1.0));
                    });
                    row.col(|ui| {
                        ui.label(&category.name);
                    });
                    row.col(|ui| {
                        ui.label(category.tiles.to_string());
                    });
                    row.col(|ui| {
                        ui.label(human_value(category.total));
                    });
                });
            }
        });
}

fn to_screen(origin: Pos2, rect: &Rect) -> egui::Rect {
    egui::Rect::from_min_max(
        origin + egui::vec2(rect.x0 as f32, rect.y0 as f32),
        origin + egui::vec2(rect.x1 as f32, rect.y1 as f32),
    )
}

fn color32(color: Color, opacity: f64) -> Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, alpha)
}
