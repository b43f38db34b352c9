//! End-to-end checks from dataset file to painted surfaces.

use std::path::PathBuf;

use pledgemap_core::legend::grid_position;
use pledgemap_core::loader::{Loader, Source};
use pledgemap_core::svg::{render_legend_svg, render_page, render_treemap_svg};
use pledgemap_core::tooltip::{Point, TooltipState};
use pledgemap_core::{RawNode, RenderConfig, RenderSession};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/kickstarter-sample.json")
}

fn load_fixture() -> RawNode {
    Loader::new().load(&Source::File(fixture())).unwrap()
}

#[test]
fn sample_dataset_renders_every_leaf() {
    let session = RenderSession::new(RenderConfig::default()).unwrap();
    let rendered = session.render(&load_fixture()).unwrap();
    let scene = &rendered.scene;

    assert_eq!(scene.tiles.len(), 12);
    assert_eq!(scene.legend.len(), 7);
    let total: f64 = scene.tiles.iter().map(|t| t.value).sum();
    assert_eq!(rendered.hierarchy.root().value, total);

    // Tiles fill the 960x570 canvas with no overlap.
    let covered: f64 = scene.tiles.iter().map(|t| t.rect.area()).sum();
    assert!((covered - 960.0 * 570.0).abs() <= 960.0 + 570.0);
    for (i, a) in scene.tiles.iter().enumerate() {
        for b in &scene.tiles[i + 1..] {
            assert_eq!(a.rect.intersection_area(&b.rect), 0.0, "{} / {}", a.name, b.name);
        }
    }
}

#[test]
fn legend_follows_dataset_order_and_grid() {
    let session = RenderSession::new(RenderConfig::default()).unwrap();
    let scene = session.render(&load_fixture()).unwrap().scene;

    let names: Vec<&str> = scene.legend.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Product Design",
            "Tabletop Games",
            "Video Games",
            "Film & Video",
            "Technology",
            "Hardware",
            "Food"
        ]
    );
    assert_eq!((scene.legend[3].column, scene.legend[3].row), (0, 1));
    assert_eq!((scene.legend[5].column, scene.legend[5].row), (2, 1));
    assert_eq!(grid_position(3, 3), (0, 1));

    for item in &scene.legend {
        let tile = scene.tiles.iter().find(|t| t.top_level == item.name).unwrap();
        assert_eq!(tile.fill, item.color, "{}", item.name);
    }
}

#[test]
fn food_example_tiles_square_canvas() {
    let mut config = RenderConfig::default();
    config.canvas.width = 100.0;
    config.canvas.height = 100.0;
    let session = RenderSession::new(config).unwrap();
    let raw: RawNode = serde_json::from_str(
        r#"{"name":"root","children":[{"name":"Food","children":[
            {"name":"A","category":"Food","value":30},
            {"name":"B","category":"Food","value":70}
        ]}]}"#,
    )
    .unwrap();
    let scene = session.render(&raw).unwrap().scene;
    let a = scene.tiles.iter().find(|t| t.name == "A").unwrap();
    let b = scene.tiles.iter().find(|t| t.name == "B").unwrap();
    assert_eq!(a.rect.area(), 3000.0);
    assert_eq!(b.rect.area(), 7000.0);
    assert_eq!(a.rect.intersection_area(&b.rect), 0.0);
}

#[test]
fn tooltip_show_hide_cycle() {
    let mut session = RenderSession::new(RenderConfig::default()).unwrap();
    let scene = session.render(&load_fixture()).unwrap().scene;
    let tile = scene.hit_test(10.0, 20.0).unwrap().clone();

    session.tooltip_mut().show(&tile, Point::new(10.0, 20.0));
    match session.tooltip().state() {
        TooltipState::Visible { content, position } => {
            assert_eq!(content.name, tile.name);
            assert_eq!(*position, Point::new(20.0, 30.0));
        }
        TooltipState::Hidden => panic!("tooltip should be visible"),
    }

    session.tooltip_mut().hide();
    session.tooltip_mut().show(&tile, Point::new(12.0, 22.0));
    session.tooltip_mut().hide();
    session.tooltip_mut().hide();
    assert!(!session.tooltip().is_visible());
}

#[test]
fn painted_page_exposes_every_tile() {
    let config = RenderConfig::default();
    let session = RenderSession::new(config.clone()).unwrap();
    let scene = session.render(&load_fixture()).unwrap().scene;

    let treemap = render_treemap_svg(&scene);
    assert_eq!(treemap.matches("class=\"tile\"").count(), 12);
    assert!(treemap.contains("data-value=\"20338986\""));

    let legend = render_legend_svg(&scene, &config);
    assert_eq!(legend.matches("class=\"legend-item\"").count(), 7);
    assert!(legend.contains("Film &amp; Video"));

    let page = render_page(&scene, &config);
    assert!(page.contains("Top 100 Most Pledged Kickstarter Campaigns Grouped By Category"));
}
