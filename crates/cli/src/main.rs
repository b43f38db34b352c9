use anyhow::{bail, Context};
use clap::Parser;
use pledgemap_core::export;
use pledgemap_core::human::human_value;
use pledgemap_core::loader::{LoadMsg, Loader, Source};
use pledgemap_core::search::search_tiles;
use pledgemap_core::svg;
use pledgemap_core::{RenderConfig, RenderSession};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "pledgemap", about = "Kickstarter pledge treemap renderer")]
struct Args {
    /// Dataset URL (defaults to the configured URL)
    #[arg(long, conflicts_with = "input")]
    url: Option<String>,
    /// Read the dataset from a local JSON file instead of fetching it
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// TOML render configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Treemap canvas width in pixels
    #[arg(long)]
    width: Option<f64>,
    /// Treemap canvas height in pixels
    #[arg(long)]
    height: Option<f64>,
    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
    /// Output treemap SVG path
    #[arg(long)]
    svg: Option<PathBuf>,
    /// Output legend SVG path
    #[arg(long)]
    legend_svg: Option<PathBuf>,
    /// Output HTML page path
    #[arg(long)]
    html: Option<PathBuf>,
    /// Output JSON tile report path
    #[arg(short, long)]
    json: Option<PathBuf>,
    /// Output CSV tile table path
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Output PDF path
    #[arg(long)]
    pdf: Option<PathBuf>,
    /// List tiles whose name fuzzy-matches this text
    #[arg(long)]
    find: Option<String>,
    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    pledgemap_core::logging::init(if args.verbose { "pledgemap=debug" } else { "pledgemap=info" });

    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => RenderConfig::default(),
    };
    if let Some(w) = args.width {
        config.canvas.width = w;
    }
    if let Some(h) = args.height {
        config.canvas.height = h;
    }
    if let Some(url) = &args.url {
        config.page.url = url.clone();
    }
    if let Some(secs) = args.timeout {
        config.page.request_timeout_secs = Some(secs);
    }
    let session = RenderSession::new(config.clone())?;

    let source = match &args.input {
        Some(path) => Source::File(path.clone()),
        None => Source::Url(config.page.url.clone()),
    };
    let (tx, rx) = crossbeam_channel::unbounded::<LoadMsg>();
    let loader = Loader::new().timeout(config.page.request_timeout_secs.map(Duration::from_secs));
    let handle = loader.spawn(source, tx);

    let mut raw = None;
    while let Ok(msg) = rx.recv() {
        match msg {
            LoadMsg::Started { source } => tracing::info!(%source, "loading dataset"),
            LoadMsg::Done(data) => {
                raw = Some(data);
                break;
            }
            LoadMsg::Failed(e) => return Err(e).context("dataset load failed"),
        }
    }
    let _ = handle.join();
    let Some(raw) = raw else {
        bail!("loader exited without a result");
    };

    let rendered = session.render(&raw)?;
    let scene = &rendered.scene;

    if let Some(path) = &args.svg {
        std::fs::write(path, svg::render_treemap_svg(scene))
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &args.legend_svg {
        std::fs::write(path, svg::render_legend_svg(scene, &config))
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &args.html {
        std::fs::write(path, svg::render_page(scene, &config))
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &args.json {
        let json = export::to_json(scene);
        std::fs::write(path, serde_json::to_string_pretty(&json)?)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &args.csv {
        let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
        export::to_csv(scene, file)?;
    }
    if let Some(path) = &args.pdf {
        export::to_pdf(scene, path)?;
    }

    if let Some(needle) = &args.find {
        for i in search_tiles(scene, needle) {
            let t = &scene.tiles[i];
            println!("{}\t{}\t{}", t.name, t.category, human_value(t.value));
        }
    }

    println!(
        "Rendered {} tiles in {} categories, total {}",
        scene.tiles.len(),
        scene.legend.len(),
        human_value(scene.total())
    );
    Ok(())
}
