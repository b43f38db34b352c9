use std::path::Path;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver};
use pledgemap_core::loader::{LoadMsg, Loader, Source};
use pledgemap_core::scene::Scene;
use pledgemap_core::search::search_tiles;
use pledgemap_core::svg::render_page;
use pledgemap_core::{RenderConfig, RenderSession};

pub enum Status {
    Idle,
    Loading(String),
    Ready,
    Failed(String),
}

pub struct AppState {
    pub config: RenderConfig,
    pub session: RenderSession,
    pub load_rx: Option<Receiver<LoadMsg>>,
    pub scene: Option<Scene>,
    pub status: Status,
    pub search: String,
    pub matches: Vec<usize>,
}

impl AppState {
    pub fn new(config: RenderConfig) -> anyhow::Result<Self> {
        let session = RenderSession::new(config.clone())?;
        Ok(Self {
            config,
            session,
            load_rx: None,
            scene: None,
            status: Status::Idle,
            search: String::new(),
            matches: Vec::new(),
        })
    }

    /// Kicks off the single dataset load for this session.
    pub fn start_load(&mut self) {
        let (tx, rx) = unbounded();
        self.load_rx = Some(rx);
        let source = Source::Url(self.config.page.url.clone());
        self.status = Status::Loading(source.to_string());
        Loader::new()
            .timeout(self.config.page.request_timeout_secs.map(Duration::from_secs))
            .spawn(source, tx);
    }

    /// Drains loader messages. Returns true if anything arrived.
    pub fn poll_load(&mut self) -> bool {
        // Take the receiver so the match arms can assign to self.
        let Some(rx) = self.load_rx.take() else {
            return false;
        };
        let mut had_msg = false;
        let mut finished = false;
        while let Ok(msg) = rx.try_recv() {
            had_msg = true;
            match msg {
                LoadMsg::Started { source } => self.status = Status::Loading(source),
                LoadMsg::Done(raw) => {
                    match self.session.render(&raw) {
                        Ok(rendered) => {
                            self.scene = Some(rendered.scene);
                            self.status = Status::Ready;
                            self.update_search();
                        }
                        Err(e) => self.status = Status::Failed(e.to_string()),
                    }
                    finished = true;
                    break;
                }
                LoadMsg::Failed(e) => {
                    self.status = Status::Failed(e.to_string());
                    finished = true;
                    break;
                }
            }
        }
        if !finished {
            self.load_rx = Some(rx);
        }
        had_msg
    }

    pub fn update_search(&mut self) {
        self.matches = match &self.scene {
            Some(scene) => search_tiles(scene, &self.search),
            None => Vec::new(),
        };
    }

    pub fn export_page(&self, path: &Path) -> anyhow::Result<()> {
        let Some(scene) = &self.scene else {
            anyhow::bail!("nothing rendered yet");
        };
        std::fs::write(path, render_page(scene, &self.config))?;
        tracing::info!(path = %path.display(), "exported page");
        Ok(())
    }
}
