use crate::colors::ColorAssigner;
use crate::config::RenderConfig;
use crate::error::Result;
use crate::hierarchy::HierarchyBuilder;
use crate::model::{Hierarchy, RawNode};
use crate::scene::Scene;
use crate::tooltip::TooltipController;
use crate::treemap::{Layout, TreemapLayout};

/// Everything derived from one dataset in one session.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub hierarchy: Hierarchy,
    pub layout: Layout,
    pub scene: Scene,
}

/// Owns the per-session services: the colour memo and the tooltip.
///
/// Build one per loaded dataset; `render` runs hierarchy → layout → scene
/// synchronously and stops at the first error.
#[derive(Debug)]
pub struct RenderSession {
    config: RenderConfig,
    colors: ColorAssigner,
    tooltip: TooltipController,
}

impl RenderSession {
    pub fn new(config: RenderConfig) -> Result<Self> {
        config.validate()?;
        let colors = ColorAssigner::with_palette(config.colors.palette.clone())?;
        let tooltip = TooltipController::new(config.tooltip);
        Ok(Self {
            config,
            colors,
            tooltip,
        })
    }

    pub fn render(&self, raw: &RawNode) -> Result<Rendered> {
        let hierarchy = HierarchyBuilder::new().build(raw)?;
        hierarchy.validate()?;
        let layout = TreemapLayout::new(self.config.canvas.layout_size()).compute(&hierarchy)?;
        let scene = Scene::compose(&hierarchy, &layout, &self.colors, &self.config);
        tracing::info!(
            tiles = scene.tiles.len(),
            categories = scene.legend.len(),
            total = hierarchy.root().value,
            "rendered treemap"
        );
        Ok(Rendered {
            hierarchy,
            layout,
            scene,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn colors(&self) -> &ColorAssigner {
        &self.colors
    }

    pub fn tooltip(&self) -> &TooltipController {
        &self.tooltip
    }

    pub fn tooltip_mut(&mut self) -> &mut TooltipController {
        &mut self.tooltip
    }
}
