pub mod colors;
pub mod config;
pub mod error;
pub mod export;
pub mod hierarchy;
pub mod human;
pub mod label;
pub mod legend;
pub mod loader;
pub mod logging;
pub mod model;
pub mod scene;
pub mod search;
pub mod session;
pub mod svg;
pub mod tooltip;
pub mod treemap;

pub use config::RenderConfig;
pub use error::{Error, Result};
pub use model::*;
pub use session::{RenderSession, Rendered};
