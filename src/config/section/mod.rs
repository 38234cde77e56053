//! Configuration sections of `inkpot.toml`.

mod dirs;
mod front_matter;
mod markdown;
mod passthrough;
mod plugins;
mod site;

pub use dirs::DirsConfig;
pub use front_matter::FrontMatterConfig;
pub use markdown::{AnchorConfig, AnchorLevel, MarkdownConfig};
pub use passthrough::{PassthroughConfig, PassthroughEntry};
pub use plugins::{FeedConfig, HighlightConfig, PluginsConfig};
pub use site::SiteInfoConfig;
