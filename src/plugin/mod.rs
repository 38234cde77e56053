//! Bundled plugins.
//!
//! | Plugin             | Registers                                            |
//! |--------------------|------------------------------------------------------|
//! | `feed`             | `absoluteUrl`, `dateToRfc2822`, `dateToRfc3339`, RSS |
//! | `syntax-highlight` | code block highlighter                               |

pub mod feed;
pub mod highlight;

pub use feed::FeedPlugin;
pub use highlight::SyntaxHighlightPlugin;
