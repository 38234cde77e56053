//! Responsive video embeds.

use super::Markup;
use crate::utils::html::escape_attr;

/// Privacy-enhanced YouTube embed host.
pub const YOUTUBE_EMBED_BASE: &str = "https://www.youtube-nocookie.com/embed/";

/// Microsoft Stream embed host.
pub const STREAM_EMBED_BASE: &str = "https://msit.microsoftstream.com/embed/video/";

/// Fixed player options for Stream embeds, already escaped for an attribute.
pub const STREAM_EMBED_QUERY: &str = "?autoplay=false&amp;showinfo=false";

/// 16:9 box the iframe fills.
const RATIO_BOX: &str =
    "<div style='position: relative; padding-bottom: 56.25%; height: 0; overflow: hidden;'>";

const FILL_STYLE: &str = "border:none; position: absolute; top: 0; left: 0; right: 0; bottom: 0; height: 100%; width: 100%;";

/// Embed a YouTube video in a 16:9 box.
pub fn youtube(embed_code: &str) -> Markup {
    Markup::raw(format!(
        concat!(
            r#"<div class="video-embed">{ratio}"#,
            r#"<iframe width="560" height="315" src="{base}{code}" frameborder="0" "#,
            r#"allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture" "#,
            r#"allowfullscreen style="{fill}"></iframe></div></div>"#
        ),
        ratio = RATIO_BOX,
        base = YOUTUBE_EMBED_BASE,
        code = escape_attr(embed_code),
        fill = FILL_STYLE,
    ))
}

/// Embed a Microsoft Stream video in the same box, with a 640x360 player.
pub fn stream(embed_code: &str) -> Markup {
    Markup::raw(format!(
        concat!(
            r#"<div class="video-embed">{ratio}"#,
            r#"<iframe width="640" height="360" src="{base}{code}{query}" "#,
            r#"allowfullscreen style="{fill}"></iframe></div></div>"#
        ),
        ratio = RATIO_BOX,
        base = STREAM_EMBED_BASE,
        code = escape_attr(embed_code),
        query = STREAM_EMBED_QUERY,
        fill = FILL_STYLE,
    ))
}
