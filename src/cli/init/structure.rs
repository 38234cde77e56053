//! Starter content for a new site.

use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Directories every new site starts with.
const SITE_DIRS: &[&str] = &["_includes", "posts", "assets"];

/// `(relative path, contents)` of the starter files.
const STARTER_FILES: &[(&str, &str)] = &[
    ("_includes/base.html", BASE_LAYOUT),
    ("index.md", INDEX_PAGE),
    ("posts/hello.md", HELLO_POST),
    ("assets/style.css", STYLE),
];

const BASE_LAYOUT: &str = r#"<!doctype html>
<html lang="{{ site.language }}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} | {{ site.title }}</title>
  <link rel="stylesheet" href="/assets/style.css">
  <link rel="alternate" type="application/rss+xml" href="{{ "/feed.xml" | absoluteUrl }}">
</head>
<body>
  <main>
{{ content | safe }}
  </main>
</body>
</html>
"#;

const INDEX_PAGE: &str = r#"---
title: Home
layout: base.html
---
# {{ site.title }}

Welcome to your new site. Posts live in `posts/`.
"#;

const HELLO_POST: &str = r#"---
title: Hello, world
date: 2024-01-01
tags: posts
layout: base.html
---
# Hello, world

Published {{ page.date | readableDate }}.

{% note "Edit posts/hello.md to get started." %}
"#;

const STYLE: &str = "body {\n  max-width: 42rem;\n  margin: 2rem auto;\n  font-family: system-ui, sans-serif;\n}\n\naside.note {\n  padding: 0.5rem 1rem;\n  border-left: 4px solid;\n}\n\n.note-title {\n  font-weight: bold;\n}\n";

/// Create directories and starter files under `root`.
///
/// Existing files are left untouched.
pub fn create_structure(root: &Path) -> Result<()> {
    for dir in SITE_DIRS {
        let path = root.join(dir);
        fs::create_dir_all(&path)
            .with_context(|| format!("failed to create directory '{}'", path.display()))?;
    }

    for (rel, content) in STARTER_FILES {
        write_if_missing(&root.join(rel), content)?;
    }
    Ok(())
}

pub(super) fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    fs::write(path, content).with_context(|| format!("failed to write '{}'", path.display()))
}
