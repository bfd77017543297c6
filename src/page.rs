// src/page.rs
//! Full HTML document: the controls plus the three output regions.
//!
//! Controls live in one GET form, so every change (and the reload button)
//! comes back as a request that re-runs the board.

use crate::board::ViewState;
use crate::escape::escape;
use crate::filter::ALL_CATEGORIES;
use crate::render::Regions;
use crate::sort::SortKey;

const SORT_OPTIONS: [(&str, &str); 3] = [("score", "Score"), ("title", "Titel"), ("niche", "Nische")];

const STYLE: &str = r#"
body{font-family:system-ui,sans-serif;margin:0;background:#0f1115;color:#e8e8e8}
header,main{max-width:1100px;margin:0 auto;padding:16px}
form{display:flex;gap:8px;flex-wrap:wrap;align-items:center}
input,select,button{padding:6px 10px;border-radius:8px;border:1px solid #333;background:#181b22;color:inherit}
#list{display:grid;grid-template-columns:repeat(auto-fill,minmax(300px,1fr));gap:12px}
.item{background:#181b22;border:1px solid #262a33;border-radius:12px;padding:12px}
.row{display:flex;gap:6px;flex-wrap:wrap;align-items:center}
.badge,.pill{display:inline-block;padding:2px 8px;border-radius:999px;font-size:12px;background:#262a33}
.badge{background:#1d3b2a}
.pill.score{background:#3b2a1d}
.muted{color:#9aa0aa;font-size:13px;margin:6px 0}
.links a{display:block;color:#7fb3ff;font-size:13px;margin-top:4px}
#meta{color:#9aa0aa;font-size:13px}
"#;

/// Render the document for `view` with the board's current regions.
pub fn render_page(categories: &[String], view: &ViewState, regions: &Regions) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="de">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Trend Board</title>
<style>{style}</style>
</head>
<body>
<header>
  <h1>Trend Board</h1>
  <form method="get" action="/">
    <select id="niche" name="niche" onchange="this.form.submit()">{category_options}</select>
    <input id="q" name="q" type="search" placeholder="Suche…" value="{query}" oninput="clearTimeout(this.t);this.t=setTimeout(()=>this.form.submit(),300)">
    <select id="sort" name="sort" onchange="this.form.submit()">{sort_options}</select>
    <button id="reload" type="submit">Neu laden</button>
  </form>
  <div id="srcs" class="row">{badges}</div>
  <div id="meta">{status}</div>
</header>
<main>
  <section id="list">{items}</section>
</main>
</body>
</html>
"#,
        style = STYLE,
        category_options = category_options(categories, &view.category),
        query = escape(&view.query),
        sort_options = sort_options(&view.sort),
        badges = regions.badges_html,
        status = escape(&regions.status),
        items = regions.items_html,
    )
}

fn category_options(categories: &[String], selected: &str) -> String {
    let mut out = option(ALL_CATEGORIES, "Alle Nischen", selected == ALL_CATEGORIES);
    for c in categories {
        out.push_str(&option(c, c, c == selected));
    }
    // Keep a selection that is not in the configured list visible.
    if selected != ALL_CATEGORIES && !categories.iter().any(|c| c == selected) {
        out.push_str(&option(selected, selected, true));
    }
    out
}

fn sort_options(selected: &SortKey) -> String {
    SORT_OPTIONS
        .iter()
        .map(|(value, label)| option(value, label, *value == selected.as_str()))
        .collect()
}

fn option(value: &str, label: &str, selected: bool) -> String {
    format!(
        r#"<option value="{}"{}>{}</option>"#,
        escape(value),
        if selected { " selected" } else { "" },
        escape(label)
    )
}
