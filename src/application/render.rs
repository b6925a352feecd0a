//! HTML page rendering
//!
//! Pages are plain string builders; every interpolated value is escaped.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use itertools::Itertools;

use crate::domain::{BoardList, Game, GameList};

/// Wrap a body fragment into a complete HTML document.
pub fn html_page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{}</title>
</head>
<body>
  {}
</body>
</html>
"#,
        text(title),
        body
    )
}

/// Link target and label of one catalog page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub url: String,
    pub name: String,
}

/// Index body: one section per category label, sorted, pages in input order.
pub fn index_html<'a, I>(categories: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a [PageLink])>,
{
    let mut html = String::new();
    for (label, pages) in categories.into_iter().sorted_by_key(|(label, _)| *label) {
        html.push_str(&format!("<section><header>{}</header><div>", text(label)));
        for page in pages {
            html.push_str(&format!(
                r#"<a href="{}" target="_blank">{}</a><br/>"#,
                attr(&page.url),
                text(&page.name)
            ));
        }
        html.push_str("</div></section>");
    }
    html
}

fn section_header(html: &mut String, name: &str, revision: &str, total: usize) {
    html.push_str(&format!(
        "<section><header>{}<span>{}</span></header>",
        text(name),
        text(revision)
    ));
    html.push_str(&format!("<div>Total: {}</div>", total));
}

pub fn board_list_html(list: &BoardList) -> String {
    let mut html = String::new();
    section_header(&mut html, &list.name, &list.revision, list.boards.len());
    html.push_str("<table><thead><tr><th>Name</th></tr></thead><tbody>");
    for board in &list.boards {
        html.push_str(&format!("<tr><td>{}</td></tr>", text(&board.name)));
    }
    html.push_str("</tbody></table></section>");
    html
}

/// Game list body; `game_url` maps a game to its page URL.
pub fn game_list_html<F>(list: &GameList, game_url: F) -> String
where
    F: Fn(&Game) -> String,
{
    let mut html = String::new();
    section_header(&mut html, &list.name, &list.revision, list.games.len());
    html.push_str(
        "<table><thead><tr><th>Name</th><th>Region</th><th>Revision</th><th>Board</th><th>Size</th></tr></thead><tbody>",
    );
    for game in &list.games {
        html.push_str(&format!(
            r#"<tr><td><a href="{}" target="_blank">{}</a></td><td><code>{}</code></td><td><code>{}</code></td><td><code>{}</code></td><td><code>{:#x}</code></td></tr>"#,
            attr(&game_url(game)),
            text(&game.name),
            text(&game.region),
            text(&game.revision),
            text(&game.board),
            game.rom_size()
        ));
    }
    html.push_str("</tbody></table></section>");
    html
}

/// Detail page body for a single game.
pub fn game_html(game: &Game) -> String {
    let mut html = String::new();
    html.push_str(&format!("<section><header>{}</header>", text(&game.name)));
    html.push_str("<table><tbody>");
    for (label, value) in [
        ("Region", game.region.as_str()),
        ("Revision", game.revision.as_str()),
        ("Board", game.board.as_str()),
        ("SHA256", game.sha256.as_str()),
    ] {
        html.push_str(&format!(
            "<tr><th>{}</th><td><code>{}</code></td></tr>",
            label,
            text(value)
        ));
    }
    html.push_str("</tbody></table>");
    html.push_str(
        "<table><thead><tr><th>Type</th><th>Size</th><th>Content</th></tr></thead><tbody>",
    );
    for memory in &game.memory {
        html.push_str(&format!(
            "<tr><td>{}</td><td><code>{}</code></td><td>{}</td></tr>",
            text(&memory.kind),
            text(&memory.display_size()),
            text(&memory.content)
        ));
    }
    html.push_str("</tbody></table></section>");
    html
}
