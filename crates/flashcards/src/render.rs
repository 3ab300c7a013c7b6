//! Server-side rendering of the card page.
//!
//! The page carries the deck twice: as markup, one card per record keyed by
//! `data-page-id`, and as JSON in `#initial-state` for the inline script.
//! The script keeps its own copy of the sequence, flips a record on each
//! checkbox change and posts the whole array to the mutation endpoint
//! without waiting for or reading the reply.

use crate::card::Deck;
use crate::error::Result;
use crate::mutation::PAGES_ENDPOINT;

const PAGE_TITLE: &str = "フラッシュカード";
const KNOWN_LABEL: &str = "わかった";

const STYLE: &str = "\
.card-container{display:flex;flex-wrap:wrap;gap:1rem;padding:1rem;font-family:sans-serif}\
.card{border:1px solid #ccc;border-radius:8px;padding:1rem;min-width:10rem}\
.card label{display:flex;flex-direction:column;gap:.5rem;cursor:pointer}\
.card .name{font-size:1.5rem}";

const SCRIPT: &str = r#"(() => {
  let state = JSON.parse(document.getElementById('initial-state').textContent);
  document.querySelectorAll('.card input[type=checkbox]').forEach((input) => {
    input.addEventListener('change', () => {
      const id = input.closest('.card').dataset.pageId;
      state = state.map((item) =>
        item.page_id === id
          ? { name: item.name, checkbox: !item.checkbox, page_id: item.page_id }
          : item
      );
      fetch(ENDPOINT, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(state),
      });
    });
  });
})();"#;

/// Render the full HTML document for `deck`.
///
/// # Errors
///
/// Returns an error if the deck cannot be serialized.
pub fn render_page(deck: &Deck) -> Result<String> {
    let state = embed_json(&serde_json::to_string(&deck.to_records())?);

    let mut html = String::with_capacity(1024 + deck.len() * 160);
    html.push_str("<!doctype html><html lang=\"ja\"><head><meta charset=\"utf-8\">");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
    html.push_str(&format!(
        "<title>{PAGE_TITLE}</title><style>{STYLE}</style></head><body>"
    ));
    html.push_str(&render_cards(deck));
    html.push_str(&format!(
        "<script type=\"application/json\" id=\"initial-state\">{state}</script>"
    ));
    html.push_str(&format!(
        "<script>{}</script></body></html>",
        SCRIPT.replace("ENDPOINT", &format!("'{PAGES_ENDPOINT}'"))
    ));
    Ok(html)
}

/// Render the card list, one `div.card` per record in deck order.
#[must_use]
pub fn render_cards(deck: &Deck) -> String {
    let mut html = String::from("<main class=\"card-container\">");
    for card in deck.iter() {
        html.push_str(&format!(
            "<div class=\"card\" data-page-id=\"{id}\"><label><div class=\"name\">{name}</div>\
<input type=\"checkbox\"{checked}>{KNOWN_LABEL}</label></div>",
            id = escape_html(&card.id),
            name = escape_html(&card.name),
            checked = if card.known { " checked" } else { "" },
        ));
    }
    html.push_str("</main>");
    html
}

/// An error page for a failed render.
#[must_use]
pub fn render_error_page(message: &str) -> String {
    format!(
        "<!doctype html><html lang=\"ja\"><head><meta charset=\"utf-8\"><title>{PAGE_TITLE}</title></head>\
<body><h1>500</h1><p>{}</p></body></html>",
        escape_html(message)
    )
}

/// Escape text for use in element content and quoted attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Make JSON safe to place inside a `<script>` element.
fn embed_json(json: &str) -> String {
    json.replace('<', "\\u003c")
}
