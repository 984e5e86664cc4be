//! The index page served at `/`.

/// Page template. `{{ mapbox_token }}` is replaced at startup.
pub const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

const TOKEN_PLACEHOLDER: &str = "{{ mapbox_token }}";

/// Render `template` with the map token filled in.
pub fn render_index(template: &str, mapbox_token: &str) -> String {
    template.replace(TOKEN_PLACEHOLDER, &escape_html(mapbox_token))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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
