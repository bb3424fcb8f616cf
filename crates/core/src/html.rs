//! Small HTML helpers used by the grid, form, and datatables renderers.

use std::fmt::Write;

/// Escape text for safe inclusion in HTML element content or attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build a URL from a path and query parameters, URL-encoding every value.
///
/// Parameters are emitted in the order given. An empty parameter list
/// returns the bare path.
pub fn url_with_query(path: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let mut url = String::from(path);
    url.push(if path.contains('?') { '&' } else { '?' });
    for (i, (name, value)) in params.iter().enumerate() {
        if i > 0 {
            url.push('&');
        }
        let _ = write!(
            url,
            "{}={}",
            urlencoding::encode(name),
            urlencoding::encode(value)
        );
    }
    url
}

/// Render a Bulma-styled button link with a Font Awesome icon.
///
/// When `include_text` is set the label is rendered next to the icon;
/// otherwise it only appears as the link title.
pub fn icon_button(url: &str, text: &str, icon: &str, size: &str, include_text: bool) -> String {
    let url = escape(url);
    let text = escape(text);
    if include_text {
        format!(
            r#"<a href="{url}" class="button is-{size}" title="{text}"><span class="icon is-{size}"><i class="fas {icon}"></i></span><span>{text}</span></a>"#
        )
    } else {
        format!(
            r#"<a href="{url}" class="button is-{size}" title="{text}"><i class="fas {icon}"></i></a>"#
        )
    }
}

/// Turn a field name into an upper-case heading (`primary_city` -> `PRIMARY CITY`).
pub fn heading_text(name: &str) -> String {
    name.replace('_', " ").to_uppercase()
}
