// Details markup helpers and flattening for plain-text exports

use regex::Regex;
use std::sync::LazyLock;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));

static BLOCK_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</p>|<br\s*/?>|</li>|</pre>|</h[1-6]>|</div>").expect("block end pattern")
});

static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<li(?:\s[^>]*)?>").expect("list item pattern"));

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Inverse of [`escape_html`]. `&amp;` goes last so `&amp;lt;` stays `&lt;`.
pub fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

pub fn para(text: &str) -> String {
    format!("<p>{}</p>", escape_html(text))
}

/// `<p>` with a bold label followed by an escaped value.
pub fn labeled(label: &str, value: &str) -> String {
    format!(
        "<p><strong>{}:</strong> {}</p>",
        escape_html(label),
        escape_html(value)
    )
}

pub fn list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::from("<ul>");
    for item in items {
        out.push_str("<li>");
        out.push_str(&escape_html(item.as_ref()));
        out.push_str("</li>");
    }
    out.push_str("</ul>");
    out
}

pub fn pre(text: &str) -> String {
    format!("<pre>{}</pre>", escape_html(text))
}

/// Single-line text for CSV cells: tags become spaces, entities are decoded,
/// whitespace runs collapse to one space.
pub fn html_to_plain_text(html: &str) -> String {
    let stripped = TAG.replace_all(html, " ");
    decode_entities(&stripped)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Line-oriented text for terminal output. Block ends break lines, list items
/// get a bullet and blank lines are dropped.
pub fn html_to_lines(html: &str) -> Vec<String> {
    let broken = BLOCK_END.replace_all(html, "\n");
    let bulleted = LIST_ITEM.replace_all(&broken, "\n• ");
    let stripped = TAG.replace_all(&bulleted, "");

    decode_entities(&stripped)
        .lines()
        .map(|line| line.trim_end().to_string())
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// Quote a CSV field when it holds a comma, quote or line break.
pub fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
