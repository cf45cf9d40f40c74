// Queryable HTML document built on scraper's html5ever tree

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// Parsed page markup.
///
/// Not `Send`: parse it, query it, and drop it before the next `.await`.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse raw HTML text. Returns `None` when there is nothing to parse.
    pub fn parse(text: &str) -> Option<Self> {
        if text.trim().is_empty() {
            return None;
        }
        Some(Self {
            html: Html::parse_document(text),
        })
    }

    /// All elements matching a CSS selector, in document order.
    pub fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        match compile_selector(css) {
            Some(selector) => self.html.select(&selector).collect(),
            None => Vec::new(),
        }
    }

    pub fn count(&self, css: &str) -> usize {
        match compile_selector(css) {
            Some(selector) => self.html.select(&selector).count(),
            None => 0,
        }
    }

    pub fn exists(&self, css: &str) -> bool {
        self.first(css).is_some()
    }

    pub fn first(&self, css: &str) -> Option<ElementRef<'_>> {
        let selector = compile_selector(css)?;
        self.html.select(&selector).next()
    }

    /// Value of `attr` on the first element matching `css`.
    pub fn first_attr(&self, css: &str, attr: &str) -> Option<String> {
        self.first(css)
            .and_then(|el| el.value().attr(attr))
            .map(|v| v.to_string())
    }

    /// Normalized text content of every element matching `css`.
    pub fn texts(&self, css: &str) -> Vec<String> {
        self.select(css).into_iter().map(element_text).collect()
    }

    /// Text of the document's `<title>`, whitespace-normalized. Titles inside
    /// foreign content such as inline SVG do not count.
    pub fn title(&self) -> Option<String> {
        self.select("title")
            .into_iter()
            .find(|el| &*el.value().name.ns == HTML_NAMESPACE)
            .map(element_text)
    }

    /// Visible text inside `<body>`, skipping script-like containers.
    /// Block elements are padded with spaces; inline markup joins directly.
    pub fn body_text(&self) -> String {
        let mut out = String::new();
        if let Some(body) = self.first("body") {
            collect_text(body, &mut out);
        }
        out
    }
}

/// Element text with runs of whitespace collapsed to single spaces.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(|chunk| chunk.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

fn is_hidden(name: &str) -> bool {
    matches!(name, "script" | "style" | "noscript" | "template")
}

fn is_block(name: &str) -> bool {
    matches!(
        name,
        "address" | "article" | "aside" | "blockquote" | "br" | "caption" | "dd" | "details"
            | "div" | "dl" | "dt" | "fieldset" | "figcaption" | "figure" | "footer" | "form"
            | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "header" | "hr" | "li" | "main"
            | "nav" | "ol" | "p" | "pre" | "section" | "summary" | "table" | "tbody" | "td"
            | "tfoot" | "th" | "thead" | "tr" | "ul"
    )
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }
        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };
        let name = child.value().name();
        if is_hidden(name) {
            continue;
        }
        let block = is_block(name);
        if block {
            out.push(' ');
        }
        collect_text(child, out);
        if block {
            out.push(' ');
        }
    }
}

fn compile_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!("Invalid selector '{}': {:?}", css, e);
            None
        }
    }
}
