// Content & Keywords checks

use super::{CheckContext, found, item, label};
use crate::markup::{labeled, list, para};
use crate::report::{CheckStatus, ReportItem};
use regex::Regex;
use seo_audit_scanner::Document;
use std::collections::HashMap;
use std::sync::LazyLock;

pub const TOP_KEYWORD_LIMIT: usize = 10;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-z]{3,}\b").expect("keyword pattern"));

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "day", "get", "has", "him", "his", "how", "man", "new", "now", "old",
    "see", "two", "way", "who", "boy", "did", "its", "let", "put", "say", "she", "too", "use",
    "that", "with", "have", "this", "will", "your", "from", "they", "know", "want", "been",
    "good", "much", "some", "time", "very", "when", "come", "here", "just", "like", "long",
    "make", "many", "more", "only", "over", "such", "take", "than", "them", "well", "were",
    "what", "where", "which", "while", "would", "there", "their", "these", "those", "about",
    "after", "again", "also", "into", "then", "each", "other", "because", "could", "should",
    "being", "both", "does", "doing", "down", "during", "few", "further", "most", "nor", "own",
    "same", "through", "under", "until", "why", "yours", "ours", "theirs", "himself", "herself",
    "itself", "myself", "yourself", "themselves", "ourselves", "above", "below", "before",
    "between", "off", "once", "against", "may", "might", "must", "shall", "upon", "via",
];

/// Most frequent words of three or more letters, stop words excluded.
/// Ties keep the order in which words were first met.
pub fn top_keywords(text: &str, limit: usize) -> Vec<(String, usize)> {
    let lowered = text.to_lowercase();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for word in WORD.find_iter(&lowered).map(|m| m.as_str()) {
        if STOP_WORDS.contains(&word) {
            continue;
        }
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|word| (word.to_string(), counts[word]))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

pub fn top_keywords_check(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    const ID: &str = "top-keywords";

    let keywords = top_keywords(&document.body_text(), TOP_KEYWORD_LIMIT);
    if keywords.is_empty() {
        return item(ID, CheckStatus::Info, found(ID, 0), para("No keywords found in the page body."));
    }

    item(
        ID,
        CheckStatus::Info,
        format!("Top {} keywords", keywords.len()),
        list(keywords.iter().map(|(word, count)| format!("{}: {}", word, count))),
    )
}

fn headings(document: &Document, level: u8) -> ReportItem {
    let id = format!("h{}", level);
    let texts = document.texts(&id);
    let count = texts.len();

    let status = match (level, count) {
        (1, 0) => CheckStatus::Error,
        (1, 1) => CheckStatus::Ok,
        (1, _) => CheckStatus::Warning,
        _ => CheckStatus::Info,
    };

    let mut details = list(
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| format!("#{}: {} ({} chars)", i + 1, text, text.chars().count())),
    );
    match status {
        CheckStatus::Error => details = para("No H1 heading found. Every page should have exactly one."),
        CheckStatus::Warning => details.push_str(&para("Multiple H1 headings found. Use exactly one.")),
        _ => {}
    }
    details.push_str(&labeled("Total", &count.to_string()));

    ReportItem::new(id.as_str(), label(&id), status, found(&id, count), details)
}

pub fn h1(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    headings(document, 1)
}

pub fn h2(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    headings(document, 2)
}

pub fn h3(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    headings(document, 3)
}

pub fn h4(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    headings(document, 4)
}

pub fn h5(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    headings(document, 5)
}

pub fn h6(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    headings(document, 6)
}

fn element_count(document: &Document, id: &str, css: &str, noun: &str) -> ReportItem {
    let count = document.count(css);
    item(
        id,
        CheckStatus::Info,
        found(id, count),
        labeled(noun, &count.to_string()),
    )
}

pub fn paragraphs(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    element_count(document, "paragraphs", "p", "Paragraphs")
}

pub fn spans(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    element_count(document, "spans", "span", "Spans")
}

pub fn ul_li_list(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    const ID: &str = "ul-li-list";

    let lists = document.count("ul");
    let items = document.count("ul > li");
    item(
        ID,
        CheckStatus::Info,
        found(ID, lists),
        format!(
            "{}{}",
            labeled("Lists", &lists.to_string()),
            labeled("List items", &items.to_string())
        ),
    )
}

pub fn image_alt(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    const ID: &str = "image-alt";

    let images = document.select("img");
    let total = images.len();
    let missing: Vec<String> = images
        .into_iter()
        .filter(|img| img.value().attr("alt").is_none_or(|alt| alt.trim().is_empty()))
        .map(|img| {
            let value = img.value();
            value
                .attr("src")
                .or_else(|| value.attr("data-src"))
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "(no src)".to_string())
        })
        .collect();

    let extra = format!("Images missing ALT: {} of {}", missing.len(), total);
    if missing.is_empty() {
        let details = if total == 0 {
            para("No images on the page.")
        } else {
            para("Every image has alternative text.")
        };
        item(ID, CheckStatus::Ok, extra, details)
    } else {
        item(ID, CheckStatus::Warning, extra, list(&missing))
    }
}
