// Advanced & Technical checks that only need the document

use super::{CheckContext, found, item};
use crate::markup::{escape_html, labeled, para, pre};
use crate::report::{CheckStatus, ReportItem};
use seo_audit_scanner::Document;
use tracing::debug;

pub fn js_type(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    const ID: &str = "js-type";

    let legacy = document.count(r#"script[type="text/javascript"]"#);
    if legacy == 0 {
        item(ID, CheckStatus::Ok, found(ID, 0), para("No script declares the legacy text/javascript type."))
    } else {
        item(
            ID,
            CheckStatus::Warning,
            found(ID, legacy),
            para(&format!(
                "{} script(s) declare type=\"text/javascript\". The attribute is redundant in HTML5 and can be removed.",
                legacy
            )),
        )
    }
}

/// One `<script type="application/ld+json">` block.
#[derive(Debug)]
pub enum JsonLdBlock {
    Valid(serde_json::Value),
    Invalid { raw: String, error: String },
}

pub fn extract_json_ld(document: &Document) -> Vec<JsonLdBlock> {
    document
        .select(r#"script[type="application/ld+json"]"#)
        .into_iter()
        .map(|script| {
            let raw: String = script.text().collect();
            match serde_json::from_str(raw.trim()) {
                Ok(value) => JsonLdBlock::Valid(value),
                Err(e) => {
                    debug!("Invalid JSON-LD block: {}", e);
                    JsonLdBlock::Invalid {
                        raw: raw.trim().to_string(),
                        error: e.to_string(),
                    }
                }
            }
        })
        .collect()
}

fn schema_type(value: &serde_json::Value) -> Option<String> {
    match value.get("@type")? {
        serde_json::Value::String(t) => Some(t.clone()),
        serde_json::Value::Array(types) => Some(
            types
                .iter()
                .filter_map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        ),
        _ => None,
    }
}

pub fn json_ld(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    const ID: &str = "json-ld";

    let blocks = extract_json_ld(document);
    if blocks.is_empty() {
        return item(
            ID,
            CheckStatus::Warning,
            found(ID, 0),
            para("No JSON-LD structured data found."),
        );
    }

    let mut details = String::new();
    let mut invalid = 0;
    for (idx, block) in blocks.iter().enumerate() {
        match block {
            JsonLdBlock::Valid(value) => {
                let heading = match schema_type(value) {
                    Some(t) => format!("Block {}: {}", idx + 1, t),
                    None => format!("Block {}", idx + 1),
                };
                details.push_str(&format!("<p><strong>{}</strong></p>", escape_html(&heading)));
                let pretty =
                    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
                details.push_str(&pre(&pretty));
            }
            JsonLdBlock::Invalid { raw, error } => {
                invalid += 1;
                details.push_str(&format!(
                    "<p><strong>Block {}: Invalid JSON-LD</strong></p>",
                    idx + 1
                ));
                details.push_str(&labeled("Parse error", error));
                details.push_str(&pre(raw));
            }
        }
    }

    let status = if invalid > 0 {
        CheckStatus::Error
    } else {
        CheckStatus::Ok
    };
    let mut extra = found(ID, blocks.len());
    if invalid > 0 {
        extra.push_str(&format!(" ({} invalid)", invalid));
    }

    item(ID, status, extra, details)
}

fn add(name: &'static str, detected: &mut Vec<&'static str>) {
    if !detected.contains(&name) {
        detected.push(name);
    }
}

/// Named signature probes, run in order. React is skipped once Next.js matched.
pub fn detect_technologies(document: &Document, raw_html: &str) -> Vec<&'static str> {
    let mut detected: Vec<&'static str> = Vec::new();

    let wordpress = document
        .first_attr(r#"meta[name="generator"]"#, "content")
        .is_some_and(|g| g.to_ascii_lowercase().contains("wordpress"))
        || raw_html.contains("wp-content");
    if wordpress {
        add("WordPress", &mut detected);
    }

    let next = document.exists("#__next") || document.exists("script#__NEXT_DATA__");
    if next {
        add("Next.js", &mut detected);
    }

    let react = document.exists("[data-reactroot]")
        || document
            .select("script[src]")
            .into_iter()
            .filter_map(|s| s.value().attr("src"))
            .any(|src| src.to_ascii_lowercase().contains("react"));
    if react && !next {
        add("React", &mut detected);
    }

    if document.exists("[ng-version]") {
        add("Angular", &mut detected);
    }

    if document.exists("[data-n-head]") || document.exists("#__nuxt") {
        add("Nuxt.js", &mut detected);
    }

    let jquery = document
        .select("script[src]")
        .into_iter()
        .filter_map(|s| s.value().attr("src"))
        .any(|src| src.to_ascii_lowercase().contains("jquery"));
    if jquery {
        add("jQuery", &mut detected);
    }

    let bootstrap = document
        .select(r#"link[rel~="stylesheet"][href]"#)
        .into_iter()
        .filter_map(|l| l.value().attr("href"))
        .any(|href| href.to_ascii_lowercase().contains("bootstrap"));
    if bootstrap {
        add("Bootstrap", &mut detected);
    }

    detected
}

pub fn technologies(document: &Document, ctx: &CheckContext<'_>) -> ReportItem {
    const ID: &str = "technologies";

    let detected = detect_technologies(document, ctx.raw_html);
    if detected.is_empty() {
        item(ID, CheckStatus::Info, found(ID, 0), para("No known technologies detected."))
    } else {
        item(
            ID,
            CheckStatus::Info,
            found(ID, detected.len()),
            crate::markup::list(&detected),
        )
    }
}
