// Links checks: profile, internal/external listings, insecure links

use super::{CheckContext, found, item};
use crate::markup::{labeled, list, para};
use crate::report::{CheckStatus, ReportItem};
use seo_audit_scanner::Document;
use seo_audit_scanner::links::{LinkScope, link_scope, resolve_link};
use std::collections::HashSet;

/// Anchors on the page, resolved against the page URL.
struct LinkSummary {
    anchors: usize,
    nofollow: usize,
    internal: Vec<String>,
    external: Vec<String>,
    internal_total: usize,
    external_total: usize,
}

fn summarize(document: &Document, ctx: &CheckContext<'_>) -> LinkSummary {
    let mut summary = LinkSummary {
        anchors: 0,
        nofollow: 0,
        internal: Vec::new(),
        external: Vec::new(),
        internal_total: 0,
        external_total: 0,
    };
    let mut seen = HashSet::new();

    for anchor in document.select("a[href]") {
        summary.anchors += 1;
        let value = anchor.value();
        if value
            .attr("rel")
            .is_some_and(|rel| rel.to_ascii_lowercase().split_whitespace().any(|t| t == "nofollow"))
        {
            summary.nofollow += 1;
        }

        let Some(resolved) = value.attr("href").and_then(|h| resolve_link(ctx.page_url, h)) else {
            continue;
        };
        let scope = link_scope(&resolved, ctx.page_url);
        let is_new = seen.insert(resolved.to_string());
        match scope {
            LinkScope::Internal => {
                summary.internal_total += 1;
                if is_new {
                    summary.internal.push(resolved.to_string());
                }
            }
            LinkScope::External => {
                summary.external_total += 1;
                if is_new {
                    summary.external.push(resolved.to_string());
                }
            }
        }
    }

    summary
}

pub fn link_profile(document: &Document, ctx: &CheckContext<'_>) -> ReportItem {
    const ID: &str = "link-profile";

    let summary = summarize(document, ctx);
    let details = [
        labeled("Total links", &summary.anchors.to_string()),
        labeled("Internal links", &summary.internal_total.to_string()),
        labeled("External links", &summary.external_total.to_string()),
        labeled("Nofollow links", &summary.nofollow.to_string()),
        labeled(
            "Unique URLs",
            &(summary.internal.len() + summary.external.len()).to_string(),
        ),
    ]
    .concat();

    item(ID, CheckStatus::Info, found(ID, summary.anchors), details)
}

pub fn internal_links(document: &Document, ctx: &CheckContext<'_>) -> ReportItem {
    const ID: &str = "internal-links";

    let summary = summarize(document, ctx);
    let details = if summary.internal.is_empty() {
        para("No internal links found.")
    } else {
        list(&summary.internal)
    };
    item(ID, CheckStatus::Info, found(ID, summary.internal.len()), details)
}

pub fn external_links(document: &Document, ctx: &CheckContext<'_>) -> ReportItem {
    const ID: &str = "external-links";

    let summary = summarize(document, ctx);
    let details = if summary.external.is_empty() {
        para("No external links found.")
    } else {
        list(&summary.external)
    };
    item(ID, CheckStatus::Info, found(ID, summary.external.len()), details)
}

pub fn http_links(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    const ID: &str = "http-links";

    let insecure: Vec<String> = document
        .select("a[href]")
        .into_iter()
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| href.get(..7).is_some_and(|p| p.eq_ignore_ascii_case("http://")))
        .map(|href| href.to_string())
        .collect();

    if insecure.is_empty() {
        item(ID, CheckStatus::Ok, found(ID, 0), para("No insecure HTTP links found."))
    } else {
        item(ID, CheckStatus::Warning, found(ID, insecure.len()), list(&insecure))
    }
}
