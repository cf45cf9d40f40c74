// Hyperlink extraction and broken-link probing

use crate::document::Document;
use crate::fetcher::ProxyFetcher;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkScope {
    /// Same hostname as the audited page
    Internal,
    External,
}

#[derive(Debug, Clone, Serialize)]
pub struct BrokenLink {
    pub url: String,
    pub scope: LinkScope,
    /// HTTP status, or `None` when the probe failed at the network level
    pub status: Option<u16>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LinkProbeReport {
    pub checked: usize,
    pub broken: Vec<BrokenLink>,
}

impl LinkProbeReport {
    pub fn internal(&self) -> impl Iterator<Item = &BrokenLink> {
        self.broken.iter().filter(|l| l.scope == LinkScope::Internal)
    }

    pub fn external(&self) -> impl Iterator<Item = &BrokenLink> {
        self.broken.iter().filter(|l| l.scope == LinkScope::External)
    }
}

/// Resolve an href against the page URL, dropping non-navigational schemes
/// and the fragment. Only http(s) targets survive.
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    let lowered = href.to_ascii_lowercase();
    if href.is_empty()
        || href.starts_with('#')
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("javascript:")
    {
        return None;
    }

    let mut resolved = base.join(href).ok()?;
    resolved.set_fragment(None);

    match resolved.scheme() {
        "http" | "https" => Some(resolved),
        _ => None,
    }
}

pub fn link_scope(link: &Url, page: &Url) -> LinkScope {
    if link.host_str() == page.host_str() {
        LinkScope::Internal
    } else {
        LinkScope::External
    }
}

/// Every unique resolvable `<a href>` target on the page, in first-seen order.
pub fn extract_probe_urls(document: &Document, page_url: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for anchor in document.select("a[href]") {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if let Some(resolved) = resolve_link(page_url, href) {
            let resolved = resolved.to_string();
            if seen.insert(resolved.clone()) {
                urls.push(resolved);
            }
        }
    }

    debug!("Extracted {} unique links from {}", urls.len(), page_url);
    urls
}

/// HEAD-probe every URL, at most `max_concurrent` in flight. A status of 400
/// or above, or a transport failure, marks the link broken. Broken links are
/// reported in the order they were given.
pub async fn probe_links(
    fetcher: &ProxyFetcher,
    urls: Vec<String>,
    page_url: &Url,
    max_concurrent: usize,
) -> LinkProbeReport {
    let checked = urls.len();
    info!("Probing {} links ({} at a time)", checked, max_concurrent.max(1));

    let outcomes: Vec<_> = stream::iter(urls.into_iter().map(|url| async move {
        let outcome = fetcher.head(&url).await;
        (url, outcome)
    }))
    .buffered(max_concurrent.max(1))
    .collect()
    .await;

    let mut broken = Vec::new();
    for (url, outcome) in outcomes {
        let (status, reason) = match outcome {
            Ok(response) if response.status >= 400 => (
                Some(response.status),
                format!("HTTP {} {}", response.status, response.status_text)
                    .trim_end()
                    .to_string(),
            ),
            Ok(_) => continue,
            Err(e) => (None, e.to_string()),
        };

        let scope = Url::parse(&url)
            .map(|parsed| link_scope(&parsed, page_url))
            .unwrap_or(LinkScope::External);

        debug!("Broken link {} ({})", url, reason);
        broken.push(BrokenLink {
            url,
            scope,
            status,
            reason,
        });
    }

    LinkProbeReport { checked, broken }
}
