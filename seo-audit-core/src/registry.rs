// Static table of audit checks. Table order is evaluation order and display order.

use serde::Serialize;

pub const META_AND_HEAD: &str = "Meta & Head";
pub const CONTENT_AND_KEYWORDS: &str = "Content & Keywords";
pub const LINKS: &str = "Links";
pub const ADVANCED_AND_TECHNICAL: &str = "Advanced & Technical";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuditCheck {
    pub id: &'static str,
    pub label: &'static str,
    pub category: &'static str,
}

const fn check(id: &'static str, label: &'static str, category: &'static str) -> AuditCheck {
    AuditCheck {
        id,
        label,
        category,
    }
}

pub const AUDIT_CHECKS: &[AuditCheck] = &[
    // Meta & Head
    check("header-status", "Header Status", META_AND_HEAD),
    check("meta-charset", "Meta Charset", META_AND_HEAD),
    check("html-lang", "HTML Lang", META_AND_HEAD),
    check("meta-viewport", "Meta Viewport", META_AND_HEAD),
    check("favicon-link", "Favicon Link", META_AND_HEAD),
    check("preconnect-google-fonts", "Preconnect Google Fonts", META_AND_HEAD),
    check("shortlink-link", "Shortlink Link", META_AND_HEAD),
    check("edituri-link", "EditURI Link", META_AND_HEAD),
    check("api-link", "API Link", META_AND_HEAD),
    check("hreflang-link", "Hreflang Link", META_AND_HEAD),
    check("rss-link", "RSS Link", META_AND_HEAD),
    check("empty-meta-tags", "Empty Meta Tags", META_AND_HEAD),
    check("meta-title", "Meta Title Tag", META_AND_HEAD),
    check("meta-description", "Meta Description", META_AND_HEAD),
    check("canonical-tag", "Canonical Tag", META_AND_HEAD),
    check("opengraph-meta", "OpenGraph Meta", META_AND_HEAD),
    check("robots-meta", "Robots Meta Tag", META_AND_HEAD),
    // Content & Keywords
    check("top-keywords", "Top Keywords", CONTENT_AND_KEYWORDS),
    check("h1", "H1 Headings", CONTENT_AND_KEYWORDS),
    check("h2", "H2 Headings", CONTENT_AND_KEYWORDS),
    check("h3", "H3 Headings", CONTENT_AND_KEYWORDS),
    check("h4", "H4 Headings", CONTENT_AND_KEYWORDS),
    check("h5", "H5 Headings", CONTENT_AND_KEYWORDS),
    check("h6", "H6 Headings", CONTENT_AND_KEYWORDS),
    check("paragraphs", "Paragraphs", CONTENT_AND_KEYWORDS),
    check("spans", "Spans", CONTENT_AND_KEYWORDS),
    check("ul-li-list", "Unordered UL/LI List", CONTENT_AND_KEYWORDS),
    check("image-alt", "Image ALT Attributes", CONTENT_AND_KEYWORDS),
    // Links
    check("link-profile", "Link Profile", LINKS),
    check("internal-links", "Internal Links", LINKS),
    check("external-links", "External Links", LINKS),
    check("http-links", "HTTP Links", LINKS),
    check("broken-links", "Broken Links", LINKS),
    // Advanced & Technical
    check("js-type", "JavaScript Type", ADVANCED_AND_TECHNICAL),
    check("json-ld", "JSON-LD Schema Markup", ADVANCED_AND_TECHNICAL),
    check("technologies", "Technologies Detected", ADVANCED_AND_TECHNICAL),
    check("pagespeed-score", "Google PageSpeed Score", ADVANCED_AND_TECHNICAL),
    check("sitemap-check", "XML Sitemap Index and URLs", ADVANCED_AND_TECHNICAL),
    check("robots-txt-check", "robots.txt Check", ADVANCED_AND_TECHNICAL),
];

pub const ROBOTS_TXT_CHECK: &str = "robots-txt-check";
pub const SITEMAP_CHECK: &str = "sitemap-check";
pub const BROKEN_LINKS_CHECK: &str = "broken-links";
pub const PAGESPEED_CHECK: &str = "pagespeed-score";

/// Checks that run after the document batch, always in this order.
pub const DEFERRED_CHECKS: &[&str] = &[
    ROBOTS_TXT_CHECK,
    SITEMAP_CHECK,
    BROKEN_LINKS_CHECK,
    PAGESPEED_CHECK,
];

pub fn find(id: &str) -> Option<&'static AuditCheck> {
    AUDIT_CHECKS.iter().find(|c| c.id == id)
}

pub fn is_deferred(id: &str) -> bool {
    DEFERRED_CHECKS.contains(&id)
}

pub fn all_ids() -> Vec<&'static str> {
    AUDIT_CHECKS.iter().map(|c| c.id).collect()
}

/// Categories in first-appearance order.
pub fn categories() -> Vec<&'static str> {
    let mut categories: Vec<&'static str> = Vec::new();
    for check in AUDIT_CHECKS {
        if !categories.contains(&check.category) {
            categories.push(check.category);
        }
    }
    categories
}

/// Checks grouped under their category, both in table order.
pub fn grouped() -> Vec<(&'static str, Vec<&'static AuditCheck>)> {
    categories()
        .into_iter()
        .map(|category| {
            let checks = AUDIT_CHECKS
                .iter()
                .filter(|c| c.category == category)
                .collect();
            (category, checks)
        })
        .collect()
}
