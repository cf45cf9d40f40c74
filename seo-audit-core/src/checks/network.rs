// Items for checks that depend on further fetches: robots.txt, sitemaps,
// broken links, plus the PageSpeed placeholder

use super::{found, item};
use crate::markup::{escape_html, labeled, list, para, pre};
use crate::registry::{BROKEN_LINKS_CHECK, PAGESPEED_CHECK, ROBOTS_TXT_CHECK, SITEMAP_CHECK};
use crate::report::{CheckStatus, ReportItem};
use seo_audit_scanner::{BrokenLink, LinkProbeReport, RobotsTxt, SitemapFetch};

pub fn robots_item(robots: &RobotsTxt) -> ReportItem {
    match &robots.content {
        Some(content) => item(
            ROBOTS_TXT_CHECK,
            CheckStatus::Ok,
            "robots.txt found",
            format!("{}{}", labeled("URL", &robots.url), pre(content)),
        ),
        None => item(
            ROBOTS_TXT_CHECK,
            CheckStatus::Warning,
            "robots.txt not found",
            format!(
                "{}{}",
                labeled("URL", &robots.url),
                labeled(
                    "Error",
                    robots.error.as_deref().unwrap_or("robots.txt could not be fetched")
                )
            ),
        ),
    }
}

/// `robots` is the already-fetched robots.txt; `sitemaps` the fetch outcome
/// for each URL it declares.
pub fn sitemap_item(robots: &RobotsTxt, sitemaps: &[SitemapFetch]) -> ReportItem {
    let Some(declared) = robots.sitemap_urls() else {
        return item(
            SITEMAP_CHECK,
            CheckStatus::Warning,
            "Unknown: robots.txt unavailable",
            para("Sitemaps are discovered through robots.txt, which could not be fetched."),
        );
    };

    if declared.is_empty() {
        return item(
            SITEMAP_CHECK,
            CheckStatus::Warning,
            "Sitemap not found",
            para("robots.txt declares no Sitemap: lines."),
        );
    }

    let mut details = String::new();
    let mut failed = 0;
    for sitemap in sitemaps {
        details.push_str(&format!(
            "<p><strong>{}</strong></p>",
            escape_html(&sitemap.url)
        ));
        match &sitemap.content {
            Some(content) => {
                let kind = if sitemap.is_index {
                    "Sitemap index"
                } else {
                    "URL set"
                };
                details.push_str(&labeled("Type", kind));
                details.push_str(&labeled("Entries", &sitemap.loc_count.to_string()));
                details.push_str(&pre(content));
            }
            None => {
                failed += 1;
                details.push_str(&labeled(
                    "Error",
                    sitemap.error.as_deref().unwrap_or("could not be fetched"),
                ));
            }
        }
    }

    let status = if failed == 0 {
        CheckStatus::Ok
    } else if failed < sitemaps.len() {
        CheckStatus::Warning
    } else {
        CheckStatus::Error
    };

    let mut extra = found(SITEMAP_CHECK, sitemaps.len());
    if failed > 0 {
        extra.push_str(&format!(" ({} unreachable)", failed));
    }
    item(SITEMAP_CHECK, status, extra, details)
}

fn broken_line(link: &BrokenLink) -> String {
    match link.status {
        Some(status) => format!("{} {}", status, link.url),
        None => format!("ERR {} ({})", link.url, link.reason),
    }
}

pub fn broken_links_item(report: &LinkProbeReport) -> ReportItem {
    if report.broken.is_empty() {
        return item(
            BROKEN_LINKS_CHECK,
            CheckStatus::Ok,
            format!("No broken links ({} checked)", report.checked),
            para(&format!("All {} unique links responded.", report.checked)),
        );
    }

    let internal: Vec<String> = report.internal().map(broken_line).collect();
    let external: Vec<String> = report.external().map(broken_line).collect();

    let mut details = labeled("Internal broken links", &internal.len().to_string());
    if !internal.is_empty() {
        details.push_str(&list(&internal));
    }
    details.push_str(&labeled("External broken links", &external.len().to_string()));
    if !external.is_empty() {
        details.push_str(&list(&external));
    }

    item(
        BROKEN_LINKS_CHECK,
        CheckStatus::Error,
        format!(
            "{} broken of {} checked ({} internal, {} external)",
            report.broken.len(),
            report.checked,
            internal.len(),
            external.len()
        ),
        details,
    )
}

pub fn pagespeed_item() -> ReportItem {
    item(
        PAGESPEED_CHECK,
        CheckStatus::Info,
        "Coming Soon",
        para("Google PageSpeed scoring is coming soon."),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use seo_audit_scanner::LinkScope;

    fn robots(content: Option<&str>) -> RobotsTxt {
        RobotsTxt {
            url: "https://example.com/robots.txt".to_string(),
            content: content.map(|c| c.to_string()),
            error: content.is_none().then(|| "HTTP 404".to_string()),
        }
    }

    #[test]
    fn test_robots_item_states() {
        let present = robots_item(&robots(Some("User-agent: *")));
        assert_eq!(present.status, CheckStatus::Ok);
        assert!(present.details.contains("User-agent: *"));

        let missing = robots_item(&robots(None));
        assert_eq!(missing.status, CheckStatus::Warning);
        assert_eq!(missing.extra_info, "robots.txt not found");
    }

    #[test]
    fn test_sitemap_unknown_and_not_found() {
        let unknown = sitemap_item(&robots(None), &[]);
        assert!(unknown.extra_info.starts_with("Unknown"));

        let none = sitemap_item(&robots(Some("User-agent: *")), &[]);
        assert_eq!(none.extra_info, "Sitemap not found");
    }

    #[test]
    fn test_sitemap_partial_failure_is_warning() {
        let sitemaps = vec![
            SitemapFetch {
                url: "https://example.com/a.xml".to_string(),
                content: Some("<urlset><url><loc>x</loc></url></urlset>".to_string()),
                error: None,
                is_index: false,
                loc_count: 1,
            },
            SitemapFetch {
                url: "https://example.com/b.xml".to_string(),
                content: None,
                error: Some("HTTP 500".to_string()),
                is_index: false,
                loc_count: 0,
            },
        ];
        let item = sitemap_item(
            &robots(Some("Sitemap: https://example.com/a.xml\nSitemap: https://example.com/b.xml")),
            &sitemaps,
        );
        assert_eq!(item.status, CheckStatus::Warning);
        assert!(item.details.contains("&lt;urlset&gt;"));
        assert!(item.details.contains("HTTP 500"));
    }

    #[test]
    fn test_broken_links_partitioned() {
        let report = LinkProbeReport {
            checked: 4,
            broken: vec![
                BrokenLink {
                    url: "https://example.com/gone".to_string(),
                    scope: LinkScope::Internal,
                    status: Some(404),
                    reason: "HTTP 404 Not Found".to_string(),
                },
                BrokenLink {
                    url: "https://down.example/".to_string(),
                    scope: LinkScope::External,
                    status: None,
                    reason: "connection refused".to_string(),
                },
            ],
        };
        let item = broken_links_item(&report);
        assert_eq!(item.status, CheckStatus::Error);
        assert!(item.extra_info.contains("1 internal, 1 external"));
        assert!(item.details.contains("404 https://example.com/gone"));
    }

    #[test]
    fn test_pagespeed_placeholder() {
        let item = pagespeed_item();
        assert_eq!(item.extra_info, "Coming Soon");
        assert_eq!(item.test, "Google PageSpeed Score");
    }
}
