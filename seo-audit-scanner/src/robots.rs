// robots.txt retrieval and sitemap discovery

use crate::fetcher::ProxyFetcher;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};
use url::Url;

static SITEMAP_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*sitemap[ \t]*:[ \t]*(\S+)").expect("sitemap line pattern")
});

static LOC_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<loc[\s>]").expect("loc tag pattern"));

/// Outcome of fetching `{origin}/robots.txt`.
#[derive(Debug, Clone)]
pub struct RobotsTxt {
    pub url: String,
    pub content: Option<String>,
    pub error: Option<String>,
}

impl RobotsTxt {
    pub fn is_available(&self) -> bool {
        self.content.is_some()
    }

    /// Sitemap URLs declared in the file; `None` when robots.txt itself was
    /// unavailable and the answer is unknown.
    pub fn sitemap_urls(&self) -> Option<Vec<String>> {
        self.content.as_deref().map(extract_sitemap_urls)
    }
}

/// One referenced sitemap and what came back for it.
#[derive(Debug, Clone)]
pub struct SitemapFetch {
    pub url: String,
    pub content: Option<String>,
    pub error: Option<String>,
    pub is_index: bool,
    pub loc_count: usize,
}

impl SitemapFetch {
    pub fn is_available(&self) -> bool {
        self.content.is_some()
    }
}

pub fn robots_url(page_url: &Url) -> String {
    format!("{}/robots.txt", page_url.origin().ascii_serialization())
}

pub async fn fetch_robots(fetcher: &ProxyFetcher, page_url: &Url) -> RobotsTxt {
    let url = robots_url(page_url);
    debug!("Fetching {}", url);

    match fetcher.get_text(&url).await {
        Ok(response) => RobotsTxt {
            url,
            content: Some(response.body),
            error: None,
        },
        Err(e) => {
            warn!("robots.txt unavailable at {}: {}", url, e);
            RobotsTxt {
                url,
                content: None,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Every `Sitemap: <url>` line, keyword matched case-insensitively.
pub fn extract_sitemap_urls(robots: &str) -> Vec<String> {
    SITEMAP_LINE
        .captures_iter(robots)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Fetch each sitemap in turn. A failure is recorded against its own URL and
/// never stops the others.
pub async fn fetch_sitemaps(fetcher: &ProxyFetcher, urls: &[String]) -> Vec<SitemapFetch> {
    let mut fetched = Vec::with_capacity(urls.len());

    for url in urls {
        match fetcher.get_text(url).await {
            Ok(response) => {
                let body = response.body;
                fetched.push(SitemapFetch {
                    url: url.clone(),
                    is_index: body.to_ascii_lowercase().contains("<sitemapindex"),
                    loc_count: LOC_TAG.find_iter(&body).count(),
                    content: Some(body),
                    error: None,
                });
            }
            Err(e) => {
                warn!("Sitemap unavailable at {}: {}", url, e);
                fetched.push(SitemapFetch {
                    url: url.clone(),
                    content: None,
                    error: Some(e.to_string()),
                    is_index: false,
                    loc_count: 0,
                });
            }
        }
    }

    fetched
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_robots_url_uses_origin() {
        let page = Url::parse("https://example.com:8443/deep/page?q=1").unwrap();
        assert_eq!(robots_url(&page), "https://example.com:8443/robots.txt");
    }

    #[test]
    fn test_extract_sitemap_urls_case_insensitive() {
        let robots = "User-agent: *\nDisallow: /admin\nSitemap: https://example.com/sitemap.xml\n\
                      sitemap:https://example.com/news.xml\n  SITEMAP :  https://example.com/img.xml  \n";
        assert_eq!(
            extract_sitemap_urls(robots),
            vec![
                "https://example.com/sitemap.xml".to_string(),
                "https://example.com/news.xml".to_string(),
                "https://example.com/img.xml".to_string(),
            ]
        );
    }

    #[test]
    fn test_extract_sitemap_urls_ignores_mentions_mid_line() {
        let robots = "# see Sitemap: https://example.com/commented.xml\nUser-agent: *\n";
        assert!(extract_sitemap_urls(robots).is_empty());
    }

    #[test]
    fn test_sitemap_urls_unknown_without_robots() {
        let robots = RobotsTxt {
            url: "https://example.com/robots.txt".to_string(),
            content: None,
            error: Some("HTTP 404".to_string()),
        };
        assert!(robots.sitemap_urls().is_none());
        assert!(!robots.is_available());
    }
}
