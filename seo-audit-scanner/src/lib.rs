pub mod document;
pub mod error;
pub mod fetcher;
pub mod links;
pub mod robots;

pub use document::Document;
pub use error::ScanError;
pub use fetcher::{FetchResponse, ProxyFetcher, DEFAULT_RELAY_ENDPOINT};
pub use links::{BrokenLink, LinkProbeReport, LinkScope, extract_probe_urls, probe_links};
pub use robots::{RobotsTxt, SitemapFetch, extract_sitemap_urls, fetch_robots, fetch_sitemaps};
