// Audit runs: page fetch, document batch, deferred network checks

use crate::checks::{self, CheckContext, PageInfo, network};
use crate::config::AuditConfig;
use crate::error::{AuditError, Result};
use crate::registry::{BROKEN_LINKS_CHECK, DEFERRED_CHECKS, PAGESPEED_CHECK, ROBOTS_TXT_CHECK, SITEMAP_CHECK};
use crate::report::{AuditReport, ReportItem};
use crate::selection::CheckSelection;
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use seo_audit_scanner::{Document, ProxyFetcher, extract_probe_urls, fetch_robots, fetch_sitemaps, probe_links};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

/// Callback for reporting audit progress
pub type AuditProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Options for a one-shot audit
pub struct AuditOptions {
    pub url: String,
    pub selection: CheckSelection,
    pub config: AuditConfig,
    pub show_progress: bool,
}

/// Parse and check an audit target. Only absolute http(s) URLs are accepted.
pub fn validate_url(input: &str) -> Result<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AuditError::InvalidUrl("URL is empty".to_string()));
    }
    let url = Url::parse(trimmed).map_err(|e| AuditError::InvalidUrl(format!("{}: {}", trimmed, e)))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(AuditError::InvalidUrl(format!(
            "{}: only http and https URLs can be audited",
            trimmed
        ))),
    }
}

/// Runs audits and keeps the most recent completed report.
///
/// Every run takes a fresh generation number when it starts. A run that
/// finishes after a newer one has started still returns its report to the
/// caller, but never replaces the newer run's report in [`Auditor::latest_report`].
pub struct Auditor {
    fetcher: ProxyFetcher,
    max_concurrent_probes: usize,
    generation: AtomicU64,
    latest: Mutex<Option<AuditReport>>,
    progress: Option<AuditProgressCallback>,
}

impl Auditor {
    pub fn new(fetcher: ProxyFetcher, max_concurrent_probes: usize) -> Self {
        Self {
            fetcher,
            max_concurrent_probes: max_concurrent_probes.max(1),
            generation: AtomicU64::new(0),
            latest: Mutex::new(None),
            progress: None,
        }
    }

    pub fn from_config(config: &AuditConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.build_fetcher()?, config.max_concurrent_probes))
    }

    pub fn with_progress_callback(mut self, callback: AuditProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn fetcher(&self) -> &ProxyFetcher {
        &self.fetcher
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current_generation() == generation
    }

    pub async fn latest_report(&self) -> Option<AuditReport> {
        self.latest.lock().await.clone()
    }

    fn report_progress(&self, message: String) {
        if let Some(ref callback) = self.progress {
            callback(message);
        }
    }

    /// Audit `url` with a snapshot of `selection` taken now.
    ///
    /// Errors only for pre-flight problems. A page that cannot be fetched
    /// yields a report holding a single "Audit Failed" item.
    pub async fn run(&self, url: &str, selection: &CheckSelection) -> Result<AuditReport> {
        let checks = selection.frozen();
        if checks.is_empty() {
            return Err(AuditError::NoChecksSelected);
        }
        let target = validate_url(url)?;

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let started_at = Utc::now();
        info!(
            "Audit {} started for {} with {} checks",
            generation,
            target,
            checks.len()
        );

        let items = self.evaluate(&target, &checks).await;
        let report = match items {
            Ok(items) => self.finish(generation, &target, started_at, false, items),
            Err(e) => {
                warn!("Audit {} failed to fetch {}: {}", generation, target, e);
                let item = ReportItem::audit_failed(target.as_str(), &e.to_string());
                self.finish(generation, &target, started_at, true, vec![item])
            }
        };

        self.publish(&report).await;
        Ok(report)
    }

    fn finish(
        &self,
        generation: u64,
        target: &Url,
        started_at: DateTime<Utc>,
        failed: bool,
        items: Vec<ReportItem>,
    ) -> AuditReport {
        let report = AuditReport {
            run_id: uuid::Uuid::new_v4().to_string(),
            generation,
            url: target.to_string(),
            started_at,
            finished_at: Utc::now(),
            failed,
            items,
        };
        info!(
            "Audit {} finished with {} items in {} ms",
            generation,
            report.items.len(),
            report.duration_ms()
        );
        report
    }

    async fn publish(&self, report: &AuditReport) {
        let mut latest = self.latest.lock().await;
        if self.is_current(report.generation) {
            *latest = Some(report.clone());
        } else {
            debug!(
                "Discarding stale audit {} (current is {})",
                report.generation,
                self.current_generation()
            );
        }
    }

    /// Fetch the page and evaluate `checks`. The only error is the page fetch.
    async fn evaluate(&self, target: &Url, checks: &[&'static str]) -> seo_audit_scanner::error::Result<Vec<ReportItem>> {
        self.report_progress(format!("Fetching {}", target));
        let response = self.fetcher.get_text(target.as_str()).await?;

        let page = PageInfo {
            requested_url: target.to_string(),
            final_url: response.final_url.clone(),
            status: response.status,
            status_text: response.status_text.clone(),
            content_type: response.content_type.clone(),
        };
        let page_url = Url::parse(&page.final_url).unwrap_or_else(|_| target.clone());

        let wants = |id: &str| checks.contains(&id);
        let document_checks: Vec<&str> = checks
            .iter()
            .copied()
            .filter(|id| !DEFERRED_CHECKS.contains(id))
            .collect();

        // The parsed document is not Send; it lives only inside this block.
        let (mut items, probe_urls) = {
            let document = Document::parse(&response.body);
            if document.is_none() {
                warn!("{} returned an empty document", target);
            }
            let ctx = CheckContext {
                page: &page,
                page_url: &page_url,
                document: document.as_ref(),
                raw_html: &response.body,
            };

            self.report_progress(format!("Running {} page checks", document_checks.len()));
            let items = checks::run_document_checks(&document_checks, &ctx);
            let probe_urls = match &document {
                Some(document) if wants(BROKEN_LINKS_CHECK) => Some(extract_probe_urls(document, &page_url)),
                _ => None,
            };
            (items, probe_urls)
        };

        if wants(ROBOTS_TXT_CHECK) || wants(SITEMAP_CHECK) {
            self.report_progress("Fetching robots.txt".to_string());
            let robots = fetch_robots(&self.fetcher, &page_url).await;
            if wants(ROBOTS_TXT_CHECK) {
                items.push(network::robots_item(&robots));
            }
            if wants(SITEMAP_CHECK) {
                let urls = robots.sitemap_urls().unwrap_or_default();
                if !urls.is_empty() {
                    self.report_progress(format!("Fetching {} sitemap(s)", urls.len()));
                }
                let sitemaps = fetch_sitemaps(&self.fetcher, &urls).await;
                items.push(network::sitemap_item(&robots, &sitemaps));
            }
        }

        if wants(BROKEN_LINKS_CHECK) {
            match probe_urls {
                Some(urls) => {
                    self.report_progress(format!("Probing {} links", urls.len()));
                    let probed =
                        probe_links(&self.fetcher, urls, &page_url, self.max_concurrent_probes).await;
                    items.push(network::broken_links_item(&probed));
                }
                None => items.push(ReportItem::no_document(
                    BROKEN_LINKS_CHECK,
                    checks::label(BROKEN_LINKS_CHECK),
                )),
            }
        }

        if wants(PAGESPEED_CHECK) {
            items.push(network::pagespeed_item());
        }

        Ok(items)
    }
}

/// Run one audit with an optional terminal spinner.
pub async fn execute_audit(
    options: AuditOptions,
    progress_callback: Option<AuditProgressCallback>,
) -> Result<AuditReport> {
    let AuditOptions {
        url,
        selection,
        config,
        show_progress,
    } = options;

    let progress_bar = if show_progress {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting audit...");
        Some(pb)
    } else {
        None
    };

    let pb_clone = progress_bar.clone();
    let callback: AuditProgressCallback = Arc::new(move |message: String| {
        if let Some(ref pb) = pb_clone {
            pb.set_message(message.clone());
        }
        if let Some(ref callback) = progress_callback {
            callback(message);
        }
    });

    let auditor = Auditor::from_config(&config)?.with_progress_callback(callback);
    let result = auditor.run(&url, &selection).await;

    if let Some(pb) = progress_bar {
        match &result {
            Ok(report) if report.failed => pb.finish_with_message("Audit failed"),
            Ok(report) => pb.finish_with_message(format!(
                "Audit complete! {} checks reported",
                report.items.len()
            )),
            Err(_) => pb.finish_and_clear(),
        }
    }

    result
}
