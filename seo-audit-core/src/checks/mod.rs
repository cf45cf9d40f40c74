// Check evaluators: one pure function per registry id

pub mod content;
pub mod head;
pub mod links;
pub mod network;
pub mod technical;

use crate::registry;
use crate::report::{CheckStatus, ReportItem};
use seo_audit_scanner::Document;
use tracing::debug;
use url::Url;

/// Response metadata for the audited page.
#[derive(Debug, Clone)]
pub struct PageInfo {
    pub requested_url: String,
    pub final_url: String,
    pub status: u16,
    pub status_text: String,
    pub content_type: Option<String>,
}

/// Everything an evaluator may look at. Built once per run, after the page
/// fetch, and dropped before any further network work.
pub struct CheckContext<'a> {
    pub page: &'a PageInfo,
    /// Parsed `final_url`, used to resolve relative links
    pub page_url: &'a Url,
    pub document: Option<&'a Document>,
    pub raw_html: &'a str,
}

pub type PageCheck = fn(&CheckContext<'_>) -> ReportItem;
pub type DocumentCheck = fn(&Document, &CheckContext<'_>) -> ReportItem;

#[derive(Clone, Copy)]
pub enum Evaluator {
    /// Needs only response metadata
    Page(PageCheck),
    /// Needs a parsed document; reports "no findings" without one
    Document(DocumentCheck),
    /// Needs further fetches; run by the auditor after the document batch
    Deferred,
}

pub fn evaluator_for(id: &str) -> Option<Evaluator> {
    use Evaluator::{Deferred, Document, Page};

    let evaluator = match id {
        "header-status" => Page(head::header_status),
        "meta-charset" => Document(head::meta_charset),
        "html-lang" => Document(head::html_lang),
        "meta-viewport" => Document(head::meta_viewport),
        "favicon-link" => Document(head::favicon_link),
        "preconnect-google-fonts" => Document(head::preconnect_google_fonts),
        "shortlink-link" => Document(head::shortlink_link),
        "edituri-link" => Document(head::edituri_link),
        "api-link" => Document(head::api_link),
        "hreflang-link" => Document(head::hreflang_link),
        "rss-link" => Document(head::rss_link),
        "empty-meta-tags" => Document(head::empty_meta_tags),
        "meta-title" => Document(head::meta_title),
        "meta-description" => Document(head::meta_description),
        "canonical-tag" => Document(head::canonical_tag),
        "opengraph-meta" => Document(head::opengraph_meta),
        "robots-meta" => Document(head::robots_meta),
        "top-keywords" => Document(content::top_keywords_check),
        "h1" => Document(content::h1),
        "h2" => Document(content::h2),
        "h3" => Document(content::h3),
        "h4" => Document(content::h4),
        "h5" => Document(content::h5),
        "h6" => Document(content::h6),
        "paragraphs" => Document(content::paragraphs),
        "spans" => Document(content::spans),
        "ul-li-list" => Document(content::ul_li_list),
        "image-alt" => Document(content::image_alt),
        "link-profile" => Document(links::link_profile),
        "internal-links" => Document(links::internal_links),
        "external-links" => Document(links::external_links),
        "http-links" => Document(links::http_links),
        "js-type" => Document(technical::js_type),
        "json-ld" => Document(technical::json_ld),
        "technologies" => Document(technical::technologies),
        id if registry::is_deferred(id) => Deferred,
        _ => return None,
    };
    Some(evaluator)
}

/// Evaluate one non-deferred check. `None` for deferred or unknown ids.
pub fn evaluate(id: &str, ctx: &CheckContext<'_>) -> Option<ReportItem> {
    match evaluator_for(id)? {
        Evaluator::Page(check) => Some(check(ctx)),
        Evaluator::Document(check) => Some(match ctx.document {
            Some(document) => check(document, ctx),
            None => ReportItem::no_document(id, label(id)),
        }),
        Evaluator::Deferred => None,
    }
}

/// Run the synchronous batch for `ids`, in the order given.
pub fn run_document_checks(ids: &[&str], ctx: &CheckContext<'_>) -> Vec<ReportItem> {
    let items: Vec<ReportItem> = ids.iter().filter_map(|id| evaluate(id, ctx)).collect();
    debug!("Evaluated {} document checks", items.len());
    items
}

pub(crate) fn label(id: &str) -> &str {
    registry::find(id).map(|c| c.label).unwrap_or(id)
}

/// Report item titled with the registry label for `id`.
pub(crate) fn item(
    id: &str,
    status: CheckStatus,
    extra_info: impl Into<String>,
    details: impl Into<String>,
) -> ReportItem {
    ReportItem::new(id, label(id), status, extra_info, details)
}

/// "Number of {label} found: {n}", the summary line most checks use.
pub(crate) fn found(id: &str, count: usize) -> String {
    format!("Number of {} found: {}", label(id), count)
}
