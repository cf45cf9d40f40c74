// Meta & Head checks

use super::{CheckContext, found, item};
use crate::markup::{labeled, list, para};
use crate::report::{CheckStatus, ReportItem};
use seo_audit_scanner::Document;

pub const TITLE_MAX_CHARS: usize = 60;
pub const DESCRIPTION_MAX_CHARS: usize = 160;

const OPENGRAPH_REQUIRED: &[&str] = &["og:title", "og:type", "og:image", "og:url"];

fn attr_trimmed(document: &Document, css: &str, attr: &str) -> Option<String> {
    document
        .first_attr(css, attr)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `(attr_a, attr_b)` pairs for every element matching `css`.
fn attr_pairs(document: &Document, css: &str, a: &str, b: &str) -> Vec<(String, String)> {
    document
        .select(css)
        .into_iter()
        .map(|el| {
            let value = el.value();
            (
                value.attr(a).unwrap_or_default().trim().to_string(),
                value.attr(b).unwrap_or_default().trim().to_string(),
            )
        })
        .collect()
}

pub fn header_status(ctx: &CheckContext<'_>) -> ReportItem {
    let page = ctx.page;
    let status_line = format!("{} {}", page.status, page.status_text).trim().to_string();
    let content_type = page.content_type.as_deref().unwrap_or("unknown");
    let is_html = page
        .content_type
        .as_deref()
        .is_none_or(|ct| ct.to_ascii_lowercase().contains("html"));

    // The auditor turns non-2xx pages into a failed report, so Error is only
    // reachable when an evaluator is called directly.
    let status = if !(200..300).contains(&page.status) {
        CheckStatus::Error
    } else if !is_html {
        CheckStatus::Warning
    } else {
        CheckStatus::Ok
    };

    item(
        "header-status",
        status,
        format!("HTTP {}", status_line),
        format!(
            "{}{}{}{}",
            labeled("Input URL", &page.requested_url),
            labeled("Final URL", &page.final_url),
            labeled("Final Status", &status_line),
            labeled("Content-Type", content_type)
        ),
    )
}

pub fn meta_charset(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    const ID: &str = "meta-charset";

    let charset = attr_trimmed(document, "meta[charset]", "charset").or_else(|| {
        document
            .select("meta[http-equiv][content]")
            .into_iter()
            .filter(|el| {
                el.value()
                    .attr("http-equiv")
                    .is_some_and(|v| v.eq_ignore_ascii_case("content-type"))
            })
            .find_map(|el| {
                let content = el.value().attr("content")?.to_ascii_lowercase();
                let (_, charset) = content.split_once("charset=")?;
                Some(charset.trim().trim_matches(['"', '\'', ';']).to_string())
            })
            .filter(|c| !c.is_empty())
    });

    match charset {
        None => item(
            ID,
            CheckStatus::Error,
            "Meta charset is missing",
            para("Declare <meta charset=\"utf-8\"> early in <head>."),
        ),
        Some(charset) if charset.eq_ignore_ascii_case("utf-8") => item(
            ID,
            CheckStatus::Ok,
            found(ID, 1),
            labeled("Charset", &charset),
        ),
        Some(charset) => item(
            ID,
            CheckStatus::Warning,
            format!("Charset is {}, not UTF-8", charset),
            labeled("Charset", &charset),
        ),
    }
}

pub fn html_lang(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    const ID: &str = "html-lang";

    match attr_trimmed(document, "html[lang]", "lang") {
        Some(lang) => item(ID, CheckStatus::Ok, found(ID, 1), labeled("Lang", &lang)),
        None => item(
            ID,
            CheckStatus::Warning,
            "HTML lang attribute is missing",
            para("Add a lang attribute to the <html> element, e.g. lang=\"en\"."),
        ),
    }
}

pub fn meta_viewport(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    const ID: &str = "meta-viewport";

    let Some(content) = document.first_attr(r#"meta[name="viewport"]"#, "content") else {
        return item(
            ID,
            CheckStatus::Error,
            "Meta viewport is missing",
            para("Pages without a viewport are not mobile friendly."),
        );
    };

    let normalized = content.to_ascii_lowercase().replace(' ', "");
    let responsive =
        normalized.contains("width=device-width") && normalized.contains("initial-scale=1");

    if responsive {
        item(ID, CheckStatus::Ok, found(ID, 1), labeled("Content", &content))
    } else {
        item(
            ID,
            CheckStatus::Error,
            "Viewport is not responsive",
            format!(
                "{}{}",
                labeled("Content", &content),
                para("Expected width=device-width, initial-scale=1.")
            ),
        )
    }
}

pub fn favicon_link(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    const ID: &str = "favicon-link";

    let icons: Vec<String> = document
        .select(r#"link[rel~="icon"], link[rel="apple-touch-icon"]"#)
        .into_iter()
        .filter_map(|el| el.value().attr("href").map(|h| h.trim().to_string()))
        .filter(|h| !h.is_empty())
        .collect();

    if icons.is_empty() {
        item(
            ID,
            CheckStatus::Warning,
            "No favicon link found",
            para("Browsers will fall back to /favicon.ico if it exists."),
        )
    } else {
        item(ID, CheckStatus::Ok, found(ID, icons.len()), list(&icons))
    }
}

pub fn preconnect_google_fonts(document: &Document, ctx: &CheckContext<'_>) -> ReportItem {
    const ID: &str = "preconnect-google-fonts";

    let hints: Vec<String> = document
        .select(r#"link[rel~="preconnect"]"#)
        .into_iter()
        .filter_map(|el| el.value().attr("href"))
        .filter(|href| href.contains("fonts.googleapis.com") || href.contains("fonts.gstatic.com"))
        .map(|href| href.to_string())
        .collect();

    let uses_google_fonts = document.exists(r#"link[href*="fonts.googleapis.com"]"#)
        || ctx.raw_html.contains("fonts.googleapis.com");

    if !hints.is_empty() {
        item(ID, CheckStatus::Ok, found(ID, hints.len()), list(&hints))
    } else if uses_google_fonts {
        item(
            ID,
            CheckStatus::Warning,
            "Google Fonts loaded without preconnect",
            para("Add <link rel=\"preconnect\" href=\"https://fonts.gstatic.com\" crossorigin> to speed up font loading."),
        )
    } else {
        item(
            ID,
            CheckStatus::Info,
            "Not applicable",
            para("The page does not load Google Fonts."),
        )
    }
}

/// Presence check for a single `<link>` whose appearance is merely noted.
fn link_presence(
    document: &Document,
    id: &str,
    css: &str,
    present: (CheckStatus, &str),
    absent: (CheckStatus, &str),
) -> ReportItem {
    let hrefs: Vec<String> = document
        .select(css)
        .into_iter()
        .map(|el| el.value().attr("href").unwrap_or_default().trim().to_string())
        .collect();

    if hrefs.is_empty() {
        item(id, absent.0, found(id, 0), para(absent.1))
    } else {
        item(
            id,
            present.0,
            found(id, hrefs.len()),
            format!("{}{}", list(&hrefs), para(present.1)),
        )
    }
}

pub fn shortlink_link(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    link_presence(
        document,
        "shortlink-link",
        r#"link[rel="shortlink"]"#,
        (CheckStatus::Info, "A shortlink is advertised. Search engines ignore it."),
        (CheckStatus::Ok, "No shortlink is advertised."),
    )
}

pub fn edituri_link(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    link_presence(
        document,
        "edituri-link",
        r#"link[rel="EditURI"], link[rel="edituri"]"#,
        (
            CheckStatus::Warning,
            "The EditURI (RSD) link exposes the XML-RPC endpoint. Remove it unless remote publishing is needed.",
        ),
        (CheckStatus::Ok, "No EditURI link is exposed."),
    )
}

pub fn api_link(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    link_presence(
        document,
        "api-link",
        r#"link[rel="https://api.w.org/"]"#,
        (CheckStatus::Info, "The REST API root is discoverable from the page head."),
        (CheckStatus::Ok, "No REST API link is exposed."),
    )
}

pub fn hreflang_link(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    const ID: &str = "hreflang-link";

    let alternates = attr_pairs(document, r#"link[rel="alternate"][hreflang]"#, "hreflang", "href");
    if alternates.is_empty() {
        return item(
            ID,
            CheckStatus::Info,
            found(ID, 0),
            para("No hreflang alternates. This is fine for single-language sites."),
        );
    }

    let has_default = alternates.iter().any(|(lang, _)| lang.eq_ignore_ascii_case("x-default"));
    let lines = alternates.iter().map(|(lang, href)| format!("{} → {}", lang, href));
    let mut details = list(lines);
    if !has_default {
        details.push_str(&para("No x-default alternate is declared."));
    }

    item(ID, CheckStatus::Ok, found(ID, alternates.len()), details)
}

pub fn rss_link(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    const ID: &str = "rss-link";

    let feeds = attr_pairs(
        document,
        r#"link[rel="alternate"][type="application/rss+xml"], link[rel="alternate"][type="application/atom+xml"]"#,
        "title",
        "href",
    );

    if feeds.is_empty() {
        item(ID, CheckStatus::Info, found(ID, 0), para("No RSS or Atom feed is advertised."))
    } else {
        let lines = feeds.iter().map(|(title, href)| {
            if title.is_empty() {
                href.clone()
            } else {
                format!("{}: {}", title, href)
            }
        });
        item(ID, CheckStatus::Ok, found(ID, feeds.len()), list(lines))
    }
}

pub fn empty_meta_tags(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    const ID: &str = "empty-meta-tags";

    let empty: Vec<String> = document
        .select("meta[name], meta[property]")
        .into_iter()
        .filter(|el| {
            el.value()
                .attr("content")
                .is_none_or(|content| content.trim().is_empty())
        })
        .map(|el| {
            let value = el.value();
            value
                .attr("name")
                .or_else(|| value.attr("property"))
                .unwrap_or_default()
                .to_string()
        })
        .collect();

    if empty.is_empty() {
        item(ID, CheckStatus::Ok, found(ID, 0), para("Every named meta tag has content."))
    } else {
        item(ID, CheckStatus::Warning, found(ID, empty.len()), list(&empty))
    }
}

/// Shared rule for title and description: empty is an error, over `max`
/// characters a warning.
fn length_status(text: &str, max: usize) -> CheckStatus {
    let len = text.chars().count();
    if len == 0 {
        CheckStatus::Error
    } else if len > max {
        CheckStatus::Warning
    } else {
        CheckStatus::Ok
    }
}

pub fn meta_title(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    const ID: &str = "meta-title";

    let title = document.title().unwrap_or_default();
    let len = title.chars().count();
    let status = length_status(&title, TITLE_MAX_CHARS);

    let extra = match status {
        CheckStatus::Error => "Title is missing or empty".to_string(),
        CheckStatus::Warning => format!("Title is too long ({} characters)", len),
        _ => format!("Title length: {} characters", len),
    };

    let mut details = format!(
        "{}{}",
        labeled("Title", &title),
        labeled("Length", &format!("{} characters", len))
    );
    if status == CheckStatus::Warning {
        details.push_str(&para(&format!(
            "Titles over {} characters may be truncated in search results.",
            TITLE_MAX_CHARS
        )));
    }

    item(ID, status, extra, details)
}

pub fn meta_description(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    const ID: &str = "meta-description";

    let description = attr_trimmed(document, r#"meta[name="description"]"#, "content").unwrap_or_default();
    let len = description.chars().count();
    let status = length_status(&description, DESCRIPTION_MAX_CHARS);

    let extra = match status {
        CheckStatus::Error => "Meta description is missing or empty".to_string(),
        CheckStatus::Warning => format!("Description is too long ({} characters)", len),
        _ => format!("Description length: {} characters", len),
    };

    let mut details = format!(
        "{}{}",
        labeled("Description", &description),
        labeled("Length", &format!("{} characters", len))
    );
    if status == CheckStatus::Warning {
        details.push_str(&para(&format!(
            "Description is too long (limit: {} characters).",
            DESCRIPTION_MAX_CHARS
        )));
    }

    item(ID, status, extra, details)
}

pub fn canonical_tag(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    const ID: &str = "canonical-tag";

    match attr_trimmed(document, r#"link[rel="canonical"]"#, "href") {
        Some(href) => item(ID, CheckStatus::Ok, found(ID, 1), labeled("Canonical", &href)),
        None => item(
            ID,
            CheckStatus::Error,
            "Canonical tag is missing",
            para("Add <link rel=\"canonical\"> to consolidate duplicate URLs."),
        ),
    }
}

pub fn opengraph_meta(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    const ID: &str = "opengraph-meta";

    let tags = attr_pairs(document, r#"meta[property^="og:"]"#, "property", "content");
    if tags.is_empty() {
        return item(
            ID,
            CheckStatus::Warning,
            found(ID, 0),
            para("No OpenGraph tags. Shared links will render without a preview."),
        );
    }

    let missing: Vec<&str> = OPENGRAPH_REQUIRED
        .iter()
        .copied()
        .filter(|required| !tags.iter().any(|(prop, content)| prop == required && !content.is_empty()))
        .collect();

    let mut details = list(tags.iter().map(|(prop, content)| format!("{}: {}", prop, content)));
    let status = if missing.is_empty() {
        CheckStatus::Ok
    } else {
        details.push_str(&labeled("Missing", &missing.join(", ")));
        CheckStatus::Warning
    };

    item(ID, status, found(ID, tags.len()), details)
}

pub fn robots_meta(document: &Document, _ctx: &CheckContext<'_>) -> ReportItem {
    const ID: &str = "robots-meta";

    let Some(content) = document.first_attr(r#"meta[name="robots"]"#, "content") else {
        return item(
            ID,
            CheckStatus::Ok,
            found(ID, 0),
            para("No robots meta tag. Search engines default to index, follow."),
        );
    };

    let lowered = content.to_ascii_lowercase();
    let (status, interpretation) = if lowered.contains("noindex") {
        (CheckStatus::Error, "Page is not indexable (noindex).")
    } else if lowered.contains("nofollow") {
        (CheckStatus::Warning, "Links on this page are not followed (nofollow).")
    } else {
        (CheckStatus::Ok, "Page is indexable.")
    };

    item(
        ID,
        status,
        found(ID, 1),
        format!("{}{}", labeled("Content", &content), para(interpretation)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::PageInfo;
    use url::Url;

    fn run(html: &str, check: fn(&Document, &CheckContext<'_>) -> ReportItem) -> ReportItem {
        let page = PageInfo {
            requested_url: "https://example.com".to_string(),
            final_url: "https://example.com/".to_string(),
            status: 200,
            status_text: "OK".to_string(),
            content_type: Some("text/html".to_string()),
        };
        let url = Url::parse(&page.final_url).unwrap();
        let document = Document::parse(html).unwrap();
        let ctx = CheckContext {
            page: &page,
            page_url: &url,
            document: Some(&document),
            raw_html: html,
        };
        check(&document, &ctx)
    }

    #[test]
    fn test_header_status_by_code_and_content_type() {
        let status_for = |status: u16, content_type: Option<&str>| {
            let page = PageInfo {
                requested_url: "https://example.com".to_string(),
                final_url: "https://example.com/".to_string(),
                status,
                status_text: String::new(),
                content_type: content_type.map(str::to_string),
            };
            let url = Url::parse(&page.final_url).unwrap();
            let ctx = CheckContext {
                page: &page,
                page_url: &url,
                document: None,
                raw_html: "",
            };
            header_status(&ctx).status
        };

        assert_eq!(status_for(200, Some("text/html; charset=UTF-8")), CheckStatus::Ok);
        assert_eq!(status_for(200, None), CheckStatus::Ok);
        assert_eq!(status_for(200, Some("application/pdf")), CheckStatus::Warning);
        assert_eq!(status_for(404, Some("text/html")), CheckStatus::Error);
    }

    #[test]
    fn test_charset_variants() {
        assert_eq!(run(r#"<meta charset="UTF-8">"#, meta_charset).status, CheckStatus::Ok);
        assert_eq!(run(r#"<meta charset="iso-8859-1">"#, meta_charset).status, CheckStatus::Warning);
        assert_eq!(run("<title>x</title>", meta_charset).status, CheckStatus::Error);
        assert_eq!(
            run(r#"<meta http-equiv="Content-Type" content="text/html; charset=utf-8">"#, meta_charset).status,
            CheckStatus::Ok
        );
    }

    #[test]
    fn test_viewport_requires_both_parts() {
        let ok = r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#;
        let partial = r#"<meta name="viewport" content="width=device-width">"#;
        assert_eq!(run(ok, meta_viewport).status, CheckStatus::Ok);
        assert_eq!(run(partial, meta_viewport).status, CheckStatus::Error);
        assert_eq!(run("<p>x</p>", meta_viewport).status, CheckStatus::Error);
    }

    #[test]
    fn test_html_lang_and_canonical() {
        assert_eq!(run(r#"<html lang="en"><body></body></html>"#, html_lang).status, CheckStatus::Ok);
        assert_eq!(run("<html><body></body></html>", html_lang).status, CheckStatus::Warning);
        assert_eq!(run("<p>x</p>", canonical_tag).status, CheckStatus::Error);
        let item = run(r#"<link rel="canonical" href="https://example.com/">"#, canonical_tag);
        assert_eq!(item.status, CheckStatus::Ok);
        assert!(item.details.contains("https://example.com/"));
    }

    #[test]
    fn test_robots_meta_interpretation() {
        assert_eq!(run("<p>x</p>", robots_meta).status, CheckStatus::Ok);
        assert_eq!(
            run(r#"<meta name="robots" content="NOINDEX, follow">"#, robots_meta).status,
            CheckStatus::Error
        );
        assert_eq!(
            run(r#"<meta name="robots" content="index, nofollow">"#, robots_meta).status,
            CheckStatus::Warning
        );
    }

    #[test]
    fn test_opengraph_completeness() {
        let partial = r#"<meta property="og:title" content="T"><meta property="og:type" content="website">"#;
        let item = run(partial, opengraph_meta);
        assert_eq!(item.status, CheckStatus::Warning);
        assert!(item.details.contains("og:image, og:url"));

        let complete = r#"<meta property="og:title" content="T"><meta property="og:type" content="website">
            <meta property="og:image" content="https://example.com/i.png"><meta property="og:url" content="https://example.com/">"#;
        assert_eq!(run(complete, opengraph_meta).status, CheckStatus::Ok);
    }

    #[test]
    fn test_preconnect_interpretation() {
        let hinted = r#"<link rel="preconnect" href="https://fonts.gstatic.com" crossorigin>
            <link rel="stylesheet" href="https://fonts.googleapis.com/css2?family=Inter">"#;
        let unhinted = r#"<link rel="stylesheet" href="https://fonts.googleapis.com/css2?family=Inter">"#;
        assert_eq!(run(hinted, preconnect_google_fonts).status, CheckStatus::Ok);
        assert_eq!(run(unhinted, preconnect_google_fonts).status, CheckStatus::Warning);
        assert_eq!(run("<p>x</p>", preconnect_google_fonts).status, CheckStatus::Info);
    }

    #[test]
    fn test_empty_meta_tags_listed() {
        let html = r#"<meta name="keywords" content=" "><meta name="author"><meta name="x" content="y">"#;
        let item = run(html, empty_meta_tags);
        assert_eq!(item.status, CheckStatus::Warning);
        assert_eq!(item.extra_info, "Number of Empty Meta Tags found: 2");
    }

    #[test]
    fn test_wordpress_head_links() {
        let html = r#"<link rel="EditURI" type="application/rsd+xml" href="https://example.com/xmlrpc.php?rsd">
            <link rel="https://api.w.org/" href="https://example.com/wp-json/">
            <link rel="shortlink" href="https://example.com/?p=1">"#;
        assert_eq!(run(html, edituri_link).status, CheckStatus::Warning);
        assert_eq!(run(html, api_link).status, CheckStatus::Info);
        assert_eq!(run(html, shortlink_link).status, CheckStatus::Info);
        assert_eq!(run("<p>x</p>", edituri_link).status, CheckStatus::Ok);
    }

    #[test]
    fn test_hreflang_and_rss() {
        let html = r#"<link rel="alternate" hreflang="en" href="https://example.com/en/">
            <link rel="alternate" type="application/rss+xml" title="Feed" href="https://example.com/feed/">"#;
        let hreflang = run(html, hreflang_link);
        assert_eq!(hreflang.status, CheckStatus::Ok);
        assert!(hreflang.details.contains("x-default"));
        let rss = run(html, rss_link);
        assert_eq!(rss.status, CheckStatus::Ok);
        assert!(rss.details.contains("Feed: https://example.com/feed/"));
    }
}
