//! Link and media resolution.
//!
//! Walks the full document tree, inventories resource-bearing elements,
//! classifies them, and resolves relative URLs against the effective base
//! URL. Collection runs before any cleaning so head resources
//! (stylesheets, scripts, icons) are seen even though they never appear
//! in content output.

use dom_query::{Document, Selection};
use url::Url;

use crate::dom;
use crate::options::ExtractOptions;
use crate::pipeline::Deadline;
use crate::result::{LinkKind, LinkResource, MediaKind, MediaResource};
use crate::text::normalize_whitespace;
use crate::Result;

/// Schemes preserved verbatim and classified as non-resolvable content
/// links rather than network resources.
const SPECIAL_SCHEMES: &[&str] = &["mailto:", "javascript:", "data:", "tel:"];

/// Media and link inventories for one document, in document order per
/// kind.
#[derive(Debug, Default)]
pub(crate) struct CollectedResources {
    pub media: Vec<MediaResource>,
    pub links: Vec<LinkResource>,
}

/// Determine the base URL for resolution.
///
/// Precedence: caller override, then a declared `<base href>`, then the
/// document's canonical URL. Returns `None` when no usable base exists;
/// URLs are then kept verbatim.
#[must_use]
pub fn effective_base(
    doc: &Document,
    options: &ExtractOptions,
    canonical: Option<&str>,
) -> Option<Url> {
    if let Some(base) = options.base_url.as_deref() {
        if let Ok(url) = Url::parse(base.trim()) {
            return Some(url);
        }
    }

    let declared = doc.select("base[href]");
    if let Some(href) = dom::get_attribute(&declared, "href") {
        if let Ok(url) = Url::parse(href.trim()) {
            return Some(url);
        }
    }

    canonical.and_then(|href| Url::parse(href.trim()).ok())
}

/// Resolve a raw URL reference against the base.
///
/// Special schemes are preserved unchanged. Absolute URLs pass through.
/// Everything else (protocol-relative, root-relative, document-relative)
/// resolves via standard path-segment normalization. Without a base, or
/// when joining fails, the raw value is kept.
#[must_use]
pub fn resolve_url(raw: &str, base: Option<&Url>) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    if has_special_scheme(raw) {
        return raw.to_string();
    }

    if let Ok(parsed) = Url::parse(raw) {
        return parsed.to_string();
    }

    match base {
        Some(base) => base
            .join(raw)
            .map_or_else(|_| raw.to_string(), |joined| joined.to_string()),
        None => raw.to_string(),
    }
}

fn has_special_scheme(raw: &str) -> bool {
    let lower = raw.to_ascii_lowercase();
    SPECIAL_SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
}

/// Host of a resolved URL, lowercased by the parser. `None` for special
/// schemes and anything that fails to parse as absolute.
fn host_of(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
}

/// True iff the resolved host differs from the base host. Exact
/// case-insensitive comparison; no `www.` stripping. Without a base or a
/// host there is nothing to compare against.
fn is_external(url_str: &str, base: Option<&Url>) -> bool {
    let Some(base_host) = base.and_then(Url::host_str) else {
        return false;
    };
    match host_of(url_str) {
        Some(host) => !host.eq_ignore_ascii_case(base_host),
        None => false,
    }
}

/// True iff the `rel` attribute tokens include `nofollow`.
fn has_nofollow(rel: Option<&str>) -> bool {
    rel.is_some_and(|value| {
        value
            .split_whitespace()
            .any(|token| token.eq_ignore_ascii_case("nofollow"))
    })
}

fn rel_has_token(rel: &str, wanted: &str) -> bool {
    rel.split_whitespace()
        .any(|token| token.eq_ignore_ascii_case(wanted))
}

/// Inventory every resource-bearing element in the document.
///
/// `preserve_*` options govern the media list; the link filter governs
/// the link list. Duplicates are kept; callers may rely on occurrence
/// counts and document order within each kind.
pub(crate) fn collect(
    doc: &Document,
    base: Option<&Url>,
    options: &ExtractOptions,
    deadline: &Deadline,
) -> Result<CollectedResources> {
    let mut out = CollectedResources::default();

    collect_head_links(doc, base, options, deadline, &mut out)?;
    collect_media(doc, base, options, deadline, &mut out)?;
    collect_anchors(doc, base, options, deadline, &mut out)?;

    Ok(out)
}

/// Stylesheets, icons and scripts.
fn collect_head_links(
    doc: &Document,
    base: Option<&Url>,
    options: &ExtractOptions,
    deadline: &Deadline,
    out: &mut CollectedResources,
) -> Result<()> {
    let filter = &options.link_filter;

    if filter.stylesheets || filter.icons {
        for node in doc.select("link[href]").nodes() {
            deadline.check()?;
            let sel = Selection::from(*node);
            let Some(rel) = dom::get_attribute(&sel, "rel") else {
                continue;
            };

            let kind = if rel_has_token(&rel, "stylesheet") && filter.stylesheets {
                LinkKind::Stylesheet
            } else if is_icon_rel(&rel) && filter.icons {
                LinkKind::Icon
            } else {
                continue;
            };

            if let Some(link) = link_from_element(&sel, "href", kind, base) {
                out.links.push(link);
            }
        }
    }

    if filter.scripts {
        for node in doc.select("script[src]").nodes() {
            deadline.check()?;
            let sel = Selection::from(*node);
            if let Some(link) = link_from_element(&sel, "src", LinkKind::Script, base) {
                out.links.push(link);
            }
        }
    }

    Ok(())
}

/// Icon rel values: "icon", "shortcut icon", "apple-touch-icon" and the
/// precomposed variant.
fn is_icon_rel(rel: &str) -> bool {
    rel_has_token(rel, "icon")
        || rel_has_token(rel, "apple-touch-icon")
        || rel_has_token(rel, "apple-touch-icon-precomposed")
}

/// Images, videos and audio elements, for both the media inventory and
/// the link graph.
fn collect_media(
    doc: &Document,
    base: Option<&Url>,
    options: &ExtractOptions,
    deadline: &Deadline,
    out: &mut CollectedResources,
) -> Result<()> {
    let filter = &options.link_filter;

    if options.preserve_images || filter.images {
        for node in doc.select("img, picture > source").nodes() {
            deadline.check()?;
            let sel = Selection::from(*node);
            let Some(resource) = media_from_element(&sel, MediaKind::Image, base) else {
                continue;
            };
            push_media(out, resource, base, options.preserve_images, filter.images);
        }
    }

    if options.preserve_videos || filter.videos {
        for node in doc.select("video, video > source").nodes() {
            deadline.check()?;
            let sel = Selection::from(*node);
            let Some(resource) = media_from_element(&sel, MediaKind::Video, base) else {
                continue;
            };
            push_media(out, resource, base, options.preserve_videos, filter.videos);
        }
    }

    if options.preserve_audios || filter.audios {
        for node in doc.select("audio, audio > source").nodes() {
            deadline.check()?;
            let sel = Selection::from(*node);
            let Some(resource) = media_from_element(&sel, MediaKind::Audio, base) else {
                continue;
            };
            push_media(out, resource, base, options.preserve_audios, filter.audios);
        }
    }

    Ok(())
}

fn push_media(
    out: &mut CollectedResources,
    resource: MediaResource,
    base: Option<&Url>,
    preserve: bool,
    as_link: bool,
) {
    if as_link {
        out.links.push(LinkResource {
            url: resource.url.clone(),
            text: String::new(),
            title: None,
            kind: match resource.kind {
                MediaKind::Image => LinkKind::Image,
                MediaKind::Video => LinkKind::Video,
                MediaKind::Audio => LinkKind::Audio,
            },
            external: is_external(&resource.url, base),
            nofollow: false,
        });
    }
    if preserve {
        out.media.push(resource);
    }
}

/// Anchor links, split into same-host and cross-host by the filter.
fn collect_anchors(
    doc: &Document,
    base: Option<&Url>,
    options: &ExtractOptions,
    deadline: &Deadline,
    out: &mut CollectedResources,
) -> Result<()> {
    let filter = &options.link_filter;
    if !filter.content && !filter.external {
        return Ok(());
    }

    for node in doc.select("a[href]").nodes() {
        deadline.check()?;
        let sel = Selection::from(*node);
        let Some(href) = dom::get_attribute(&sel, "href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty() {
            continue;
        }

        let url = resolve_url(href, base);
        let external = is_external(&url, base);
        if external && !filter.external {
            continue;
        }
        if !external && !filter.content {
            continue;
        }

        out.links.push(LinkResource {
            url,
            text: normalize_whitespace(&dom::text_content(&sel)),
            title: dom::get_attribute(&sel, "title"),
            kind: LinkKind::Content,
            external,
            nofollow: has_nofollow(dom::get_attribute(&sel, "rel").as_deref()),
        });
    }

    Ok(())
}

fn link_from_element(
    sel: &Selection,
    url_attr: &str,
    kind: LinkKind,
    base: Option<&Url>,
) -> Option<LinkResource> {
    let raw = dom::get_attribute(sel, url_attr)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let url = resolve_url(raw, base);
    let external = is_external(&url, base);

    Some(LinkResource {
        url,
        text: String::new(),
        title: dom::get_attribute(sel, "title"),
        kind,
        external,
        nofollow: false,
    })
}

fn media_from_element(
    sel: &Selection,
    kind: MediaKind,
    base: Option<&Url>,
) -> Option<MediaResource> {
    // Lazy-loading themes park the real URL in data-src; <picture>
    // sources declare candidates in srcset.
    let raw = dom::get_attribute(sel, "src")
        .filter(|src| !src.trim().is_empty())
        .or_else(|| dom::get_attribute(sel, "data-src").filter(|src| !src.trim().is_empty()))
        .or_else(|| dom::get_attribute(sel, "srcset").and_then(|s| first_srcset_url(&s)))?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let alt = dom::get_attribute(sel, "alt");
    let decorative = alt.as_deref().is_none_or(|text| text.trim().is_empty())
        || dom::get_attribute(sel, "role").as_deref() == Some("presentation")
        || dom::get_attribute(sel, "aria-hidden").as_deref() == Some("true");

    // A <source> inherits its poster from the owning <video>.
    let poster = dom::get_attribute(sel, "poster")
        .or_else(|| {
            if kind == MediaKind::Video {
                dom::get_attribute(&sel.parent(), "poster")
            } else {
                None
            }
        })
        .map(|p| resolve_url(&p, base));

    Some(MediaResource {
        kind,
        url: resolve_url(raw, base),
        alt,
        poster,
        media_type: dom::get_attribute(sel, "type"),
        width: dom::get_attribute(sel, "width"),
        height: dom::get_attribute(sel, "height"),
        decorative,
    })
}

/// First URL of a `srcset` attribute: `"a.png 1x, b.png 2x"` yields
/// `"a.png"`.
fn first_srcset_url(srcset: &str) -> Option<String> {
    srcset
        .split(',')
        .find_map(|entry| entry.split_whitespace().next())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::LinkFilter;

    fn base() -> Url {
        match Url::parse("https://example.com/blog/") {
            Ok(url) => url,
            Err(err) => panic!("base url must parse: {err}"),
        }
    }

    #[test]
    fn test_resolve_document_relative() {
        assert_eq!(
            resolve_url("page.html", Some(&base())),
            "https://example.com/blog/page.html"
        );
    }

    #[test]
    fn test_resolve_parent_relative() {
        assert_eq!(resolve_url("../x", Some(&base())), "https://example.com/x");
    }

    #[test]
    fn test_resolve_protocol_relative() {
        assert_eq!(
            resolve_url("//cdn.com/a.js", Some(&base())),
            "https://cdn.com/a.js"
        );
    }

    #[test]
    fn test_resolve_root_relative() {
        assert_eq!(
            resolve_url("/root/page", Some(&base())),
            "https://example.com/root/page"
        );
    }

    #[test]
    fn test_resolve_absolute_unchanged() {
        assert_eq!(
            resolve_url("https://other.com/page", Some(&base())),
            "https://other.com/page"
        );
    }

    #[test]
    fn test_special_schemes_preserved() {
        for raw in [
            "mailto:someone@example.com",
            "javascript:void(0)",
            "data:image/png;base64,abc",
            "tel:+15551234",
        ] {
            assert_eq!(resolve_url(raw, Some(&base())), raw);
        }
    }

    #[test]
    fn test_resolve_without_base_keeps_raw() {
        assert_eq!(resolve_url("page.html", None), "page.html");
        assert_eq!(resolve_url("/x", None), "/x");
    }

    #[test]
    fn test_external_is_exact_host_comparison() {
        let base = base();
        assert!(!is_external("https://example.com/other", Some(&base)));
        assert!(is_external("https://www.example.com/other", Some(&base)));
        assert!(is_external("https://cdn.com/a", Some(&base)));
        assert!(!is_external("mailto:x@example.com", Some(&base)));
    }

    #[test]
    fn test_nofollow_tokens() {
        assert!(has_nofollow(Some("nofollow")));
        assert!(has_nofollow(Some("external NOFOLLOW noopener")));
        assert!(!has_nofollow(Some("noopener")));
        assert!(!has_nofollow(None));
    }

    #[test]
    fn test_effective_base_precedence() {
        let doc = Document::from(
            r#"<html><head><base href="https://declared.com/dir/"></head><body></body></html>"#,
        );

        let with_override = ExtractOptions {
            base_url: Some("https://override.com/".to_string()),
            ..ExtractOptions::default()
        };
        let chosen = effective_base(&doc, &with_override, Some("https://canonical.com/"));
        assert_eq!(chosen.as_ref().and_then(Url::host_str), Some("override.com"));

        let chosen = effective_base(&doc, &ExtractOptions::default(), Some("https://canonical.com/"));
        assert_eq!(chosen.as_ref().and_then(Url::host_str), Some("declared.com"));

        let bare = Document::from("<html><body></body></html>");
        let chosen = effective_base(&bare, &ExtractOptions::default(), Some("https://canonical.com/"));
        assert_eq!(chosen.as_ref().and_then(Url::host_str), Some("canonical.com"));

        let chosen = effective_base(&bare, &ExtractOptions::default(), None);
        assert!(chosen.is_none());
    }

    #[test]
    fn test_collect_preserves_document_order_and_duplicates() {
        let doc = Document::from(
            r#"<html><body>
            <a href="/first">first</a>
            <a href="/second">second</a>
            <a href="/first">first again</a>
            </body></html>"#,
        );

        let result = collect(
            &doc,
            Some(&base()),
            &ExtractOptions::default(),
            &Deadline::unbounded(),
        );
        let resources = match result {
            Ok(r) => r,
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        };

        let urls: Vec<&str> = resources.links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/first",
                "https://example.com/second",
                "https://example.com/first",
            ]
        );
    }

    #[test]
    fn test_collect_classifies_head_resources() {
        let doc = Document::from(
            r#"<html><head>
            <link rel="stylesheet" href="/styles.css">
            <link rel="shortcut icon" href="/favicon.ico">
            <script src="//cdn.com/a.js"></script>
            </head><body><a href="/page">page</a></body></html>"#,
        );

        let options = ExtractOptions {
            link_filter: LinkFilter::all(),
            ..ExtractOptions::default()
        };
        let resources = match collect(&doc, Some(&base()), &options, &Deadline::unbounded()) {
            Ok(r) => r,
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        };

        let kind_of = |url: &str| {
            resources
                .links
                .iter()
                .find(|l| l.url == url)
                .map(|l| l.kind)
        };

        assert_eq!(
            kind_of("https://example.com/styles.css"),
            Some(LinkKind::Stylesheet)
        );
        assert_eq!(
            kind_of("https://example.com/favicon.ico"),
            Some(LinkKind::Icon)
        );
        assert_eq!(kind_of("https://cdn.com/a.js"), Some(LinkKind::Script));
        assert_eq!(
            kind_of("https://example.com/page"),
            Some(LinkKind::Content)
        );

        let script = resources.links.iter().find(|l| l.kind == LinkKind::Script);
        assert_eq!(script.map(|l| l.external), Some(true));
    }

    #[test]
    fn test_collect_filters_external_links() {
        let doc = Document::from(
            r#"<html><body>
            <a href="/internal">in</a>
            <a href="https://elsewhere.com/out" rel="nofollow">out</a>
            </body></html>"#,
        );

        let internal_only = ExtractOptions {
            link_filter: LinkFilter {
                external: false,
                ..LinkFilter::default()
            },
            ..ExtractOptions::default()
        };
        let resources = match collect(&doc, Some(&base()), &internal_only, &Deadline::unbounded()) {
            Ok(r) => r,
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        };
        assert_eq!(resources.links.len(), 1);
        assert_eq!(resources.links[0].url, "https://example.com/internal");

        let all = ExtractOptions::default();
        let resources = match collect(&doc, Some(&base()), &all, &Deadline::unbounded()) {
            Ok(r) => r,
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        };
        assert_eq!(resources.links.len(), 2);
        assert!(resources.links[1].external);
        assert!(resources.links[1].nofollow);
    }

    #[test]
    fn test_collect_media_attributes() {
        let doc = Document::from(
            r#"<html><body>
            <img src="photo.jpg" alt="A photo" width="640" height="auto">
            <img src="spacer.gif" alt="">
            <video poster="cover.jpg"><source src="movie.mp4" type="video/mp4"></video>
            </body></html>"#,
        );

        let options = ExtractOptions {
            preserve_videos: true,
            ..ExtractOptions::default()
        };
        let resources = match collect(&doc, Some(&base()), &options, &Deadline::unbounded()) {
            Ok(r) => r,
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        };

        let photo = &resources.media[0];
        assert_eq!(photo.kind, MediaKind::Image);
        assert_eq!(photo.url, "https://example.com/blog/photo.jpg");
        assert_eq!(photo.alt.as_deref(), Some("A photo"));
        assert_eq!(photo.width.as_deref(), Some("640"));
        assert_eq!(photo.height.as_deref(), Some("auto"));
        assert!(!photo.decorative);

        let spacer = &resources.media[1];
        assert!(spacer.decorative);

        let movie = &resources.media[2];
        assert_eq!(movie.kind, MediaKind::Video);
        assert_eq!(movie.url, "https://example.com/blog/movie.mp4");
        assert_eq!(movie.media_type.as_deref(), Some("video/mp4"));
        assert_eq!(movie.poster.as_deref(), Some("https://example.com/blog/cover.jpg"));
    }

    #[test]
    fn test_media_links_carry_external_flag() {
        let doc = Document::from(
            r#"<html><body>
            <img src="https://cdn.other.com/pic.png" alt="remote">
            <img src="local.png" alt="local">
            </body></html>"#,
        );

        let options = ExtractOptions {
            link_filter: LinkFilter::all(),
            ..ExtractOptions::default()
        };
        let resources = match collect(&doc, Some(&base()), &options, &Deadline::unbounded()) {
            Ok(r) => r,
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        };

        let external_of = |url: &str| {
            resources
                .links
                .iter()
                .find(|l| l.url == url)
                .map(|l| l.external)
        };
        assert_eq!(external_of("https://cdn.other.com/pic.png"), Some(true));
        assert_eq!(external_of("https://example.com/blog/local.png"), Some(false));
    }

    #[test]
    fn test_picture_source_uses_srcset() {
        let doc = Document::from(
            r#"<html><body><picture>
            <source srcset="large.png 2x, small.png 1x" type="image/png">
            <img src="fallback.png" alt="figure">
            </picture></body></html>"#,
        );

        let resources = match collect(
            &doc,
            Some(&base()),
            &ExtractOptions::default(),
            &Deadline::unbounded(),
        ) {
            Ok(r) => r,
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        };

        let urls: Vec<&str> = resources.media.iter().map(|m| m.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/blog/large.png",
                "https://example.com/blog/fallback.png",
            ]
        );
    }

    #[test]
    fn test_first_srcset_url() {
        assert_eq!(
            first_srcset_url("a.png 1x, b.png 2x").as_deref(),
            Some("a.png")
        );
        assert_eq!(first_srcset_url("  solo.png  ").as_deref(), Some("solo.png"));
        assert_eq!(first_srcset_url(""), None);
    }

    #[test]
    fn test_special_scheme_links_classified_content() {
        let doc = Document::from(
            r#"<html><body><a href="mailto:x@example.com">mail</a></body></html>"#,
        );
        let resources = match collect(
            &doc,
            Some(&base()),
            &ExtractOptions::default(),
            &Deadline::unbounded(),
        ) {
            Ok(r) => r,
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        };

        assert_eq!(resources.links.len(), 1);
        assert_eq!(resources.links[0].url, "mailto:x@example.com");
        assert_eq!(resources.links[0].kind, LinkKind::Content);
        assert!(!resources.links[0].external);
    }
}
