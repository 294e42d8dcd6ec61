use std::sync::LazyLock;

use crate::types::{Entry, ListingBlock, ListingPage};

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

static RE_BACKGROUND_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"background-image\s*:\s*url\(([^)]*)\)")
        .expect("invalid regex: background image")
});
static SEL_CONTAINER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.iH").expect("invalid selector: container"));
static SEL_STRONG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("strong").expect("invalid selector: strong"));

const PAGES_LABEL: &str = "Pages:";

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

pub fn parse_listing_page(html: &str, marker: &str, page_url: &Url) -> ListingPage {
    let document = Html::parse_document(html);

    let blocks = document
        .select(&SEL_CONTAINER)
        .map(|e| parse_block(e, marker, page_url))
        .collect();

    ListingPage {
        blocks,
        last_page: parse_last_page(&document),
    }
}

fn parse_block(element: ElementRef, marker: &str, page_url: &Url) -> ListingBlock {
    let Some(id) = element.value().attr("id").filter(|id| id.contains(marker)) else {
        return ListingBlock::Unmarked;
    };

    let code = id.replace(&format!("{marker} "), "");
    let image_url = element
        .value()
        .attr("style")
        .and_then(|style| parse_background_image(style, page_url));

    match image_url.and_then(|url| Entry::new(&code, &url)) {
        Some(entry) => ListingBlock::Entry(entry),
        None => ListingBlock::Incomplete { id: id.to_string() },
    }
}

/// Pulls the `background-image:url(...)` argument out of an inline style and
/// makes it absolute against `page_url`.
pub fn parse_background_image(style: &str, page_url: &Url) -> Option<String> {
    let raw = RE_BACKGROUND_IMAGE.captures(style)?.get(1)?.as_str();
    let raw = raw.trim().trim_matches('\'').trim_matches('"');
    if raw.is_empty() {
        return None;
    }
    page_url.join(raw).ok().map(String::from)
}

/// Highest page number linked after the "Pages:" label.
fn parse_last_page(document: &Html) -> Option<u32> {
    let label = document
        .select(&SEL_STRONG)
        .find(|e| elem_text(*e).trim() == PAGES_LABEL)?;

    let last = label
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "a")
        .filter_map(|e| elem_text(e).trim().parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    Some(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn page_url() -> Url {
        Url::parse("https://example.com/main/2025/05-14-16/").unwrap()
    }

    fn entries(page: &ListingPage) -> Vec<Entry> {
        page.entries().cloned().collect()
    }

    #[test]
    fn test_parse_listing_page_from_fixture() {
        let html =
            fs::read_to_string("fixtures/listing-page.html").expect("Failed to read fixture");

        let page = parse_listing_page(&html, "VR", &page_url());

        assert_eq!(page.blocks.len(), 6);
        assert_eq!(page.last_page, Some(3));

        let codes: Vec<_> = page.entries().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["ABCD-101", "EFGH-202", "IJKL-303"]);

        let first = page.entries().next().unwrap();
        assert_eq!(first.image_url, "https://example.com/thumbs/abcd-101.jpg");

        let incomplete = page
            .blocks
            .iter()
            .filter(|b| matches!(b, ListingBlock::Incomplete { .. }))
            .count();
        assert_eq!(incomplete, 1);
    }

    #[test]
    fn test_entries_keep_source_order() {
        let html = r#"
            <div class="iH" id="VR ZZZ-009" style="background-image:url(/z.jpg)"></div>
            <div class="iH" id="VR AAA-001" style="background-image:url(/a.jpg)"></div>
            <div class="iH" id="VR MMM-005" style="background-image:url(/m.jpg)"></div>
        "#;

        let page = parse_listing_page(html, "VR", &page_url());
        let codes: Vec<_> = entries(&page).into_iter().map(|e| e.code).collect();

        assert_eq!(codes, vec!["ZZZ-009", "AAA-001", "MMM-005"]);
    }

    #[test]
    fn test_unmarked_element_is_skipped() {
        let html = r#"
            <div class="iH" id="HD ABC-123" style="background-image:url(/a.jpg)"></div>
            <div class="iH" style="background-image:url(/b.jpg)"></div>
        "#;

        let page = parse_listing_page(html, "VR", &page_url());

        assert_eq!(page.blocks, vec![ListingBlock::Unmarked, ListingBlock::Unmarked]);
        assert!(entries(&page).is_empty());
    }

    #[test]
    fn test_unparsable_style_is_incomplete() {
        let html = r#"
            <div class="iH" id="VR ABC-123" style="background-image:url(/a.jpg"></div>
            <div class="iH" id="VR ABC-124" style="color: red"></div>
            <div class="iH" id="VR ABC-125" style="background-image:url('')"></div>
            <div class="iH" id="VR ABC-126"></div>
        "#;

        let page = parse_listing_page(html, "VR", &page_url());

        assert!(entries(&page).is_empty());
        assert_eq!(page.blocks.len(), 4);
        assert_eq!(
            page.blocks[0],
            ListingBlock::Incomplete {
                id: "VR ABC-123".to_string()
            }
        );
    }

    #[test]
    fn test_marker_only_id_is_incomplete() {
        let html = r#"<div class="iH" id="VR " style="background-image:url(/a.jpg)"></div>"#;

        let page = parse_listing_page(html, "VR", &page_url());

        assert!(matches!(page.blocks[0], ListingBlock::Incomplete { .. }));
    }

    #[test]
    fn test_non_container_elements_ignored() {
        let html = r#"
            <div id="VR ABC-123" style="background-image:url(/a.jpg)"></div>
            <span class="iH" id="VR ABC-124" style="background-image:url(/b.jpg)"></span>
        "#;

        let page = parse_listing_page(html, "VR", &page_url());

        assert!(page.blocks.is_empty());
    }

    #[test]
    fn test_parse_background_image_variants() {
        let url = page_url();

        assert_eq!(
            parse_background_image("background-image:url('/img/a.jpg')", &url).as_deref(),
            Some("https://example.com/img/a.jpg")
        );
        assert_eq!(
            parse_background_image(
                r#"width:100px; background-image: url("https://cdn.example.net/b.jpg");"#,
                &url
            )
            .as_deref(),
            Some("https://cdn.example.net/b.jpg")
        );
        assert_eq!(parse_background_image("background:red", &url), None);
        assert_eq!(parse_background_image("background-image:url()", &url), None);
    }

    #[test]
    fn test_last_page_from_pages_label() {
        let html = r#"
            <div class="nav">
                <strong>Pages:</strong>
                <a href="/main/2025/05-14-16/">1</a>
                <a href="/main/2025/05-14-16/2/">2</a>
                <a href="/main/2025/05-14-16/4/">4</a>
                <a href="/main/2025/05-14-16/2/">Next</a>
            </div>
        "#;

        let page = parse_listing_page(html, "VR", &page_url());

        assert_eq!(page.last_page, Some(4));
    }

    #[test]
    fn test_links_before_label_not_counted() {
        let html = r#"
            <div class="nav">
                <a href="/9/">9</a>
                <strong>Pages:</strong>
                <a href="/2/">2</a>
            </div>
        "#;

        let page = parse_listing_page(html, "VR", &page_url());

        assert_eq!(page.last_page, Some(2));
    }

    #[test]
    fn test_pages_label_without_links() {
        let html = r#"<p><strong>Pages:</strong> <span>1</span></p>"#;

        let page = parse_listing_page(html, "VR", &page_url());

        assert_eq!(page.last_page, Some(0));
    }

    #[test]
    fn test_no_pages_label() {
        let html = r#"<p><strong>Archive</strong> <a href="/2/">2</a></p>"#;

        let page = parse_listing_page(html, "VR", &page_url());

        assert_eq!(page.last_page, None);
    }
}
