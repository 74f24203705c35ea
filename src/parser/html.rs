//! Small helpers over `scraper` used by the site adapters.

use scraper::{ElementRef, Node, Selector};

/// Compiles a selector literal known to be valid
pub fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector '{}': {:?}", css, e))
}

/// Element text with whitespace runs collapsed to single spaces
pub fn clean_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

/// Following sibling elements, skipping text and comment nodes
pub fn next_element_siblings<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.next_siblings().filter_map(ElementRef::wrap)
}

/// First following sibling element with the given tag name
pub fn next_sibling_named<'a>(element: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    next_element_siblings(element).find(|sibling| sibling.value().name() == tag)
}

/// First `tag.class` element after `after` in document order, within `scope`
pub fn next_in_document<'a>(
    scope: ElementRef<'a>,
    after: ElementRef<'a>,
    tag: &str,
    class: Option<&str>,
) -> Option<ElementRef<'a>> {
    scope
        .descendants()
        .skip_while(|node| node.id() != after.id())
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|element| {
            element.value().name() == tag && class.map_or(true, |class| has_class(*element, class))
        })
}

/// Text of the first direct child text node that is not blank
pub fn first_own_text(element: ElementRef<'_>) -> Option<String> {
    element
        .children()
        .filter_map(|child| match child.value() {
            Node::Text(text) => Some(collapse_whitespace(text)),
            _ => None,
        })
        .find(|text| !text.is_empty())
}

/// First non-blank text following the first `<br>` child
pub fn text_after_br(element: ElementRef<'_>) -> Option<String> {
    let br = element
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == "br")?;
    br.next_siblings()
        .find_map(|node| match node.value() {
            Node::Text(text) => Some(collapse_whitespace(text)),
            Node::Element(_) => ElementRef::wrap(node).map(clean_text),
            _ => None,
        }
        .filter(|text| !text.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_text_helpers() {
        let html = Html::parse_fragment(
            r#"<div><p class="mb-0 x">  з 01.2020
            по 02.2021 <br>Acme, Kyiv</p><p class="h5">next</p></div>"#,
        );
        let p = html.select(&selector("p.mb-0")).next().unwrap();
        assert!(has_class(p, "x"));
        assert_eq!(first_own_text(p).as_deref(), Some("з 01.2020 по 02.2021"));
        assert_eq!(text_after_br(p).as_deref(), Some("Acme, Kyiv"));
        let next = next_sibling_named(p, "p").unwrap();
        assert_eq!(clean_text(next), "next");
        let root = html.select(&selector("div")).next().unwrap();
        let h5 = next_in_document(root, p, "p", Some("h5")).unwrap();
        assert_eq!(clean_text(h5), "next");
        assert!(next_in_document(root, h5, "p", None).is_none());
    }

    #[test]
    fn test_text_after_br_skips_indentation() {
        let html = Html::parse_fragment(
            "<p class=\"mb-0\">з 01.2020 по 01.2021<br>\n   <span>Acme, Kyiv</span></p>",
        );
        let p = html.select(&selector("p.mb-0")).next().unwrap();
        assert_eq!(text_after_br(p).as_deref(), Some("Acme, Kyiv"));

        let html = Html::parse_fragment("<p>з 01.2020 по 01.2021<br>\n  </p>");
        let p = html.select(&selector("p")).next().unwrap();
        assert_eq!(text_after_br(p), None);
    }
}
