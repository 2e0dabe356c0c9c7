use std::sync::LazyLock;

use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};

use super::table::element_text;

static P_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

/// Lead paragraphs: the first `<p>` and its following `<p>` siblings, up to
/// the first `<div>` or the table of contents.
pub fn extract(doc: &Html) -> Option<String> {
    let first = doc.select(&P_SEL).next()?;
    let mut parts = vec![element_text(first)];

    for node in first.next_siblings() {
        let Some(el) = ElementRef::wrap(node) else {
            continue;
        };
        if el.value().name() == "div" || el.value().id() == Some("toc") {
            break;
        }
        if el.value().name() == "p" {
            parts.push(element_text(el));
        }
    }

    let joined = parts.into_iter().filter(|p| !p.is_empty()).join(" ");
    (!joined.is_empty()).then_some(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_at_toc() {
        let html = r#"<div class="mw-parser-output">
            <table style="float:right"><tr><th>Designed by</th><td>A</td></tr></table>
            <p>First   paragraph.</p>
            <p>Second <b>bold</b> paragraph.</p>
            <div id="toc">Contents</div>
            <p>After the toc.</p>
        </div>"#;
        let text = extract(&Html::parse_document(html)).unwrap();
        assert_eq!(text, "First paragraph. Second bold paragraph.");
    }

    #[test]
    fn skips_non_paragraph_siblings() {
        let html = "<p>One.</p><pre>code</pre><p>Two.</p><h2>Syntax</h2><p>Three.</p>";
        let text = extract(&Html::parse_document(html)).unwrap();
        assert_eq!(text, "One. Two. Three.");
    }

    #[test]
    fn page_without_paragraphs() {
        assert_eq!(extract(&Html::parse_document("<div>nothing</div>")), None);
    }
}
