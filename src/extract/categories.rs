use std::sync::LazyLock;

use scraper::{Html, Selector};

static CATLINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#mw-normal-catlinks li").unwrap());

/// Category labels in display order, exactly as shown (trimmed only).
pub fn extract(doc: &Html) -> Vec<String> {
    doc.select(&CATLINK_SEL)
        .map(|li| li.text().collect::<String>().trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_catlinks_in_order() {
        let html = std::fs::read_to_string("tests/fixtures/brainfuck.html").unwrap();
        let categories = extract(&Html::parse_document(&html));
        assert_eq!(
            categories,
            vec![
                "Languages",
                "Turing complete",
                "Cell-based",
                "1993",
                "Implemented",
                "Brainfuck derivatives",
                "Languages",
            ]
        );
    }

    #[test]
    fn hidden_categories_are_ignored() {
        let html = r#"<div id="catlinks">
            <div id="mw-normal-catlinks"><ul><li><a>Stack-based</a></li></ul></div>
            <div id="mw-hidden-catlinks"><ul><li><a>Pages with broken file links</a></li></ul></div>
        </div>"#;
        assert_eq!(extract(&Html::parse_document(html)), vec!["Stack-based"]);
    }

    #[test]
    fn no_container_means_no_categories() {
        assert!(extract(&Html::parse_document("<p>bare</p>")).is_empty());
    }
}
