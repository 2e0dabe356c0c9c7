use std::sync::LazyLock;

use scraper::{Html, Selector};

static LI_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());
static LINK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// The language list ends where links to the general article begin.
const END_MARKER: &str = "Esoteric programming language";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageLink {
    /// Link title; `None` when the index entry carries no title.
    pub name: Option<String>,
    pub url: String,
}

/// Parse the language list page into `(name, absolute url)` entries.
pub fn extract(doc: &Html, wiki_base_url: &str) -> Vec<LanguageLink> {
    let base = wiki_base_url.trim_end_matches('/');
    let mut links = Vec::new();

    for li in doc.select(&LI_SEL) {
        let Some(a) = li.select(&LINK_SEL).next() else {
            continue;
        };
        let name = a
            .value()
            .attr("title")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        if name.as_deref() == Some(END_MARKER) {
            break;
        }
        let Some(href) = a.value().attr("href").filter(|h| !h.starts_with('#')) else {
            continue;
        };
        links.push(LanguageLink {
            name,
            url: absolute_url(base, href),
        });
    }
    links
}

/// Resolve `href` against a base without a trailing slash.
fn absolute_url(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", base, href)
    } else {
        format!("{}/{}", base, href)
    }
}
