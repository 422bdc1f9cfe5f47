use scraper::{Html, Selector};

/// Pulls readable text out of a fetched page, preferring semantic content
/// containers before falling back to the whole document.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    for selector_str in ["article", "main", "body"] {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
            if !text.is_empty() {
                return text;
            }
        }
    }

    clean_text(&document.root_element().text().collect::<Vec<_>>().join(" "))
}

fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_article_over_body() {
        let html = r#"
            <html><body>
                <nav>Navigation junk</nav>
                <article><p>The actual story text.</p></article>
            </body></html>
        "#;
        assert_eq!(extract_text(html), "The actual story text.");
    }

    #[test]
    fn test_falls_back_to_body() {
        let html = "<html><body><p>Plain  page   content.</p></body></html>";
        assert_eq!(extract_text(html), "Plain page content.");
    }

    #[test]
    fn test_normalizes_whitespace() {
        let html = "<html><body><main>line one\n\n   line two</main></body></html>";
        assert_eq!(extract_text(html), "line one line two");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(extract_text(""), "");
    }
}
