//! Debounced search box.

use std::time::Duration;

use crate::config::UiConfig;
use crate::debounce::Debouncer;
use crate::page::Element;

pub const LOADING_HTML: &str = r#"<div class="text-center"><div class="loading"></div></div>"#;
pub const PLACEHOLDER_HTML: &str =
    r#"<div class="alert alert-info">Search functionality would be implemented here.</div>"#;

/// Renders search state into the results area.
#[derive(Debug, Clone)]
pub struct SearchBox {
    results: Option<Element>,
    min_chars: usize,
    placeholder_delay: Duration,
}

impl SearchBox {
    pub fn new(results: Option<Element>, config: &UiConfig) -> Self {
        Self {
            results,
            min_chars: config.search_min_chars,
            placeholder_delay: config.search_placeholder_delay(),
        }
    }

    pub async fn perform_search(&self, query: &str) {
        let Some(results) = &self.results else {
            return;
        };

        // Length in UTF-16 units, as the browser reports it
        if query.encode_utf16().count() < self.min_chars {
            results.set_inner_html("");
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(query_len = query.len(), "search started");

        results.set_inner_html(LOADING_HTML);
        tokio::time::sleep(self.placeholder_delay).await;
        results.set_inner_html(PLACEHOLDER_HTML);
    }
}

/// Input handler for the `search` field.
pub struct SearchBinding {
    debouncer: Debouncer<String>,
}

impl SearchBinding {
    pub fn new(search: SearchBox, wait: Duration) -> Self {
        let debouncer = Debouncer::new(wait, move |query: String| {
            let search = search.clone();
            async move { search.perform_search(&query).await }
        });
        Self { debouncer }
    }

    pub fn on_input(&self, value: &str) {
        self.debouncer.call(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn search_box() -> (SearchBox, Element) {
        let results = Element::new("div").with_id("search-results").with_html("old");
        (SearchBox::new(Some(results.clone()), &UiConfig::default()), results)
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_clears_results() {
        let (search, results) = search_box();
        search.perform_search("a").await;
        assert_eq!(results.inner_html(), "");

        sleep(Duration::from_millis(600)).await;
        assert_eq!(results.inner_html(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_length_counts_utf16_units() {
        let (search, results) = search_box();
        let task = tokio::spawn(async move { search.perform_search("🎓").await });

        sleep(Duration::from_millis(1)).await;
        assert_eq!(results.inner_html(), LOADING_HTML);
        task.await.unwrap();
        assert_eq!(results.inner_html(), PLACEHOLDER_HTML);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_shows_loading_then_placeholder() {
        let (search, results) = search_box();
        let task = tokio::spawn(async move { search.perform_search("ab").await });

        sleep(Duration::from_millis(1)).await;
        assert_eq!(results.inner_html(), LOADING_HTML);

        sleep(Duration::from_millis(498)).await;
        assert_eq!(results.inner_html(), LOADING_HTML);

        sleep(Duration::from_millis(2)).await;
        assert_eq!(results.inner_html(), PLACEHOLDER_HTML);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_results_area_is_noop() {
        let search = SearchBox::new(None, &UiConfig::default());
        search.perform_search("alumni").await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_binding_debounces_keystrokes() {
        let (search, results) = search_box();
        let binding = SearchBinding::new(search, Duration::from_millis(300));

        binding.on_input("j");
        sleep(Duration::from_millis(100)).await;
        binding.on_input("jo");
        sleep(Duration::from_millis(299)).await;
        assert_eq!(results.inner_html(), "old");

        sleep(Duration::from_millis(2)).await;
        assert_eq!(results.inner_html(), LOADING_HTML);

        sleep(Duration::from_millis(500)).await;
        assert_eq!(results.inner_html(), PLACEHOLDER_HTML);
    }

    #[tokio::test(start_paused = true)]
    async fn test_binding_short_final_query_clears() {
        let (search, results) = search_box();
        let binding = SearchBinding::new(search, Duration::from_millis(300));

        binding.on_input("jo");
        sleep(Duration::from_millis(50)).await;
        binding.on_input("j");
        sleep(Duration::from_millis(400)).await;
        assert_eq!(results.inner_html(), "");
    }
}
