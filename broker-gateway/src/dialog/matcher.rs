//! Picks an instrument out of the search results of the order dialog.

use crate::driver::{By, ElementHandle};
use crate::error::{GatewayError, Result};
use crate::page::Page;
use log::debug;

/// A selected search result.
#[derive(Debug, Clone)]
pub struct Match {
    pub element: ElementHandle,
    pub name: String,
    /// 1-based row index.
    pub position: usize,
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Case-insensitive substring test in both directions, ignoring
/// punctuation, so "eurusd" matches "EUR/USD".
pub fn names_match(request: &str, candidate: &str) -> bool {
    let request = normalize(request);
    let candidate = normalize(candidate);
    if candidate.is_empty() {
        return false;
    }
    candidate.contains(&request) || request.contains(&candidate)
}

/// Walks the result rows in order until one matches `request`.
///
/// The list ends at the first row without a name, which fails with
/// `InstrumentNotFound`.
pub async fn search(page: &Page, request: &str) -> Result<Match> {
    let selectors = page.selectors();
    let name_by = By::css(&selectors.result_name);
    let mut position = 1;
    loop {
        let row_by = By::xpath(format!("{}[{}]", selectors.result_row, position));
        let row = page.find(&row_by).await?;
        let name = match &row {
            Some(row) => page.text_in(row, &name_by).await?,
            None => String::new(),
        };
        let name = name.trim();

        match row {
            Some(element) if !name.is_empty() => {
                if names_match(request, name) {
                    debug!("Instrument {} matched '{}' at row {}", request, name, position);
                    return Ok(Match {
                        element,
                        name: name.to_string(),
                        position,
                    });
                }
            }
            _ => return Err(GatewayError::InstrumentNotFound(request.to_string())),
        }
        position += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Timings;
    use crate::driver::fake::{FakeDriver, FakeElement};
    use crate::selectors::Selectors;
    use std::sync::Arc;

    fn page_with_results(names: &[&str]) -> Page {
        let s = Selectors::default();
        let driver = FakeDriver::new();
        for (i, name) in names.iter().enumerate() {
            driver.add(
                By::xpath(format!("{}[{}]", s.result_row, i + 1)),
                FakeElement::new().with_child(By::css(&s.result_name), FakeElement::text(*name)),
            );
        }
        Page::new(Arc::new(driver), s, Timings::immediate())
    }

    #[test]
    fn test_names_match() {
        assert!(names_match("eurusd", "EUR/USD"));
        assert!(names_match("EURUSD", "EUR/USD Euro vs Dollar"));
        assert!(names_match("Apple Inc.", "apple"));
        assert!(!names_match("eurusd", "EUR/GBP"));
        assert!(!names_match("eurusd", " / "));
    }

    #[tokio::test]
    async fn test_search_returns_first_match() {
        let page = page_with_results(&["EUR/USD", "EUR/GBP", ""]);
        let found = search(&page, "eurusd").await.unwrap();
        assert_eq!(found.position, 1);
        assert_eq!(found.name, "EUR/USD");

        let found = search(&page, "EURGBP").await.unwrap();
        assert_eq!(found.position, 2);
    }

    #[tokio::test]
    async fn test_search_stops_at_empty_sentinel() {
        let page = page_with_results(&["EUR/USD", "EUR/GBP", ""]);
        let err = search(&page, "XYZ").await.unwrap_err();
        assert!(matches!(err, GatewayError::InstrumentNotFound(ref name) if name == "XYZ"));
    }

    #[tokio::test]
    async fn test_search_stops_when_rows_run_out() {
        let page = page_with_results(&["GBP/JPY"]);
        assert!(search(&page, "XYZ").await.is_err());
    }
}
