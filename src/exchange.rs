/// Exchange rate client
///
/// External collaborator for the protected endpoint: fetches the quote page
/// and pulls the current dollar value out of the `input#nacional` element.
/// No retries and no caching here; a failed fetch is reported as is.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{AppError, FetchError};

lazy_static! {
    static ref RATE_INPUT: Regex = Regex::new(r#"<input[^>]*\bid="nacional"[^>]*>"#).unwrap();
    static ref VALUE_ATTR: Regex = Regex::new(r#"value="([^"]*)""#).unwrap();
}

#[derive(Clone)]
pub struct ExchangeRateClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ExchangeRateClient {
    pub fn new(base_url: String, http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    /// Fetch the quote page and return the current dollar value as the page
    /// displays it (e.g. "5,43").
    pub async fn dollar_now(&self) -> Result<String, AppError> {
        let response = self
            .http_client
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| FetchError::Upstream(e.to_string()))?
            .error_for_status()
            .map_err(|e| FetchError::Upstream(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Upstream(e.to_string()))?;

        let rate = extract_rate(&body).ok_or(FetchError::MissingRate)?;

        tracing::debug!(rate = %rate, "dollar rate scraped");

        Ok(rate)
    }
}

/// Locate the `input` element with id `nacional` and read its `value`
/// attribute, tolerating any attribute order within the tag.
fn extract_rate(html: &str) -> Option<String> {
    let tag = RATE_INPUT.find(html)?;
    let value = VALUE_ATTR.captures(tag.as_str())?.get(1)?.as_str().trim();

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_rate_from_quote_page_markup() {
        let html = r#"<html><body>
            <input type="text" id="nacional" value="5,43">
        </body></html>"#;

        assert_eq!(extract_rate(html), Some("5,43".to_string()));
    }

    #[test]
    fn attribute_order_does_not_matter() {
        let html = r#"<input value="5,01" type="text" id="nacional">"#;

        assert_eq!(extract_rate(html), Some("5,01".to_string()));
    }

    #[test]
    fn page_without_rate_input_yields_none() {
        let html = r#"<html><body><input id="other" value="1,00"></body></html>"#;

        assert_eq!(extract_rate(html), None);
    }

    #[test]
    fn empty_value_yields_none() {
        let html = r#"<input id="nacional" value="">"#;

        assert_eq!(extract_rate(html), None);
    }
}
