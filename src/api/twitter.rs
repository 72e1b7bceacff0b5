//! X/Twitter v2 recent-search client
//!
//! Pages through `/2/tweets/search/recent` until the requested number of
//! posts is collected or the API reports no further pages.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{build_http_client, send_with_retry, PostSource};
use crate::config::{HttpSettings, SentimentSettings};
use crate::error::{AdvisorError, Result};

const SERVICE: &str = "Twitter";

/// The endpoint accepts page sizes in this range
const MIN_PAGE_SIZE: usize = 10;
const MAX_PAGE_SIZE: usize = 100;

/// Trailing legal-form words dropped from listing names
const CORPORATE_SUFFIXES: [&str; 10] = [
    "inc", "incorporated", "corp", "corporation", "co", "ltd", "limited", "plc", "holdings", "n.v",
];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Tweet>,
    #[serde(default)]
    meta: SearchMeta,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    text: String,
}

#[derive(Debug, Default, Deserialize)]
struct SearchMeta {
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProblemResponse {
    title: Option<String>,
    detail: Option<String>,
}

/// One page of search results
#[derive(Debug, Default, PartialEq)]
struct SearchPage {
    texts: Vec<String>,
    next_token: Option<String>,
}

/// Recent-search client authenticated with an app bearer token
pub struct TwitterClient {
    base_url: String,
    bearer_token: Option<String>,
    bearer_token_env: String,
    client: Client,
    max_retries: u32,
}

impl TwitterClient {
    /// Create a client; the token comes from config or the configured env var
    ///
    /// A missing token is reported by the first search, not here.
    pub fn new(settings: &SentimentSettings, http: &HttpSettings) -> Result<Self> {
        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            bearer_token: settings.get_bearer_token(),
            bearer_token_env: settings.bearer_token_env.clone(),
            client: build_http_client(http)?,
            max_retries: http.max_retries,
        })
    }

    /// Search query text for posts about `company` in `language`
    ///
    /// Listing names such as `"Apple Inc. - Common Stock"` are reduced to
    /// the core name; multi-word names are quoted as a phrase.
    pub fn build_query(company: &str, language: &str) -> String {
        let name = search_name(company);
        let term = if name.contains(char::is_whitespace) {
            format!("\"{}\"", name)
        } else {
            name
        };
        format!("{} lang:{}", term, language)
    }

    fn token(&self) -> Result<&str> {
        self.bearer_token
            .as_deref()
            .ok_or_else(|| AdvisorError::MissingCredentials {
                service: SERVICE,
                env_var: self.bearer_token_env.clone(),
            })
    }

    fn fetch_page(&self, query: &str, page_size: usize, next_token: Option<&str>) -> Result<SearchPage> {
        let bearer_token = self.token()?;
        let url = format!("{}/2/tweets/search/recent", self.base_url);
        let page_size = page_size.to_string();

        let response = send_with_retry(
            || {
                let mut params = vec![("query", query), ("max_results", page_size.as_str())];
                if let Some(token) = next_token {
                    params.push(("next_token", token));
                }
                self.client
                    .get(&url)
                    .bearer_auth(bearer_token)
                    .query(&params)
            },
            self.max_retries,
            SERVICE,
        )?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        parse_search_page(&body).map_err(|e| AdvisorError::Api {
            service: SERVICE,
            message: format!("unexpected response: {}", e),
        })
    }
}

impl PostSource for TwitterClient {
    fn search(&self, query: &str, max_results: usize, language: &str) -> Result<Vec<String>> {
        self.token()?;
        let query = Self::build_query(query, language);
        let mut texts = Vec::with_capacity(max_results);
        let mut next_token: Option<String> = None;

        log::debug!("Searching recent posts for [{}]", query);

        while texts.len() < max_results {
            let remaining = max_results - texts.len();
            let page_size = remaining.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);

            let page = self.fetch_page(&query, page_size, next_token.as_deref())?;
            let fetched = page.texts.len();
            texts.extend(page.texts.into_iter().take(remaining));

            match page.next_token {
                Some(token) if fetched > 0 => next_token = Some(token),
                _ => break,
            }
        }

        log::info!("Retrieved {} posts for [{}]", texts.len(), query);
        Ok(texts)
    }
}

/// Core company name of a listing name
///
/// Drops the share-class part after ` - `, then trailing legal-form words
/// such as `Inc.` or `Corporation`, and any quotes.
fn search_name(company: &str) -> String {
    let listing = company.split(" - ").next().unwrap_or(company);
    let mut words: Vec<&str> = listing.split_whitespace().collect();

    while words.len() > 1 {
        let Some(last) = words.last() else { break };
        let bare = last.trim_end_matches(|c: char| c == ',' || c == '.').to_lowercase();
        if CORPORATE_SUFFIXES.contains(&bare.as_str()) {
            words.pop();
        } else {
            break;
        }
    }

    words
        .join(" ")
        .trim_end_matches(|c: char| c == ',' || c == '.')
        .replace('"', "")
}

fn parse_search_page(body: &str) -> std::result::Result<SearchPage, serde_json::Error> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(SearchPage {
        texts: response.data.into_iter().map(|t| t.text).collect(),
        next_token: response.meta.next_token,
    })
}

fn api_error(status: StatusCode, body: &str) -> AdvisorError {
    let detail = serde_json::from_str::<ProblemResponse>(body)
        .ok()
        .and_then(|p| p.detail.or(p.title))
        .unwrap_or_else(|| body.chars().take(200).collect());

    let message = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            format!("authentication failed (HTTP {}): {}", status, detail)
        }
        _ => format!("HTTP {}: {}", status, detail),
    };

    AdvisorError::Api {
        service: SERVICE,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::data::symbols::SymbolTable;

    #[test]
    fn test_build_query() {
        assert_eq!(TwitterClient::build_query("Apple", "en"), "Apple lang:en");
        assert_eq!(TwitterClient::build_query(" Tesla, Inc. ", "en"), "Tesla lang:en");
        assert_eq!(
            TwitterClient::build_query("Advanced Micro Devices, Inc. - Common Stock", "de"),
            "\"Advanced Micro Devices\" lang:de"
        );
    }

    #[test]
    fn test_build_query_from_listing_names() {
        let table = SymbolTable::from_reader(include_str!("../../nasdaq_list.csv").as_bytes()).unwrap();
        let query = |symbol: &str| TwitterClient::build_query(&table.lookup(symbol).unwrap().name, "en");

        assert_eq!(query("aapl"), "Apple lang:en");
        assert_eq!(query("MSFT"), "Microsoft lang:en");
        assert_eq!(query("GOOGL"), "Alphabet lang:en");
        assert_eq!(query("META"), "\"Meta Platforms\" lang:en");
        assert_eq!(query("PYPL"), "PayPal lang:en");
        assert_eq!(query("NVDA"), "NVIDIA lang:en");
    }

    #[test]
    fn test_parse_search_page() {
        let body = r#"{
            "data": [
                {"id": "1", "text": "Apple beats earnings. Great quarter!"},
                {"id": "2", "text": "Not impressed with the new phone"}
            ],
            "meta": {"result_count": 2, "next_token": "b26v89c19zqg8o3f"}
        }"#;

        let page = parse_search_page(body).unwrap();
        assert_eq!(page.texts.len(), 2);
        assert_eq!(page.texts[1], "Not impressed with the new phone");
        assert_eq!(page.next_token.as_deref(), Some("b26v89c19zqg8o3f"));
    }

    #[test]
    fn test_parse_empty_page() {
        let page = parse_search_page(r#"{"meta": {"result_count": 0}}"#).unwrap();
        assert_eq!(page, SearchPage::default());
    }

    #[test]
    fn test_api_error_messages() {
        let err = api_error(
            StatusCode::UNAUTHORIZED,
            r#"{"title":"Unauthorized","type":"about:blank","status":401,"detail":"Unauthorized"}"#,
        );
        assert!(err.to_string().contains("authentication failed"));

        let err = api_error(StatusCode::BAD_REQUEST, "not json");
        assert!(err.to_string().contains("not json"));
    }

    #[test]
    fn test_missing_token() {
        let settings = SentimentSettings {
            bearer_token: None,
            bearer_token_env: "STOCK_ADVISOR_TEST_TWITTER_UNSET".to_string(),
            ..Default::default()
        };
        let client = TwitterClient::new(&settings, &HttpSettings::default()).unwrap();
        let result = client.search("Apple", 10, "en");
        assert!(matches!(
            result,
            Err(AdvisorError::MissingCredentials { ref env_var, .. }) if env_var == "STOCK_ADVISOR_TEST_TWITTER_UNSET"
        ));
    }

    #[test]
    #[ignore]
    fn test_search_live() {
        let client = TwitterClient::new(&SentimentSettings::default(), &HttpSettings::default()).unwrap();
        let posts = client.search("Apple", 10, "en").unwrap();
        assert!(posts.len() <= 10);
    }
}
