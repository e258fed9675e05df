//! iTunes Search API integration
//!
//! Builds search URLs, performs the blocking search request and decodes the
//! artwork URLs out of the JSON response.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::config::ItunesConfig;
use crate::gallery::MIN_IMAGES;

/// Maximum number of results requested from the API
pub const SEARCH_LIMIT: usize = 200;

/// Errors raised while fetching a search result
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("Failed to parse iTunes response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0} distinct results found, but {min} or more are needed.", min = MIN_IMAGES)]
    InsufficientResults(usize),
}

/// Media types accepted by the search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaType {
    Movie,
    Podcast,
    #[default]
    Music,
    MusicVideo,
    AudioBook,
    ShortFilm,
    TvShow,
    Software,
    Ebook,
    All,
}

impl MediaType {
    /// Every media type, in the order shown in the dropdown
    pub const ALL: [MediaType; 10] = [
        MediaType::Movie,
        MediaType::Podcast,
        MediaType::Music,
        MediaType::MusicVideo,
        MediaType::AudioBook,
        MediaType::ShortFilm,
        MediaType::TvShow,
        MediaType::Software,
        MediaType::Ebook,
        MediaType::All,
    ];

    /// Query parameter value
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Podcast => "podcast",
            MediaType::Music => "music",
            MediaType::MusicVideo => "musicVideo",
            MediaType::AudioBook => "audioBook",
            MediaType::ShortFilm => "shortFilm",
            MediaType::TvShow => "tvShow",
            MediaType::Software => "software",
            MediaType::Ebook => "ebook",
            MediaType::All => "all",
        }
    }

    /// Parse a query parameter value (exact match)
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|media| media.as_str() == s)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single search as entered by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Free-form search term (encoded when the URL is built)
    pub term: String,
    /// Media type filter
    pub media: MediaType,
}

impl SearchRequest {
    pub fn new(term: impl Into<String>, media: MediaType) -> Self {
        Self {
            term: term.into(),
            media,
        }
    }

    /// Full request URL against the given endpoint
    pub fn location(&self, endpoint: &str) -> String {
        format!(
            "{}?term={}&limit={}&media={}",
            endpoint,
            urlencoding::encode(&self.term),
            SEARCH_LIMIT,
            urlencoding::encode(self.media.as_str())
        )
    }
}

/// Decoded search response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// `resultCount` as reported by the API
    pub result_count: usize,
    /// Artwork URLs in API order, at most [`SEARCH_LIMIT`]
    pub artwork_urls: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ItunesResponse {
    #[serde(rename = "resultCount")]
    result_count: usize,
    #[serde(default)]
    results: Vec<ItunesResult>,
}

#[derive(Debug, Deserialize)]
struct ItunesResult {
    #[serde(rename = "artworkUrl100")]
    artwork_url: Option<String>,
}

/// Decode a search response body
///
/// Results without an `artworkUrl100` are skipped.
pub fn decode_response(body: &str) -> Result<SearchResult, FetchError> {
    let response: ItunesResponse = serde_json::from_str(body)?;

    let artwork_urls: Vec<String> = response
        .results
        .into_iter()
        .filter_map(|r| r.artwork_url)
        .filter(|url| !url.is_empty())
        .take(SEARCH_LIMIT)
        .collect();

    Ok(SearchResult {
        result_count: response.result_count,
        artwork_urls,
    })
}

/// Blocking client for the search endpoint and artwork hosts
#[derive(Debug, Clone)]
pub struct ItunesClient {
    http: Client,
    endpoint: String,
}

impl ItunesClient {
    pub fn new(config: &ItunesConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("iTunes-Gallery/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Request URL for a search against this client's endpoint
    pub fn location(&self, request: &SearchRequest) -> String {
        request.location(&self.endpoint)
    }

    /// Run a search and decode its artwork URLs
    ///
    /// The threshold counts results that carry an `artworkUrl100`, not the
    /// reported `resultCount`: fewer than [`MIN_IMAGES`] displayable results
    /// fail with [`FetchError::InsufficientResults`] holding that count.
    pub fn fetch(&self, request: &SearchRequest) -> Result<SearchResult, FetchError> {
        let location = self.location(request);
        log::info!("iTunes search: {}", location);

        let response = self.http.get(&location).send()?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().unwrap_or_default();
            log::error!("iTunes API error response: {} - {}", status, body);
            return Err(FetchError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text()?;
        let result = decode_response(&body)?;

        let count = result.artwork_urls.len();
        if count < MIN_IMAGES {
            log::warn!(
                "Only {} artwork results (resultCount {}) for {}",
                count,
                result.result_count,
                location
            );
            return Err(FetchError::InsufficientResults(count));
        }

        log::info!(
            "iTunes search returned {} results, using {}",
            result.result_count,
            count
        );
        Ok(result)
    }

    /// Download the raw bytes of one artwork image
    pub fn fetch_image_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.http.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus {
                status: status.as_u16(),
                body: String::new(),
            });
        }

        Ok(response.bytes()?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server::{self, artwork_body};

    fn client_for(endpoint: String) -> ItunesClient {
        ItunesClient::new(&ItunesConfig {
            endpoint,
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_media_type_round_trip_names() {
        assert_eq!(MediaType::default(), MediaType::Music);
        assert_eq!(MediaType::parse("musicVideo"), Some(MediaType::MusicVideo));
        assert_eq!(MediaType::parse("tvShow"), Some(MediaType::TvShow));
        assert_eq!(MediaType::parse("Music"), None);
        assert_eq!(MediaType::ALL.len(), 10);
        assert_eq!(MediaType::Ebook.to_string(), "ebook");
    }

    #[test]
    fn test_location_encodes_term() {
        let request = SearchRequest::new("daft punk & co", MediaType::Music);
        assert_eq!(
            request.location("https://itunes.apple.com/search"),
            "https://itunes.apple.com/search?term=daft%20punk%20%26%20co&limit=200&media=music"
        );
    }

    #[test]
    fn test_decode_response_keeps_order() {
        let body = artwork_body("http://art.example", 45);
        let result = decode_response(&body).unwrap();
        assert_eq!(result.result_count, 45);
        assert_eq!(result.artwork_urls.len(), 45);
        assert_eq!(result.artwork_urls[0], "http://art.example/art/0.png");
        assert_eq!(result.artwork_urls[44], "http://art.example/art/44.png");
    }

    #[test]
    fn test_decode_response_truncates_to_limit() {
        let body = artwork_body("http://art.example", 250);
        let result = decode_response(&body).unwrap();
        assert_eq!(result.result_count, 250);
        assert_eq!(result.artwork_urls.len(), SEARCH_LIMIT);
        assert_eq!(result.artwork_urls[199], "http://art.example/art/199.png");
    }

    #[test]
    fn test_decode_response_skips_missing_artwork() {
        let body = r#"{
            "resultCount": 3,
            "results": [
                {"artworkUrl100": "http://a/1.jpg", "trackName": "One"},
                {"trackName": "No art"},
                {"artworkUrl100": "http://a/3.jpg"}
            ]
        }"#;
        let result = decode_response(body).unwrap();
        assert_eq!(result.result_count, 3);
        assert_eq!(result.artwork_urls, vec!["http://a/1.jpg", "http://a/3.jpg"]);
    }

    #[test]
    fn test_decode_response_rejects_malformed_json() {
        assert!(matches!(
            decode_response("{\"resultCount\": \"many\"}"),
            Err(FetchError::Decode(_))
        ));
        assert!(matches!(
            decode_response("<html>"),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn test_insufficient_results_message() {
        let message = FetchError::InsufficientResults(3).to_string();
        assert!(message.contains('3'));
        assert!(message.contains("21"));
    }

    #[test]
    fn test_fetch_success() {
        let server = test_server::spawn(|url, base| {
            assert!(url.starts_with("/search?term=cat&limit=200&media=music"));
            test_server::json(artwork_body(base, 45))
        });
        let client = client_for(format!("{}/search", server));

        let result = client
            .fetch(&SearchRequest::new("cat", MediaType::Music))
            .unwrap();
        assert_eq!(result.result_count, 45);
        assert_eq!(result.artwork_urls.len(), 45);
    }

    #[test]
    fn test_fetch_insufficient_results() {
        let server = test_server::spawn(|_, base| test_server::json(artwork_body(base, 3)));
        let client = client_for(format!("{}/search", server));

        let err = client
            .fetch(&SearchRequest::new("zz9plural", MediaType::Music))
            .unwrap_err();
        assert!(matches!(err, FetchError::InsufficientResults(3)));
    }

    #[test]
    fn test_fetch_exactly_twenty_is_insufficient() {
        let server = test_server::spawn(|_, base| test_server::json(artwork_body(base, 20)));
        let client = client_for(format!("{}/search", server));

        let err = client
            .fetch(&SearchRequest::new("twenty", MediaType::All))
            .unwrap_err();
        assert!(matches!(err, FetchError::InsufficientResults(20)));
    }

    #[test]
    fn test_fetch_counts_artwork_not_result_count() {
        let server = test_server::spawn(|_, base| {
            let results: Vec<serde_json::Value> = (0..30)
                .map(|i| {
                    if i % 2 == 0 {
                        serde_json::json!({ "artworkUrl100": format!("{}/art/{}.png", base, i) })
                    } else {
                        serde_json::json!({ "trackName": "no artwork" })
                    }
                })
                .collect();
            test_server::json(
                serde_json::json!({ "resultCount": 30, "results": results }).to_string(),
            )
        });
        let client = client_for(format!("{}/search", server));

        let err = client
            .fetch(&SearchRequest::new("sparse art", MediaType::Music))
            .unwrap_err();
        assert!(matches!(err, FetchError::InsufficientResults(15)));
    }

    #[test]
    fn test_fetch_bad_status() {
        let server = test_server::spawn(|_, _| {
            tiny_http::Response::from_string("try later").with_status_code(503)
        });
        let client = client_for(format!("{}/search", server));

        match client.fetch(&SearchRequest::new("cat", MediaType::Music)) {
            Err(FetchError::BadStatus { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "try later");
            }
            other => panic!("expected BadStatus, got {:?}", other),
        }
    }

    #[test]
    fn test_fetch_decode_error() {
        let server = test_server::spawn(|_, _| test_server::json("not json".to_string()));
        let client = client_for(format!("{}/search", server));

        let err = client
            .fetch(&SearchRequest::new("cat", MediaType::Music))
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn test_fetch_connection_refused() {
        let client = client_for(format!("{}/search", test_server::closed_address()));

        let err = client
            .fetch(&SearchRequest::new("cat", MediaType::Music))
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[test]
    #[ignore] // Requires network access
    fn test_live_search() {
        let client = ItunesClient::new(&ItunesConfig::default()).unwrap();
        let result = client
            .fetch(&SearchRequest::new("jack johnson", MediaType::Music))
            .unwrap();
        assert!(result.artwork_urls.len() > 20);
    }
}
