//! iTunes Search API integration module
//!
//! Provides the blocking search client and the response decoder.

pub mod itunes;

#[cfg(test)]
pub(crate) mod test_server;

pub use itunes::{
    decode_response, FetchError, ItunesClient, MediaType, SearchRequest, SearchResult,
    SEARCH_LIMIT,
};
