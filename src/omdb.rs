use crate::{
    movie_db::MovieDb,
    types::{MovieDetail, SearchResultPage, SearchResultSummary},
};

use futures::{future::BoxFuture, FutureExt};
use isahc::{http::StatusCode, AsyncReadResponseExt};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub(crate) struct OmdbSearchResult {
    #[serde(rename = "Search", default)]
    search: Vec<SearchResultSummary>,
    #[serde(rename = "totalResults", default)]
    total_results: String,
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl From<OmdbSearchResult> for SearchResultPage {
    fn from(value: OmdbSearchResult) -> Self {
        SearchResultPage {
            items: value.search,
            total_count: value.total_results.parse().unwrap_or(0),
            ok: value.response == "True",
            error_message: value.error,
        }
    }
}

pub const OMDB_BASE_URI: &str = "https://www.omdbapi.com/";

#[derive(Debug, Error)]
pub enum OmdbError {
    #[error("failed to execute get")]
    Get(#[source] isahc::Error),
    #[error("unexpected response status {0}")]
    Status(StatusCode),
    #[error("failed to read get response")]
    Read(#[source] std::io::Error),
    #[error("failed to parse json data")]
    Parse(#[source] serde_json::Error),
}

pub struct OmdbClient {
    api_key: String,
    base_uri: String,
}

impl OmdbClient {
    pub fn new(api_key: String, base_uri: String) -> OmdbClient {
        OmdbClient { api_key, base_uri }
    }

    fn request<T>(&self, params: &str) -> BoxFuture<'static, Result<T, OmdbError>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let mut url = format!("{}?{}&apikey=", self.base_uri, params);
        debug!("Sending request to {url}xxxxx");
        url.push_str(&self.api_key);

        async move {
            use OmdbError::*;

            let mut response = isahc::get_async(url).await.map_err(Get)?;
            if !response.status().is_success() {
                return Err(Status(response.status()));
            }

            let body_s = response.text().await.map_err(Read)?;

            debug!("Returned content {}", body_s);
            serde_json::from_str(&body_s).map_err(Parse)
        }
        .boxed()
    }
}

impl MovieDb for OmdbClient {
    fn search(
        &self,
        query: &str,
        page: u32,
    ) -> BoxFuture<'static, Result<SearchResultPage, OmdbError>> {
        let params = format!("s={}&page={page}", urlencoding::encode(query));
        self.request::<OmdbSearchResult>(&params)
            .map(|res| res.map(Into::into))
            .boxed()
    }

    fn movie(&self, imdb_id: &str) -> BoxFuture<'static, Result<MovieDetail, OmdbError>> {
        self.request(&format!("i={}", urlencoding::encode(imdb_id)))
    }
}
