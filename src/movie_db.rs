use futures::future::BoxFuture;

use crate::{
    omdb::OmdbError,
    types::{MovieDetail, SearchResultPage},
};

/// Remote movie database the screens read from
pub trait MovieDb: Send + Sync + 'static {
    /// Fetch one page of results for `query`, pages are numbered from 1
    fn search(
        &self,
        query: &str,
        page: u32,
    ) -> BoxFuture<'static, Result<SearchResultPage, OmdbError>>;
    fn movie(&self, imdb_id: &str) -> BoxFuture<'static, Result<MovieDetail, OmdbError>>;
}
