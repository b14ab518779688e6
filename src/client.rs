use futures::{future::BoxFuture, FutureExt};
use tracing::debug;

use std::{sync::Arc, time::Duration};

use crate::{
    cache::{FetchResult, RequestCache},
    movie_db::MovieDb,
    omdb::OmdbError,
    types::{MovieDetail, SearchResultPage},
};

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct SearchKey {
    pub query: String,
    pub page: u32,
}

pub type SearchFetch = FetchResult<Arc<SearchResultPage>, OmdbError>;
pub type MovieFetch = FetchResult<Arc<MovieDetail>, OmdbError>;

/// Movie database access shared by every screen. All requests go through one in memory cache
/// per endpoint.
pub struct MovieClient {
    db: Arc<dyn MovieDb>,
    searches: RequestCache<SearchKey, Arc<SearchResultPage>, OmdbError>,
    movies: RequestCache<String, Arc<MovieDetail>, OmdbError>,
}

impl MovieClient {
    pub fn new(db: Arc<dyn MovieDb>, ttl: Duration) -> MovieClient {
        MovieClient {
            db,
            searches: RequestCache::new(ttl),
            movies: RequestCache::new(ttl),
        }
    }

    pub fn search(&self, query: &str, page: u32) -> BoxFuture<'static, SearchFetch> {
        let key = SearchKey {
            query: query.to_string(),
            page,
        };
        self.searches.get_or_fetch(key, || {
            self.db
                .search(query, page)
                .map(|res| res.map(Arc::new))
                .boxed()
        })
    }

    pub fn movie(&self, imdb_id: &str) -> BoxFuture<'static, MovieFetch> {
        self.movies.get_or_fetch(imdb_id.to_string(), || {
            self.db.movie(imdb_id).map(|res| res.map(Arc::new)).boxed()
        })
    }

    /// Forget every cached page of `query`
    pub fn invalidate_search(&self, query: &str) {
        self.searches.invalidate(|key| key.query == query);
        debug!(
            "Invalidated pages for {query:?}, {} search entries left",
            self.searches.len()
        );
    }
}
