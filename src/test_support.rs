use futures::{
    channel::oneshot,
    future::{self, BoxFuture},
    FutureExt,
};
use isahc::http::StatusCode;

use std::{collections::HashMap, sync::Mutex};

use crate::{
    movie_db::MovieDb,
    omdb::OmdbError,
    types::{MovieDetail, SearchResultPage, SearchResultSummary},
};

pub fn summary(title: &str, imdb_id: &str) -> SearchResultSummary {
    SearchResultSummary {
        title: title.to_string(),
        year: "1995".to_string(),
        imdb_id: imdb_id.to_string(),
        media_type: "movie".to_string(),
        poster: "N/A".to_string(),
    }
}

pub fn page_of(items: Vec<SearchResultSummary>, total_count: u64) -> SearchResultPage {
    SearchResultPage {
        items,
        total_count,
        ok: true,
        error_message: None,
    }
}

pub fn not_found_page() -> SearchResultPage {
    SearchResultPage {
        items: Vec::new(),
        total_count: 0,
        ok: false,
        error_message: Some("Movie not found!".to_string()),
    }
}

type PageKey = (String, u32);

/// In memory movie database. `None` entries fail at the transport level.
///
/// A gated database holds every response back until the test calls `release` for it, which
/// lets tests pick the order responses arrive in.
#[derive(Default)]
pub struct FakeMovieDb {
    gated: bool,
    pages: HashMap<PageKey, Option<SearchResultPage>>,
    movies: HashMap<String, Option<MovieDetail>>,
    gates: Mutex<HashMap<PageKey, Vec<oneshot::Sender<()>>>>,
    search_calls: Mutex<Vec<PageKey>>,
    movie_calls: Mutex<Vec<String>>,
}

impl FakeMovieDb {
    pub fn new() -> FakeMovieDb {
        FakeMovieDb::default()
    }

    pub fn gated() -> FakeMovieDb {
        FakeMovieDb {
            gated: true,
            ..Default::default()
        }
    }

    pub fn with_page(mut self, query: &str, page: u32, result: SearchResultPage) -> FakeMovieDb {
        self.pages.insert((query.to_string(), page), Some(result));
        self
    }

    pub fn with_failed_page(mut self, query: &str, page: u32) -> FakeMovieDb {
        self.pages.insert((query.to_string(), page), None);
        self
    }

    pub fn with_movie(mut self, movie: MovieDetail) -> FakeMovieDb {
        self.movies.insert(movie.imdb_id.clone(), Some(movie));
        self
    }

    pub fn with_failed_movie(mut self, imdb_id: &str) -> FakeMovieDb {
        self.movies.insert(imdb_id.to_string(), None);
        self
    }

    /// Lets the held back responses for `(query, page)` through
    pub fn release(&self, query: &str, page: u32) {
        let mut gates = self.gates.lock().expect("Poisoned lock");
        for gate in gates.remove(&(query.to_string(), page)).unwrap_or_default() {
            let _ = gate.send(());
        }
    }

    pub fn search_calls(&self) -> Vec<PageKey> {
        self.search_calls.lock().expect("Poisoned lock").clone()
    }

    pub fn movie_calls(&self) -> Vec<String> {
        self.movie_calls.lock().expect("Poisoned lock").clone()
    }
}

impl MovieDb for FakeMovieDb {
    fn search(
        &self,
        query: &str,
        page: u32,
    ) -> BoxFuture<'static, Result<SearchResultPage, OmdbError>> {
        let key = (query.to_string(), page);
        self.search_calls
            .lock()
            .expect("Poisoned lock")
            .push(key.clone());

        let response = match self.pages.get(&key) {
            Some(Some(page)) => Ok(page.clone()),
            Some(None) => Err(OmdbError::Status(StatusCode::BAD_GATEWAY)),
            None => Ok(not_found_page()),
        };

        if !self.gated {
            return future::ready(response).boxed();
        }

        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .expect("Poisoned lock")
            .entry(key)
            .or_default()
            .push(tx);

        async move {
            let _ = rx.await;
            response
        }
        .boxed()
    }

    fn movie(&self, imdb_id: &str) -> BoxFuture<'static, Result<MovieDetail, OmdbError>> {
        self.movie_calls
            .lock()
            .expect("Poisoned lock")
            .push(imdb_id.to_string());

        let response = match self.movies.get(imdb_id) {
            Some(Some(movie)) => Ok(movie.clone()),
            Some(None) => Err(OmdbError::Status(StatusCode::BAD_GATEWAY)),
            None => Ok(MovieDetail {
                response: "False".to_string(),
                error: "Incorrect IMDb ID.".to_string(),
                ..Default::default()
            }),
        };
        future::ready(response).boxed()
    }
}
