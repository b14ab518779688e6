use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::warn;

use std::sync::{Arc, Mutex};

use crate::{
    client::MovieClient,
    omdb::OmdbError,
    rating::{self, Star, STAR_COUNT},
    types::MovieDetail,
};

#[derive(Debug, Clone)]
pub enum DetailState {
    Pending,
    Loaded(Arc<MovieDetail>),
    Failed(Arc<OmdbError>),
}

#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub struct DetailView {
    pub identifier: String,
    pub found: bool,
    pub title: String,
    pub description: String,
    pub release_year: Option<i32>,
    pub rating: i64,
    pub stars: [Star; STAR_COUNT],
    pub movie: MovieDetail,
}

/// Year of an OMDb release date such as "25 Dec 1997"
pub fn release_year(released: &str) -> Option<i32> {
    NaiveDate::parse_from_str(released, "%d %b %Y")
        .ok()
        .map(|d| d.year())
}

/// Controller behind the detail page of a single title
#[derive(Clone)]
pub struct DetailScreen {
    client: Arc<MovieClient>,
    identifier: String,
    state: Arc<Mutex<DetailState>>,
}

impl DetailScreen {
    pub fn new(client: Arc<MovieClient>, identifier: &str) -> DetailScreen {
        DetailScreen {
            client,
            identifier: identifier.to_string(),
            state: Arc::new(Mutex::new(DetailState::Pending)),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub async fn load(&self) {
        let state = match self.client.movie(&self.identifier).await {
            Ok(movie) => DetailState::Loaded(movie),
            Err(e) => {
                warn!("Failed to load {}: {e}", self.identifier);
                DetailState::Failed(e)
            }
        };
        *self.state.lock().expect("Poisoned lock") = state;
    }

    pub fn state(&self) -> DetailState {
        self.state.lock().expect("Poisoned lock").clone()
    }

    /// The loaded record, `None` while pending or after a failure
    pub fn detail(&self) -> Option<Arc<MovieDetail>> {
        match &*self.state.lock().expect("Poisoned lock") {
            DetailState::Loaded(movie) => Some(Arc::clone(movie)),
            _ => None,
        }
    }

    pub fn view(&self) -> DetailView {
        let movie = self
            .detail()
            .map(|movie| MovieDetail::clone(&movie))
            .unwrap_or_default();

        let rating = rating::parse_rating(&movie.imdb_rating);

        DetailView {
            identifier: self.identifier.clone(),
            found: movie.found(),
            title: movie.title.clone(),
            description: movie.plot.clone(),
            release_year: release_year(&movie.released),
            rating,
            stars: rating::stars(rating),
            movie,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::{movie_db::MovieDb, test_support::FakeMovieDb};

    use futures::executor::block_on;

    use std::time::Duration;

    fn screen(db: FakeMovieDb, identifier: &str) -> DetailScreen {
        let db: Arc<dyn MovieDb> = Arc::new(db);
        let client = MovieClient::new(db, Duration::from_secs(60));
        DetailScreen::new(Arc::new(client), identifier)
    }

    fn filled(stars: &[Star]) -> usize {
        stars.iter().filter(|s| **s == Star::Filled).count()
    }

    #[test]
    fn test_pending_view_is_blank() {
        let screen = screen(FakeMovieDb::new(), "tt0119396");

        assert!(matches!(screen.state(), DetailState::Pending));
        assert!(screen.detail().is_none());

        let view = screen.view();
        assert!(!view.found);
        assert_eq!(view.identifier, "tt0119396");
        assert_eq!(view.title, "");
        assert_eq!(view.description, "");
        assert_eq!(view.release_year, None);
        assert_eq!(filled(&view.stars), 0);
    }

    #[test]
    fn test_loaded_fixture() {
        let body = include_bytes!("../res/omdb/jackie_brown_id_result.json");
        let movie = serde_json::from_slice::<MovieDetail>(body).expect("Failed to parse id result");
        let screen = screen(FakeMovieDb::new().with_movie(movie), "tt0119396");

        block_on(screen.load());

        let view = screen.view();
        assert!(view.found);
        assert_eq!(view.title, "Jackie Brown");
        assert!(view.description.starts_with("A flight attendant"));
        assert_eq!(view.release_year, Some(1997));
        assert_eq!(view.rating, 7);
        assert_eq!(filled(&view.stars), 3);
        assert_eq!(view.movie.director, "Quentin Tarantino");
    }

    #[test]
    fn test_rating_of_seven_shows_three_stars() {
        let movie = MovieDetail {
            title: "Heat".to_string(),
            imdb_id: "tt0113277".to_string(),
            imdb_rating: "7".to_string(),
            response: "True".to_string(),
            ..Default::default()
        };
        let screen = screen(FakeMovieDb::new().with_movie(movie), "tt0113277");
        block_on(screen.load());

        let view = screen.view();
        assert_eq!(
            view.stars,
            [Star::Filled, Star::Filled, Star::Filled, Star::Empty, Star::Empty]
        );
    }

    #[test]
    fn test_unknown_identifier_renders_blank() {
        let screen = screen(FakeMovieDb::new(), "tt-nope");
        block_on(screen.load());

        assert!(screen.detail().is_some());
        let view = screen.view();
        assert!(!view.found);
        assert_eq!(view.title, "");
        assert_eq!(view.movie.error, "Incorrect IMDb ID.");
        assert_eq!(filled(&view.stars), 0);
    }

    #[test]
    fn test_transport_failure_renders_blank() {
        let screen = screen(FakeMovieDb::new().with_failed_movie("tt1"), "tt1");
        block_on(screen.load());

        assert!(matches!(screen.state(), DetailState::Failed(_)));
        assert!(screen.detail().is_none());
        assert_eq!(screen.view().title, "");
    }

    #[test]
    fn test_release_year() {
        assert_eq!(release_year("14 Oct 1994"), Some(1994));
        assert_eq!(release_year("N/A"), None);
        assert_eq!(release_year(""), None);
    }
}
