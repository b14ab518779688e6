use tracing::info;

use std::sync::Arc;

use crate::{
    client::MovieClient,
    detail::{DetailScreen, DetailView},
    search::{SearchScreen, SearchView, MAX_PAGES},
};

#[derive(Clone)]
pub struct App {
    client: Arc<MovieClient>,
}

impl App {
    pub fn new(client: MovieClient) -> App {
        App {
            client: Arc::new(client),
        }
    }

    /// Results of pages 1 to `pages` for `query`
    pub async fn search(&self, query: &str, pages: u32) -> SearchView {
        let pages = pages.clamp(1, MAX_PAGES);
        info!("Searching for {query:?}, {pages} page(s)");

        let screen = SearchScreen::new(Arc::clone(&self.client));
        screen.set_query_text(query);
        screen.submit().await;
        if pages > 1 {
            screen.show_pages(pages).await;
        }
        screen.view()
    }

    pub async fn movie(&self, imdb_id: &str) -> DetailView {
        let screen = DetailScreen::new(Arc::clone(&self.client), imdb_id);
        info!("Loading details for {}", screen.identifier());
        screen.load().await;
        screen.view()
    }
}
