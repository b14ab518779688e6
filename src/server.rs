use serde::Deserialize;
use tempfile::TempDir;
use thiserror::Error;
use tracing::info;

use std::{fs::File, path::Path};

use crate::app::App;

#[derive(Error, Debug)]
pub enum ClientExtractionError {
    #[error("failed to create temp dir")]
    CreateDir(#[source] std::io::Error),
    #[error("failed to open tarball")]
    Open(#[source] std::io::Error),
    #[error("failed to unpack tarball")]
    Unpack(#[source] std::io::Error),
}

fn extract_client() -> Result<TempDir, ClientExtractionError> {
    use ClientExtractionError::*;
    let d = TempDir::new().map_err(CreateDir)?;
    let tarball_path = Path::new(env!("OUT_DIR")).join("client.tar");
    let tarball_reader = File::open(tarball_path).map_err(Open)?;
    let mut tarball = tar::Archive::new(tarball_reader);
    tarball.unpack(&d).map_err(Unpack)?;
    Ok(d)
}

fn default_pages() -> u32 {
    1
}

#[derive(Deserialize)]
struct SearchQueryParams {
    #[serde(default)]
    query: String,
    #[serde(default = "default_pages")]
    pages: u32,
}

async fn handle_search(req: tide::Request<App>) -> tide::Result<serde_json::Value> {
    let app = req.state();
    let params: SearchQueryParams = req.query()?;
    let view = app.search(&params.query, params.pages).await;
    Ok(serde_json::to_value(view)?)
}

async fn handle_movie(req: tide::Request<App>) -> tide::Result<serde_json::Value> {
    let app = req.state();
    let imdb_id = req.param("id")?;
    let view = app.movie(imdb_id).await;
    Ok(serde_json::to_value(view)?)
}

#[derive(Error, Debug)]
pub enum ServerCreationError {
    #[error("failed to extract client")]
    ExtractClient(#[from] ClientExtractionError),
    #[error("failed to serve directory")]
    ServeDir(#[source] std::io::Error),
    #[error("failed to serve movie page")]
    ServeMoviePage(#[source] std::io::Error),
}

pub struct Server {
    app: tide::Server<App>,
    _embedded_html_dir: TempDir,
}

impl Server {
    pub fn new(html_path: Option<&Path>, app: App) -> Result<Server, ServerCreationError> {
        let mut app = tide::with_state(app);
        let embedded_html_dir = extract_client()?;

        let html_dir = match html_path {
            Some(html_path) => {
                info!("Overriding embedded html with {}", html_path.display());
                html_path
            }
            None => embedded_html_dir.path(),
        };

        app.at("/").get(tide::Redirect::new("/index.html"));
        app.at("/")
            .serve_dir(html_dir)
            .map_err(ServerCreationError::ServeDir)?;
        app.at("/movie/:id")
            .serve_file(html_dir.join("movie.html"))
            .map_err(ServerCreationError::ServeMoviePage)?;

        app.at("/api/search").get(handle_search);
        app.at("/api/movie/:id").get(handle_movie);

        Ok(Server {
            app,
            _embedded_html_dir: embedded_html_dir,
        })
    }

    pub async fn serve(self, port: u16) -> std::io::Result<()> {
        info!("Serving on 127.0.0.1:{port}");
        self.app.listen(format!("127.0.0.1:{port}")).await
    }
}
