use movie_search::{
    app::App,
    client::MovieClient,
    omdb::{OmdbClient, OMDB_BASE_URI},
    server::Server,
};
use thiserror::Error;
use tracing::error;

use std::{path::PathBuf, sync::Arc, time::Duration};

const API_KEY_ENV: &str = "OMDB_API_KEY";
const DEFAULT_CACHE_TTL_SECS: u64 = 60;

#[derive(Error, Debug)]
enum ArgParseError {
    #[error("Unknown arg {0}")]
    UnknownArg(String),
    #[error("No port argument provided")]
    NoPort,
    #[error("Invalid port")]
    InvalidPort(#[source] std::num::ParseIntError),
    #[error("No api key provided, pass --api-key or set OMDB_API_KEY")]
    NoApiKey,
    #[error("Invalid cache ttl")]
    InvalidCacheTtl(#[source] std::num::ParseIntError),
}

struct Args {
    html_path: Option<PathBuf>,
    port: u16,
    api_key: String,
    cache_ttl: Duration,
    omdb_url: String,
}

impl Args {
    fn parse() -> Result<Args, ArgParseError> {
        let mut args = std::env::args();
        let _process_name = args.next();

        let mut html_path = None;
        let mut port = None;
        let mut api_key = None;
        let mut cache_ttl = None;
        let mut omdb_url = None;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--help" => {
                    println!("{}", Self::help());
                    std::process::exit(1);
                }
                "--html-path" => {
                    html_path = args.next().map(Into::into);
                }
                "--port" => {
                    port = args.next().map(|s| s.parse());
                }
                "--api-key" => api_key = args.next(),
                "--cache-ttl" => {
                    cache_ttl = args.next().map(|s| s.parse::<u64>());
                }
                "--omdb-url" => omdb_url = args.next(),
                _ => {
                    return Err(ArgParseError::UnknownArg(arg));
                }
            }
        }

        let port = port
            .ok_or(ArgParseError::NoPort)?
            .map_err(ArgParseError::InvalidPort)?;

        let api_key = api_key
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .ok_or(ArgParseError::NoApiKey)?;

        let cache_ttl = cache_ttl
            .transpose()
            .map_err(ArgParseError::InvalidCacheTtl)?
            .unwrap_or(DEFAULT_CACHE_TTL_SECS);

        let ret = Args {
            html_path,
            port,
            api_key,
            cache_ttl: Duration::from_secs(cache_ttl),
            omdb_url: omdb_url.unwrap_or_else(|| OMDB_BASE_URI.to_string()),
        };

        Ok(ret)
    }

    fn help() -> String {
        let process_name = std::env::args()
            .next()
            .unwrap_or_else(|| "movie-search".to_string());

        format!(
            "Search the open movie database\n\
                \n\
                Usage: {process_name} [ARGS]\n\
                \n\
                Args:\n\
                --help: Show this help\n\
                --port: Port to serve UI on\n\
                --api-key: OMDb api key, defaults to ${API_KEY_ENV}\n\
                --html-path: Optional path to filesystem to serve html files from. Useful for \
                debugging\n\
                --cache-ttl: Seconds a fetched result is reused for, defaults to \
                {DEFAULT_CACHE_TTL_SECS}\n\
                --omdb-url: Base url of the OMDb api, defaults to {OMDB_BASE_URI}\n\
                "
        )
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let args = match Args::parse() {
        Ok(v) => v,
        Err(e) => {
            println!("{}", e);
            println!();
            println!("{}", Args::help());
            return;
        }
    };

    let omdb = OmdbClient::new(args.api_key, args.omdb_url);
    let client = MovieClient::new(Arc::new(omdb), args.cache_ttl);
    let app = App::new(client);

    let server = match Server::new(args.html_path.as_deref(), app) {
        Ok(v) => v,
        Err(e) => {
            error!("Failed to create server: {e}");
            return;
        }
    };

    if let Err(e) = futures::executor::block_on(server.serve(args.port)) {
        error!("Failed to serve: {e}");
    }
}
