pub mod app;
pub mod cache;
pub mod client;
pub mod detail;
pub mod movie_db;
pub mod omdb;
pub mod rating;
pub mod search;
pub mod server;
#[cfg(test)]
mod test_support;
pub mod types;
