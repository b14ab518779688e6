use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Default)]
pub struct SearchResultSummary {
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "imdbID", default)]
    pub imdb_id: String,
    #[serde(rename = "Type", default)]
    pub media_type: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
}

/// One page of search results as returned for a single page index
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Default)]
pub struct SearchResultPage {
    pub items: Vec<SearchResultSummary>,
    pub total_count: u64,
    pub ok: bool,
    pub error_message: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Default)]
pub struct RatingSource {
    #[serde(rename = "Source", default)]
    pub source: String,
    #[serde(rename = "Value", default)]
    pub value: String,
}

/// Full record for a single title. Fields the provider leaves out stay empty, which is
/// also how a "not found" payload ends up looking.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct MovieDetail {
    pub title: String,
    pub year: String,
    pub rated: String,
    pub released: String,
    pub runtime: String,
    pub genre: String,
    pub director: String,
    pub writer: String,
    pub actors: String,
    pub plot: String,
    pub language: String,
    pub country: String,
    pub awards: String,
    pub poster: String,
    pub ratings: Vec<RatingSource>,
    pub metascore: String,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: String,
    #[serde(rename = "imdbVotes")]
    pub imdb_votes: String,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Type")]
    pub media_type: String,
    #[serde(rename = "DVD")]
    pub dvd: String,
    pub box_office: String,
    pub production: String,
    pub website: String,
    pub response: String,
    pub error: String,
}

impl MovieDetail {
    pub fn found(&self) -> bool {
        self.response == "True"
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Default)]
pub struct SearchSessionState {
    pub query_text: String,
    pub submitted_query: String,
    pub page_count: u32,
}

/// Route of the detail page for a title
pub fn movie_route(imdb_id: &str) -> String {
    format!("/movie/{}", urlencoding::encode(imdb_id))
}
