//! OMDb (Open Movie Database) lookup service.
//!
//! Movies are a single title query. Episodes take two requests: the episode
//! record supplies the episode title and the series ID, and a second query by
//! that ID supplies the series name.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::provider::LookupService;
use crate::config::{Directories, OmdbConfig, RenameTemplates};
use crate::error::{Error, Result};
use crate::media::{Media, Movie, Show};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

// ---------------------------------------------------------------------------
// OMDb API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Season", default)]
    season: String,
    #[serde(rename = "Episode", default)]
    episode: String,
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Error", default)]
    error: Option<String>,
    #[serde(rename = "seriesID", alias = "SeriesID", default)]
    series_id: String,
}

// ---------------------------------------------------------------------------
// Service implementation
// ---------------------------------------------------------------------------

/// OMDb lookup service. Unavailable until an API key is configured.
pub struct OmdbService {
    client: Client,
    api_key: String,
    base_url: String,
    templates: RenameTemplates,
    directories: Option<Directories>,
}

impl OmdbService {
    pub fn new(config: &OmdbConfig) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            templates: config.templates.clone(),
            directories: config.directories.clone(),
        }
    }

    /// Run one query. A `Response` other than `"True"` is a lookup error.
    async fn query(&self, params: &[(&str, String)]) -> Result<OmdbResponse> {
        debug!(params = ?params, "OMDb query");

        let body: OmdbResponse = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("r", "json")])
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if body.response != "True" {
            return Err(Error::lookup(
                body.error.unwrap_or_else(|| "no result".to_string()),
            ));
        }
        Ok(body)
    }

    async fn search_movie(&self, movie: &Movie) -> Result<Media> {
        let mut params = vec![("t", movie.name.clone()), ("type", "movie".to_string())];
        if movie.year != 0 {
            params.push(("y", movie.year.to_string()));
        }

        let found = self.query(&params).await?;
        Ok(Media::Movie(Movie {
            name: found.title,
            year: parse_year(&found.year).unwrap_or(movie.year),
            ext: movie.ext.clone(),
        }))
    }

    async fn search_show(&self, show: &Show) -> Result<Media> {
        let episode = self
            .query(&[
                ("t", show.name.clone()),
                ("type", "episode".to_string()),
                ("Season", show.season.to_string()),
                ("Episode", show.episode.to_string()),
            ])
            .await?;

        if episode.series_id.is_empty() {
            return Err(Error::lookup(format!(
                "episode {:?} has no series ID",
                episode.title
            )));
        }

        let series = self
            .query(&[
                ("i", episode.series_id.clone()),
                ("type", "series".to_string()),
            ])
            .await?;

        Ok(Media::Show(Show {
            name: series.title,
            season: episode.season.parse().unwrap_or(show.season),
            episode: episode.episode.parse().unwrap_or(show.episode),
            title: episode.title,
            ext: show.ext.clone(),
        }))
    }
}

/// Leading four-digit year of `"2010"` or `"2008–2013"`.
fn parse_year(year: &str) -> Option<u32> {
    year.get(..4).and_then(|y| y.parse().ok())
}

#[async_trait]
impl LookupService for OmdbService {
    fn name(&self) -> &'static str {
        "omdb"
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn search(&self, media: &Media) -> Result<Media> {
        match media {
            Media::Movie(movie) => self.search_movie(movie).await,
            Media::Show(show) => self.search_show(show).await,
        }
    }

    fn templates(&self) -> &RenameTemplates {
        &self.templates
    }

    fn directories(&self) -> Option<&Directories> {
        self.directories.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer) -> OmdbService {
        OmdbService::new(&OmdbConfig {
            api_key: "secret".to_string(),
            base_url: server.uri(),
            ..OmdbConfig::default()
        })
    }

    #[test]
    fn availability_requires_key() {
        assert!(!OmdbService::new(&OmdbConfig::default()).is_available());
    }

    #[test]
    fn parse_year_forms() {
        assert_eq!(parse_year("2010"), Some(2010));
        assert_eq!(parse_year("2008–2013"), Some(2008));
        assert_eq!(parse_year("N/A"), None);
    }

    #[tokio::test]
    async fn movie_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("apikey", "secret"))
            .and(query_param("r", "json"))
            .and(query_param("t", "Inception"))
            .and(query_param("type", "movie"))
            .and(query_param("y", "2010"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Title": "Inception",
                "Year": "2010",
                "Response": "True"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let media = service(&server)
            .search(&Media::movie("Inception", 2010).with_ext("mkv"))
            .await
            .unwrap();
        assert_eq!(media, Media::movie("Inception", 2010).with_ext("mkv"));
    }

    #[tokio::test]
    async fn movie_without_year_omits_param() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("t", "Heat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Title": "Heat",
                "Year": "1995",
                "Response": "True"
            })))
            .mount(&server)
            .await;

        let media = service(&server).search(&Media::movie("Heat", 0)).await.unwrap();
        assert_eq!(media, Media::movie("Heat", 1995));

        let requests = server.received_requests().await.unwrap();
        assert!(!requests[0].url.query_pairs().any(|(key, _)| key == "y"));
    }

    #[tokio::test]
    async fn not_found_is_lookup_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Response": "False",
                "Error": "Movie not found!"
            })))
            .mount(&server)
            .await;

        let err = service(&server)
            .search(&Media::movie("Nothing", 0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Lookup(ref msg) if msg == "Movie not found!"));
    }

    #[tokio::test]
    async fn episode_lookup_uses_series_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("type", "episode"))
            .and(query_param("t", "Show Name"))
            .and(query_param("Season", "1"))
            .and(query_param("Episode", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Title": "The Second One",
                "Season": "1",
                "Episode": "2",
                "seriesID": "tt0000001",
                "Response": "True"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("type", "series"))
            .and(query_param("i", "tt0000001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Title": "Show Name (US)",
                "Response": "True"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let media = service(&server)
            .search(&Media::show("Show Name", 1, 2).with_ext("mkv"))
            .await
            .unwrap();
        assert_eq!(
            media,
            Media::Show(Show {
                name: "Show Name (US)".to_string(),
                season: 1,
                episode: 2,
                title: "The Second One".to_string(),
                ext: "mkv".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn failed_series_step_fails_the_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("type", "episode"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Title": "Pilot",
                "seriesID": "tt0000002",
                "Response": "True"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("type", "series"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = service(&server).search(&Media::show("Show", 1, 1)).await;
        assert!(matches!(result, Err(Error::Lookup(_))));
    }
}
