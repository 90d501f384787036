//! TMDB client for movies and dramas
//!
//! Search hits are enriched concurrently with a detail call that appends
//! credits. Responsible people (directors, or creators for dramas) are
//! shown in Korean when TMDB knows a Hangul name for them.

use super::{fetch_json, non_empty, ProviderError, SEARCH_RESULTS, SUGGEST_RESULTS};
use futures::future::{self, join_all, BoxFuture};
use futures::FutureExt;
use serde::Deserialize;
use shelflog_common::catalog::leading_year;
use shelflog_common::fallback::first_some;
use shelflog_common::query::contains_hangul;
use shelflog_common::taxonomy::normalize_genre_ids;
use shelflog_common::{CatalogItem, MediaType, Suggestion};
use std::time::Duration;
use tracing::{debug, info, warn};

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
const TMDB_WEB_BASE_URL: &str = "https://www.themoviedb.org";
const LANGUAGE: &str = "ko-KR";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchHit {
    id: u64,
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    poster_path: Option<String>,
    #[serde(default)]
    genre_ids: Vec<u32>,
    #[serde(default)]
    origin_country: Vec<String>,
}

impl SearchHit {
    fn display_title(&self) -> Option<String> {
        non_empty(self.title.clone()).or_else(|| non_empty(self.name.clone()))
    }

    fn date(&self) -> Option<String> {
        non_empty(self.release_date.clone()).or_else(|| non_empty(self.first_air_date.clone()))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Person {
    id: u64,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct CrewMember {
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    job: String,
}

#[derive(Debug, Default, Deserialize)]
struct Credits {
    #[serde(default)]
    crew: Vec<CrewMember>,
}

#[derive(Debug, Deserialize)]
struct ProductionCountry {
    iso_3166_1: String,
}

#[derive(Debug, Deserialize)]
struct Genre {
    id: u32,
}

#[derive(Debug, Deserialize)]
struct Detail {
    runtime: Option<u32>,
    number_of_episodes: Option<u32>,
    #[serde(default)]
    production_countries: Vec<ProductionCountry>,
    #[serde(default)]
    origin_country: Vec<String>,
    #[serde(default)]
    created_by: Vec<Person>,
    #[serde(default)]
    genres: Vec<Genre>,
    #[serde(default)]
    credits: Credits,
}

impl Detail {
    fn directors(&self) -> Vec<Person> {
        self.credits
            .crew
            .iter()
            .filter(|c| c.job == "Director")
            .map(|c| Person {
                id: c.id,
                name: c.name.clone(),
            })
            .collect()
    }

    /// Directors for movies; creators (else directors) for dramas
    fn responsible(&self, media_type: MediaType) -> Vec<Person> {
        let mut people = match media_type {
            MediaType::Drama if !self.created_by.is_empty() => self.created_by.clone(),
            _ => self.directors(),
        };
        let mut seen = Vec::new();
        people.retain(|p| {
            let fresh = !seen.contains(&p.id) && !p.name.trim().is_empty();
            seen.push(p.id);
            fresh
        });
        people
    }

    fn country_codes(&self, media_type: MediaType) -> Vec<String> {
        let production: Vec<String> = self
            .production_countries
            .iter()
            .map(|c| c.iso_3166_1.clone())
            .collect();
        match media_type {
            MediaType::Movie if !production.is_empty() => production,
            MediaType::Movie => self.origin_country.clone(),
            _ if !self.origin_country.is_empty() => self.origin_country.clone(),
            _ => production,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PersonDetail {
    #[serde(default)]
    also_known_as: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Translations {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    #[serde(default)]
    iso_639_1: String,
    #[serde(default)]
    data: TranslationData,
}

#[derive(Debug, Default, Deserialize)]
struct TranslationData {
    name: Option<String>,
}

fn path_segment(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Drama => "tv",
        MediaType::Movie | MediaType::Book => "movie",
    }
}

/// TMDB movie and TV client
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl TmdbClient {
    pub fn new(http: reqwest::Client, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            http,
            base_url: TMDB_BASE_URL.to_string(),
            api_key,
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn key(&self) -> Result<&str, ProviderError> {
        self.api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured("TMDB API key"))
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let key = self.key()?;
        debug!(path, "TMDB request");
        let request = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(&[("api_key", key), ("language", LANGUAGE)])
            .query(params);
        fetch_json(request, self.timeout).await
    }

    async fn search_hits(&self, query: &str, media_type: MediaType) -> Result<Vec<SearchHit>, ProviderError> {
        let path = format!("/search/{}", path_segment(media_type));
        let response: SearchResponse = self
            .get(&path, &[("query", query), ("include_adult", "false")])
            .await?;
        Ok(response.results)
    }

    async fn detail(&self, media_type: MediaType, id: u64) -> Result<Detail, ProviderError> {
        let path = format!("/{}/{}", path_segment(media_type), id);
        self.get(&path, &[("append_to_response", "credits")]).await
    }

    async fn also_known_as(&self, person_id: u64) -> Option<String> {
        let path = format!("/person/{}", person_id);
        match self.get::<PersonDetail>(&path, &[]).await {
            Ok(person) => person
                .also_known_as
                .into_iter()
                .map(|n| n.trim().to_string())
                .find(|n| contains_hangul(n)),
            Err(e) => {
                debug!(person_id, error = %e, "Person lookup failed");
                None
            }
        }
    }

    async fn translated_name(&self, person_id: u64) -> Option<String> {
        let path = format!("/person/{}/translations", person_id);
        match self.get::<Translations>(&path, &[]).await {
            Ok(list) => list
                .translations
                .into_iter()
                .find(|t| t.iso_639_1 == "ko")
                .and_then(|t| non_empty(t.data.name)),
            Err(e) => {
                debug!(person_id, error = %e, "Person translations failed");
                None
            }
        }
    }

    /// The first Korean rendering of a person's name, else the name as given
    async fn localized_name(&self, person: &Person) -> String {
        let given = Some(person.name.clone()).filter(|n| contains_hangul(n));
        let attempts: Vec<BoxFuture<'_, Option<String>>> = vec![
            future::ready(given).boxed(),
            self.also_known_as(person.id).boxed(),
            self.translated_name(person.id).boxed(),
        ];
        first_some(attempts)
            .await
            .unwrap_or_else(|| person.name.clone())
    }

    /// Localize every name within one call's timeout; on expiry the names
    /// are kept as TMDB gave them
    async fn localized_names(&self, people: &[Person]) -> Vec<String> {
        let lookups = join_all(people.iter().map(|p| self.localized_name(p)));
        match tokio::time::timeout(self.timeout, lookups).await {
            Ok(names) => names,
            Err(_) => {
                warn!(count = people.len(), "Name localization timed out, using original names");
                people.iter().map(|p| p.name.clone()).collect()
            }
        }
    }

    async fn complete(&self, media_type: MediaType, hit: SearchHit) -> Option<CatalogItem> {
        let title = hit.display_title()?;
        let mut item = CatalogItem {
            published_date: hit.date(),
            thumbnail: non_empty(hit.poster_path.clone())
                .map(|path| format!("{}{}", TMDB_IMAGE_BASE_URL, path)),
            url: Some(format!(
                "{}/{}/{}",
                TMDB_WEB_BASE_URL,
                path_segment(media_type),
                hit.id
            )),
            ..CatalogItem::new(title, media_type)
        };

        let detail = match self.detail(media_type, hit.id).await {
            Ok(detail) => detail,
            Err(e) => {
                warn!(id = hit.id, error = %e, "TMDB detail failed, using search hit");
                let taxonomy = normalize_genre_ids(&hit.genre_ids, hit.origin_country.as_slice());
                item.genres = taxonomy.genres;
                item.country = taxonomy.country;
                return Some(item);
            }
        };

        let genre_ids = if hit.genre_ids.is_empty() {
            detail.genres.iter().map(|g| g.id).collect()
        } else {
            hit.genre_ids.clone()
        };
        let countries = detail.country_codes(media_type);
        let taxonomy = normalize_genre_ids(&genre_ids, countries.as_slice());
        item.genres = taxonomy.genres;
        item.country = taxonomy.country;

        let people = detail.responsible(media_type);
        item.authors = self.localized_names(&people).await;

        match media_type {
            MediaType::Drama => item.total_episodes = Some(detail.number_of_episodes.unwrap_or(0)),
            _ => item.runtime = Some(detail.runtime.unwrap_or(0)),
        }
        Some(item)
    }

    /// Search movies or dramas and enrich up to ten hits
    pub async fn search(&self, query: &str, media_type: MediaType) -> Result<Vec<CatalogItem>, ProviderError> {
        let hits = self.search_hits(query, media_type).await?;
        let items: Vec<CatalogItem> = join_all(
            hits.into_iter()
                .take(SEARCH_RESULTS)
                .map(|hit| self.complete(media_type, hit)),
        )
        .await
        .into_iter()
        .flatten()
        .collect();

        info!(query, ?media_type, count = items.len(), "TMDB search complete");
        Ok(items)
    }

    pub async fn suggest(&self, query: &str, media_type: MediaType) -> Result<Vec<Suggestion>, ProviderError> {
        let hits = self.search_hits(query, media_type).await?;
        Ok(hits
            .into_iter()
            .filter_map(|hit| {
                let title = hit.display_title()?;
                let year = hit
                    .date()
                    .as_deref()
                    .and_then(leading_year)
                    .map(String::from);
                Some(Suggestion {
                    title,
                    year,
                    author: None,
                })
            })
            .take(SUGGEST_RESULTS)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(json: &str) -> Detail {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_movie_people_are_directors() {
        let d = detail(
            r#"{"credits":{"crew":[
                {"id":1,"name":"Bong Joon-ho","job":"Director"},
                {"id":2,"name":"Hong Kyung-pyo","job":"Director of Photography"},
                {"id":1,"name":"Bong Joon-ho","job":"Director"}
            ]}}"#,
        );
        let people = d.responsible(MediaType::Movie);
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].name, "Bong Joon-ho");
    }

    #[test]
    fn test_drama_prefers_creators() {
        let d = detail(
            r#"{"created_by":[{"id":7,"name":"황동혁"}],
                "credits":{"crew":[{"id":1,"name":"Someone","job":"Director"}]}}"#,
        );
        let people = d.responsible(MediaType::Drama);
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].id, 7);

        let d = detail(r#"{"credits":{"crew":[{"id":1,"name":"Someone","job":"Director"}]}}"#);
        assert_eq!(d.responsible(MediaType::Drama)[0].id, 1);
    }

    #[test]
    fn test_country_codes_by_type() {
        let d = detail(r#"{"production_countries":[{"iso_3166_1":"KR"}],"origin_country":["US"]}"#);
        assert_eq!(d.country_codes(MediaType::Movie), vec!["KR"]);
        assert_eq!(d.country_codes(MediaType::Drama), vec!["US"]);

        let d = detail(r#"{"origin_country":["JP"]}"#);
        assert_eq!(d.country_codes(MediaType::Movie), vec!["JP"]);
    }

    #[test]
    fn test_search_hit_title_and_date() {
        let hit: SearchHit = serde_json::from_str(
            r#"{"id":1,"name":"오징어 게임","first_air_date":"2021-09-17","release_date":""}"#,
        )
        .unwrap();
        assert_eq!(hit.display_title().as_deref(), Some("오징어 게임"));
        assert_eq!(hit.date().as_deref(), Some("2021-09-17"));
    }

    #[test]
    fn test_path_segment() {
        assert_eq!(path_segment(MediaType::Movie), "movie");
        assert_eq!(path_segment(MediaType::Drama), "tv");
    }
}
