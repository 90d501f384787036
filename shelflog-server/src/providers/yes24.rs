//! Yes24 storefront scraping
//!
//! Last link of the book chain; needs no credential. The search page only
//! lists title, cover and product link, so every hit is completed from its
//! product page. `scraper::Html` is not `Send`, so documents are parsed and
//! reduced to owned values in synchronous helpers before the next await.

use super::{fetch_text, BookProvider, ProviderError, SearchTarget, SEARCH_RESULTS, SUGGEST_RESULTS};
use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::join_all;
use scraper::{ElementRef, Html, Selector};
use shelflog_common::{CatalogItem, MediaType, Suggestion};
use std::time::Duration;
use tracing::{debug, info, warn};

const YES24_BASE_URL: &str = "https://www.yes24.com";

/// Credit roles that mark a name as an author
const AUTHOR_ROLES: &[&str] = &["저", "지음", "글", "원작"];
/// Credit roles that exclude a name
const OTHER_ROLES: &[&str] = &["역", "옮김", "번역", "그림", "편", "엮음", "편저", "감수", "사진"];

/// One row of the search result list
#[derive(Debug, Clone, PartialEq)]
struct SearchHit {
    title: String,
    url: Option<String>,
    thumbnail: Option<String>,
}

/// Fields scraped from a product page
#[derive(Debug, Clone, Default, PartialEq)]
struct ProductDetail {
    authors: Vec<String>,
    publisher: Option<String>,
    published_date: Option<String>,
}

fn selector(css: &'static str) -> Result<Selector, ProviderError> {
    Selector::parse(css).map_err(|e| ProviderError::Parse(format!("Selector {}: {:?}", css, e)))
}

fn element_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn absolute_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if let Some(rest) = href.strip_prefix("//") {
        format!("https://{}", rest)
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), href.trim_start_matches('/'))
    }
}

/// Parse the search result list; rows without a title are skipped
fn parse_search_page(html: &str, base_url: &str) -> Result<Vec<SearchHit>, ProviderError> {
    let rows = selector("#yesSchList > li")?;
    let name = selector(".gd_name")?;
    let lazy_image = selector("img.lazy")?;
    let image = selector("img")?;

    let document = Html::parse_document(html);
    let hits = document
        .select(&rows)
        .filter_map(|row| {
            let title_link = row.select(&name).next()?;
            let title = element_text(title_link);
            if title.is_empty() {
                return None;
            }

            let url = title_link
                .value()
                .attr("href")
                .map(|href| absolute_url(base_url, href));
            let thumbnail = row
                .select(&lazy_image)
                .next()
                .and_then(|img| img.value().attr("data-original"))
                .or_else(|| row.select(&image).next().and_then(|img| img.value().attr("src")))
                .filter(|src| !src.is_empty())
                .map(|src| absolute_url(base_url, src));

            Some(SearchHit {
                title,
                url,
                thumbnail,
            })
        })
        .collect();
    Ok(hits)
}

/// `2014년 05월 19일` → `2014-05-19`
fn parse_korean_date(text: &str) -> Option<String> {
    NaiveDate::parse_from_str(text.trim(), "%Y년 %m월 %d일")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Split a credit line like `한강 저 / 데보라 스미스 역` into author names
fn parse_credit_line(text: &str) -> Vec<String> {
    let mut authors = Vec::new();
    for segment in text.split('/') {
        let words: Vec<&str> = segment.split_whitespace().collect();
        let (names, role) = match words.split_last() {
            Some((last, rest)) if AUTHOR_ROLES.contains(last) || OTHER_ROLES.contains(last) => {
                (rest.join(" "), Some(*last))
            }
            _ => (words.join(" "), None),
        };
        if role.is_some_and(|r| OTHER_ROLES.contains(&r)) {
            continue;
        }
        authors.extend(
            names
                .split(',')
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(String::from),
        );
    }
    authors
}

fn parse_product_page(html: &str) -> Result<ProductDetail, ProviderError> {
    let auth = selector(".gd_auth")?;
    let auth_link = selector(".gd_auth a")?;
    let publisher_link = selector(".gd_pub a")?;
    let publisher = selector(".gd_pub")?;
    let date = selector(".gd_date")?;

    let document = Html::parse_document(html);

    let credit_line = document.select(&auth).next().map(element_text);
    let mut authors = credit_line.as_deref().map(parse_credit_line).unwrap_or_default();
    if authors.is_empty() {
        authors = document
            .select(&auth_link)
            .map(element_text)
            .filter(|n| !n.is_empty())
            .collect();
    }

    let publisher = document
        .select(&publisher_link)
        .next()
        .or_else(|| document.select(&publisher).next())
        .map(element_text)
        .filter(|p| !p.is_empty());

    let published_date = document
        .select(&date)
        .next()
        .map(element_text)
        .and_then(|d| parse_korean_date(&d));

    Ok(ProductDetail {
        authors,
        publisher,
        published_date,
    })
}

/// Yes24 storefront client
pub struct Yes24Client {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl Yes24Client {
    pub fn new(http: reqwest::Client, timeout: Duration) -> Self {
        Self {
            http,
            base_url: YES24_BASE_URL.to_string(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn search_hits(&self, query: &str, target: SearchTarget) -> Result<Vec<SearchHit>, ProviderError> {
        let domain = match target {
            SearchTarget::Book => "BOOK",
            SearchTarget::EBook => "EBOOK",
        };
        debug!(query, domain, "Yes24 search");

        let request = self
            .http
            .get(format!("{}/Product/Search", self.base_url))
            .query(&[("domain", domain), ("query", query)]);
        let html = fetch_text(request, self.timeout).await?;
        parse_search_page(&html, &self.base_url)
    }

    async fn product_detail(&self, url: &str) -> Result<ProductDetail, ProviderError> {
        let html = fetch_text(self.http.get(url), self.timeout).await?;
        parse_product_page(&html)
    }

    async fn complete(&self, hit: SearchHit) -> CatalogItem {
        let detail = match hit.url.as_deref() {
            Some(url) => match self.product_detail(url).await {
                Ok(detail) => detail,
                Err(e) => {
                    warn!(title = %hit.title, error = %e, "Yes24 product page failed");
                    ProductDetail::default()
                }
            },
            None => ProductDetail::default(),
        };

        CatalogItem {
            authors: detail.authors,
            publisher: detail.publisher,
            thumbnail: hit.thumbnail,
            published_date: detail.published_date,
            url: hit.url,
            ..CatalogItem::new(hit.title, MediaType::Book)
        }
    }
}

#[async_trait]
impl BookProvider for Yes24Client {
    fn name(&self) -> &'static str {
        "yes24"
    }

    async fn search(
        &self,
        query: &str,
        target: SearchTarget,
    ) -> Result<Vec<CatalogItem>, ProviderError> {
        let hits = self.search_hits(query, target).await?;
        let items = join_all(
            hits.into_iter()
                .take(SEARCH_RESULTS)
                .map(|hit| self.complete(hit)),
        )
        .await;

        info!(query, count = items.len(), "Yes24 search complete");
        Ok(items)
    }

    /// Search list only; product pages are too slow for autocomplete
    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, ProviderError> {
        let hits = self.search_hits(query, SearchTarget::Book).await?;
        Ok(hits
            .into_iter()
            .take(SUGGEST_RESULTS)
            .map(|hit| Suggestion {
                title: hit.title,
                year: None,
                author: None,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_PAGE: &str = r#"
        <ul id="yesSchList">
          <li>
            <div class="img_bdr"><img class="lazy" data-original="https://image.yes24.com/goods/13137546/L" src="blank.gif"></div>
            <div class="info_row"><a class="gd_name" href="/Product/Goods/13137546">소년이 온다</a></div>
          </li>
          <li>
            <a class="gd_name" href="/Product/Goods/1"> </a>
          </li>
          <li>
            <img src="//image.yes24.com/goods/2/M">
            <a class="gd_name" href="https://www.yes24.com/Product/Goods/2">채식주의자</a>
          </li>
        </ul>
    "#;

    #[test]
    fn test_parse_search_page() {
        let hits = parse_search_page(SEARCH_PAGE, "https://www.yes24.com").unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "소년이 온다");
        assert_eq!(hits[0].url.as_deref(), Some("https://www.yes24.com/Product/Goods/13137546"));
        assert_eq!(hits[0].thumbnail.as_deref(), Some("https://image.yes24.com/goods/13137546/L"));
        assert_eq!(hits[1].thumbnail.as_deref(), Some("https://image.yes24.com/goods/2/M"));
    }

    #[test]
    fn test_parse_product_page() {
        let html = r#"
            <span class="gd_auth"><a href="/a">한강</a> 저 / <a href="/b">데보라 스미스</a> 역</span>
            <span class="gd_pub"><a href="/p">창비</a></span>
            <span class="gd_date">2014년 05월 19일</span>
        "#;
        let detail = parse_product_page(html).unwrap();
        assert_eq!(detail.authors, vec!["한강"]);
        assert_eq!(detail.publisher.as_deref(), Some("창비"));
        assert_eq!(detail.published_date.as_deref(), Some("2014-05-19"));
    }

    #[test]
    fn test_missing_nodes_degrade() {
        let detail = parse_product_page("<html><body></body></html>").unwrap();
        assert_eq!(detail, ProductDetail::default());
    }

    #[test]
    fn test_parse_credit_line() {
        assert_eq!(parse_credit_line("김영하 저"), vec!["김영하"]);
        assert_eq!(parse_credit_line("A, B 저 / C 그림"), vec!["A", "B"]);
        assert_eq!(parse_credit_line("무라카미 하루키"), vec!["무라카미 하루키"]);
    }

    #[test]
    fn test_parse_korean_date() {
        assert_eq!(parse_korean_date("2020년 01월 02일").as_deref(), Some("2020-01-02"));
        assert_eq!(parse_korean_date("곧 출간"), None);
    }
}
