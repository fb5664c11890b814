use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::{FetchOutcome, FetchedPaper, ReferenceFetcher};

const DEFAULT_BASE_URL: &str = "https://api.semanticscholar.org/graph/v1";

/// Semantic Scholar graph API search, one best match per citation.
pub struct SemanticScholar {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<PaperHit>,
}

#[derive(Deserialize)]
struct PaperHit {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    year: Option<u32>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default, rename = "abstract")]
    abstract_text: Option<String>,
    #[serde(default)]
    authors: Vec<Author>,
}

#[derive(Deserialize)]
struct Author {
    #[serde(default)]
    name: String,
}

impl SemanticScholar {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn search(&self, citation: &str) -> Result<Option<FetchedPaper>> {
        let query = citation_query(citation);
        let mut req = self
            .client
            .get(format!("{}/paper/search", self.base_url))
            .query(&[
                ("query", query.as_str()),
                ("limit", "1"),
                ("fields", "title,abstract,year,url,authors"),
            ]);
        if let Some(key) = &self.api_key {
            req = req.header("x-api-key", key);
        }
        let resp: SearchResponse = req
            .send()
            .context("search request")?
            .error_for_status()
            .context("catalog returned an error")?
            .json()
            .context("parse search response")?;

        Ok(resp.data.into_iter().next().map(|hit| FetchedPaper {
            citation: citation.to_string(),
            title: hit.title.unwrap_or_else(|| query.clone()),
            year: hit.year,
            authors: hit.authors.into_iter().map(|a| a.name).collect(),
            url: hit.url,
            abstract_text: hit.abstract_text,
        }))
    }
}

impl ReferenceFetcher for SemanticScholar {
    fn fetch_references(&self, citations: &[String]) -> Vec<FetchOutcome> {
        citations
            .iter()
            .map(|citation| match self.search(citation) {
                Ok(Some(paper)) => FetchOutcome::Found(paper),
                Ok(None) => FetchOutcome::NotFound {
                    citation: citation.clone(),
                    reason: None,
                },
                Err(err) => {
                    tracing::debug!(citation = %citation, error = %format!("{:#}", err), "fetch failed");
                    FetchOutcome::NotFound {
                        citation: citation.clone(),
                        reason: Some(format!("{:#}", err)),
                    }
                }
            })
            .collect()
    }
}

/// Best-effort title extraction from an "Author (Year). Title. Venue." citation.
pub fn citation_query(citation: &str) -> String {
    let citation = citation.trim();
    let after_year = citation
        .find(").")
        .map(|i| citation[i + 2..].trim_start())
        .filter(|rest| !rest.is_empty());
    let query = match after_year {
        Some(rest) => rest.split(". ").next().unwrap_or(rest),
        None => citation,
    };
    query.trim().trim_end_matches('.').chars().take(200).collect()
}

/// Writes one abstract file per found paper into `dir`. Returns how many were written.
pub fn save_abstracts(dir: &Path, outcomes: &[FetchOutcome]) -> Result<usize> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let mut written = 0;
    for (i, outcome) in outcomes.iter().enumerate() {
        let FetchOutcome::Found(paper) = outcome else {
            continue;
        };
        let mut text = format!("Citation: {}\nTitle: {}\n", paper.citation, paper.title);
        if let Some(year) = paper.year {
            text.push_str(&format!("Year: {}\n", year));
        }
        if !paper.authors.is_empty() {
            text.push_str(&format!("Authors: {}\n", paper.authors.join(", ")));
        }
        if let Some(url) = &paper.url {
            text.push_str(&format!("URL: {}\n", url));
        }
        text.push('\n');
        text.push_str(paper.abstract_text.as_deref().unwrap_or("(no abstract available)"));
        text.push('\n');

        let path = dir.join(format!("paper_{}_abstract.txt", i + 1));
        fs::write(&path, text).with_context(|| format!("write {}", path.display()))?;
        written += 1;
    }
    Ok(written)
}
