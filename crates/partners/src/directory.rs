//! Partner lookup over a static table or a remote search endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::record::{Partner, seed_partners};

const REMOTE_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_SUGGESTIONS: usize = 3;

/// In-memory partner table with case-insensitive fuzzy matching.
///
/// The table is constructed explicitly and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct StaticDirectory {
    partners: Vec<Partner>,
}

impl StaticDirectory {
    /// Build a directory over the given records.
    pub fn new(partners: Vec<Partner>) -> Self {
        Self { partners }
    }

    /// Build a directory over the development seed data.
    pub fn seeded() -> Self {
        Self::new(seed_partners())
    }

    /// Resolve a partner name to a record.
    ///
    /// The query is trimmed and lowercased. An exact case-insensitive
    /// match wins over a substring match; within each pass the first
    /// record in table order wins. Empty queries never match.
    pub fn search(&self, query: &str) -> Option<&Partner> {
        let term = query.trim().to_lowercase();
        if term.is_empty() {
            return None;
        }

        if let Some(partner) = self
            .partners
            .iter()
            .find(|p| p.name.to_lowercase() == term)
        {
            return Some(partner);
        }

        self.partners
            .iter()
            .find(|p| p.name.to_lowercase().contains(&term))
    }

    /// Best-effort alternatives for a query that didn't match.
    ///
    /// A partner qualifies when its name contains any whitespace-delimited
    /// word of the query. At most three names are returned, in table order.
    pub fn suggestions(&self, query: &str) -> Vec<String> {
        let term = query.trim().to_lowercase();
        self.partners
            .iter()
            .filter(|p| {
                let name = p.name.to_lowercase();
                term.split_whitespace().any(|word| name.contains(word))
            })
            .take(MAX_SUGGESTIONS)
            .map(|p| p.name.clone())
            .collect()
    }
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    id: String,
    name: String,
    city: String,
    country: String,
}

/// Partner lookup against an external catalog service.
///
/// `POST {base}/search {query, limit}` returning partner-shaped JSON
/// objects. Errors and non-200 responses are treated as "not found" so
/// callers only ever see the found/not-found distinction.
#[derive(Debug, Clone)]
pub struct RemoteDirectory {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteDirectory {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Resolve a partner name via the remote search endpoint.
    pub async fn search(&self, query: &str) -> Option<Partner> {
        let term = query.trim();
        if term.is_empty() {
            return None;
        }

        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let request = SearchRequest {
            query: term,
            limit: 1,
        };

        let response = match self
            .http
            .post(&url)
            .timeout(REMOTE_TIMEOUT)
            .json(&request)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(error = %e, "partner search request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "partner search returned error status");
            return None;
        }

        let hits: Vec<SearchHit> = match response.json().await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::debug!(error = %e, "partner search response unparseable");
                return None;
            }
        };

        hits.into_iter().next().map(|hit| Partner {
            id: hit.id,
            name: hit.name,
            city: hit.city,
            country: hit.country,
        })
    }
}

/// The configured partner source.
#[derive(Debug, Clone)]
pub enum PartnerDirectory {
    Static(StaticDirectory),
    Remote(RemoteDirectory),
}

impl PartnerDirectory {
    /// Static directory over the development seed data.
    pub fn seeded() -> Self {
        Self::Static(StaticDirectory::seeded())
    }

    /// Resolve a partner name to a record.
    pub async fn search(&self, query: &str) -> Option<Partner> {
        match self {
            Self::Static(dir) => dir.search(query).cloned(),
            Self::Remote(dir) => dir.search(query).await,
        }
    }

    /// Alternatives for a missed query. Only the static table can mine
    /// its candidate list; the remote source yields nothing.
    pub fn suggestions(&self, query: &str) -> Vec<String> {
        match self {
            Self::Static(dir) => dir.suggestions(query),
            Self::Remote(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match() {
        let dir = StaticDirectory::seeded();
        let partner = dir.search("Acme Corp").unwrap();
        assert_eq!(partner.name, "Acme Corp");
        assert_eq!(partner.id, "BP001");
        assert_eq!(partner.city, "New York");
        assert_eq!(partner.country, "USA");
    }

    #[test]
    fn partial_match() {
        let dir = StaticDirectory::seeded();
        let partner = dir.search("Acme").unwrap();
        assert_eq!(partner.name, "Acme Corp");
    }

    #[test]
    fn case_insensitive() {
        let dir = StaticDirectory::seeded();
        assert_eq!(dir.search("acme corp").unwrap().name, "Acme Corp");
        assert_eq!(dir.search("TECHVENTURES").unwrap().name, "TechVentures GmbH");
    }

    #[test]
    fn exact_match_beats_substring() {
        // "Tech" appears in two names; an exact name always wins over
        // any substring hit regardless of table order.
        let dir = StaticDirectory::new(vec![
            Partner::new("P1", "Dragon Tech Co", "Shanghai", "China"),
            Partner::new("P2", "Tech", "Oslo", "Norway"),
        ]);
        assert_eq!(dir.search("tech").unwrap().id, "P2");
    }

    #[test]
    fn first_in_list_wins_for_substring() {
        let dir = StaticDirectory::seeded();
        // Both TechVentures GmbH and Dragon Tech Co contain "tech".
        assert_eq!(dir.search("Tech").unwrap().name, "TechVentures GmbH");
    }

    #[test]
    fn no_match() {
        let dir = StaticDirectory::seeded();
        assert!(dir.search("NonExistent Company").is_none());
    }

    #[test]
    fn empty_query() {
        let dir = StaticDirectory::seeded();
        assert!(dir.search("").is_none());
        assert!(dir.search("   ").is_none());
    }

    #[test]
    fn suggestions_share_a_word() {
        let dir = StaticDirectory::seeded();
        let suggestions = dir.suggestions("Tech Industries");
        assert!(suggestions.contains(&"TechVentures GmbH".to_string())
            || suggestions.contains(&"Dragon Tech Co".to_string()));
        assert!(suggestions.len() <= 3);
    }

    #[test]
    fn suggestions_empty_when_nothing_shares_a_word() {
        let dir = StaticDirectory::seeded();
        assert!(dir.suggestions("zzzz qqqq").is_empty());
    }

    #[test]
    fn location_format() {
        let partner = Partner::new("BP001", "Acme Corp", "New York", "USA");
        assert_eq!(partner.location(), "New York, USA");
    }

    #[tokio::test]
    async fn configured_source_dispatch() {
        let dir = PartnerDirectory::seeded();
        assert!(dir.search("Acme Corp").await.is_some());
        assert!(dir.search("NonExistent Company").await.is_none());
    }
}
