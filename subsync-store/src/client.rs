//! Gist REST API client.
//!
//! Two endpoints only: fetch a gist, and patch it with a full replacement
//! file set. Blocking I/O; the pipeline is fully sequential.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

const DEFAULT_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("subsync/", env!("CARGO_PKG_VERSION"));

/// One file inside a gist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GistFile {
    pub content: String,
}

/// The subset of the gist payload the store works with.
#[derive(Debug, Clone, Deserialize)]
pub struct Gist {
    #[serde(default)]
    pub description: Option<String>,
    pub files: BTreeMap<String, GistFile>,
}

#[derive(Serialize)]
struct GistUpdate<'a> {
    description: &'a str,
    files: &'a BTreeMap<String, GistFile>,
}

/// Authenticated gist API client.
pub struct GistClient {
    agent: ureq::Agent,
    token: String,
    api_base: String,
}

impl GistClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base(token, DEFAULT_API_BASE)
    }

    /// Point the client at a different API base URL. Used by tests.
    pub fn with_base(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            agent: ureq::agent(),
            token: token.into(),
            api_base: api_base.into().trim_end_matches('/').to_owned(),
        }
    }

    fn gist_url(&self, gist_id: &str) -> String {
        format!("{}/gists/{gist_id}", self.api_base)
    }

    /// Fetch a gist by id. A 404 maps to [`StoreError::NotFound`].
    pub fn get(&self, gist_id: &str) -> Result<Gist, StoreError> {
        tracing::debug!("fetching gist {gist_id}");
        let response = self
            .agent
            .get(&self.gist_url(gist_id))
            .set("Authorization", &format!("token {}", self.token))
            .set("Accept", "application/vnd.github+json")
            .set("User-Agent", USER_AGENT)
            .call()
            .map_err(|err| Self::map_call_error(err, gist_id))?;
        Ok(response.into_json()?)
    }

    /// Replace the gist's description and full file set in one call.
    pub fn update(
        &self,
        gist_id: &str,
        description: &str,
        files: &BTreeMap<String, GistFile>,
    ) -> Result<(), StoreError> {
        tracing::debug!("updating gist {gist_id} ({} files)", files.len());
        self.agent
            .request("PATCH", &self.gist_url(gist_id))
            .set("Authorization", &format!("token {}", self.token))
            .set("Accept", "application/vnd.github+json")
            .set("User-Agent", USER_AGENT)
            .send_json(GistUpdate { description, files })
            .map_err(|err| Self::map_call_error(err, gist_id))?;
        Ok(())
    }

    fn map_call_error(err: ureq::Error, gist_id: &str) -> StoreError {
        match err {
            ureq::Error::Status(404, _) => StoreError::NotFound {
                gist_id: gist_id.to_owned(),
            },
            ureq::Error::Status(status, response) => StoreError::Api {
                status,
                message: response.status_text().to_owned(),
            },
            transport => StoreError::Http(Box::new(transport)),
        }
    }
}
