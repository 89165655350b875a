//! Fetch collaborator for the comment thread core.
//!
//! The trait is the seam the synchronization components talk through;
//! [`HttpCommentApi`] is the production implementation, tests substitute
//! their own.

use async_trait::async_trait;
use reqwest::Client;
use uuid::Uuid;

use riptide_shared::ThreadConfig;
use riptide_shared::models::{CommentPage, CreateCommentRequest, CreateCommentResponse};

use crate::error::{ThreadError, ThreadResult};

/// Remote comment store operations.
#[async_trait]
pub trait CommentApi: Send + Sync {
    /// Fetch one page of history for `parent_id`.
    ///
    /// # Arguments
    /// * `parent_id` - The item the thread is attached to
    /// * `limit` - Maximum number of comments to return
    /// * `offset` - Opaque backward cursor, empty for the newest page
    ///
    /// # Errors
    /// Returns [`ThreadError::Fetch`] if the request or decoding fails.
    async fn fetch_page(
        &self,
        parent_id: Uuid,
        limit: usize,
        offset: &str,
    ) -> ThreadResult<CommentPage>;

    /// Create a comment under `parent_id`.
    ///
    /// # Errors
    /// Returns [`ThreadError::Write`] if the request or decoding fails.
    async fn create(
        &self,
        parent_id: Uuid,
        request: CreateCommentRequest,
    ) -> ThreadResult<CreateCommentResponse>;
}

/// HTTP-backed [`CommentApi`] speaking the platform's comments endpoints.
#[derive(Debug, Clone)]
pub struct HttpCommentApi {
    base_url: String,
    client: Client,
}

impl HttpCommentApi {
    /// Create a new API client rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a client rooted at the configured API base URL.
    #[must_use]
    pub fn from_config(config: &ThreadConfig) -> Self {
        Self::new(&config.base_url)
    }

    fn comments_url(&self, parent_id: Uuid) -> String {
        format!("{}/api/v1/comments/{parent_id}", self.base_url)
    }
}

#[async_trait]
impl CommentApi for HttpCommentApi {
    async fn fetch_page(
        &self,
        parent_id: Uuid,
        limit: usize,
        offset: &str,
    ) -> ThreadResult<CommentPage> {
        let response = self
            .client
            .get(self.comments_url(parent_id))
            .query(&[
                ("limit", limit.to_string().as_str()),
                ("offset", offset),
                ("reversed", "false"),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ThreadError::Fetch(e.to_string()))?;

        response
            .json()
            .await
            .map_err(|e| ThreadError::Fetch(e.to_string()))
    }

    async fn create(
        &self,
        parent_id: Uuid,
        request: CreateCommentRequest,
    ) -> ThreadResult<CreateCommentResponse> {
        let response = self
            .client
            .post(self.comments_url(parent_id))
            .json(&request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ThreadError::Write(e.to_string()))?;

        response
            .json()
            .await
            .map_err(|e| ThreadError::Write(e.to_string()))
    }
}
