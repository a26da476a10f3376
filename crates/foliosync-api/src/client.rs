//! Gallery service HTTP client
//!
//! A typed wrapper over `reqwest` for the gallery service's JSON API.
//! Handles token authentication, endpoint construction, JSON
//! (de)serialization, and error mapping. The engine never sees this layer;
//! it talks to [`GalleryApiProvider`](crate::provider::GalleryApiProvider),
//! which maps the wire DTOs here into domain snapshots.
//!
//! ## Endpoints
//!
//! - `POST /auth/token` - exchange credentials for a bearer token
//! - `GET  /hierarchy` - full group tree (photosets without photo listings)
//! - `POST /groups/{id}/groups` - create a child group
//! - `POST /groups/{id}/photosets` - create a photoset
//! - `GET  /photosets/{id}` - photoset with its photo listing
//! - `POST /photosets/{id}/photos` - upload raw photo bytes
//! - `POST /photos/{id}/replace` - replace a photo's content
//! - `DELETE /photos/{id}` - delete a photo
//! - `POST /{groups|photosets|photos}/{id}/access` - apply access attributes

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Group node as returned by `/hierarchy` and group creation.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiGroup {
    pub id: String,
    pub title: String,
    pub custom_reference: Option<String>,
    #[serde(default)]
    pub groups: Vec<ApiGroup>,
    #[serde(default)]
    pub photosets: Vec<ApiPhotoset>,
}

/// Photoset as returned by creation (no photos) or `/photosets/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPhotoset {
    pub id: String,
    pub title: String,
    pub caption: Option<String>,
    pub custom_reference: Option<String>,
    #[serde(default)]
    pub photos: Vec<ApiPhoto>,
}

/// Photo metadata as returned by uploads and photoset loads.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPhoto {
    pub id: String,
    pub file_name: String,
    pub uploaded_on: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateObjectRequest<'a> {
    pub title: &'a str,
    pub caption: &'a str,
    pub custom_reference: &'a str,
}

#[derive(Debug, Serialize)]
struct ReplaceRequest<'a> {
    replacement_id: &'a str,
}

// ============================================================================
// ApiClient
// ============================================================================

/// HTTP client for the gallery service.
///
/// Holds the credentials and, after [`ApiClient::authenticate`], the bearer
/// token attached to every subsequent request.
#[derive(Debug)]
pub(crate) struct ApiClient {
    http: Client,
    base_url: String,
    username: String,
    password: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// Creates a client for the given service base URL and credentials.
    ///
    /// The base URL carries no trailing slash; in tests it points at a
    /// wiremock server.
    pub(crate) fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            token: RwLock::new(None),
        }
    }

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let mut builder = self.http.request(method, url);
        if let Some(token) = self.token.read().await.as_ref() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Fails with status and response body context on non-2xx responses.
    async fn check(response: Response, what: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        bail!("{what} failed with {status}: {body}");
    }

    /// Exchanges the configured credentials for a bearer token.
    pub(crate) async fn authenticate(&self) -> Result<()> {
        let response = self
            .request(Method::POST, "/auth/token")
            .await
            .json(&TokenRequest {
                username: &self.username,
                password: &self.password,
            })
            .send()
            .await
            .context("token request failed to send")?;

        let response = Self::check(response, "authentication").await?;
        let token: TokenResponse = response
            .json()
            .await
            .context("malformed token response")?;

        *self.token.write().await = Some(token.token);
        debug!("Obtained API token");
        Ok(())
    }

    /// Fetches the full group hierarchy.
    pub(crate) async fn fetch_hierarchy(&self) -> Result<ApiGroup> {
        let response = self
            .request(Method::GET, "/hierarchy")
            .await
            .send()
            .await
            .context("hierarchy request failed to send")?;
        let response = Self::check(response, "hierarchy load").await?;
        response.json().await.context("malformed hierarchy response")
    }

    /// Creates a child group under `parent_id`.
    pub(crate) async fn create_group(
        &self,
        parent_id: &str,
        body: &CreateObjectRequest<'_>,
    ) -> Result<ApiGroup> {
        let response = self
            .request(Method::POST, &format!("/groups/{parent_id}/groups"))
            .await
            .json(body)
            .send()
            .await
            .context("group create request failed to send")?;
        let response = Self::check(response, "group create").await?;
        response.json().await.context("malformed group response")
    }

    /// Creates a photoset under `parent_id`.
    pub(crate) async fn create_photoset(
        &self,
        parent_id: &str,
        body: &CreateObjectRequest<'_>,
    ) -> Result<ApiPhotoset> {
        let response = self
            .request(Method::POST, &format!("/groups/{parent_id}/photosets"))
            .await
            .json(body)
            .send()
            .await
            .context("photoset create request failed to send")?;
        let response = Self::check(response, "photoset create").await?;
        response.json().await.context("malformed photoset response")
    }

    /// Fetches a photoset including its photo listing.
    pub(crate) async fn fetch_photoset(&self, id: &str) -> Result<ApiPhotoset> {
        let response = self
            .request(Method::GET, &format!("/photosets/{id}"))
            .await
            .send()
            .await
            .context("photoset request failed to send")?;
        let response = Self::check(response, "photoset load").await?;
        response.json().await.context("malformed photoset response")
    }

    /// Uploads raw photo bytes into a photoset.
    ///
    /// `file_name` is the photo's match key (basename); `reference` is the
    /// display reference (path with the sync root stripped).
    pub(crate) async fn upload_photo(
        &self,
        photoset_id: &str,
        file_name: &str,
        reference: &str,
        data: Vec<u8>,
    ) -> Result<ApiPhoto> {
        debug!(photoset_id, file_name, bytes = data.len(), "Uploading photo");
        let response = self
            .request(Method::POST, &format!("/photosets/{photoset_id}/photos"))
            .await
            .query(&[("file_name", file_name), ("reference", reference)])
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(data)
            .send()
            .await
            .context("upload request failed to send")?;
        let response = Self::check(response, "upload").await?;
        response.json().await.context("malformed photo response")
    }

    /// Replaces `original_id`'s content with `replacement_id`'s.
    pub(crate) async fn replace_photo(
        &self,
        original_id: &str,
        replacement_id: &str,
    ) -> Result<()> {
        let response = self
            .request(Method::POST, &format!("/photos/{original_id}/replace"))
            .await
            .json(&ReplaceRequest { replacement_id })
            .send()
            .await
            .context("replace request failed to send")?;
        Self::check(response, "replace").await?;
        Ok(())
    }

    /// Deletes a photo.
    pub(crate) async fn delete_photo(&self, id: &str) -> Result<()> {
        let response = self
            .request(Method::DELETE, &format!("/photos/{id}"))
            .await
            .send()
            .await
            .context("delete request failed to send")?;
        Self::check(response, "delete").await?;
        Ok(())
    }

    /// Applies access attributes to an object.
    ///
    /// `collection` is one of `groups`, `photosets`, or `photos`.
    pub(crate) async fn update_access(
        &self,
        collection: &str,
        id: &str,
        attributes: &BTreeMap<String, String>,
    ) -> Result<()> {
        let response = self
            .request(Method::POST, &format!("/{collection}/{id}/access"))
            .await
            .json(attributes)
            .send()
            .await
            .context("access update request failed to send")?;
        Self::check(response, "access update").await?;
        Ok(())
    }
}
