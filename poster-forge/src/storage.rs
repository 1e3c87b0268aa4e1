//! # Object storage client (Supabase Storage REST API)
//!
//! Implements [`ObjectStore`] from [`poster_forge_core::contract`] against
//! `{url}/storage/v1`. Authentication uses the service-role key, sent both as a bearer token and
//! as the `apikey` header. The key is never logged.
//!
//! ## Status mapping
//! - `GET /bucket/{name}`: 2xx is `Some`, 404 (or a 400 whose body says "not found") is `None`.
//! - `POST /bucket`: 409 (or a body saying "already exists") becomes
//!   [`StorageError::AlreadyExists`], which the provisioner treats as success.
//! - `POST /object/{bucket}/{key}`: any non-2xx is an error; `x-upsert` carries
//!   [`UploadOptions::upsert`].

use async_trait::async_trait;
use poster_forge_core::contract::{BucketInfo, BucketOptions, ObjectStore, StorageError, UploadOptions};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::load_config::{Secret, StorageConfig};

#[derive(Debug, Serialize)]
struct CreateBucketBody<'a> {
    id: &'a str,
    name: &'a str,
    public: bool,
    file_size_limit: u64,
    allowed_mime_types: &'a [String],
}

#[derive(Debug, Deserialize)]
struct BucketRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    public: bool,
}

pub struct SupabaseStorage {
    http: Client,
    base_url: String,
    service_key: Secret,
}

impl SupabaseStorage {
    pub fn new(http: Client, config: &StorageConfig) -> Self {
        tracing::info!(url = %config.url, "Initialised storage client");
        Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            service_key: config.service_key.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/storage/v1/{path}", self.base_url)
    }

    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(self.service_key.expose())
            .header("apikey", self.service_key.expose())
    }
}

fn transport(err: reqwest::Error) -> StorageError {
    tracing::error!(error = %err, "[STORAGE][ERROR] Request to storage service failed");
    StorageError::Request(err.to_string())
}

async fn status_error(response: Response) -> StorageError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    tracing::error!(status, body = %body, "[STORAGE][ERROR] Storage service returned an error status");
    StorageError::Status { status, body }
}

fn mentions(body: &str, needle: &str) -> bool {
    body.to_ascii_lowercase().contains(needle)
}

#[async_trait]
impl ObjectStore for SupabaseStorage {
    async fn get_bucket(&self, name: &str) -> Result<Option<BucketInfo>, StorageError> {
        let response = self
            .authorised(self.http.get(self.endpoint(&format!("bucket/{name}"))))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status.is_success() {
            let record: BucketRecord = response.json().await.map_err(transport)?;
            return Ok(Some(BucketInfo {
                name: record.name.unwrap_or_else(|| name.to_string()),
                public: record.public,
            }));
        }
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::BAD_REQUEST && mentions(&body, "not found") {
            return Ok(None);
        }
        tracing::error!(status = status.as_u16(), body = %body, "[STORAGE][ERROR] Bucket lookup failed");
        Err(StorageError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn create_bucket(
        &self,
        name: &str,
        options: &BucketOptions,
    ) -> Result<BucketInfo, StorageError> {
        let body = CreateBucketBody {
            id: name,
            name,
            public: options.public,
            file_size_limit: options.file_size_limit,
            allowed_mime_types: &options.allowed_mime_types,
        };
        let response = self
            .authorised(self.http.post(self.endpoint("bucket")))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status.is_success() {
            return Ok(BucketInfo {
                name: name.to_string(),
                public: options.public,
            });
        }
        let text = response.text().await.unwrap_or_default();
        if status == StatusCode::CONFLICT || mentions(&text, "already exists") {
            return Err(StorageError::AlreadyExists(name.to_string()));
        }
        tracing::error!(status = status.as_u16(), body = %text, "[STORAGE][ERROR] Bucket creation rejected");
        Err(StorageError::Status {
            status: status.as_u16(),
            body: text,
        })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: &[u8],
        content_type: &str,
        options: &UploadOptions,
    ) -> Result<(), StorageError> {
        let response = self
            .authorised(self.http.post(self.endpoint(&format!("object/{bucket}/{key}"))))
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", if options.upsert { "true" } else { "false" })
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(transport)?;

        if response.status().is_success() {
            return Ok(());
        }
        Err(status_error(response).await)
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        self.endpoint(&format!("object/public/{bucket}/{key}"))
    }
}
