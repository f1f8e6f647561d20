// SPDX-License-Identifier: MIT

//! Asset host collaborator: uploads avatar/cover files to a third-party
//! media host.
//!
//! Uploads are fire-and-forget from the controllers' perspective: a failed
//! upload yields `None` and the local temp file is removed either way.
//! Timeouts and retries are the host's concern, not ours.

use std::path::Path;

use serde::Deserialize;

/// Asset host credentials, injected at startup.
#[derive(Debug, Clone)]
pub struct AssetHostConfig {
    /// Upload API base URL
    pub base_url: String,
    /// Account/cloud identifier
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// A successfully uploaded asset.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedAsset {
    /// Public URL of the uploaded asset
    pub url: String,
    /// Host-side identifier, used for deletion
    pub public_id: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
    public_id: String,
}

/// Asset host upload client.
#[derive(Clone)]
pub struct AssetHostClient {
    http: Option<reqwest::Client>,
    config: AssetHostConfig,
}

impl AssetHostClient {
    /// Create a connected client.
    pub fn new(config: AssetHostConfig) -> Self {
        Self {
            http: Some(reqwest::Client::new()),
            config,
        }
    }

    /// Create an offline mock client for testing.
    ///
    /// Uploads succeed with synthetic URLs and never touch the network.
    pub fn new_mock(config: AssetHostConfig) -> Self {
        Self { http: None, config }
    }

    /// Upload a local file, returning `None` on any failure.
    ///
    /// The local file is removed afterwards in both the success and the
    /// failure case.
    pub async fn upload(&self, local_path: &Path) -> Option<UploadedAsset> {
        let result = self.upload_inner(local_path).await;
        if let Err(e) = tokio::fs::remove_file(local_path).await {
            tracing::debug!(path = %local_path.display(), error = %e, "Temp file cleanup failed");
        }

        match result {
            Ok(asset) => Some(asset),
            Err(e) => {
                tracing::warn!(path = %local_path.display(), error = %e, "Asset upload failed");
                None
            }
        }
    }

    async fn upload_inner(&self, local_path: &Path) -> anyhow::Result<UploadedAsset> {
        let file_name = local_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow::anyhow!("invalid upload path"))?
            .to_string();
        let bytes = tokio::fs::read(local_path).await?;

        let Some(http) = &self.http else {
            // Mock mode: pretend the host accepted the file
            return Ok(UploadedAsset {
                url: format!(
                    "https://{}.assets.example/{}",
                    self.config.cloud_name, file_name
                ),
                public_id: file_name,
            });
        };

        let url = format!("{}/{}/auto/upload", self.config.base_url, self.config.cloud_name);
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("api_secret", self.config.api_secret.clone());

        let response = http.post(&url).multipart(form).send().await?;
        let response = response.error_for_status()?;
        let body: UploadResponse = response.json().await?;

        let asset_url = body
            .secure_url
            .or(body.url)
            .ok_or_else(|| anyhow::anyhow!("upload response missing url"))?;

        Ok(UploadedAsset {
            url: asset_url,
            public_id: body.public_id,
        })
    }

    /// Delete an uploaded asset by its host-side identifier.
    pub async fn destroy(&self, public_id: &str) -> bool {
        let Some(http) = &self.http else {
            return true;
        };

        let url = format!("{}/{}/destroy", self.config.base_url, self.config.cloud_name);
        let form = [
            ("public_id", public_id),
            ("api_key", self.config.api_key.as_str()),
            ("api_secret", self.config.api_secret.as_str()),
        ];

        match http.post(&url).form(&form).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!(public_id, error = %e, "Asset destroy failed");
                false
            }
        }
    }
}
