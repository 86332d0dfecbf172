//! HTTP implementation of [`AnnotationBackend`] using [`reqwest`].
//!
//! Uses the blocking client; calls are made from the request worker
//! thread, never from the event loop.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response, multipart};

use super::{
    AnnotationBackend, BackendError, BoundingBoxUpdate, IdentifierUpdate, SessionId,
    UploadReceipt,
};
use crate::config::BackendConfig;
use crate::constants::endpoints;
use crate::model::FileHandle;

/// HTTP client for the annotation backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client from backend settings.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(client, &config.base_url))
    }

    /// Create a client reusing an existing [`Client`].
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_session(builder: RequestBuilder, session: Option<&SessionId>) -> RequestBuilder {
        match session {
            Some(id) => builder.header(endpoints::SESSION_HEADER, id.as_str()),
            None => builder,
        }
    }

    /// Return the response unchanged on 2xx, or a status error with the body.
    fn ensure_success(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

impl AnnotationBackend for HttpBackend {
    fn upload_csv(&self, file: &FileHandle) -> Result<UploadReceipt, BackendError> {
        let bytes = file.read_bytes()?;
        log::info!("Uploading {} ({} bytes)", file.name, bytes.len());

        let part = multipart::Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)?;
        let form = multipart::Form::new().part(endpoints::UPLOAD_CSV_FIELD, part);

        let response = self
            .client
            .post(self.url(endpoints::UPLOAD_CSV))
            .multipart(form)
            .send()?;
        let body = Self::ensure_success(response)?.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn update_id(
        &self,
        session: Option<&SessionId>,
        update: &IdentifierUpdate,
    ) -> Result<(), BackendError> {
        let builder = self.client.post(self.url(endpoints::UPDATE_ID)).json(update);
        let response = Self::with_session(builder, session).send()?;
        Self::ensure_success(response)?;
        Ok(())
    }

    fn update_bounding_box(
        &self,
        session: Option<&SessionId>,
        update: &BoundingBoxUpdate,
    ) -> Result<(), BackendError> {
        let builder = self
            .client
            .post(self.url(endpoints::UPDATE_BOUNDING_BOX))
            .json(update);
        let response = Self::with_session(builder, session).send()?;
        Self::ensure_success(response)?;
        Ok(())
    }

    fn download_updated_csv(&self, session: Option<&SessionId>) -> Result<Vec<u8>, BackendError> {
        let builder = self.client.get(self.url(endpoints::DOWNLOAD_UPDATED_CSV));
        let response = Self::with_session(builder, session).send()?;
        let bytes = Self::ensure_success(response)?.bytes()?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let backend = HttpBackend::with_client(Client::new(), "http://localhost:5000/");
        assert_eq!(backend.base_url(), "http://localhost:5000");
        assert_eq!(
            backend.url(endpoints::UPLOAD_CSV),
            "http://localhost:5000/upload-csv"
        );
    }

    #[test]
    fn test_connection_refused_is_transport_error() {
        // Port 9 (discard) on localhost is assumed closed
        let config = BackendConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 2,
        };
        let backend = HttpBackend::new(&config).unwrap();
        assert!(matches!(
            backend.download_updated_csv(None),
            Err(BackendError::Transport(_))
        ));
    }
}
