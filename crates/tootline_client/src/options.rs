//! Per-request options beyond method, path, body and query.

use derive_getters::Getters;

/// A multipart file upload attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Upload {
    /// Multipart field name, `file` for the Mastodon media endpoints.
    field_name: String,
    /// Original file name reported to the server.
    file_name: String,
    /// MIME type of the payload.
    mime_type: String,
    /// Raw file contents.
    bytes: Vec<u8>,
    /// Alt text sent alongside the file.
    description: Option<String>,
}

impl Upload {
    /// Create an upload for the standard `file` multipart field.
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            field_name: "file".to_string(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
            description: None,
        }
    }

    /// Attach alt text, sent as the `description` form field.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Optional extras for a dispatched request: additional headers and an
/// optional multipart upload.
///
/// When an upload is present the request is sent as multipart form data and
/// any JSON body is ignored, matching the media endpoints' expectations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct RequestOptions {
    headers: Vec<(String, String)>,
    upload: Option<Upload>,
}

impl RequestOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a request header, e.g. `Idempotency-Key`.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a multipart upload.
    pub fn with_upload(mut self, upload: Upload) -> Self {
        self.upload = Some(upload);
        self
    }
}
