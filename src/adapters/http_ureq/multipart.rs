//! multipart/form-data body encoding

use uuid::Uuid;

/// Builder for multipart/form-data bodies; file bytes can be left out and
/// streamed between the encoded pieces
#[derive(Debug)]
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartForm {
    /// Start a form with a random boundary
    pub fn new() -> Self {
        Self::with_boundary(format!("----trimx-{}", Uuid::new_v4().simple()))
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            body: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's `Content-Type` header
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Append a plain text field
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.open_part();
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                escape_quoted(name)
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Open a file field without its bytes; they are written by the caller
    /// between this and `end_file`
    pub fn file_head(mut self, name: &str, filename: &str, content_type: &str) -> Self {
        self.open_part();
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                escape_quoted(name),
                escape_quoted(filename),
                content_type
            )
            .as_bytes(),
        );
        self
    }

    /// Terminate the file bytes of the preceding field
    pub fn end_file(mut self) -> Self {
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Encoded bytes so far, without the closing delimiter
    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }

    /// Close the form and return the encoded body
    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.body
    }

    fn open_part(&mut self) {
        self.body
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
    }
}

// Percent-encode the characters that would break a quoted header parameter
fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
