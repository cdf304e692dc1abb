//! Description of one protected request.

use std::fmt;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde::Serialize;

use bigs_core::error::{InvalidInputError, RequestError, TransportError};
use bigs_core::{AccessToken, Attachment, Result};

/// HTTP methods the blog API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_reqwest().as_str())
    }
}

/// One part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    /// A text part, optionally typed (e.g. a JSON blob).
    Text {
        name: String,
        value: String,
        mime_type: Option<String>,
    },
    /// A file part.
    File { name: String, attachment: Attachment },
}

impl FormPart {
    /// A part carrying `value` serialized as `application/json`.
    pub fn json<T: Serialize>(name: impl Into<String>, value: &T) -> Result<Self> {
        let value = serde_json::to_string(value).map_err(|e| InvalidInputError::Other {
            message: format!("cannot serialize form part: {e}"),
        })?;
        Ok(FormPart::Text {
            name: name.into(),
            value,
            mime_type: Some("application/json".to_string()),
        })
    }

    pub fn file(name: impl Into<String>, attachment: Attachment) -> Self {
        FormPart::File {
            name: name.into(),
            attachment,
        }
    }

    fn to_part(&self) -> std::result::Result<(String, Part), RequestError> {
        let (name, part) = match self {
            FormPart::Text {
                name,
                value,
                mime_type,
            } => {
                let part = Part::text(value.clone());
                let part = match mime_type {
                    Some(mime) => part.mime_str(mime).map_err(invalid_mime)?,
                    None => part,
                };
                (name, part)
            }
            FormPart::File { name, attachment } => {
                let part = Part::bytes(attachment.bytes.clone())
                    .file_name(attachment.file_name.clone())
                    .mime_str(&attachment.mime_type)
                    .map_err(invalid_mime)?;
                (name, part)
            }
        };
        Ok((name.clone(), part))
    }
}

fn invalid_mime(err: reqwest::Error) -> RequestError {
    RequestError::Transport(TransportError::Http {
        message: format!("invalid form part type: {err}"),
    })
}

/// Request body. Owned, so the request can be rebuilt for its retry.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    Multipart(Vec<FormPart>),
}

/// A pending protected request: owned by one dispatch and never shared.
///
/// # Example
///
/// ```
/// use bigs_http::{Method, RequestDescriptor};
///
/// let request = RequestDescriptor::get("/api/boards")
///     .query("page", "0")
///     .query("size", "10");
/// assert_eq!(request.method(), Method::Get);
/// ```
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<RequestBody>,
    override_authorization: bool,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            override_authorization: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a header. Merged with the bearer header at send time; an
    /// `Authorization` header here is ignored unless
    /// [`override_authorization`](Self::override_authorization) is set.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Let a caller-supplied `Authorization` header replace the bearer token.
    pub fn override_authorization(mut self) -> Self {
        self.override_authorization = true;
        self
    }

    /// Send `body` as JSON.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body).map_err(|e| InvalidInputError::Other {
            message: format!("cannot serialize request body: {e}"),
        })?;
        self.body = Some(RequestBody::Json(value));
        Ok(self)
    }

    /// Send a multipart form.
    pub fn multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = Some(RequestBody::Multipart(parts));
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// Headers to send with `token`: caller headers plus the bearer header.
    pub(crate) fn headers_with_bearer(
        &self,
        token: &AccessToken,
    ) -> std::result::Result<HeaderMap, RequestError> {
        let mut headers = self.headers.clone();

        // reqwest writes the multipart boundary itself.
        if matches!(self.body, Some(RequestBody::Multipart(_))) {
            headers.remove(CONTENT_TYPE);
        }

        if !(self.override_authorization && headers.contains_key(AUTHORIZATION)) {
            let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                .map_err(|_| {
                    RequestError::Transport(TransportError::Http {
                        message: "access token is not a valid header value".to_string(),
                    })
                })?;
            bearer.set_sensitive(true);
            headers.insert(AUTHORIZATION, bearer);
        }

        Ok(headers)
    }

    /// Attach method, query, headers and body to a fresh request builder.
    pub(crate) fn build(
        &self,
        client: &reqwest::Client,
        url: &str,
        token: &AccessToken,
    ) -> std::result::Result<reqwest::RequestBuilder, RequestError> {
        let mut builder = client
            .request(self.method.as_reqwest(), url)
            .headers(self.headers_with_bearer(token)?);

        if !self.query.is_empty() {
            builder = builder.query(&self.query);
        }

        builder = match &self.body {
            None => builder,
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Multipart(parts)) => {
                let mut form = Form::new();
                for part in parts {
                    let (name, part) = part.to_part()?;
                    form = form.part(name, part);
                }
                builder.multipart(form)
            }
        };

        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_is_added() {
        let request = RequestDescriptor::get("/api/boards");
        let headers = request
            .headers_with_bearer(&AccessToken::new("AT1"))
            .unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer AT1");
    }

    #[test]
    fn caller_headers_are_merged() {
        let request = RequestDescriptor::get("/api/boards")
            .header(
                HeaderName::from_static("x-trace"),
                HeaderValue::from_static("abc"),
            )
            .header(AUTHORIZATION, HeaderValue::from_static("Basic Zm9v"));
        let headers = request
            .headers_with_bearer(&AccessToken::new("AT1"))
            .unwrap();

        assert_eq!(headers["x-trace"], "abc");
        assert_eq!(headers[AUTHORIZATION], "Bearer AT1");
        assert_eq!(headers.get_all(AUTHORIZATION).iter().count(), 1);
    }

    #[test]
    fn explicit_override_keeps_caller_authorization() {
        let request = RequestDescriptor::get("/api/boards")
            .header(AUTHORIZATION, HeaderValue::from_static("Basic Zm9v"))
            .override_authorization();
        let headers = request
            .headers_with_bearer(&AccessToken::new("AT1"))
            .unwrap();
        assert_eq!(headers[AUTHORIZATION], "Basic Zm9v");
    }

    #[test]
    fn override_without_caller_header_still_sends_bearer() {
        let request = RequestDescriptor::get("/api/boards").override_authorization();
        let headers = request
            .headers_with_bearer(&AccessToken::new("AT1"))
            .unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer AT1");
    }

    #[test]
    fn multipart_drops_caller_content_type() {
        let request = RequestDescriptor::post("/api/boards")
            .header(
                CONTENT_TYPE,
                HeaderValue::from_static("multipart/form-data"),
            )
            .multipart(vec![FormPart::file(
                "file",
                Attachment::new("a.png", "image/png", vec![1, 2, 3]),
            )]);
        let headers = request
            .headers_with_bearer(&AccessToken::new("AT1"))
            .unwrap();
        assert!(!headers.contains_key(CONTENT_TYPE));
    }

    #[test]
    fn method_display() {
        assert_eq!(Method::Patch.to_string(), "PATCH");
    }
}
