//! The uniform `{success, message|error, data?}` envelope and the error
//! taxonomy shared by every request.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::validation::ValidationError;

/// Text shown for transport failures where the server said nothing useful.
pub const GENERIC_ERROR_MESSAGE: &str =
    "An error occurred. Please check your connection and try again.";

/// Envelope returned by every write endpoint (and most read endpoints).
///
/// Keys the server adds next to the standard four (for example
/// `is_published` or `academic_year`) are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MutationResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MutationResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Turn a `success:false` envelope into [`ApiError::Server`], carrying the
    /// server's `error` text verbatim.
    pub fn into_result(self) -> Result<Self, ApiError> {
        if self.success {
            return Ok(self);
        }
        let text = self
            .error
            .clone()
            .or_else(|| self.message.clone())
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "Request failed".to_string());
        Err(ApiError::Server(text))
    }

    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }

    /// Deserialize the `data` payload.
    pub fn data_as<T: DeserializeOwned>(&self) -> Option<T> {
        self.data
            .clone()
            .and_then(|value| serde_json::from_value(value).ok())
    }

    /// Deserialize a named payload, looking at the top level first and then
    /// inside `data`.
    pub fn field_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.extra.get(key).cloned().or_else(|| {
            self.data
                .as_ref()
                .and_then(|data| data.get(key))
                .cloned()
        })?;
        serde_json::from_value(value).ok()
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.field_as::<bool>(key)
    }
}

/// Pagination block attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub start_index: usize,
    pub end_index: usize,
}

impl Pagination {
    /// Pagination for an unpaged list of `count` rows.
    pub fn single_page(count: usize) -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_count: count,
            start_index: usize::from(count > 0),
            end_index: count,
        }
    }

    pub fn has_multiple_pages(&self) -> bool {
        self.total_pages > 1
    }

    pub fn summary(&self, noun: &str) -> String {
        format!(
            "Showing {}-{} of {} {}",
            self.start_index, self.end_index, self.total_count, noun
        )
    }
}

fn default_success() -> bool {
    true
}

/// A page of list results.
///
/// The server names the collection after the resource (`terms`,
/// `students`, ...); all of those spellings land in `items`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListPage<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(
        default = "Vec::new",
        alias = "terms",
        alias = "students",
        alias = "teachers",
        alias = "classes",
        alias = "subjects",
        alias = "results",
        alias = "users",
        alias = "admins",
        alias = "academic_years",
        alias = "assignments"
    )]
    pub items: Vec<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> ListPage<T> {
    pub fn pagination_or_single(&self) -> Pagination {
        self.pagination
            .unwrap_or_else(|| Pagination::single_page(self.items.len()))
    }
}

/// Failure of any request, from transport to client-side validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {0} ms")]
    Timeout(u32),
    #[error("request cancelled")]
    Cancelled,
    #[error("HTTP error: {0}")]
    Http(u16),
    #[error("parse error: {0}")]
    Decode(String),
    #[error("{0}")]
    Server(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ApiError {
    /// Text for the notification sink. Server errors pass through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server(message) => message.clone(),
            ApiError::Validation(err) => err.to_string(),
            ApiError::Timeout(_) => {
                "The server took too long to respond. Please try again.".to_string()
            },
            ApiError::Cancelled => "Request cancelled.".to_string(),
            ApiError::Network(_) | ApiError::Http(_) | ApiError::Decode(_) => {
                GENERIC_ERROR_MESSAGE.to_string()
            },
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::Network(_)
                | ApiError::Timeout(_)
                | ApiError::Cancelled
                | ApiError::Http(_)
                | ApiError::Decode(_)
        )
    }
}

/// Raw HTTP answer handed back by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success_status(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Parse a JSON body whatever the status. Django answers validation failures
/// with `400` and a JSON envelope, so the body wins over the status line;
/// only an unparseable error response falls back to [`ApiError::Http`].
pub fn decode_json<T: DeserializeOwned>(response: &RawResponse) -> Result<T, ApiError> {
    match serde_json::from_str::<T>(&response.body) {
        Ok(value) => Ok(value),
        Err(_) if !response.is_success_status() => Err(ApiError::Http(response.status)),
        Err(err) => Err(ApiError::Decode(err.to_string())),
    }
}

pub fn decode_envelope(response: &RawResponse) -> Result<MutationResult, ApiError> {
    decode_json::<MutationResult>(response)?.into_result()
}

pub fn decode_list<T: DeserializeOwned>(response: &RawResponse) -> Result<ListPage<T>, ApiError> {
    let page = decode_json::<ListPage<T>>(response)?;
    if page.success {
        Ok(page)
    } else {
        Err(ApiError::Server(
            page.error
                .unwrap_or_else(|| "Failed to load records".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::{decode_envelope, decode_list, ApiError, MutationResult, RawResponse};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: u32,
    }

    #[test]
    fn failure_envelope_surfaces_error_verbatim_even_on_400() {
        let response = RawResponse::new(400, r#"{"success":false,"error":"Name and code are required."}"#);
        let err = decode_envelope(&response).expect_err("should fail");
        assert_eq!(err, ApiError::Server("Name and code are required.".to_string()));
        assert_eq!(err.user_message(), "Name and code are required.");
    }

    #[test]
    fn html_error_page_maps_to_http_status() {
        let response = RawResponse::new(500, "<html>boom</html>");
        let err = decode_envelope(&response).expect_err("should fail");
        assert_eq!(err, ApiError::Http(500));
        assert!(err.is_transport());
    }

    #[test]
    fn extra_top_level_keys_are_readable() {
        let response =
            RawResponse::new(200, r#"{"success":true,"message":"Published","is_published":true}"#);
        let envelope = decode_envelope(&response).expect("ok envelope");
        assert_eq!(envelope.flag("is_published"), Some(true));
        assert_eq!(envelope.message_or("fallback"), "Published");
    }

    #[test]
    fn list_accepts_resource_named_collection() {
        let response = RawResponse::new(
            200,
            r#"{"success":true,"terms":[{"id":1},{"id":2}],
                "pagination":{"current_page":1,"total_pages":3,"total_count":25,"start_index":1,"end_index":10}}"#,
        );
        let page = decode_list::<Row>(&response).expect("list");
        assert_eq!(page.items, vec![Row { id: 1 }, Row { id: 2 }]);
        let pagination = page.pagination_or_single();
        assert!(pagination.has_multiple_pages());
        assert_eq!(pagination.summary("terms"), "Showing 1-10 of 25 terms");
    }

    #[test]
    fn failed_without_error_text_gets_fallback() {
        let err = MutationResult::default().into_result().expect_err("should fail");
        assert_eq!(err, ApiError::Server("Request failed".to_string()));
    }
}
