//! Browser side of the request plumbing: the `gloo-net` transport, the
//! anti-forgery token reader and the loaders behind select fields.

use std::{cell::Cell, rc::Rc};

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use gloo_timers::callback::Timeout;
use school_admin_shared::{
    bulk::BulkAction,
    csrf::{resolve_token, CsrfSource, CSRF_FORM_FIELD},
    envelope::{decode_list, RawResponse},
    form::OptionSource,
    models::{NamedOption, TeacherOption},
    resource::{paths, HttpMethod},
    submit::{ApiClient, ApiRequest, RequestBody, Transport},
    ApiError, MutationResult,
};
use wasm_bindgen::JsCast;
use web_sys::{AbortController, HtmlDocument, HtmlInputElement};

use crate::config::{api_url, panel_config};

pub type Client = ApiClient<BrowserTransport, DocumentCsrf>;

/// Client wired to the page's fetch and anti-forgery token.
pub fn client() -> Client {
    ApiClient::new(BrowserTransport::new(panel_config().request_timeout_ms), DocumentCsrf)
}

/// `fetch` through `gloo-net`, aborted after `timeout_ms`.
pub struct BrowserTransport {
    timeout_ms: u32,
}

impl BrowserTransport {
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            timeout_ms,
        }
    }
}

fn encode_pairs(pairs: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

fn request_url(request: &ApiRequest) -> String {
    let url = api_url(&request.path);
    if request.query.is_empty() {
        url
    } else {
        format!("{url}?{}", encode_pairs(&request.query))
    }
}

fn builder_for(method: HttpMethod, url: &str) -> RequestBuilder {
    match method {
        HttpMethod::Get => Request::get(url),
        HttpMethod::Post => Request::post(url),
        HttpMethod::Put => Request::put(url),
        HttpMethod::Delete => Request::delete(url),
    }
}

#[async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let controller =
            AbortController::new().map_err(|e| ApiError::Network(format!("{:?}", e)))?;
        let timed_out = Rc::new(Cell::new(false));
        // Dropping the timer at the end of this call cancels it.
        let _deadline = {
            let controller = controller.clone();
            let timed_out = Rc::clone(&timed_out);
            Timeout::new(self.timeout_ms, move || {
                timed_out.set(true);
                controller.abort();
            })
        };

        let signal = controller.signal();
        let mut builder =
            builder_for(request.method, &request_url(&request)).abort_signal(Some(&signal));
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(content_type) = request.body.content_type() {
            builder = builder.header("Content-Type", content_type);
        }
        let prepared = match &request.body {
            RequestBody::Empty => builder.build(),
            RequestBody::Json(value) => builder.body(value.to_string()),
            RequestBody::Form(pairs) => builder.body(encode_pairs(pairs)),
        }
        .map_err(|e| ApiError::Network(format!("{:?}", e)))?;

        let response = match prepared.send().await {
            Ok(response) => response,
            Err(_) if timed_out.get() => return Err(ApiError::Timeout(self.timeout_ms)),
            Err(e) => return Err(ApiError::Network(format!("{:?}", e))),
        };
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if timed_out.get() {
                ApiError::Timeout(self.timeout_ms)
            } else {
                ApiError::Decode(format!("{:?}", e))
            }
        })?;
        Ok(RawResponse::new(status, body))
    }
}

/// Reads the token from the hidden `csrfmiddlewaretoken` input, falling back
/// to the `csrftoken` cookie.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCsrf;

impl CsrfSource for DocumentCsrf {
    fn token(&self) -> Option<String> {
        let document = web_sys::window()?.document()?;
        let form_field = document
            .query_selector(&format!("input[name=\"{CSRF_FORM_FIELD}\"]"))
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value());
        let cookies = document
            .dyn_into::<HtmlDocument>()
            .ok()
            .and_then(|html| html.cookie().ok())
            .unwrap_or_default();
        resolve_token(form_field, &cookies).map(|token| {
            urlencoding::decode(&token)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| token.clone())
        })
    }
}

/// `(value, label)` pairs for a select field.
pub async fn load_options(
    client: &Client,
    source: OptionSource,
) -> Result<Vec<(String, String)>, ApiError> {
    let path = match source {
        OptionSource::Static(options) => {
            return Ok(options
                .iter()
                .map(|(value, label)| (value.to_string(), label.to_string()))
                .collect());
        },
        OptionSource::Teachers => {
            let response = client.send(ApiRequest::get(paths::TEACHER_OPTIONS)).await?;
            let teachers = decode_list::<TeacherOption>(&response)?.items;
            return Ok(teachers
                .into_iter()
                .map(|teacher| {
                    let label = if teacher.email.is_empty() {
                        teacher.name
                    } else {
                        format!("{} ({})", teacher.name, teacher.email)
                    };
                    (teacher.id, label)
                })
                .collect());
        },
        OptionSource::AcademicYears => paths::ACADEMIC_YEARS,
        OptionSource::Classes => paths::CLASS_OPTIONS,
        OptionSource::Subjects => paths::SUBJECT_OPTIONS,
    };
    let response = client.send(ApiRequest::get(path)).await?;
    Ok(decode_list::<NamedOption>(&response)?
        .items
        .into_iter()
        .map(|option| (option.id, option.name))
        .collect())
}

/// Apply a bulk action to the selected ids.
pub async fn submit_bulk(
    client: &Client,
    action: BulkAction,
    ids: &[String],
) -> Result<MutationResult, ApiError> {
    let (endpoint, body) = action.request(ids);
    client.submit(&endpoint, body).await
}
