use poem::http::header::{HeaderName, LOCATION, SET_COOKIE};
use poem::http::{Method, StatusCode};
use poem::web::cookie::Cookie;

/// What a handler intends to send; the pipeline formats it once at the end
#[derive(Debug)]
pub struct Reply<T> {
    pub(crate) status: Option<StatusCode>,
    pub(crate) body: Option<T>,
    pub(crate) headers: Vec<(HeaderName, String)>,
}

impl<T> Reply<T> {
    pub fn new(body: T) -> Self {
        Self {
            status: None,
            body: Some(body),
            headers: Vec::new(),
        }
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn location(self, path: impl Into<String>) -> Self {
        self.header(LOCATION, path)
    }

    pub fn header(mut self, name: HeaderName, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn cookie(self, cookie: Cookie) -> Self {
        self.header(SET_COOKIE, cookie.to_string())
    }

    /// Explicit status, else 201 for POST, else 204 without a body, else 200
    pub(crate) fn resolve_status(&self, method: &str) -> StatusCode {
        if let Some(status) = self.status {
            return status;
        }
        if method == Method::POST.as_str() {
            return StatusCode::CREATED;
        }
        if self.body.is_none() {
            return StatusCode::NO_CONTENT;
        }
        StatusCode::OK
    }
}

impl Reply<()> {
    pub fn empty() -> Self {
        Self {
            status: None,
            body: None,
            headers: Vec::new(),
        }
    }
}
