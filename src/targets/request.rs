use std::path::Path;

use reqwest::header::{CONTENT_LENGTH, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Request, RequestBuilder, Url};

use crate::error::{AppError, AppResult, HttpError};

use super::{Header, Target};

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("stress/", env!("CARGO_PKG_VERSION"));

const DEFAULT_FORM_FIELD: &str = "file";
const MD5_HEX_LEN: usize = 32;

/// How the body of a POST request is produced.
#[derive(Debug, PartialEq, Eq)]
enum BodySpec<'spec> {
    Default,
    Form { field: &'spec str, path: &'spec str },
    File(&'spec str),
}

impl Target {
    /// Builds a request for this target on `client`.
    ///
    /// For `POST` targets with a file spec the body comes from disk: a spec
    /// containing `form` uploads `form:<file>` or `form:<field>:<file>` as
    /// multipart data, any other spec is read as a raw body with an explicit
    /// `Content-Length`. Otherwise the default body is sent. The target's
    /// headers are copied onto the request, followed by the `User-Agent`.
    /// A `Host` header is sent as given, so the URL may point at an IP while
    /// the request addresses a virtual host.
    ///
    /// # Errors
    ///
    /// Returns an error when the method, URL or headers are invalid, the
    /// form spec is malformed, or the body file cannot be read.
    pub fn request(&self, client: &Client) -> AppResult<Request> {
        let method = Method::from_bytes(self.method.as_bytes()).map_err(|err| {
            AppError::http(HttpError::InvalidMethod {
                method: self.method.clone(),
                source: err,
            })
        })?;
        let url = Url::parse(&self.url).map_err(|err| {
            AppError::http(HttpError::InvalidUrl {
                url: self.url.clone(),
                source: err,
            })
        })?;

        let mut content_length = None;
        let builder = client.request(method.clone(), url);
        let builder = match self.body_spec(&method)? {
            BodySpec::Default if self.body.is_empty() => builder,
            BodySpec::Default => builder.body(self.body.clone()),
            BodySpec::Form { field, path } => builder.multipart(build_form(field, path)?),
            BodySpec::File(path) => {
                let body = std::fs::read(path).map_err(|err| {
                    AppError::http(HttpError::ReadBodyFile {
                        path: Path::new(path).to_path_buf(),
                        source: err,
                    })
                })?;
                content_length = Some(body.len());
                builder.body(body)
            }
        };

        let mut request = build(builder)?;
        let headers = request.headers_mut();
        if let Some(len) = content_length {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
        }
        copy_headers(&self.header, headers)?;
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        Ok(request)
    }

    /// Lowercase digest from an `md5:<32-hex>` file spec.
    #[must_use]
    pub fn expected_md5(&self) -> Option<String> {
        if !self.file_spec.contains("md5") {
            return None;
        }
        let parts: Vec<&str> = self.file_spec.split(':').collect();
        let [_, digest] = parts.as_slice() else {
            return None;
        };
        if digest.len() == MD5_HEX_LEN && digest.chars().all(|ch| ch.is_ascii_hexdigit()) {
            Some(digest.to_ascii_lowercase())
        } else {
            None
        }
    }

    fn body_spec(&self, method: &Method) -> AppResult<BodySpec<'_>> {
        if *method != Method::POST || self.file_spec.is_empty() {
            return Ok(BodySpec::Default);
        }
        if !self.file_spec.contains("form") {
            return Ok(BodySpec::File(&self.file_spec));
        }
        let parts: Vec<&str> = self.file_spec.split(':').collect();
        match parts.as_slice() {
            [_, path] => Ok(BodySpec::Form {
                field: DEFAULT_FORM_FIELD,
                path: *path,
            }),
            [_, field, path] => Ok(BodySpec::Form {
                field: *field,
                path: *path,
            }),
            _ => Err(AppError::http(HttpError::InvalidFormSpec {
                spec: self.file_spec.clone(),
            })),
        }
    }
}

fn build_form(field: &str, path: &str) -> AppResult<Form> {
    let bytes = std::fs::read(path).map_err(|err| {
        AppError::http(HttpError::ReadFormFile {
            path: Path::new(path).to_path_buf(),
            source: err,
        })
    })?;
    let part = Part::bytes(bytes)
        .file_name(path.to_owned())
        .mime_str("application/octet-stream")
        .map_err(|err| AppError::http(HttpError::InvalidFormPart { source: err }))?;
    Ok(Form::new().part(field.to_owned(), part))
}

fn build(builder: RequestBuilder) -> AppResult<Request> {
    builder
        .build()
        .map_err(|err| AppError::http(HttpError::BuildRequestFailed { source: err }))
}

fn copy_headers(header: &Header, headers: &mut HeaderMap) -> AppResult<()> {
    for (key, values) in header.iter() {
        let name = header_name(key)?;
        headers.remove(&name);
        for value in values {
            headers.append(name.clone(), header_value(key, value)?);
        }
    }
    Ok(())
}

fn header_name(key: &str) -> AppResult<HeaderName> {
    HeaderName::from_bytes(key.as_bytes()).map_err(|err| {
        AppError::http(HttpError::InvalidHeaderName {
            name: key.to_owned(),
            source: err,
        })
    })
}

fn header_value(key: &str, value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|err| {
        AppError::http(HttpError::InvalidHeaderValue {
            name: key.to_owned(),
            source: err,
        })
    })
}
