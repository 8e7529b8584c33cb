use crate::domain::errors::RequestError;
use crate::domain::value_objects::{JsonBody, Payload, Url};
use hyper::{HeaderMap, StatusCode};
use std::fmt;
use std::str::FromStr;

/// HTTP method enum for simplicity
///
/// Anything outside the common verbs is carried as a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Other(hyper::Method),
}

impl FromStr for Method {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            other => hyper::Method::from_bytes(other.as_bytes())
                .map(Method::Other)
                .map_err(|_| RequestError::UnsupportedMethod(other.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Other(method) => method.as_str(),
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        };
        f.write_str(name)
    }
}

/// Persisted base URL and auth token. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub base_url: Option<String>,
    pub auth_token: Option<String>,
}

/// What the user asked for on a single `req` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: String,
    pub direct_url: Option<String>,
    pub override_base_url: Option<String>,
    pub path: Option<String>,
    pub data_pairs: Option<Vec<String>>,
    pub fields: Option<String>,
}

/// What the user asked for on a `login` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginDescriptor {
    pub username: String,
    pub password: String,
    pub direct_url: Option<String>,
    pub override_base_url: Option<String>,
    pub login_path: String,
}

/// Represents an HTTP request
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>, // Key-value pairs for headers
    pub body: Option<JsonBody>,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Represents an HTTP response
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    /// Reason phrase sent by the server, when it differs from the canonical one
    pub reason: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl Response {
    pub fn reason(&self) -> String {
        self.reason
            .clone()
            .or_else(|| self.status.canonical_reason().map(str::to_string))
            .unwrap_or_default()
    }
}

/// Classified result of a single dispatched request
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome {
    Success {
        status: StatusCode,
        payload: Payload,
    },
    HttpError {
        status: StatusCode,
        reason: String,
        body: Option<Payload>,
    },
    TransportError {
        reason: String,
    },
}

impl ResponseOutcome {
    pub fn from_response(response: Response) -> Self {
        if response.status.is_success() {
            return ResponseOutcome::Success {
                status: response.status,
                payload: Payload::decode(response.body),
            };
        }

        let reason = response.reason();
        let body = (!response.body.is_empty()).then(|| Payload::decode(response.body));
        ResponseOutcome::HttpError {
            status: response.status,
            reason,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> Response {
        Response {
            status: StatusCode::from_u16(status).unwrap(),
            reason: None,
            headers: HeaderMap::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn method_parsing_is_case_insensitive() {
        assert_eq!("post".parse::<Method>().unwrap(), Method::Post);
        assert_eq!(
            "mkcol".parse::<Method>().unwrap().to_string(),
            "MKCOL"
        );
        assert_eq!(
            "bad(method)".parse::<Method>(),
            Err(RequestError::UnsupportedMethod("BAD(METHOD)".into()))
        );
    }

    #[test]
    fn non_json_error_body_is_kept_as_text() {
        let outcome = ResponseOutcome::from_response(response(502, "bad gateway"));
        assert_eq!(
            outcome,
            ResponseOutcome::HttpError {
                status: StatusCode::BAD_GATEWAY,
                reason: "Bad Gateway".into(),
                body: Some(Payload::Text("bad gateway".into())),
            }
        );
    }

    #[test]
    fn empty_error_body_is_dropped() {
        let outcome = ResponseOutcome::from_response(response(404, ""));
        assert!(matches!(
            outcome,
            ResponseOutcome::HttpError { body: None, .. }
        ));
    }

    #[test]
    fn server_reason_phrase_wins() {
        let mut resp = response(418, "");
        resp.reason = Some("Short And Stout".into());
        assert_eq!(resp.reason(), "Short And Stout");
    }
}
