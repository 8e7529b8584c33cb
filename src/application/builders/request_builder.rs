use crate::application::coercion::coerce;
use crate::domain::entities::{Method, Request};
use crate::domain::errors::RequestError;
use crate::domain::value_objects::{FormFields, JsonBody, Url};
use http::HeaderValue;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::json;
use std::str::FromStr;

pub struct RequestBuilder {
    method: Option<Method>,
    url: Option<Url>,
    headers: Vec<(String, String)>,
    form: Option<FormFields>,
    body: Option<JsonBody>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            url: None,
            headers: vec![(CONTENT_TYPE.as_str().to_string(), "application/json".to_string())],
            form: None,
            body: None,
        }
    }

    /// Generic API call: JSON content type, optional token, and a coerced
    /// `--data` body for POST only.
    pub fn api_call(
        method: &str,
        url: &str,
        token: Option<&str>,
        pairs: Option<&[String]>,
    ) -> Result<Request, RequestError> {
        Self::new()
            .method(method)?
            .url(url)?
            .authorization(token)?
            .form(pairs)?
            .build()
    }

    /// Login call: always a POST with a username/password JSON body and no token.
    pub fn login(url: &str, username: &str, password: &str) -> Result<Request, RequestError> {
        Self::new()
            .method("POST")?
            .url(url)?
            .json(JsonBody::from_value(&json!({
                "username": username,
                "password": password,
            }))?)
            .build()
    }

    pub fn method(mut self, method: &str) -> Result<Self, RequestError> {
        self.method = Some(Method::from_str(method)?);
        Ok(self)
    }

    pub fn url(mut self, raw_url: &str) -> Result<Self, RequestError> {
        self.url = Some(Url::new(raw_url)?);
        Ok(self)
    }

    /// Replays the stored token verbatim; no scheme prefix is added.
    pub fn authorization(mut self, token: Option<&str>) -> Result<Self, RequestError> {
        if let Some(token) = token {
            HeaderValue::from_str(token)
                .map_err(|_| RequestError::InvalidHeader(AUTHORIZATION.as_str().to_string()))?;
            self.headers
                .push((AUTHORIZATION.as_str().to_string(), token.to_string()));
        }
        Ok(self)
    }

    pub fn form(mut self, pairs: Option<&[String]>) -> Result<Self, RequestError> {
        if let Some(pairs) = pairs.filter(|pairs| !pairs.is_empty()) {
            self.form = Some(coerce(pairs)?);
        }
        Ok(self)
    }

    pub fn json(mut self, body: JsonBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn build(self) -> Result<Request, RequestError> {
        let method = self
            .method
            .ok_or_else(|| RequestError::UnsupportedMethod(String::new()))?;
        let url = self.url.ok_or_else(|| RequestError::InvalidUrl {
            url: String::new(),
            reason: "URL is required".to_string(),
        })?;

        let body = match (self.body, self.form) {
            (Some(body), _) => Some(body),
            (None, Some(form)) if method == Method::Post => Some(JsonBody::from_value(&form)?),
            _ => None,
        };

        Ok(Request {
            method,
            url,
            headers: self.headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn post_with_pairs_gets_coerced_json_body() {
        let data = pairs(&["title=hi", "count=3"]);
        let request =
            RequestBuilder::api_call("post", "http://h/items", Some("tok"), Some(data.as_slice())).unwrap();

        assert_eq!(request.method, Method::Post);
        assert_eq!(
            request.body.as_ref().unwrap().0,
            r#"{"title":"hi","count":3}"#
        );
        assert_eq!(request.header("authorization"), Some("tok"));
        assert_eq!(request.header("content-type"), Some("application/json"));
    }

    #[test]
    fn non_post_methods_never_carry_a_body() {
        let data = pairs(&["a=1"]);
        let request = RequestBuilder::api_call("PUT", "http://h/x", None, Some(data.as_slice())).unwrap();
        assert!(request.body.is_none());
    }

    #[test]
    fn post_without_pairs_has_no_empty_object_body() {
        let request = RequestBuilder::api_call("POST", "http://h/x", None, None).unwrap();
        assert!(request.body.is_none());

        let request = RequestBuilder::api_call("POST", "http://h/x", None, Some(Vec::<String>::new().as_slice())).unwrap();
        assert!(request.body.is_none());
    }

    #[test]
    fn token_is_replayed_verbatim_and_optional() {
        let request =
            RequestBuilder::api_call("GET", "http://h/x", Some("Bearer abc.def"), None).unwrap();
        assert_eq!(request.header("Authorization"), Some("Bearer abc.def"));

        let request = RequestBuilder::api_call("GET", "http://h/x", None, None).unwrap();
        assert_eq!(request.header("Authorization"), None);
        assert_eq!(request.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn token_with_newline_is_rejected() {
        let result = RequestBuilder::api_call("GET", "http://h/x", Some("a\nb"), None);
        assert_eq!(
            result.unwrap_err(),
            RequestError::InvalidHeader("authorization".into())
        );
    }

    #[test]
    fn any_valid_method_token_is_accepted() {
        let request = RequestBuilder::api_call("trace", "http://h/x", None, None).unwrap();
        assert_eq!(request.method, Method::Other(hyper::Method::TRACE));
        assert_eq!(request.method.to_string(), "TRACE");

        let request = RequestBuilder::api_call("PROPFIND", "http://h/x", None, None).unwrap();
        assert_eq!(request.method.to_string(), "PROPFIND");
    }

    #[test]
    fn malformed_method_token_is_rejected() {
        assert_eq!(
            RequestBuilder::api_call("GE T", "http://h/x", None, None).unwrap_err(),
            RequestError::UnsupportedMethod("GE T".into())
        );
        assert!(RequestBuilder::api_call("", "http://h/x", None, None).is_err());
    }

    #[test]
    fn login_body_has_credentials_and_no_token() {
        let request = RequestBuilder::login("http://h/login", "fluffy", "pw=1").unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(
            request.body.as_ref().unwrap().0,
            r#"{"username":"fluffy","password":"pw=1"}"#
        );
        assert_eq!(request.header("Authorization"), None);
    }
}
