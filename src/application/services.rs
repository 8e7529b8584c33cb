use crate::application::builders::request_builder::RequestBuilder;
use crate::application::resolver::UrlResolver;
use crate::domain::entities::{
    Credentials, LoginDescriptor, Request, RequestDescriptor, Response, ResponseOutcome,
};
use crate::domain::errors::{LoginError, RequestError, TransportError};
use crate::domain::value_objects::Url;
use async_trait::async_trait;
use http::header::AUTHORIZATION;
use tracing::{debug, info};

/// Trait for HTTP clients to enable mocking and dependency inversion
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Performs exactly one round trip. Any HTTP status counts as a response.
    async fn send(&self, request: Request) -> Result<Response, TransportError>;
}

/// Application service for orchestrating HTTP request workflows
/// This contains business logic and use cases
pub struct HttpRequestService {
    http_client: Box<dyn HttpClient>,
}

impl HttpRequestService {
    pub fn new(http_client: Box<dyn HttpClient>) -> Self {
        Self { http_client }
    }

    /// Resolves, builds and sends a generic API request, then classifies the
    /// result. Input problems are returned as errors before any I/O.
    pub async fn dispatch(
        &self,
        descriptor: &RequestDescriptor,
        credentials: &Credentials,
    ) -> Result<ResponseOutcome, RequestError> {
        let url = UrlResolver::resolve(
            descriptor.direct_url.as_deref(),
            descriptor.override_base_url.as_deref(),
            credentials.base_url.as_deref(),
            descriptor.path.as_deref(),
        )?;
        debug!(%url, method = %descriptor.method, "resolved request URL");

        let request = RequestBuilder::api_call(
            &descriptor.method,
            &url,
            credentials.auth_token.as_deref(),
            descriptor.data_pairs.as_deref(),
        )?;
        RequestValidator::validate(&request)?;

        let outcome = match self.http_client.send(request).await {
            Ok(response) => {
                info!(status = %response.status, "response received");
                ResponseOutcome::from_response(response)
            }
            Err(err) => {
                debug!(reason = %err.reason, "transport failure");
                ResponseOutcome::TransportError { reason: err.reason }
            }
        };
        Ok(outcome)
    }

    /// Posts the credentials and returns `credentials` with the token the
    /// server handed back in its `Authorization` header.
    ///
    /// A non-2xx status fails before the header is looked at.
    pub async fn login(
        &self,
        login: &LoginDescriptor,
        credentials: &Credentials,
    ) -> Result<Credentials, LoginError> {
        let url = UrlResolver::resolve(
            login.direct_url.as_deref(),
            login.override_base_url.as_deref(),
            credentials.base_url.as_deref(),
            Some(&login.login_path),
        )
        .map_err(RequestError::from)?;
        debug!(%url, username = %login.username, "logging in");

        let request = RequestBuilder::login(&url, &login.username, &login.password)?;
        RequestValidator::validate(&request)?;

        let response = self.http_client.send(request).await?;
        info!(status = %response.status, "login response received");

        if !response.status.is_success() {
            return Err(LoginError::Http {
                status: response.status,
                reason: response.reason(),
            });
        }

        let token = response
            .headers
            .get(AUTHORIZATION)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .ok_or(LoginError::NoAuthHeader)?;

        Ok(Credentials {
            base_url: credentials.base_url.clone(),
            auth_token: Some(token),
        })
    }
}

/// Domain service for request validation
/// This contains domain business rules
pub struct RequestValidator;

impl RequestValidator {
    pub fn validate(request: &Request) -> Result<(), RequestError> {
        Self::validate_url(&request.url)
    }

    fn validate_url(url: &Url) -> Result<(), RequestError> {
        let invalid = |reason: &str| RequestError::InvalidUrl {
            url: url.as_str(),
            reason: reason.to_string(),
        };

        match url.0.scheme_str() {
            Some("http") | Some("https") => {}
            _ => return Err(invalid("URL must start with http:// or https://")),
        }
        if url.0.host().is_none_or(str::is_empty) {
            return Err(invalid("URL has no host"));
        }
        Ok(())
    }
}
