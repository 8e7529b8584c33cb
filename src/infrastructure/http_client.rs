use crate::application::services::HttpRequestService;
use crate::domain::entities::{Method as DomainMethod, Request, Response};
use crate::domain::errors::TransportError;
use crate::domain::value_objects::{JsonBody, Url};

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::client::conn::http1;
use hyper::ext::ReasonPhrase;
use hyper::header::{HOST, HeaderName, HeaderValue, USER_AGENT};
use hyper::{Method, Request as HyperRequest};
use hyper_util::rt::TokioIo;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_native_tls::native_tls;
use tracing::{debug, trace};

const DEFAULT_USER_AGENT: &str = concat!("htp/", env!("CARGO_PKG_VERSION"));

/// Infrastructure implementation of HttpClient using Hyper
///
/// Opens a fresh connection for every request (TLS for `https://`), sends one
/// HTTP/1.1 request and reads the whole body. No pooling, no retries, no
/// timeouts: a silent server blocks the caller indefinitely.
pub struct HyperHttpClient {
    tls: native_tls::TlsConnector,
}

impl HyperHttpClient {
    pub fn new() -> Result<Self, TransportError> {
        let tls = native_tls::TlsConnector::new()
            .map_err(|e| TransportError::new(format!("TLS setup failed: {e}")))?;
        Ok(Self { tls })
    }

    /// Creates a configured HTTP request service using this client
    pub fn create_request_service(self) -> HttpRequestService {
        HttpRequestService::new(Box::new(self))
    }
}

#[async_trait]
impl crate::application::services::HttpClient for HyperHttpClient {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        let target = Target::from_url(&request.url)?;
        let hyper_request = RequestAdapter::to_hyper_request(request, &target)?;
        let hyper_response = self.execute_http_request(&target, hyper_request).await?;
        ResponseAdapter::to_domain_response(hyper_response).await
    }
}

impl HyperHttpClient {
    async fn execute_http_request(
        &self,
        target: &Target,
        request: HyperRequest<Full<Bytes>>,
    ) -> Result<hyper::Response<Incoming>, TransportError> {
        debug!(host = %target.host, port = target.port, tls = target.tls, "connecting");
        let tcp = TcpStream::connect((target.host.as_str(), target.port))
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;

        if target.tls {
            let connector = tokio_native_tls::TlsConnector::from(self.tls.clone());
            let stream = connector
                .connect(&target.host, tcp)
                .await
                .map_err(|e| TransportError::new(e.to_string()))?;
            Self::round_trip(stream, request).await
        } else {
            Self::round_trip(tcp, request).await
        }
    }

    async fn round_trip<S>(
        stream: S,
        request: HyperRequest<Full<Bytes>>,
    ) -> Result<hyper::Response<Incoming>, TransportError>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (mut sender, connection) = http1::handshake(TokioIo::new(stream))
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;
        tokio::spawn(async move {
            if let Err(err) = connection.await {
                trace!(error = %err, "connection closed with error");
            }
        });

        sender
            .send_request(request)
            .await
            .map_err(|e| TransportError::new(e.to_string()))
    }
}

/// Where to open the connection for a given URL
#[derive(Debug, Clone, PartialEq, Eq)]
struct Target {
    host: String,
    port: u16,
    tls: bool,
    authority: String,
    path_and_query: String,
}

impl Target {
    fn from_url(url: &Url) -> Result<Self, TransportError> {
        let uri = &url.0;
        let tls = url.is_https();
        let authority = uri
            .authority()
            .ok_or_else(|| TransportError::new(format!("no host in URL '{}'", url.as_str())))?;
        let host = authority
            .host()
            .trim_start_matches('[')
            .trim_end_matches(']')
            .to_string();
        let port = authority.port_u16().unwrap_or(if tls { 443 } else { 80 });
        let path_and_query = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .filter(|pq| !pq.is_empty())
            .unwrap_or("/")
            .to_string();

        Ok(Self {
            host,
            port,
            tls,
            authority: authority.as_str().to_string(),
            path_and_query,
        })
    }
}

/// Adapter for converting domain requests to Hyper requests
struct RequestAdapter;

impl RequestAdapter {
    fn to_hyper_request(
        domain_request: Request,
        target: &Target,
    ) -> Result<HyperRequest<Full<Bytes>>, TransportError> {
        let method = MethodAdapter::to_hyper_method(domain_request.method);
        let body = BodyAdapter::to_hyper_body(&domain_request.body);

        let builder = HyperRequest::builder()
            .method(method)
            .uri(target.path_and_query.as_str())
            .header(HOST, target.authority.as_str())
            .header(USER_AGENT, DEFAULT_USER_AGENT);

        HeaderAdapter::apply(builder, &domain_request.headers)?
            .body(body)
            .map_err(|e| TransportError::new(format!("Failed to build HTTP request: {e}")))
    }
}

/// Adapter for converting domain responses from Hyper responses
struct ResponseAdapter;

impl ResponseAdapter {
    async fn to_domain_response(
        hyper_response: hyper::Response<Incoming>,
    ) -> Result<Response, TransportError> {
        let status = hyper_response.status();
        let reason = hyper_response
            .extensions()
            .get::<ReasonPhrase>()
            .map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned());
        let headers = hyper_response.headers().clone();
        let body = Self::extract_response_body(hyper_response).await?;

        Ok(Response {
            status,
            reason,
            headers,
            body,
        })
    }

    async fn extract_response_body(
        response: hyper::Response<Incoming>,
    ) -> Result<String, TransportError> {
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|e| TransportError::new(format!("Failed to read response body: {e}")))?
            .to_bytes();

        Ok(String::from_utf8_lossy(&body_bytes).into_owned())
    }
}

/// Adapter for converting domain HTTP methods to Hyper methods
struct MethodAdapter;

impl MethodAdapter {
    fn to_hyper_method(domain_method: DomainMethod) -> Method {
        match domain_method {
            DomainMethod::Get => Method::GET,
            DomainMethod::Post => Method::POST,
            DomainMethod::Put => Method::PUT,
            DomainMethod::Delete => Method::DELETE,
            DomainMethod::Patch => Method::PATCH,
            DomainMethod::Head => Method::HEAD,
            DomainMethod::Options => Method::OPTIONS,
            DomainMethod::Other(method) => method,
        }
    }
}

/// Adapter for converting domain request bodies to Hyper bodies
struct BodyAdapter;

impl BodyAdapter {
    fn to_hyper_body(domain_body: &Option<JsonBody>) -> Full<Bytes> {
        match domain_body {
            Some(json_body) => Full::new(Bytes::copy_from_slice(json_body.as_bytes())),
            None => Full::new(Bytes::new()),
        }
    }
}

/// Adapter for handling HTTP headers
struct HeaderAdapter;

impl HeaderAdapter {
    fn apply(
        mut builder: http::request::Builder,
        headers: &[(String, String)],
    ) -> Result<http::request::Builder, TransportError> {
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| TransportError::new(format!("invalid header name '{name}'")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| TransportError::new(format!("invalid value for header '{name}'")))?;
            builder = builder.header(name, value);
        }
        Ok(builder)
    }
}
