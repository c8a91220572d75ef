//! HTTP transport on top of reqwest.

use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use sunulek_core::error::{InvalidInputError, NetworkError, RequestError};
use sunulek_core::{
    AccessToken, ApiUrl, ClientConfig, Error, FormPart, Method, MultipartForm, OutboundRequest,
    RequestBody, Result,
};

use crate::client::ApiResponse;

/// Sends [`OutboundRequest`]s to the configured API.
#[derive(Debug, Clone)]
pub(crate) struct HttpTransport {
    client: reqwest::Client,
    base_url: ApiUrl,
}

impl HttpTransport {
    pub(crate) fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(network_error)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub(crate) fn base_url(&self) -> &ApiUrl {
        &self.base_url
    }

    /// Issue `request`, with `Authorization: Bearer <token>` when a token is
    /// given and no `Authorization` header otherwise.
    pub(crate) async fn send(
        &self,
        request: &OutboundRequest,
        token: Option<&AccessToken>,
    ) -> Result<reqwest::Response> {
        let url = self.base_url.endpoint(request.path())?;
        debug!(method = %request.method(), %url, retried = request.is_retried(), authed = token.is_some(), "Sending request");

        let mut builder = self.client.request(to_reqwest_method(request.method()), &url);

        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }

        for (name, value) in request.headers() {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid_header(name, e))?;
            if name == AUTHORIZATION {
                continue;
            }
            let value = HeaderValue::from_str(value).map_err(|e| invalid_header(name.as_str(), e))?;
            builder = builder.header(name, value);
        }

        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, bearer(token)?);
        }

        builder = match request.body() {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Multipart(form)) => builder.multipart(to_reqwest_form(form)?),
            None => builder,
        };

        let response = builder.send().await.map_err(network_error)?;
        trace!(status = %response.status(), "Response received");
        Ok(response)
    }

    /// Read a successful response into an [`ApiResponse`].
    pub(crate) async fn read(response: reqwest::Response) -> Result<ApiResponse> {
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(network_error)?;
        Ok(ApiResponse::new(status, body.to_vec()))
    }

    /// Turn a non-2xx response into a [`RequestError`], keeping the JSON
    /// payload when there is one.
    pub(crate) async fn request_error(response: reqwest::Response) -> RequestError {
        let status = response.status().as_u16();
        let payload = match response.bytes().await {
            Ok(body) if !body.is_empty() => serde_json::from_slice(&body).ok(),
            _ => None,
        };
        RequestError::new(status, payload)
    }

    /// Send `request` outside the refresh pipeline and decode a JSON reply.
    /// Used by the credential endpoints themselves.
    pub(crate) async fn call_json<R: DeserializeOwned>(
        &self,
        request: &OutboundRequest,
        token: Option<&AccessToken>,
    ) -> Result<R> {
        let response = self.send(request, token).await?;
        if !response.status().is_success() {
            return Err(Self::request_error(response).await.into());
        }
        Self::read(response).await?.json()
    }
}

/// Map a reqwest failure (no usable response) to a network error.
pub(crate) fn network_error(err: reqwest::Error) -> Error {
    let message = err.to_string();
    let err = if err.is_timeout() {
        NetworkError::Timeout { message }
    } else if err.is_connect() {
        NetworkError::Connection { message }
    } else {
        NetworkError::Http { message }
    };
    Error::Network(err)
}

fn bearer(token: &AccessToken) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.as_str())).map_err(|_| {
        InvalidInputError::Credentials {
            reason: "access token contains invalid header characters".to_string(),
        }
    })?;
    value.set_sensitive(true);
    Ok(value)
}

fn invalid_header(name: &str, err: impl std::fmt::Display) -> Error {
    InvalidInputError::Other {
        message: format!("invalid header '{}': {}", name, err),
    }
    .into()
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn to_reqwest_form(form: &MultipartForm) -> Result<Form> {
    let mut out = Form::new();
    for part in form.parts() {
        out = match part {
            FormPart::Text { name, value } => out.text(name.clone(), value.clone()),
            FormPart::File {
                name,
                file_name,
                mime,
                bytes,
            } => {
                let part = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime)
                    .map_err(|e| InvalidInputError::Other {
                        message: format!("invalid MIME type '{}': {}", mime, e),
                    })?;
                out.part(name.clone(), part)
            }
        };
    }
    Ok(out)
}
