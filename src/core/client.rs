use reqwest::{multipart, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::core::session::Session;
use crate::utils::error::{FolioError, Result};

/// Shared HTTP client for every backend call. Attaches the session's bearer
/// token when one is present. No retries and no application-level timeout
/// unless one is configured.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Session) -> Result<Self> {
        Self::with_timeout(base_url, session, None)
    }

    pub fn with_timeout(base_url: &str, session: Session, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!("{} {}", method, self.url(path));
        let builder = self.http.request(method, self.url(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Read a resource. An empty or `null` body is "no data" and yields
    /// `T::default()`.
    pub async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let response = self.request(Method::GET, path).send().await?;
        Ok(decode(response).await?.unwrap_or_default())
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(Method::POST, path).json(body).send().await?;
        decode_mutation(response).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(Method::PUT, path).json(body).send().await?;
        decode_mutation(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self.request(Method::DELETE, path).send().await?;
        check_status(response).await.map(|_| ())
    }

    pub async fn post_multipart<T>(&self, path: &str, form: multipart::Form) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let response = self.request(Method::POST, path).multipart(form).send().await?;
        decode_mutation(response).await
    }
}

async fn check_status(response: Response) -> Result<Vec<u8>> {
    let status = response.status();
    tracing::debug!("API response status: {}", status);
    let body = response.bytes().await?.to_vec();

    if status.is_success() {
        return Ok(body);
    }

    let message = serde_json::from_slice::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string));
    Err(FolioError::Server { status, message })
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let value: serde_json::Value = serde_json::from_slice(body)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(value)?))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<Option<T>> {
    let body = check_status(response).await?;
    parse_body(&body)
}

/// A 2xx on a write means the write landed. A body that cannot be read as
/// `T` (plain text, an unexpected shape) is treated as no body.
async fn decode_mutation<T: DeserializeOwned>(response: Response) -> Result<Option<T>> {
    let body = check_status(response).await?;
    match parse_body(&body) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::warn!("Ignoring unreadable response body: {}", e);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slashes() {
        let client = ApiClient::new("http://localhost:5000/api/", Session::in_memory()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(client.url("/skills"), "http://localhost:5000/api/skills");
        assert_eq!(client.url("skills/42"), "http://localhost:5000/api/skills/42");
    }

    #[test]
    fn body_parsing_treats_blank_and_null_as_none() {
        assert_eq!(parse_body::<Vec<u8>>(b"  ").unwrap(), None);
        assert_eq!(parse_body::<Vec<u8>>(b"null").unwrap(), None);
        assert_eq!(parse_body::<Vec<u8>>(b"[1,2]").unwrap(), Some(vec![1, 2]));
        assert!(parse_body::<Vec<u8>>(b"Created").is_err());
    }
}
