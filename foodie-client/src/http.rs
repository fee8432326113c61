// foodie-client/src/http.rs
// HTTP 客户端 - 网络通信

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;

use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP 客户端 trait
///
/// One raw call: method + path + extra query pairs + optional JSON body,
/// answering with the parsed JSON document.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn call(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> ClientResult<Value>;

    async fn get(&self, path: &str) -> ClientResult<Value> {
        self.call(Method::GET, path, &[], None).await
    }

    async fn post(&self, path: &str, body: Value) -> ClientResult<Value> {
        self.call(Method::POST, path, &[], Some(body)).await
    }

    async fn put(&self, path: &str, query: &[(&str, String)], body: Value) -> ClientResult<Value> {
        self.call(Method::PUT, path, query, Some(body)).await
    }

    async fn delete(&self, path: &str, query: &[(&str, String)]) -> ClientResult<Value> {
        self.call(Method::DELETE, path, query, None).await
    }
}

/// 网络 HTTP 客户端
///
/// Every request carries the configured `customerId` query parameter.
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    customer_id: String,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            customer_id: config.customer_id.clone(),
        })
    }

    /// 获取基础 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn handle_response(response: reqwest::Response) -> ClientResult<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn call(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> ClientResult<Value> {
        let url = self.url(path);
        tracing::trace!(%method, %url, "remote call");

        let mut req = self
            .client
            .request(method.clone(), &url)
            .query(query)
            .query(&[("customerId", self.customer_id.as_str())]);
        if let Some(body) = body {
            req = req.json(&body);
        }

        let result = match req.send().await {
            Ok(response) => Self::handle_response(response).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = &result {
            tracing::debug!(%method, %url, error = %e, "remote call failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let config = ClientConfig::new("http://localhost:8080/api/");
        let client = NetworkHttpClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert_eq!(client.url("/cart"), "http://localhost:8080/api/cart");
        assert_eq!(client.url("menu"), "http://localhost:8080/api/menu");
    }
}
