//! Client configuration

/// Client configuration for connecting to the remote order service
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service base URL (e.g., "http://localhost:8080/api")
    pub base_url: String,

    /// Customer/session identifier appended to every request as `customerId`
    pub customer_id: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            customer_id: "cli-customer-1".to_string(),
            timeout: 30,
        }
    }

    /// Set the customer identifier
    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = customer_id.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> crate::ClientResult<crate::NetworkHttpClient> {
        crate::NetworkHttpClient::new(self)
    }

    /// Create the typed gateway from this configuration
    pub fn build_gateway(&self) -> crate::ClientResult<crate::FoodieApi<crate::NetworkHttpClient>> {
        Ok(crate::FoodieApi::new(self.build_http_client()?))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080/api")
    }
}
