//! Official dollar quote from dolarapi.

use async_trait::async_trait;
use reqwest::Client;

use super::{DataSource, FetchError};
use crate::domain::RateQuote;

/// `GET https://dolarapi.com/v1/dolares/oficial` (URL overridable).
pub struct DolarSource {
    client: Client,
    url: String,
}

impl DolarSource {
    pub fn new(url: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl DataSource for DolarSource {
    type Output = RateQuote;

    fn name(&self) -> &'static str {
        "dolar"
    }

    fn failure_message(&self) -> &'static str {
        "No se pudo cargar la cotización del dólar"
    }

    async fn fetch(&self) -> Result<RateQuote, FetchError> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        Ok(response.json().await?)
    }
}
