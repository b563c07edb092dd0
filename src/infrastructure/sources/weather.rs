//! Weather source: `GET <base>/api/weather?q=<city>`

use async_trait::async_trait;
use reqwest::Client;

use super::{DataSource, FetchError};
use crate::domain::WeatherReading;

/// Weather endpoint for the configured city.
pub struct WeatherSource {
    client: Client,
    endpoint: String,
    city: String,
}

impl WeatherSource {
    pub fn new(base_url: &str, city: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            endpoint: format!("{}/api/weather", base_url.trim_end_matches('/')),
            city: city.to_string(),
        }
    }
}

#[async_trait]
impl DataSource for WeatherSource {
    type Output = WeatherReading;

    fn name(&self) -> &'static str {
        "clima"
    }

    fn failure_message(&self) -> &'static str {
        "No se pudo cargar el clima"
    }

    async fn fetch(&self) -> Result<WeatherReading, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", self.city.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        Ok(response.json().await?)
    }
}
