use crate::adapters::csv_table::parse_csv;
use crate::domain::model::RawTable;
use crate::domain::ports::{ConfigProvider, RowSource};
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// A spreadsheet published to the web as CSV.
pub struct HttpCsvSource {
    client: Client,
    url: String,
}

impl HttpCsvSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.source(), config.request_timeout())
    }
}

#[async_trait]
impl RowSource for HttpCsvSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<RawTable> {
        tracing::debug!("Making request to: {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        tracing::debug!("Sheet response status: {}", status);
        if !status.is_success() {
            return Err(AppError::FetchError {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        parse_csv(&body)
    }
}
