use crate::adapters::csv_table::parse_csv;
use crate::domain::model::RawTable;
use crate::domain::ports::RowSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// A sheet downloaded to disk, re-read on every refresh.
#[derive(Debug, Clone)]
pub struct FileCsvSource {
    path: PathBuf,
}

impl FileCsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RowSource for FileCsvSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<RawTable> {
        let data = tokio::fs::read(&self.path).await?;
        parse_csv(&data)
    }
}
