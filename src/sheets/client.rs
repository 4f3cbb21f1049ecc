//! Google Sheets values API client.
//!
//! Speaks to the `spreadsheets.values` endpoints only: one GET for the
//! header row and one POST to append rows. Authentication is a bearer token
//! resolved by the caller; token refresh and service-account exchange live
//! outside this service.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use crate::config::Destination;
use crate::errors::{AppError, AppResult, SheetError};

use super::RowSink;

pub struct SheetsClient {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl SheetsClient {
    pub fn new(
        base_url: impl Into<String>,
        access_token: Option<String>,
        timeout_secs: u64,
    ) -> AppResult<Self> {
        let base_url = base_url.into();
        if base_url.is_empty() {
            return Err(AppError::configuration(
                "sheets.api_base_url must not be empty",
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url,
            access_token,
        })
    }

    fn values_url(&self, destination: &Destination, range: &str, suffix: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}{}",
            self.base_url,
            destination.spreadsheet_id,
            urlencoding::encode(&format!("{}!{}", destination.worksheet, range)),
            suffix
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, SheetError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        error!("Sheets API returned {}: {}", status, message);
        Err(SheetError::api(status.as_u16(), message))
    }
}

#[async_trait::async_trait]
impl RowSink for SheetsClient {
    async fn header_row(&self, destination: &Destination) -> Result<Vec<String>, SheetError> {
        let url = self.values_url(destination, "1:1", "");
        debug!("Fetching header row from {}", url);

        let response = self.authorize(self.client.get(&url)).send().await?;
        let range: ValueRange = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| SheetError::invalid_response(e.to_string()))?;

        range
            .values
            .into_iter()
            .next()
            .filter(|row| !row.is_empty())
            .ok_or_else(|| SheetError::missing_header(destination.worksheet.clone()))
    }

    async fn append_rows(
        &self,
        destination: &Destination,
        rows: Vec<Vec<String>>,
    ) -> Result<(), SheetError> {
        if rows.is_empty() {
            return Ok(());
        }

        let url = self.values_url(
            destination,
            "A1",
            ":append?valueInputOption=RAW&insertDataOption=INSERT_ROWS",
        );
        debug!("Appending {} rows via {}", rows.len(), url);

        let response = self
            .authorize(self.client.post(&url))
            .json(&json!({ "values": rows }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
