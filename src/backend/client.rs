use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use super::wire::{
    check_status, decode_response, normalize_conflicts, ConflictReport, GenerateRequest, GenerateResponse, ResetMode,
    ResetRequest,
};
use crate::error::Result;
use crate::model::{Assignment, FixedAssignment, Holiday, OffDay, Staff};

/// The scheduling backend as seen by the client
#[async_trait]
pub trait ScheduleBackend: Send + Sync {
    async fn fetch_staff(&self) -> Result<Vec<Staff>>;
    async fn fetch_assignments(&self, year: i32, month: u32) -> Result<Vec<Assignment>>;
    async fn fetch_fixed(&self, year: i32, month: u32) -> Result<Vec<FixedAssignment>>;
    async fn fetch_off_days(&self, year: i32, month: u32) -> Result<Vec<OffDay>>;
    async fn fetch_holidays(&self, year: i32, month: u32) -> Result<Vec<Holiday>>;
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse>;
    async fn validate(&self, year: i32, month: u32) -> Result<ConflictReport>;
    async fn export_csv(&self, year: i32, month: u32) -> Result<String>;
    async fn reset(&self, year: i32, month: u32, mode: ResetMode) -> Result<()>;
}

/// reqwest-backed client for the scheduling REST API
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn month_query(builder: RequestBuilder, year: i32, month: u32) -> RequestBuilder {
        builder.query(&[("year", year.to_string()), ("month", month.to_string())])
    }

    async fn send(&self, builder: RequestBuilder) -> Result<(StatusCode, String)> {
        let response = builder.send().await?;
        let status = response.status();
        // A body that cannot be read on an error status still yields a message
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) if status.is_success() => return Err(err.into()),
            Err(_) => String::new(),
        };
        Ok((status, body))
    }

    async fn send_text(&self, builder: RequestBuilder) -> Result<String> {
        let (status, body) = self.send(builder).await?;
        check_status(status, body)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let (status, body) = self.send(builder).await?;
        decode_response(status, body)
    }

    async fn get_month<T: DeserializeOwned>(&self, path: &str, year: i32, month: u32) -> Result<T> {
        log::debug!("GET {} {}-{:02}", path, year, month);
        let builder = Self::month_query(self.client.get(self.url(path)), year, month);
        self.send_json(builder).await
    }
}

#[async_trait]
impl ScheduleBackend for HttpBackend {
    async fn fetch_staff(&self) -> Result<Vec<Staff>> {
        self.send_json(self.client.get(self.url("/staff"))).await
    }

    async fn fetch_assignments(&self, year: i32, month: u32) -> Result<Vec<Assignment>> {
        self.get_month("/assignments", year, month).await
    }

    async fn fetch_fixed(&self, year: i32, month: u32) -> Result<Vec<FixedAssignment>> {
        self.get_month("/fixed", year, month).await
    }

    async fn fetch_off_days(&self, year: i32, month: u32) -> Result<Vec<OffDay>> {
        self.get_month("/off", year, month).await
    }

    async fn fetch_holidays(&self, year: i32, month: u32) -> Result<Vec<Holiday>> {
        self.get_month("/holidays", year, month).await
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        log::info!(
            "generating {}-{:02} (shuffle={}, seed={:?}, save={})",
            request.year,
            request.month,
            request.shuffle,
            request.seed,
            request.save
        );
        let builder = self.client.post(self.url("/schedule/generate")).json(request);
        self.send_json(builder).await
    }

    async fn validate(&self, year: i32, month: u32) -> Result<ConflictReport> {
        let body: Value = self.get_month("/schedule/validate", year, month).await?;
        Ok(normalize_conflicts(&body))
    }

    async fn export_csv(&self, year: i32, month: u32) -> Result<String> {
        let builder = Self::month_query(self.client.get(self.url("/export/month.csv")), year, month);
        self.send_text(builder).await
    }

    async fn reset(&self, year: i32, month: u32, mode: ResetMode) -> Result<()> {
        log::warn!("resetting {}-{:02} ({:?})", year, month, mode);
        let builder = self
            .client
            .post(self.url("/schedule/reset"))
            .json(&ResetRequest { year, month, mode });
        self.send_text(builder).await.map(|_| ())
    }
}
