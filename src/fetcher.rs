// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::time::Duration;

use tracing::{debug, error, info};

use crate::error::FetchError;
use crate::models::{DateRange, ReportPayload, ReportResponse};
use crate::utils::http_client;

/// Anything that can produce a report for a date range.
pub trait ReportSource {
    fn fetch(&self, range: &DateRange) -> Result<ReportPayload, FetchError>;
}

pub struct HttpReportFetcher {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpReportFetcher {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            client: http_client(timeout)?,
        })
    }

    pub fn report_url(&self) -> String {
        format!("{}/api/report", self.base_url)
    }
}

impl ReportSource for HttpReportFetcher {
    fn fetch(&self, range: &DateRange) -> Result<ReportPayload, FetchError> {
        let url = self.report_url();
        debug!(%url, %range, "requesting report");
        let body = self
            .client
            .get(&url)
            .query(&[
                ("dateFrom", range.from.to_string()),
                ("dateTo", range.to.to_string()),
            ])
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(|e| {
                error!(%url, error = %e, "report request failed");
                FetchError::from(e)
            })?;
        let payload = decode_payload(&body).inspect_err(|e| {
            error!(%url, error = %e, "report response rejected");
        })?;
        info!(
            skus = payload.skus.len(),
            rejected = payload.rejected.len(),
            logs = payload.logs.len(),
            "report fetched"
        );
        Ok(payload)
    }
}

/// Resolve a response body into a payload, accepting either the bare array or the
/// `{ data, logs }` wrapper.
pub fn decode_payload(body: &str) -> Result<ReportPayload, FetchError> {
    let resp: ReportResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    Ok(resp.into_payload())
}
