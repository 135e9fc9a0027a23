use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use super::{records_from_grid, Record, TabularStore};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Opaque bearer credential for the store. Supplied as a JSON blob, either
/// from a local file or injected through the environment; nothing here
/// inspects it beyond pulling the token out.
#[derive(Clone, Deserialize)]
pub(crate) struct Credential {
    pub(crate) bearer_token: String,
}

impl Credential {
    pub(crate) fn from_json(blob: &str) -> Result<Self> {
        serde_json::from_str(blob).context("Credential blob is not valid JSON")
    }

    pub(crate) fn from_file(path: &Path) -> Result<Self> {
        let blob = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read credential file: {}", path.display()))?;
        Self::from_json(&blob)
    }
}

/// Handle to one remote spreadsheet. Built once per process and passed to
/// whoever needs a worksheet; `connect` probes the spreadsheet so a bad
/// credential or id fails the session up front instead of on first use.
#[derive(Clone)]
pub(crate) struct SheetsClient {
    http: reqwest::blocking::Client,
    token: String,
    spreadsheet_id: String,
}

impl SheetsClient {
    pub(crate) fn connect(credential: &Credential, spreadsheet_id: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;
        let client = Self {
            http,
            token: credential.bearer_token.clone(),
            spreadsheet_id: spreadsheet_id.to_string(),
        };
        client.probe().context(
            "Failed to reach the spreadsheet. Check the spreadsheet id and that it is shared with the credential's account",
        )?;
        Ok(client)
    }

    fn probe(&self) -> Result<()> {
        let url = format!("{SHEETS_API_BASE}/{}?fields=spreadsheetId", self.spreadsheet_id);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .context("Connection to the spreadsheet service failed")?;
        checked(resp)?;
        Ok(())
    }

    pub(crate) fn worksheet(&self, title: &str) -> Worksheet {
        Worksheet {
            client: self.clone(),
            title: title.to_string(),
        }
    }

    fn values_url(&self, title: &str, suffix: &str) -> String {
        format!("{SHEETS_API_BASE}/{}/values/{}{}", self.spreadsheet_id, title, suffix)
    }
}

/// One named worksheet, addressed through the spreadsheet values endpoints.
/// Every call is a single blocking round trip; nothing is retried.
pub(crate) struct Worksheet {
    client: SheetsClient,
    title: String,
}

impl Worksheet {
    fn append(&self, rows: &[Vec<String>]) -> Result<()> {
        let url = self.client.values_url(
            &self.title,
            ":append?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS",
        );
        let body = serde_json::json!({ "values": rows });
        let resp = self
            .client
            .http
            .post(&url)
            .bearer_auth(&self.client.token)
            .json(&body)
            .send()
            .with_context(|| format!("Failed to append to worksheet '{}'", self.title))?;
        checked(resp)?;
        Ok(())
    }
}

impl TabularStore for Worksheet {
    fn append_row(&mut self, row: &[String]) -> Result<()> {
        let rows = vec![row.to_vec()];
        self.append(&rows)
    }

    fn read_all_rows(&mut self) -> Result<Vec<Record>> {
        let url = self.client.values_url(&self.title, "");
        let resp = self
            .client
            .http
            .get(&url)
            .bearer_auth(&self.client.token)
            .send()
            .with_context(|| format!("Failed to read worksheet '{}'", self.title))?;
        let resp = checked(resp)?;
        let payload: serde_json::Value = resp
            .json()
            .with_context(|| format!("Worksheet '{}' returned malformed JSON", self.title))?;
        Ok(records_from_grid(&grid_from_payload(&payload)))
    }

    fn clear(&mut self) -> Result<()> {
        let url = self.client.values_url(&self.title, ":clear");
        let resp = self
            .client
            .http
            .post(&url)
            .bearer_auth(&self.client.token)
            .json(&serde_json::json!({}))
            .send()
            .with_context(|| format!("Failed to clear worksheet '{}'", self.title))?;
        checked(resp)?;
        Ok(())
    }

    fn append_rows(&mut self, rows: &[Vec<String>]) -> Result<()> {
        self.append(rows)
    }
}

/// A `values` range response; the key is absent entirely for an empty sheet.
fn grid_from_payload(payload: &serde_json::Value) -> Vec<Vec<String>> {
    let Some(rows) = payload.get("values").and_then(|v| v.as_array()) else {
        return Vec::new();
    };
    rows.iter()
        .map(|row| {
            row.as_array()
                .map(|cells| cells.iter().map(cell_text).collect())
                .unwrap_or_default()
        })
        .collect()
}

fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn checked(resp: reqwest::blocking::Response) -> Result<reqwest::blocking::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().unwrap_or_default();
    anyhow::bail!("Spreadsheet service returned {status}: {body}")
}
