use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

use super::traits::PriceHistorySource;
use crate::models::asset::AssetType;
use crate::models::series::{PricePoint, PriceSeries};

const BASE_URL: &str = "https://www.alphavantage.co";

/// Alpha Vantage vendor client for daily stock and crypto history.
///
/// - **Free tier**: 25 requests/day (across ALL endpoints) — callers
///   cache aggressively and fetch at most once per symbol per day.
/// - **Requires**: API key.
/// - **Stock**: `TIME_SERIES_DAILY`, close field `"4. close"`.
/// - **Crypto**: `DIGITAL_CURRENCY_DAILY` quoted against USD, close
///   field `"4a. close (USD)"`.
///
/// Rate-limit and error payloads replace the time-series container with
/// a note object; those, like transport failures, come back as empty
/// series per the [`PriceHistorySource`] contract.
pub struct AlphaVantageProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: BASE_URL.to_string(),
            api_key,
        }
    }

    /// Point the client at a different base URL (mock servers in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// ── Alpha Vantage API response types ────────────────────────────────

#[derive(Deserialize)]
struct StockSeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<HashMap<String, StockDay>>,
}

#[derive(Deserialize)]
struct StockDay {
    #[serde(rename = "4. close")]
    close: String,
}

#[derive(Deserialize)]
struct CryptoSeriesResponse {
    #[serde(rename = "Time Series (Digital Currency Daily)")]
    time_series: Option<HashMap<String, CryptoDay>>,
}

#[derive(Deserialize)]
struct CryptoDay {
    #[serde(rename = "4a. close (USD)")]
    close: String,
}

#[async_trait]
impl PriceHistorySource for AlphaVantageProvider {
    fn name(&self) -> &str {
        "Alpha Vantage"
    }

    async fn fetch_history(&self, symbol: &str, asset_type: AssetType) -> PriceSeries {
        let today = chrono::Utc::now().date_naive();

        match self.fetch_close_map(symbol, asset_type).await {
            Ok(Some(close_by_date)) => to_series(&close_by_date, today),
            Ok(None) => {
                warn!(
                    symbol,
                    asset_type = %asset_type,
                    "vendor returned no time series (rate limit, invalid symbol, or bad key)"
                );
                PriceSeries::empty(today)
            }
            Err(e) => {
                warn!(
                    symbol,
                    asset_type = %asset_type,
                    error = %sanitize(&e),
                    "price history request failed"
                );
                PriceSeries::empty(today)
            }
        }
    }
}

impl AlphaVantageProvider {
    /// Fetch the vendor's date-keyed close-price map for a symbol, or
    /// `None` when the response carries no time-series container.
    async fn fetch_close_map(
        &self,
        symbol: &str,
        asset_type: AssetType,
    ) -> Result<Option<HashMap<String, String>>, reqwest::Error> {
        let url = format!("{}/query", self.base_url);
        let symbol = symbol.to_uppercase();

        match asset_type {
            AssetType::Stock => {
                let resp: StockSeriesResponse = self
                    .client
                    .get(&url)
                    .query(&[
                        ("function", "TIME_SERIES_DAILY"),
                        ("symbol", symbol.as_str()),
                        ("outputsize", "full"),
                        ("apikey", self.api_key.as_str()),
                    ])
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?;
                Ok(resp
                    .time_series
                    .map(|ts| ts.into_iter().map(|(d, v)| (d, v.close)).collect()))
            }
            AssetType::Crypto => {
                let resp: CryptoSeriesResponse = self
                    .client
                    .get(&url)
                    .query(&[
                        ("function", "DIGITAL_CURRENCY_DAILY"),
                        ("symbol", symbol.as_str()),
                        ("market", "USD"),
                        ("outputsize", "full"),
                        ("apikey", self.api_key.as_str()),
                    ])
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?;
                Ok(resp
                    .time_series
                    .map(|ts| ts.into_iter().map(|(d, v)| (d, v.close)).collect()))
            }
        }
    }
}

/// Convert the vendor's date-keyed map into an ascending series,
/// skipping entries with unparsable dates or prices. The vendor returns
/// newest-first; ordering here never depends on it.
fn to_series(close_by_date: &HashMap<String, String>, fetched_on: NaiveDate) -> PriceSeries {
    let mut data_points: Vec<PricePoint> = close_by_date
        .iter()
        .filter_map(|(date_str, close)| {
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()?;
            let value: f64 = close.parse().ok()?;
            Some(PricePoint { date, value })
        })
        .collect();

    data_points.sort_by_key(|p| p.date);

    PriceSeries {
        data_points,
        last_updated: fetched_on,
    }
}

/// Strip query parameters from request errors to prevent API key
/// leakage. reqwest errors often contain full URLs with secrets.
fn sanitize(e: &reqwest::Error) -> String {
    let msg = e.to_string();
    match msg.find('?') {
        Some(idx) => format!("{}?<query redacted>", &msg[..idx]),
        None => msg,
    }
}
