use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily price observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// A daily price history plus the date it was fetched.
///
/// `data_points` is ordered ascending by date, one point per trading day
/// the vendor had data for. It may be empty (vendor failure, rate limit,
/// unknown symbol) but is never null — an empty series is the in-band
/// failure signal consumers inspect.
///
/// `last_updated` is the date of the local fetch, NOT of the newest data
/// point: the vendor can lag real time, so freshness means "did we fetch
/// today", not "is the data current".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSeries {
    pub data_points: Vec<PricePoint>,
    pub last_updated: NaiveDate,
}

impl PriceSeries {
    /// An empty series stamped with the given fetch date.
    pub fn empty(fetched_on: NaiveDate) -> Self {
        Self {
            data_points: Vec::new(),
            last_updated: fetched_on,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data_points.is_empty()
    }

    /// True when this series was already fetched today and must not be
    /// re-fetched.
    pub fn is_fresh(&self, today: NaiveDate) -> bool {
        self.last_updated == today
    }

    /// The most recent data point, if any.
    pub fn latest(&self) -> Option<&PricePoint> {
        self.data_points.last()
    }
}
