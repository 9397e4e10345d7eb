//! Yahoo Finance data provider.
//!
//! Fetches daily OHLCV bars from Yahoo's v8 chart API and current
//! fundamentals from the v10 quoteSummary API. Handles response parsing and
//! maps HTTP failures onto the typed error taxonomy; each call is a single
//! attempt and recovery is left to the caller's skip policy.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes; parse failures surface as `DataError::ResponseFormatChanged`.

use super::provider::{DataError, DataProvider, FetchResult, FundamentalsProvider};
use crate::domain::{DailyBar, FundamentalSnapshot};
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

/// Error object shared by the chart and quoteSummary endpoints.
#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance v10 quoteSummary API response.
#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryResult,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResult {
    result: Option<Vec<QuoteSummaryModules>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryModules {
    #[serde(rename = "summaryDetail", default)]
    summary_detail: Option<SummaryDetail>,
    #[serde(rename = "defaultKeyStatistics", default)]
    key_statistics: Option<KeyStatistics>,
    #[serde(rename = "financialData", default)]
    financial_data: Option<FinancialData>,
}

#[derive(Debug, Deserialize)]
struct SummaryDetail {
    #[serde(rename = "trailingPE", default)]
    trailing_pe: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct KeyStatistics {
    #[serde(rename = "priceToBook", default)]
    price_to_book: Option<RawValue>,
    #[serde(rename = "earningsQuarterlyGrowth", default)]
    earnings_quarterly_growth: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct FinancialData {
    #[serde(rename = "currentPrice", default)]
    current_price: Option<RawValue>,
    #[serde(rename = "revenueGrowth", default)]
    revenue_growth: Option<RawValue>,
}

/// Yahoo wraps numeric values in an object carrying the raw number plus
/// display metadata; only the raw value is used.
#[derive(Debug, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

impl RawValue {
    fn value(&self) -> Option<f64> {
        self.raw.filter(|v| v.is_finite())
    }
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
}

impl YahooProvider {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self { client }
    }

    /// Build the chart API URL for a symbol and date range.
    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
        let end_ts = end.and_hms_opt(23, 59, 59).unwrap().and_utc().timestamp();
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d\
             &includeAdjustedClose=true"
        )
    }

    /// Build the quoteSummary API URL for a symbol.
    fn quote_summary_url(symbol: &str) -> String {
        format!(
            "https://query2.finance.yahoo.com/v10/finance/quoteSummary/{symbol}\
             ?modules=summaryDetail,defaultKeyStatistics,financialData"
        )
    }

    /// Parse the chart API response into bars.
    ///
    /// A known symbol with no trading days in the window comes back without a
    /// timestamp array; that is an empty (non-error) result.
    fn parse_chart(symbol: &str, resp: ChartResponse) -> Result<Vec<DailyBar>, DataError> {
        let result = resp
            .chart
            .result
            .ok_or_else(|| api_error_for(symbol, resp.chart.error))?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        let timestamps = match data.timestamp {
            Some(ts) => ts,
            None => return Ok(Vec::new()),
        };

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let n = timestamps.len();
        let mut bars = Vec::with_capacity(n);

        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();
            let adj_close = adj_closes.as_ref().and_then(|v| v.get(i).copied().flatten());

            // Skip rows where all OHLCV are null (holidays/non-trading days)
            if open.is_none()
                && high.is_none()
                && low.is_none()
                && close.is_none()
                && volume.is_none()
            {
                continue;
            }

            bars.push(DailyBar {
                date,
                open: open.unwrap_or(f64::NAN),
                high: high.unwrap_or(f64::NAN),
                low: low.unwrap_or(f64::NAN),
                close: close.unwrap_or(f64::NAN),
                volume: volume.unwrap_or(0),
                adj_close: adj_close.unwrap_or(f64::NAN),
            });
        }

        Ok(bars)
    }

    /// Parse the quoteSummary response into a fundamental snapshot.
    ///
    /// Missing modules or fields produce `None` entries, not errors.
    fn parse_quote_summary(
        symbol: &str,
        resp: QuoteSummaryResponse,
    ) -> Result<FundamentalSnapshot, DataError> {
        let result = resp
            .quote_summary
            .result
            .ok_or_else(|| api_error_for(symbol, resp.quote_summary.error))?;

        let modules = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        let summary = modules.summary_detail;
        let stats = modules.key_statistics;
        let financial = modules.financial_data;

        Ok(FundamentalSnapshot {
            pe_ratio: summary.and_then(|s| s.trailing_pe.and_then(|v| v.value())),
            pb_ratio: stats
                .as_ref()
                .and_then(|s| s.price_to_book.as_ref().and_then(|v| v.value())),
            revenue_growth: financial
                .as_ref()
                .and_then(|f| f.revenue_growth.as_ref().and_then(|v| v.value())),
            price: financial
                .as_ref()
                .and_then(|f| f.current_price.as_ref().and_then(|v| v.value())),
            earnings_growth: stats
                .as_ref()
                .and_then(|s| s.earnings_quarterly_growth.as_ref().and_then(|v| v.value())),
        })
    }

    /// Execute one GET and map HTTP-level failures to typed errors.
    fn get(&self, symbol: &str, url: &str) -> Result<reqwest::blocking::Response, DataError> {
        let resp = self.client.get(url).send().map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                DataError::NetworkUnreachable(e.to_string())
            } else {
                DataError::Other(e.to_string())
            }
        })?;

        let status = resp.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(DataError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(DataError::AuthenticationRequired(format!(
                "Yahoo Finance refused the request (HTTP {status})"
            )));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        if !status.is_success() {
            return Err(DataError::Other(format!("HTTP {status} for {symbol}")));
        }

        Ok(resp)
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let url = Self::chart_url(symbol, start, end);
        let resp = self.get(symbol, &url)?;

        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        let bars = Self::parse_chart(symbol, chart)?;
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
        })
    }
}

impl FundamentalsProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch_fundamentals(&self, symbol: &str) -> Result<FundamentalSnapshot, DataError> {
        let url = Self::quote_summary_url(symbol);
        let resp = self.get(symbol, &url)?;

        let summary: QuoteSummaryResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        Self::parse_quote_summary(symbol, summary)
    }
}

/// Map an endpoint-level error object to a typed error.
fn api_error_for(symbol: &str, error: Option<ApiError>) -> DataError {
    match error {
        Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        },
        Some(err) => DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description)),
        None => DataError::ResponseFormatChanged("empty result with no error".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_chart_extracts_bars_and_drops_holiday_rows() {
        let body = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704153600, 1704240000, 1704326400],
                    "indicators": {
                        "quote": [{
                            "open":   [100.0, null, 102.0],
                            "high":   [105.0, null, 106.0],
                            "low":    [99.0,  null, 101.0],
                            "close":  [103.0, null, 104.0],
                            "volume": [50000, null, 60000]
                        }],
                        "adjclose": [{"adjclose": [103.0, null, 104.0]}]
                    }
                }],
                "error": null
            }
        }"#;
        let resp: ChartResponse = serde_json::from_str(body).unwrap();
        let bars = YahooProvider::parse_chart("INFY.NS", resp).unwrap();

        // Middle row is all-null → dropped
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 103.0);
        assert_eq!(bars[1].volume, 60000);
        assert!(bars.iter().all(|b| b.is_sane()));
    }

    #[test]
    fn parse_chart_missing_timestamps_is_empty_result() {
        let body = r#"{
            "chart": {
                "result": [{"indicators": {"quote": [{"open": [], "high": [], "low": [], "close": [], "volume": []}]}}],
                "error": null
            }
        }"#;
        let resp: ChartResponse = serde_json::from_str(body).unwrap();
        let bars = YahooProvider::parse_chart("INFY.NS", resp).unwrap();
        assert!(bars.is_empty());
    }

    #[test]
    fn parse_chart_not_found_maps_to_symbol_not_found() {
        let body = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        }"#;
        let resp: ChartResponse = serde_json::from_str(body).unwrap();
        let err = YahooProvider::parse_chart("BOGUS.NS", resp).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { symbol } if symbol == "BOGUS.NS"));
    }

    #[test]
    fn parse_quote_summary_reads_raw_values() {
        let body = r#"{
            "quoteSummary": {
                "result": [{
                    "summaryDetail": {"trailingPE": {"raw": 24.5, "fmt": "24.50"}},
                    "defaultKeyStatistics": {
                        "priceToBook": {"raw": 6.1},
                        "earningsQuarterlyGrowth": {}
                    },
                    "financialData": {
                        "currentPrice": {"raw": 1520.0},
                        "revenueGrowth": {"raw": 0.12}
                    }
                }],
                "error": null
            }
        }"#;
        let resp: QuoteSummaryResponse = serde_json::from_str(body).unwrap();
        let snap = YahooProvider::parse_quote_summary("INFY.NS", resp).unwrap();

        assert_eq!(snap.pe_ratio, Some(24.5));
        assert_eq!(snap.pb_ratio, Some(6.1));
        assert_eq!(snap.revenue_growth, Some(0.12));
        assert_eq!(snap.price, Some(1520.0));
        // Empty wrapper object → missing field, not an error
        assert!(snap.earnings_growth.is_none());
    }

    #[test]
    fn parse_quote_summary_tolerates_missing_modules() {
        let body = r#"{"quoteSummary": {"result": [{}], "error": null}}"#;
        let resp: QuoteSummaryResponse = serde_json::from_str(body).unwrap();
        let snap = YahooProvider::parse_quote_summary("INFY.NS", resp).unwrap();
        assert!(snap.pe_ratio.is_none());
        assert!(snap.price.is_none());
    }
}
