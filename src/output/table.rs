//! Flat result tables with fixed column sets

use crate::strategy::{PerpPerpOpportunity, SpotPerpOpportunity};
use serde_json::Value;

/// One result cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Free text
    Text(String),
    /// Float, NaN when unavailable
    Number(f64),
    /// Optional integer count
    Count(Option<u32>),
    /// Rate series
    Series(Vec<f64>),
}

impl Cell {
    /// Render for a delimited file. NaN and missing counts are empty; series use `[a, b]`.
    pub fn to_field(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Number(value) if value.is_nan() => String::new(),
            Cell::Number(value) => value.to_string(),
            Cell::Count(Some(count)) => count.to_string(),
            Cell::Count(None) => String::new(),
            Cell::Series(values) => {
                let items: Vec<String> = values.iter().map(|v| format!("{:?}", v)).collect();
                format!("[{}]", items.join(", "))
            }
        }
    }

    /// Render as a JSON value. Non-finite numbers become `null`.
    pub fn to_json(&self) -> Value {
        let number = |v: f64| serde_json::Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null);
        match self {
            Cell::Text(text) => Value::String(text.clone()),
            Cell::Number(value) => number(*value),
            Cell::Count(count) => count.map(Value::from).unwrap_or(Value::Null),
            Cell::Series(values) => Value::Array(values.iter().map(|v| number(*v)).collect()),
        }
    }
}

/// Named columns and rows of cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    /// Column names
    pub columns: Vec<String>,
    /// Rows, each as long as `columns`
    pub rows: Vec<Vec<Cell>>,
}

impl ResultTable {
    /// Column set of the perpetual-perpetual report
    pub fn perp_perp_columns(main_days: u32) -> Vec<String> {
        let mut columns: Vec<String> = [
            "pair",
            "APY_historical_average",
            "short_exchange",
            "long_exchange",
            "mean_daily_amplitude",
            "max_daily_amplitude",
            "amplitude_days",
            "short_cumulative_rate",
            "long_cumulative_rate",
            "short_cumulative_rate_7d",
            "long_cumulative_rate_7d",
            "short_cumulative_rate_3d",
            "long_cumulative_rate_3d",
            "short_historical_rates",
            "long_historical_rates",
            "short_historical_rates_7d",
            "long_historical_rates_7d",
            "short_historical_rates_3d",
            "long_historical_rates_3d",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();

        columns.push(format!("cumulative_rate_diff_{}d", main_days));
        columns.push("cumulative_rate_diff_7d".to_string());
        columns.push("cumulative_rate_diff_3d".to_string());
        columns
    }

    /// Column set of the spot-perpetual reports
    pub fn spot_perp_columns(main_days: u32) -> Vec<String> {
        let mut columns: Vec<String> = [
            "pair",
            "rate",
            "APY_historical_average",
            "perp_exchange",
            "spot_exchange",
            "mean_daily_amplitude",
            "max_daily_amplitude",
            "amplitude_days",
            "historical_rates",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();

        columns.push(format!("cum_sum_{}d", main_days));
        columns
    }

    /// Perpetual-perpetual report
    pub fn from_perp_perp(opportunities: &[PerpPerpOpportunity], main_days: u32) -> Self {
        let rows = opportunities
            .iter()
            .map(|o| {
                vec![
                    Cell::Text(o.pair.clone()),
                    Cell::Number(o.apy_historical_average),
                    Cell::Text(o.short_exchange.clone()),
                    Cell::Text(o.long_exchange.clone()),
                    Cell::Number(o.amplitude.mean_daily_amplitude),
                    Cell::Number(o.amplitude.max_daily_amplitude),
                    Cell::Count(o.amplitude.amplitude_days),
                    Cell::Number(o.short_cumulative_rate.main),
                    Cell::Number(o.long_cumulative_rate.main),
                    Cell::Number(o.short_cumulative_rate.days_7),
                    Cell::Number(o.long_cumulative_rate.days_7),
                    Cell::Number(o.short_cumulative_rate.days_3),
                    Cell::Number(o.long_cumulative_rate.days_3),
                    Cell::Series(o.short_historical_rates.main.clone()),
                    Cell::Series(o.long_historical_rates.main.clone()),
                    Cell::Series(o.short_historical_rates.days_7.clone()),
                    Cell::Series(o.long_historical_rates.days_7.clone()),
                    Cell::Series(o.short_historical_rates.days_3.clone()),
                    Cell::Series(o.long_historical_rates.days_3.clone()),
                    Cell::Number(o.cumulative_rate_diff.main),
                    Cell::Number(o.cumulative_rate_diff.days_7),
                    Cell::Number(o.cumulative_rate_diff.days_3),
                ]
            })
            .collect();

        Self {
            columns: Self::perp_perp_columns(main_days),
            rows,
        }
    }

    /// Spot-perpetual report
    pub fn from_spot_perp(opportunities: &[SpotPerpOpportunity], main_days: u32) -> Self {
        let rows = opportunities
            .iter()
            .map(|o| {
                vec![
                    Cell::Text(o.pair.clone()),
                    Cell::Number(o.rate),
                    Cell::Number(o.apy_historical_average),
                    Cell::Text(o.perp_exchange.clone()),
                    Cell::Text(o.spot_exchange.clone()),
                    Cell::Number(o.mean_daily_amplitude),
                    Cell::Number(o.max_daily_amplitude),
                    Cell::Count(o.amplitude_days),
                    Cell::Series(o.historical_rates.clone()),
                    Cell::Number(o.cum_sum_main),
                ]
            })
            .collect();

        Self {
            columns: Self::spot_perp_columns(main_days),
            rows,
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
