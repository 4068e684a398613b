use chrono::{DateTime, Utc};

use crate::types::{Currency, HistoryPoint};

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub label: String,
}

/// Price series for one asset in one currency, oldest point first.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub asset_id: String,
    pub currency: Currency,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn from_history(asset_id: &str, currency: Currency, mut history: Vec<HistoryPoint>) -> Self {
        history.sort_by_key(|p| p.timestamp);
        let points = history
            .into_iter()
            .map(|p| ChartPoint {
                timestamp: p.timestamp,
                price: p.price,
                label: date_label(p.timestamp),
            })
            .collect();
        Self {
            asset_id: asset_id.to_string(),
            currency,
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `(index, price)` pairs for the line dataset.
    pub fn data(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.price))
            .collect()
    }

    pub fn min_max(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        let min = self.points.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
        let max = self.points.iter().map(|p| p.price).fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }

    /// Y bounds with a little headroom so the line never sits on the frame.
    pub fn y_bounds(&self) -> [f64; 2] {
        match self.min_max() {
            None => [0.0, 1.0],
            Some((min, max)) => {
                let pad = if max > min { (max - min) * 0.05 } else { max.abs().max(1.0) * 0.01 };
                [min - pad, max + pad]
            }
        }
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        [0.0, self.points.len().saturating_sub(1).max(1) as f64]
    }

    pub fn last_price(&self) -> Option<f64> {
        self.points.last().map(|p| p.price)
    }

    /// Change from the first to the last point, in percent.
    pub fn change_pct(&self) -> Option<f64> {
        let first = self.points.first()?.price;
        let last = self.points.last()?.price;
        if first > 0.0 {
            Some((last - first) / first * 100.0)
        } else {
            None
        }
    }

    /// First, middle and last labels for the x axis.
    pub fn axis_labels(&self) -> Vec<String> {
        match self.points.len() {
            0 => Vec::new(),
            1 => vec![self.points[0].label.clone()],
            2 => vec![self.points[0].label.clone(), self.points[1].label.clone()],
            n => vec![
                self.points[0].label.clone(),
                self.points[n / 2].label.clone(),
                self.points[n - 1].label.clone(),
            ],
        }
    }
}

pub fn date_label(ts: DateTime<Utc>) -> String {
    ts.format("%b %-d").to_string()
}
