use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One minute bar from the quote provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Open time, when the provider reports one.
    pub timestamp: Option<DateTime<Utc>>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Flat bar where every price equals `close`. Handy for synthetic series.
    pub fn flat(timestamp: DateTime<Utc>, close: f64) -> Self {
        Self {
            timestamp: Some(timestamp),
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }
}

/// Close prices of a bar sequence, oldest first.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Forecast for the next bar. Also used as the training label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    /// Class order used by the one-hot encoding and the network output layer.
    pub const CLASSES: [Direction; 3] = [Direction::Up, Direction::Down, Direction::Flat];

    /// Label the move from `current` to `next` by strict comparison.
    pub fn between(current: f64, next: f64) -> Self {
        if next > current {
            Direction::Up
        } else if next < current {
            Direction::Down
        } else {
            Direction::Flat
        }
    }

    pub fn class_index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Flat => 2,
        }
    }

    pub fn from_class_index(index: usize) -> Option<Self> {
        Self::CLASSES.get(index).copied()
    }

    pub fn one_hot(self) -> [f64; 3] {
        let mut encoded = [0.0; 3];
        encoded[self.class_index()] = 1.0;
        encoded
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
            Direction::Flat => write!(f, "FLAT"),
        }
    }
}

/// A single technical rule's opinion. A rule with no opinion casts no vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Up,
    Down,
    Flat,
}

impl std::fmt::Display for Vote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Vote::Up => write!(f, "up"),
            Vote::Down => write!(f, "down"),
            Vote::Flat => write!(f, "flat"),
        }
    }
}

/// Which forecaster a process is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Trains a small classifier on every request.
    Model,
    /// Majority vote over technical indicators.
    Strategy,
}

impl Variant {
    /// Bars requested from the provider when `FORECAST_PAGE_SIZE` is unset.
    pub fn default_page_size(self) -> usize {
        match self {
            Variant::Model => 500,
            Variant::Strategy => 1000,
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Model => write!(f, "model"),
            Variant::Strategy => write!(f, "strategy"),
        }
    }
}
