use ndarray::Array2;

use common::Direction;

/// Closes per training window and per inference input.
pub const WINDOW: usize = 5;

/// Windowed closes with one-hot next-bar labels.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// `(samples, WINDOW)`
    pub inputs: Array2<f64>,
    /// `(samples, 3)` one-hot in `Direction::CLASSES` order.
    pub targets: Array2<f64>,
}

impl Dataset {
    /// One sample per window `closes[i..i + WINDOW]`, labelled by the move
    /// from its last close to the close right after it. `len - WINDOW`
    /// samples, none when `len <= WINDOW`.
    pub fn from_closes(closes: &[f64]) -> Self {
        let samples = labeled_windows(closes);
        let n = samples.len();

        let inputs = Array2::from_shape_fn((n, WINDOW), |(i, j)| samples[i].0[j]);
        let targets = Array2::from_shape_fn((n, 3), |(i, j)| samples[i].1.one_hot()[j]);

        Self { inputs, targets }
    }

    pub fn len(&self) -> usize {
        self.inputs.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Every full window paired with the direction of the following bar.
pub fn labeled_windows(closes: &[f64]) -> Vec<([f64; WINDOW], Direction)> {
    closes
        .windows(WINDOW + 1)
        .map(|w| {
            let mut window = [0.0; WINDOW];
            window.copy_from_slice(&w[..WINDOW]);
            (window, Direction::between(w[WINDOW - 1], w[WINDOW]))
        })
        .collect()
}

/// The last `WINDOW` closes as a single-row input, unlabelled.
pub fn latest_window(closes: &[f64]) -> Option<Array2<f64>> {
    let start = closes.len().checked_sub(WINDOW)?;
    Array2::from_shape_vec((1, WINDOW), closes[start..].to_vec()).ok()
}
