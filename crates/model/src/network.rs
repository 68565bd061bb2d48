//! Small feed-forward classifier.
//!
//! Hidden layers use ReLU, the output layer is softmax trained against
//! categorical cross-entropy. Layers keep no per-batch state: the forward
//! trace needed for backpropagation is returned to the caller.

use ndarray::{Array1, Array2, Axis};
use rand::Rng;

use crate::optimizer::Adam;

/// Probabilities are clamped to `[EPSILON, 1 - EPSILON]` before the log.
const EPSILON: f64 = 1e-7;

/// Fully connected layer: `output = input · weights + biases`.
#[derive(Debug, Clone)]
pub struct Dense {
    /// `(inputs, outputs)`
    pub weights: Array2<f64>,
    pub biases: Array1<f64>,
}

impl Dense {
    /// Glorot-uniform weights, zero biases.
    pub fn glorot(inputs: usize, outputs: usize, rng: &mut impl Rng) -> Self {
        let limit = (6.0 / (inputs + outputs) as f64).sqrt();
        Self {
            weights: Array2::from_shape_fn((inputs, outputs), |_| rng.gen_range(-limit..limit)),
            biases: Array1::zeros(outputs),
        }
    }

    fn affine(&self, input: &Array2<f64>) -> Array2<f64> {
        input.dot(&self.weights) + &self.biases
    }
}

/// Weight and bias gradients for one layer.
#[derive(Debug, Clone)]
pub struct Gradient {
    pub weights: Array2<f64>,
    pub biases: Array1<f64>,
}

/// Loss and hit count for one minibatch, measured before the update.
#[derive(Debug, Clone, Copy)]
pub struct BatchStats {
    pub loss: f64,
    pub correct: usize,
}

#[derive(Debug, Clone)]
pub struct Network {
    hidden: Vec<Dense>,
    output: Dense,
}

/// Inputs and pre-activations of each hidden layer for one forward pass.
struct Trace {
    inputs: Vec<Array2<f64>>,
    pre_activations: Vec<Array2<f64>>,
    last_hidden: Array2<f64>,
    probabilities: Array2<f64>,
}

impl Network {
    /// `inputs → hidden[0] → … → classes`, freshly initialized from `rng`.
    pub fn new(inputs: usize, hidden: &[usize], classes: usize, rng: &mut impl Rng) -> Self {
        let mut width = inputs;
        let mut layers = Vec::with_capacity(hidden.len());
        for &units in hidden {
            layers.push(Dense::glorot(width, units, rng));
            width = units;
        }
        Self {
            hidden: layers,
            output: Dense::glorot(width, classes, rng),
        }
    }

    /// The direction classifier: 5 → 10 → 5 → 3.
    pub fn classifier(rng: &mut impl Rng) -> Self {
        Self::new(crate::WINDOW, &[10, 5], 3, rng)
    }

    /// Class probabilities, one row per input row.
    pub fn predict(&self, input: &Array2<f64>) -> Array2<f64> {
        self.trace(input).probabilities
    }

    pub fn num_parameters(&self) -> usize {
        self.layers().map(|l| l.weights.len() + l.biases.len()).sum()
    }

    /// Hidden layers followed by the output layer.
    pub fn layers(&self) -> impl Iterator<Item = &Dense> {
        self.hidden.iter().chain(std::iter::once(&self.output))
    }

    pub fn layers_mut(&mut self) -> impl Iterator<Item = &mut Dense> {
        self.hidden.iter_mut().chain(std::iter::once(&mut self.output))
    }

    /// One forward/backward pass and optimizer step on a minibatch.
    pub fn train_batch(
        &mut self,
        input: &Array2<f64>,
        targets: &Array2<f64>,
        optimizer: &mut Adam,
    ) -> BatchStats {
        let (stats, gradients) = self.gradients(input, targets);
        optimizer.step(self.layers_mut(), &gradients);
        stats
    }

    /// Mean categorical cross-entropy of the current weights.
    pub fn loss(&self, input: &Array2<f64>, targets: &Array2<f64>) -> f64 {
        cross_entropy(&self.predict(input), targets)
    }

    /// Batch statistics and gradients in `layers()` order.
    pub(crate) fn gradients(
        &self,
        input: &Array2<f64>,
        targets: &Array2<f64>,
    ) -> (BatchStats, Vec<Gradient>) {
        let trace = self.trace(input);
        let stats = BatchStats {
            loss: cross_entropy(&trace.probabilities, targets),
            correct: count_correct(&trace.probabilities, targets),
        };

        // Softmax with cross-entropy collapses to (p - y) / m at the logits.
        let m = input.nrows().max(1) as f64;
        let mut delta = (&trace.probabilities - targets) / m;

        let mut gradients = Vec::with_capacity(self.hidden.len() + 1);
        gradients.push(Gradient {
            weights: trace.last_hidden.t().dot(&delta),
            biases: delta.sum_axis(Axis(0)),
        });

        let mut upstream = &self.output;
        for i in (0..self.hidden.len()).rev() {
            let relu_mask = trace.pre_activations[i].mapv(|z| if z > 0.0 { 1.0 } else { 0.0 });
            delta = delta.dot(&upstream.weights.t()) * relu_mask;
            gradients.push(Gradient {
                weights: trace.inputs[i].t().dot(&delta),
                biases: delta.sum_axis(Axis(0)),
            });
            upstream = &self.hidden[i];
        }

        gradients.reverse();
        (stats, gradients)
    }

    fn trace(&self, input: &Array2<f64>) -> Trace {
        let mut inputs = Vec::with_capacity(self.hidden.len());
        let mut pre_activations = Vec::with_capacity(self.hidden.len());
        let mut activation = input.clone();

        for layer in &self.hidden {
            let z = layer.affine(&activation);
            let next = z.mapv(|v| v.max(0.0));
            inputs.push(std::mem::replace(&mut activation, next));
            pre_activations.push(z);
        }

        let probabilities = softmax(&self.output.affine(&activation));
        Trace {
            inputs,
            pre_activations,
            last_hidden: activation,
            probabilities,
        }
    }
}

/// Row-wise softmax, shifted by the row max for stability.
pub fn softmax(logits: &Array2<f64>) -> Array2<f64> {
    let mut out = logits.clone();
    for mut row in out.rows_mut() {
        let max = row.fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row /= sum;
    }
    out
}

fn cross_entropy(probabilities: &Array2<f64>, targets: &Array2<f64>) -> f64 {
    let m = probabilities.nrows().max(1) as f64;
    let log_p = probabilities.mapv(|p| p.clamp(EPSILON, 1.0 - EPSILON).ln());
    -(targets * &log_p).sum() / m
}

fn count_correct(probabilities: &Array2<f64>, targets: &Array2<f64>) -> usize {
    probabilities
        .rows()
        .into_iter()
        .zip(targets.rows())
        .filter(|(p, t)| {
            argmax_first(p.as_slice().unwrap_or(&[])) == argmax_first(t.as_slice().unwrap_or(&[]))
        })
        .count()
}

/// Index of the largest value; ties go to the earliest index.
pub fn argmax_first(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}
