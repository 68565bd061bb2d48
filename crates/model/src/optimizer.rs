//! Adam (adaptive moment estimation).

use ndarray::{Array1, Array2};

use crate::network::{Dense, Gradient};

/// First and second moment estimates for one layer.
#[derive(Debug, Clone)]
struct Moments {
    m_w: Array2<f64>,
    v_w: Array2<f64>,
    m_b: Array1<f64>,
    v_b: Array1<f64>,
}

impl Moments {
    fn zeros_like(layer: &Dense) -> Self {
        Self {
            m_w: Array2::zeros(layer.weights.dim()),
            v_w: Array2::zeros(layer.weights.dim()),
            m_b: Array1::zeros(layer.biases.len()),
            v_b: Array1::zeros(layer.biases.len()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    t: i32,
    moments: Vec<Moments>,
}

impl Adam {
    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
            t: 0,
            moments: Vec::new(),
        }
    }

    /// Steps taken so far.
    pub fn iterations(&self) -> i32 {
        self.t
    }

    /// Apply one update. `gradients[i]` belongs to the i-th layer yielded.
    /// Moment buffers are allocated on the first call.
    pub fn step<'a>(
        &mut self,
        layers: impl Iterator<Item = &'a mut Dense>,
        gradients: &[Gradient],
    ) {
        self.t += 1;
        let correction1 = 1.0 - self.beta1.powi(self.t);
        let correction2 = 1.0 - self.beta2.powi(self.t);
        let (b1, b2, lr, eps) = (self.beta1, self.beta2, self.learning_rate, self.epsilon);

        for (i, (layer, grad)) in layers.zip(gradients).enumerate() {
            if self.moments.len() <= i {
                self.moments.push(Moments::zeros_like(layer));
            }
            let m = &mut self.moments[i];

            m.m_w = &m.m_w * b1 + &grad.weights * (1.0 - b1);
            m.v_w = &m.v_w * b2 + &grad.weights.mapv(|g| g * g) * (1.0 - b2);
            m.m_b = &m.m_b * b1 + &grad.biases * (1.0 - b1);
            m.v_b = &m.v_b * b2 + &grad.biases.mapv(|g| g * g) * (1.0 - b2);

            ndarray::Zip::from(&mut layer.weights)
                .and(&m.m_w)
                .and(&m.v_w)
                .for_each(|w, &mw, &vw| {
                    *w -= lr * (mw / correction1) / ((vw / correction2).sqrt() + eps);
                });
            ndarray::Zip::from(&mut layer.biases)
                .and(&m.m_b)
                .and(&m.v_b)
                .for_each(|b, &mb, &vb| {
                    *b -= lr * (mb / correction1) / ((vb / correction2).sqrt() + eps);
                });
        }
    }
}
