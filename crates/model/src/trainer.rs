use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use common::{Direction, Error, Result, TrainingConfig};

use crate::dataset::{latest_window, Dataset, WINDOW};
use crate::network::{argmax_first, Network};
use crate::optimizer::Adam;

/// Outcome of one train-then-predict run.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub direction: Direction,
    /// Softmax output in `Direction::CLASSES` order.
    pub probabilities: [f64; 3],
    /// Statistics of the final epoch.
    pub last_epoch: EpochStats,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochStats {
    pub epoch: usize,
    pub loss: f64,
    pub accuracy: f64,
}

/// Build a fresh classifier, fit it on windows of `closes`, and classify the
/// last window. Nothing outlives the call.
///
/// Needs at least `WINDOW + 1` closes for a single training sample.
pub fn train_and_predict(closes: &[f64], cfg: &TrainingConfig) -> Result<Forecast> {
    let dataset = Dataset::from_closes(closes);
    if dataset.is_empty() {
        return Err(Error::InsufficientData {
            required: WINDOW + 1,
            available: closes.len(),
        });
    }
    let input = latest_window(closes).ok_or(Error::InsufficientData {
        required: WINDOW,
        available: closes.len(),
    })?;

    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut network = Network::classifier(&mut rng);
    let history = fit(&mut network, &dataset, cfg, &mut rng)?;
    let last_epoch = *history
        .last()
        .ok_or_else(|| Error::Other("training ran zero epochs".into()))?;
    info!(
        samples = dataset.len(),
        parameters = network.num_parameters(),
        epochs = history.len(),
        loss = last_epoch.loss,
        accuracy = last_epoch.accuracy,
        "Model training complete"
    );

    let output = network.predict(&input);
    let probabilities = [output[[0, 0]], output[[0, 1]], output[[0, 2]]];
    let direction = Direction::from_class_index(argmax_first(&probabilities))
        .ok_or_else(|| Error::Other("classifier produced an unknown class".into()))?;

    Ok(Forecast {
        direction,
        probabilities,
        last_epoch,
    })
}

/// Minibatch training with a per-epoch shuffle. Returns one entry per epoch.
pub fn fit(
    network: &mut Network,
    dataset: &Dataset,
    cfg: &TrainingConfig,
    rng: &mut impl Rng,
) -> Result<Vec<EpochStats>> {
    if cfg.batch_size == 0 {
        return Err(Error::Config("batch size must be greater than zero".into()));
    }

    let mut optimizer = Adam::new(cfg.learning_rate);
    let mut order: Vec<usize> = (0..dataset.len()).collect();
    let mut history = Vec::with_capacity(cfg.epochs);

    for epoch in 1..=cfg.epochs {
        order.shuffle(rng);
        let mut loss_sum = 0.0;
        let mut correct = 0;

        for batch in order.chunks(cfg.batch_size) {
            let x: Array2<f64> = dataset.inputs.select(Axis(0), batch);
            let y: Array2<f64> = dataset.targets.select(Axis(0), batch);
            let stats = network.train_batch(&x, &y, &mut optimizer);
            loss_sum += stats.loss * batch.len() as f64;
            correct += stats.correct;
        }

        let n = dataset.len() as f64;
        let stats = EpochStats {
            epoch,
            loss: loss_sum / n,
            accuracy: correct as f64 / n,
        };
        debug!(
            epoch,
            steps = optimizer.iterations(),
            loss = stats.loss,
            accuracy = stats.accuracy,
            "Epoch finished"
        );
        history.push(stats);
    }

    Ok(history)
}
