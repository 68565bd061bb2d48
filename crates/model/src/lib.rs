pub mod dataset;
pub mod network;
pub mod optimizer;
pub mod trainer;

pub use dataset::{latest_window, Dataset, WINDOW};
pub use network::Network;
pub use optimizer::Adam;
pub use trainer::{train_and_predict, EpochStats, Forecast};
