mod health;
mod predict;

pub use health::health_router;
pub use predict::{model_router, strategy_router, ModelState, StrategyState};
