pub mod finazon;

pub use finazon::FinazonClient;
