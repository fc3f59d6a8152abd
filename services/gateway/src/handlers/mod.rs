pub mod dataset;
pub mod health;
