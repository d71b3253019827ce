mod buhlmann_config;
mod buhlmann_model;
mod compartment;
mod zhl_values;

pub use buhlmann_config::BuhlmannConfig;
pub use buhlmann_model::BuhlmannModel;
pub use compartment::{Compartment, Supersaturation, TissuePressures};
