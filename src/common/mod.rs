mod cns_table;
mod deco;
mod deco_model;
mod depth;
mod gas;
mod global_types;
pub(crate) mod math_utils;
mod ox_tox;
mod record;
mod sim;
mod time;

pub use cns_table::{CNSCoeffRow, CNS_COEFFICIENTS};
pub use deco::{Deco, DecoCalculationError, DecoRuntime, DecoStage, DecoStageType};
pub use deco_model::{ConfigValidationErr, DecoModel, DecoModelConfig, DepthError, DiveState};
pub use depth::{Depth, DepthType, Unit, Units};
pub use gas::{Gas, GasError, PartialPressures};
pub use global_types::{
    AscentRatePerMinute, CeilingType, Cns, GradientFactor, GradientFactors, MbarPressure, NDLType,
    Otu, Pressure,
};
pub use ox_tox::OxTox;
pub use record::RecordData;
pub use sim::Sim;
pub use time::Time;
