#![cfg_attr(feature = "no-std", no_std)]
extern crate alloc;

mod buhlmann;
mod common;

pub use buhlmann::{BuhlmannConfig, BuhlmannModel, Compartment, Supersaturation, TissuePressures};

pub use common::{
    AscentRatePerMinute, CeilingType, Cns, ConfigValidationErr, Deco, DecoCalculationError,
    DecoModel, DecoModelConfig, DecoRuntime, DecoStage, DecoStageType, Depth, DepthError,
    DepthType, DiveState, Gas, GasError, GradientFactor, GradientFactors, MbarPressure, NDLType,
    Otu, OxTox, PartialPressures, Pressure, RecordData, Sim, Time, Unit, Units,
};

// Re-export Vec and vec macro from alloc for convenience
pub use alloc::vec;
pub use alloc::vec::Vec;
