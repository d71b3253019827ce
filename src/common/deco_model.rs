use crate::common::deco::{DecoCalculationError, DecoRuntime};
use crate::common::global_types::{
    AscentRatePerMinute, CeilingType, Cns, MbarPressure, NDLType, Otu,
};
use crate::common::ox_tox::OxTox;
use crate::common::{Depth, DepthType, Gas, Time};
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rejected configuration parameter with the reason it failed validation.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct ConfigValidationErr {
    pub field: &'static str,
    pub reason: &'static str,
}

impl ConfigValidationErr {
    pub fn new(field: &'static str, reason: &'static str) -> Self {
        Self { field, reason }
    }
}

impl fmt::Display for ConfigValidationErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error [{}]: {}", self.field, self.reason)
    }
}

/// Rejected record input: a depth outside the model's working range
/// or a non-positive travel rate.
#[derive(Debug, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DepthError {
    OutOfRange(DepthType),
    InvalidTravelRate(AscentRatePerMinute),
}

impl fmt::Display for DepthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DepthError::OutOfRange(depth) => write!(f, "depth out of range [{depth}m]"),
            DepthError::InvalidTravelRate(rate) => {
                write!(f, "travel rate must be positive [{rate}m/min]")
            }
        }
    }
}

pub trait DecoModelConfig {
    fn validate(&self) -> Result<(), ConfigValidationErr>;
    fn surface_pressure(&self) -> MbarPressure;
    fn deco_ascent_rate(&self) -> AscentRatePerMinute;
    fn ceiling_type(&self) -> CeilingType;
    fn round_ceiling(&self) -> bool;
    fn ndl_type(&self) -> NDLType;
}

/// Current dive state snapshot
#[derive(Debug)]
pub struct DiveState {
    pub depth: Depth,
    pub time: Time,
    pub gas: Gas,
    pub ox_tox: OxTox,
}

pub trait DecoModel: Sized {
    type ConfigType: DecoModelConfig;

    /// model with the default config
    fn default() -> Self;

    /// model init, fails closed on invalid config
    fn new(config: Self::ConfigType) -> Result<Self, ConfigValidationErr>;

    /// get model config
    fn config(&self) -> Self::ConfigType;

    /// get model dive state
    fn dive_state(&self) -> DiveState;

    /// record a dive segment at constant depth
    fn record(&mut self, depth: Depth, time: Time, gas: &Gas) -> Result<(), DepthError>;

    /// record linear ascent / descent given travel time
    fn record_travel(&mut self, target_depth: Depth, time: Time, gas: &Gas)
        -> Result<(), DepthError>;

    /// record linear ascent / descent given travel rate
    fn record_travel_with_rate(
        &mut self,
        target_depth: Depth,
        rate: AscentRatePerMinute,
        gas: &Gas,
    ) -> Result<(), DepthError>;

    /// current no-decompression limit (NDL)
    fn ndl(&self) -> Time;

    /// current decompression ceiling
    fn ceiling(&self) -> Depth;

    /// decompression schedule and TTS
    fn deco(&self, gas_mixes: Vec<Gas>) -> Result<DecoRuntime, DecoCalculationError>;

    /// central nervous system oxygen toxicity
    fn cns(&self) -> Cns;

    /// pulmonary oxygen toxicity
    fn otu(&self) -> Otu;

    /// is in deco check
    fn in_deco(&self) -> bool {
        match self.config().ceiling_type() {
            CeilingType::Actual => self.ceiling() > Depth::zero(),
            CeilingType::Adaptive => {
                let current_gas = self.dive_state().gas;
                // the gas list always contains the current gas, so the
                // calculation can't be rejected
                match self.deco(vec![current_gas]) {
                    Ok(runtime) => runtime.deco_stages.len() > 1,
                    Err(_) => false,
                }
            }
        }
    }
}
