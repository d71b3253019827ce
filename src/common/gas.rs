use crate::common::global_types::{MbarPressure, Pressure};
use crate::common::math_utils;
use alloc::string::String;
use core::fmt;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Depth;

// alveolar water vapor pressure assuming 47 mm Hg at 37C (Buhlmann's value)
pub(crate) const ALVEOLI_WATER_VAPOR_PRESSURE: Pressure = 0.0627;

/// Breathing gas mix rejected by validation: a fraction outside [0, 1]
/// or a combined O2 + He share above 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasError {
    pub reason: &'static str,
}

impl fmt::Display for GasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid gas mix: {}", self.reason)
    }
}

/// An immutable breathing gas mix given as (fO2, fHe); the N2 share is derived.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gas {
    o2_pp: Pressure,
    he_pp: Pressure,
    n2_pp: Pressure,
}

#[derive(Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PartialPressures {
    pub o2: Pressure,
    pub n2: Pressure,
    pub he: Pressure,
}

impl fmt::Display for Gas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}/{:.0}", self.o2_pp * 100., self.he_pp * 100.)
    }
}

impl Gas {
    /// init new gas with gas fractions (eg. 0.21, 0. for air)
    pub fn new(o2_pp: Pressure, he_pp: Pressure) -> Result<Self, GasError> {
        if !(0. ..=1.).contains(&o2_pp) {
            return Err(GasError {
                reason: "O2 fraction must be within 0-1",
            });
        }
        if !(0. ..=1.).contains(&he_pp) {
            return Err(GasError {
                reason: "He fraction must be within 0-1",
            });
        }
        if (o2_pp + he_pp) > 1. {
            return Err(GasError {
                reason: "O2 and He fractions can't exceed 1 in total",
            });
        }

        Ok(Self {
            o2_pp,
            he_pp,
            n2_pp: math_utils::round((1. - (o2_pp + he_pp)) * 10000.) / 10000.,
        })
    }

    pub fn air() -> Self {
        Self {
            o2_pp: 0.21,
            he_pp: 0.,
            n2_pp: 0.79,
        }
    }

    pub fn id(&self) -> String {
        let mut s = String::new();
        let _ = fmt::write(
            &mut s,
            format_args!("{:.0}/{:.0}", self.o2_pp * 100., self.he_pp * 100.),
        );
        s
    }

    /// gas partial pressures at depth
    pub fn partial_pressures(
        &self,
        depth: Depth,
        surface_pressure: MbarPressure,
    ) -> PartialPressures {
        let gas_pressure = (surface_pressure as f64 / 1000.) + (depth.as_meters() / 10.);
        self.gas_pressures_compound(gas_pressure)
    }

    /// gas partial pressures in alveoli taking into account alveolar water vapor pressure
    pub fn inspired_partial_pressures(
        &self,
        depth: Depth,
        surface_pressure: MbarPressure,
    ) -> PartialPressures {
        let gas_pressure = ((surface_pressure as f64 / 1000.) + (depth.as_meters() / 10.))
            - ALVEOLI_WATER_VAPOR_PRESSURE;
        self.gas_pressures_compound(gas_pressure)
    }

    pub fn gas_pressures_compound(&self, gas_pressure: f64) -> PartialPressures {
        PartialPressures {
            o2: self.o2_pp * gas_pressure,
            n2: self.n2_pp * gas_pressure,
            he: self.he_pp * gas_pressure,
        }
    }

    /// MOD for a given ppO2 limit
    pub fn max_operating_depth(&self, pp_o2_limit: Pressure) -> Depth {
        Depth::from_meters(10. * ((pp_o2_limit / self.o2_pp) - 1.))
    }

    /// END, clamped at the surface
    pub fn equivalent_narcotic_depth(&self, depth: Depth) -> Depth {
        let end = (depth.as_meters() + 10.) * (1. - self.he_pp) - 10.;
        Depth::from_meters(end.max(0.))
    }

    pub fn o2_fraction(&self) -> Pressure {
        self.o2_pp
    }

    pub fn he_fraction(&self) -> Pressure {
        self.he_pp
    }

    pub fn n2_fraction(&self) -> Pressure {
        self.n2_pp
    }
}
