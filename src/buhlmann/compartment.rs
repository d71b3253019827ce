use crate::buhlmann::buhlmann_config::BuhlmannConfig;
use crate::buhlmann::zhl_values::{ZHLParam, ZHLParams};
use crate::common::math_utils;
use crate::common::{
    Depth, Gas, GradientFactor, MbarPressure, PartialPressures, Pressure, RecordData,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current and surfacing supersaturation as a percentage of the
/// raw (100% gradient factor) M-value gradient.
#[derive(Debug, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Supersaturation {
    pub gf_99: f64,
    pub gf_surf: f64,
}

/// Inert gas tissue tensions of a single compartment.
#[derive(Debug, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TissuePressures {
    pub n2: Pressure,
    pub he: Pressure,
    pub total: Pressure,
}

/// A single ZH-L16C tissue compartment tracking nitrogen and helium
/// tensions, with M-value state derived on every update.
#[derive(Debug, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Compartment {
    pub no: u8,
    // helium and nitrogen inert pressures (tissue tensions)
    pub he_ip: Pressure,
    pub n2_ip: Pressure,
    pub total_ip: Pressure,
    // M-value at 100% gradient factor and at the current max gradient factor
    pub m_value_raw: Pressure,
    pub m_value_calc: Pressure,
    pub min_tolerable_amb_pressure: Pressure,
    pub params: ZHLParams,
    model_config: BuhlmannConfig,
}

impl Compartment {
    pub fn new(no: u8, params: ZHLParams, model_config: BuhlmannConfig) -> Self {
        // born equilibrated with air at the configured surface pressure
        let initial_n2_ip = Gas::air()
            .inspired_partial_pressures(Depth::zero(), model_config.surface_pressure)
            .n2;
        let mut compartment = Self {
            no,
            params,
            he_ip: 0.,
            n2_ip: initial_n2_ip,
            total_ip: initial_n2_ip,
            m_value_raw: 0.,
            m_value_calc: 0.,
            min_tolerable_amb_pressure: 0.,
            model_config,
        };
        let (_, gf_high) = model_config.gf;
        compartment.recalculate_m_values(Depth::zero(), gf_high, model_config.surface_pressure);

        compartment
    }

    /// recalculate tissue tensions for a segment, then re-derive M-value
    /// state for the given max gradient factor
    pub fn recalculate(
        &mut self,
        record: &RecordData,
        max_gf: GradientFactor,
        surface_pressure: MbarPressure,
    ) {
        self.recalculate_inert_pressures(record, surface_pressure);
        self.recalculate_m_values(record.depth, max_gf, surface_pressure);
    }

    /// ceiling depth obtained from the min tolerable ambient pressure
    pub fn ceiling(&self) -> Depth {
        let surface_pressure_bar = self.model_config.surface_pressure as f64 / 1000.;
        let ceiling = 10. * (self.min_tolerable_amb_pressure - surface_pressure_bar);
        Depth::from_meters(ceiling.max(0.))
    }

    /// current and surfacing gradient factors at given depth
    pub fn supersaturation(&self, surface_pressure: MbarPressure, depth: Depth) -> Supersaturation {
        let p_surf = surface_pressure as f64 / 1000.;
        let p_amb = p_surf + (depth.as_meters() / 10.);
        let (a_weighted, b_weighted) = self.weighted_zhl_params(self.he_ip, self.n2_ip);
        let m_value = a_weighted + (p_amb / b_weighted);
        let m_value_surf = a_weighted + (p_surf / b_weighted);
        let gf_99 = ((self.total_ip - p_amb) / (m_value - p_amb)) * 100.;
        let gf_surf = ((self.total_ip - p_surf) / (m_value_surf - p_surf)) * 100.;

        Supersaturation { gf_99, gf_surf }
    }

    pub fn tissue_pressures(&self) -> TissuePressures {
        TissuePressures {
            n2: self.n2_ip,
            he: self.he_ip,
            total: self.total_ip,
        }
    }

    /// a and b coefficients weighted by the current tissue tension ratio;
    /// a gas-free tissue falls back to the nitrogen coefficients
    pub fn weighted_zhl_params(&self, he_ip: Pressure, n2_ip: Pressure) -> (ZHLParam, ZHLParam) {
        let (_, n2_a, n2_b, _, he_a, he_b) = self.params;
        let total_ip = he_ip + n2_ip;
        if total_ip == 0. {
            return (n2_a, n2_b);
        }

        (
            ((he_a * he_ip) + (n2_a * n2_ip)) / total_ip,
            ((he_b * he_ip) + (n2_b * n2_ip)) / total_ip,
        )
    }

    fn recalculate_inert_pressures(&mut self, record: &RecordData, surface_pressure: MbarPressure) {
        let RecordData { depth, time, gas } = record;
        let PartialPressures { n2, he, .. } = gas.inspired_partial_pressures(*depth, surface_pressure);
        let (n2_half_time, .., he_half_time, _, _) = self.params;

        self.n2_ip = Self::haldane_step(self.n2_ip, n2, time.as_minutes(), n2_half_time);
        self.he_ip = Self::haldane_step(self.he_ip, he, time.as_minutes(), he_half_time);
        self.total_ip = self.n2_ip + self.he_ip;
    }

    // P' = P + (P_insp - P) * (1 - 2^(-t / ht))
    fn haldane_step(
        tissue_pressure: Pressure,
        inspired_pressure: Pressure,
        time_minutes: f64,
        half_time: ZHLParam,
    ) -> Pressure {
        tissue_pressure
            + ((inspired_pressure - tissue_pressure)
                * (1. - math_utils::powf(2., -time_minutes / half_time)))
    }

    fn recalculate_m_values(
        &mut self,
        depth: Depth,
        max_gf: GradientFactor,
        surface_pressure: MbarPressure,
    ) {
        let (a_weighted, b_weighted) = self.weighted_zhl_params(self.he_ip, self.n2_ip);
        let (a_adjusted, b_adjusted) = Self::gf_adjusted_params(a_weighted, b_weighted, max_gf);
        let p_amb = (surface_pressure as f64 / 1000.) + (depth.as_meters() / 10.);

        self.m_value_raw = a_weighted + (p_amb / b_weighted);
        self.m_value_calc = a_adjusted + (p_amb / b_adjusted);
        self.min_tolerable_amb_pressure = (self.total_ip - a_adjusted) * b_adjusted;
    }

    // a and b coefficients sloped by the gradient factor fraction
    fn gf_adjusted_params(
        a: ZHLParam,
        b: ZHLParam,
        max_gf: GradientFactor,
    ) -> (ZHLParam, ZHLParam) {
        let gf_fraction = max_gf as f64 / 100.;
        (
            a * gf_fraction,
            b / (gf_fraction - (gf_fraction * b) + b),
        )
    }
}
