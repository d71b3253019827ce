use crate::buhlmann::buhlmann_config::BuhlmannConfig;
use crate::buhlmann::compartment::{Compartment, Supersaturation, TissuePressures};
use crate::buhlmann::zhl_values::{ZHLParams, ZHL_16C_N2_16A_HE_VALUES};
use crate::common::math_utils;
use crate::common::{
    AscentRatePerMinute, Cns, ConfigValidationErr, Deco, DecoModel, DecoModelConfig, Depth,
    DepthError, DiveState, Gas, GradientFactor, GradientFactors, Otu, OxTox, RecordData,
};
use crate::{CeilingType, DecoCalculationError, DecoRuntime, NDLType, Sim, Time};
use alloc::vec;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const NDL_CUT_OFF_MINS: u8 = 99;
// recordable depth range; beyond it the ZH-L16C parameterisation is not meaningful
const MAX_RECORD_DEPTH_M: f64 = 200.;
// termination guard for the adaptive ceiling fixed point iteration
const ADAPTIVE_CEILING_MAX_ITERATIONS: u8 = 50;

/// Buhlmann ZH-L16C decompression model with gradient factor conservatism.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BuhlmannModel {
    config: BuhlmannConfig,
    compartments: Vec<Compartment>,
    state: BuhlmannState,
    sim: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BuhlmannState {
    depth: Depth,
    time: Time,
    gas: Gas,
    gf_low_depth: Option<Depth>,
    ox_tox: OxTox,
}

impl Default for BuhlmannState {
    fn default() -> Self {
        Self {
            depth: Depth::zero(),
            time: Time::zero(),
            gas: Gas::air(),
            gf_low_depth: None,
            ox_tox: OxTox::default(),
        }
    }
}

impl DecoModel for BuhlmannModel {
    type ConfigType = BuhlmannConfig;

    // initialize with default config
    fn default() -> Self {
        // the default config always passes validation
        match Self::new(BuhlmannConfig::default()) {
            Ok(model) => model,
            Err(_) => unreachable!(),
        }
    }

    /// initialize new Buhlmann (ZH-L16C) model, compartments start
    /// equilibrated with air at the configured surface pressure
    fn new(config: BuhlmannConfig) -> Result<Self, ConfigValidationErr> {
        config.validate()?;
        let mut model = Self {
            config,
            compartments: vec![],
            state: BuhlmannState::default(),
            sim: false,
        };
        model.create_compartments(ZHL_16C_N2_16A_HE_VALUES, config);

        Ok(model)
    }

    /// record data: depth, time, gas
    fn record(&mut self, depth: Depth, time: Time, gas: &Gas) -> Result<(), DepthError> {
        self.validate_depth(depth)?;
        self.state.depth = depth;
        self.state.gas = *gas;
        self.state.time += time;
        let record = RecordData { depth, time, gas };
        self.recalculate(record);
        Ok(())
    }

    /// model travel between depths in 1s intervals
    fn record_travel(
        &mut self,
        target_depth: Depth,
        time: Time,
        gas: &Gas,
    ) -> Result<(), DepthError> {
        self.validate_depth(target_depth)?;
        self.state.gas = *gas;
        let mut current_depth = self.state.depth;
        let distance = target_depth - current_depth;
        let dist_rate = distance.as_meters() / time.as_seconds();
        let mut i = 0;
        while i < time.as_seconds() as i32 {
            self.state.time += Time::from_seconds(1.);
            current_depth += Depth::from_meters(dist_rate);
            let record = RecordData {
                depth: current_depth,
                time: Time::from_seconds(1.),
                gas,
            };
            self.recalculate(record);
            i += 1;
        }

        // align with target depth with lost precision
        self.state.depth = target_depth;

        Ok(())
    }

    fn record_travel_with_rate(
        &mut self,
        target_depth: Depth,
        rate: AscentRatePerMinute,
        gas: &Gas,
    ) -> Result<(), DepthError> {
        if rate <= 0. {
            return Err(DepthError::InvalidTravelRate(rate));
        }
        let distance = math_utils::abs((target_depth - self.state.depth).as_meters());
        self.record_travel(target_depth, Time::from_seconds(distance / rate * 60.), gas)
    }

    fn ndl(&self) -> Time {
        let mut ndl = Time::from_minutes(NDL_CUT_OFF_MINS);

        if self.in_deco() {
            return Time::zero();
        }

        // create a simulation model based on current model's state
        let mut sim_model = self.fork();

        // iterate simulation model over 1min records until NDL cut-off or in deco
        let interval = Time::from_minutes(1.);
        for i in 0..NDL_CUT_OFF_MINS {
            // current depth and gas were validated on the live model
            let _ = sim_model.record(self.state.depth, interval, &self.state.gas);
            let deco_reached = match self.config.ndl_type {
                NDLType::Actual => sim_model.in_deco(),
                NDLType::ByCeiling => sim_model.ceiling() > Depth::zero(),
            };
            if deco_reached {
                ndl = interval * i;
                break;
            }
        }

        ndl
    }

    fn ceiling(&self) -> Depth {
        let BuhlmannConfig {
            deco_ascent_rate,
            mut ceiling_type,
            ..
        } = self.config();
        // forks always fall back to the actual ceiling, preventing
        // recursive simulation
        if self.sim {
            ceiling_type = CeilingType::Actual;
        }

        let mut ceiling = match ceiling_type {
            CeilingType::Actual => self.leading_comp().ceiling(),
            CeilingType::Adaptive => {
                let mut sim_model = self.fork();
                let sim_gas = sim_model.dive_state().gas;
                let mut calculated_ceiling = sim_model.ceiling();
                for _ in 0..ADAPTIVE_CEILING_MAX_ITERATIONS {
                    let sim_depth = sim_model.dive_state().depth;
                    if sim_depth <= Depth::zero() || sim_depth <= calculated_ceiling {
                        break;
                    }
                    // ceilings are non-negative, travel target can't be rejected
                    let _ = sim_model.record_travel_with_rate(
                        calculated_ceiling,
                        deco_ascent_rate,
                        &sim_gas,
                    );
                    calculated_ceiling = sim_model.ceiling();
                }
                calculated_ceiling
            }
        };

        if self.config().round_ceiling() {
            ceiling = Depth::from_meters(math_utils::ceil(ceiling.as_meters()));
        }

        ceiling
    }

    fn deco(&self, gas_mixes: Vec<Gas>) -> Result<DecoRuntime, DecoCalculationError> {
        let mut deco = Deco::default();
        deco.calc(self.fork(), gas_mixes)
    }

    fn config(&self) -> BuhlmannConfig {
        self.config
    }

    fn dive_state(&self) -> DiveState {
        let BuhlmannState {
            depth,
            time,
            gas,
            ox_tox,
            ..
        } = self.state;
        DiveState {
            depth,
            time,
            gas,
            ox_tox,
        }
    }

    fn cns(&self) -> Cns {
        self.state.ox_tox.cns()
    }

    fn otu(&self) -> Otu {
        self.state.ox_tox.otu()
    }
}

impl Sim for BuhlmannModel {
    fn fork(&self) -> Self {
        Self {
            sim: true,
            ..self.clone()
        }
    }

    fn is_sim(&self) -> bool {
        self.sim
    }
}

impl BuhlmannModel {
    /// set of current gradient factors (GF now, GF surface), max over compartments
    pub fn supersaturation(&self) -> Supersaturation {
        let mut acc_gf_99 = 0.;
        let mut acc_gf_surf = 0.;
        for comp in self.compartments.iter() {
            let Supersaturation { gf_99, gf_surf } =
                comp.supersaturation(self.config.surface_pressure, self.state.depth);
            if gf_99 > acc_gf_99 {
                acc_gf_99 = gf_99;
            }
            if gf_surf > acc_gf_surf {
                acc_gf_surf = gf_surf;
            }
        }

        Supersaturation {
            gf_99: acc_gf_99,
            gf_surf: acc_gf_surf,
        }
    }

    /// per-compartment supersaturation at the current depth
    pub fn supersaturation_all(&self) -> Vec<Supersaturation> {
        self.compartments
            .iter()
            .map(|comp| comp.supersaturation(self.config.surface_pressure, self.state.depth))
            .collect()
    }

    /// per-compartment inert gas tensions
    pub fn tissue_pressures(&self) -> Vec<TissuePressures> {
        self.compartments
            .iter()
            .map(|comp| comp.tissue_pressures())
            .collect()
    }

    pub fn tissues(&self) -> Vec<Compartment> {
        self.compartments.clone()
    }

    fn leading_comp(&self) -> &Compartment {
        let mut leading_comp: &Compartment = &self.compartments[0];
        for compartment in &self.compartments[1..] {
            if compartment.min_tolerable_amb_pressure > leading_comp.min_tolerable_amb_pressure {
                leading_comp = compartment;
            }
        }

        leading_comp
    }

    fn leading_comp_mut(&mut self) -> &mut Compartment {
        let mut leading_comp_index = 0;
        for (i, compartment) in self.compartments.iter().enumerate().skip(1) {
            if compartment.min_tolerable_amb_pressure
                > self.compartments[leading_comp_index].min_tolerable_amb_pressure
            {
                leading_comp_index = i;
            }
        }

        &mut self.compartments[leading_comp_index]
    }

    fn create_compartments(&mut self, zhl_values: [ZHLParams; 16], config: BuhlmannConfig) {
        let mut compartments: Vec<Compartment> = vec![];
        for (i, comp_values) in zhl_values.into_iter().enumerate() {
            let compartment = Compartment::new(i as u8 + 1, comp_values, config);
            compartments.push(compartment);
        }
        self.compartments = compartments;
    }

    fn recalculate(&mut self, record: RecordData) {
        self.recalculate_compartments(&record);
        if !self.is_sim() {
            self.recalculate_ox_tox(&record);
        }
    }

    fn recalculate_compartments(&mut self, record: &RecordData) {
        let (gf_low, gf_high) = self.config.gf;

        // first pass establishes the GF-high floor for all compartments
        for compartment in self.compartments.iter_mut() {
            compartment.recalculate(record, gf_high, self.config.surface_pressure);
        }

        // second pass re-derives the leading compartment's M-value state at
        // the sloped gradient factor; the leading compartment dominates the
        // ceiling so the remaining tissues can stay at the GF-high floor
        if gf_high != gf_low {
            let max_gf = self.calc_max_sloped_gf(self.config.gf, record.depth);
            self.recalculate_leading_compartment_with_gf(record, max_gf);
        }
    }

    fn recalculate_leading_compartment_with_gf(
        &mut self,
        record: &RecordData,
        max_gf: GradientFactor,
    ) {
        let surface_pressure = self.config.surface_pressure;
        let leading = self.leading_comp_mut();

        // zero-time record, only the coefficients change
        let leading_tissue_recalc_record = RecordData {
            depth: record.depth,
            time: Time::zero(),
            gas: record.gas,
        };
        leading.recalculate(&leading_tissue_recalc_record, max_gf, surface_pressure);
    }

    fn recalculate_ox_tox(&mut self, record: &RecordData) {
        let pp_o2 = record
            .gas
            .inspired_partial_pressures(record.depth, self.config.surface_pressure)
            .o2;
        self.state.ox_tox.add_exposure(pp_o2, record.time);
    }

    /// Maximum gradient factor for a given depth on a slope between GF-low
    /// (applied at the deepest required stop) and GF-high (at the surface).
    /// Side effect: the GF-low depth anchor is cached for the duration of the
    /// decompression obligation and dropped once the obligation clears.
    fn calc_max_sloped_gf(&mut self, gf: GradientFactors, depth: Depth) -> GradientFactor {
        let (gf_low, gf_high) = gf;
        let in_deco = self.ceiling() > Depth::zero();
        if !in_deco {
            self.state.gf_low_depth = None;
            return gf_high;
        }

        let gf_low_depth = match self.state.gf_low_depth {
            Some(gf_low_depth) => gf_low_depth,
            None => {
                // the deepest depth at which the GF-low fraction just
                // satisfies every compartment
                let surface_pressure_bar = self.config.surface_pressure as f64 / 1000.;
                let gf_low_fraction = gf_low as f64 / 100.;

                let mut max_calculated_depth_m = 0.0f64;
                for comp in self.compartments.iter() {
                    let (a_weighted, b_weighted) =
                        comp.weighted_zhl_params(comp.he_ip, comp.n2_ip);

                    // P_amb = (P_ip - G * a) / (1 - G + G / b)
                    let max_amb_pressure = (comp.total_ip - gf_low_fraction * a_weighted)
                        / (1.0 - gf_low_fraction + gf_low_fraction / b_weighted);

                    let max_depth = (10. * (max_amb_pressure - surface_pressure_bar)).max(0.);
                    max_calculated_depth_m = max_calculated_depth_m.max(max_depth);
                }

                let calculated_gf_low_depth = Depth::from_meters(max_calculated_depth_m);
                self.state.gf_low_depth = Some(calculated_gf_low_depth);
                calculated_gf_low_depth
            }
        };

        if depth > gf_low_depth {
            return gf_low;
        }

        self.gf_slope_point(gf, gf_low_depth, depth)
    }

    fn gf_slope_point(
        &self,
        gf: GradientFactors,
        gf_low_depth: Depth,
        depth: Depth,
    ) -> GradientFactor {
        let (gf_low, gf_high) = gf;
        let slope_point: f64 = gf_high as f64
            - (((gf_high - gf_low) as f64) / gf_low_depth.as_meters()) * depth.as_meters();

        slope_point as u8
    }

    fn validate_depth(&self, depth: Depth) -> Result<(), DepthError> {
        if depth < Depth::zero() || depth > Depth::from_meters(MAX_RECORD_DEPTH_M) {
            return Err(DepthError::OutOfRange(depth.as_meters()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state() {
        let mut model = BuhlmannModel::default();
        let air = Gas::air();
        let nx32 = Gas::new(0.32, 0.).unwrap();
        model
            .record(Depth::from_meters(10.), Time::from_minutes(10.), &air)
            .unwrap();
        model
            .record(Depth::from_meters(15.), Time::from_minutes(15.), &nx32)
            .unwrap();
        assert_eq!(model.state.depth.as_meters(), 15.);
        assert_eq!(model.state.time, Time::from_minutes(25.));
        assert_eq!(model.state.gas, nx32);
        assert_eq!(model.state.gf_low_depth, None);
        assert_ne!(model.state.ox_tox, OxTox::default());
    }

    #[test]
    fn test_invalid_config() {
        let config = BuhlmannConfig::new().with_gradient_factors(90, 80);
        assert!(BuhlmannModel::new(config).is_err());
    }

    #[test]
    fn test_record_depth_validation() {
        let mut model = BuhlmannModel::default();
        let air = Gas::air();
        let res = model.record(Depth::from_meters(-10.), Time::from_seconds(1.), &air);
        assert_eq!(res, Err(DepthError::OutOfRange(-10.)));
        let res = model.record(Depth::from_meters(250.), Time::from_seconds(1.), &air);
        assert_eq!(res, Err(DepthError::OutOfRange(250.)));
        // state untouched by the rejected records
        assert_eq!(model.state.depth, Depth::zero());
        assert_eq!(model.state.time, Time::zero());
    }

    #[test]
    fn test_invalid_travel_rate() {
        let mut model = BuhlmannModel::default();
        let air = Gas::air();
        let res = model.record_travel_with_rate(Depth::from_meters(10.), 0., &air);
        assert_eq!(res, Err(DepthError::InvalidTravelRate(0.)));
    }

    #[test]
    fn test_max_gf_within_ndl() {
        let gf = (50, 100);
        let mut model =
            BuhlmannModel::new(BuhlmannConfig::new().with_gradient_factors(gf.0, gf.1)).unwrap();
        let air = Gas::air();
        model.record(Depth::zero(), Time::zero(), &air).unwrap();
        assert_eq!(model.calc_max_sloped_gf(gf, Depth::zero()), 100);
    }

    #[test]
    fn test_max_gf_below_first_stop() {
        let gf = (50, 100);
        let mut model =
            BuhlmannModel::new(BuhlmannConfig::new().with_gradient_factors(gf.0, gf.1)).unwrap();
        let air = Gas::air();
        model
            .record(Depth::from_meters(40.), Time::from_minutes(12.), &air)
            .unwrap();
        assert_eq!(model.calc_max_sloped_gf(gf, Depth::from_meters(40.)), 50);
    }

    #[test]
    fn test_max_gf_during_deco() {
        let gf = (30, 70);
        let mut model =
            BuhlmannModel::new(BuhlmannConfig::new().with_gradient_factors(gf.0, gf.1)).unwrap();
        let air = Gas::air();

        model
            .record(Depth::from_meters(40.), Time::from_minutes(30.), &air)
            .unwrap();
        model
            .record(Depth::from_meters(21.), Time::from_minutes(5.), &air)
            .unwrap();
        model
            .record(Depth::from_meters(14.), Time::zero(), &air)
            .unwrap();
        assert_eq!(model.calc_max_sloped_gf(gf, Depth::from_meters(14.)), 40);
    }

    #[test]
    fn test_gf_slope_point() {
        let gf = (30, 85);
        let model =
            BuhlmannModel::new(BuhlmannConfig::new().with_gradient_factors(gf.0, gf.1)).unwrap();
        let slope_point =
            model.gf_slope_point(gf, Depth::from_meters(33.528), Depth::from_meters(30.48));
        assert_eq!(slope_point, 35);
    }

    #[test]
    fn test_gf_low_depth_cache_cleared_when_out_of_deco() {
        let gf = (30, 70);
        let mut model =
            BuhlmannModel::new(BuhlmannConfig::new().with_gradient_factors(gf.0, gf.1)).unwrap();
        let air = Gas::air();

        model
            .record(Depth::from_meters(40.), Time::from_minutes(30.), &air)
            .unwrap();
        assert!(model.state.gf_low_depth.is_some());

        // surface and off-gas until the obligation clears
        model
            .record_travel_with_rate(Depth::zero(), 10., &air)
            .unwrap();
        while model.in_deco() {
            model
                .record(Depth::zero(), Time::from_minutes(10.), &air)
                .unwrap();
        }
        model.record(Depth::zero(), Time::from_minutes(1.), &air).unwrap();
        assert_eq!(model.state.gf_low_depth, None);
    }

    #[test]
    fn test_initial_supersaturation() {
        fn extract_supersaturations(model: &BuhlmannModel) -> Vec<Supersaturation> {
            model
                .compartments
                .iter()
                .map(|comp| comp.supersaturation(model.config().surface_pressure, Depth::zero()))
                .collect::<Vec<Supersaturation>>()
        }

        let model_initial = BuhlmannModel::default();

        let mut model_with_surface_interval = BuhlmannModel::default();
        model_with_surface_interval
            .record(Depth::zero(), Time::from_seconds(999999.), &Gas::air())
            .unwrap();

        let initial_gfs = extract_supersaturations(&model_initial);
        let surface_interval_gfs = extract_supersaturations(&model_with_surface_interval);

        assert_eq!(initial_gfs, surface_interval_gfs);
    }

    #[test]
    fn test_ndl_0_if_in_deco() {
        let mut model = BuhlmannModel::new(
            BuhlmannConfig::default()
                .with_gradient_factors(30, 70)
                .with_ceiling_type(CeilingType::Actual),
        )
        .unwrap();
        let air = Gas::air();
        model
            .record(Depth::from_meters(40.), Time::from_minutes(6.), &air)
            .unwrap();
        model
            .record(Depth::from_meters(9.), Time::zero(), &air)
            .unwrap();
        assert_eq!(model.ndl(), Time::zero());
    }

    #[test]
    fn test_fork_suppresses_ox_tox() {
        let mut model = BuhlmannModel::default();
        let ean_32 = Gas::new(0.32, 0.).unwrap();
        model
            .record(Depth::from_meters(36.), Time::from_minutes(20.), &ean_32)
            .unwrap();
        let cns_before = model.cns();
        let otu_before = model.otu();

        let mut fork = model.fork();
        fork.record(Depth::from_meters(36.), Time::from_minutes(20.), &ean_32)
            .unwrap();
        assert_eq!(fork.cns(), cns_before);
        assert_eq!(fork.otu(), otu_before);
    }
}
