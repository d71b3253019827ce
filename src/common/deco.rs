use alloc::vec::Vec;
use core::fmt;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::common::math_utils;
use crate::common::{DecoModelConfig, DepthError, DiveState, MbarPressure, Pressure, Sim};
use crate::{DecoModel, Depth, Gas, Time};

// deco stops are scheduled on whole multiples of the deco window
const DECO_WINDOW_M: f64 = 3.;
// ppO2 limit applied when scheduling deco gas switches
const GAS_SWITCH_PP_O2: Pressure = 1.6;

#[derive(Copy, Clone, Debug, PartialEq)]
enum DecoAction {
    AscentToCeil,
    AscentToGasSwitchDepth(Gas),
    SwitchGas(Gas),
    Stop,
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DecoStageType {
    Ascent,
    DecoStop,
    GasSwitch,
}

/// One leg of the decompression schedule.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecoStage {
    pub stage_type: DecoStageType,
    pub start_depth: Depth,
    pub end_depth: Depth,
    pub duration: Time,
    pub gas: Gas,
}

/// Decompression schedule calculator. Accumulates stages while driving a
/// forked model from its current state up to the surface.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Deco {
    deco_stages: Vec<DecoStage>,
    tts: Time,
}

/// Calculated decompression runtime.
#[derive(Debug, PartialEq, Default, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecoRuntime {
    pub deco_stages: Vec<DecoStage>,
    /// current time to surface
    pub tts: Time,
    /// TTS measured to reaching the surface (identical to `tts` in this design)
    pub tts_surface: Time,
    /// runtime was produced on a simulation fork
    pub sim: bool,
}

#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DecoCalculationError {
    EmptyGasList,
    CurrentGasNotInList,
    Record(DepthError),
}

impl fmt::Display for DecoCalculationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DecoCalculationError::EmptyGasList => {
                write!(f, "at least one available gas mix required")
            }
            DecoCalculationError::CurrentGasNotInList => write!(
                f,
                "available gas mixes must include the current gas mix used by deco model"
            ),
            DecoCalculationError::Record(e) => {
                write!(f, "record rejected during deco simulation: {e}")
            }
        }
    }
}

impl From<DepthError> for DecoCalculationError {
    fn from(e: DepthError) -> Self {
        DecoCalculationError::Record(e)
    }
}

impl Deco {
    /// Run the deco simulation until the model surfaces, accumulating stages.
    pub fn calc<T: DecoModel + Sim>(
        &mut self,
        deco_model: T,
        gas_mixes: Vec<Gas>,
    ) -> Result<DecoRuntime, DecoCalculationError> {
        Self::validate_gas_mixes(&deco_model, &gas_mixes)?;

        let mut sim_model = deco_model.fork();
        let ascent_rate = sim_model.config().deco_ascent_rate();
        loop {
            let DiveState {
                depth: pre_stage_depth,
                time: pre_stage_time,
                gas: pre_stage_gas,
                ..
            } = sim_model.dive_state();
            let ceiling = sim_model.ceiling();

            let Some(deco_action) = self.next_deco_action(&sim_model, &gas_mixes) else {
                // deco obligation cleared, surface reached
                break;
            };

            match deco_action {
                // travel to min depth (deco stop or surface); also brings the
                // model back down to the stop depth after an overshot ascent
                DecoAction::AscentToCeil => {
                    sim_model.record_travel_with_rate(
                        self.deco_stop_depth(ceiling),
                        ascent_rate,
                        &pre_stage_gas,
                    )?;
                    let post_travel_state = sim_model.dive_state();
                    self.register_deco_stage(DecoStage {
                        stage_type: DecoStageType::Ascent,
                        start_depth: pre_stage_depth,
                        end_depth: post_travel_state.depth,
                        duration: post_travel_state.time - pre_stage_time,
                        gas: post_travel_state.gas,
                    });
                }

                // ascent to the next deco gas' maximum operating depth, then switch
                DecoAction::AscentToGasSwitchDepth(next_switch_gas) => {
                    let switch_gas_mod = next_switch_gas.max_operating_depth(GAS_SWITCH_PP_O2);
                    sim_model.record_travel_with_rate(switch_gas_mod, ascent_rate, &pre_stage_gas)?;
                    let DiveState {
                        depth: post_ascent_depth,
                        time: post_ascent_time,
                        ..
                    } = sim_model.dive_state();
                    self.register_deco_stage(DecoStage {
                        stage_type: DecoStageType::Ascent,
                        start_depth: pre_stage_depth,
                        end_depth: post_ascent_depth,
                        duration: post_ascent_time - pre_stage_time,
                        gas: pre_stage_gas,
                    });

                    sim_model.record(post_ascent_depth, Time::zero(), &next_switch_gas)?;
                    self.register_deco_stage(DecoStage {
                        stage_type: DecoStageType::GasSwitch,
                        start_depth: post_ascent_depth,
                        end_depth: post_ascent_depth,
                        duration: Time::zero(),
                        gas: next_switch_gas,
                    });
                }

                // switch gas in place
                DecoAction::SwitchGas(switch_gas) => {
                    sim_model.record(pre_stage_depth, Time::zero(), &switch_gas)?;
                    self.register_deco_stage(DecoStage {
                        stage_type: DecoStageType::GasSwitch,
                        start_depth: pre_stage_depth,
                        end_depth: pre_stage_depth,
                        duration: Time::zero(),
                        gas: switch_gas,
                    });
                }

                // decompression stop, simulated in 1s increments and coalesced
                // into a single stage once the stop clears
                DecoAction::Stop => {
                    sim_model.record(pre_stage_depth, Time::from_seconds(1.), &pre_stage_gas)?;
                    let post_stop_state = sim_model.dive_state();
                    self.register_deco_stage(DecoStage {
                        stage_type: DecoStageType::DecoStop,
                        start_depth: pre_stage_depth,
                        end_depth: post_stop_state.depth,
                        duration: post_stop_state.time - pre_stage_time,
                        gas: post_stop_state.gas,
                    });
                }
            }
        }

        let tts = self.tts;
        Ok(DecoRuntime {
            deco_stages: self.deco_stages.clone(),
            tts,
            tts_surface: tts,
            sim: true,
        })
    }

    fn next_deco_action(
        &self,
        sim_model: &impl DecoModel,
        gas_mixes: &[Gas],
    ) -> Option<DecoAction> {
        let DiveState {
            depth: current_depth,
            gas: current_gas,
            ..
        } = sim_model.dive_state();
        let surface_pressure = sim_model.config().surface_pressure();

        // end deco simulation - surface
        if current_depth <= Depth::zero() {
            return None;
        }

        let ceiling = sim_model.ceiling();
        if ceiling <= Depth::zero() {
            // obligation cleared, free ascent to the surface
            return Some(DecoAction::AscentToCeil);
        }

        let stop_depth = self.deco_stop_depth(ceiling);
        if current_depth < stop_depth {
            // shallower than the required stop, travel back down to it
            return Some(DecoAction::AscentToCeil);
        }

        let next_switch_gas =
            self.next_switch_gas(current_depth, &current_gas, gas_mixes, surface_pressure);

        // switch in place when already within the next deco gas' MOD
        if let Some(switch_gas) = next_switch_gas {
            if switch_gas != current_gas
                && current_depth <= switch_gas.max_operating_depth(GAS_SWITCH_PP_O2)
            {
                return Some(DecoAction::SwitchGas(switch_gas));
            }
        }

        if current_depth == stop_depth {
            return Some(DecoAction::Stop);
        }

        // ascent to the next gas switch depth if its MOD clears the ceiling
        if let Some(switch_gas) = next_switch_gas {
            if switch_gas.max_operating_depth(GAS_SWITCH_PP_O2) >= ceiling {
                return Some(DecoAction::AscentToGasSwitchDepth(switch_gas));
            }
        }

        Some(DecoAction::AscentToCeil)
    }

    /// next deco gas candidate: the least oxygen-rich mix that still raises
    /// the O2 partial pressure over the current gas at this depth
    fn next_switch_gas(
        &self,
        current_depth: Depth,
        current_gas: &Gas,
        gas_mixes: &[Gas],
        surface_pressure: MbarPressure,
    ) -> Option<Gas> {
        let current_gas_partial_pressures =
            current_gas.partial_pressures(current_depth, surface_pressure);
        let mut switch_gasses = gas_mixes
            .iter()
            .filter(|gas| {
                let partial_pressures = gas.partial_pressures(current_depth, surface_pressure);
                partial_pressures.o2 > current_gas_partial_pressures.o2
            })
            .copied()
            .collect::<Vec<Gas>>();

        switch_gasses.sort_by(|a, b| {
            let x = a.gas_pressures_compound(1.);
            let y = b.gas_pressures_compound(1.);
            x.o2.partial_cmp(&y.o2).unwrap()
        });

        switch_gasses.first().copied()
    }

    fn register_deco_stage(&mut self, stage: DecoStage) {
        // merge iterative deco stops (and chained switches) into one stage;
        // ascents always span a distinct depth band and stay separate
        let mut push_new = true;
        if stage.stage_type != DecoStageType::Ascent {
            if let Some(last_stage) = self.deco_stages.last_mut() {
                if last_stage.stage_type == stage.stage_type
                    && last_stage.gas == stage.gas
                    && last_stage.end_depth == stage.start_depth
                {
                    last_stage.duration += stage.duration;
                    last_stage.end_depth = stage.end_depth;
                    push_new = false;
                }
            }
        }
        if push_new {
            self.deco_stages.push(stage);
        }

        self.tts += stage.duration;
    }

    // round ceiling up to the bottom of the deco window
    fn deco_stop_depth(&self, ceiling: Depth) -> Depth {
        Depth::from_meters(DECO_WINDOW_M * math_utils::ceil(ceiling.as_meters() / DECO_WINDOW_M))
    }

    fn validate_gas_mixes<T: DecoModel>(
        deco_model: &T,
        gas_mixes: &[Gas],
    ) -> Result<(), DecoCalculationError> {
        if gas_mixes.is_empty() {
            return Err(DecoCalculationError::EmptyGasList);
        }
        let current_gas = deco_model.dive_state().gas;
        if !gas_mixes.iter().any(|gas_mix| *gas_mix == current_gas) {
            return Err(DecoCalculationError::CurrentGasNotInList);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BuhlmannModel, DepthType};
    use alloc::vec;

    #[test]
    fn test_ceiling_rounding() {
        let test_cases: Vec<(DepthType, DepthType)> = vec![
            (0., 0.),
            (2., 3.),
            (2.999, 3.),
            (3., 3.),
            (3.00001, 6.),
            (12., 12.),
        ];
        let deco = Deco::default();
        for (input_depth, expected_depth) in test_cases {
            let res = deco.deco_stop_depth(Depth::from_meters(input_depth));
            assert_eq!(res, Depth::from_meters(expected_depth));
        }
    }

    #[test]
    fn test_next_switch_gas() {
        let air = Gas::air();
        let ean_50 = Gas::new(0.5, 0.).unwrap();
        let oxygen = Gas::new(1., 0.).unwrap();
        let trimix = Gas::new(0.5, 0.2).unwrap();

        // [ (current_depth, current_gas, gas_mixes, expected_switch_gas) ]
        let test_cases: Vec<(DepthType, Gas, Vec<Gas>, Option<Gas>)> = vec![
            // single gas air
            (10., air, vec![air], None),
            // air + ean50 within MOD
            (10., air, vec![air, ean_50], Some(ean_50)),
            // air + ean50 over MOD
            (30., air, vec![air, ean_50], Some(ean_50)),
            // air + ean50 + oxygen, ean50 within MOD, oxygen out
            (20., air, vec![air, ean_50, oxygen], Some(ean_50)),
            // air + ean50 + oxygen, deco on ean50, oxygen within MOD
            (5.5, ean_50, vec![air, ean_50, oxygen], Some(oxygen)),
            // air + trimix with o2 share over air
            (30., air, vec![air, trimix], Some(trimix)),
        ];

        let deco = Deco::default();
        for (current_depth, current_gas, available_gas_mixes, expected_switch_gas) in test_cases {
            let res = deco.next_switch_gas(
                Depth::from_meters(current_depth),
                &current_gas,
                &available_gas_mixes,
                1000,
            );
            assert_eq!(res, expected_switch_gas);
        }
    }

    #[test]
    fn should_err_on_empty_gas_mixes() {
        let mut deco = Deco::default();
        let deco_model = BuhlmannModel::default();
        let deco_res = deco.calc(deco_model, vec![]);
        assert_eq!(deco_res, Err(DecoCalculationError::EmptyGasList));
    }

    #[test]
    fn should_err_on_gas_mixes_without_current_mix() {
        let mut deco = Deco::default();
        let mut deco_model = BuhlmannModel::default();
        let air = Gas::air();
        let ean50 = Gas::new(0.50, 0.).unwrap();
        let tmx2135 = Gas::new(0.21, 0.35).unwrap();
        deco_model
            .record_travel_with_rate(Depth::from_meters(40.), 10., &air)
            .unwrap();
        let deco_res = deco.calc(deco_model, vec![ean50, tmx2135]);
        assert_eq!(deco_res, Err(DecoCalculationError::CurrentGasNotInList));
    }
}
