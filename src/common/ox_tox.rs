use crate::common::cns_table::{CNSCoeffRow, CNS_COEFFICIENTS};
use crate::common::global_types::{Cns, Otu, Pressure};
use crate::common::math_utils;
use crate::common::Time;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// no oxygen toxicity accumulation below this ppO2
const TOX_THRESHOLD_PP_O2: Pressure = 0.5;

/// Oxygen toxicity exposure counters: CNS (percent of the NOAA clock)
/// and OTU (pulmonary units).
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OxTox {
    cns: Cns,
    otu: Otu,
}

impl OxTox {
    pub fn cns(&self) -> Cns {
        self.cns
    }

    pub fn otu(&self) -> Otu {
        self.otu
    }

    /// accumulate exposure at inspired ppO2 over a segment
    pub fn add_exposure(&mut self, pp_o2: Pressure, time: Time) {
        self.add_cns_exposure(pp_o2, time);
        self.add_otu_exposure(pp_o2, time);
    }

    fn add_cns_exposure(&mut self, pp_o2: Pressure, time: Time) {
        if let Some((.., slope, intercept)) = Self::cns_coeffs(pp_o2) {
            // time limit for given ppO2
            let t_lim = (slope as f64) * pp_o2 + (intercept as f64);
            self.cns += (time.as_minutes() / t_lim) * 100.;
        }
    }

    fn add_otu_exposure(&mut self, pp_o2: Pressure, time: Time) {
        if pp_o2 > TOX_THRESHOLD_PP_O2 {
            self.otu +=
                math_utils::powf((pp_o2 - TOX_THRESHOLD_PP_O2) / 0.5, 0.83) * time.as_minutes();
        }
    }

    // find CNS rate coefficients by ppO2; exposures beyond the table's
    // top range keep the steepest (last) row's rate
    fn cns_coeffs(pp_o2: Pressure) -> Option<CNSCoeffRow> {
        if pp_o2 < TOX_THRESHOLD_PP_O2 {
            return None;
        }
        CNS_COEFFICIENTS
            .into_iter()
            .find(|(range, ..)| range.contains(&pp_o2))
            .or_else(|| CNS_COEFFICIENTS.last().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let ox_tox = OxTox::default();
        assert_eq!(ox_tox.cns(), 0.);
        assert_eq!(ox_tox.otu(), 0.);
    }

    #[test]
    fn test_cns_coeffs_assignment() {
        // (ppO2, expected row found)
        let assignable_cases = [
            (-0.55, false),
            (0.3, false),
            (0.55, true),
            (0.8, true),
            (1.6, true),
            (1.7, true),
        ];
        for (pp_o2, is_assignable) in assignable_cases {
            assert_eq!(OxTox::cns_coeffs(pp_o2).is_some(), is_assignable);
        }
        // over-range exposure falls back to the last row
        let (range, slope, intercept) = OxTox::cns_coeffs(1.7).unwrap();
        assert_eq!(range, 1.5..=1.65);
        assert_eq!((slope, intercept), (-750, 1245));
    }

    #[test]
    fn test_cns_segment() {
        let mut ox_tox = OxTox::default();
        // EAN32 at 36m for 20 minutes
        let pp_o2 = 1.4560959999999998;
        ox_tox.add_exposure(pp_o2, Time::from_minutes(20.));
        assert_eq!(ox_tox.cns(), 15.018262206843517);
    }

    #[test]
    fn test_otu_segment() {
        let mut ox_tox = OxTox::default();
        let pp_o2 = 1.4560959999999998;
        ox_tox.add_exposure(pp_o2, Time::from_minutes(20.));
        assert_eq!(ox_tox.otu(), 34.25319903376013);
    }

    #[test]
    fn test_no_accumulation_below_threshold() {
        let mut ox_tox = OxTox::default();
        ox_tox.add_exposure(0.35, Time::from_minutes(60.));
        ox_tox.add_exposure(0.21, Time::from_minutes(600.));
        assert_eq!(ox_tox, OxTox::default());
    }

    #[test]
    fn test_exposure_accumulates_across_segments() {
        let mut single = OxTox::default();
        single.add_exposure(1.2, Time::from_minutes(30.));

        let mut split = OxTox::default();
        for _ in 0..30 {
            split.add_exposure(1.2, Time::from_minutes(1.));
        }

        assert!((single.cns() - split.cns()).abs() < 1e-9);
        assert!((single.otu() - split.otu()).abs() < 1e-9);
    }
}
