use core::{
    cmp::Ordering,
    fmt,
    ops::{Add, AddAssign, Div, Mul, Sub},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub type DepthType = f64;

const FEET_PER_METER: DepthType = 3.28084;
const METERS_PER_FOOT: DepthType = 0.3048;

pub enum Units {
    Metric,
    Imperial,
}

pub trait Unit<T = f64>: Sized {
    fn from_units(val: T, units: Units) -> Self;
    fn to_units(&self, units: Units) -> T;
    fn base_unit(&self) -> T;
}

/// Water depth. Meters are the base unit, feet are converted on the way in and out.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Depth {
    m: DepthType,
}

impl Depth {
    pub fn zero() -> Self {
        Self { m: 0. }
    }

    pub fn from_meters<T: Into<DepthType>>(val: T) -> Self {
        Self { m: val.into() }
    }

    pub fn from_feet<T: Into<DepthType>>(val: T) -> Self {
        Self {
            m: val.into() * METERS_PER_FOOT,
        }
    }

    pub fn as_meters(&self) -> DepthType {
        self.m
    }

    pub fn as_feet(&self) -> DepthType {
        self.m * FEET_PER_METER
    }
}

impl Unit for Depth {
    fn from_units(val: DepthType, units: Units) -> Self {
        match units {
            Units::Metric => Self::from_meters(val),
            Units::Imperial => Self::from_feet(val),
        }
    }

    fn to_units(&self, units: Units) -> DepthType {
        match units {
            Units::Metric => self.as_meters(),
            Units::Imperial => self.as_feet(),
        }
    }

    fn base_unit(&self) -> DepthType {
        self.m
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, r"{}m \ {}ft", self.as_meters(), self.as_feet())
    }
}

impl PartialEq for Depth {
    fn eq(&self, other: &Self) -> bool {
        self.m == other.m
    }
}

impl PartialOrd for Depth {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.m.partial_cmp(&other.m)
    }
}

impl Add for Depth {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self { m: self.m + rhs.m }
    }
}

impl Sub for Depth {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self { m: self.m - rhs.m }
    }
}

impl Mul<DepthType> for Depth {
    type Output = Self;
    fn mul(self, rhs: DepthType) -> Self::Output {
        Self { m: self.m * rhs }
    }
}

impl Div<DepthType> for Depth {
    type Output = Self;
    fn div(self, rhs: DepthType) -> Self::Output {
        Self { m: self.m / rhs }
    }
}

impl AddAssign for Depth {
    fn add_assign(&mut self, rhs: Self) {
        *self = Self { m: self.m + rhs.m }
    }
}
