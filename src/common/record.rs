use crate::common::{Depth, Gas, Time};

/// A single recorded dive segment: constant depth and gas over a duration.
#[derive(Debug)]
pub struct RecordData<'a> {
    pub depth: Depth,
    pub time: Time,
    pub gas: &'a Gas,
}
