use serde::Serialize;
use std::ops::AddAssign;

/// Phasing consistency counts for the called variants
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct PhasingResult {
    /// Phased calls whose phase relative to the previous call disagrees with the baseline
    pub misphasings: u64,
    /// Phased calls whose phase relative to the previous call agrees with the baseline
    pub correct_phasings: u64,
    /// Phased calls in regions where the baseline phase could not be determined
    pub unphaseable: u64
}

impl AddAssign for PhasingResult {
    // Enables += with counts
    fn add_assign(&mut self, rhs: Self) {
        self.misphasings += rhs.misphasings;
        self.correct_phasings += rhs.correct_phasings;
        self.unphaseable += rhs.unphaseable;
    }
}

impl PhasingResult {
    /// Constructor
    pub fn new(misphasings: u64, correct_phasings: u64, unphaseable: u64) -> Self {
        Self {
            misphasings, correct_phasings, unphaseable
        }
    }
}
