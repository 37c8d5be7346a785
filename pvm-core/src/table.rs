//! 2x2 contingency tables for drug-event pairs.

/// A 2x2 contingency table of report counts for one drug-event pair.
///
/// Cell layout:
///   - `a`: drug present, event present
///   - `b`: drug absent, event present
///   - `c`: drug present, event absent
///   - `d`: drug absent, event absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContingencyTable {
    pub a: u64,
    pub b: u64,
    pub c: u64,
    pub d: u64,
}

impl ContingencyTable {
    pub fn new(a: u64, b: u64, c: u64, d: u64) -> Self {
        ContingencyTable { a, b, c, d }
    }

    /// Number of reports mentioning the drug (a + c).
    pub fn drug_margin(&self) -> u64 {
        self.a + self.c
    }

    /// Number of reports mentioning the event (a + b).
    pub fn event_margin(&self) -> u64 {
        self.a + self.b
    }

    /// Total number of reports, checked for overflow.
    pub fn checked_total(&self) -> Option<u64> {
        self.a
            .checked_add(self.b)?
            .checked_add(self.c)?
            .checked_add(self.d)
    }

    /// Largest value the `a` cell can take given the marginals.
    pub fn max_a(&self) -> u64 {
        self.drug_margin().min(self.event_margin())
    }
}

/// Contingency table for one drug-event pair, with 1-based external IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairTable {
    pub drug_id: u32,
    pub event_id: u32,
    pub table: ContingencyTable,
}
