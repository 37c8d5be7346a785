//! pvm-core: Statistical core for pharmacovigilance signal statistics.
//!
//! Implements the exact (and mid-p corrected) one-sided significance test
//! for drug-event 2x2 contingency tables under the hypergeometric null,
//! the aggregation of raw spontaneous reports into per-pair tables, and
//! the classic disproportionality measures (ROR, PRR) over those tables.

pub mod disproportionality;
pub mod error;
pub mod exact;
pub mod reports;
pub mod table;

pub use error::PvmError;
pub use exact::{exact_tail_probability, mid_p_tail_probability, HypergeometricPmf, LnFactorialPmf};
pub use reports::{aggregate_tables, aggregate_tables_par, ReportMatrix};
pub use table::{ContingencyTable, PairTable};
