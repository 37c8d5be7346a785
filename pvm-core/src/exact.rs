//! Exact tests for drug-event 2x2 tables.
//!
//! Computes the one-sided ("greater") exact significance probability of a
//! table under the hypergeometric null of no drug-event association, by
//! summing the mass of every table at least as extreme in probability as
//! the observed one, over the support from the observed count upward.
//! The mid-p variant subtracts half the observed table's own mass.
//!
//! Reference: Agresti, "Exact inference for categorical data" (1992);
//! Lancaster (1961) for the mid-p correction.

use statrs::function::factorial::ln_factorial;

use crate::error::PvmError;
use crate::table::ContingencyTable;

/// Hypergeometric probability mass function, parameterized as R's `dhyper`:
/// P(X = k) when drawing `draws` items without replacement from a population
/// of `successes + failures` items containing `successes` successes.
///
/// Kept behind a trait so tests can substitute a naive reference
/// implementation for the log-factorial one used in production.
pub trait HypergeometricPmf {
    fn pmf(&self, k: u64, successes: u64, failures: u64, draws: u64) -> Result<f64, PvmError>;
}

/// Default PMF computed from log binomial coefficients:
/// P(X = k) = C(m, k) * C(n, draws - k) / C(m + n, draws).
#[derive(Debug, Clone, Copy, Default)]
pub struct LnFactorialPmf;

impl HypergeometricPmf for LnFactorialPmf {
    fn pmf(&self, k: u64, successes: u64, failures: u64, draws: u64) -> Result<f64, PvmError> {
        let population = successes.checked_add(failures).ok_or_else(|| {
            PvmError::NumericDomain {
                population: successes.saturating_add(failures),
                successes,
                draws,
            }
        })?;
        if population == 0 || draws > population {
            return Err(PvmError::NumericDomain {
                population,
                successes,
                draws,
            });
        }
        if k > draws {
            return Ok(0.0);
        }
        // Out-of-support k (k > successes, or too few failures to fill the
        // remaining draws) gives ln_choose = -inf, hence mass 0.
        let log_p = ln_choose(successes, k) + ln_choose(failures, draws - k)
            - ln_choose(population, draws);
        Ok(log_p.exp())
    }
}

/// Log of binomial coefficient: ln(C(n, k)).
fn ln_choose(n: u64, k: u64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    ln_factorial(n) - ln_factorial(k) - ln_factorial(n - k)
}

/// One-sided exact p-value for a 2x2 table, using the default PMF.
///
/// Sums P(X = i) for i from the observed `a` up to min(a+c, a+b),
/// including i only when its mass does not exceed the observed mass.
/// Fails with `NumericDomain` when the table is empty (n = 0).
pub fn exact_tail_probability(a: u64, b: u64, c: u64, d: u64) -> Result<f64, PvmError> {
    exact_tail_probability_with(&LnFactorialPmf, a, b, c, d)
}

/// One-sided exact p-value with a caller-supplied PMF.
pub fn exact_tail_probability_with<P: HypergeometricPmf>(
    pmf: &P,
    a: u64,
    b: u64,
    c: u64,
    d: u64,
) -> Result<f64, PvmError> {
    let table = ContingencyTable::new(a, b, c, d);
    let n = table.checked_total().ok_or_else(|| PvmError::InvalidTable {
        reason: "cell counts overflow the report total".to_string(),
    })?;
    let drug_margin = table.drug_margin();
    let event_margin = table.event_margin();

    let p_obs = pmf.pmf(a, drug_margin, n - drug_margin, event_margin)?;

    // Walk the support from the observed count upward. The comparison is a
    // probability-mass tail test, with no tolerance: only tables no more
    // likely than the observed one contribute.
    let max_a = table.max_a();
    let mut p_value = 0.0;
    for i in a..=max_a {
        let p_table = pmf.pmf(i, drug_margin, n - drug_margin, event_margin)?;
        if p_table <= p_obs {
            p_value += p_table;
        }
    }

    Ok(p_value)
}

/// Mid-p corrected one-sided exact p-value, using the default PMF.
///
/// Subtracts half the observed table's own mass from the exact tail sum;
/// that mass is always part of the sum since i = a always qualifies.
/// May be fractionally negative in pathological rounding cases; no
/// clamping is applied.
pub fn mid_p_tail_probability(a: u64, b: u64, c: u64, d: u64) -> Result<f64, PvmError> {
    mid_p_tail_probability_with(&LnFactorialPmf, a, b, c, d)
}

/// Mid-p corrected one-sided exact p-value with a caller-supplied PMF.
pub fn mid_p_tail_probability_with<P: HypergeometricPmf>(
    pmf: &P,
    a: u64,
    b: u64,
    c: u64,
    d: u64,
) -> Result<f64, PvmError> {
    let table = ContingencyTable::new(a, b, c, d);
    let n = table.checked_total().ok_or_else(|| PvmError::InvalidTable {
        reason: "cell counts overflow the report total".to_string(),
    })?;
    let drug_margin = table.drug_margin();
    let event_margin = table.event_margin();

    // The observed mass is recomputed here rather than threaded through
    // from the exact sum; the two computations are independent units.
    let p_obs = pmf.pmf(a, drug_margin, n - drug_margin, event_margin)?;

    Ok(exact_tail_probability_with(pmf, a, b, c, d)? - p_obs / 2.0)
}
