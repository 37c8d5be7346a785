//! Disproportionality measures over drug-event 2x2 tables.
//!
//! Companion point estimates to the exact test: the reporting odds ratio
//! (ROR) and the proportional reporting ratio (PRR), each with a 95%
//! log-normal confidence interval. Zero cells get the Haldane-Anscombe
//! 0.5 continuity correction before the ratio is formed.

use crate::table::ContingencyTable;

/// Normal quantile for a 95% two-sided interval.
const Z_95: f64 = 1.96;

/// A disproportionality point estimate with its 95% confidence interval.
#[derive(Debug, Clone, Copy)]
pub struct DisproportionalityEstimate {
    pub point: f64,
    pub ci_low: f64,
    pub ci_high: f64,
}

/// Reporting odds ratio: (a/c) / (b/d) = ad / bc, with
/// var(log ROR) = 1/a + 1/b + 1/c + 1/d.
pub fn reporting_odds_ratio(table: &ContingencyTable) -> DisproportionalityEstimate {
    let (a, b, c, d) = corrected_cells(table);
    let ror = (a * d) / (b * c);
    let se = (1.0 / a + 1.0 / b + 1.0 / c + 1.0 / d).sqrt();
    interval(ror, se)
}

/// Proportional reporting ratio: [a / (a+c)] / [b / (b+d)], with
/// var(log PRR) = 1/a - 1/(a+c) + 1/b - 1/(b+d).
pub fn proportional_reporting_ratio(table: &ContingencyTable) -> DisproportionalityEstimate {
    let (a, b, c, d) = corrected_cells(table);
    let prr = (a / (a + c)) / (b / (b + d));
    let se = (1.0 / a - 1.0 / (a + c) + 1.0 / b - 1.0 / (b + d)).sqrt();
    interval(prr, se)
}

fn interval(point: f64, se: f64) -> DisproportionalityEstimate {
    let log_point = point.ln();
    DisproportionalityEstimate {
        point,
        ci_low: (log_point - Z_95 * se).exp(),
        ci_high: (log_point + Z_95 * se).exp(),
    }
}

/// Apply the 0.5 continuity correction to every cell when any cell is zero.
fn corrected_cells(table: &ContingencyTable) -> (f64, f64, f64, f64) {
    let (a, b, c, d) = (
        table.a as f64,
        table.b as f64,
        table.c as f64,
        table.d as f64,
    );
    if a == 0.0 || b == 0.0 || c == 0.0 || d == 0.0 {
        (a + 0.5, b + 0.5, c + 0.5, d + 0.5)
    } else {
        (a, b, c, d)
    }
}
