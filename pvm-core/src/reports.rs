//! Aggregation of raw spontaneous reports into 2x2 tables.
//!
//! A spontaneous reporting data set is a binary matrix where each row is
//! one report: the first `n_drugs` columns flag drug presence, the
//! remaining `n_events` columns flag event presence. Aggregation produces
//! one contingency table per drug-event pair, enumerated drug-major with
//! 1-based IDs.

use rayon::prelude::*;
use tracing::debug;

use crate::error::PvmError;
use crate::table::{ContingencyTable, PairTable};

/// Binary report matrix in row-major storage.
#[derive(Debug, Clone)]
pub struct ReportMatrix {
    data: Vec<u8>,
    n_rows: usize,
    n_cols: usize,
}

impl ReportMatrix {
    /// Build a matrix from per-report rows. All rows must have the same
    /// length; the first row fixes the column count.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, PvmError> {
        let n_cols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(rows.len() * n_cols);
        for row in rows {
            if row.len() != n_cols {
                return Err(PvmError::ShapeMismatch {
                    expected: n_cols,
                    got: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(ReportMatrix {
            data,
            n_rows: rows.len(),
            n_cols,
        })
    }

    /// Build a matrix from a flat row-major buffer.
    pub fn from_flat(n_rows: usize, n_cols: usize, data: Vec<u8>) -> Result<Self, PvmError> {
        if data.len() != n_rows * n_cols {
            return Err(PvmError::ShapeMismatch {
                expected: n_rows * n_cols,
                got: data.len(),
            });
        }
        Ok(ReportMatrix {
            data,
            n_rows,
            n_cols,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.n_cols + col]
    }

    fn rows(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.n_cols.max(1))
    }
}

/// Aggregate a report matrix into one contingency table per drug-event
/// pair, in drug-major order (`drug_id = i+1`, `event_id = j+1`).
///
/// Presence is defined strictly as "cell == 1"; any other value counts as
/// absent. Fails with `ShapeMismatch` before any counting if the matrix
/// does not have exactly `n_drugs + n_events` columns.
pub fn aggregate_tables(
    reports: &ReportMatrix,
    n_drugs: usize,
    n_events: usize,
) -> Result<Vec<PairTable>, PvmError> {
    check_shape(reports, n_drugs, n_events)?;

    let mut counts = vec![[0u64; 4]; n_drugs * n_events];
    for row in reports.rows() {
        count_row(row, n_drugs, n_events, &mut counts);
    }

    Ok(assemble(counts, n_drugs, n_events))
}

/// Parallel aggregation: shards report rows across the rayon pool and
/// merges per-shard counts by addition. Integer summation is associative,
/// so the result is bit-identical to `aggregate_tables` and comes back in
/// the same drug-major pair order.
pub fn aggregate_tables_par(
    reports: &ReportMatrix,
    n_drugs: usize,
    n_events: usize,
) -> Result<Vec<PairTable>, PvmError> {
    check_shape(reports, n_drugs, n_events)?;

    let n_pairs = n_drugs * n_events;
    debug!(
        "Aggregating {} reports into {} drug-event tables",
        reports.n_rows(),
        n_pairs
    );

    let counts = reports
        .data
        .par_chunks(reports.n_cols.max(1))
        .fold(
            || vec![[0u64; 4]; n_pairs],
            |mut acc, row| {
                count_row(row, n_drugs, n_events, &mut acc);
                acc
            },
        )
        .reduce(
            || vec![[0u64; 4]; n_pairs],
            |mut left, right| {
                for (l, r) in left.iter_mut().zip(right.iter()) {
                    for (lc, rc) in l.iter_mut().zip(r.iter()) {
                        *lc += rc;
                    }
                }
                left
            },
        );

    Ok(assemble(counts, n_drugs, n_events))
}

fn check_shape(reports: &ReportMatrix, n_drugs: usize, n_events: usize) -> Result<(), PvmError> {
    let expected = n_drugs + n_events;
    if reports.n_cols() != expected {
        return Err(PvmError::ShapeMismatch {
            expected,
            got: reports.n_cols(),
        });
    }
    Ok(())
}

/// Classify one report against every drug-event pair, incrementing exactly
/// one cell per pair. Counts are indexed [a, b, c, d] at pair index
/// k = i * n_events + j.
fn count_row(row: &[u8], n_drugs: usize, n_events: usize, counts: &mut [[u64; 4]]) {
    for i in 0..n_drugs {
        let drug = row[i] == 1;
        for j in 0..n_events {
            let event = row[n_drugs + j] == 1;
            let cell = match (drug, event) {
                (true, true) => 0,
                (false, true) => 1,
                (true, false) => 2,
                (false, false) => 3,
            };
            counts[i * n_events + j][cell] += 1;
        }
    }
}

fn assemble(counts: Vec<[u64; 4]>, n_drugs: usize, n_events: usize) -> Vec<PairTable> {
    let mut tables = Vec::with_capacity(counts.len());
    for i in 0..n_drugs {
        for j in 0..n_events {
            let [a, b, c, d] = counts[i * n_events + j];
            tables.push(PairTable {
                drug_id: (i + 1) as u32,
                event_id: (j + 1) as u32,
                table: ContingencyTable::new(a, b, c, d),
            });
        }
    }
    tables
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pair_all_combinations() {
        // One drug, one event, one report per cell of the table.
        let m = ReportMatrix::from_rows(&[vec![1, 1], vec![1, 0], vec![0, 1], vec![0, 0]]).unwrap();
        let tables = aggregate_tables(&m, 1, 1).unwrap();
        assert_eq!(tables.len(), 1);
        let t = &tables[0];
        assert_eq!((t.drug_id, t.event_id), (1, 1));
        assert_eq!(t.table, ContingencyTable::new(1, 1, 1, 1));
    }

    #[test]
    fn test_pair_order_is_drug_major() {
        let m = ReportMatrix::from_rows(&[vec![1, 0, 1, 0, 0]]).unwrap();
        let tables = aggregate_tables(&m, 2, 3).unwrap();
        assert_eq!(tables.len(), 6);
        let ids: Vec<(u32, u32)> = tables.iter().map(|t| (t.drug_id, t.event_id)).collect();
        assert_eq!(
            ids,
            vec![(1, 1), (1, 2), (1, 3), (2, 1), (2, 2), (2, 3)]
        );
    }

    #[test]
    fn test_row_totals_equal_report_count() {
        let m = ReportMatrix::from_rows(&[
            vec![1, 0, 1, 1],
            vec![0, 1, 0, 1],
            vec![1, 1, 1, 0],
        ])
        .unwrap();
        let tables = aggregate_tables(&m, 2, 2).unwrap();
        for t in &tables {
            assert_eq!(t.table.checked_total(), Some(3));
        }
    }

    #[test]
    fn test_counts() {
        // Drug 1 and event 2 co-occur in two of three reports.
        let m = ReportMatrix::from_rows(&[
            vec![1, 0, 0, 1],
            vec![1, 0, 0, 1],
            vec![0, 1, 1, 0],
        ])
        .unwrap();
        let tables = aggregate_tables(&m, 2, 2).unwrap();
        // Pair (1, 2) is index 1 in drug-major order.
        assert_eq!(tables[1].table, ContingencyTable::new(2, 0, 0, 1));
        // Pair (2, 1) is index 2.
        assert_eq!(tables[2].table, ContingencyTable::new(1, 0, 0, 2));
    }

    #[test]
    fn test_presence_is_strict_equality_with_one() {
        // A cell value of 2 is not "present".
        let m = ReportMatrix::from_rows(&[vec![2, 1]]).unwrap();
        let tables = aggregate_tables(&m, 1, 1).unwrap();
        assert_eq!(tables[0].table, ContingencyTable::new(0, 1, 0, 0));
    }

    #[test]
    fn test_shape_mismatch_fails() {
        let m = ReportMatrix::from_rows(&[vec![1, 0, 1]]).unwrap();
        let err = aggregate_tables(&m, 2, 2).unwrap_err();
        assert!(matches!(
            err,
            PvmError::ShapeMismatch {
                expected: 4,
                got: 3
            }
        ));
    }

    #[test]
    fn test_empty_matrix() {
        let m = ReportMatrix::from_flat(0, 3, Vec::new()).unwrap();
        let tables = aggregate_tables(&m, 1, 2).unwrap();
        assert_eq!(tables.len(), 2);
        for t in &tables {
            assert_eq!(t.table.checked_total(), Some(0));
        }
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = ReportMatrix::from_rows(&[vec![1, 0], vec![1]]).unwrap_err();
        assert!(matches!(err, PvmError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let rows: Vec<Vec<u8>> = (0..50)
            .map(|r| (0..5).map(|c| ((r * 7 + c * 3) % 4 == 0) as u8).collect())
            .collect();
        let m = ReportMatrix::from_rows(&rows).unwrap();
        let seq = aggregate_tables(&m, 2, 3).unwrap();
        let par = aggregate_tables_par(&m, 2, 3).unwrap();
        assert_eq!(seq, par);
    }
}
