//! Aggregate raw reports into 2x2 tables.
//!
//! pvm tables --report-file ... --n-drugs ... --n-events ... --output-file ...

use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Result;
use clap::Args;
use tracing::info;

use pvm_core::reports::aggregate_tables_par;
use pvm_core::table::PairTable;

#[derive(Args)]
pub struct TablesArgs {
    /// Report matrix file (whitespace-delimited 0/1, one report per line)
    #[arg(long)]
    pub report_file: String,

    /// Output file path
    #[arg(long)]
    pub output_file: String,

    /// Number of drug columns (the first n-drugs columns of the matrix)
    #[arg(long)]
    pub n_drugs: usize,

    /// Number of event columns (the remaining columns of the matrix)
    #[arg(long)]
    pub n_events: usize,

    /// Skip a header line in the report file
    #[arg(long, default_value = "false")]
    pub skip_header: bool,
}

pub fn run(args: TablesArgs) -> Result<()> {
    let reports = crate::report_file::parse_report_matrix(
        Path::new(&args.report_file),
        args.skip_header,
    )?;
    info!(
        "Report matrix: {} reports x {} columns",
        reports.n_rows(),
        reports.n_cols()
    );

    let tables = aggregate_tables_par(&reports, args.n_drugs, args.n_events)?;

    let output_file = std::fs::File::create(&args.output_file)?;
    let mut writer = BufWriter::new(output_file);
    write_tables_header(&mut writer)?;
    for t in &tables {
        write_table_line(&mut writer, t)?;
    }

    info!(
        "{} tables written to {}",
        tables.len(),
        args.output_file
    );
    Ok(())
}

pub fn write_tables_header(writer: &mut impl Write) -> Result<()> {
    writeln!(writer, "drug_id event_id a b c d")?;
    Ok(())
}

pub fn write_table_line(writer: &mut impl Write, t: &PairTable) -> Result<()> {
    writeln!(
        writer,
        "{} {} {} {} {} {}",
        t.drug_id, t.event_id, t.table.a, t.table.b, t.table.c, t.table.d
    )?;
    Ok(())
}
