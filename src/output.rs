// src/output.rs
use crate::mc::statistics::SimulationResult;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write the per-day bands as `day,mean,p5,p95`.
pub fn write_bands_to_csv<W: Write>(out: &mut W, result: &SimulationResult) -> io::Result<()> {
    writeln!(out, "day,mean,p5,p95")?;
    let rows = result
        .mean_path
        .iter()
        .zip(&result.percentile_5_path)
        .zip(&result.percentile_95_path);
    for (day, ((mean, p5), p95)) in rows.enumerate() {
        writeln!(out, "{},{},{},{}", day, mean, p5, p95)?;
    }
    Ok(())
}

/// Write terminal prices and their simple returns in percent.
pub fn write_terminal_to_csv<W: Write>(
    out: &mut W,
    terminal_prices: &[f64],
    initial_price: f64,
) -> io::Result<()> {
    writeln!(out, "path_id,terminal_price,return_pct")?;
    for (i, price) in terminal_prices.iter().enumerate() {
        let return_pct = (price - initial_price) / initial_price * 100.0;
        writeln!(out, "{},{},{}", i, price, return_pct)?;
    }
    Ok(())
}

pub fn write_bands_file<P: AsRef<Path>>(path: P, result: &SimulationResult) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_bands_to_csv(&mut file, result)?;
    file.flush()
}

pub fn write_terminal_file<P: AsRef<Path>>(
    path: P,
    terminal_prices: &[f64],
    initial_price: f64,
) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_terminal_to_csv(&mut file, terminal_prices, initial_price)?;
    file.flush()
}
