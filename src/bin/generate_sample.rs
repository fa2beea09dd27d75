//! Writes a deterministic sample bank statement CSV for trying the CLI.
//!
//! Usage: `generate_sample [OUTPUT] [MONTHS]` (defaults: sample_statement.csv, 6)

use anyhow::{Context, Result};

/// Minimal deterministic PRNG (64-bit LCG, high bits out)
struct SampleRng(u64);

impl SampleRng {
    fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    fn between(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }
}

/// (description, category, low, high) – negative amounts are spending
const RECURRING: &[(&str, &str, f64, f64)] = &[
    ("Salary", "Income", 3200.0, 3200.0),
    ("Rent", "Housing", -1150.0, -1150.0),
    ("Electricity", "Utilities", -90.0, -45.0),
    ("Mobile plan", "Utilities", -25.0, -25.0),
    ("Index fund SIP", "Investments", -300.0, -300.0),
];

const VARIABLE: &[(&str, &str, f64, f64)] = &[
    ("Supermarket", "Groceries", -140.0, -35.0),
    ("Coffee shop", "Dining", -9.0, -3.5),
    ("Restaurant", "Dining", -85.0, -25.0),
    ("Fuel", "Transport", -70.0, -40.0),
    ("Online store", "Shopping", -120.0, -15.0),
];

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "sample_statement.csv".to_string());
    let months: u32 = match args.next() {
        Some(raw) => raw.parse().with_context(|| format!("invalid month count '{raw}'"))?,
        None => 6,
    };

    let mut rng = SampleRng(42);
    let mut writer = csv::Writer::from_path(&output).with_context(|| format!("creating {output}"))?;
    writer.write_record(["date", "description", "category", "amount", "balance"])?;

    let mut balance = 1500.0_f64;
    let mut rows = 0usize;
    for month in 1..=months.min(12) {
        let mut entries: Vec<(u32, &str, &str, f64)> = RECURRING
            .iter()
            .enumerate()
            .map(|(i, &(desc, cat, lo, hi))| (1 + i as u32, desc, cat, rng.between(lo, hi)))
            .collect();
        for _ in 0..12 {
            let pick = (rng.next_f64() * VARIABLE.len() as f64) as usize % VARIABLE.len();
            let (desc, cat, lo, hi) = VARIABLE[pick];
            let day = 1 + (rng.next_f64() * 28.0) as u32;
            entries.push((day, desc, cat, rng.between(lo, hi)));
        }
        entries.sort_by_key(|e| e.0);

        for (day, desc, cat, amount) in entries {
            let amount = (amount * 100.0).round() / 100.0;
            balance += amount;
            writer.write_record([
                format!("2024-{month:02}-{day:02}"),
                desc.to_string(),
                cat.to_string(),
                format!("{amount:.2}"),
                format!("{balance:.2}"),
            ])?;
            rows += 1;
        }
    }
    writer.flush()?;

    println!("Wrote {rows} transactions to {output}");
    Ok(())
}
