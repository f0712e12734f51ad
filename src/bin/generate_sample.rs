use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use wastewater_dashboard::config::DEFAULT_DATA_PATH;
use wastewater_dashboard::data::model::{Metric, Record};

/// Write a synthetic wastewater dataset with the dashboard's columns.
#[derive(Parser)]
#[command(name = "generate_sample", about)]
struct Args {
    /// Output CSV path
    #[arg(default_value = DEFAULT_DATA_PATH)]
    output: PathBuf,

    /// PRNG seed; the same seed always yields the same file
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// (entity, first year, last year, population scale)
const COUNTRIES: [(&str, i32, i32, f64); 6] = [
    ("Brazil", 2000, 2020, 9.0),
    ("Kenya", 2004, 2019, 2.5),
    ("Netherlands", 2000, 2020, 1.2),
    ("Peru", 2008, 2018, 1.8),
    ("Viet Nam", 2002, 2020, 4.0),
    ("Malta", 2015, 2015, 0.2),
];

/// Uniform multiplier in `[1 - spread, 1 + spread]`.
fn jitter(rng: &mut StdRng, spread: f64) -> f64 {
    rng.gen_range(1.0 - spread..=1.0 + spread)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn country_year(rng: &mut StdRng, entity: &str, year: i32, first: i32, scale: f64) -> Record {
    // Slow improvement in treatment over time.
    let trend = 1.0 - 0.015 * (year - first) as f64;

    let agricultural = 120.0 * scale * trend * jitter(rng, 0.15);
    let industrial = 80.0 * scale * trend * jitter(rng, 0.2);
    let urban = 150.0 * scale * trend * jitter(rng, 0.1);
    let total = (agricultural + industrial + urban) * jitter(rng, 0.05);
    let deaths = (urban * 0.9 + industrial * 0.3) * jitter(rng, 0.1);

    Record::new(entity, year)
        .with(Metric::PrematureDeathCount, deaths.round())
        .with(Metric::AgriculturalDischarge, round2(agricultural))
        .with(Metric::IndustrialUntreated, round2(industrial))
        .with(Metric::UrbanUntreated, round2(urban))
        .with(Metric::TotalInlandDischarge, round2(total))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut records = Vec::new();

    for (entity, first, last, scale) in COUNTRIES {
        for year in first..=last {
            let mut record = country_year(&mut rng, entity, year, first, scale);

            // Sparse reporting: roughly one cell in twelve left blank.
            if rng.gen_bool(0.08) {
                record.industrial_untreated = None;
            }
            if rng.gen_bool(0.08) {
                record.premature_death_count = None;
            }
            records.push(record);

            // Occasional second reporting source for the same country-year.
            if rng.gen_bool(0.1) {
                let extra = Record::new(entity, year)
                    .with(Metric::AgriculturalDischarge, round2(10.0 * scale * jitter(&mut rng, 0.5)))
                    .with(Metric::TotalInlandDischarge, round2(12.0 * scale * jitter(&mut rng, 0.5)));
                records.push(extra);
            }
        }
    }

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    for record in &records {
        writer.serialize(record).context("writing record")?;
    }
    writer.flush().context("flushing CSV")?;

    println!(
        "Wrote {} records for {} countries to {}",
        records.len(),
        COUNTRIES.len(),
        args.output.display()
    );
    Ok(())
}
