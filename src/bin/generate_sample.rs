use anyhow::{Context, Result};
use serde::Serialize;

/// One year of the historical dataset the prediction service expects.
#[derive(Debug, Serialize)]
struct WasteRecord {
    year: i64,
    waste: f64,
    population_growth: f64,
    economic_activity: f64,
    urbanization_rate: f64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Waste (thousand tonnes) driven by population, economy and urbanisation.
fn generate_records(first_year: i64, years: usize, rng: &mut SimpleRng) -> Vec<WasteRecord> {
    let mut population_index: f64 = 100.0;
    let mut economy_index: f64 = 100.0;
    let mut urbanization: f64 = 54.0;

    (0..years)
        .map(|i| {
            let population_growth = rng.gauss(1.1, 0.25);
            let economic_activity = rng.gauss(2.4, 1.2);
            let urbanization_rate = rng.gauss(0.45, 0.1).max(0.0);

            population_index *= 1.0 + population_growth / 100.0;
            economy_index *= 1.0 + economic_activity / 100.0;
            urbanization = (urbanization + urbanization_rate).min(95.0);

            let waste = 0.9 * population_index + 0.35 * economy_index + 1.8 * urbanization
                + rng.gauss(0.0, 3.0);

            WasteRecord {
                year: first_year + i as i64,
                waste: (waste * 100.0).round() / 100.0,
                population_growth: (population_growth * 1000.0).round() / 1000.0,
                economic_activity: (economic_activity * 1000.0).round() / 1000.0,
                urbanization_rate: (urbanization_rate * 1000.0).round() / 1000.0,
            }
        })
        .collect()
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let records = generate_records(1995, 30, &mut rng);

    let output_path = "sample_waste.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;
    for record in &records {
        writer.serialize(record).context("writing record")?;
    }
    writer.flush().context("flushing output file")?;

    println!("Wrote {} years of waste data to {output_path}", records.len());
    Ok(())
}
