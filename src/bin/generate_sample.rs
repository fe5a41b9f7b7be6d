use chrono::{Days, NaiveDate};

/// Minimal deterministic PRNG (splitmix64)
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn chance(&mut self, one_in: u64) -> bool {
        self.next_u64() % one_in == 0
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + (hi - lo) * unit
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let names = [
        "Alice", "Bob", "Carla", "Dmitri", "Elena", "Farid", "Grace", "Hugo",
    ];
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid start date");

    // Rows with occasional gaps: roughly 1 in 10 names and 1 in 8 amounts
    // are missing, so the cleaning pass has work to do.
    let mut rows: Vec<[String; 4]> = Vec::new();
    for id in 1..=40u32 {
        let name = if rng.chance(10) {
            String::new()
        } else {
            rng.pick(&names).to_string()
        };
        let amount = if rng.chance(8) {
            String::new()
        } else {
            format!("{:.2}", rng.range(5.0, 250.0))
        };
        let date = start + Days::new(rng.next_u64() % 60);
        rows.push([
            id.to_string(),
            name,
            amount,
            date.format("%Y-%m-%d").to_string(),
        ]);
    }

    // Exact duplicates for the dedup stage to drop.
    for idx in [4usize, 11, 23] {
        let dup = rows[idx].clone();
        rows.push(dup);
    }

    let output_path = "sample_orders.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer
        .write_record(["id", "name", "amount", "signup_date"])
        .expect("Failed to write header");
    for row in &rows {
        writer.write_record(row).expect("Failed to write record");
    }
    writer.flush().expect("Failed to flush CSV");

    println!("Wrote {} rows to {output_path}", rows.len());
}
