//! Writes a deterministic sample listings CSV (`analisis.csv` by default)
//! so the dashboard can be tried without the real export.

use serde::Serialize;

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One CSV row, with the dataset's Spanish column names.
#[derive(Serialize)]
struct Row {
    vendedor: &'static str,
    precio: i64,
    habitaciones: u32,
    metros: f64,
    planta: String,
    garaje: bool,
    ascensor: bool,
    ubicacion: Option<&'static str>,
    numero_planta: Option<i32>,
    precio_garaje: Option<i64>,
    precio_total: i64,
}

// (name, base €/m²)
const NEIGHBORHOODS: [(&str, f64); 12] = [
    ("Salamanca", 7200.0),
    ("Chamberí", 6400.0),
    ("Centro", 5900.0),
    ("Chamartín", 6100.0),
    ("Retiro", 5600.0),
    ("Moncloa", 4800.0),
    ("Arganzuela", 4300.0),
    ("Tetuán", 3900.0),
    ("Latina", 3100.0),
    ("Carabanchel", 2800.0),
    ("Usera", 2600.0),
    ("Vallecas", 2500.0),
];

fn floor_label(n: i32) -> String {
    match n {
        0 => "Bajo".to_string(),
        1 => "Entresuelo".to_string(),
        8.. => "Ático".to_string(),
        _ => format!("{n}ª planta"),
    }
}

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "analisis.csv".to_string());
    let mut rng = SimpleRng::new(42);

    let mut writer = csv::Writer::from_path(&path).expect("creating output CSV");

    let n_rows = 800;
    for _ in 0..n_rows {
        let (hood, base_m2) = NEIGHBORHOODS[rng.below(NEIGHBORHOODS.len())];

        let rooms = 1 + rng.below(5) as u32;
        let metros = (rng.gauss(30.0 + rooms as f64 * 24.0, 12.0)).max(20.0).round();
        let price_m2 = rng.gauss(base_m2, base_m2 * 0.15).max(900.0);
        let precio = (metros * price_m2 / 1000.0).round() as i64 * 1000;

        let numero_planta = rng.below(10) as i32;
        let ascensor = numero_planta > 1 || rng.next_f64() < 0.4;
        let garaje = rng.next_f64() < 0.25;
        let precio_garaje = garaje.then(|| 12_000 + (rng.next_f64() * 18_000.0) as i64);

        // A few rows miss their neighborhood or floor number, like the
        // real export.
        let ubicacion = (rng.next_f64() >= 0.04).then_some(hood);
        let numero_planta_cell = (rng.next_f64() >= 0.03).then_some(numero_planta);

        let row = Row {
            vendedor: if rng.next_f64() < 0.35 {
                "Particular"
            } else {
                "Agencia"
            },
            precio,
            habitaciones: rooms,
            metros,
            planta: floor_label(numero_planta),
            garaje,
            ascensor,
            ubicacion,
            numero_planta: numero_planta_cell,
            precio_garaje,
            precio_total: precio + precio_garaje.unwrap_or(0),
        };
        writer.serialize(row).expect("writing CSV row");
    }

    writer.flush().expect("flushing CSV");
    println!("Wrote {n_rows} listings to {path}");
}
