use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;
use serde::Serialize;

/// One row of the sample sales sheet. `None` fields are written as empty
/// cells so the sweeper has gaps to fill.
#[derive(Debug, Clone, Serialize)]
struct SaleRow {
    region: String,
    product: String,
    units: Option<i64>,
    price: Option<f64>,
    returned: bool,
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

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<SaleRow> {
    let regions = ["North", "South", "East", "West"];
    let products = ["Widget", "Gadget", "Doohickey"];

    let mut rows = Vec::new();
    for day in 0..40u64 {
        let region = regions[(day % regions.len() as u64) as usize];
        let product = products[rng.below(products.len() as u64) as usize];
        // Roughly one gap in eight per numeric column.
        let units = (rng.below(8) != 0).then(|| 5 + rng.below(50) as i64);
        let price = (rng.below(8) != 0).then(|| ((9.5 + rng.next_f64() * 20.0) * 100.0).round() / 100.0);
        rows.push(SaleRow {
            region: region.to_string(),
            product: product.to_string(),
            units,
            price,
            returned: rng.below(10) == 0,
        });
    }

    // Exact repeats for the duplicate remover.
    let repeats: Vec<SaleRow> = rows.iter().step_by(9).cloned().collect();
    rows.extend(repeats);
    rows
}

fn write_csv(path: &str, rows: &[SaleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_xlsx(path: &str, rows: &[SaleRow]) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sales")?;

    for (col, name) in ["region", "product", "units", "price", "returned"].iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }
    for (idx, row) in rows.iter().enumerate() {
        let r = idx as u32 + 1;
        sheet.write_string(r, 0, &row.region)?;
        sheet.write_string(r, 1, &row.product)?;
        if let Some(units) = row.units {
            sheet.write_number(r, 2, units as f64)?;
        }
        if let Some(price) = row.price {
            sheet.write_number(r, 3, price)?;
        }
        sheet.write_boolean(r, 4, row.returned)?;
    }

    workbook.save(path).with_context(|| format!("saving {path}"))?;
    Ok(())
}

/// A file whose real header sits under a blank header line, so every
/// column comes in unnamed.
fn write_unnamed_csv(path: &str, rows: &[SaleRow]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("creating {path}"))?;
    writer.write_record(["", "", "", "", ""])?;
    writer.write_record(["region", "product", "units", "price", "returned"])?;
    for row in rows.iter().take(10) {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    write_csv("sample_data.csv", &rows)?;
    write_xlsx("sample_data.xlsx", &rows)?;
    write_unnamed_csv("sample_unnamed.csv", &rows)?;

    println!(
        "Wrote {} rows to sample_data.csv, sample_data.xlsx and sample_unnamed.csv",
        rows.len()
    );
    Ok(())
}
