use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Listing, ListingSet, Seller};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Structural problems with the input file. IO and parse noise is carried
/// by `anyhow` context around these.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: {message}")]
    BadRow { row: usize, message: String },
    #[error("file contains no listings")]
    Empty,
}

fn bad_row(row: usize, message: impl Into<String>) -> LoadError {
    LoadError::BadRow {
        row,
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a listing dataset from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row with the dataset's Spanish column names
/// * `.json` – records-oriented array of objects with the same keys
pub fn load_file(path: &Path) -> Result<ListingSet> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Required columns: `vendedor, precio, habitaciones, metros, planta,
/// garaje, ascensor, ubicacion, numero_planta`.
/// `precio_garaje` and `precio_total` are honoured when present; otherwise
/// the total price is derived as price + garage price.
fn load_csv(path: &Path) -> Result<ListingSet> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let col = |name: &'static str| -> Result<usize, LoadError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoadError::MissingColumn(name))
    };
    let opt_col = |name: &str| headers.iter().position(|h| h == name);

    let vendedor = col("vendedor")?;
    let precio = col("precio")?;
    let habitaciones = col("habitaciones")?;
    let metros = col("metros")?;
    let planta = col("planta")?;
    let garaje = col("garaje")?;
    let ascensor = col("ascensor")?;
    let ubicacion = col("ubicacion")?;
    let numero_planta = col("numero_planta")?;
    let precio_garaje = opt_col("precio_garaje");
    let precio_total = opt_col("precio_total");

    let mut listings = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();
        let opt_cell = |idx: Option<usize>| idx.map(&cell).unwrap_or("");

        let seller = Seller::parse(cell(vendedor))
            .ok_or_else(|| bad_row(row_no, format!("unknown seller '{}'", cell(vendedor))))?;
        let price = parse_f64(cell(precio), row_no, "precio")?;
        let garage_price = parse_opt_f64(opt_cell(precio_garaje), row_no, "precio_garaje")?;

        listings.push(build_listing(
            seller,
            price,
            parse_u32(cell(habitaciones), row_no, "habitaciones")?,
            parse_f64(cell(metros), row_no, "metros")?,
            cell(planta).to_string(),
            parse_bool(cell(garaje), row_no, "garaje")?,
            parse_bool(cell(ascensor), row_no, "ascensor")?,
            non_empty(cell(ubicacion)),
            parse_opt_i32(cell(numero_planta), row_no, "numero_planta")?,
            garage_price,
            parse_opt_f64(opt_cell(precio_total), row_no, "precio_total")?,
        ));
    }

    if listings.is_empty() {
        return Err(LoadError::Empty.into());
    }
    Ok(ListingSet::from_listings(listings))
}

// -- CSV cell coercion helpers --

fn parse_f64(s: &str, row: usize, column: &str) -> Result<f64> {
    s.parse::<f64>()
        .map_err(|_| bad_row(row, format!("{column}: '{s}' is not a number")).into())
}

fn parse_u32(s: &str, row: usize, column: &str) -> Result<u32> {
    // Pandas often writes integers as "3.0"; accept the float form.
    if let Ok(i) = s.parse::<u32>() {
        return Ok(i);
    }
    match s.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 => Ok(f as u32),
        _ => Err(bad_row(row, format!("{column}: '{s}' is not a non-negative integer")).into()),
    }
}

fn parse_opt_f64(s: &str, row: usize, column: &str) -> Result<Option<f64>> {
    if s.is_empty() {
        return Ok(None);
    }
    parse_f64(s, row, column).map(Some)
}

fn parse_opt_i32(s: &str, row: usize, column: &str) -> Result<Option<i32>> {
    if s.is_empty() {
        return Ok(None);
    }
    if let Ok(i) = s.parse::<i32>() {
        return Ok(Some(i));
    }
    match s.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 => Ok(Some(f as i32)),
        _ => Err(bad_row(row, format!("{column}: '{s}' is not an integer")).into()),
    }
}

fn parse_bool(s: &str, row: usize, column: &str) -> Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "sí" | "si" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(bad_row(row, format!("{column}: '{s}' is not a boolean")).into()),
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "vendedor": "Agencia",
///     "precio": 320000,
///     "habitaciones": 3,
///     "metros": 95.0,
///     "planta": "3ª planta",
///     "garaje": false,
///     "ascensor": true,
///     "ubicacion": "Salamanca",
///     "numero_planta": 3,
///     "precio_garaje": null,
///     "precio_total": 320000
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<ListingSet> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("expected top-level JSON array")?;

    let mut listings = Vec::with_capacity(records.len());

    for (row_no, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| bad_row(row_no, "not a JSON object"))?;

        let seller_str = obj
            .get("vendedor")
            .and_then(|v| v.as_str())
            .ok_or_else(|| bad_row(row_no, "missing 'vendedor'"))?;
        let seller = Seller::parse(seller_str)
            .ok_or_else(|| bad_row(row_no, format!("unknown seller '{seller_str}'")))?;

        listings.push(build_listing(
            seller,
            json_f64(obj.get("precio"), row_no, "precio")?,
            json_f64(obj.get("habitaciones"), row_no, "habitaciones")? as u32,
            json_f64(obj.get("metros"), row_no, "metros")?,
            obj.get("planta")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            json_bool(obj.get("garaje"), row_no, "garaje")?,
            json_bool(obj.get("ascensor"), row_no, "ascensor")?,
            obj.get("ubicacion")
                .and_then(|v| v.as_str())
                .and_then(|s| non_empty(s.trim())),
            obj.get("numero_planta")
                .and_then(|v| v.as_i64())
                .map(|i| i as i32),
            obj.get("precio_garaje").and_then(|v| v.as_f64()),
            obj.get("precio_total").and_then(|v| v.as_f64()),
        ));
    }

    if listings.is_empty() {
        return Err(LoadError::Empty.into());
    }
    Ok(ListingSet::from_listings(listings))
}

fn json_f64(val: Option<&JsonValue>, row: usize, column: &str) -> Result<f64> {
    val.and_then(|v| v.as_f64())
        .ok_or_else(|| bad_row(row, format!("missing or non-numeric '{column}'")).into())
}

fn json_bool(val: Option<&JsonValue>, row: usize, column: &str) -> Result<bool> {
    match val {
        Some(JsonValue::Bool(b)) => Ok(*b),
        // 0/1 encodings survive some exporters.
        Some(JsonValue::Number(n)) => Ok(n.as_f64().unwrap_or(0.0) != 0.0),
        Some(JsonValue::Null) | None => Ok(false),
        Some(other) => Err(bad_row(row, format!("'{column}': {other} is not a boolean")).into()),
    }
}

// ---------------------------------------------------------------------------
// Row assembly
// ---------------------------------------------------------------------------

/// Assemble a listing, deriving the total price when the file does not
/// carry one and keeping it at least the asking price.
#[allow(clippy::too_many_arguments)]
fn build_listing(
    seller: Seller,
    price: f64,
    rooms: u32,
    area: f64,
    floor: String,
    has_garage: bool,
    has_elevator: bool,
    neighborhood: Option<String>,
    floor_number: Option<i32>,
    garage_price: Option<f64>,
    total_price: Option<f64>,
) -> Listing {
    let derived = price + garage_price.unwrap_or(0.0);
    let total_price = total_price.unwrap_or(derived).max(price);
    Listing {
        seller,
        price,
        rooms,
        area,
        floor,
        has_garage,
        has_elevator,
        neighborhood,
        floor_number,
        garage_price,
        total_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_CSV: &str = "\
vendedor,precio,habitaciones,metros,planta,garaje,ascensor,ubicacion,numero_planta,precio_garaje,precio_total
Particular,200000,2,80,Bajo,False,False,Centro,0,,
Agencia,300000,3.0,100,3ª planta,True,True,Salamanca,3,15000,
Agencia,450000,4,150,Ático,False,True,,8,,460000
";

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_csv_with_coercion() {
        let path = write_temp("vivienda_loader_ok.csv", SAMPLE_CSV);
        let set = load_file(&path).unwrap();

        assert_eq!(set.len(), 3);
        let first = &set.listings[0];
        assert_eq!(first.seller, Seller::Individual);
        assert_eq!(first.rooms, 2);
        assert!(!first.has_garage);
        assert_eq!(first.total_price, 200_000.0);

        // "3.0" coerces to 3; garage price feeds the derived total.
        let second = &set.listings[1];
        assert_eq!(second.rooms, 3);
        assert_eq!(second.garage_price, Some(15_000.0));
        assert_eq!(second.total_price, 315_000.0);

        // Empty ubicacion becomes None; explicit total is kept.
        let third = &set.listings[2];
        assert_eq!(third.neighborhood, None);
        assert_eq!(third.total_price, 460_000.0);

        assert_eq!(set.price_bounds, (200_000.0, 450_000.0));
    }

    #[test]
    fn total_price_never_below_price() {
        let csv = "\
vendedor,precio,habitaciones,metros,planta,garaje,ascensor,ubicacion,numero_planta,precio_garaje,precio_total
Agencia,300000,3,100,Bajo,False,True,Centro,0,,250000
";
        let path = write_temp("vivienda_loader_total.csv", csv);
        let set = load_file(&path).unwrap();
        assert_eq!(set.listings[0].total_price, 300_000.0);
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "vendedor,precio\nAgencia,100\n";
        let path = write_temp("vivienda_loader_cols.csv", csv);
        let err = load_file(&path).unwrap_err();
        let load_err = err.downcast_ref::<LoadError>().unwrap();
        assert!(matches!(load_err, LoadError::MissingColumn("habitaciones")));
    }

    #[test]
    fn bad_cell_names_row_and_column() {
        let csv = "\
vendedor,precio,habitaciones,metros,planta,garaje,ascensor,ubicacion,numero_planta
Agencia,not-a-price,3,100,Bajo,False,True,Centro,0
";
        let path = write_temp("vivienda_loader_badcell.csv", csv);
        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("row 0"));
        assert!(err.to_string().contains("precio"));
    }

    #[test]
    fn header_only_file_is_empty() {
        let csv = "vendedor,precio,habitaciones,metros,planta,garaje,ascensor,ubicacion,numero_planta\n";
        let path = write_temp("vivienda_loader_empty.csv", csv);
        let err = load_file(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::Empty)
        ));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("listings.parquet")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn loads_json_records() {
        let json = r#"[
            {"vendedor": "Particular", "precio": 200000, "habitaciones": 2,
             "metros": 80.0, "planta": "Bajo", "garaje": false,
             "ascensor": false, "ubicacion": "Centro", "numero_planta": 0},
            {"vendedor": "Agencia", "precio": 300000, "habitaciones": 3,
             "metros": 100.0, "planta": "3ª planta", "garaje": true,
             "ascensor": true, "ubicacion": null, "numero_planta": 3,
             "precio_garaje": 15000}
        ]"#;
        let path = write_temp("vivienda_loader.json", json);
        let set = load_file(&path).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.listings[1].neighborhood, None);
        assert_eq!(set.listings[1].total_price, 315_000.0);
    }
}
