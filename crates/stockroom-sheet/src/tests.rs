//! Decoding tests against in-memory CSV and workbook fixtures.

use chrono::NaiveDate;
use rust_xlsxwriter::{ExcelDateTime, Format as CellFormat, Workbook};
use stockroom_core::{query, table::Table};

use crate::{Error, Format, decode, prepare_upload};

const SAMPLE: &str = "\
Codigo,Nombre,Stock,Precio Jugueterias face,Descripción,Categorias,imagen,Fecha Creado
A100,Pelota de fútbol,12,\"15.300,00\",Pelota N°5,\"Deportes, Exterior\",https://img.example/a100.jpg,24/09/2024
A101,Muñeca Clásica,3,9800,,Muñecas,,2024-09-20 10:15:00
A102,Rompecabezas 500,-1,,Paisaje,,,no es fecha
,,,,,,,
";

fn sample() -> Table {
  decode(SAMPLE.as_bytes(), "sample.csv").expect("sample decodes")
}

// ─── Basic decoding ──────────────────────────────────────────────────────────

#[test]
fn decodes_rows_and_columns() {
  let t = sample();
  assert_eq!(t.len(), 3, "blank trailing row is skipped");
  assert_eq!(t.columns.len(), 8);
  assert_eq!(t.summary(), "3 rows, 8 columns loaded");
  assert_eq!(t.source, "sample.csv");
  assert_eq!(t.fingerprint.len(), 64);
}

#[test]
fn fields_are_coerced() {
  let t = sample();
  let a = t.require("A100").unwrap();
  assert_eq!(a.name, "Pelota de fútbol");
  assert_eq!(a.stock, Some(12));
  assert_eq!(a.retail_price, Some(15300.0));
  assert_eq!(a.category.as_deref(), Some("Deportes, Exterior"));
  assert_eq!(a.image_url.as_deref(), Some("https://img.example/a100.jpg"));
  assert_eq!(
    a.created_at,
    NaiveDate::from_ymd_opt(2024, 9, 24).unwrap().and_hms_opt(0, 0, 0)
  );
}

#[test]
fn empty_cells_and_bad_dates_become_none() {
  let t = sample();
  let b = t.require("A101").unwrap();
  assert_eq!(b.description, None);
  assert_eq!(b.image_url, None);
  let c = t.require("A102").unwrap();
  assert_eq!(c.retail_price, None);
  assert_eq!(c.category, None);
  assert_eq!(c.created_at, None, "unparseable date does not fail the load");
  assert_eq!(c.stock, Some(-1));
}

#[test]
fn optional_columns_may_be_absent() {
  let t = decode(b"Nombre,Codigo\nTrompo,Z1\n", "min.csv").unwrap();
  let p = t.require("Z1").unwrap();
  assert_eq!(p.name, "Trompo");
  assert_eq!(p.stock, None);
  assert_eq!(p.created_at, None);
}

#[test]
fn missing_required_column_is_schema_error() {
  let err = decode(b"Codigo,Stock\nA1,3\n", "bad.csv").unwrap_err();
  assert!(
    matches!(err, Error::Core(stockroom_core::Error::MissingColumn("name"))),
    "got {err:?}"
  );
}

#[test]
fn empty_input_has_no_header() {
  assert!(matches!(decode(b"", "empty.csv"), Err(Error::EmptySheet)));
}

#[test]
fn garbage_zip_is_a_spreadsheet_error() {
  let err = decode(b"PK\x03\x04not really a zip", "broken.xlsx").unwrap_err();
  assert!(matches!(err, Error::Spreadsheet(_)), "got {err:?}");
}

#[test]
fn semicolon_delimited_export() {
  let t = decode(b"Codigo;Nombre;Stock\nA1;Pelota;4\nA2;Yo-yo;0\n", "semi.csv").unwrap();
  assert_eq!(t.len(), 2);
  assert_eq!(t.require("A2").unwrap().stock, Some(0));
}

#[test]
fn dotted_thousands_in_semicolon_export() {
  let t = decode(b"Codigo;Nombre;Precio\nA1;Pelota;12.500\n", "semi.csv").unwrap();
  assert_eq!(t.require("A1").unwrap().retail_price, Some(12_500.0));
}

#[test]
fn format_is_sniffed_from_content() {
  assert_eq!(Format::sniff(b"PK\x03\x04rest"), Format::Workbook);
  assert_eq!(Format::sniff(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1]), Format::Workbook);
  assert_eq!(Format::sniff(b"Codigo,Nombre"), Format::Csv);
}

// ─── Upload transcoding ──────────────────────────────────────────────────────

#[test]
fn latin1_csv_upload_round_trips() {
  // The same data as SAMPLE's first two rows, exported as Latin-1 with `;`.
  let mut latin1: Vec<u8> = Vec::new();
  for ch in "Codigo;Nombre;Stock;Categorias\nA100;Pelota de fútbol;12;Deportes\nA101;Muñeca Clásica;3;Muñecas\n".chars() {
    latin1.push(u8::try_from(u32::from(ch)).unwrap());
  }
  let native = decode(
    "Codigo,Nombre,Stock,Categorias\nA100,Pelota de fútbol,12,Deportes\nA101,Muñeca Clásica,3,Muñecas\n".as_bytes(),
    "native.csv",
  )
  .unwrap();

  let upload = prepare_upload(&latin1, "upload.csv").unwrap();
  assert_eq!(upload.format, Format::Csv);
  assert!(std::str::from_utf8(&upload.bytes).is_ok(), "stored as UTF-8");

  let reloaded = decode(&upload.bytes, "reloaded.csv").unwrap();
  assert_eq!(reloaded.len(), native.len());
  assert_eq!(reloaded.columns, native.columns);
  assert_eq!(reloaded.products, native.products);
  assert_eq!(reloaded.fingerprint, upload.table.fingerprint);
}

/// The first two products of the catalog as an xlsx workbook, with real
/// number and date cells.
fn workbook_fixture() -> Vec<u8> {
  let mut workbook = Workbook::new();
  let sheet = workbook.add_worksheet();
  let date = CellFormat::new().set_num_format("dd/mm/yyyy hh:mm");

  for (col, header) in ["Codigo", "Nombre", "Stock", "Precio", "Categorias", "Fecha Creado"]
    .into_iter()
    .enumerate()
  {
    sheet.write_string(0, col as u16, header).unwrap();
  }

  sheet.write_string(1, 0, "A100").unwrap();
  sheet.write_string(1, 1, "Pelota de fútbol").unwrap();
  sheet.write_number(1, 2, 12).unwrap();
  sheet.write_number(1, 3, 15300).unwrap();
  sheet.write_string(1, 4, "Deportes, Exterior").unwrap();
  let created = ExcelDateTime::from_ymd(2024, 9, 24).unwrap();
  sheet.write_datetime_with_format(1, 5, &created, &date).unwrap();

  sheet.write_string(2, 0, "A101").unwrap();
  sheet.write_string(2, 1, "Muñeca Clásica").unwrap();
  sheet.write_number(2, 2, 3).unwrap();
  let created = ExcelDateTime::from_ymd(2024, 9, 20)
    .unwrap()
    .and_hms(10, 15, 0)
    .unwrap();
  sheet.write_datetime_with_format(2, 5, &created, &date).unwrap();

  workbook.save_to_buffer().unwrap()
}

const WORKBOOK_AS_CSV: &str = "\
Codigo,Nombre,Stock,Precio,Categorias,Fecha Creado
A100,Pelota de fútbol,12,15300,\"Deportes, Exterior\",24/09/2024 00:00
A101,Muñeca Clásica,3,,,20/09/2024 10:15
";

#[test]
fn decodes_xlsx_workbook() {
  let bytes = workbook_fixture();
  assert_eq!(Format::sniff(&bytes), Format::Workbook);

  let t = decode(&bytes, "productos.xlsx").unwrap();
  assert_eq!(t.summary(), "2 rows, 6 columns loaded");
  assert_eq!(t.columns[5], "Fecha Creado");

  let a = t.require("A100").unwrap();
  assert_eq!(a.stock, Some(12));
  assert_eq!(a.retail_price, Some(15300.0));
  assert_eq!(
    a.created_at,
    NaiveDate::from_ymd_opt(2024, 9, 24).unwrap().and_hms_opt(0, 0, 0)
  );
  let b = t.require("A101").unwrap();
  assert_eq!(
    b.created_at,
    NaiveDate::from_ymd_opt(2024, 9, 20).unwrap().and_hms_opt(10, 15, 0)
  );
  assert_eq!(b.retail_price, None);
  assert_eq!(b.category, None);
}

#[test]
fn csv_upload_matches_equivalent_workbook() {
  let bytes = workbook_fixture();
  let workbook = prepare_upload(&bytes, "productos.xlsx").unwrap();
  assert_eq!(workbook.format, Format::Workbook);
  assert_eq!(workbook.bytes, bytes, "workbooks are stored unchanged");

  let csv = prepare_upload(WORKBOOK_AS_CSV.as_bytes(), "productos.csv").unwrap();
  assert_eq!(csv.table.len(), workbook.table.len());
  assert_eq!(csv.table.columns, workbook.table.columns);
  assert_eq!(csv.table.products, workbook.table.products);
}

#[test]
fn upload_with_wrong_schema_is_rejected() {
  assert!(prepare_upload(b"Foo,Bar\n1,2\n", "upload.csv").is_err());
}

// ─── End to end ──────────────────────────────────────────────────────────────

#[test]
fn large_sheet_search_end_to_end() {
  let mut csv = String::from("Codigo,Nombre,Stock,Fecha Creado\n");
  for i in 0..1083 {
    let name = match i {
      17 | 512 | 1000 => format!("Dinosaurio Rex {i}"),
      _ => format!("Producto {i}"),
    };
    csv.push_str(&format!("P{i:04},{name},{},2024-01-01\n", i % 9));
  }

  let t = decode(csv.as_bytes(), "catalogo.csv").unwrap();
  assert_eq!(t.summary(), "1083 rows, 4 columns loaded");

  let hits = query::search(&t, "dinosaurio rex");
  let codes: Vec<&str> = hits.iter().map(|p| p.code.as_str()).collect();
  assert_eq!(codes, ["P0017", "P0512", "P1000"]);
}
