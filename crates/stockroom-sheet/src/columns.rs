//! Header normalisation and the mapping from raw headers to [`Field`]s.

use std::collections::HashMap;

use stockroom_core::product::Field;
use strum::IntoEnumIterator as _;

/// Aliases recognised for each field, already in normalised form. The
/// field's own snake_case name is always accepted as well.
fn aliases(field: Field) -> &'static [&'static str] {
  match field {
    Field::Code => &["codigo", "code", "cod", "sku"],
    Field::Name => &["nombre", "name", "producto", "nombre del producto"],
    Field::RetailPrice => &[
      "precio",
      "price",
      "precio jugueterias face",
      "precio jugueterias",
      "precio venta",
      "precio minorista",
    ],
    Field::WholesalePrice => &[
      "precio mayorista",
      "wholesale price",
      "precio por mayor",
      "mayorista",
    ],
    Field::Stock => &["stock", "cantidad", "existencia"],
    Field::SecondaryStock => &[
      "stock deposito",
      "stock secundario",
      "stock 2",
      "deposito",
    ],
    Field::Description => &["descripcion", "description", "detalle"],
    Field::Category => &["categorias", "categoria", "category", "categories", "rubro"],
    Field::ImageUrl => &["imagen", "image", "foto", "url imagen", "image url"],
    Field::Aisle => &["pasillo", "aisle"],
    Field::Shelf => &["estante", "estanteria", "shelf"],
    Field::Supplier => &["proveedor", "supplier"],
    Field::CreatedAt => &[
      "fecha creado",
      "fecha de creacion",
      "fecha alta",
      "created",
      "created at",
    ],
  }
}

/// Lowercase, strip Spanish diacritics, treat `_`/`-` as spaces, collapse
/// runs of whitespace.
pub fn normalise_header(raw: &str) -> String {
  let folded: String = raw
    .trim()
    .to_lowercase()
    .chars()
    .map(|c| match c {
      'á' | 'à' | 'ä' => 'a',
      'é' | 'è' | 'ë' => 'e',
      'í' | 'ì' | 'ï' => 'i',
      'ó' | 'ò' | 'ö' => 'o',
      'ú' | 'ù' | 'ü' => 'u',
      'ñ' => 'n',
      '_' | '-' => ' ',
      other => other,
    })
    .collect();
  folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Identify the field a raw header names, if any.
pub fn field_for_header(raw: &str) -> Option<Field> {
  let norm = normalise_header(raw);
  Field::iter().find(|f| {
    normalise_header(f.as_ref()) == norm || aliases(*f).iter().any(|a| *a == norm)
  })
}

/// Column positions of every recognised field in a header row.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
  index: HashMap<Field, usize>,
}

impl ColumnMap {
  /// Map `headers`; the first column naming a field wins.
  pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
    let mut index = HashMap::new();
    for (i, header) in headers.iter().enumerate() {
      if let Some(field) = field_for_header(header.as_ref()) {
        index.entry(field).or_insert(i);
      }
    }
    Self { index }
  }

  pub fn get(&self, field: Field) -> Option<usize> { self.index.get(&field).copied() }

  /// The first required field with no column, if any.
  pub fn missing_required(&self) -> Option<Field> {
    Field::REQUIRED
      .into_iter()
      .find(|f| !self.index.contains_key(f))
  }
}
