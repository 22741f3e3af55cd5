//! Server-side rendering of the search page.
//!
//! Plain string building; every interpolated value goes through [`escape`].

use std::fmt::Write as _;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use stockroom_core::{
  NO_DATA,
  card::{Card, Image, StockColor},
  query::Page,
};

use crate::handlers::page::PageParams;

pub const NO_RESULTS: &str = "No se encontraron productos con ese nombre.";
pub const NO_IMAGE: &str = "Imagen no disponible.";

/// Everything the page template needs.
pub struct PageView<'a> {
  pub title:        &'a str,
  /// Load summary on success, the load error otherwise.
  pub status:       Result<String, String>,
  pub params:       &'a PageParams,
  pub categories:   &'a [String],
  pub page:         Option<Page<Card>>,
  pub last_updated: Option<String>,
  /// Show the catalog upload form.
  pub uploads:      bool,
}

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  for c in raw.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      c => out.push(c),
    }
  }
  out
}

/// Everything but RFC 3986 unreserved characters is escaped in a path
/// segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
  .remove(b'-')
  .remove(b'_')
  .remove(b'.')
  .remove(b'~');

fn image_href(code: &str) -> String {
  format!("/products/{}/image", utf8_percent_encode(code, PATH_SEGMENT))
}

fn stock_class(color: StockColor) -> &'static str {
  match color {
    StockColor::Green => "stock-green",
    StockColor::Orange => "stock-orange",
    StockColor::Red => "stock-red",
  }
}

const STYLE: &str = "body{font-family:sans-serif;max-width:60rem;margin:auto;padding:1rem}\
.card{border:1px solid #ddd;border-radius:6px;padding:1rem;margin:1rem 0;display:flex;gap:1rem}\
.card img{max-width:12rem;max-height:12rem}\
.stock-green{color:#2e7d32;font-weight:bold}\
.stock-orange{color:#ef6c00;font-weight:bold}\
.stock-red{color:#c62828;font-weight:bold}\
.ok{color:#2e7d32}.err{color:#c62828}\
.pager a{margin:0 .5rem}";

/// Link to another page of the current result set.
fn page_href(params: &PageParams, page: usize) -> String {
  let link = PageParams {
    page: Some(page),
    ..params.clone()
  };
  match serde_urlencoded::to_string(&link) {
    Ok(query) => format!("/?{}", escape(&query)),
    Err(e) => {
      tracing::warn!(error = %e, "could not encode page link");
      format!("/?page={page}")
    }
  }
}

fn field(out: &mut String, label: &str, value: &str) {
  let _ = write!(out, "<p><b>{label}:</b> {}</p>", escape(value));
}

fn render_card(out: &mut String, card: &Card) {
  out.push_str("<div class=\"card\"><div>");
  let _ = write!(out, "<h3>Producto: {}</h3>", escape(&card.title));
  field(out, "Código", &card.code);
  match &card.stock {
    Some(badge) => {
      let _ = write!(
        out,
        "<p><b>Stock:</b> <span class=\"{}\">{}</span></p>",
        stock_class(badge.color),
        badge.value
      );
    }
    None => field(out, "Stock", NO_DATA),
  }
  field(out, "Stock secundario", &card.secondary_stock);
  field(out, "Precio Jugueterías", &card.price);
  field(out, "Precio mayorista", &card.wholesale_price);
  field(out, "Descripción", &card.description);
  let categories = if card.categories.is_empty() {
    NO_DATA.to_string()
  } else {
    card.categories.join(", ")
  };
  field(out, "Categorías", &categories);
  field(out, "Pasillo", &card.aisle);
  field(out, "Estante", &card.shelf);
  field(out, "Proveedor", &card.supplier);
  out.push_str("</div><div>");
  match &card.image {
    Image::Url(_) => {
      let _ = write!(
        out,
        "<img src=\"{}\" alt=\"{}\" loading=\"lazy\">",
        escape(&image_href(&card.code)),
        escape(&card.title)
      );
    }
    Image::Unavailable => {
      let _ = write!(out, "<p>{NO_IMAGE}</p>");
    }
  }
  out.push_str("</div></div>");
}

fn render_form(out: &mut String, view: &PageView<'_>) {
  let params = view.params;
  out.push_str("<form method=\"get\" action=\"/\">");
  let _ = write!(
    out,
    "<label>Buscar por nombre de producto <input type=\"search\" name=\"q\" value=\"{}\"></label> ",
    escape(params.q.as_deref().unwrap_or_default())
  );
  out.push_str("<label>Categoría <select name=\"category\"><option value=\"\">Todas</option>");
  let selected = params.category.as_deref().unwrap_or_default();
  for c in view.categories {
    let sel = if c == selected { " selected" } else { "" };
    let _ = write!(out, "<option value=\"{0}\"{sel}>{0}</option>", escape(c));
  }
  out.push_str("</select></label> ");
  let checked = if params.recent() { " checked" } else { "" };
  let _ = write!(
    out,
    "<label><input type=\"checkbox\" name=\"recent\"{checked}> Mostrar 100 productos más recientes</label> "
  );
  out.push_str("<button type=\"submit\">Buscar</button></form>");
  out.push_str(
    "<form method=\"post\" action=\"/reload\"><button type=\"submit\">Recargar datos</button></form>",
  );
  if view.uploads {
    out.push_str(
      "<form method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">\
       <label>Subir archivo de productos <input type=\"file\" name=\"file\" \
       accept=\".xlsx,.xls,.ods,.csv\" required></label> \
       <button type=\"submit\">Subir</button></form>",
    );
  }
}

/// Result page for an upload sent from the browser form.
pub fn render_upload_result(title: &str, summary: &str) -> String {
  let title = escape(title);
  format!(
    "<!doctype html><html lang=\"es\"><head><meta charset=\"utf-8\">\
     <title>{title}</title><style>{STYLE}</style></head><body><h1>{title}</h1>\
     <p class=\"ok\">Archivo subido correctamente: {}</p>\
     <p><a href=\"/\">Volver al buscador</a></p></body></html>",
    escape(summary)
  )
}

fn render_pager(out: &mut String, params: &PageParams, page: &Page<Card>) {
  if page.total_pages <= 1 {
    return;
  }
  out.push_str("<nav class=\"pager\">");
  if page.has_prev() {
    let _ = write!(out, "<a href=\"{}\">Anterior</a>", page_href(params, page.page - 1));
  }
  let _ = write!(out, "Página {} de {}", page.page, page.total_pages);
  if page.has_next() {
    let _ = write!(out, "<a href=\"{}\">Siguiente</a>", page_href(params, page.page + 1));
  }
  out.push_str("</nav>");
}

/// Render the full HTML document.
pub fn render_page(view: &PageView<'_>) -> String {
  let mut out = String::new();
  let title = escape(view.title);
  let _ = write!(
    out,
    "<!doctype html><html lang=\"es\"><head><meta charset=\"utf-8\">\
     <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
     <title>{title}</title><style>{STYLE}</style></head><body><h1>{title}</h1>"
  );

  match &view.status {
    Ok(summary) => {
      let _ = write!(out, "<p class=\"ok\">{}</p>", escape(summary));
    }
    Err(e) => {
      let _ = write!(out, "<p class=\"err\">Error al cargar el catálogo: {}</p>", escape(e));
    }
  }

  render_form(&mut out, view);

  if let Some(page) = &view.page {
    if page.items.is_empty() {
      let _ = write!(out, "<p>{NO_RESULTS}</p>");
    } else {
      let _ = write!(out, "<p>{} productos</p>", page.total);
      for card in &page.items {
        render_card(&mut out, card);
      }
      render_pager(&mut out, view.params, page);
    }
  }

  if let Some(updated) = &view.last_updated {
    let _ = write!(out, "<footer><p>Última actualización: {}</p></footer>", escape(updated));
  }
  out.push_str("</body></html>");
  out
}

#[cfg(test)]
mod tests {
  use stockroom_core::{
    card::{StockThresholds, render},
    product::Product,
    query::paginate,
  };

  use super::*;

  fn cards(n: usize) -> Vec<Card> {
    (0..n)
      .map(|i| {
        let mut p = Product::new(format!("P{i}"), format!("Auto <{i}>"));
        p.stock = Some(i as i64 - 1);
        render(&p, StockThresholds::default())
      })
      .collect()
  }

  fn view<'a>(params: &'a PageParams, page: Option<Page<Card>>) -> PageView<'a> {
    PageView {
      title: "Super Buscador de Productos",
      status: Ok("3 rows, 2 columns loaded".into()),
      params,
      categories: &[],
      page,
      last_updated: None,
      uploads: false,
    }
  }

  #[test]
  fn escape_special_characters() {
    assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
  }

  #[test]
  fn image_links_encode_the_code() {
    assert_eq!(image_href("A 1/ñ"), "/products/A%201%2F%C3%B1/image");
    assert_eq!(image_href("P-0.1_x~"), "/products/P-0.1_x~/image");
  }

  #[test]
  fn names_are_escaped_in_cards() {
    let params = PageParams::default();
    let html = render_page(&view(&params, Some(paginate(&cards(1), 1, 20))));
    assert!(html.contains("Auto &lt;0&gt;"));
    assert!(!html.contains("Auto <0>"));
  }

  #[test]
  fn stock_classes_follow_color() {
    let params = PageParams::default();
    let html = render_page(&view(&params, Some(paginate(&cards(8), 1, 20))));
    assert!(html.contains(r#"class="stock-red""#));
    assert!(html.contains(r#"class="stock-orange""#));
    assert!(html.contains(r#"class="stock-green""#));
  }

  #[test]
  fn empty_result_message() {
    let params = PageParams::default();
    let html = render_page(&view(&params, Some(paginate(&cards(0), 1, 20))));
    assert!(html.contains(NO_RESULTS));
  }

  #[test]
  fn missing_image_placeholder() {
    let params = PageParams::default();
    let html = render_page(&view(&params, Some(paginate(&cards(1), 1, 20))));
    assert!(html.contains(NO_IMAGE));
  }

  #[test]
  fn pager_keeps_filters() {
    let params = PageParams {
      q: Some("auto rojo".into()),
      recent: Some("on".into()),
      ..Default::default()
    };
    let html = render_page(&view(&params, Some(paginate(&cards(5), 2, 2))));
    assert!(html.contains("/?q=auto+rojo&amp;recent=on&amp;page=1"));
    assert!(html.contains("/?q=auto+rojo&amp;recent=on&amp;page=3"));
    assert!(html.contains("Página 2 de 3"));
  }

  #[test]
  fn pager_omits_blank_filters() {
    let params = PageParams {
      q: Some(String::new()),
      category: Some("Muñecas".into()),
      ..Default::default()
    };
    let html = render_page(&view(&params, Some(paginate(&cards(5), 1, 2))));
    assert!(html.contains("/?category=Mu%C3%B1ecas&amp;page=2"), "{html}");
  }

  #[test]
  fn upload_form_only_when_enabled() {
    let params = PageParams::default();
    let mut v = view(&params, None);
    assert!(!render_page(&v).contains("multipart/form-data"));
    v.uploads = true;
    let html = render_page(&v);
    assert!(html.contains(r#"action="/upload" enctype="multipart/form-data""#));
    assert!(html.contains(r#"name="file""#));
  }

  #[test]
  fn upload_result_escapes_summary() {
    let html = render_upload_result("Catálogo", "3 rows, 3 columns loaded <ok>");
    assert!(html.contains("3 rows, 3 columns loaded &lt;ok&gt;"));
    assert!(html.contains(r#"<a href="/">"#));
  }

  #[test]
  fn load_error_is_shown() {
    let params = PageParams::default();
    let mut v = view(&params, None);
    v.status = Err("productos.xlsx not found".into());
    let html = render_page(&v);
    assert!(html.contains("productos.xlsx not found"));
    assert!(!html.contains(NO_RESULTS));
  }

  #[test]
  fn last_updated_footer() {
    let params = PageParams::default();
    let mut v = view(&params, None);
    v.last_updated = Some("24/09/2024 15:30".into());
    assert!(render_page(&v).contains("Última actualización: 24/09/2024 15:30"));
  }
}
