//! Product card pane — right panel.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};
use stockroom_core::{
  NO_DATA,
  card::{Card, Image, StockColor},
};

use crate::app::App;

fn stock_style(color: StockColor) -> Style {
  let fg = match color {
    StockColor::Green => Color::Green,
    StockColor::Orange => Color::Rgb(255, 165, 0),
    StockColor::Red => Color::Red,
  };
  Style::default().fg(fg).add_modifier(Modifier::BOLD)
}

fn row<'a>(label: &'a str, value: Span<'a>) -> Line<'a> {
  Line::from(vec![
    Span::styled(
      format!("{label:<18}"),
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    value,
  ])
}

fn lines(card: &Card) -> Vec<Line<'_>> {
  let stock = match &card.stock {
    Some(badge) => Span::styled(badge.value.to_string(), stock_style(badge.color)),
    None => Span::raw(NO_DATA),
  };
  let categories = if card.categories.is_empty() {
    NO_DATA.to_string()
  } else {
    card.categories.join(", ")
  };
  let image = match &card.image {
    Image::Url(url) => url.clone(),
    Image::Unavailable => "Imagen no disponible.".to_string(),
  };

  vec![
    row("Código", Span::raw(card.code.as_str())),
    row("Stock", stock),
    row("Stock secundario", Span::raw(card.secondary_stock.as_str())),
    row("Precio", Span::raw(card.price.as_str())),
    row("Precio mayorista", Span::raw(card.wholesale_price.as_str())),
    row("Categorías", Span::raw(categories)),
    row("Pasillo", Span::raw(card.aisle.as_str())),
    row("Estante", Span::raw(card.shelf.as_str())),
    row("Proveedor", Span::raw(card.supplier.as_str())),
    row("Imagen", Span::styled(image, Style::default().fg(Color::DarkGray))),
    Line::from(""),
    Line::from(card.description.as_str()),
  ]
}

/// Render the card for the product under the cursor into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let title = app
    .card
    .as_ref()
    .map(|c| format!(" {} ", c.title))
    .unwrap_or_else(|| " Producto ".to_string());

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  match &app.card {
    Some(card) => f.render_widget(
      Paragraph::new(lines(card)).wrap(Wrap { trim: false }),
      inner,
    ),
    None => f.render_widget(
      Paragraph::new("Seleccione un producto.").style(Style::default().fg(Color::DarkGray)),
      inner,
    ),
  }
}
