//! Product list pane — left panel.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::{App, Mode};

/// Render the product list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let page = &app.page;

  let mut title = format!(" Productos ({}) ", page.total);
  if page.total_pages > 1 {
    title = format!(" Productos ({}) · {}/{} ", page.total, page.page, page.total_pages);
  }

  let mut filters = Vec::new();
  if let Some(c) = app.category_name() {
    filters.push(format!("[{c}]"));
  }
  if app.recent {
    filters.push("[recientes]".to_string());
  }

  let block = Block::default()
    .title(title)
    .title_bottom(filters.join(" "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let items: Vec<ListItem> = page
    .items
    .iter()
    .map(|p| {
      ListItem::new(Line::from(vec![
        Span::styled(format!("{:<8} ", p.code), Style::default().fg(Color::DarkGray)),
        Span::raw(p.name.clone()),
      ]))
    })
    .collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // Search bar on the last inner line while typing or when a search is set.
  let show_search = app.mode == Mode::Search || !app.search.is_empty();
  if show_search && inner_area.height > 2 {
    let search_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let text = if app.mode == Mode::Search {
      format!("/{}_", app.input)
    } else {
      format!("/{}", app.search)
    };
    f.render_widget(
      Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
      search_area,
    );
  }

  if page.items.is_empty() {
    f.render_widget(
      Paragraph::new("No se encontraron productos con ese nombre.")
        .style(Style::default().fg(Color::DarkGray)),
      inner_area,
    );
    return;
  }

  let mut state = ListState::default();
  state.select(Some(app.cursor));

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner_area,
    &mut state,
  );
}
