//! Application state machine and event dispatcher.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use stockroom_core::{
  card::Card,
  product::Product,
  query::{Page, ProductQuery, Sort},
};

use crate::client::ApiClient;

// ─── Mode ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  /// Moving through the product list.
  Browse,
  /// Typing a search string.
  Search,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub mode: Mode,

  /// Load summary reported by the server, e.g. `1083 rows, 13 columns loaded`.
  pub summary: String,

  /// The page currently on screen.
  pub page: Page<Product>,

  /// Distinct category tags, for `c` cycling.
  pub categories: Vec<String>,

  /// Index into `categories`; `None` shows every category.
  pub category: Option<usize>,

  /// Committed search string sent to the server.
  pub search: String,

  /// Search string being typed (only meaningful in [`Mode::Search`]).
  pub input: String,

  /// Newest products first.
  pub recent: bool,

  pub page_no:   usize,
  pub page_size: usize,

  /// Cursor position within `page.items`.
  pub cursor: usize,

  /// Card for the product under the cursor.
  pub card: Option<Card>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  pub client: Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient, page_size: usize) -> Self {
    Self {
      mode: Mode::Browse,
      summary: String::new(),
      page: Page {
        items: Vec::new(),
        page: 1,
        page_size,
        total: 0,
        total_pages: 0,
      },
      categories: Vec::new(),
      category: None,
      search: String::new(),
      input: String::new(),
      recent: false,
      page_no: 1,
      page_size,
      cursor: 0,
      card: None,
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  // ── Derived state ─────────────────────────────────────────────────────────

  pub fn category_name(&self) -> Option<&str> {
    self
      .category
      .and_then(|i| self.categories.get(i))
      .map(String::as_str)
  }

  /// The listing request for the current filters and page.
  pub fn query(&self) -> ProductQuery {
    ProductQuery {
      text:      (!self.search.is_empty()).then(|| self.search.clone()),
      category:  self.category_name().map(str::to_owned),
      prefix:    None,
      sort:      if self.recent { Sort::Recent } else { Sort::None },
      page:      self.page_no,
      page_size: self.page_size,
    }
  }

  pub fn selected(&self) -> Option<&Product> { self.page.items.get(self.cursor) }

  /// Advance to the next category, wrapping back to "all".
  pub fn cycle_category(&mut self) {
    self.category = match self.category {
      None if !self.categories.is_empty() => Some(0),
      Some(i) if i + 1 < self.categories.len() => Some(i + 1),
      _ => None,
    };
    self.page_no = 1;
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch the summary, categories and current page.
  pub async fn refresh(&mut self) -> anyhow::Result<()> {
    self.status_msg = "Loading…".into();
    self.summary = self.client.summary().await?;
    self.categories = self.client.categories().await?;
    if self.category.is_some_and(|i| i >= self.categories.len()) {
      self.category = None;
    }
    self.load_page().await
  }

  async fn load_page(&mut self) -> anyhow::Result<()> {
    let page = self.client.list_products(&self.query()).await?;
    self.page = page;
    self.cursor = 0;
    self.status_msg = String::new();
    self.load_card().await;
    Ok(())
  }

  /// Reload the page, leaving a message in the status bar on failure.
  async fn reload_page(&mut self) {
    if let Err(e) = self.load_page().await {
      self.status_msg = format!("Error: {e}");
    }
  }

  async fn load_card(&mut self) {
    let Some(code) = self.selected().map(|p| p.code.clone()) else {
      self.card = None;
      return;
    };
    match self.client.card(&code).await {
      Ok(card) => self.card = Some(card),
      Err(e) => {
        self.card = None;
        self.status_msg = format!("Error: {e}");
      }
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    match self.mode {
      Mode::Search => self.handle_search_key(key).await,
      Mode::Browse => self.handle_browse_key(key).await,
    }
  }

  async fn handle_search_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Browse;
        self.input.clear();
      }
      KeyCode::Enter => {
        self.mode = Mode::Browse;
        self.search = self.input.trim().to_owned();
        self.page_no = 1;
        self.reload_page().await;
      }
      KeyCode::Backspace => {
        self.input.pop();
      }
      KeyCode::Char(c) => self.input.push(c),
      _ => {}
    }
    Ok(true)
  }

  async fn handle_browse_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Down | KeyCode::Char('j') => {
        if self.cursor + 1 < self.page.items.len() {
          self.cursor += 1;
          self.load_card().await;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        if self.cursor > 0 {
          self.cursor -= 1;
          self.load_card().await;
        }
      }

      KeyCode::Char('/') => {
        self.mode = Mode::Search;
        self.input = self.search.clone();
      }
      KeyCode::Esc => {
        if !self.search.is_empty() || self.category.is_some() {
          self.search.clear();
          self.category = None;
          self.page_no = 1;
          self.reload_page().await;
        }
      }
      KeyCode::Char('c') => {
        self.cycle_category();
        self.reload_page().await;
      }
      KeyCode::Char('r') => {
        self.recent = !self.recent;
        self.page_no = 1;
        self.reload_page().await;
      }
      KeyCode::Char('n') | KeyCode::PageDown => {
        if self.page.has_next() {
          self.page_no += 1;
          self.reload_page().await;
        }
      }
      KeyCode::Char('p') | KeyCode::PageUp => {
        if self.page.has_prev() {
          self.page_no -= 1;
          self.reload_page().await;
        }
      }
      KeyCode::Char('R') => {
        match self.client.reload().await {
          Ok(()) => {
            if let Err(e) = self.refresh().await {
              self.status_msg = format!("Error: {e}");
            }
          }
          Err(e) => self.status_msg = format!("Error: {e}"),
        }
      }

      _ => {}
    }
    Ok(true)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::client::ApiConfig;

  fn app() -> App {
    let client = ApiClient::new(ApiConfig {
      base_url: "http://127.0.0.1:9".into(),
    })
    .unwrap();
    let mut app = App::new(client, 20);
    app.categories = vec!["Deportes".into(), "Muñecas".into()];
    app
  }

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn default_query_lists_everything() {
    let q = app().query();
    assert_eq!(q.text, None);
    assert_eq!(q.category, None);
    assert_eq!(q.sort, Sort::None);
    assert_eq!(q.page, 1);
    assert_eq!(q.page_size, 20);
  }

  #[test]
  fn category_cycles_through_all_and_back() {
    let mut app = app();
    app.page_no = 3;
    app.cycle_category();
    assert_eq!(app.category_name(), Some("Deportes"));
    assert_eq!(app.page_no, 1);
    app.cycle_category();
    assert_eq!(app.query().category.as_deref(), Some("Muñecas"));
    app.cycle_category();
    assert_eq!(app.category_name(), None);
  }

  #[test]
  fn cycle_without_categories_stays_unfiltered() {
    let mut app = app();
    app.categories.clear();
    app.cycle_category();
    assert_eq!(app.category, None);
  }

  #[test]
  fn recent_and_search_shape_the_query() {
    let mut app = app();
    app.recent = true;
    app.search = "pelota".into();
    let q = app.query();
    assert_eq!(q.sort, Sort::Recent);
    assert_eq!(q.text.as_deref(), Some("pelota"));
  }

  #[tokio::test]
  async fn typing_a_search_stays_local_until_enter() {
    let mut app = app();
    assert!(app.handle_key(key(KeyCode::Char('/'))).await.unwrap());
    assert_eq!(app.mode, Mode::Search);
    for c in "pel".chars() {
      app.handle_key(key(KeyCode::Char(c))).await.unwrap();
    }
    app.handle_key(key(KeyCode::Backspace)).await.unwrap();
    assert_eq!(app.input, "pe");
    assert!(app.search.is_empty());

    app.handle_key(key(KeyCode::Esc)).await.unwrap();
    assert_eq!(app.mode, Mode::Browse);
    assert!(app.input.is_empty());
  }

  #[tokio::test]
  async fn q_quits() {
    let mut app = app();
    assert!(!app.handle_key(key(KeyCode::Char('q'))).await.unwrap());
  }

  #[tokio::test]
  async fn failed_load_is_reported_in_status_bar() {
    let mut app = app();
    assert!(app.handle_key(key(KeyCode::Char('r'))).await.unwrap());
    assert!(app.recent);
    assert!(app.status_msg.starts_with("Error:"), "{}", app.status_msg);
  }
}
