//! `GET /` and `POST /reload`.

use axum::{
  extract::{Query, State},
  response::{Html, Redirect},
};
use serde::{Deserialize, Serialize};
use stockroom_core::{
  card::{self, Card},
  catalog::Catalog,
  product::Product,
  query::{self, DEFAULT_RECENT, Page, ProductQuery, Sort},
  table::Table,
};

use crate::{
  AppState,
  html::{PageView, render_page},
  metadata,
};

fn is_blank(v: &Option<String>) -> bool { v.as_deref().is_none_or(|s| s.trim().is_empty()) }

/// Query string of the search page. Everything is optional; blank values are
/// left out when a link is written back.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct PageParams {
  #[serde(skip_serializing_if = "is_blank")]
  pub q:        Option<String>,
  #[serde(skip_serializing_if = "is_blank")]
  pub category: Option<String>,
  #[serde(skip_serializing_if = "is_blank")]
  pub prefix:   Option<String>,
  /// Checkbox value; present (usually `on`) when ticked.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub recent:   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub page:     Option<usize>,
}

impl PageParams {
  pub fn recent(&self) -> bool { self.recent.is_some() }

  fn non_empty(v: &Option<String>) -> Option<String> {
    v.as_deref()
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_owned)
  }

  fn is_unfiltered(&self) -> bool {
    Self::non_empty(&self.q).is_none()
      && Self::non_empty(&self.category).is_none()
      && Self::non_empty(&self.prefix).is_none()
  }

  fn to_query(&self, page_size: usize) -> ProductQuery {
    ProductQuery {
      text: Self::non_empty(&self.q),
      category: Self::non_empty(&self.category),
      prefix: Self::non_empty(&self.prefix),
      sort: if self.recent() { Sort::Recent } else { Sort::None },
      page: self.page.unwrap_or(1),
      page_size,
    }
  }
}

/// Rows to show for `params`. The bare "recent" view is capped at the
/// [`DEFAULT_RECENT`] newest products; filtered views sort the whole match.
pub(crate) fn select<'a>(
  table: &'a Table,
  params: &PageParams,
  page_size: usize,
) -> Page<&'a Product> {
  if params.recent() && params.is_unfiltered() {
    let rows = query::recent(table, DEFAULT_RECENT);
    return query::paginate(&rows, params.page.unwrap_or(1), page_size);
  }
  query::run(table, &params.to_query(page_size))
}

pub async fn handler<C: Catalog>(
  State(state): State<AppState<C>>,
  Query(params): Query<PageParams>,
) -> Html<String> {
  let last_updated = match &state.config.metadata {
    Some(cfg) => Some(metadata::last_updated(&state.http, cfg).await),
    None => None,
  };

  let settings = state.settings();
  let (status, categories, page) = match state.catalog.table().await {
    Ok(table) => {
      let page: Page<Card> = select(&table, &params, settings.default_page_size)
        .map(|p| card::render(p, settings.thresholds));
      (Ok(table.summary()), table.categories(), Some(page))
    }
    Err(e) => {
      tracing::error!(error = %e, "catalog unavailable");
      (Err(e.to_string()), Vec::new(), None)
    }
  };

  Html(render_page(&PageView {
    title: &state.config.title,
    status,
    params: &params,
    categories: &categories,
    page,
    last_updated,
    uploads: state.auth.password_hash.is_some(),
  }))
}

/// Drop the cached table and send the browser back to the page.
pub async fn reload<C: Catalog>(State(state): State<AppState<C>>) -> Redirect {
  state.catalog.invalidate();
  tracing::info!("catalog reload requested");
  Redirect::to("/")
}
