//! Chart deep-link building.
//!
//! A `LinkRequest` is turned into a `ChartRecord`, serialized to compact JSON,
//! percent-encoded into `?chart=` and returned together with a link to the
//! first entity's profile page. Nothing is persisted; the web app rebuilds the
//! chart from the URL.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::config::LinkConfig;
use crate::domain::{
  AccountCategory, ChartConfig, ChartRecord, SeriesFilter, SeriesRecord, YearRange, DEFAULT_CHART_TYPE,
  DEFAULT_END_YEAR, DEFAULT_START_YEAR, SERIES_TYPE,
};
use crate::error::{LinkError, Result};
use crate::util::{append_query, encode_component, iso_timestamp, trunc_for_log};

/// Which optional query parameters the entity link carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntityScope {
  /// Add `year=`.
  pub year: bool,
  /// Add the classification search for the first functional prefix.
  pub classification: bool,
}

/// Everything a caller can ask for. Empty lists and `None` mean "not given".
#[derive(Clone, Debug, PartialEq)]
pub struct LinkRequest {
  pub entity_cuis: Vec<String>,
  pub account_category: AccountCategory,
  pub chart_type: String,
  pub title: Option<String>,
  pub description: Option<String>,
  pub start_year: i32,
  pub end_year: i32,
  /// Single-year form. Takes precedence over `start_year`/`end_year`.
  pub year: Option<i32>,
  pub economic_prefixes: Vec<String>,
  pub functional_prefixes: Vec<String>,
  pub entity_types: Vec<String>,
  pub entity_scope: EntityScope,
}

impl Default for LinkRequest {
  fn default() -> Self {
    Self {
      entity_cuis: Vec::new(),
      account_category: AccountCategory::default(),
      chart_type: DEFAULT_CHART_TYPE.into(),
      title: None,
      description: None,
      start_year: DEFAULT_START_YEAR,
      end_year: DEFAULT_END_YEAR,
      year: None,
      economic_prefixes: Vec::new(),
      functional_prefixes: Vec::new(),
      entity_types: Vec::new(),
      entity_scope: EntityScope::default(),
    }
  }
}

impl LinkRequest {
  pub fn for_entities<I, S>(cuis: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self { entity_cuis: cuis.into_iter().map(Into::into).collect(), ..Self::default() }
  }

  /// Effective data range after applying the single-year override.
  pub fn year_range(&self) -> YearRange {
    match self.year {
      Some(y) => YearRange { start: y, end: y },
      None => YearRange { start: self.start_year, end: self.end_year },
    }
  }

  fn title_or_default(&self) -> String {
    match non_empty(&self.title) {
      Some(t) => t.to_string(),
      None => default_title(self.account_category, &self.entity_cuis, self.year_range()),
    }
  }
}

/// The two sibling links.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ChartLinks {
  pub chart_url: String,
  pub entity_url: Option<String>,
}

/// `Total Spending for Entity 4270740 (2016-2025)` / `Total Revenue for 3 Entities (2020-2024)`.
pub fn default_title(category: AccountCategory, cuis: &[String], range: YearRange) -> String {
  let entities = match cuis {
    [only] => format!("Entity {}", only),
    _ => format!("{} Entities", cuis.len()),
  };
  format!("Total {} for {} ({}-{})", category.noun(), entities, range.start, range.end)
}

/// Series label ignores any caller-supplied title.
pub fn series_label(category: AccountCategory) -> String {
  format!("Total {}", category.noun())
}

fn non_empty(s: &Option<String>) -> Option<&str> {
  s.as_deref().filter(|v| !v.is_empty())
}

fn non_empty_list(v: &[String]) -> Option<Vec<String>> {
  if v.is_empty() { None } else { Some(v.to_vec()) }
}

/// Builds chart and entity links against one configured web app origin.
#[derive(Clone, Debug)]
pub struct ChartLinkBuilder {
  config: LinkConfig,
}

impl ChartLinkBuilder {
  pub fn new(config: LinkConfig) -> Self {
    Self { config }
  }

  pub fn base_url(&self) -> &str {
    &self.config.base_url
  }

  /// Build links stamped with the current time.
  pub fn build(&self, req: &LinkRequest) -> Result<ChartLinks> {
    self.build_at(req, Utc::now())
  }

  /// Build links with a caller-provided clock reading, used for every timestamp field.
  #[instrument(level = "debug", skip(self, req), fields(cuis = req.entity_cuis.len(), category = %req.account_category))]
  pub fn build_at(&self, req: &LinkRequest, now: DateTime<Utc>) -> Result<ChartLinks> {
    let record = self.chart_record(req, now);
    let chart_url = self.chart_url(&record)?;
    let entity_url = self.entity_url(req);
    debug!(target: "chart_links", chart_id = %record.id, url_len = chart_url.len(), has_entity_url = entity_url.is_some(), "Links built");
    Ok(ChartLinks { chart_url, entity_url })
  }

  /// Assemble the chart record for a request. Ids are fresh v4 UUIDs.
  pub fn chart_record(&self, req: &LinkRequest, now: DateTime<Utc>) -> ChartRecord {
    let ts = iso_timestamp(now);
    let range = req.year_range();

    let filter = SeriesFilter {
      account_category: req.account_category,
      entity_cuis: req.entity_cuis.clone(),
      economic_prefixes: non_empty_list(&req.economic_prefixes),
      functional_prefixes: non_empty_list(&req.functional_prefixes),
      entity_types: non_empty_list(&req.entity_types),
    };

    let series = SeriesRecord {
      id: Uuid::new_v4().to_string(),
      series_type: SERIES_TYPE.into(),
      enabled: true,
      label: series_label(req.account_category),
      filter,
      config: serde_json::Map::new(),
      created_at: ts.clone(),
      updated_at: ts.clone(),
    };

    ChartRecord {
      id: Uuid::new_v4().to_string(),
      title: req.title_or_default(),
      config: ChartConfig::new(req.chart_type.clone(), Some(range)),
      series: vec![series],
      annotations: Vec::new(),
      created_at: ts.clone(),
      updated_at: ts,
      description: non_empty(&req.description).map(str::to_string),
    }
  }

  /// `{base}/charts/{id}?chart={percent-encoded compact JSON}`.
  pub fn chart_url(&self, record: &ChartRecord) -> Result<String> {
    let json = serde_json::to_string(record)?;
    debug!(target: "chart_links", payload = %trunc_for_log(&json, 200), "Chart payload serialized");
    let url = format!("{}/charts/{}?chart={}", self.config.base_url, record.id, encode_component(&json));

    if let Some(max) = self.config.max_url_len {
      if url.len() > max {
        warn!(target: "chart_links", len = url.len(), max, "Chart URL exceeds configured limit");
        return Err(LinkError::UrlTooLong { len: url.len(), max });
      }
    }
    Ok(url)
  }

  /// Profile page of the first entity, or `None` when no entity was given.
  ///
  /// Only the first functional prefix scopes the page, even when several were
  /// passed to the chart filter.
  pub fn entity_url(&self, req: &LinkRequest) -> Option<String> {
    let Some(first) = req.entity_cuis.first() else {
      if req.entity_scope != EntityScope::default() {
        debug!(target: "chart_links", "Entity scoping requested without entities; no entity link");
      }
      return None;
    };

    let mut params: Vec<(&str, String)> = Vec::new();
    if req.entity_scope.year {
      params.push(("year", req.year.unwrap_or(req.end_year).to_string()));
    }
    if req.entity_scope.classification {
      if let Some(prefix) = req.functional_prefixes.first() {
        params.push((req.account_category.entity_search_key(), format!("fn:{}", prefix)));
      }
    }

    let path = format!("{}/entities/{}", self.config.base_url, encode_component(first));
    Some(append_query(&path, &params))
  }
}

/// Parse a chart URL produced by `ChartLinkBuilder` back into its record.
pub fn decode_chart_url(chart_url: &str) -> Result<ChartRecord> {
  let json = chart_payload(chart_url)?;
  Ok(serde_json::from_str(&json)?)
}

/// The percent-decoded JSON text of the single `chart` parameter.
pub fn chart_payload(chart_url: &str) -> Result<String> {
  let parsed = url::Url::parse(chart_url).map_err(|e| LinkError::InvalidUrl(e.to_string()))?;
  let mut values = parsed.query_pairs().filter(|(k, _)| k == "chart").map(|(_, v)| v.into_owned());
  let first = values.next().ok_or(LinkError::MissingChartParam)?;
  if values.next().is_some() {
    return Err(LinkError::DuplicateChartParam);
  }
  Ok(first)
}
