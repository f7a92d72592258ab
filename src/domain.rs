//! Domain models for the chart deep-link payload: account category, chart record,
//! series record and the series filter.
//!
//! Field order of the structs is the serialized key order expected by the web
//! app's chart schema, so keep new fields in place.

use serde::{Deserialize, Serialize};

/// Series type understood by the chart renderer.
pub const SERIES_TYPE: &str = "line-items-aggregated-yearly";

pub const DEFAULT_START_YEAR: i32 = 2016;
pub const DEFAULT_END_YEAR: i32 = 2025;
pub const DEFAULT_CHART_TYPE: &str = "bar";

/// Which side of the budget a series reads.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AccountCategory {
  /// Expenditure ("cheltuieli").
  #[default]
  #[serde(rename = "ch")]
  Spending,
  /// Revenue ("venituri").
  #[serde(rename = "vn")]
  Revenue,
}

impl AccountCategory {
  pub fn code(self) -> &'static str {
    match self {
      AccountCategory::Spending => "ch",
      AccountCategory::Revenue => "vn",
    }
  }

  /// Human label used in titles and series labels.
  pub fn noun(self) -> &'static str {
    match self {
      AccountCategory::Spending => "Spending",
      AccountCategory::Revenue => "Revenue",
    }
  }

  /// Search parameter of the entity page that filters line items of this side.
  pub fn entity_search_key(self) -> &'static str {
    match self {
      AccountCategory::Spending => "expenseSearch",
      AccountCategory::Revenue => "incomeSearch",
    }
  }
}

impl std::str::FromStr for AccountCategory {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "ch" | "spending" => Ok(AccountCategory::Spending),
      "vn" | "revenue" => Ok(AccountCategory::Revenue),
      other => Err(format!("unknown account category '{}' (expected ch or vn)", other)),
    }
  }
}

impl std::fmt::Display for AccountCategory {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.code())
  }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct YearRange {
  pub start: i32,
  pub end: i32,
}

/// Chart-level display settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
  pub chart_type: String,
  pub show_grid_lines: bool,
  pub show_legend: bool,
  pub show_tooltip: bool,
  pub edit_annotations: bool,
  pub show_annotations: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub year_range: Option<YearRange>,
}

impl ChartConfig {
  /// All display toggles on, as a freshly created chart has them.
  pub fn new(chart_type: impl Into<String>, year_range: Option<YearRange>) -> Self {
    Self {
      chart_type: chart_type.into(),
      show_grid_lines: true,
      show_legend: true,
      show_tooltip: true,
      edit_annotations: true,
      show_annotations: true,
      year_range,
    }
  }
}

/// Analytics filter of a series. Optional lists are only present when non-empty.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SeriesFilter {
  pub account_category: AccountCategory,
  pub entity_cuis: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub economic_prefixes: Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub functional_prefixes: Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub entity_types: Option<Vec<String>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeriesRecord {
  pub id: String,
  #[serde(rename = "type")]
  pub series_type: String,
  pub enabled: bool,
  pub label: String,
  pub filter: SeriesFilter,
  /// Per-series settings; empty at creation.
  pub config: serde_json::Map<String, serde_json::Value>,
  pub created_at: String,
  pub updated_at: String,
}

/// The chart state carried in `?chart=`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartRecord {
  pub id: String,
  pub title: String,
  pub config: ChartConfig,
  pub series: Vec<SeriesRecord>,
  pub annotations: Vec<serde_json::Value>,
  pub created_at: String,
  pub updated_at: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn account_category_uses_short_codes_on_the_wire() {
    assert_eq!(serde_json::to_string(&AccountCategory::Spending).unwrap(), "\"ch\"");
    assert_eq!(serde_json::to_string(&AccountCategory::Revenue).unwrap(), "\"vn\"");
    let parsed: AccountCategory = serde_json::from_str("\"vn\"").unwrap();
    assert_eq!(parsed, AccountCategory::Revenue);
  }

  #[test]
  fn account_category_parses_codes_and_names() {
    assert_eq!("ch".parse::<AccountCategory>().unwrap(), AccountCategory::Spending);
    assert_eq!("revenue".parse::<AccountCategory>().unwrap(), AccountCategory::Revenue);
    assert!("xx".parse::<AccountCategory>().is_err());
  }

  #[test]
  fn filter_omits_absent_lists() {
    let filter = SeriesFilter {
      account_category: AccountCategory::Spending,
      entity_cuis: vec!["4270740".into()],
      economic_prefixes: None,
      functional_prefixes: Some(vec!["65".into()]),
      entity_types: None,
    };
    let json = serde_json::to_string(&filter).unwrap();
    assert_eq!(json, r#"{"account_category":"ch","entity_cuis":["4270740"],"functional_prefixes":["65"]}"#);
  }

  #[test]
  fn chart_config_keys_are_camel_case() {
    let cfg = ChartConfig::new("line", Some(YearRange { start: 2020, end: 2024 }));
    let json = serde_json::to_string(&cfg).unwrap();
    assert_eq!(
      json,
      r#"{"chartType":"line","showGridLines":true,"showLegend":true,"showTooltip":true,"editAnnotations":true,"showAnnotations":true,"yearRange":{"start":2020,"end":2024}}"#
    );
    let without_range = serde_json::to_string(&ChartConfig::new("bar", None)).unwrap();
    assert!(!without_range.contains("yearRange"));
  }
}
