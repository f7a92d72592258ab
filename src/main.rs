use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{info, instrument};

use chart_links::config::load_config;
use chart_links::domain::{AccountCategory, DEFAULT_CHART_TYPE, DEFAULT_END_YEAR, DEFAULT_START_YEAR};
use chart_links::translations::merge_translations;
use chart_links::{decode_chart_url, telemetry, ChartLinkBuilder, EntityScope, LinkConfig, LinkRequest, MergeError};

#[derive(Debug, Parser)]
#[command(name = "chart-links", version, about = "Chart deep links and translation maintenance")]
struct Cli {
  /// TOML config (falls back to CHART_LINKS_CONFIG)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Build a chart link and the matching entity link
  Chart(ChartArgs),
  /// Print the chart record carried by a chart link
  Decode { url: String },
  /// Fill empty msgstr entries from grep output read on stdin
  MergeTranslations {
    /// Catalog to update (default from config)
    #[arg(long)]
    catalog: Option<PathBuf>,
  },
}

#[derive(Debug, Args)]
struct ChartArgs {
  /// Entity fiscal code (CUI); repeat for several entities
  #[arg(long = "cui")]
  cuis: Vec<String>,
  /// ch (spending) or vn (revenue)
  #[arg(long, default_value = "ch")]
  account: AccountCategory,
  #[arg(long, default_value = DEFAULT_CHART_TYPE)]
  chart_type: String,
  #[arg(long)]
  title: Option<String>,
  #[arg(long)]
  description: Option<String>,
  #[arg(long, default_value_t = DEFAULT_START_YEAR)]
  start_year: i32,
  #[arg(long, default_value_t = DEFAULT_END_YEAR)]
  end_year: i32,
  /// Single year; overrides --start-year/--end-year
  #[arg(long)]
  year: Option<i32>,
  #[arg(long = "economic-prefix")]
  economic_prefixes: Vec<String>,
  #[arg(long = "functional-prefix")]
  functional_prefixes: Vec<String>,
  #[arg(long = "entity-type")]
  entity_types: Vec<String>,
  /// Add year= to the entity link
  #[arg(long)]
  scope_year: bool,
  /// Add the first functional prefix as search to the entity link
  #[arg(long)]
  scope_classification: bool,
  /// Override the configured base URL
  #[arg(long)]
  base_url: Option<String>,
  /// Print links as a JSON object
  #[arg(long)]
  json: bool,
}

impl ChartArgs {
  fn to_request(&self) -> LinkRequest {
    LinkRequest {
      entity_cuis: self.cuis.clone(),
      account_category: self.account,
      chart_type: self.chart_type.clone(),
      title: self.title.clone(),
      description: self.description.clone(),
      start_year: self.start_year,
      end_year: self.end_year,
      year: self.year,
      economic_prefixes: self.economic_prefixes.clone(),
      functional_prefixes: self.functional_prefixes.clone(),
      entity_types: self.entity_types.clone(),
      entity_scope: EntityScope { year: self.scope_year, classification: self.scope_classification },
    }
  }
}

#[instrument(level = "info", skip_all)]
fn run_chart(config: LinkConfig, args: &ChartArgs) -> anyhow::Result<()> {
  let config = match &args.base_url {
    Some(url) => config.with_base_url(url.as_str()),
    None => config,
  };
  let builder = ChartLinkBuilder::new(config);
  let links = builder.build(&args.to_request()).context("building chart links")?;
  info!(target: "chart_links", base_url = %builder.base_url(), has_entity_url = links.entity_url.is_some(), "Links generated");

  if args.json {
    println!("{}", serde_json::to_string_pretty(&links)?);
  } else {
    println!("{}", links.chart_url);
    if let Some(entity_url) = &links.entity_url {
      println!("{}", entity_url);
    }
  }
  Ok(())
}

fn run_decode(url: &str) -> anyhow::Result<()> {
  let record = decode_chart_url(url).context("decoding chart link")?;
  println!("{}", serde_json::to_string_pretty(&record)?);
  Ok(())
}

fn run_merge(config: LinkConfig, catalog: Option<PathBuf>) -> anyhow::Result<()> {
  let path = catalog.unwrap_or(config.translations.catalog_path);
  let mut input = String::new();
  std::io::stdin().read_to_string(&mut input).context("reading stdin")?;

  match merge_translations(&input, &path) {
    Ok(report) => {
      info!(target: "translations", found = report.translations_found, updated = report.updated, catalog = %path.display(), "Merge finished");
      Ok(())
    }
    Err(MergeError::NoInput) => {
      eprintln!("Error: No input provided. Please pipe grep output to this command.");
      eprintln!("Example: cat grep_output.txt | chart-links merge-translations");
      std::process::exit(1);
    }
    Err(e) => Err(e.into()),
  }
}

fn main() -> anyhow::Result<()> {
  telemetry::init_tracing();
  let cli = Cli::parse();
  let config = load_config(cli.config.as_deref());

  match cli.command {
    Command::Chart(args) => run_chart(config, &args),
    Command::Decode { url } => run_decode(&url),
    Command::MergeTranslations { catalog } => run_merge(config, catalog),
  }
}
