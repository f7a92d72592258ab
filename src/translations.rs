//! Merge translations found in grep output into a gettext catalog.
//!
//! Input is what `grep -B1 -A1 'msgstr "[^"]' messages.po` style commands print:
//!
//! ```text
//! --
//! ../src/locales/ro/messages.po-33-#: src/routes/cookie-policy.lazy.tsx:53
//! ../src/locales/ro/messages.po-34-msgid "Various Clerk cookies"
//! ../src/locales/ro/messages.po:35:msgstr "Diverse cookie-uri Clerk"
//! ```
//!
//! Each `msgid`/`msgstr` pair with a non-empty msgstr fills the matching
//! untranslated entry (`msgstr ""`) of the target catalog. Everything else in
//! the catalog is left byte-for-byte untouched.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{info, instrument, warn};

use crate::error::MergeError;

/// Quoted msgid (as written in the catalog, quotes included) -> quoted msgstr.
pub type Translations = HashMap<String, String>;

const EMPTY_QUOTED: &str = "\"\"";

fn grep_line_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  // `<file>.po-34-content` (context line) or `<file>.po:35:content` (match line).
  // Lazy prefix: the content itself may contain `.po-N-`.
  RE.get_or_init(|| Regex::new(r"^.*?\.po[-:](\d+)[-:](.+)$").expect("grep line regex is valid"))
}

/// Extract msgid -> msgstr pairs from grep output lines.
pub fn parse_grep_output<S: AsRef<str>>(lines: &[S]) -> Translations {
  let mut translations = Translations::new();
  let mut current_msgid: Option<String> = None;

  for raw in lines {
    let line = raw.as_ref().trim();
    if line.is_empty() || line == "--" {
      continue;
    }
    let Some(caps) = grep_line_re().captures(line) else {
      continue;
    };
    let content = &caps[2];

    if let Some(msgid) = content.strip_prefix("msgid ") {
      current_msgid = Some(msgid.trim().to_string());
    } else if let Some(msgstr) = content.strip_prefix("msgstr ") {
      let Some(msgid) = current_msgid.take() else {
        continue;
      };
      let value = msgstr.trim();
      if value.is_empty() || value == EMPTY_QUOTED {
        continue;
      }
      // header and multi-line entries start with an empty msgid
      if msgid == EMPTY_QUOTED {
        warn!(target: "translations", line = %line, "Skipping translation for empty msgid");
        continue;
      }
      translations.insert(msgid, value.to_string());
    }
  }
  translations
}

/// Fill empty msgstr lines that follow a msgid with a known translation.
/// Lines keep their terminators; returns the new lines and how many entries changed.
pub fn update_catalog<S: AsRef<str>>(catalog: &[S], translations: &Translations) -> (Vec<String>, usize) {
  let mut out = Vec::with_capacity(catalog.len());
  let mut updated = 0usize;
  let mut i = 0usize;

  while i < catalog.len() {
    let line = catalog[i].as_ref();
    out.push(line.to_string());

    if let Some(msgid) = line.trim().strip_prefix("msgid ") {
      let empty_msgstr = catalog.get(i + 1).map(|n| n.as_ref()).filter(|n| n.trim() == "msgstr \"\"");
      if let Some(replaced) = empty_msgstr {
        if let Some(t) = translations.get(msgid.trim()) {
          out.push(format!("msgstr {}{}", t, line_ending(replaced)));
          updated += 1;
          i += 2;
          continue;
        }
      }
    }
    i += 1;
  }
  (out, updated)
}

fn line_ending(line: &str) -> &'static str {
  if line.ends_with("\r\n") {
    "\r\n"
  } else if line.ends_with('\n') {
    "\n"
  } else {
    ""
  }
}

/// Split text into lines, keeping each line's terminator.
pub fn split_lines(text: &str) -> Vec<&str> {
  text.split_inclusive('\n').collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
  pub input_lines: usize,
  pub translations_found: usize,
  pub catalog_lines: usize,
  pub updated: usize,
}

/// Parse `input`, apply the translations to the catalog at `catalog_path`, and
/// write it back when at least one entry changed.
#[instrument(level = "info", skip(input), fields(catalog = %catalog_path.display()))]
pub fn merge_translations(input: &str, catalog_path: &Path) -> Result<MergeReport, MergeError> {
  let input_lines = split_lines(input);
  if input_lines.is_empty() {
    return Err(MergeError::NoInput);
  }

  info!(target: "translations", lines = input_lines.len(), "Parsing input");
  let translations = parse_grep_output(&input_lines);
  info!(target: "translations", found = translations.len(), "Translations parsed");

  let mut report = MergeReport {
    input_lines: input_lines.len(),
    translations_found: translations.len(),
    ..MergeReport::default()
  };
  if translations.is_empty() {
    warn!(target: "translations", "No translations found in input");
    return Ok(report);
  }

  let text = std::fs::read_to_string(catalog_path).map_err(|e| MergeError::io(catalog_path, e))?;
  let catalog = split_lines(&text);
  report.catalog_lines = catalog.len();
  info!(target: "translations", lines = catalog.len(), "Catalog read");

  let (lines, updated) = update_catalog(&catalog, &translations);
  report.updated = updated;

  if updated > 0 {
    std::fs::write(catalog_path, lines.concat()).map_err(|e| MergeError::io(catalog_path, e))?;
    info!(target: "translations", updated, "Catalog updated");
  } else {
    info!(target: "translations", "No updates needed; all translations already present");
  }
  Ok(report)
}
