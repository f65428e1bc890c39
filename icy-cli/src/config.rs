use anyhow::Context;
use icy::TranspileOptions;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Settings read from a JSON config file. Anything left out keeps the value it already had.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawConfig {
  #[serde(default)]
  preserve_line_numbers: Option<bool>,
  #[serde(default)]
  tab_width: Option<usize>,
  #[serde(default)]
  unterminated_block_comment_is_error: Option<bool>,
  #[serde(default)]
  close_at_end_of_input: Option<bool>,
}

impl RawConfig {
  pub fn apply(&self, mut options: TranspileOptions) -> TranspileOptions {
    if let Some(preserve) = self.preserve_line_numbers {
      options = options.with_preserve_line_numbers(preserve);
    }
    if let Some(tab_width) = self.tab_width {
      options = options.with_tab_width(tab_width);
    }
    if let Some(is_error) = self.unterminated_block_comment_is_error {
      options = options.with_unterminated_block_comment_is_error(is_error);
    }
    if let Some(close) = self.close_at_end_of_input {
      options = options.with_close_at_end_of_input(close);
    }
    options
  }
}

pub fn load_config(path: &Path) -> anyhow::Result<RawConfig> {
  let text =
    fs::read_to_string(path).with_context(|| format!("failed to read config {}", path.display()))?;
  serde_json::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
}
