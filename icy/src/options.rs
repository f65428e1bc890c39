use serde::Deserialize;
use serde::Serialize;

/// How a run presents its output and which end-of-input conditions it reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TranspileOptions {
  /// Append synthesized closers to the line that triggered them instead of emitting each on a new
  /// line indented like the scope it closes.
  pub preserve_line_numbers: bool,
  pub tab_width: usize,
  /// Raw strings left open at end of input are always diagnosed; block comments only when this
  /// is set.
  pub unterminated_block_comment_is_error: bool,
  /// Close scopes still open at end of input as if a top-level line followed. When unset, they
  /// are reported as unmatched opening brackets instead.
  pub close_at_end_of_input: bool,
}

impl Default for TranspileOptions {
  fn default() -> Self {
    Self {
      preserve_line_numbers: true,
      tab_width: 8,
      unterminated_block_comment_is_error: true,
      close_at_end_of_input: false,
    }
  }
}

impl TranspileOptions {
  pub fn with_preserve_line_numbers(mut self, preserve: bool) -> Self {
    self.preserve_line_numbers = preserve;
    self
  }

  pub fn with_tab_width(mut self, tab_width: usize) -> Self {
    self.tab_width = tab_width;
    self
  }

  pub fn with_unterminated_block_comment_is_error(mut self, is_error: bool) -> Self {
    self.unterminated_block_comment_is_error = is_error;
    self
  }

  pub fn with_close_at_end_of_input(mut self, close: bool) -> Self {
    self.close_at_end_of_input = close;
    self
  }
}
