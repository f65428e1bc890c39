use crate::char::INDENT_WHITESPACE;
use crate::char::TAB;
use serde::Serialize;

/// The leading whitespace of a line.
///
/// Indents compare by `level` only. `prefix` is kept verbatim so synthesized lines can reuse the
/// exact whitespace of the line they close.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default, Serialize)]
pub struct Indent {
  pub level: usize,
  pub prefix: String,
}

impl Indent {
  /// Measures the indentation of `line`, counting each tab as `tab_width` columns.
  pub fn measure(line: &str, tab_width: usize) -> Indent {
    let prefix = &line[..INDENT_WHITESPACE.prefix_len(line)];
    let level = prefix
      .chars()
      .map(|c| if c == TAB { tab_width } else { 1 })
      .sum();
    Indent {
      level,
      prefix: prefix.to_string(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::Indent;

  #[test]
  fn spaces_count_one_column() {
    let indent = Indent::measure("    x = 1", 8);
    assert_eq!(indent.level, 4);
    assert_eq!(indent.prefix, "    ");
  }

  #[test]
  fn tabs_count_tab_width_columns() {
    assert_eq!(Indent::measure("\tx", 8).level, 8);
    assert_eq!(Indent::measure("\t  x", 8).level, 10);
    assert_eq!(Indent::measure("\t\tx", 4).level, 8);
  }

  #[test]
  fn blank_and_unindented_lines() {
    assert_eq!(Indent::measure("", 8), Indent::default());
    assert_eq!(Indent::measure("x", 8).level, 0);
    assert_eq!(Indent::measure("   ", 8).level, 3);
  }
}
