use crate::indent::Indent;
use crate::strip::StrippedLine;

/// One statement or declaration, possibly spread over several physical lines.
#[derive(Clone, Debug)]
pub struct LogicalLine {
  /// Analysis text of each physical line so far.
  pub lines: Vec<String>,
  /// Still absorbing the following physical line.
  pub join_next: bool,
  /// Indentation of the first physical line.
  pub indent: Indent,
  pub preprocessor: bool,
  /// 1-based line where the logical line starts.
  pub line: usize,
}

impl LogicalLine {
  /// Takes the previous logical line and either extends it with `text` (if it was still joining)
  /// or starts a new one from `text`.
  pub fn advance(
    prev: Option<LogicalLine>,
    text: String,
    join_next: bool,
    indent: Indent,
    preprocessor: bool,
    line: usize,
  ) -> LogicalLine {
    match prev {
      Some(mut prev) if prev.join_next => {
        prev.lines.push(text);
        prev.join_next = join_next;
        prev
      }
      _ => LogicalLine {
        lines: vec![text],
        join_next,
        indent,
        preprocessor,
        line,
      },
    }
  }

  /// The logical line this physical line belongs to, if it continues one.
  pub fn continued(prev: &Option<LogicalLine>) -> Option<&LogicalLine> {
    prev.as_ref().filter(|l| l.join_next)
  }

  pub fn text(&self) -> String {
    self.lines.concat()
  }
}

/// Decides whether the physical line `line` continues onto the next one.
///
/// `indent` is the effective indentation of the logical line and `next_indent` that of the next
/// code line. An open raw string or block comment always joins, as does a trailing backslash.
/// Otherwise a statement joins its deeper-indented successor unless it already ends with `{` or
/// `;`. Preprocessor directives only ever join through a backslash.
pub fn joins_next(
  line: &StrippedLine,
  preprocessor: bool,
  indent: usize,
  next_indent: usize,
  span_pending: bool,
) -> bool {
  if span_pending || line.ends_with('\\') {
    return true;
  };
  !preprocessor && !line.ends_with('{') && !line.ends_with(';') && next_indent > indent
}
