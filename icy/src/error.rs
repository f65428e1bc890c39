use core::fmt;
use core::fmt::Formatter;
use serde::ser::SerializeStruct;
use serde::Serialize;
use serde::Serializer;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;
use std::str::Utf8Error;
use tracing::debug;

/// A stable classification of the problems found while transpiling.
///
/// Every problem is attributed to a line and is recoverable: the run continues and the output is
/// still produced, though it should not be trusted while any diagnostic exists.
///
/// Diagnostic codes (prefix `IC`) are assigned per variant and are stable:
/// - `IC0001`: [`DiagnosticType::UnterminatedCharLiteral`]
/// - `IC0002`: [`DiagnosticType::UnterminatedStringLiteral`]
/// - `IC0003`: [`DiagnosticType::UnterminatedRawString`]
/// - `IC0004`: [`DiagnosticType::UnterminatedBlockComment`]
/// - `IC0005`: [`DiagnosticType::UnmatchedClosingBracket`]
/// - `IC0006`: [`DiagnosticType::UnmatchedOpeningBracket`]
/// - `IC0007`: [`DiagnosticType::AmbiguousIndentation`]
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum DiagnosticType {
  UnterminatedCharLiteral,
  UnterminatedStringLiteral,
  UnterminatedRawString { terminator: String },
  UnterminatedBlockComment,
  /// A closing brace with no open bracket at its indentation. Carries the offending source line.
  UnmatchedClosingBracket { source: String },
  /// An opening brace never closed. Carries the offending source line.
  UnmatchedOpeningBracket { source: String },
  /// A dedent landing strictly between two scope indentations.
  AmbiguousIndentation { lower: usize, upper: usize },
}

impl DiagnosticType {
  /// Stable diagnostic code for this variant.
  pub fn code(&self) -> &'static str {
    match self {
      DiagnosticType::UnterminatedCharLiteral => "IC0001",
      DiagnosticType::UnterminatedStringLiteral => "IC0002",
      DiagnosticType::UnterminatedRawString { .. } => "IC0003",
      DiagnosticType::UnterminatedBlockComment => "IC0004",
      DiagnosticType::UnmatchedClosingBracket { .. } => "IC0005",
      DiagnosticType::UnmatchedOpeningBracket { .. } => "IC0006",
      DiagnosticType::AmbiguousIndentation { .. } => "IC0007",
    }
  }

  /// Human-readable message describing this diagnostic.
  pub fn message(&self) -> String {
    match self {
      DiagnosticType::UnterminatedCharLiteral => {
        "terminating quote not found for character literal".into()
      }
      DiagnosticType::UnterminatedStringLiteral => {
        "terminating quote not found for string literal".into()
      }
      DiagnosticType::UnterminatedRawString { terminator } => {
        format!("terminating delimiter `{terminator}` not found for raw string literal")
      }
      DiagnosticType::UnterminatedBlockComment => {
        "terminating `*/` not found for block comment".into()
      }
      DiagnosticType::UnmatchedClosingBracket { source } => {
        format!("could not find opening parenthesis for: {source}")
      }
      DiagnosticType::UnmatchedOpeningBracket { source } => {
        format!("could not find closing parenthesis for: {source}")
      }
      DiagnosticType::AmbiguousIndentation { lower, upper } => {
        format!("expected indentation to be either {lower} or {upper} spaces equivalent")
      }
    }
  }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Diagnostic {
  /// 1-based input line.
  pub line: usize,
  pub typ: DiagnosticType,
}

impl Diagnostic {
  pub fn new(line: usize, typ: DiagnosticType) -> Diagnostic {
    Diagnostic { line, typ }
  }

  pub fn code(&self) -> &'static str {
    self.typ.code()
  }

  pub fn message(&self) -> String {
    self.typ.message()
  }
}

impl Display for Diagnostic {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "line {}: [{}] {}", self.line, self.code(), self.message())
  }
}

impl Error for Diagnostic {}

impl Serialize for Diagnostic {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut state = serializer.serialize_struct("Diagnostic", 3)?;
    state.serialize_field("line", &self.line)?;
    state.serialize_field("code", self.code())?;
    state.serialize_field("message", &self.message())?;
    state.end()
  }
}

/// Diagnostics keyed by 1-based line, each line keeping discovery order.
///
/// Lines without problems are simply absent; [`Diagnostics::on_line`] returns an empty slice for
/// them.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct Diagnostics {
  by_line: BTreeMap<usize, Vec<Diagnostic>>,
}

impl Diagnostics {
  pub fn new() -> Diagnostics {
    Diagnostics::default()
  }

  pub fn push(&mut self, line: usize, typ: DiagnosticType) {
    debug!(line, code = typ.code(), "diagnostic recorded");
    self
      .by_line
      .entry(line)
      .or_default()
      .push(Diagnostic::new(line, typ));
  }

  pub fn on_line(&self, line: usize) -> &[Diagnostic] {
    self.by_line.get(&line).map(Vec::as_slice).unwrap_or_default()
  }

  pub fn messages(&self, line: usize) -> Vec<String> {
    self.on_line(line).iter().map(Diagnostic::message).collect()
  }

  /// Lines with at least one diagnostic, ascending.
  pub fn lines(&self) -> impl Iterator<Item = usize> + '_ {
    self.by_line.keys().copied()
  }

  /// All diagnostics, by ascending line.
  pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
    self.by_line.values().flatten()
  }

  pub fn len(&self) -> usize {
    self.by_line.values().map(Vec::len).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.by_line.is_empty()
  }
}

impl Serialize for Diagnostics {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(self.iter())
  }
}

/// Failures that stop a run before any line is looked at.
#[derive(Debug, thiserror::Error)]
pub enum TranspileError {
  #[error("input is not valid UTF-8: {0}")]
  InvalidUtf8(#[from] Utf8Error),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn diagnostics_keep_per_line_discovery_order() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.push(7, DiagnosticType::UnterminatedStringLiteral);
    diagnostics.push(2, DiagnosticType::UnterminatedCharLiteral);
    diagnostics.push(7, DiagnosticType::AmbiguousIndentation { lower: 0, upper: 4 });

    assert_eq!(diagnostics.len(), 3);
    assert_eq!(diagnostics.lines().collect::<Vec<_>>(), vec![2, 7]);
    assert_eq!(
      diagnostics.messages(7),
      vec![
        "terminating quote not found for string literal".to_string(),
        "expected indentation to be either 0 or 4 spaces equivalent".to_string(),
      ]
    );
    assert!(diagnostics.on_line(3).is_empty());
    let order: Vec<_> = diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(order, vec![2, 7, 7]);
  }

  #[test]
  fn codes_are_stable() {
    assert_eq!(DiagnosticType::UnterminatedCharLiteral.code(), "IC0001");
    assert_eq!(
      DiagnosticType::UnmatchedOpeningBracket {
        source: "void f() {".into()
      }
      .code(),
      "IC0006"
    );
  }

  #[test]
  fn display_includes_line_code_and_message() {
    let diagnostic = Diagnostic::new(
      3,
      DiagnosticType::UnmatchedClosingBracket { source: "}".into() },
    );
    assert_eq!(
      diagnostic.to_string(),
      "line 3: [IC0005] could not find opening parenthesis for: }"
    );
  }
}
