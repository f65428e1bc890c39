use crate::error::DiagnosticType;
use crate::error::Diagnostics;
use crate::lex::locate_span;
use crate::lex::PendingSpan;
use crate::lex::SpanEnd;
use crate::lex::SpanKind;

/// A physical line split into verbatim fragments and the code they surround.
///
/// Rendering yields `left` in order, then `code`, then `right` in reverse discovery order: the
/// trailing line comment is found last in the scan but stays rightmost, and synthesized
/// punctuation appended to `code` lands strictly before it.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct StrippedLine {
  /// Code and literals up to and including the last literal, reproduced byte for byte.
  pub left: Vec<String>,
  /// Code after the last literal.
  pub code: String,
  /// Trailing line comment and trailing whitespace.
  pub right: Vec<String>,
  /// The code of the line with every literal collapsed to a placeholder and comments dropped.
  /// Every classification runs on this rather than on the raw text.
  pub skeleton: String,
}

impl StrippedLine {
  /// A line that is not lexed at all, such as a preprocessor directive.
  pub fn verbatim(text: &str) -> StrippedLine {
    let mut line = StrippedLine::default();
    line.set_code(text);
    line
  }

  fn set_code(&mut self, rest: &str) {
    let code = rest.trim_end();
    if code.len() < rest.len() {
      self.right.push(rest[code.len()..].to_string());
    }
    self.skeleton.push_str(code);
    self.code = code.to_string();
  }

  /// Inserts verbatim text at the very start, e.g. the tail of a span closed on this line.
  pub fn prepend(&mut self, fragment: &str) {
    self.left.insert(0, fragment.to_string());
  }

  /// Appends synthesized code after the existing code and before any trailing comment.
  pub fn append_code(&mut self, text: &str) {
    self.code.push_str(text);
  }

  /// Last non-whitespace character of the analysis text.
  pub fn last_char(&self) -> Option<char> {
    self.skeleton.trim_end().chars().last()
  }

  pub fn ends_with(&self, c: char) -> bool {
    self.last_char() == Some(c)
  }

  pub fn render(&self) -> String {
    let mut out = self.left.concat();
    out.push_str(&self.code);
    for fragment in self.right.iter().rev() {
      out.push_str(fragment);
    }
    out
  }
}

/// Splits `text` into code and non-code fragments.
///
/// Stops early when a raw string or block comment stays open past the end of the line, returning
/// it so the caller can look for its terminator on following lines. Literals without a closing
/// quote are diagnosed and swallow the rest of the line.
pub fn strip_line(
  text: &str,
  line_num: usize,
  diagnostics: &mut Diagnostics,
) -> (StrippedLine, Option<PendingSpan>) {
  let mut line = StrippedLine::default();
  let mut pending = None;
  let mut rest = text;
  while let Some(span) = locate_span(rest, line_num) {
    if span.kind == SpanKind::CommentSingle {
      line.right.push(rest[span.start..].to_string());
      rest = &rest[..span.start];
      break;
    };
    line.skeleton.push_str(&rest[..span.start]);
    line.skeleton.push_str(span.kind.placeholder());
    match span.end {
      SpanEnd::Closed(end) => {
        line.left.push(rest[..end].to_string());
        rest = &rest[end..];
      }
      SpanEnd::Open(open) => {
        line.left.push(rest.to_string());
        rest = "";
        pending = Some(open);
        break;
      }
      SpanEnd::Unterminated => {
        diagnostics.push(line_num, match span.kind {
          SpanKind::LiteralChar => DiagnosticType::UnterminatedCharLiteral,
          _ => DiagnosticType::UnterminatedStringLiteral,
        });
        line.left.push(rest.to_string());
        rest = "";
        break;
      }
    };
  }
  line.set_code(rest);
  (line, pending)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn strip(text: &str) -> (StrippedLine, Option<PendingSpan>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let (line, pending) = strip_line(text, 1, &mut diagnostics);
    (line, pending, diagnostics)
  }

  #[test]
  fn plain_code_is_untouched() {
    let (line, pending, diagnostics) = strip("    x = y + 1");
    assert!(line.left.is_empty());
    assert_eq!(line.code, "    x = y + 1");
    assert_eq!(line.skeleton, "    x = y + 1");
    assert!(pending.is_none());
    assert!(diagnostics.is_empty());
  }

  #[test]
  fn literals_become_placeholders_in_skeleton() {
    let (line, _, _) = strip("f(\"a{\", 'x', \"b;\")");
    assert_eq!(line.left, vec!["f(\"a{\"", ", 'x'", ", \"b;\""]);
    assert_eq!(line.code, ")");
    assert_eq!(line.skeleton, "f(\"\", '', \"\")");
    assert_eq!(line.render(), "f(\"a{\", 'x', \"b;\")");
  }

  #[test]
  fn semicolon_lands_before_trailing_comment() {
    let (mut line, _, _) = strip("x = \"s\"  // done {");
    assert_eq!(line.code, "");
    assert_eq!(line.right, vec!["// done {", "  "]);
    assert_eq!(line.last_char(), Some('"'));
    line.append_code(";");
    assert_eq!(line.render(), "x = \"s\";  // done {");
  }

  #[test]
  fn trailing_whitespace_stays_rightmost() {
    let (mut line, _, _) = strip("foo()   ");
    line.append_code(";");
    assert_eq!(line.render(), "foo();   ");
  }

  #[test]
  fn block_comment_left_open() {
    let (line, pending, diagnostics) = strip("x = 1 /* note");
    assert_eq!(line.render(), "x = 1 /* note");
    assert_eq!(line.skeleton, "x = 1  ");
    assert_eq!(line.last_char(), Some('1'));
    let pending = pending.expect("block comment should stay open");
    assert_eq!(pending.kind, SpanKind::CommentMultiline);
    assert_eq!(pending.terminator, "*/");
    assert!(diagnostics.is_empty());
  }

  #[test]
  fn unterminated_string_is_diagnosed_once() {
    let (line, pending, diagnostics) = strip("x = \"abc");
    assert!(pending.is_none());
    assert_eq!(line.render(), "x = \"abc");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
      diagnostics.on_line(1)[0].typ,
      DiagnosticType::UnterminatedStringLiteral
    );
  }

  #[test]
  fn verbatim_keeps_text_as_code() {
    let line = StrippedLine::verbatim("#define X(a) \\  ");
    assert_eq!(line.code, "#define X(a) \\");
    assert!(line.ends_with('\\'));
    assert_eq!(line.render(), "#define X(a) \\  ");
  }
}
