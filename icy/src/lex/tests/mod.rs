use crate::lex::locate_span;
use crate::lex::PendingSpan;
use crate::lex::Span;
use crate::lex::SpanEnd;
use crate::lex::SpanKind;
use crate::lex::SpanKind::*;

fn check(line: &str, kind: SpanKind, start: usize, end: SpanEnd) {
  assert_eq!(locate_span(line, 1), Some(Span { kind, start, end }), "line {line:?}");
}

fn closed(line: &str, kind: SpanKind, text: &str) {
  let start = line.find(text).unwrap();
  check(line, kind, start, SpanEnd::Closed(start + text.len()));
}

#[test]
fn test_no_span() {
  assert_eq!(locate_span("x = y + 1", 1), None);
  assert_eq!(locate_span("", 1), None);
}

#[test]
fn test_char_literals() {
  closed("c = 'a'", LiteralChar, "'a'");
  closed("c = '\\''", LiteralChar, "'\\''");
  closed("c = '\\\\' + 1", LiteralChar, "'\\\\'");
  check("c = 'a", LiteralChar, 4, SpanEnd::Unterminated);
  closed("c = u8'a'", LiteralChar, "'a'");
}

#[test]
fn test_digit_separators() {
  assert_eq!(locate_span("x = 1'000'000", 1), None);
  assert_eq!(locate_span("mask = 0xFF'FF & 0b1010'1010", 1), None);
  closed("f(1'000, 'c')", LiteralChar, "'c'");
}

#[test]
fn test_string_literals() {
  closed("s = \"abc\";", LiteralString, "\"abc\"");
  closed("s = \"\"", LiteralString, "\"\"");
  closed("s = \"\\\\\" + t", LiteralString, "\"\\\\\"");
  closed("s = \"a \\\" b\"", LiteralString, "\"a \\\" b\"");
  check("x = \"abc", LiteralString, 4, SpanEnd::Unterminated);
  check("x = \"abc\\", LiteralString, 4, SpanEnd::Unterminated);
}

#[test]
fn test_earliest_span_wins() {
  closed("f(\"//\") // c", LiteralString, "\"//\"");
  closed("f('\"') \"x\"", LiteralChar, "'\"'");
  closed("x = 1 // \"not a string\"", CommentSingle, "// \"not a string\"");
  closed("x /* \"q\" */ = \"s\"", CommentMultiline, "/* \"q\" */");
}

#[test]
fn test_raw_strings() {
  closed("s = R\"(a \" b)\";", LiteralRawString, "R\"(a \" b)\"");
  closed("s = R\"xy(a )\" b)xy\";", LiteralRawString, "R\"xy(a )\" b)xy\"");
  check(
    "s = u8R\"--(first line",
    LiteralRawString,
    6,
    SpanEnd::Open(PendingSpan {
      kind: LiteralRawString,
      terminator: ")--\"".into(),
      line: 1,
    }),
  );
  // Not a raw string opener, just an identifier ending in R.
  closed("FOOR\"abc\"", LiteralString, "\"abc\"");
}

#[test]
fn test_block_comments() {
  closed("x = 1; /* c */ y", CommentMultiline, "/* c */");
  closed("/**/", CommentMultiline, "/**/");
  check(
    "x = 1; /* start",
    CommentMultiline,
    7,
    SpanEnd::Open(PendingSpan {
      kind: CommentMultiline,
      terminator: "*/".into(),
      line: 1,
    }),
  );
}

#[test]
fn test_pending_span_terminator() {
  let pending = PendingSpan {
    kind: LiteralRawString,
    terminator: ")x\"".into(),
    line: 3,
  };
  assert_eq!(pending.find_end("still inside"), None);
  assert_eq!(pending.find_end("end )x\"; tail"), Some(7));
}
