//! Locating the non-code spans of a line: character and string literals, multi-line raw strings,
//! block comments and line comments.

use aho_corasick::AhoCorasick;
use aho_corasick::AhoCorasickBuilder;
use aho_corasick::AhoCorasickKind;
use aho_corasick::MatchKind;
use memchr::memchr2;
use memchr::memmem;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

#[cfg(test)]
mod tests;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub enum SpanKind {
  CommentMultiline,
  CommentSingle,
  LiteralChar,
  LiteralRawString,
  LiteralString,
}

impl SpanKind {
  /// What the span leaves behind in a line's analysis text. Literals stay visible as values so a
  /// statement ending in one still gets terminated; comments vanish but must not fuse neighbours.
  pub fn placeholder(self) -> &'static str {
    match self {
      SpanKind::LiteralChar => "''",
      SpanKind::LiteralString | SpanKind::LiteralRawString => "\"\"",
      SpanKind::CommentMultiline => " ",
      SpanKind::CommentSingle => "",
    }
  }
}

/// A raw string or block comment left open at the end of a line.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct PendingSpan {
  pub kind: SpanKind,
  pub terminator: String,
  /// Line that opened the span.
  pub line: usize,
}

impl PendingSpan {
  /// Byte offset just past the terminator, if `text` contains it.
  pub fn find_end(&self, text: &str) -> Option<usize> {
    memmem::find(text.as_bytes(), self.terminator.as_bytes()).map(|pos| pos + self.terminator.len())
  }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum SpanEnd {
  /// Offset just past the closing delimiter.
  Closed(usize),
  /// The span continues onto following lines.
  Open(PendingSpan),
  /// A character or string literal with no closing quote on this line.
  Unterminated,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Span {
  pub kind: SpanKind,
  pub start: usize,
  pub end: SpanEnd,
}

struct SpanMatcher {
  kinds: Vec<SpanKind>,
  matcher: AhoCorasick,
}

impl SpanMatcher {
  fn new(patterns: Vec<(SpanKind, &str)>) -> Self {
    let (kinds, syns): (Vec<_>, Vec<_>) = patterns.into_iter().unzip();
    let matcher = AhoCorasickBuilder::new()
      .kind(Some(AhoCorasickKind::DFA))
      .match_kind(MatchKind::LeftmostFirst)
      .build(syns)
      .expect("span openers are valid patterns");
    SpanMatcher { kinds, matcher }
  }

  fn find(&self, line: &str) -> Option<(SpanKind, usize)> {
    self
      .matcher
      .find(line)
      .map(|m| (self.kinds[m.pattern().as_usize()], m.start()))
  }
}

static SPAN_OPENERS: Lazy<SpanMatcher> = Lazy::new(|| {
  SpanMatcher::new(vec![
    (SpanKind::LiteralChar, "'"),
    (SpanKind::LiteralString, "\""),
    // Starts one byte before the `"` it shares, so leftmost matching prefers it.
    (SpanKind::LiteralRawString, "R\""),
    (SpanKind::CommentMultiline, "/*"),
    (SpanKind::CommentSingle, "//"),
  ])
});

// Delimiters are at most 16 chars and cannot contain parentheses, backslashes or whitespace.
static RAW_STRING_OPENER: Lazy<Regex> =
  Lazy::new(|| Regex::new(r#"^R"([^()\\\s]{0,16})\("#).expect("raw string opener regex is valid"));

const BLOCK_COMMENT_TERMINATOR: &str = "*/";

/// Finds the earliest-starting non-code span on `line`.
///
/// A line comment always runs to the end of the line. Raw strings and block comments that do not
/// close on this line come back as [`SpanEnd::Open`], to be carried into the next line.
pub fn locate_span(line: &str, line_num: usize) -> Option<Span> {
  let mut from = 0;
  let (kind, start) = loop {
    let (kind, start) = SPAN_OPENERS.find(&line[from..])?;
    let start = from + start;
    if kind == SpanKind::LiteralChar && is_digit_separator(line, start) {
      from = start + 1;
      continue;
    };
    break (kind, start);
  };
  let span = match kind {
    SpanKind::LiteralChar | SpanKind::LiteralString => lex_quoted(line, kind, start),
    SpanKind::LiteralRawString => match RAW_STRING_OPENER.captures(&line[start..]) {
      Some(caps) => {
        let body = start + caps[0].len();
        let terminator = format!("){}\"", &caps[1]);
        lex_delimited(line, kind, start, body, terminator, line_num)
      }
      // An identifier ending in `R` right before an ordinary string.
      None => lex_quoted(line, SpanKind::LiteralString, start + 1),
    },
    SpanKind::CommentMultiline => lex_delimited(
      line,
      kind,
      start,
      start + 2,
      BLOCK_COMMENT_TERMINATOR.to_string(),
      line_num,
    ),
    SpanKind::CommentSingle => Span {
      kind,
      start,
      end: SpanEnd::Closed(line.len()),
    },
  };
  Some(span)
}

/// A `'` inside a number literal, as in `1'000` or `0xFF'FF`. Prefixed character literals like
/// `u8'a'` start with a letter and are not affected.
fn is_digit_separator(line: &str, quote: usize) -> bool {
  let bytes = line.as_bytes();
  let token_start = bytes[..quote]
    .iter()
    .rev()
    .take_while(|b| b.is_ascii_alphanumeric() || **b == b'\'' || **b == b'_')
    .last();
  token_start.is_some_and(|b| b.is_ascii_digit())
    && bytes.get(quote + 1).is_some_and(|b| b.is_ascii_hexdigit())
}

fn lex_quoted(line: &str, kind: SpanKind, start: usize) -> Span {
  let bytes = line.as_bytes();
  let quote = bytes[start];
  let mut next = start + 1;
  let end = loop {
    match memchr2(b'\\', quote, &bytes[next..]) {
      None => break SpanEnd::Unterminated,
      Some(pos) if bytes[next + pos] == b'\\' => {
        // Skip the escaped byte, whatever it is.
        next += pos + 2;
        if next >= bytes.len() {
          break SpanEnd::Unterminated;
        }
      }
      Some(pos) => break SpanEnd::Closed(next + pos + 1),
    }
  };
  Span { kind, start, end }
}

fn lex_delimited(
  line: &str,
  kind: SpanKind,
  start: usize,
  body: usize,
  terminator: String,
  line_num: usize,
) -> Span {
  let end = match memmem::find(line[body..].as_bytes(), terminator.as_bytes()) {
    Some(pos) => SpanEnd::Closed(body + pos + terminator.len()),
    None => SpanEnd::Open(PendingSpan {
      kind,
      terminator,
      line: line_num,
    }),
  };
  Span { kind, start, end }
}
