//! Line roles and scope classification, decided from line text alone.

use crate::scope::ScopeKind;
use once_cell::sync::Lazy;
use regex::Regex;

fn pattern(re: &str) -> Regex {
  Regex::new(re).expect("line pattern is valid")
}

static FULL_LINE_COMMENT: Lazy<Regex> = Lazy::new(|| pattern(r"^\s*//"));
// Access specifiers (including Qt-style `public slots:`), `default:` and `case ...:`, optionally
// followed by a comment.
static LABEL: Lazy<Regex> = Lazy::new(|| {
  pattern(
    r"^\s*(?:(?:public|private|protected)(?:\s+\w+)?|default|case\b[^;{}]*)\s*:\s*(?://.*|/\*.*\*/\s*)?$",
  )
});
static PREPROCESSOR: Lazy<Regex> = Lazy::new(|| pattern(r"^\s*#"));
static TEMPLATE: Lazy<Regex> = Lazy::new(|| pattern(r"^\s*template\s*<"));

static PREPROCESSOR_CONDITIONAL: Lazy<Regex> = Lazy::new(|| {
  pattern(r"^\s*#\s*(?:(?:if|ifdef|ifndef|elif|elifdef|elifndef)\s.+|else\b)")
});
// What may sit between the `(` or `,` and the brace: nothing, or a type name like
// `std::pair<int, int>`.
static VALUE_TAIL: Lazy<Regex> =
  Lazy::new(|| pattern(r"[(,]\s*(?:[A-Za-z_][\w:]*(?:\s*<[^(){};]*>)?\s*)?$"));
static ENUM: Lazy<Regex> = Lazy::new(|| pattern(r"^\s*(?:typedef\s+)?enum\b.*\{$"));
static IF: Lazy<Regex> = Lazy::new(|| {
  pattern(r"^(?:.*[\s}])?if\s*(?:!?\s*consteval\s*|(?:constexpr\s*)?\(.+\)\s*)\{$")
});
static DO: Lazy<Regex> = Lazy::new(|| pattern(r"^(?:.*[\s}])?do\s*\{$"));
static TRY: Lazy<Regex> = Lazy::new(|| pattern(r"^\s*try\s*\{$"));
static LONELY_OPENING_BRACE: Lazy<Regex> = Lazy::new(|| pattern(r"^\s*\{$"));

pub fn is_blank_or_comment(line: &str) -> bool {
  line.trim().is_empty() || FULL_LINE_COMMENT.is_match(line)
}

pub fn is_label(line: &str) -> bool {
  LABEL.is_match(line)
}

/// Lines copied to the output untouched, without affecting any state.
pub fn is_passthrough(line: &str) -> bool {
  is_blank_or_comment(line) || is_label(line)
}

pub fn is_preprocessor(line: &str) -> bool {
  PREPROCESSOR.is_match(line)
}

/// A line starting with `}`. Covers `}`, `};`, `} else {` and `} while (x)`, all of which supply
/// the close of the block before them.
pub fn is_lonely_closing_brace(line: &str) -> bool {
  line.trim_start().starts_with('}')
}

pub fn is_template_declaration(text: &str) -> bool {
  TEMPLATE.is_match(text)
}

/// Whether `text` ends with a brace opening an initializer inside an unclosed argument list, like
/// `v.push_back({` or `f(a, Point{`.
pub fn is_value_brace(text: &str) -> bool {
  let Some(head) = text.trim_end().strip_suffix('{') else {
    return false;
  };
  let depth = head.chars().fold(0isize, |depth, c| match c {
    '(' => depth + 1,
    ')' => depth - 1,
    _ => depth,
  });
  depth > 0 && VALUE_TAIL.is_match(head)
}

fn is_preprocessor_conditional(text: &str) -> bool {
  PREPROCESSOR_CONDITIONAL.is_match(text)
}

fn is_enum(text: &str) -> bool {
  ENUM.is_match(text)
}

fn is_if(text: &str) -> bool {
  IF.is_match(text)
}

fn is_do(text: &str) -> bool {
  DO.is_match(text)
}

fn is_try(text: &str) -> bool {
  TRY.is_match(text)
}

fn is_lonely_opening_brace(text: &str) -> bool {
  LONELY_OPENING_BRACE.is_match(text)
}

// Later entries are looser, so order matters.
const SCOPE_PATTERNS: [(ScopeKind, fn(&str) -> bool); 7] = [
  (ScopeKind::PreprocessorConditional, is_preprocessor_conditional),
  (ScopeKind::Value, is_value_brace),
  (ScopeKind::Enum, is_enum),
  (ScopeKind::If, is_if),
  (ScopeKind::Do, is_do),
  (ScopeKind::Try, is_try),
  (ScopeKind::Lonely, is_lonely_opening_brace),
];

/// Classifies the block opened by the joined analysis text of a logical line.
pub fn classify_scope(text: &str) -> ScopeKind {
  let text = text.trim_end();
  SCOPE_PATTERNS
    .iter()
    .find(|(_, matches)| matches(text))
    .map_or(ScopeKind::Other, |(kind, _)| *kind)
}
