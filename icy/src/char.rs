use ahash::HashSet;
use ahash::HashSetExt;
use once_cell::sync::Lazy;

#[derive(Clone)]
pub struct CharFilter {
  chars: HashSet<char>,
}

impl CharFilter {
  pub fn new() -> CharFilter {
    CharFilter {
      chars: HashSet::new(),
    }
  }

  pub fn add_char(&mut self, c: char) {
    self.chars.insert(c);
  }

  pub fn add_chars_from_slice(&mut self, chars: &str) {
    for c in chars.chars() {
      self.chars.insert(c);
    }
  }

  pub fn has(&self, c: char) -> bool {
    self.chars.contains(&c)
  }

  /// Byte length of the longest prefix of `text` made only of these characters.
  pub fn prefix_len(&self, text: &str) -> usize {
    let mut len = 0;
    for c in text.chars() {
      if !self.has(c) {
        break;
      }
      len += c.len_utf8();
    }
    len
  }
}

pub const TAB: char = '\t';

/// Characters that can make up a line's indentation. Nothing else counts, not even other Unicode
/// whitespace, since the column arithmetic only knows spaces and tabs.
pub static INDENT_WHITESPACE: Lazy<CharFilter> = Lazy::new(|| {
  let mut filter = CharFilter::new();
  filter.add_char(' ');
  filter.add_char(TAB);
  filter
});

/// A statement whose last character is one of these is either already terminated or obviously
/// continues (`::` is covered by `:`), so it never receives a synthesized semicolon.
pub static STATEMENT_CONTINUATION: Lazy<CharFilter> = Lazy::new(|| {
  let mut filter = CharFilter::new();
  filter.add_chars_from_slice(";:{([=/<,");
  filter
});
