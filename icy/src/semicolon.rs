use crate::char::STATEMENT_CONTINUATION;
use crate::join::LogicalLine;
use crate::pattern::classify_scope;
use crate::pattern::is_template_declaration;
use crate::scope::ScopeStack;
use once_cell::sync::Lazy;
use regex::Regex;

// Heads of blocks that continue an earlier one and so never end a statement.
static CONTINUED_BLOCK_HEAD: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?:^|[\s}])(?:else|catch\s*\(.*\))\s*$").expect("block head regex is valid")
});

/// Whether the angle brackets of a template parameter list, counted from the first `<`, are all
/// closed by the end of `text`.
fn template_params_closed(text: &str) -> bool {
  let Some(open) = text.find('<') else {
    unreachable!("template declaration without `<`: {text}");
  };
  let depth = text[open..].chars().fold(0isize, |depth, c| match c {
    '<' => depth + 1,
    '>' => depth - 1,
    _ => depth,
  });
  depth == 0
}

/// Whether `text` ends with a block braced on the same line, like `if (x) { y(); }`, that closes
/// with a bare `}`.
fn ends_with_bare_block(text: &str) -> bool {
  if !text.ends_with('}') {
    return false;
  };
  let mut depth = 0usize;
  for (i, c) in text.char_indices().rev() {
    match c {
      '}' => depth += 1,
      '{' => {
        depth -= 1;
        if depth == 0 {
          let head = &text[..i];
          return CONTINUED_BLOCK_HEAD.is_match(head)
            || classify_scope(&format!("{head}{{")).closer() == "}";
        };
      }
      _ => {}
    };
  }
  false
}

/// Whether a completed logical line that does not open a block should get a `;`.
///
/// The caller has already established that the next code line does not indent deeper.
pub fn needs_semicolon(line: &LogicalLine, scopes: &ScopeStack) -> bool {
  let text = line.text();
  let text = text.trim_end();
  let Some(last) = text.chars().last() else {
    return false;
  };
  if STATEMENT_CONTINUATION.has(last) {
    return false;
  };
  // A bare closing brace, as in fully braced input.
  if text.trim_start() == "}" {
    return false;
  };
  if ends_with_bare_block(text) {
    return false;
  };
  if scopes.innermost_kind().is_some_and(|k| k.lists_members()) {
    return false;
  };
  if is_template_declaration(text) && !template_params_closed(text) {
    return false;
  };
  true
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::indent::Indent;
  use crate::scope::Scope;
  use crate::scope::ScopeKind;

  fn logical(lines: &[&str]) -> LogicalLine {
    LogicalLine {
      lines: lines.iter().map(|l| l.to_string()).collect(),
      join_next: false,
      indent: Indent::default(),
      preprocessor: false,
      line: 1,
    }
  }

  fn check(lines: &[&str]) -> bool {
    needs_semicolon(&logical(lines), &ScopeStack::new())
  }

  #[test]
  fn plain_statements_get_one() {
    assert!(check(&["x = f(y)"]));
    assert!(check(&["return \"\""]));
    assert!(check(&["} while (x)"]));
    assert!(check(&["int x =", "    1 + 2"]));
  }

  #[test]
  fn continuation_characters_suppress() {
    for text in ["x;", "a:", "std::", "f({", "g(", "a[", "x =", "y /", "v <", "a,"] {
      assert!(!check(&[text]), "{text}");
    }
    assert!(!check(&["   "]));
    assert!(!check(&["    }"]));
  }

  #[test]
  fn one_line_blocks() {
    assert!(!check(&["    if (x) { y(); }"]));
    assert!(!check(&["    else { z(); }"]));
    assert!(!check(&["if (a) { b(); } else { c(); }"]));
    assert!(!check(&["} else if (a) { b(); }"]));
    assert!(!check(&["try { f(); } catch (...) { g(); }"]));
    assert!(!check(&["{ f(); }"]));
    assert!(check(&["struct P { int x; }"]));
    assert!(check(&["int a[] = {1, 2}"]));
    assert!(check(&["x = 1 }"]));
  }

  #[test]
  fn template_parameter_lists() {
    assert!(!check(&["template <typename T"]));
    assert!(!check(&["template <typename T,", "    typename U = std::less<T"]));
    assert!(check(&["template <typename T>"]));
    assert!(check(&["template <typename T, typename U = std::less<T>>"]));
  }

  #[test]
  fn member_lists_suppress() {
    let mut scopes = ScopeStack::new();
    scopes.push(Scope {
      indent: Indent::default(),
      kind: ScopeKind::Enum,
      line: 1,
    });
    assert!(!needs_semicolon(&logical(&["    Red"]), &scopes));
    scopes.push(Scope {
      indent: Indent::default(),
      kind: ScopeKind::If,
      line: 2,
    });
    assert!(needs_semicolon(&logical(&["    x = 1"]), &scopes));
  }
}
