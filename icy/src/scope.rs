use crate::indent::Indent;
use serde::Serialize;

/// What kind of block an implicit scope is, which decides how it is closed.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub enum ScopeKind {
  PreprocessorConditional,
  /// A braced initializer inside an argument list, e.g. `push_back({`.
  Value,
  Enum,
  If,
  Do,
  Try,
  /// A brace on a line of its own.
  Lonely,
  Other,
}

impl ScopeKind {
  pub fn closer(self) -> &'static str {
    match self {
      ScopeKind::Try | ScopeKind::If | ScopeKind::Do | ScopeKind::Lonely | ScopeKind::Value => "}",
      ScopeKind::PreprocessorConditional | ScopeKind::Enum | ScopeKind::Other => "};",
    }
  }

  /// Whether the body is a comma-separated list rather than statements.
  pub fn lists_members(self) -> bool {
    matches!(self, ScopeKind::Enum | ScopeKind::Value)
  }
}

/// An implicit block opened by a line ending with `{`.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Scope {
  pub indent: Indent,
  pub kind: ScopeKind,
  /// Line holding the opening brace.
  pub line: usize,
}

#[derive(Clone, Default, Debug)]
pub struct ScopeStack {
  scopes: Vec<Scope>,
}

impl ScopeStack {
  pub fn new() -> ScopeStack {
    ScopeStack::default()
  }

  pub fn push(&mut self, scope: Scope) {
    self.scopes.push(scope);
  }

  pub fn pop(&mut self) -> Option<Scope> {
    self.scopes.pop()
  }

  pub fn last(&self) -> Option<&Scope> {
    self.scopes.last()
  }

  pub fn innermost_kind(&self) -> Option<ScopeKind> {
    self.last().map(|s| s.kind)
  }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct OpenBracket {
  pub indent: usize,
  pub line: usize,
  /// Closed by its scope rather than by a brace in the source.
  pub scoped: bool,
}

/// Every `{` that ends a logical line and has not been closed yet, whether its scope is implicit
/// or its closing brace is written out in the source.
#[derive(Clone, Default, Debug)]
pub struct BracketTracker {
  open: Vec<OpenBracket>,
}

impl BracketTracker {
  pub fn new() -> BracketTracker {
    BracketTracker::default()
  }

  pub fn push(&mut self, indent: usize, line: usize, scoped: bool) {
    self.open.push(OpenBracket {
      indent,
      line,
      scoped,
    });
  }

  pub fn top(&self) -> Option<&OpenBracket> {
    self.open.last()
  }

  pub fn pop(&mut self) -> Option<OpenBracket> {
    self.open.pop()
  }

  /// Drops the innermost bracket opened on `line`, if a best-effort reconciliation has not already
  /// taken it.
  pub fn remove_line(&mut self, line: usize) {
    if let Some(i) = self.open.iter().rposition(|b| b.line == line) {
      self.open.remove(i);
    };
  }

  /// Brackets still open, outermost first.
  pub fn into_open(self) -> Vec<OpenBracket> {
    self.open
  }
}
