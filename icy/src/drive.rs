use crate::error::DiagnosticType;
use crate::error::Diagnostics;
use crate::indent::Indent;
use crate::join::joins_next;
use crate::join::LogicalLine;
use crate::lex::PendingSpan;
use crate::lex::SpanKind;
use crate::options::TranspileOptions;
use crate::pattern::classify_scope;
use crate::pattern::is_lonely_closing_brace;
use crate::pattern::is_passthrough;
use crate::pattern::is_preprocessor;
use crate::scope::BracketTracker;
use crate::scope::Scope;
use crate::scope::ScopeStack;
use crate::semicolon::needs_semicolon;
use crate::strip::strip_line;
use crate::strip::StrippedLine;
use serde::Serialize;
use tracing::debug;
use tracing::debug_span;
use tracing::trace;

/// Output lines of a run and everything found wrong along the way.
#[derive(Clone, Debug, Serialize)]
pub struct Transpiled {
  pub lines: Vec<String>,
  pub diagnostics: Diagnostics,
}

impl Transpiled {
  /// Output can only be trusted when this holds.
  pub fn is_ok(&self) -> bool {
    self.diagnostics.is_empty()
  }

  /// The output as text, each line newline-terminated.
  pub fn output(&self) -> String {
    self.lines.iter().fold(String::new(), |mut out, line| {
      out.push_str(line);
      out.push('\n');
      out
    })
  }
}

/// The following line that is neither blank, a comment nor a label, used as lookahead. Past the
/// last line it is empty and unindented.
struct NextLine<'a> {
  line: Option<usize>,
  text: &'a str,
  indent: Indent,
}

pub struct Driver<'a, S> {
  input: &'a [S],
  options: TranspileOptions,
  output: Vec<String>,
  diagnostics: Diagnostics,
  scopes: ScopeStack,
  brackets: BracketTracker,
  pending: Option<PendingSpan>,
  logical: Option<LogicalLine>,
  // A source closing brace standing in for a synthesized closer.
  claimed_close: Option<usize>,
  // A source closing brace that must be matched against the bracket tracker.
  scheduled_close: Option<usize>,
}

impl<'a, S: AsRef<str>> Driver<'a, S> {
  pub fn new(input: &'a [S], options: TranspileOptions) -> Self {
    Driver {
      input,
      options,
      output: Vec::with_capacity(input.len()),
      diagnostics: Diagnostics::new(),
      scopes: ScopeStack::new(),
      brackets: BracketTracker::new(),
      pending: None,
      logical: None,
      claimed_close: None,
      scheduled_close: None,
    }
  }

  pub fn run(mut self) -> Transpiled {
    let span = debug_span!("transpile", lines = self.input.len());
    let _entered = span.enter();
    let input = self.input;
    for (i, text) in input.iter().enumerate() {
      self.process_line(i + 1, text.as_ref());
    }
    self.finish()
  }

  fn source(&self, line: usize) -> String {
    self
      .input
      .get(line - 1)
      .map(|l| l.as_ref().trim().to_string())
      .unwrap_or_default()
  }

  fn next_code_line(&self, line_num: usize) -> NextLine<'a> {
    let input: &'a [S] = self.input;
    input[line_num..]
      .iter()
      .enumerate()
      .map(|(i, l)| (line_num + i + 1, l.as_ref()))
      .find(|(_, l)| !is_passthrough(l))
      .map_or(
        NextLine {
          line: None,
          text: "",
          indent: Indent::default(),
        },
        |(line, text)| NextLine {
          line: Some(line),
          text,
          indent: Indent::measure(text, self.options.tab_width),
        },
      )
  }

  fn process_line(&mut self, line_num: usize, text: &str) {
    let mut rest = text;
    let mut span_tail = None;
    if let Some(pending) = &self.pending {
      let Some(end) = pending.find_end(text) else {
        self.output.push(text.to_string());
        return;
      };
      trace!(line = line_num, opened = pending.line, "multi-line span closed");
      span_tail = Some(&text[..end]);
      rest = &text[end..];
      self.pending = None;
    } else if is_passthrough(text) {
      self.output.push(text.to_string());
      return;
    };

    let (indent, preprocessor) = match LogicalLine::continued(&self.logical) {
      Some(logical) => (logical.indent.clone(), logical.preprocessor),
      None => (
        Indent::measure(text, self.options.tab_width),
        is_preprocessor(text),
      ),
    };
    if span_tail.is_none()
      && !preprocessor
      && is_lonely_closing_brace(text)
      && LogicalLine::continued(&self.logical).is_some()
    {
      // Absorbed into the statement above it, so it closes nothing.
      self.stray_close(line_num);
    };

    let (mut stripped, pending) = if preprocessor {
      (StrippedLine::verbatim(rest), None)
    } else {
      strip_line(rest, line_num, &mut self.diagnostics)
    };
    if let Some(tail) = span_tail {
      stripped.prepend(tail);
    };
    self.pending = pending;

    let next = self.next_code_line(line_num);
    let join_next = joins_next(
      &stripped,
      preprocessor,
      indent.level,
      next.indent.level,
      self.pending.is_some(),
    );
    let logical = LogicalLine::advance(
      self.logical.take(),
      stripped.skeleton.clone(),
      join_next,
      indent,
      preprocessor,
      line_num,
    );

    if join_next || logical.preprocessor {
      self.output.push(stripped.render());
    } else {
      self.settle(&mut stripped, &logical, &next, line_num);
      let closed = self.close_scopes(&logical, &next, line_num);
      self.emit(stripped, closed);
    };
    self.logical = Some(logical);
  }

  /// Handles a completed logical line: matches a source closing brace, opens a bracket and maybe a
  /// scope, or terminates a statement.
  fn settle(
    &mut self,
    stripped: &mut StrippedLine,
    logical: &LogicalLine,
    next: &NextLine,
    line_num: usize,
  ) {
    let text = logical.text();
    let indent = logical.indent.level;
    // Both only ever refer to the logical line settled right after they are set.
    let claimed = self.claimed_close.take() == Some(logical.line);
    let scheduled = self.scheduled_close.take() == Some(logical.line);
    if is_lonely_closing_brace(&text) {
      if claimed {
        trace!(line = logical.line, "closing brace supplied by source");
      } else if scheduled || self.brackets.top().is_some_and(|open| !open.scoped) {
        self.reconcile_explicit_close(logical);
      } else {
        self.stray_close(logical.line);
      };
    };

    if text.trim_end().ends_with('{') {
      let scoped = next.indent.level > indent || is_lonely_closing_brace(next.text);
      self.brackets.push(indent, line_num, scoped);
      if scoped {
        let kind = classify_scope(&text);
        trace!(line = line_num, indent, ?kind, "scope opened");
        self.scopes.push(Scope {
          indent: logical.indent.clone(),
          kind,
          line: line_num,
        });
      };
    } else if next.indent.level <= indent && needs_semicolon(logical, &self.scopes) {
      trace!(line = line_num, "semicolon inserted");
      stripped.append_code(";");
    };
  }

  /// Matches a source closing brace against the innermost open bracket. On mismatch the bracket is
  /// still dropped so one stray brace does not misalign everything after it.
  fn reconcile_explicit_close(&mut self, logical: &LogicalLine) {
    match self.brackets.top().copied() {
      Some(open) if open.indent == logical.indent.level => {
        trace!(line = logical.line, opened = open.line, "closing brace matched");
      }
      _ => self.stray_close(logical.line),
    };
    self.brackets.pop();
  }

  fn stray_close(&mut self, line: usize) {
    let source = self.source(line);
    self
      .diagnostics
      .push(line, DiagnosticType::UnmatchedClosingBracket { source });
  }

  /// Pops every scope the next code line dedents out of, returning those needing a synthesized
  /// closer, innermost first.
  fn close_scopes(&mut self, logical: &LogicalLine, next: &NextLine, line_num: usize) -> Vec<Scope> {
    let mut closed = Vec::new();
    if next.line.is_none() && !self.options.close_at_end_of_input {
      return closed;
    };
    let next_closes = is_lonely_closing_brace(next.text);
    let mut upper = logical.indent.level;
    while let Some(lower) = self.scopes.last().map(|s| s.indent.level) {
      if next.indent.level > lower {
        if next.indent.level < upper {
          self
            .diagnostics
            .push(line_num, DiagnosticType::AmbiguousIndentation { lower, upper });
        };
        break;
      };
      let Some(scope) = self.scopes.pop() else {
        break;
      };
      let supplied = next_closes && next.indent.level == scope.indent.level;
      if supplied {
        self.claimed_close = next.line;
      } else if next_closes {
        self.scheduled_close = next.line;
      };
      trace!(line = scope.line, kind = ?scope.kind, supplied, "scope closed");
      self.brackets.remove_line(scope.line);
      upper = scope.indent.level;
      if !supplied {
        closed.push(scope);
      };
    }
    closed
  }

  fn emit(&mut self, mut stripped: StrippedLine, closed: Vec<Scope>) {
    if self.options.preserve_line_numbers {
      for scope in &closed {
        stripped.append_code(scope.kind.closer());
      }
      self.output.push(stripped.render());
    } else {
      self.output.push(stripped.render());
      self.output.extend(
        closed
          .iter()
          .map(|scope| format!("{}{}", scope.indent.prefix, scope.kind.closer())),
      );
    };
  }

  fn finish(mut self) -> Transpiled {
    if let Some(pending) = self.pending.take() {
      match pending.kind {
        SpanKind::LiteralRawString => self.diagnostics.push(
          pending.line,
          DiagnosticType::UnterminatedRawString {
            terminator: pending.terminator,
          },
        ),
        SpanKind::CommentMultiline if self.options.unterminated_block_comment_is_error => self
          .diagnostics
          .push(pending.line, DiagnosticType::UnterminatedBlockComment),
        _ => {}
      };
    };
    let brackets = std::mem::take(&mut self.brackets);
    for open in brackets.into_open() {
      let source = self.source(open.line);
      self
        .diagnostics
        .push(open.line, DiagnosticType::UnmatchedOpeningBracket { source });
    }
    debug!(
      output_lines = self.output.len(),
      diagnostics = self.diagnostics.len(),
      "transpile finished"
    );
    Transpiled {
      lines: self.output,
      diagnostics: self.diagnostics,
    }
  }
}
