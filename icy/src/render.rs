use crate::drive::Transpiled;
use crate::error::Diagnostics;
use std::fmt::Write;

/// One line per diagnostic, by line and then discovery order, each newline-terminated.
pub fn render_diagnostics(diagnostics: &Diagnostics) -> String {
  let mut out = String::new();
  for diagnostic in diagnostics.iter() {
    writeln!(
      out,
      "{:>6}: [{}] {}",
      diagnostic.line,
      diagnostic.code(),
      diagnostic.message()
    )
    .unwrap();
  }
  out
}

/// The report file: the diagnostics block, a blank line, and then the transformed source, which is
/// only included when there are no diagnostics.
pub fn render_report(transpiled: &Transpiled) -> String {
  let mut out = render_diagnostics(&transpiled.diagnostics);
  out.push('\n');
  if transpiled.is_ok() {
    out.push_str(&transpiled.output());
  };
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::DiagnosticType;

  #[test]
  fn diagnostics_are_right_aligned_by_line() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.push(12, DiagnosticType::UnterminatedCharLiteral);
    diagnostics.push(3, DiagnosticType::UnmatchedOpeningBracket {
      source: "void f() {".into(),
    });
    assert_eq!(
      render_diagnostics(&diagnostics),
      concat!(
        "     3: [IC0006] could not find closing parenthesis for: void f() {\n",
        "    12: [IC0001] terminating quote not found for character literal\n",
      )
    );
  }

  #[test]
  fn report_withholds_source_on_error() {
    let clean = Transpiled {
      lines: vec!["a;".into(), "b;".into()],
      diagnostics: Diagnostics::new(),
    };
    assert_eq!(render_report(&clean), "\na;\nb;\n");

    let mut diagnostics = Diagnostics::new();
    diagnostics.push(1, DiagnosticType::UnterminatedStringLiteral);
    let broken = Transpiled {
      lines: vec!["x = \"a;".into()],
      diagnostics,
    };
    assert_eq!(
      render_report(&broken),
      "     1: [IC0002] terminating quote not found for string literal\n\n"
    );
  }
}
