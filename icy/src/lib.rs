use drive::Driver;

pub use drive::Transpiled;
pub use error::Diagnostic;
pub use error::DiagnosticType;
pub use error::Diagnostics;
pub use error::TranspileError;
pub use options::TranspileOptions;
pub use render::render_diagnostics;
pub use render::render_report;

pub mod char;
pub mod drive;
pub mod error;
pub mod indent;
pub mod join;
pub mod lex;
pub mod options;
pub mod pattern;
pub mod render;
pub mod scope;
pub mod semicolon;
pub mod strip;

/// Transpiles indentation-structured source lines into braced, semicolon-terminated lines.
///
/// Never fails: problems are reported per line in [`Transpiled::diagnostics`], and the output is
/// computed regardless.
///
/// # Examples
///
/// ```
/// use icy::{transpile, TranspileOptions};
///
/// let source = ["int main() {", "    return 0", "int x = 1"];
/// let out = transpile(&source, &TranspileOptions::default());
/// assert!(out.is_ok());
/// assert_eq!(out.lines, vec!["int main() {", "    return 0;};", "int x = 1;"]);
/// ```
pub fn transpile<S: AsRef<str>>(lines: &[S], options: &TranspileOptions) -> Transpiled {
  Driver::new(lines, *options).run()
}

/// Like [`transpile`], splitting `source` into lines first. Line terminators are not significant.
pub fn transpile_str(source: &str, options: &TranspileOptions) -> Transpiled {
  let lines: Vec<&str> = source.lines().collect();
  transpile(&lines, options)
}

/// Like [`transpile_str`], for input that still has to be checked for UTF-8.
pub fn transpile_bytes(
  source: &[u8],
  options: &TranspileOptions,
) -> Result<Transpiled, TranspileError> {
  let source = std::str::from_utf8(source)?;
  Ok(transpile_str(source, options))
}
