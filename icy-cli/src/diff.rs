use similar::ChangeTag;
use similar::TextDiff;

/// Line diff of the input against the output, showing only changed lines. Each is prefixed with
/// its position in the full diff, so nearby changes stay recognisable as one hunk.
pub fn render_diff(original: &[&str], transformed: &[String]) -> String {
  let transformed: Vec<&str> = transformed.iter().map(String::as_str).collect();
  let diff = TextDiff::from_slices(original, &transformed);
  let mut out = String::new();
  for (i, change) in diff.iter_all_changes().enumerate() {
    let sign = match change.tag() {
      ChangeTag::Delete => "-",
      ChangeTag::Insert => "+",
      ChangeTag::Equal => continue,
    };
    out.push_str(&format!("{i}: {sign} {}\n", change.value()));
  }
  out
}
