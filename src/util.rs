//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// Single pass over the template: substituted values are never rescanned,
/// and unknown `{...}` sequences are kept verbatim.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = String::with_capacity(tpl.len());
  let mut rest = tpl;
  while let Some(open) = rest.find('{') {
    out.push_str(&rest[..open]);
    let tail = &rest[open + 1..];
    let hit = pairs
      .iter()
      .find(|(k, _)| tail.starts_with(k) && tail[k.len()..].starts_with('}'));
    match hit {
      Some((k, v)) => {
        out.push_str(v);
        rest = &tail[k.len() + 1..];
      }
      None => {
        out.push('{');
        rest = tail;
      }
    }
  }
  out.push_str(rest);
  out
}

/// Uppercase the first character, leave the rest untouched.
/// "python basics" -> "Python basics", "Intro to JavaScript" stays as is.
pub fn capitalize_first(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

/// Log-safe truncation for large strings (cuts on a char boundary).
/// Avoids spamming logs with huge model responses.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) { cut -= 1; }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}
