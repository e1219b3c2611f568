//! Extraction of the first balanced top-level JSON value from mixed text.
//!
//! LLM completions frequently wrap their JSON payload in prose or markdown
//! code fences and follow it with commentary. This module finds the
//! payload by bracket-depth scanning; it knows nothing about quest
//! descriptors.

/// Find the first balanced JSON array or object in `text`.
///
/// Arrays are preferred over objects, since the expected payload is an
/// array of descriptors. Scanning is string-aware: brackets inside JSON
/// string literals do not affect depth. Returns the candidate slice, or
/// None when no balanced value exists.
pub fn first_balanced_json(text: &str) -> Option<&str> {
    balanced_from(text, b'[', b']').or_else(|| balanced_from(text, b'{', b'}'))
}

/// Find the first balanced value opened by `open` and closed by `close`.
fn balanced_from(text: &str, open: u8, close: u8) -> Option<&str> {
    let bytes = text.as_bytes();
    let start = bytes.iter().position(|&b| b == open)?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            _ if b == open => depth += 1,
            _ if b == close => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}
