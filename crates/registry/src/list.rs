//! Comma-joined list encoding used for the recent-revisions list and the
//! per-revision alias list.

const SEPARATOR: char = ',';

/// Split a stored list. Empty input and empty segments yield nothing.
pub fn decode(raw: &str) -> Vec<String> {
    raw.split(SEPARATOR)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join a list for storage. An empty list encodes as an empty string.
pub fn encode<S: AsRef<str>>(entries: &[S]) -> String {
    let mut out = String::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            out.push(SEPARATOR);
        }
        out.push_str(entry.as_ref());
    }
    out
}
