//! Helpers for the delimited strings found in plugin parameters

/// Split `s` on `delim`, keeping empty fields
///
/// `"a,,b,"` yields `["a", "", "b", ""]`, and an empty input yields a single
/// empty field.
pub fn split(s: &str, delim: char) -> Vec<&str> {
    s.split(delim).collect()
}

/// Strip leading and trailing whitespace
pub fn trim(s: &str) -> &str {
    s.trim()
}

/// Parse a comma separated symbol list, trimming each entry and skipping blanks
pub fn parse_symbol_list(s: &str) -> impl Iterator<Item = &str> {
    split(s, ',').into_iter().map(trim).filter(|name| !name.is_empty())
}
