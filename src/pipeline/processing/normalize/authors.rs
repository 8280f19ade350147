use crate::constants::{AUTHOR_DELIMITER, AUTHOR_NAME_SEPARATOR};
use crate::domain::AuthorName;

/// Parses `"{last}, {first}; {last}, {first}"` author lists.
///
/// Entries keep their source order. An entry without a comma becomes a
/// last name with empty first names; blank entries (a trailing `;`) are
/// skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct AuthorNameParser;

impl AuthorNameParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, raw_authors: &str) -> Vec<AuthorName> {
        raw_authors
            .split(AUTHOR_DELIMITER)
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(Self::parse_entry)
            .collect()
    }

    pub fn parse_opt(&self, raw_authors: Option<&str>) -> Vec<AuthorName> {
        raw_authors.map(|s| self.parse(s)).unwrap_or_default()
    }

    fn parse_entry(entry: &str) -> AuthorName {
        match entry.split_once(AUTHOR_NAME_SEPARATOR) {
            Some((last, first)) => AuthorName::new(last.trim(), first.trim()),
            None => AuthorName::new(entry, ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_authors() {
        let names = AuthorNameParser::new().parse("De Vries, Ieke; Goggin, Kelly");
        assert_eq!(
            names,
            vec![AuthorName::new("De Vries", "Ieke"), AuthorName::new("Goggin", "Kelly")]
        );
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        let names = AuthorNameParser::new().parse("Zed, A; Alpha, B; Zed, A");
        let last: Vec<_> = names.iter().map(|n| n.last_name.as_str()).collect();
        assert_eq!(last, vec!["Zed", "Alpha", "Zed"]);
    }

    #[test]
    fn test_splits_on_first_comma_only() {
        let names = AuthorNameParser::new().parse("King, Martin Luther, Jr.");
        assert_eq!(names, vec![AuthorName::new("King", "Martin Luther, Jr.")]);
    }

    #[test]
    fn test_entry_without_comma_is_a_last_name() {
        let names = AuthorNameParser::new().parse("Plato; Smith, Jane");
        assert_eq!(names[0], AuthorName::new("Plato", ""));
        assert_eq!(names[1], AuthorName::new("Smith", "Jane"));
    }

    #[test]
    fn test_blank_entries_and_whitespace() {
        let names = AuthorNameParser::new().parse("  Smith ,  Jane  ;; ");
        assert_eq!(names, vec![AuthorName::new("Smith", "Jane")]);
    }

    #[test]
    fn test_empty_input_yields_no_authors() {
        let parser = AuthorNameParser::new();
        assert!(parser.parse("").is_empty());
        assert!(parser.parse(" ; ").is_empty());
        assert!(parser.parse_opt(None).is_empty());
    }
}
