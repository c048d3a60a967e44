//! Entity bucketing
//!
//! Sorts recognizer spans into tickers, companies, locations and persons.
//! ORG/MISC spans that look like a symbol (upper-case, at most five
//! characters) are tickers; this heuristic misfiles acronyms such as "NASA".

use crate::model::{EntityTag, RecognizedSpan};
use common::EntityBundle;

/// Longest span still treated as a ticker, in characters
pub const MAX_TICKER_LEN: usize = 5;

/// Title-case letters such as 'ǅ' are cased but neither upper nor lower case
fn is_titlecase(c: char) -> bool {
    c.is_alphabetic() && !c.is_uppercase() && !c.is_lowercase() && c.to_uppercase().ne(std::iter::once(c))
}

/// True when the text has at least one cased character and every cased
/// character is upper case
fn is_upper(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() || is_titlecase(c) {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// Whether an ORG/MISC span should be filed as a ticker
pub fn is_ticker_like(text: &str) -> bool {
    is_upper(text) && text.chars().count() <= MAX_TICKER_LEN
}

/// Bucket spans. Duplicates collapse within a bucket; unknown tags are dropped.
pub fn classify_entities<'a, I>(spans: I) -> EntityBundle
where
    I: IntoIterator<Item = &'a RecognizedSpan>,
{
    let mut bundle = EntityBundle::new();

    for span in spans {
        let text = span.text.clone();
        match span.tag {
            EntityTag::Org | EntityTag::Misc => {
                if is_ticker_like(&span.text) {
                    bundle.tickers.insert(text);
                } else {
                    bundle.companies.insert(text);
                }
            }
            EntityTag::Loc => {
                bundle.locations.insert(text);
            }
            EntityTag::Per => {
                bundle.persons.insert(text);
            }
            EntityTag::Other(_) => {}
        }
    }

    bundle
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, tag: EntityTag) -> RecognizedSpan {
        RecognizedSpan::new(text, tag)
    }

    #[test]
    fn test_bucketing_rules() {
        let spans = vec![
            span("AAPL", EntityTag::Org),
            span("Apple Inc", EntityTag::Org),
            span("Paris", EntityTag::Loc),
            span("Tim Cook", EntityTag::Per),
        ];
        let bundle = classify_entities(&spans);

        assert!(bundle.tickers.contains("AAPL"));
        assert!(bundle.companies.contains("Apple Inc"));
        assert!(bundle.locations.contains("Paris"));
        assert!(bundle.persons.contains("Tim Cook"));
        assert_eq!(bundle.len(), 4);
    }

    #[test]
    fn test_misc_follows_org_rule() {
        let spans = vec![span("BTC", EntityTag::Misc), span("Bitcoin", EntityTag::Misc)];
        let bundle = classify_entities(&spans);

        assert!(bundle.tickers.contains("BTC"));
        assert!(bundle.companies.contains("Bitcoin"));
    }

    #[test]
    fn test_ticker_heuristic_edges() {
        assert!(is_ticker_like("TSLA"));
        assert!(is_ticker_like("BRK.B"));
        assert!(is_ticker_like("3M"));
        assert!(is_ticker_like("NASA")); // known false positive
        assert!(!is_ticker_like("GOOGLE")); // six characters
        assert!(!is_ticker_like("Meta"));
        assert!(!is_ticker_like("123"));
        assert!(!is_ticker_like(""));
    }

    #[test]
    fn test_titlecase_letters_are_not_upper_case() {
        assert!(!is_ticker_like("A\u{01C5}"));
        assert!(!is_ticker_like("\u{01C5}"));
        assert!(is_ticker_like("A\u{01C4}"));

        let bundle = classify_entities(&[span("A\u{01C5}", EntityTag::Org)]);
        assert!(bundle.tickers.is_empty());
        assert!(bundle.companies.contains("A\u{01C5}"));
    }

    #[test]
    fn test_uppercase_location_is_not_a_ticker() {
        let bundle = classify_entities(&[span("USA", EntityTag::Loc)]);
        assert!(bundle.tickers.is_empty());
        assert!(bundle.locations.contains("USA"));
    }

    #[test]
    fn test_duplicates_collapse_per_bucket() {
        let spans = vec![
            span("TSLA", EntityTag::Org),
            span("TSLA", EntityTag::Org),
            span("Tesla", EntityTag::Org),
            span("Tesla", EntityTag::Misc),
        ];
        let bundle = classify_entities(&spans);

        assert_eq!(bundle.tickers.len(), 1);
        assert_eq!(bundle.companies.len(), 1);
    }

    #[test]
    fn test_unknown_tags_are_dropped() {
        let bundle = classify_entities(&[span("Tuesday", EntityTag::Other("DATE".to_string()))]);
        assert!(bundle.is_empty());
    }
}
