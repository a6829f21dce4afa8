/// Split free text into lowercase alphanumeric terms, deduplicated, in first-seen order.
///
/// Punctuation and operators are dropped, so the output is safe to splice into a
/// `to_tsquery` expression.
pub fn search_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for term in tokens(query) {
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

/// Join terms as an OR query for Postgres `to_tsquery`.
pub fn tsquery_expression(terms: &[String]) -> String {
    terms.join(" | ")
}

/// True if any term appears as a whole word in any of `texts`.
pub fn matches_any<'a>(texts: impl IntoIterator<Item = &'a str>, terms: &[String]) -> bool {
    texts
        .into_iter()
        .flat_map(tokens)
        .any(|word| terms.contains(&word))
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| word.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_operators_and_dedupes() {
        assert_eq!(
            search_terms("Toyota & toyota | 'Corolla'!"),
            vec!["toyota".to_string(), "corolla".to_string()]
        );
    }

    #[test]
    fn whitespace_only_query_has_no_terms() {
        assert!(search_terms("   \t ").is_empty());
    }

    #[test]
    fn builds_or_expression() {
        let terms = search_terms("red sedan");
        assert_eq!(tsquery_expression(&terms), "red | sedan");
    }

    #[test]
    fn matches_whole_words_only() {
        let terms = search_terms("toy");
        assert!(!matches_any(["Toyota Corolla"], &terms));
        assert!(matches_any(["a toy car"], &terms));
    }
}
