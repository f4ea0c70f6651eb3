//! Filter expressions for record queries and deletes.
//!
//! The store's query grammar takes a conjunction of equality predicates
//! over field ids: `{6.EX.'value'}AND{12.EX.'other'}`.

/// A conjunction of equality predicates over field ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    clauses: Vec<(u32, String)>,
}

impl Filter {
    /// An empty filter (matches everything on query; rejected on delete)
    pub fn new() -> Self {
        Self::default()
    }

    /// A filter with a single equality predicate
    pub fn field_eq(field_id: u32, value: impl Into<String>) -> Self {
        Self::new().and_eq(field_id, value)
    }

    /// Add another equality predicate to the conjunction
    pub fn and_eq(mut self, field_id: u32, value: impl Into<String>) -> Self {
        self.clauses.push((field_id, value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// The predicates in this filter, for backends that evaluate
    /// filters themselves instead of rendering them to the wire grammar
    pub fn clauses(&self) -> &[(u32, String)] {
        &self.clauses
    }

    /// Render to the store's where-clause grammar.
    /// Embedded quotes are doubled per that grammar.
    pub fn to_query(&self) -> String {
        self.clauses
            .iter()
            .map(|(field_id, value)| format!("{{{}.EX.'{}'}}", field_id, value.replace('\'', "''")))
            .collect::<Vec<_>>()
            .join("AND")
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_query())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_clause() {
        let filter = Filter::field_eq(10, "form-7");
        assert_eq!(filter.to_query(), "{10.EX.'form-7'}");
    }

    #[test]
    fn test_conjunction() {
        let filter = Filter::field_eq(10, "q1").and_eq(12, "r1");
        assert_eq!(filter.to_query(), "{10.EX.'q1'}AND{12.EX.'r1'}");
    }

    #[test]
    fn test_quote_escaping() {
        let filter = Filter::field_eq(6, "it's broken");
        assert_eq!(filter.to_query(), "{6.EX.'it''s broken'}");
    }

    #[test]
    fn test_empty() {
        let filter = Filter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.to_query(), "");
    }
}
