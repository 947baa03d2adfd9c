use sea_orm::{
    ColumnTrait, Condition,
    sea_query::{Expr, Func, LikeExpr},
};

use crate::traits::CRUDResource;

const MAX_SEARCH_QUERY_LENGTH: usize = 10_000;

/// Escape character used in generated `LIKE ... ESCAPE` clauses.
pub const LIKE_ESCAPE: char = '!';

/// Escape LIKE wildcards so user input only ever matches literally.
fn escape_like_wildcards(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, LIKE_ESCAPE | '%' | '_') {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Build the `q` filter: a case-insensitive substring match against every
/// searchable column of `R`, OR-combined.
///
/// Returns `None` when the term is blank or `R` declares no searchable columns.
#[must_use]
pub fn build_fulltext_condition<R: CRUDResource>(query: &str) -> Option<Condition> {
    let columns = R::fulltext_searchable_columns();
    let sanitized: String = query.trim().chars().take(MAX_SEARCH_QUERY_LENGTH).collect();
    if columns.is_empty() || sanitized.is_empty() {
        return None;
    }

    let pattern = format!("%{}%", escape_like_wildcards(&sanitized).to_uppercase());
    let condition = columns
        .into_iter()
        .fold(Condition::any(), |condition, (_, column)| {
            condition.add(
                Expr::expr(Func::upper(Expr::col(column.as_column_ref())))
                    .like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE)),
            )
        });
    Some(condition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;

    #[test]
    fn test_wildcard_escaping() {
        assert_eq!(escape_like_wildcards("test"), "test");
        assert_eq!(escape_like_wildcards("test%"), "test!%");
        assert_eq!(escape_like_wildcards("test_value"), "test!_value");
        assert_eq!(escape_like_wildcards("%_"), "!%!_");
        assert_eq!(escape_like_wildcards("wow!"), "wow!!");
    }

    #[test]
    fn test_blank_query_has_no_condition() {
        assert!(build_fulltext_condition::<Item>("").is_none());
        assert!(build_fulltext_condition::<Item>("   ").is_none());
    }

    #[test]
    fn test_one_branch_per_searchable_column() {
        let condition = build_fulltext_condition::<Item>("apple").unwrap();
        assert_eq!(condition.len(), Item::fulltext_searchable_columns().len());
    }

    #[test]
    fn test_search_value_is_bound_not_inlined() {
        let condition = build_fulltext_condition::<Item>("'; DROP TABLE items; --").unwrap();
        let debug = format!("{condition:?}");
        assert!(debug.contains("Value(String"), "{debug}");
    }

    #[test]
    fn test_long_query_truncated_on_char_boundary() {
        let query = "é".repeat(MAX_SEARCH_QUERY_LENGTH + 50);
        assert!(build_fulltext_condition::<Item>(&query).is_some());
    }
}
