use sea_orm::{
    ColumnTrait, Condition,
    sea_query::{BinOper, Expr, Func, SimpleExpr},
};

// Basic safety limits
pub const MAX_SEARCH_QUERY_LENGTH: usize = 200;

/// Escape LIKE wildcards so user input only ever matches literally.
/// Escapes: % (match any) and _ (match single char)
fn escape_like_wildcards(input: &str) -> String {
    input
        .replace('\\', "\\\\") // Escape backslash first
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Truncate on a character boundary so multi-byte input never panics.
fn truncate_query(query: &str) -> &str {
    match query.char_indices().nth(MAX_SEARCH_QUERY_LENGTH) {
        Some((index, _)) => &query[..index],
        None => query,
    }
}

/// Case-insensitive substring match: `UPPER(column) LIKE UPPER('%value%') ESCAPE '\'`.
///
/// Both sides are folded by the same database `UPPER`, which on SQLite leaves
/// non-ASCII letters untouched. The value is embedded with quotes doubled.
#[must_use]
pub fn build_like_condition(column: impl ColumnTrait, value: &str) -> SimpleExpr {
    let escaped_value = escape_like_wildcards(truncate_query(value.trim())).replace('\'', "''");
    let pattern = SimpleExpr::Custom(format!("UPPER('%{escaped_value}%') ESCAPE '\\'"));

    Expr::expr(Func::upper(Expr::col(column.as_column_ref()))).binary(BinOper::Like, pattern)
}

/// Free-text search: an OR group of substring matches over `columns`.
#[must_use]
pub fn build_search_condition<C>(query: &str, columns: &[C]) -> Condition
where
    C: ColumnTrait + Copy,
{
    columns
        .iter()
        .fold(Condition::any(), |group, column| {
            group.add(build_like_condition(*column, query))
        })
}
