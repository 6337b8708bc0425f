use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

/// Database row of the statement counts table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct StatementCountRow {
    /// Upstream-assigned paper identifier, primary key.
    pub id: String,
    /// Paper title, never null.
    pub title: String,
    /// Number of statements associated with the paper.
    pub count: i64,
}

/// Count query without a title filter.
const COUNT_SQL: &str = r#"
    SELECT COUNT(*)
    FROM scikgdash_stmt.papers_statement_counts
"#;

/// Count query with a case-insensitive title containment filter.
const COUNT_FILTERED_SQL: &str = r#"
    SELECT COUNT(*)
    FROM scikgdash_stmt.papers_statement_counts
    WHERE title ILIKE $1
"#;

/// Page query without a title filter.
///
/// The order is total and deterministic: ties on `count` are broken by `id`,
/// keeping pagination stable across requests.
const PAGE_SQL: &str = r#"
    SELECT id, title, count
    FROM scikgdash_stmt.papers_statement_counts
    ORDER BY count DESC, id ASC
    LIMIT $1 OFFSET $2
"#;

/// Page query with a case-insensitive title containment filter.
const PAGE_FILTERED_SQL: &str = r#"
    SELECT id, title, count
    FROM scikgdash_stmt.papers_statement_counts
    WHERE title ILIKE $1
    ORDER BY count DESC, id ASC
    LIMIT $2 OFFSET $3
"#;

/// Merges a batch of statement count rows into the destination table.
///
/// Insert-or-update keyed on `id`: existing rows get their `title` and `count`
/// overwritten, missing rows are inserted, and nothing is ever deleted. The
/// caller must not pass the same `id` twice in one batch, since a single
/// `INSERT ... ON CONFLICT DO UPDATE` cannot touch a row more than once.
pub async fn upsert_statement_counts(
    pool: &PgPool,
    rows: &[StatementCountRow],
) -> sqlx::Result<()> {
    if rows.is_empty() {
        return Ok(());
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
        "INSERT INTO scikgdash_stmt.papers_statement_counts (id, title, count) ",
    );
    builder.push_values(rows, |mut b, row| {
        b.push_bind(&row.id).push_bind(&row.title).push_bind(row.count);
    });
    builder.push(" ON CONFLICT (id) DO UPDATE SET title = EXCLUDED.title, count = EXCLUDED.count");

    builder.build().execute(pool).await?;

    Ok(())
}

/// Returns the number of rows matching the optional title filter.
pub async fn count_statements(pool: &PgPool, title_filter: Option<&str>) -> sqlx::Result<i64> {
    match title_filter {
        Some(filter) => {
            sqlx::query_scalar(COUNT_FILTERED_SQL)
                .bind(like_pattern(filter))
                .fetch_one(pool)
                .await
        }
        None => sqlx::query_scalar(COUNT_SQL).fetch_one(pool).await,
    }
}

/// Fetches one page of statement count rows ordered by `count DESC, id ASC`.
pub async fn fetch_statements_page(
    pool: &PgPool,
    title_filter: Option<&str>,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<StatementCountRow>> {
    match title_filter {
        Some(filter) => {
            sqlx::query_as(PAGE_FILTERED_SQL)
                .bind(like_pattern(filter))
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await
        }
        None => {
            sqlx::query_as(PAGE_SQL)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await
        }
    }
}

/// Builds an `ILIKE` containment pattern from user input.
///
/// LIKE metacharacters in the input are escaped so the filter matches them
/// literally instead of acting as wildcards.
pub fn like_pattern(filter: &str) -> String {
    let escaped = filter
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");

    format!("%{escaped}%")
}

/// Returns the number of pages needed to cover `total_elements` rows.
///
/// Zero elements mean zero pages; otherwise the count is rounded up so a
/// trailing partial page is counted.
pub fn total_pages(total_elements: u64, page_size: u64) -> u64 {
    if total_elements == 0 || page_size == 0 {
        return 0;
    }

    total_elements.div_ceil(page_size)
}

/// Returns the `LIMIT`/`OFFSET` pair for a zero-based page request.
pub fn page_bounds(page: u32, page_size: u32) -> (i64, i64) {
    let limit = i64::from(page_size);
    let offset = i64::from(page) * i64::from(page_size);

    (limit, offset)
}
