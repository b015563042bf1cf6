//! Store inspection commands.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{CliError, connect};

#[derive(sqlx::FromRow)]
struct StoreRow {
    store_subdomain: Option<String>,
    store_name: Option<String>,
    user_id: Uuid,
    published_at: Option<DateTime<Utc>>,
}

/// Print the published stores, newest first.
pub async fn list() -> Result<(), CliError> {
    let pool = connect().await?;

    let rows = sqlx::query_as::<_, StoreRow>(
        r"
        SELECT store_subdomain, store_name, user_id, published_at
        FROM store_templates
        WHERE is_published
        ORDER BY published_at DESC NULLS LAST
        ",
    )
    .fetch_all(&pool)
    .await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{} published store(s)", rows.len());
        for row in rows {
            println!(
                "  {:<24} {:<32} owner={} published_at={}",
                row.store_subdomain.as_deref().unwrap_or("-"),
                row.store_name.as_deref().unwrap_or("-"),
                row.user_id,
                row.published_at
                    .map_or_else(|| "-".to_owned(), |t| t.to_rfc3339()),
            );
        }
    }

    Ok(())
}
