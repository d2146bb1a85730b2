use diesel::prelude::*;
use diesel_async::RunQueryDsl;

/// Delete stored recs that no `files` row references anymore. Removal is
/// staged and non-atomic, so interrupted runs can leave such orphans behind.
#[tracing::instrument(skip(storage, conn))]
pub async fn run_gc(
    storage: &dyn crate::storage::RecStorage,
    conn: &mut diesel_async::AsyncPgConnection,
) -> Result<usize, diesel::result::Error> {
    let stored = match storage.list().await {
        Ok(s) => s,
        Err(error) => {
            tracing::error!("listing rec storage: {:?}", error);
            return Ok(0);
        }
    };
    tracing::info!("found {} recs in storage", stored.len());

    let mut removed = 0;
    for path in stored {
        let referencing: Vec<crate::models::RecFile> = crate::schema::files::dsl::files
            .filter(crate::schema::files::dsl::filename.eq(&path))
            .select(crate::models::RecFile::as_select())
            .load(conn)
            .await?;
        if !referencing.is_empty() {
            continue;
        }

        tracing::debug!("removing orphaned rec {:?}", path);
        if let Err(error) = storage.remove(path.clone()).await {
            tracing::warn!("failed to remove {:?}: {:?}", path, error);
            continue;
        }
        removed += 1;
    }

    tracing::info!("removed {} orphaned recs", removed);
    Ok(removed)
}
