use crate::models::{MediaItem, MediaType, NewMedia};
use crate::Database;
use anyhow::Result;
use rusqlite::{params_from_iter, OptionalExtension, Row};

const SELECT_MEDIA: &str =
    "SELECT id, type, title, url, thumbnail_url, created_at FROM media";

/// All media records in insertion order.
pub fn list_media(db: &Database) -> Result<Vec<MediaItem>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(&format!("{} ORDER BY id ASC", SELECT_MEDIA))?;
    let media = stmt
        .query_map([], row_to_media)?
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!("Listed {} media item(s)", media.len());
    Ok(media)
}

pub fn get_media(db: &Database, id: i64) -> Result<Option<MediaItem>> {
    let conn = db.get()?;
    let media = conn
        .query_row(&format!("{} WHERE id = ?", SELECT_MEDIA), [id], row_to_media)
        .optional()?;
    Ok(media)
}

/// Persists a validated record and returns it with its assigned id and timestamp.
pub fn create_media(db: &Database, input: &NewMedia) -> Result<MediaItem> {
    let conn = db.get()?;
    let media = conn.query_row(
        "INSERT INTO media (type, title, url, thumbnail_url) VALUES (?1, ?2, ?3, ?4)
         RETURNING id, type, title, url, thumbnail_url, created_at",
        rusqlite::params![
            input.media_type.as_str(),
            input.title,
            input.url,
            input.thumbnail_url
        ],
        row_to_media,
    )?;

    tracing::info!("Created {} media item {}", media.media_type, media.id);
    Ok(media)
}

/// Removes one record. Deleting an id that does not exist is not an error.
pub fn delete_media(db: &Database, id: i64) -> Result<bool> {
    let conn = db.get()?;
    let removed = conn.execute("DELETE FROM media WHERE id = ?", [id])?;
    if removed > 0 {
        tracing::info!("Deleted media item {}", id);
    }
    Ok(removed > 0)
}

/// Removes every record whose id is in `ids` inside one transaction, skipping
/// unknown ids. Returns how many rows were removed.
pub fn delete_many_media(db: &Database, ids: &[i64]) -> Result<usize> {
    if ids.is_empty() {
        return Ok(0);
    }

    let mut conn = db.get()?;
    let tx = conn.transaction()?;
    let mut removed = 0;
    // SQLite caps bound parameters per statement; batch to stay well under it.
    for chunk in ids.chunks(500) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        removed += tx.execute(
            &format!("DELETE FROM media WHERE id IN ({})", placeholders),
            params_from_iter(chunk.iter()),
        )?;
    }
    tx.commit()?;

    tracing::info!(
        "Deleted {} of {} requested media item(s)",
        removed,
        ids.len()
    );
    Ok(removed)
}

pub fn count_media(db: &Database) -> Result<i64> {
    let conn = db.get()?;
    let count = conn.query_row("SELECT COUNT(*) FROM media", [], |row| row.get(0))?;
    Ok(count)
}

fn row_to_media(row: &Row<'_>) -> rusqlite::Result<MediaItem> {
    let raw_type: String = row.get(1)?;
    let media_type = raw_type.parse::<MediaType>().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("unknown media type '{}'", raw_type).into(),
        )
    })?;

    Ok(MediaItem {
        id: row.get(0)?,
        media_type,
        title: row.get(2)?,
        url: row.get(3)?,
        thumbnail_url: row.get(4)?,
        created_at: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn setup_test_db() -> Database {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db = Database::open_memory(&format!("media_test_{}", id)).unwrap();
        db.migrate().unwrap();
        db
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let db = setup_test_db();
        let first = create_media(&db, &NewMedia::new(MediaType::Photo, "A", "http://x/1.jpg")).unwrap();
        delete_media(&db, first.id).unwrap();

        let second = create_media(&db, &NewMedia::new(MediaType::Photo, "B", "http://x/2.jpg")).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn test_created_at_is_iso8601() {
        let db = setup_test_db();
        let item = create_media(&db, &NewMedia::new(MediaType::Video, "V", "http://x/v.mp4")).unwrap();
        let created_at = item.created_at.expect("created_at should be assigned");
        assert!(created_at.contains('T'));
        assert!(created_at.ends_with('Z'));
    }

    #[test]
    fn test_delete_many_large_batch() {
        let db = setup_test_db();
        let mut ids = Vec::new();
        for i in 0..3 {
            let item = create_media(
                &db,
                &NewMedia::new(MediaType::Photo, format!("P{}", i), format!("http://x/{}.jpg", i)),
            )
            .unwrap();
            ids.push(item.id);
        }
        // Mostly unknown ids, crossing the chunk boundary.
        ids.extend(10_000..11_200);

        let removed = delete_many_media(&db, &ids).unwrap();
        assert_eq!(removed, 3);
        assert_eq!(count_media(&db).unwrap(), 0);
    }
}
