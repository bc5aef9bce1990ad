use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use trading::{Direction, ItemId, KeyStore, NewItem, StoreError, StoredItem};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS items (
    item_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    instrument TEXT NOT NULL,
    item_key   TEXT NOT NULL,
    direction  TEXT NOT NULL,
    qty        INTEGER NOT NULL,
    price      REAL NOT NULL DEFAULT 0
)";

const COLUMNS: &str = "item_id, instrument, item_key, direction, qty, price";

/// SQLite-backed key store, one `items` row per mapping.
pub struct SqliteKeyStore {
    conn: Mutex<Connection>,
}

fn backend(err: rusqlite::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

impl SqliteKeyStore {
    /// Opens (creating if needed) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Backend(e.to_string()))?;
        }
        Self::init(Connection::open(path).map_err(backend)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory().map_err(backend)?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(SCHEMA, []).map_err(backend)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

/// Raw column values; the direction is decoded afterwards so a bad value is
/// reported as a corrupt record rather than a driver error.
type RawRow = (ItemId, String, String, String, i64, f64);

fn raw(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn decode((id, instrument, key, direction, quantity, price): RawRow) -> Result<StoredItem, StoreError> {
    let direction: Direction = direction.parse().map_err(|e: trading::UnacceptableValue| {
        StoreError::Corrupt {
            id,
            reason: e.to_string(),
        }
    })?;
    Ok(StoredItem {
        id,
        instrument,
        key,
        direction,
        quantity,
        price,
    })
}

impl KeyStore for SqliteKeyStore {
    fn lookup(&self, id: ItemId) -> Result<Option<StoredItem>, StoreError> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM items WHERE item_id = ?1", COLUMNS),
                params![id],
                raw,
            )
            .optional()
            .map_err(backend)?;
        row.map(decode).transpose()
    }

    fn list(&self) -> Result<Vec<StoredItem>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM items ORDER BY item_id", COLUMNS))
            .map_err(backend)?;
        let rows = stmt
            .query_map([], raw)
            .map_err(backend)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(backend)?;
        rows.into_iter().map(decode).collect()
    }

    fn insert(&self, item: NewItem) -> Result<ItemId, StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO items (instrument, item_key, direction, qty, price) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                item.instrument,
                item.key,
                item.direction.as_str(),
                item.quantity,
                item.price
            ],
        )
        .map_err(backend)?;
        let id = conn.last_insert_rowid();
        debug!("Stored {} -> {}", id, item.key);
        Ok(id)
    }

    fn update_quantity(&self, id: ItemId, quantity: i64) -> Result<(), StoreError> {
        let changed = self
            .conn()?
            .execute(
                "UPDATE items SET qty = ?1 WHERE item_id = ?2",
                params![quantity, id],
            )
            .map_err(backend)?;
        if changed == 0 {
            return Err(StoreError::Missing(id));
        }
        Ok(())
    }

    fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        let changed = self
            .conn()?
            .execute("DELETE FROM items WHERE item_id = ?1", params![id])
            .map_err(backend)?;
        if changed == 0 {
            return Err(StoreError::Missing(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(key: &str, quantity: i64) -> NewItem {
        NewItem {
            instrument: "EURUSD".into(),
            key: key.into(),
            direction: Direction::Sell,
            quantity,
            price: 1.08,
        }
    }

    #[test]
    fn test_insert_update_delete() {
        let store = SqliteKeyStore::open_in_memory().unwrap();
        let id = store.insert(new_item("guid-1", 10)).unwrap();
        store.update_quantity(id, 15).unwrap();

        let stored = store.lookup(id).unwrap().unwrap();
        assert_eq!(stored, new_item("guid-1", 15).into_stored(id));

        store.delete(id).unwrap();
        assert!(store.lookup(id).unwrap().is_none());
        assert!(matches!(
            store.update_quantity(id, 1),
            Err(StoreError::Missing(_))
        ));
    }

    #[test]
    fn test_list_is_ordered_by_id() {
        let store = SqliteKeyStore::open_in_memory().unwrap();
        for key in ["a", "b", "c"] {
            store.insert(new_item(key, 1)).unwrap();
        }
        let keys: Vec<String> = store.list().unwrap().into_iter().map(|i| i.key).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_bad_direction_is_corrupt() {
        let store = SqliteKeyStore::open_in_memory().unwrap();
        store
            .conn()
            .unwrap()
            .execute(
                "INSERT INTO items (instrument, item_key, direction, qty) VALUES ('X', 'k', 'hold', 1)",
                [],
            )
            .unwrap();
        assert!(matches!(store.lookup(1), Err(StoreError::Corrupt { id: 1, .. })));
    }
}
