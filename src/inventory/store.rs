//! Sweet Inventory Storage
//!
//! Every statement runs under the shared connection mutex, and quantity
//! adjustments are single conditional UPDATEs, so concurrent purchases of
//! the same item serialize and stock can never go negative.

use crate::db::Db;
use crate::inventory::models::{NewSweet, Sweet, SweetFilters};
use rusqlite::{params, params_from_iter, Connection, ToSql};

/// What went wrong inside the inventory ledger.
#[derive(Debug)]
pub enum InventoryError {
    NotFound,
    OutOfStock,
    InvalidQuantity,
    Storage(rusqlite::Error),
}

impl std::fmt::Display for InventoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InventoryError::NotFound => write!(f, "Sweet not found"),
            InventoryError::OutOfStock => write!(f, "Out of stock"),
            InventoryError::InvalidQuantity => {
                write!(f, "Restock quantity must be a positive number")
            }
            InventoryError::Storage(e) => write!(f, "Inventory storage error: {}", e),
        }
    }
}

impl std::error::Error for InventoryError {}

impl From<rusqlite::Error> for InventoryError {
    fn from(err: rusqlite::Error) -> Self {
        InventoryError::Storage(err)
    }
}

/// Inventory storage backed by the shared SQLite connection.
pub struct SweetStore {
    db: Db,
}

impl SweetStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Insert a sweet and return the stored row with its assigned id.
    pub fn create(&self, sweet: NewSweet) -> Result<Sweet, InventoryError> {
        let conn = self.db.lock();
        conn.execute(
            "INSERT INTO sweets (name, category, price, quantity) VALUES (?1, ?2, ?3, ?4)",
            params![sweet.name, sweet.category, sweet.price, sweet.quantity],
        )?;

        Ok(Sweet {
            id: conn.last_insert_rowid(),
            name: sweet.name,
            category: sweet.category,
            price: sweet.price,
            quantity: sweet.quantity,
        })
    }

    /// Every row, no ordering guarantee.
    pub fn list_all(&self) -> Result<Vec<Sweet>, InventoryError> {
        let conn = self.db.lock();
        let mut stmt = conn.prepare("SELECT id, name, category, price, quantity FROM sweets")?;
        let sweets = stmt
            .query_map([], row_to_sweet)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sweets)
    }

    /// Filtered listing. Each supplied filter narrows the result (AND).
    ///
    /// Name and category match as case-insensitive substrings (SQL `LIKE`
    /// with wildcard wrapping). No filters is equivalent to [`list_all`].
    ///
    /// [`list_all`]: SweetStore::list_all
    pub fn search(&self, filters: &SweetFilters) -> Result<Vec<Sweet>, InventoryError> {
        let mut sql = String::from("SELECT id, name, category, price, quantity FROM sweets WHERE 1 = 1");
        let mut bound: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(name) = &filters.name {
            sql.push_str(" AND name LIKE ?");
            bound.push(Box::new(format!("%{}%", name)));
        }
        if let Some(category) = &filters.category {
            sql.push_str(" AND category LIKE ?");
            bound.push(Box::new(format!("%{}%", category)));
        }
        if let Some(min_price) = filters.min_price {
            sql.push_str(" AND price >= ?");
            bound.push(Box::new(min_price));
        }
        if let Some(max_price) = filters.max_price {
            sql.push_str(" AND price <= ?");
            bound.push(Box::new(max_price));
        }

        let conn = self.db.lock();
        let mut stmt = conn.prepare(&sql)?;
        let sweets = stmt
            .query_map(
                params_from_iter(bound.iter().map(|p| p.as_ref())),
                row_to_sweet,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sweets)
    }

    /// Full replacement of the four mutable fields.
    pub fn update(&self, id: i64, sweet: NewSweet) -> Result<(), InventoryError> {
        let conn = self.db.lock();
        let changes = conn.execute(
            "UPDATE sweets SET name = ?1, category = ?2, price = ?3, quantity = ?4 WHERE id = ?5",
            params![sweet.name, sweet.category, sweet.price, sweet.quantity, id],
        )?;

        if changes == 0 {
            return Err(InventoryError::NotFound);
        }
        Ok(())
    }

    pub fn delete(&self, id: i64) -> Result<(), InventoryError> {
        let conn = self.db.lock();
        let changes = conn.execute("DELETE FROM sweets WHERE id = ?1", params![id])?;

        if changes == 0 {
            return Err(InventoryError::NotFound);
        }
        Ok(())
    }

    /// Atomically decrement stock by one and return the new quantity.
    ///
    /// The decrement is conditional on `quantity > 0`, so two concurrent
    /// purchases of a quantity-1 item cannot both succeed; the loser
    /// observes [`InventoryError::OutOfStock`].
    pub fn purchase(&self, id: i64) -> Result<i64, InventoryError> {
        let conn = self.db.lock();
        let changes = conn.execute(
            "UPDATE sweets SET quantity = quantity - 1 WHERE id = ?1 AND quantity > 0",
            params![id],
        )?;

        if changes == 0 {
            // Distinguish a missing row from an empty shelf.
            return match quantity_of(&conn, id)? {
                Some(_) => Err(InventoryError::OutOfStock),
                None => Err(InventoryError::NotFound),
            };
        }

        Ok(quantity_of(&conn, id)?.unwrap_or(0))
    }

    /// Atomically increment stock and return the new quantity.
    pub fn restock(&self, id: i64, added: i64) -> Result<i64, InventoryError> {
        if added <= 0 {
            return Err(InventoryError::InvalidQuantity);
        }

        let conn = self.db.lock();
        let changes = conn.execute(
            "UPDATE sweets SET quantity = quantity + ?1 WHERE id = ?2",
            params![added, id],
        )?;

        if changes == 0 {
            return Err(InventoryError::NotFound);
        }

        Ok(quantity_of(&conn, id)?.unwrap_or(0))
    }
}

fn quantity_of(conn: &Connection, id: i64) -> Result<Option<i64>, InventoryError> {
    match conn.query_row(
        "SELECT quantity FROM sweets WHERE id = ?1",
        params![id],
        |row| row.get(0),
    ) {
        Ok(q) => Ok(Some(q)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(InventoryError::Storage(e)),
    }
}

fn row_to_sweet(row: &rusqlite::Row<'_>) -> rusqlite::Result<Sweet> {
    Ok(Sweet {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        price: row.get(3)?,
        quantity: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    fn create_test_store() -> (SweetStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let db = crate::db::open(temp_file.path().to_str().unwrap()).unwrap();
        (SweetStore::new(db), temp_file)
    }

    fn new_sweet(name: &str, category: &str, price: f64, quantity: i64) -> NewSweet {
        NewSweet {
            name: name.to_string(),
            category: category.to_string(),
            price,
            quantity,
        }
    }

    #[test]
    fn test_create_assigns_monotonic_ids() {
        let (store, _temp) = create_test_store();

        let first = store.create(new_sweet("Ladoo", "Indian", 2.5, 3)).unwrap();
        let second = store
            .create(new_sweet("Barfi", "Indian", 3.0, 10))
            .unwrap();

        assert!(second.id > first.id);
        assert_eq!(store.list_all().unwrap().len(), 2);
    }

    #[test]
    fn test_search_filters_narrow_with_and() {
        let (store, _temp) = create_test_store();
        store
            .create(new_sweet("Chocolate Bar", "Choco", 2.0, 5))
            .unwrap();
        store
            .create(new_sweet("Choco Fudge", "Chocolate", 5.0, 2))
            .unwrap();
        store
            .create(new_sweet("Gulab Jamun", "Indian", 1.5, 8))
            .unwrap();

        // Category substring, case-insensitive.
        let filters = SweetFilters {
            category: Some("choco".to_string()),
            ..Default::default()
        };
        let chocos = store.search(&filters).unwrap();
        assert_eq!(chocos.len(), 2);

        // Price band ANDs with category.
        let filters = SweetFilters {
            category: Some("Choco".to_string()),
            min_price: Some(3.0),
            ..Default::default()
        };
        let expensive = store.search(&filters).unwrap();
        assert_eq!(expensive.len(), 1);
        assert_eq!(expensive[0].name, "Choco Fudge");

        // No filters is the unfiltered list.
        let all = store.search(&SweetFilters::default()).unwrap();
        assert_eq!(all.len(), store.list_all().unwrap().len());
    }

    #[test]
    fn test_search_max_price_and_name() {
        let (store, _temp) = create_test_store();
        store
            .create(new_sweet("Gulab Jamun", "Indian", 1.5, 8))
            .unwrap();
        store.create(new_sweet("Ladoo", "Indian", 2.5, 3)).unwrap();

        let filters = SweetFilters {
            max_price: Some(2.0),
            ..Default::default()
        };
        let cheap = store.search(&filters).unwrap();
        assert_eq!(cheap.len(), 1);
        assert_eq!(cheap[0].name, "Gulab Jamun");

        let filters = SweetFilters {
            name: Some("jamun".to_string()),
            ..Default::default()
        };
        assert_eq!(store.search(&filters).unwrap().len(), 1);
    }

    #[test]
    fn test_update_replaces_all_fields() {
        let (store, _temp) = create_test_store();
        let sweet = store.create(new_sweet("Ladoo", "Indian", 2.5, 3)).unwrap();

        store
            .update(sweet.id, new_sweet("Motichoor Ladoo", "Indian", 3.0, 7))
            .unwrap();

        let all = store.list_all().unwrap();
        assert_eq!(all[0].name, "Motichoor Ladoo");
        assert_eq!(all[0].price, 3.0);
        assert_eq!(all[0].quantity, 7);
    }

    #[test]
    fn test_update_and_delete_missing_row() {
        let (store, _temp) = create_test_store();

        let err = store
            .update(9999, new_sweet("Ladoo", "Indian", 2.5, 3))
            .unwrap_err();
        assert!(matches!(err, InventoryError::NotFound));

        let err = store.delete(9999).unwrap_err();
        assert!(matches!(err, InventoryError::NotFound));
    }

    #[test]
    fn test_delete_removes_row() {
        let (store, _temp) = create_test_store();
        let sweet = store.create(new_sweet("Ladoo", "Indian", 2.5, 1)).unwrap();

        store.delete(sweet.id).unwrap();
        assert!(store.list_all().unwrap().is_empty());
        assert!(matches!(
            store.purchase(sweet.id).unwrap_err(),
            InventoryError::NotFound
        ));
    }

    #[test]
    fn test_purchase_decrements_to_zero_then_rejects() {
        let (store, _temp) = create_test_store();
        let sweet = store.create(new_sweet("Ladoo", "Indian", 2.5, 3)).unwrap();

        assert_eq!(store.purchase(sweet.id).unwrap(), 2);
        assert_eq!(store.purchase(sweet.id).unwrap(), 1);
        assert_eq!(store.purchase(sweet.id).unwrap(), 0);

        let err = store.purchase(sweet.id).unwrap_err();
        assert!(matches!(err, InventoryError::OutOfStock));

        // The rejected purchase must not have touched the row.
        assert_eq!(store.list_all().unwrap()[0].quantity, 0);
    }

    #[test]
    fn test_purchase_missing_row() {
        let (store, _temp) = create_test_store();
        assert!(matches!(
            store.purchase(9999).unwrap_err(),
            InventoryError::NotFound
        ));
    }

    #[test]
    fn test_concurrent_purchases_never_oversell() {
        let (store, _temp) = create_test_store();
        let sweet = store.create(new_sweet("Ladoo", "Indian", 2.5, 3)).unwrap();

        let store = Arc::new(store);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                let id = sweet.id;
                std::thread::spawn(move || store.purchase(id))
            })
            .collect();

        let mut successes = 0;
        let mut out_of_stock = 0;
        for handle in handles {
            match handle.join().unwrap() {
                Ok(_) => successes += 1,
                Err(InventoryError::OutOfStock) => out_of_stock += 1,
                Err(e) => panic!("unexpected purchase error: {}", e),
            }
        }

        assert_eq!(successes, 3);
        assert_eq!(out_of_stock, 5);
        assert_eq!(store.list_all().unwrap()[0].quantity, 0);
    }

    #[test]
    fn test_restock_adds_and_validates() {
        let (store, _temp) = create_test_store();
        let sweet = store.create(new_sweet("Ladoo", "Indian", 2.5, 3)).unwrap();

        assert_eq!(store.restock(sweet.id, 5).unwrap(), 8);

        let err = store.restock(sweet.id, 0).unwrap_err();
        assert!(matches!(err, InventoryError::InvalidQuantity));
        let err = store.restock(sweet.id, -4).unwrap_err();
        assert!(matches!(err, InventoryError::InvalidQuantity));

        // Rejected restocks leave the quantity unchanged.
        assert_eq!(store.list_all().unwrap()[0].quantity, 8);

        let err = store.restock(9999, 5).unwrap_err();
        assert!(matches!(err, InventoryError::NotFound));
    }
}
