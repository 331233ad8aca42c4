//! Database operations for the card inventory
//!
//! Uses parameterized queries exclusively (no user input in SQL strings).
//! Each operation runs a single statement on a caller-supplied connection;
//! `Store` hands out one fresh connection per request.

use crate::models::{CardInput, DashboardSummary, InventoryItem, SearchFilter};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::path::{Path, PathBuf};

/// Result type for database operations
pub type DbResult<T> = rusqlite::Result<T>;

const ITEM_COLUMNS: &str = "id, card_name, player, year, condition, quantity, purchase_price,
     purchase_date, set_name, card_number, grading, sale_price, sale_date, vendor_or_buyer";

/// Location of the SQLite file; opens a new connection on demand
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a connection for the duration of one request.
    ///
    /// The connection closes when dropped, so every exit path of the
    /// caller releases it.
    pub fn connect(&self) -> DbResult<Connection> {
        Connection::open(&self.path)
    }
}

/// Initialize the database schema
///
/// Creates the `inventory` table if it doesn't exist. Safe to call on every
/// start; existing data and columns are left alone.
pub fn init_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        "
        -- One row per card lot
        CREATE TABLE IF NOT EXISTS inventory (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            card_name TEXT NOT NULL,
            player TEXT,
            year INTEGER,
            condition TEXT,
            quantity INTEGER DEFAULT 1,
            purchase_price REAL,
            purchase_date TEXT,
            set_name TEXT,
            card_number TEXT,
            grading TEXT,
            sale_price REAL,
            sale_date TEXT,
            vendor_or_buyer TEXT
        );
        ",
    )?;

    log::info!("Database schema initialized");
    Ok(())
}

/// Compute the dashboard totals over the whole table
///
/// Sums over an empty table (or all-NULL prices) come back as 0.
pub fn dashboard_summary(conn: &Connection) -> DbResult<DashboardSummary> {
    conn.query_row(
        "SELECT COUNT(*),
                COALESCE(SUM(purchase_price * quantity), 0.0),
                COALESCE(SUM(sale_price * quantity), 0.0)
         FROM inventory",
        [],
        |row| {
            Ok(DashboardSummary {
                total_cards: row.get(0)?,
                total_value: row.get(1)?,
                total_sales: row.get(2)?,
            })
        },
    )
}

/// Insert a new lot, returning its assigned id
pub fn insert_item(conn: &Connection, item: &CardInput) -> DbResult<i64> {
    conn.execute(
        "INSERT INTO inventory
         (card_name, player, year, condition, quantity, purchase_price, purchase_date,
          set_name, card_number, grading, sale_price, sale_date, vendor_or_buyer)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            &item.card_name,
            &item.player,
            item.year,
            &item.condition,
            item.quantity,
            item.purchase_price,
            &item.purchase_date,
            &item.set_name,
            &item.card_number,
            &item.grading,
            item.sale_price,
            &item.sale_date,
            &item.vendor_or_buyer,
        ],
    )?;
    let id = conn.last_insert_rowid();
    log::info!("Added card {} ({})", id, item.card_name);
    Ok(id)
}

/// List lots matching the filter, in insertion order
///
/// `search` is a case-insensitive (ASCII) substring match against
/// `card_name` or `player`; `%` and `_` in it match literally.
/// `player` and `year` are exact matches. Present predicates are ANDed.
pub fn list_items(conn: &Connection, filter: &SearchFilter) -> DbResult<Vec<InventoryItem>> {
    let mut conditions: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(search) = &filter.search {
        conditions.push("(card_name LIKE ? ESCAPE '\\' OR player LIKE ? ESCAPE '\\')");
        let pattern = format!("%{}%", escape_like(search));
        values.push(Value::Text(pattern.clone()));
        values.push(Value::Text(pattern));
    }
    if let Some(player) = &filter.player {
        conditions.push("player = ?");
        values.push(Value::Text(player.clone()));
    }
    if let Some(year) = filter.year {
        conditions.push("year = ?");
        values.push(Value::Integer(year));
    }

    let mut sql = format!("SELECT {} FROM inventory", ITEM_COLUMNS);
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql.push_str(" ORDER BY id");

    let mut stmt = conn.prepare(&sql)?;
    let results: DbResult<Vec<InventoryItem>> =
        stmt.query_map(params_from_iter(values), item_from_row)?.collect();
    results
}

/// Get one lot by id
pub fn get_item(conn: &Connection, id: i64) -> DbResult<Option<InventoryItem>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM inventory WHERE id = ?1",
        ITEM_COLUMNS
    ))?;

    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(row) => Ok(Some(item_from_row(row)?)),
        None => Ok(None),
    }
}

/// Overwrite every field of a lot
///
/// Returns `false` when no row has this id (nothing was written).
pub fn update_item(conn: &Connection, id: i64, item: &CardInput) -> DbResult<bool> {
    let changed = conn.execute(
        "UPDATE inventory
         SET card_name = ?1, player = ?2, year = ?3, condition = ?4, quantity = ?5,
             purchase_price = ?6, purchase_date = ?7, set_name = ?8, card_number = ?9,
             grading = ?10, sale_price = ?11, sale_date = ?12, vendor_or_buyer = ?13
         WHERE id = ?14",
        params![
            &item.card_name,
            &item.player,
            item.year,
            &item.condition,
            item.quantity,
            item.purchase_price,
            &item.purchase_date,
            &item.set_name,
            &item.card_number,
            &item.grading,
            item.sale_price,
            &item.sale_date,
            &item.vendor_or_buyer,
            id,
        ],
    )?;

    if changed > 0 {
        log::info!("Updated card {}", id);
    } else {
        log::warn!("Update skipped, no card with id {}", id);
    }
    Ok(changed > 0)
}

/// Delete a lot
///
/// Returns `false` when no row has this id; the table is left unchanged.
pub fn delete_item(conn: &Connection, id: i64) -> DbResult<bool> {
    let changed = conn.execute("DELETE FROM inventory WHERE id = ?1", params![id])?;

    if changed > 0 {
        log::info!("Deleted card {}", id);
    } else {
        log::warn!("Delete skipped, no card with id {}", id);
    }
    Ok(changed > 0)
}

fn item_from_row(row: &Row<'_>) -> DbResult<InventoryItem> {
    Ok(InventoryItem {
        id: row.get(0)?,
        card_name: row.get(1)?,
        player: row.get(2)?,
        year: row.get(3)?,
        condition: row.get(4)?,
        quantity: row.get(5)?,
        purchase_price: row.get(6)?,
        purchase_date: row.get(7)?,
        set_name: row.get(8)?,
        card_number: row.get(9)?,
        grading: row.get(10)?,
        sale_price: row.get(11)?,
        sale_date: row.get(12)?,
        vendor_or_buyer: row.get(13)?,
    })
}

/// Escape LIKE wildcards so the term matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
