//! Pantry item repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Insert validated items against an existing or freshly resolved location.
//! - Provide read APIs for item detail and filtered lists.
//!
//! # Invariants
//! - An item row is never written without its location row in the same
//!   committed state.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::model::location::{LocationId, LocationTriple};
use crate::model::pantry_item::{
    parse_date, Amount, Category, NewPantryItem, PantryItem, PantryItemId, DATE_FORMAT,
};
use crate::repo::location_repo::{location_exists, resolve_location_in};
use crate::repo::{RepoError, RepoResult, SqlitePantryStore};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    name,
    date_bought,
    date_expiry,
    cost,
    quantity,
    category,
    amount,
    consumed,
    location_id,
    created_at
FROM pantry_items";

const ITEMS_DEFAULT_LIMIT: u32 = 50;
const ITEMS_LIMIT_MAX: u32 = 200;

/// Result of the combined location-then-item write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedPantryItem {
    pub item_id: PantryItemId,
    pub location_id: LocationId,
    /// `true` when the location row was inserted by the same transaction.
    pub location_created: bool,
}

/// Query options for listing items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PantryItemListQuery {
    pub location_id: Option<LocationId>,
    pub category: Option<Category>,
    pub include_consumed: bool,
    /// Defaults to 50 and clamps to 200.
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for pantry item operations.
pub trait PantryItemRepository {
    /// Inserts one item referencing an existing location.
    fn insert_item(
        &mut self,
        item: &NewPantryItem,
        location_id: LocationId,
    ) -> RepoResult<PantryItemId>;
    /// Resolves `triple` and inserts the item in a single transaction.
    fn insert_item_at(
        &mut self,
        item: &NewPantryItem,
        triple: &LocationTriple,
    ) -> RepoResult<SavedPantryItem>;
    /// Loads one item by id.
    fn get_item(&self, id: PantryItemId) -> RepoResult<Option<PantryItem>>;
    /// Lists items, newest first.
    fn list_items(&self, query: &PantryItemListQuery) -> RepoResult<Vec<PantryItem>>;
}

impl PantryItemRepository for SqlitePantryStore<'_> {
    fn insert_item(
        &mut self,
        item: &NewPantryItem,
        location_id: LocationId,
    ) -> RepoResult<PantryItemId> {
        item.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !location_exists(&tx, location_id)? {
            return Err(RepoError::LocationNotFound(location_id));
        }
        let item_id = insert_item_row(&tx, item, location_id)?;
        tx.commit()?;
        Ok(item_id)
    }

    fn insert_item_at(
        &mut self,
        item: &NewPantryItem,
        triple: &LocationTriple,
    ) -> RepoResult<SavedPantryItem> {
        item.validate()?;
        triple.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let location = resolve_location_in(&tx, triple)?;
        let item_id = insert_item_row(&tx, item, location.id)?;
        tx.commit()?;

        Ok(SavedPantryItem {
            item_id,
            location_id: location.id,
            location_created: location.created,
        })
    }

    fn get_item(&self, id: PantryItemId) -> RepoResult<Option<PantryItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }
        Ok(None)
    }

    fn list_items(&self, query: &PantryItemListQuery) -> RepoResult<Vec<PantryItem>> {
        let mut sql = format!("{ITEM_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if !query.include_consumed {
            sql.push_str(" AND consumed = 0");
        }
        if let Some(location_id) = query.location_id {
            sql.push_str(" AND location_id = ?");
            bind_values.push(Value::Integer(location_id));
        }
        if let Some(category) = query.category {
            sql.push_str(" AND category = ?");
            bind_values.push(Value::Text(category.as_str().to_string()));
        }

        sql.push_str(" ORDER BY created_at DESC, id DESC LIMIT ?");
        bind_values.push(Value::Integer(i64::from(normalize_item_limit(query.limit))));
        if query.offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }
        Ok(items)
    }
}

/// Normalizes list limit according to the item list contract.
pub fn normalize_item_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => ITEMS_DEFAULT_LIMIT,
        Some(value) if value > ITEMS_LIMIT_MAX => ITEMS_LIMIT_MAX,
        Some(value) => value,
    }
}

fn insert_item_row(
    conn: &Connection,
    item: &NewPantryItem,
    location_id: LocationId,
) -> RepoResult<PantryItemId> {
    conn.execute(
        "INSERT INTO pantry_items (
            name,
            date_bought,
            date_expiry,
            cost,
            quantity,
            category,
            amount,
            consumed,
            location_id
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
        params![
            item.name.as_str(),
            item.date_bought.format(DATE_FORMAT).to_string(),
            item.date_expiry.format(DATE_FORMAT).to_string(),
            item.cost.as_str(),
            item.quantity.to_string(),
            item.category.as_str(),
            item.amount.as_str(),
            bool_to_int(item.consumed),
            location_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<PantryItem> {
    let date_bought_text: String = row.get("date_bought")?;
    let date_bought = parse_date("date_bought", &date_bought_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date `{date_bought_text}` in pantry_items.date_bought"
        ))
    })?;

    let date_expiry_text: String = row.get("date_expiry")?;
    let date_expiry = parse_date("date_expiry", &date_expiry_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date `{date_expiry_text}` in pantry_items.date_expiry"
        ))
    })?;

    let quantity_text: String = row.get("quantity")?;
    let quantity = quantity_text.parse::<u32>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid quantity `{quantity_text}` in pantry_items.quantity"
        ))
    })?;

    let category_text: String = row.get("category")?;
    let category = Category::parse(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in pantry_items.category"
        ))
    })?;

    let amount_text: String = row.get("amount")?;
    let amount = Amount::parse(&amount_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid amount `{amount_text}` in pantry_items.amount"
        ))
    })?;

    let consumed = match row.get::<_, i64>("consumed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid consumed value `{other}` in pantry_items.consumed"
            )));
        }
    };

    Ok(PantryItem {
        id: row.get("id")?,
        name: row.get("name")?,
        date_bought,
        date_expiry,
        cost: row.get("cost")?,
        quantity,
        category,
        amount,
        consumed,
        location_id: row.get("location_id")?,
        created_at: row.get("created_at")?,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
