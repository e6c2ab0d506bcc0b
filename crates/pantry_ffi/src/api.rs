//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Translate core errors into envelopes the form can show inline.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call opens its own connection; the facet cache is process-wide.

use log::warn;
use pantry_core::db::{open_db, seed_default_locations, DEFAULT_DB_FILE_NAME};
use pantry_core::repo::pantry_item_repo::normalize_item_limit;
use pantry_core::{
    core_version as core_version_inner, humanize_facet, init_logging as init_logging_inner,
    Facet, FacetOptionsCache, LocationResolver, LocationTriple, PantryItem, PantryItemDraft,
    PantryItemListQuery, PantryItemWriter, RepoError, RepoResult, SqlitePantryStore,
};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

const DB_PATH_ENV: &str = "PANTRY_DB_PATH";
static PANTRY_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static FACET_CACHE: OnceLock<Arc<FacetOptionsCache>> = OnceLock::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Opens (and migrates) the pantry database and seeds default locations.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Seeds only an empty `locations` table.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn bootstrap_pantry() -> String {
    let db_path = resolve_pantry_db_path();
    let mut conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => return format!("bootstrap_pantry failed: {err}"),
    };
    match seed_default_locations(&mut conn) {
        Ok(0) => String::new(),
        Ok(_) => {
            facet_cache().invalidate();
            String::new()
        }
        Err(err) => format!("bootstrap_pantry failed: {err}"),
    }
}

/// Chip values for the location page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationOptionsResponse {
    pub ok: bool,
    /// Sorted distinct room values.
    pub rooms: Vec<String>,
    /// Sorted distinct spot nouns.
    pub nouns: Vec<String>,
    /// Sorted distinct spot directions.
    pub directions: Vec<String>,
    pub message: String,
}

/// Result of the "add new" chip flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationActionResponse {
    pub ok: bool,
    pub location_id: Option<i64>,
    /// Stored (normalized) facet value, e.g. `living_room`.
    pub value: Option<String>,
    /// Display form of `value`, e.g. `Living Room`.
    pub label: Option<String>,
    /// Field to highlight on failure.
    pub field: Option<String>,
    pub message: String,
}

/// Form input for one pantry item plus its location selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PantryItemInput {
    pub name: String,
    pub quantity: String,
    pub cost: String,
    pub category: String,
    /// Omitted means `full`.
    pub amount: Option<String>,
    /// `YYYY-MM-DD`.
    pub date_bought: String,
    /// `YYYY-MM-DD`.
    pub date_expiry: String,
    pub room: String,
    pub spot_noun: String,
    pub spot_direction: String,
}

/// Generic action response envelope for item writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PantryActionResponse {
    pub ok: bool,
    pub item_id: Option<i64>,
    pub location_id: Option<i64>,
    /// Field to highlight on failure.
    pub field: Option<String>,
    pub message: String,
}

/// One row of the pantry list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PantryListItem {
    pub item_id: i64,
    pub name: String,
    pub quantity: u32,
    pub cost: String,
    pub category: String,
    pub amount: String,
    pub date_bought: String,
    pub date_expiry: String,
    pub location_id: i64,
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PantryListResponse {
    pub items: Vec<PantryListItem>,
    pub message: String,
    /// Effective applied list limit.
    pub applied_limit: u32,
}

/// Returns distinct facet values, served from the process-wide cache.
///
/// # FFI contract
/// - Sync call, DB-backed on cache miss.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn location_options() -> LocationOptionsResponse {
    let result = with_store("location_options", |store| {
        LocationResolver::with_cache(store, facet_cache()).facet_options()
    });
    match result {
        Ok(options) => LocationOptionsResponse {
            ok: true,
            rooms: options.rooms,
            nouns: options.nouns,
            directions: options.directions,
            message: String::new(),
        },
        Err(failure) => LocationOptionsResponse {
            ok: false,
            rooms: Vec::new(),
            nouns: Vec::new(),
            directions: Vec::new(),
            message: failure.message,
        },
    }
}

/// Creates a location with only one facet assigned.
///
/// Input semantics:
/// - `facet`: `room|noun|direction` (`spot_noun`/`spot_direction` accepted).
/// - `value`: free text, 1..=15 characters after trimming.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; duplicates and invalid input return `ok=false` with `field`.
#[flutter_rust_bridge::frb(sync)]
pub fn location_create_facet(facet: String, value: String) -> LocationActionResponse {
    let Some(facet) = Facet::parse(&facet) else {
        return LocationActionResponse {
            ok: false,
            location_id: None,
            value: None,
            label: None,
            field: Some("facet".to_string()),
            message: format!("location_create_facet failed: unknown facet `{facet}`"),
        };
    };

    let result = with_store("location_create_facet", |store| {
        LocationResolver::with_cache(store, facet_cache()).create_facet(facet, &value)
    });
    match result {
        Ok(location) => {
            let stored = location.triple().facet(facet).to_string();
            LocationActionResponse {
                ok: true,
                location_id: Some(location.id),
                label: Some(humanize_facet(&stored)),
                value: Some(stored),
                field: None,
                message: "Location created.".to_string(),
            }
        }
        Err(failure) => LocationActionResponse {
            ok: false,
            location_id: None,
            value: None,
            label: None,
            field: failure.field,
            message: failure.message,
        },
    }
}

/// Validates and saves one item, creating its location when needed.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Location and item are written in one transaction.
/// - Never panics; validation failures return `ok=false` with `field`.
#[flutter_rust_bridge::frb(sync)]
pub fn pantry_add_item(input: PantryItemInput) -> PantryActionResponse {
    let (draft, triple) = split_input(input);
    let result = with_store("pantry_add_item", |store| {
        PantryItemWriter::with_cache(store, facet_cache()).save(&draft, &triple)
    });
    match result {
        Ok(saved) => PantryActionResponse {
            ok: true,
            item_id: Some(saved.item_id),
            location_id: Some(saved.location_id),
            field: None,
            message: "Item saved.".to_string(),
        },
        Err(failure) => PantryActionResponse {
            ok: false,
            item_id: None,
            location_id: None,
            field: failure.field,
            message: failure.message,
        },
    }
}

/// Lists unconsumed items, newest first.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - `limit` defaults to 50 and clamps to 200.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn pantry_list_items(location_id: Option<i64>, limit: Option<u32>) -> PantryListResponse {
    let applied_limit = normalize_item_limit(limit);
    let query = PantryItemListQuery {
        location_id,
        limit: Some(applied_limit),
        ..PantryItemListQuery::default()
    };
    let result = with_store("pantry_list_items", |store| {
        PantryItemWriter::with_cache(store, facet_cache()).list_items(&query)
    });
    match result {
        Ok(items) => {
            let items = items.into_iter().map(to_list_item).collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No items.".to_string()
            } else {
                format!("Found {} item(s).", items.len())
            };
            PantryListResponse {
                items,
                message,
                applied_limit,
            }
        }
        Err(failure) => PantryListResponse {
            items: Vec::new(),
            message: failure.message,
            applied_limit,
        },
    }
}

struct CallFailure {
    message: String,
    field: Option<String>,
}

impl CallFailure {
    fn from_repo(op: &str, err: &RepoError) -> Self {
        Self {
            message: format!("{op} failed: {err}"),
            field: err.field().map(str::to_string),
        }
    }
}

fn with_store<T>(
    op: &str,
    f: impl FnOnce(SqlitePantryStore<'_>) -> RepoResult<T>,
) -> Result<T, CallFailure> {
    let db_path = resolve_pantry_db_path();
    let mut conn = open_db(&db_path).map_err(|err| CallFailure {
        message: format!("{op} failed: pantry DB open failed: {err}"),
        field: None,
    })?;
    let store =
        SqlitePantryStore::try_new(&mut conn).map_err(|err| CallFailure::from_repo(op, &err))?;
    f(store).map_err(|err| CallFailure::from_repo(op, &err))
}

fn resolve_pantry_db_path() -> PathBuf {
    PANTRY_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
                warn!("event=db_path_resolve module=ffi status=fallback reason=empty_env");
            }
            std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
        })
        .clone()
}

fn facet_cache() -> Arc<FacetOptionsCache> {
    Arc::clone(FACET_CACHE.get_or_init(|| Arc::new(FacetOptionsCache::new())))
}

fn split_input(input: PantryItemInput) -> (PantryItemDraft, LocationTriple) {
    let triple = LocationTriple::new(input.room, input.spot_noun, input.spot_direction);
    let draft = PantryItemDraft {
        name: input.name,
        quantity: input.quantity,
        cost: input.cost,
        category: input.category,
        amount: input.amount,
        date_bought: input.date_bought,
        date_expiry: input.date_expiry,
    };
    (draft, triple)
}

fn to_list_item(item: PantryItem) -> PantryListItem {
    PantryListItem {
        item_id: item.id,
        name: item.name,
        quantity: item.quantity,
        cost: item.cost,
        category: item.category.as_str().to_string(),
        amount: item.amount.as_str().to_string(),
        date_bought: item.date_bought.to_string(),
        date_expiry: item.date_expiry.to_string(),
        location_id: item.location_id,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        bootstrap_pantry, core_version, init_logging, location_create_facet, location_options,
        pantry_add_item, pantry_list_items, resolve_pantry_db_path, PantryItemInput,
        PANTRY_DB_PATH,
    };
    use pantry_core::db::{open_db, DEFAULT_DB_FILE_NAME};
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn bootstrap_seeds_location_options() {
        use_run_db();
        assert_eq!(bootstrap_pantry(), "");
        let options = location_options();
        assert!(options.ok, "{}", options.message);
        assert!(options.rooms.iter().any(|room| room == "kitchen"));
        assert!(options.nouns.iter().any(|noun| noun == "fridge"));
        assert!(options.directions.iter().all(|value| !value.is_empty()));
    }

    #[test]
    fn create_facet_normalizes_and_rejects_duplicates() {
        use_run_db();
        let raw = format!("Room {}", unique_suffix());
        let created = location_create_facet("room".to_string(), raw.clone());
        assert!(created.ok, "{}", created.message);
        let stored = created.value.clone().unwrap();
        assert!(stored.starts_with("room_"));
        assert!(created.label.unwrap().starts_with("Room "));
        assert!(location_options().rooms.contains(&stored));

        let duplicate = location_create_facet("room".to_string(), raw.to_uppercase());
        assert!(!duplicate.ok);
        assert_eq!(duplicate.field.as_deref(), Some("room"));
    }

    #[test]
    fn create_facet_rejects_unknown_facet() {
        let response = location_create_facet("shelf".to_string(), "top".to_string());
        assert!(!response.ok);
        assert_eq!(response.field.as_deref(), Some("facet"));
    }

    #[test]
    fn add_item_then_list_by_location() {
        use_run_db();
        let direction = format!("d{}", unique_suffix());
        let added = pantry_add_item(PantryItemInput {
            spot_direction: direction,
            ..milk()
        });
        assert!(added.ok, "{}", added.message);
        let location_id = added.location_id.unwrap();

        let listed = pantry_list_items(Some(location_id), Some(500));
        assert_eq!(listed.applied_limit, 200);
        assert_eq!(listed.items.len(), 1);
        assert_eq!(listed.items[0].item_id, added.item_id.unwrap());
        assert_eq!(listed.items[0].cost, "3.50");
        assert_eq!(listed.items[0].amount, "full");
    }

    #[test]
    fn add_item_stores_canonical_quantity_and_default_cost() {
        use_run_db();
        let added = pantry_add_item(PantryItemInput {
            quantity: " 04 ".to_string(),
            cost: String::new(),
            ..milk()
        });
        assert!(added.ok, "{}", added.message);

        let conn = open_db(use_run_db()).expect("open db");
        let (quantity, cost): (String, String) = conn
            .query_row(
                "SELECT quantity, cost FROM pantry_items WHERE id = ?1",
                rusqlite::params![added.item_id.expect("saved item id")],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .expect("query item row");
        assert_eq!(quantity, "4");
        assert_eq!(cost, "0");
    }

    #[test]
    fn add_item_reports_failing_field() {
        use_run_db();
        let response = pantry_add_item(PantryItemInput {
            cost: "3.555".to_string(),
            ..milk()
        });
        assert!(!response.ok);
        assert_eq!(response.field.as_deref(), Some("cost"));
        assert!(response.message.starts_with("pantry_add_item failed"));
    }

    #[test]
    fn tests_run_against_a_private_database() {
        let path = use_run_db();
        assert_eq!(resolve_pantry_db_path(), path);
        assert_ne!(path, std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
    }

    /// Pins the process DB path to a fresh per-run directory.
    fn use_run_db() -> PathBuf {
        PANTRY_DB_PATH
            .get_or_init(|| {
                let dir = std::env::temp_dir().join(format!(
                    "pantry-ffi-tests-{}-{}",
                    std::process::id(),
                    unique_suffix()
                ));
                std::fs::create_dir_all(&dir).expect("create test db dir");
                dir.join(DEFAULT_DB_FILE_NAME)
            })
            .clone()
    }

    fn milk() -> PantryItemInput {
        PantryItemInput {
            name: "Milk".to_string(),
            quantity: "2".to_string(),
            cost: "3.50".to_string(),
            category: "food".to_string(),
            amount: None,
            date_bought: "2024-01-01".to_string(),
            date_expiry: "2024-04-01".to_string(),
            room: "kitchen".to_string(),
            spot_noun: "fridge".to_string(),
            spot_direction: "beside".to_string(),
        }
    }

    fn unique_suffix() -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{}", nanos % 1_000_000_000)
    }
}
