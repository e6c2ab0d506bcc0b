use pantry_core::db::{open_db_in_memory, seed_default_locations};
use pantry_core::{
    Facet, FacetOptionsCache, LocationResolver, LocationTriple, PantryValidationError, RepoError,
    SqlitePantryStore,
};
use rusqlite::Connection;
use std::sync::Arc;

fn kitchen_cabinet_top() -> LocationTriple {
    LocationTriple::new("kitchen", "cabinet", "top")
}

#[test]
fn resolve_creates_first_row_and_reuses_it() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let store = SqlitePantryStore::try_new(&mut conn).unwrap();
        let mut resolver = LocationResolver::new(store);

        assert_eq!(resolver.resolve(&kitchen_cabinet_top()).unwrap(), 1);
        assert_eq!(resolver.resolve(&kitchen_cabinet_top()).unwrap(), 1);
    }
    assert_eq!(location_count(&conn), 1);
}

#[test]
fn resolve_matches_all_three_facets_exactly() {
    let mut conn = open_db_in_memory().unwrap();
    let store = SqlitePantryStore::try_new(&mut conn).unwrap();
    let mut resolver = LocationResolver::new(store);

    let first = resolver.resolve(&kitchen_cabinet_top()).unwrap();
    let other_direction = resolver
        .resolve(&LocationTriple::new("kitchen", "cabinet", "bottom"))
        .unwrap();
    let placeholder = resolver
        .resolve(&LocationTriple::new("kitchen", "", ""))
        .unwrap();
    let case_differs = resolver
        .resolve(&LocationTriple::new("Kitchen", "cabinet", "top"))
        .unwrap();

    assert_ne!(first, other_direction);
    assert_ne!(first, placeholder);
    assert_ne!(first, case_differs);
    assert_eq!(resolver.list_locations().unwrap().len(), 4);
}

#[test]
fn resolve_rejects_fully_unassigned_triple() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let store = SqlitePantryStore::try_new(&mut conn).unwrap();
        let mut resolver = LocationResolver::new(store);
        let err = resolver.resolve(&LocationTriple::default()).unwrap_err();
        assert!(matches!(
            err,
            RepoError::Validation(PantryValidationError::UnassignedLocation)
        ));
    }
    assert_eq!(location_count(&conn), 0);
}

#[test]
fn resolve_finds_seeded_location() {
    let mut conn = open_db_in_memory().unwrap();
    seed_default_locations(&mut conn).unwrap();
    let store = SqlitePantryStore::try_new(&mut conn).unwrap();
    let mut resolver = LocationResolver::new(store);

    let id = resolver
        .resolve(&LocationTriple::new("kitchen", "fridge", "beside"))
        .unwrap();
    let location = resolver.get_location(id).unwrap().unwrap();
    assert_eq!(location.display_label(), "Kitchen, Beside Fridge");
    assert_eq!(resolver.list_locations().unwrap().len(), 9);
}

#[test]
fn create_facet_normalizes_and_rejects_duplicates() {
    let mut conn = open_db_in_memory().unwrap();
    let store = SqlitePantryStore::try_new(&mut conn).unwrap();
    let mut resolver = LocationResolver::new(store);

    let created = resolver.create_facet(Facet::Room, "Living Room").unwrap();
    assert_eq!(created.room, "living_room");
    assert_eq!(created.spot_noun, "");
    assert_eq!(created.spot_direction, "");

    let err = resolver
        .create_facet(Facet::Room, "living room")
        .unwrap_err();
    match err {
        RepoError::DuplicateFacet { facet, value } => {
            assert_eq!(facet, Facet::Room);
            assert_eq!(value, "living_room");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(resolver.list_locations().unwrap().len(), 1);
}

#[test]
fn create_facet_duplicate_check_is_per_facet() {
    let mut conn = open_db_in_memory().unwrap();
    let store = SqlitePantryStore::try_new(&mut conn).unwrap();
    let mut resolver = LocationResolver::new(store);

    resolver.create_facet(Facet::Noun, "shelf").unwrap();
    resolver.create_facet(Facet::Room, "shelf").unwrap();
    resolver.resolve(&kitchen_cabinet_top()).unwrap();

    let err = resolver.create_facet(Facet::Noun, "CABINET").unwrap_err();
    assert!(matches!(err, RepoError::DuplicateFacet { .. }));
    assert_eq!(err.field(), Some("noun"));
}

#[test]
fn create_facet_detects_values_stored_by_resolve_as_typed() {
    let mut conn = open_db_in_memory().unwrap();
    let store = SqlitePantryStore::try_new(&mut conn).unwrap();
    let mut resolver = LocationResolver::new(store);

    resolver
        .resolve(&LocationTriple::new("Living Room", "cabinet", "top"))
        .unwrap();
    resolver
        .resolve(&LocationTriple::new("ÉTAGE", "cabinet", "top"))
        .unwrap();

    let err = resolver
        .create_facet(Facet::Room, "living room")
        .unwrap_err();
    assert!(matches!(err, RepoError::DuplicateFacet { .. }));

    let err = resolver.create_facet(Facet::Room, "étage").unwrap_err();
    assert!(matches!(err, RepoError::DuplicateFacet { .. }));

    let rooms = resolver.facet_options().unwrap().rooms;
    assert_eq!(rooms, vec!["Living Room", "ÉTAGE"]);
}

#[test]
fn create_facet_rejects_blank_and_overlong_values() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let store = SqlitePantryStore::try_new(&mut conn).unwrap();
        let mut resolver = LocationResolver::new(store);

        let blank = resolver.create_facet(Facet::Direction, "  ").unwrap_err();
        assert!(matches!(
            blank,
            RepoError::Validation(PantryValidationError::EmptyFacet(Facet::Direction))
        ));

        let overlong = resolver
            .create_facet(Facet::Direction, "sixteen chars!!!")
            .unwrap_err();
        assert!(matches!(
            overlong,
            RepoError::Validation(PantryValidationError::FacetTooLong { actual: 16, .. })
        ));
    }
    assert_eq!(location_count(&conn), 0);
}

#[test]
fn facet_options_are_sorted_distinct_and_skip_placeholders() {
    let mut conn = open_db_in_memory().unwrap();
    seed_default_locations(&mut conn).unwrap();
    let store = SqlitePantryStore::try_new(&mut conn).unwrap();
    let mut resolver = LocationResolver::new(store);
    resolver.create_facet(Facet::Room, "attic").unwrap();

    let options = resolver.facet_options().unwrap();
    assert_eq!(options.rooms.first().map(String::as_str), Some("attic"));
    assert!(!options.rooms.iter().any(String::is_empty));
    assert!(!options.nouns.iter().any(String::is_empty));
    assert_eq!(
        options.values(Facet::Noun),
        ["bed", "cabinet", "corner", "fridge", "rack", "shelf", "sink", "washer"]
    );
    let mut sorted = options.directions.clone();
    sorted.sort();
    assert_eq!(options.directions, sorted);
}

#[test]
fn inserts_invalidate_shared_facet_cache() {
    let mut conn = open_db_in_memory().unwrap();
    let cache = Arc::new(FacetOptionsCache::new());
    let store = SqlitePantryStore::try_new(&mut conn).unwrap();
    let mut resolver = LocationResolver::with_cache(store, Arc::clone(&cache));

    assert!(resolver.facet_options().unwrap().rooms.is_empty());
    assert!(cache.is_cached());

    resolver.create_facet(Facet::Room, "Garage").unwrap();
    assert!(!cache.is_cached());
    assert_eq!(resolver.facet_options().unwrap().rooms, vec!["garage"]);

    let generation = cache.generation();
    resolver.resolve(&kitchen_cabinet_top()).unwrap();
    assert_eq!(cache.generation(), generation + 1);
    assert_eq!(
        resolver.facet_options().unwrap().rooms,
        vec!["garage", "kitchen"]
    );

    // Reusing an existing triple writes nothing and keeps the cache.
    resolver.resolve(&kitchen_cabinet_top()).unwrap();
    assert_eq!(cache.generation(), generation + 1);
    assert!(cache.is_cached());
}

#[test]
fn store_rejects_unmigrated_connection() {
    let mut conn = Connection::open_in_memory().unwrap();
    let err = SqlitePantryStore::try_new(&mut conn).err().unwrap();
    assert!(matches!(
        err,
        RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));
}

fn location_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM locations;", [], |row| row.get(0))
        .unwrap()
}
