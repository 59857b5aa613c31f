use filterstore_core::db::open_db_in_memory;
use filterstore_core::{Filter, FilterService, SqliteFilterRepository, NO_ID};

#[test]
fn save_inserts_unsaved_filter_and_writes_back_id() {
    let conn = open_db_in_memory().unwrap();
    let service = FilterService::new(SqliteFilterRepository::try_new(&conn).unwrap());

    let mut filter = Filter::new("Due today").with_sql("WHERE dueDate < tomorrow()");
    assert_eq!(filter.id, NO_ID);

    let id = service.save(&mut filter).unwrap();

    assert_eq!(filter.id, id);
    assert_eq!(service.get(id).unwrap(), Some(filter));
}

#[test]
fn save_updates_saved_filter_in_place() {
    let conn = open_db_in_memory().unwrap();
    let service = FilterService::new(SqliteFilterRepository::try_new(&conn).unwrap());

    let mut filter = Filter::new("Draft");
    let id = service.save(&mut filter).unwrap();

    filter.title = Some("Final".to_string());
    filter.order = 3;
    assert_eq!(service.save(&mut filter).unwrap(), id);

    let filters = service.list().unwrap();
    assert_eq!(filters.len(), 1);
    assert_eq!(filters[0].title.as_deref(), Some("Final"));
    assert_eq!(filters[0].order, 3);
}

#[test]
fn service_wraps_repository_calls() {
    let conn = open_db_in_memory().unwrap();
    let service = FilterService::new(SqliteFilterRepository::try_new(&conn).unwrap());

    let id = service.insert(&Filter::new("Errands")).unwrap();
    assert_eq!(service.find_by_title("errands").unwrap().map(|f| f.id), Some(id));

    let mut renamed = service.get(id).unwrap().unwrap();
    renamed.title = Some("Chores".to_string());
    service.update(&renamed).unwrap();
    assert!(service.find_by_title("errands").unwrap().is_none());

    service.delete(id).unwrap();
    assert!(service.get(id).unwrap().is_none());
    assert!(service.list().unwrap().is_empty());
}

#[test]
fn filters_serialize_to_json_with_field_names() {
    let filter = Filter {
        id: 5,
        values: Some(r#"{"priority":1}"#.to_string()),
        ..Filter::new("Important")
    };

    let json = serde_json::to_value(&filter).unwrap();
    assert_eq!(json["id"], 5);
    assert_eq!(json["title"], "Important");
    assert_eq!(json["values"], r#"{"priority":1}"#);
    assert_eq!(json["order"], -1);
    assert!(json["sql"].is_null());

    let back: Filter = serde_json::from_value(json).unwrap();
    assert_eq!(back, filter);
}
