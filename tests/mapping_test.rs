use rowmap::prelude::*;
use rowmap::field_map::DescriptorError;
use std::collections::HashMap;
use std::sync::Arc;

#[record]
pub struct Person {
    #[column("id")]
    pub person_id: i64,
    pub name: String,
    pub email: Option<String>,
}

#[record(params)]
pub struct NewPerson {
    pub name: String,
    #[column("mail")]
    pub email: Option<String>,
}

#[derive(Debug, Default, Record)]
pub struct Pair(i64, String);

fn people_db() -> MemoryDb {
    let db = MemoryDb::new("postgres");
    db.add_result(
        "SELECT name, id FROM person",
        ResultSet::new(["name", "id"])
            .row(args!["Ann", 7i64])
            .row(args!["Bob", 8i64]),
    );
    db.add_result(
        "SELECT id, name, email FROM person",
        ResultSet::new(["id", "name", "email"])
            .row(args![7i64, "Ann", "ann@example.com"])
            .row(args![8i64, "Bob", None::<String>]),
    );
    db.add_result(
        "SELECT id, name, email, age FROM person",
        ResultSet::new(["id", "name", "email", "age"]).row(args![7i64, "Ann", None::<String>, 31]),
    );
    db.add_result("SELECT * FROM empty", ResultSet::new(["id", "name"]));
    db.add_result(
        "SELECT id, name, age FROM empty",
        ResultSet::new(["id", "name", "age"]),
    );
    db
}

#[tokio::test]
async fn test_select_maps_columns_by_name() {
    let db = people_db();
    let mut people: Vec<Person> = Vec::new();

    select(&db, &mut people, "SELECT name, id FROM person", args![])
        .await
        .unwrap();

    assert_eq!(people.len(), 2);
    assert_eq!(people[0].person_id, 7);
    assert_eq!(people[0].name, "Ann");
    assert_eq!(people[0].email, None);
    assert_eq!(people[1].name, "Bob");
    assert_eq!(db.open_cursors(), 0);
}

#[tokio::test]
async fn test_column_order_does_not_matter() {
    let db = people_db();
    let mut by_name: Vec<Person> = Vec::new();
    let mut by_id: Vec<Person> = Vec::new();

    select(&db, &mut by_name, "SELECT name, id FROM person", args![]).await.unwrap();
    select(&db, &mut by_id, "SELECT id, name, email FROM person", args![]).await.unwrap();

    let pairs = |people: &[Person]| {
        people
            .iter()
            .map(|p| (p.person_id, p.name.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(pairs(&by_name), pairs(&by_id));
    assert_eq!(by_id[0].email.as_deref(), Some("ann@example.com"));
}

#[tokio::test]
async fn test_unmapped_column_fails_and_closes_cursor() {
    let db = people_db();
    let mut people: Vec<Person> = Vec::new();

    let err = select(&db, &mut people, "SELECT id, name, email, age FROM person", args![])
        .await
        .unwrap_err();

    assert!(matches!(err, MapError::UnmappedColumn(ref column) if column == "age"));
    assert!(people.is_empty());
    assert_eq!(db.open_cursors(), 0);
}

#[tokio::test]
async fn test_unmapped_column_is_reported_without_rows() {
    let db = people_db();
    let mut people: Vec<Person> = Vec::new();
    let mut person = Person::default();

    let err = select(&db, &mut people, "SELECT id, name, age FROM empty", args![])
        .await
        .unwrap_err();
    assert!(matches!(err, MapError::UnmappedColumn(ref column) if column == "age"));

    let err = get(&db, &mut person, "SELECT id, name, age FROM empty", args![])
        .await
        .unwrap_err();
    assert!(matches!(err, MapError::UnmappedColumn(ref column) if column == "age"));
    assert_eq!(db.open_cursors(), 0);
}

#[tokio::test]
async fn test_select_into_pointer_elements() {
    let db = people_db();
    let mut boxed: Vec<Box<Person>> = Vec::new();
    let mut shared: Vec<Arc<Person>> = Vec::new();

    select(&db, &mut boxed, "SELECT name, id FROM person", args![]).await.unwrap();
    select(&db, &mut shared, "SELECT name, id FROM person", args![]).await.unwrap();

    assert_eq!(boxed[1].person_id, 8);
    assert_eq!(shared[0].name, "Ann");
}

#[tokio::test]
async fn test_get_reads_first_row() {
    let db = people_db();
    let mut person = Person::default();

    get(&db, &mut person, "SELECT name, id FROM person", args![]).await.unwrap();

    assert_eq!(person.person_id, 7);
    assert_eq!(person.name, "Ann");
    assert_eq!(db.open_cursors(), 0);
}

#[tokio::test]
async fn test_get_without_rows() {
    let db = people_db();
    let mut person = Person {
        person_id: 1,
        ..Person::default()
    };

    let err = get(&db, &mut person, "SELECT * FROM empty", args![]).await.unwrap_err();

    assert!(matches!(err, MapError::NoRows));
    assert_eq!(person.person_id, 1);
    assert_eq!(db.open_cursors(), 0);
}

#[tokio::test]
async fn test_tuple_record_is_rejected_before_querying() {
    let db = people_db();
    let mut pairs: Vec<Pair> = Vec::new();

    let err = select(&db, &mut pairs, "SELECT name, id FROM person", args![])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MapError::Descriptor(DescriptorError::NotAStruct { .. })
    ));
    assert!(db.statements().is_empty());
}

#[tokio::test]
async fn test_rows_session() {
    let db = people_db();
    let mut rows = queryx(&db, "SELECT name, id FROM person", args![]).await.unwrap();
    assert_eq!(rows.columns().unwrap(), ["name", "id"]);

    let mut seen = Vec::new();
    while rows.advance().unwrap() {
        let mut person = Person::default();
        rows.struct_scan(&mut person).unwrap();
        seen.push(person.person_id);
    }
    assert_eq!(seen, [7, 8]);

    drop(rows);
    assert_eq!(db.open_cursors(), 0);
}

#[tokio::test]
async fn test_named_exec_binds_fields_in_order() {
    let db = MemoryDb::new("postgres");
    db.add_exec("INSERT INTO person (name, email) VALUES ($1, $2)", 1);

    let new_person = NewPerson {
        name: "Ann".to_string(),
        email: Some("ann@example.com".to_string()),
    };
    let result = named_exec(
        &db,
        "INSERT INTO person (name, email) VALUES (:name, :mail)",
        &new_person,
    )
    .await
    .unwrap();

    assert_eq!(result.rows_affected, 1);
    let statements = db.statements();
    assert_eq!(statements[0].sql, "INSERT INTO person (name, email) VALUES ($1, $2)");
    assert_eq!(statements[0].args, args!["Ann", "ann@example.com"]);
}

#[tokio::test]
async fn test_named_query_with_question_bindvars() {
    let db = MemoryDb::new("mysql");
    db.add_result(
        "SELECT id, name FROM person WHERE name = ? AND id > ?",
        ResultSet::new(["id", "name"]).row(args![9i64, "Cy"]),
    );

    let mut args = HashMap::new();
    args.insert("name".to_string(), Value::from("Cy"));
    args.insert("min_id".to_string(), Value::from(1i64));

    let mut rows = named_query_map(
        &db,
        "SELECT id, name FROM person WHERE name = :name AND id > :min_id",
        &args,
    )
    .await
    .unwrap();

    assert!(rows.advance().unwrap());
    let mut person = Person::default();
    rows.struct_scan(&mut person).unwrap();
    assert_eq!(person.person_id, 9);
    assert_eq!(db.statements()[0].args, args!["Cy", 1i64]);
}

#[tokio::test]
async fn test_missing_named_parameter() {
    let db = MemoryDb::new("postgres");
    let err = named_exec_map(&db, "DELETE FROM person WHERE id = :id", &HashMap::new())
        .await
        .unwrap_err();

    assert!(matches!(err, MapError::MissingParam(ref name) if name == "id"));
    assert!(db.statements().is_empty());
}

#[test]
fn test_rebind_follows_driver() {
    let db = MemoryDb::new("sqlserver");
    assert_eq!(
        db.rebind("SELECT * FROM person WHERE id = ? AND name = ?"),
        "SELECT * FROM person WHERE id = @p1 AND name = @p2"
    );
}
