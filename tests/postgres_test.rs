//! Integration tests against a live PostgreSQL server
//!
//! Set DATABASE_URL to run them; without it every test returns early.

use rowmap::prelude::*;

#[record]
pub struct Item {
    pub id: i32,
    pub label: String,
    #[column("tags")]
    pub tag_list: Vec<String>,
    pub note: Option<String>,
}

#[record(params)]
pub struct NewItem {
    pub label: String,
    pub note: Option<String>,
}

async fn connect() -> Option<Db> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPool::connect(&url).await.ok()?;
    Some(Db::from_pool(pool))
}

async fn setup_table(db: &Db, table: &str) -> Result<(), MapError> {
    db.exec(&format!("DROP TABLE IF EXISTS {}", table), args![]).await?;
    db.exec(
        &format!(
            "CREATE TABLE {} (id SERIAL PRIMARY KEY, label TEXT NOT NULL, \
             tags TEXT[] NOT NULL DEFAULT '{{}}', note TEXT)",
            table
        ),
        args![],
    )
    .await?;
    Ok(())
}

#[tokio::test]
async fn test_select_and_get_roundtrip() {
    let Some(db) = connect().await else {
        println!("DATABASE_URL not set, skipping");
        return;
    };
    setup_table(&db, "rowmap_items").await.unwrap();

    for label in ["alpha", "beta"] {
        let item = NewItem {
            label: label.to_string(),
            note: None,
        };
        let result = db
            .named_exec("INSERT INTO rowmap_items (label, note) VALUES (:label, :note)", &item)
            .await
            .unwrap();
        assert_eq!(result.rows_affected, 1);
    }

    let mut items: Vec<Item> = Vec::new();
    db.select(
        &mut items,
        "SELECT note, tags, label, id FROM rowmap_items ORDER BY id",
        args![],
    )
    .await
    .unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].label, "alpha");
    assert!(items[1].tag_list.is_empty());
    assert_eq!(items[1].note, None);

    let mut item = Item::default();
    db.get(
        &mut item,
        "SELECT id, label, tags, note FROM rowmap_items WHERE label = $1",
        args!["beta"],
    )
    .await
    .unwrap();
    assert_eq!(item.label, "beta");

    let err = db
        .get(
            &mut item,
            "SELECT id, label FROM rowmap_items WHERE label = $1",
            args!["gamma"],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MapError::NoRows));
}

#[tokio::test]
async fn test_unmapped_column() {
    let Some(db) = connect().await else {
        return;
    };

    let mut items: Vec<Item> = Vec::new();
    let err = db
        .select(&mut items, "SELECT 1::int4 AS id, 'x' AS label, 2 AS extra", args![])
        .await
        .unwrap_err();
    assert!(matches!(err, MapError::UnmappedColumn(ref column) if column == "extra"));
}

#[tokio::test]
async fn test_transaction_rollback() {
    let Some(db) = connect().await else {
        return;
    };
    setup_table(&db, "rowmap_tx_items").await.unwrap();

    let tx = db.begin().await.unwrap();
    tx.exec("INSERT INTO rowmap_tx_items (label) VALUES ($1)", args!["temp"])
        .await
        .unwrap();
    let mut inside: Vec<Item> = Vec::new();
    tx.select(&mut inside, "SELECT id, label FROM rowmap_tx_items", args![])
        .await
        .unwrap();
    assert_eq!(inside.len(), 1);
    tx.rollback().await.unwrap();

    let mut after: Vec<Item> = Vec::new();
    db.select(&mut after, "SELECT id, label FROM rowmap_tx_items", args![])
        .await
        .unwrap();
    assert!(after.is_empty());
}

#[tokio::test]
async fn test_unmapped_column_without_rows() {
    let Some(db) = connect().await else {
        return;
    };
    let sql = "SELECT 1::int4 AS id, 'x'::text AS label, 'e'::text AS extra WHERE false";

    let mut items: Vec<Item> = Vec::new();
    let err = db.select(&mut items, sql, args![]).await.unwrap_err();
    assert!(matches!(err, MapError::UnmappedColumn(ref column) if column == "extra"));

    let mut item = Item::default();
    let err = db.get(&mut item, sql, args![]).await.unwrap_err();
    assert!(matches!(err, MapError::UnmappedColumn(ref column) if column == "extra"));

    let rows = db
        .queryx("SELECT 1::int4 AS id, 'x'::text AS label WHERE false", args![])
        .await
        .unwrap();
    assert_eq!(rows.columns().unwrap(), ["id", "label"]);
}

#[record]
pub struct Measurement {
    pub id: i32,
    pub price: f64,
    pub exact: String,
    pub day: String,
    pub at: String,
    pub small: Vec<i16>,
    pub ratios: Vec<f64>,
    pub flags: Vec<bool>,
}

#[tokio::test]
async fn test_non_text_column_types() {
    let Some(db) = connect().await else {
        return;
    };

    let mut measurement = Measurement::default();
    db.get(
        &mut measurement,
        "SELECT 1::int4 AS id, 9.99::numeric AS price, 9.99::numeric AS exact, \
         '2024-01-02'::date AS day, '10:30:00'::time AS at, \
         ARRAY[1, 2]::int2[] AS small, ARRAY[0.5, 1.5]::float8[] AS ratios, \
         ARRAY[true, false] AS flags",
        args![],
    )
    .await
    .unwrap();

    assert_eq!(measurement.price, 9.99);
    assert_eq!(measurement.exact, "9.99");
    assert_eq!(measurement.day, "2024-01-02");
    assert_eq!(measurement.at, "10:30:00");
    assert_eq!(measurement.small, [1, 2]);
    assert_eq!(measurement.ratios, [0.5, 1.5]);
    assert_eq!(measurement.flags, [true, false]);
}

#[record(params)]
pub struct NewScore {
    pub id: i32,
    pub score: Option<i32>,
    pub weight: Option<f64>,
}

#[record]
pub struct Score {
    pub id: i32,
    pub score: Option<i32>,
    pub weight: Option<f64>,
}

#[tokio::test]
async fn test_null_into_non_text_columns() {
    let Some(db) = connect().await else {
        return;
    };
    db.exec("DROP TABLE IF EXISTS rowmap_scores", args![]).await.unwrap();
    db.exec(
        "CREATE TABLE rowmap_scores (id INT4 PRIMARY KEY, score INT4, weight NUMERIC)",
        args![],
    )
    .await
    .unwrap();

    db.exec(
        "INSERT INTO rowmap_scores (id, score, weight) VALUES ($1, $2, $3)",
        args![1, None::<i32>, None::<f64>],
    )
    .await
    .unwrap();

    let new_score = NewScore {
        id: 2,
        score: None,
        weight: Some(0.25),
    };
    db.named_exec(
        "INSERT INTO rowmap_scores (weight, score, id) VALUES (:weight, :score, :id)",
        &new_score,
    )
    .await
    .unwrap();

    let mut scores: Vec<Score> = Vec::new();
    db.select(
        &mut scores,
        "SELECT id, score, weight FROM rowmap_scores ORDER BY id",
        args![],
    )
    .await
    .unwrap();
    assert_eq!(scores.len(), 2);
    assert_eq!(scores[0].score, None);
    assert_eq!(scores[0].weight, None);
    assert_eq!(scores[1].weight, Some(0.25));
}
