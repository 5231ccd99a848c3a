//! End-to-end tests executing GraphQL operations against an in-memory SQLite
//! database through the real schema.

use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use zonectl::AppSchema;
use zonectl::schema::build_schema;
use zonectl::schema::types::cursor;

async fn test_schema() -> AppSchema {
    // A single pooled connection keeps every statement on the same
    // in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();
    build_schema(pool)
}

async fn run(schema: &AppSchema, query: &str) -> Value {
    let resp = schema.execute(query).await;
    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);
    resp.data.into_json().unwrap()
}

async fn run_err(schema: &AppSchema, query: &str) -> (String, String) {
    let resp = schema.execute(query).await;
    assert_eq!(resp.errors.len(), 1, "expected one error: {:?}", resp.errors);
    let err = &resp.errors[0];
    (err.message.clone(), format!("{:?}", err.extensions))
}

async fn add_zone(schema: &AppSchema, name: &str) -> i64 {
    let data = run(
        schema,
        &format!(r#"mutation {{ addZone(name: "{name}") {{ id }} }}"#),
    )
    .await;
    data["addZone"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn zone_ids_are_assigned_and_distinct() {
    let schema = test_schema().await;

    let first = add_zone(&schema, "example.com").await;
    let second = add_zone(&schema, "example.org").await;
    assert_ne!(first, second);

    let data = run(&schema, "{ zones { id name createdAt } }").await;
    let zones = data["zones"].as_array().unwrap();
    assert_eq!(zones.len(), 2);
    // newest-first ordering
    assert_eq!(zones[0]["id"].as_i64().unwrap(), second);
    assert_eq!(zones[1]["id"].as_i64().unwrap(), first);
    assert!(zones[0]["createdAt"].is_string());
}

#[tokio::test]
async fn mx_record_round_trips_through_the_typed_mutation() {
    let schema = test_schema().await;
    let zone_id = add_zone(&schema, "example.com").await;

    let data = run(
        &schema,
        &format!(
            r#"mutation {{
                addMxRecord(data: {{
                    common: {{ name: "mail", zoneId: {zone_id}, ttl: 3600 }},
                    host: "mx1.example.com",
                    priority: 10
                }}) {{
                    id name zone ttl recordType zoneId
                    content {{ __typename ... on RecordMx {{ host priority }} }}
                }}
            }}"#
        ),
    )
    .await;

    let record = &data["addMxRecord"];
    assert_eq!(record["zone"], "example.com");
    assert_eq!(record["recordType"], "MX");
    assert_eq!(record["ttl"], 3600);
    assert_eq!(record["content"]["__typename"], "RecordMx");
    assert_eq!(record["content"]["host"], "mx1.example.com");
    assert_eq!(record["content"]["priority"], 10);

    // reading it back yields the same payload
    let record_id = record["id"].as_i64().unwrap();
    let data = run(
        &schema,
        &format!(
            r#"{{ record(recordId: {record_id}) {{
                recordType content {{ ... on RecordMx {{ host priority }} }}
            }} }}"#
        ),
    )
    .await;
    assert_eq!(data["record"]["recordType"], "MX");
    assert_eq!(data["record"]["content"]["host"], "mx1.example.com");
    assert_eq!(data["record"]["content"]["priority"], 10);
}

#[tokio::test]
async fn a_record_round_trips() {
    let schema = test_schema().await;
    let zone_id = add_zone(&schema, "example.com").await;

    let data = run(
        &schema,
        &format!(
            r#"mutation {{
                addARecord(data: {{
                    common: {{ name: "www", zoneId: {zone_id}, ttl: 300 }},
                    ip: "1.2.3.4"
                }}) {{ recordType ttl content {{ ... on RecordA {{ ip }} }} }}
            }}"#
        ),
    )
    .await;

    assert_eq!(data["addARecord"]["recordType"], "A");
    assert_eq!(data["addARecord"]["ttl"], 300);
    assert_eq!(data["addARecord"]["content"]["ip"], "1.2.3.4");
}

#[tokio::test]
async fn cname_record_round_trips() {
    let schema = test_schema().await;
    let zone_id = add_zone(&schema, "example.com").await;

    let data = run(
        &schema,
        &format!(
            r#"mutation {{
                addCnameRecord(data: {{
                    common: {{ name: "blog", zoneId: {zone_id}, ttl: 600 }},
                    target: "www.example.com"
                }}) {{ recordType content {{ ... on RecordCname {{ target }} }} }}
            }}"#
        ),
    )
    .await;

    assert_eq!(data["addCnameRecord"]["recordType"], "CNAME");
    assert_eq!(data["addCnameRecord"]["content"]["target"], "www.example.com");
}

#[tokio::test]
async fn missing_zone_lookup_is_a_not_found_error() {
    let schema = test_schema().await;

    let (message, extensions) = run_err(&schema, "{ zone(zoneId: 42) { id } }").await;
    assert!(message.contains("not found"), "message: {message}");
    assert!(extensions.contains("NOT_FOUND"), "extensions: {extensions}");
}

#[tokio::test]
async fn deleting_a_zone_removes_it_and_its_records() {
    let schema = test_schema().await;
    let zone_id = add_zone(&schema, "example.com").await;

    run(
        &schema,
        &format!(
            r#"mutation {{
                addARecord(data: {{
                    common: {{ name: "www", zoneId: {zone_id}, ttl: 300 }},
                    ip: "1.2.3.4"
                }}) {{ id }}
            }}"#
        ),
    )
    .await;

    let data = run(
        &schema,
        &format!("mutation {{ deleteZone(zoneId: {zone_id}) {{ id }} }}"),
    )
    .await;
    assert_eq!(data["deleteZone"]["id"].as_i64().unwrap(), zone_id);

    let (message, _) = run_err(&schema, &format!("{{ zone(zoneId: {zone_id}) {{ id }} }}")).await;
    assert!(message.contains("not found"));

    // cascade: the zone's records are gone too
    let data = run(&schema, "{ records { id } }").await;
    assert_eq!(data["records"].as_array().unwrap().len(), 0);

    // idempotent: deleting again still succeeds
    let data = run(
        &schema,
        &format!("mutation {{ deleteZone(zoneId: {zone_id}) {{ id }} }}"),
    )
    .await;
    assert_eq!(data["deleteZone"]["id"].as_i64().unwrap(), zone_id);
}

#[tokio::test]
async fn records_query_filters_by_zone_with_zero_as_no_filter() {
    let schema = test_schema().await;
    let first = add_zone(&schema, "example.com").await;
    let second = add_zone(&schema, "example.org").await;

    for (zone_id, name) in [(first, "www"), (first, "mail"), (second, "www")] {
        run(
            &schema,
            &format!(
                r#"mutation {{
                    addARecord(data: {{
                        common: {{ name: "{name}", zoneId: {zone_id}, ttl: 300 }},
                        ip: "1.2.3.4"
                    }}) {{ id }}
                }}"#
            ),
        )
        .await;
    }

    let data = run(&schema, &format!("{{ records(zoneId: {first}) {{ zoneId }} }}")).await;
    let records = data["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r["zoneId"].as_i64().unwrap() == first));

    let data = run(&schema, "{ records { id } }").await;
    assert_eq!(data["records"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn mx_record_for_unknown_zone_fails_and_writes_nothing() {
    let schema = test_schema().await;

    let (message, extensions) = run_err(
        &schema,
        r#"mutation {
            addMxRecord(data: {
                common: { name: "mail", zoneId: 99, ttl: 3600 },
                host: "mx1.example.com",
                priority: 10
            }) { id }
        }"#,
    )
    .await;
    assert!(message.contains("zone 99 not found"), "message: {message}");
    assert!(extensions.contains("NOT_FOUND"));

    let data = run(&schema, "{ records { id } }").await;
    assert_eq!(data["records"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn records_connection_pages_with_real_has_next_page() {
    let schema = test_schema().await;
    let zone_id = add_zone(&schema, "example.com").await;

    for name in ["a", "b", "c"] {
        run(
            &schema,
            &format!(
                r#"mutation {{
                    addARecord(data: {{
                        common: {{ name: "{name}", zoneId: {zone_id}, ttl: 300 }},
                        ip: "1.2.3.4"
                    }}) {{ id }}
                }}"#
            ),
        )
        .await;
    }

    let query = |offset: i64| {
        format!(
            r#"{{ zone(zoneId: {zone_id}) {{
                recordsConnection(offset: {offset}, size: 2) {{
                    pageInfo {{ hasNextPage }}
                    edges {{ cursor node {{ id }} }}
                }}
            }} }}"#
        )
    };

    let data = run(&schema, &query(0)).await;
    let conn = &data["zone"]["recordsConnection"];
    assert_eq!(conn["pageInfo"]["hasNextPage"], true);
    let edges = conn["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 2);
    for edge in edges {
        let id = edge["node"]["id"].as_i64().unwrap();
        let decoded = cursor::decode(edge["cursor"].as_str().unwrap()).unwrap();
        assert_eq!(decoded, id);
    }

    let data = run(&schema, &query(2)).await;
    let conn = &data["zone"]["recordsConnection"];
    assert_eq!(conn["pageInfo"]["hasNextPage"], false);
    assert_eq!(conn["edges"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn negative_page_sizes_clamp_to_an_empty_page() {
    let schema = test_schema().await;
    let zone_id = add_zone(&schema, "example.com").await;

    // a negative limit must not fall through to SQLite's "no limit"
    let data = run(
        &schema,
        &format!(
            r#"{{ zone(zoneId: {zone_id}) {{
                recordsConnection(size: -2) {{
                    pageInfo {{ hasNextPage }}
                    edges {{ cursor }}
                }}
            }} }}"#
        ),
    )
    .await;
    let conn = &data["zone"]["recordsConnection"];
    assert_eq!(conn["pageInfo"]["hasNextPage"], false);
    assert_eq!(conn["edges"].as_array().unwrap().len(), 0);

    let data = run(&schema, "{ zones(size: -1) { id } }").await;
    assert_eq!(data["zones"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn renaming_missing_rows_is_a_not_found_error() {
    let schema = test_schema().await;

    let (_, extensions) = run_err(
        &schema,
        r#"mutation { updateZone(zoneId: 7, name: "renamed.example") { id } }"#,
    )
    .await;
    assert!(extensions.contains("NOT_FOUND"));

    let (_, extensions) = run_err(
        &schema,
        r#"mutation { updateRecord(recordId: 7, name: "renamed") { id } }"#,
    )
    .await;
    assert!(extensions.contains("NOT_FOUND"));
}

#[tokio::test]
async fn renaming_updates_name_but_not_zone_snapshot() {
    let schema = test_schema().await;
    let zone_id = add_zone(&schema, "example.com").await;

    let data = run(
        &schema,
        &format!(
            r#"mutation {{
                addARecord(data: {{
                    common: {{ name: "www", zoneId: {zone_id}, ttl: 300 }},
                    ip: "1.2.3.4"
                }}) {{ id }}
            }}"#
        ),
    )
    .await;
    let record_id = data["addARecord"]["id"].as_i64().unwrap();

    // rename the zone; the record keeps its creation-time zone name
    run(
        &schema,
        &format!(r#"mutation {{ updateZone(zoneId: {zone_id}, name: "renamed.example") {{ name }} }}"#),
    )
    .await;

    let data = run(
        &schema,
        &format!(
            r#"mutation {{ updateRecord(recordId: {record_id}, name: "www2") {{ name zone }} }}"#
        ),
    )
    .await;
    assert_eq!(data["updateRecord"]["name"], "www2");
    assert_eq!(data["updateRecord"]["zone"], "example.com");
}

#[tokio::test]
async fn deleting_a_record_is_idempotent() {
    let schema = test_schema().await;

    let data = run(&schema, "mutation { deleteRecord(recordId: 5) { id } }").await;
    assert_eq!(data["deleteRecord"]["id"].as_i64().unwrap(), 5);
}
