mod support;

use axum::http::{Method, StatusCode};
use birdland_search::error::QueryStage;
use serde_json::json;
use support::{fakes::Executed, json_body, StoreScript, TestApp};

const BLUE_MOON: &[&str] = &[
    "Blue Moon",
    "Richard Rodgers",
    "Lorenz Hart",
    "Real Book Vol. 1",
    "51",
    "RB1",
];

#[tokio::test]
async fn music_search_returns_rows_count_and_flag() -> anyhow::Result<()> {
    let app = TestApp::new(StoreScript::rows(&[BLUE_MOON], 4));

    let body = app
        .search("type=music-search&title=blue+moon&limit=10")
        .await?;

    assert_eq!(
        body,
        json!({
            "error": "",
            "results": [BLUE_MOON],
            "count": 4,
            "aa_flag": false,
        })
    );

    let executed = app.store.executed();
    assert_eq!(executed.len(), 2);
    assert_eq!(app.store.sessions_opened(), 1);
    match (&executed[0], &executed[1]) {
        (Executed::Rows(QueryStage::Rows, rows), Executed::Count(count)) => {
            assert!(rows.sql.ends_with("ORDER BY titles_distinct.title LIMIT 10"));
            assert!(count.sql.starts_with("SELECT COUNT(*) AS cnt FROM titles_distinct"));
            assert_eq!(rows.binding, count.binding);
            assert_eq!(rows.binding.get(":title").unwrap().as_str(), "blue moon");
        }
        other => panic!("unexpected execution order: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn artist_filter_sets_aa_flag_and_joins_recordings() -> anyhow::Result<()> {
    let row: &[&str] = &[
        "Blue Moon",
        "Richard Rodgers",
        "Lorenz Hart",
        "Real Book Vol. 1",
        "51",
        "RB1",
        "Frank Sinatra",
        "Swing Easy",
    ];
    let app = TestApp::new(StoreScript::rows(&[row], 1));

    let body = app.search("type=music-search&artist=sinatra").await?;

    assert_eq!(body["aa_flag"], true);
    assert_eq!(body["results"][0].as_array().unwrap().len(), 8);
    let Executed::Rows(_, rows) = &app.store.executed()[0] else {
        panic!("rows statement runs first");
    };
    assert_eq!(rows.sql.matches("JOIN audio_files USING( title )").count(), 1);
    Ok(())
}

#[tokio::test]
async fn audio_search_returns_three_tuples_without_flag() -> anyhow::Result<()> {
    let row: &[&str] = &["Summer Wind", "Frank Sinatra", "Strangers in the Night"];
    let app = TestApp::new(StoreScript::rows(&[row], 1));

    let body = app.search("type=audio-search&artist=sinatra").await?;

    assert_eq!(
        body,
        json!({ "error": "", "results": [row], "count": 1 })
    );
    let Executed::Rows(_, rows) = &app.store.executed()[0] else {
        panic!("rows statement runs first");
    };
    assert_eq!(
        rows.sql,
        "SELECT title, artist, album FROM audio_files \
         WHERE MATCH( artist ) AGAINST( ? IN BOOLEAN MODE ) ORDER BY title LIMIT 25"
    );
    Ok(())
}

#[tokio::test]
async fn unknown_parameter_is_reported_without_touching_the_store() -> anyhow::Result<()> {
    let app = TestApp::new(StoreScript::default());

    let body = app.search("type=music-search&foo=bar").await?;

    assert_eq!(
        body,
        json!({ "error": "ERROR: Unexpected value in request 'foo'", "query": "" })
    );
    assert_eq!(app.store.sessions_opened(), 0);
    Ok(())
}

#[tokio::test]
async fn missing_and_unknown_types_are_request_errors() -> anyhow::Result<()> {
    let app = TestApp::new(StoreScript::default());

    let missing = app.search("title=moon").await?;
    assert_eq!(missing["error"], "ERROR: No search type in request");

    let unknown = app.search("type=lyrics-search").await?;
    assert_eq!(unknown["error"], "ERROR: Unexpected search type 'lyrics-search'");

    let bad_limit = app.search("type=music-search&limit=-3").await?;
    assert_eq!(
        bad_limit["error"],
        "ERROR: Invalid limit '-3', expected a positive integer"
    );
    Ok(())
}

#[tokio::test]
async fn store_connection_failure_uses_error_1() -> anyhow::Result<()> {
    let app = TestApp::new(StoreScript {
        connect_error: Some("Connection refused".to_string()),
        ..StoreScript::default()
    });

    let body = app.search("type=music-search").await?;
    assert_eq!(
        body,
        json!({ "error": "ERROR 1: Connection refused", "query": "" })
    );
    Ok(())
}

#[tokio::test]
async fn query_failure_echoes_statement_and_binding() -> anyhow::Result<()> {
    let app = TestApp::new(StoreScript {
        rows_error: Some("Can't find FULLTEXT index matching the column list".to_string()),
        ..StoreScript::default()
    });

    let body = app.search("type=music-search&title=moon").await?;

    assert_eq!(
        body["error"],
        "ERROR: SELECT failed, Can't find FULLTEXT index matching the column list"
    );
    assert!(body["query"]
        .as_str()
        .unwrap()
        .starts_with("SELECT titles_distinct.title"));
    assert_eq!(body["binding"], json!({ ":title": "moon" }));
    // Count never runs after a failed rows statement.
    assert_eq!(app.store.executed().len(), 1);
    Ok(())
}

#[tokio::test]
async fn query_failure_is_redacted_when_diagnostics_disabled() -> anyhow::Result<()> {
    let app = TestApp::new_with_config(
        StoreScript {
            count_error: Some("Lost connection to MySQL server".to_string()),
            ..StoreScript::default()
        },
        |config| config.search.expose_diagnostics = false,
    );

    let body = app.search("type=music-search&composer=Porter").await?;

    assert_eq!(
        body,
        json!({
            "error": "ERROR: SELECT COUNT(*) failed, Lost connection to MySQL server",
            "query": "",
        })
    );
    Ok(())
}

#[tokio::test]
async fn post_form_body_and_legacy_path() -> anyhow::Result<()> {
    let app = TestApp::new(StoreScript::rows(&[BLUE_MOON], 1));

    let (status, headers, body) = app
        .post_form("/search.php", "type=music-search&composer=rodgers&lyricist=")
        .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get("cache-control").unwrap(), "no-cache");
    assert!(headers.contains_key("x-request-id"));
    assert_eq!(json_body(&body)?["count"], 1);

    let Executed::Rows(_, rows) = &app.store.executed()[0] else {
        panic!("rows statement runs first");
    };
    assert_eq!(rows.binding.len(), 1);
    assert_eq!(rows.binding.get(":composer").unwrap().as_str(), "%rodgers%");
    Ok(())
}

#[tokio::test]
async fn json_post_is_unsupported_media_type() -> anyhow::Result<()> {
    let app = TestApp::new(StoreScript::default());

    let (status, _, _) = app
        .request(
            Method::POST,
            "/api/search",
            Some("application/json"),
            Some(r#"{"type":"music-search"}"#.into()),
        )
        .await?;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(app.store.sessions_opened(), 0);
    Ok(())
}

#[tokio::test]
async fn configured_default_limit_is_used() -> anyhow::Result<()> {
    let app = TestApp::new_with_config(StoreScript::default(), |config| {
        config.search.default_limit = 50
    });

    app.search("type=audio-search").await?;

    let Executed::Rows(_, rows) = &app.store.executed()[0] else {
        panic!("rows statement runs first");
    };
    assert!(rows.sql.ends_with("LIMIT 50"));
    assert!(!rows.sql.contains("WHERE"));
    Ok(())
}
