mod common;

use axum::http::StatusCode;
use common::TestApp;

#[tokio::test]
async fn ping_answers_ok() {
    let mut app = TestApp::new();
    let res = app.get("/ping").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "OK");
    assert_eq!(res.headers["x-frame-options"], "deny");
}

#[tokio::test]
async fn snippet_view_only_accepts_existing_positive_ids() {
    let cases = [
        ("/snippet/view/1", StatusCode::OK, Some("An old silent pond...")),
        ("/snippet/view/2", StatusCode::NOT_FOUND, None),
        ("/snippet/view/-1", StatusCode::NOT_FOUND, None),
        ("/snippet/view/1.23", StatusCode::NOT_FOUND, None),
        ("/snippet/view/foo", StatusCode::NOT_FOUND, None),
        ("/snippet/view/", StatusCode::NOT_FOUND, None),
    ];

    for (path, status, body) in cases {
        let mut app = TestApp::new();
        let res = app.get(path).await;
        assert_eq!(res.status, status, "{path}");
        if let Some(body) = body {
            assert!(res.body.contains(body), "{path}: {}", res.body);
        }
    }
}

#[tokio::test]
async fn home_lists_the_latest_snippets() {
    let mut app = TestApp::new();
    let res = app.get("/").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("An old silent pond"));
    assert!(res.body.contains("href='/snippet/view/1'"));
}

#[tokio::test]
async fn unknown_paths_are_404() {
    let mut app = TestApp::new();
    let res = app.get("/no/such/page").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body, "Not Found");
}

#[tokio::test]
async fn create_form_requires_login() {
    let mut app = TestApp::new();
    let res = app.get("/snippet/create").await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/user/login"));

    let res = app
        .post_form(
            "/snippet/create",
            &[("title", "t"), ("content", "c"), ("expires", "7")],
        )
        .await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/user/login"));
    assert_eq!(app.snippets.len(), 1);
}

#[tokio::test]
async fn create_form_is_served_uncached_to_members() {
    let mut app = TestApp::logged_in().await;
    let res = app.get("/snippet/create").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.headers["cache-control"], "no-store");
    assert!(res.body.contains("<form action='/snippet/create' method='POST'>"));
    assert!(res.body.contains("value='365' checked"));
}

#[tokio::test]
async fn valid_snippet_redirects_to_its_page_with_a_flash() {
    let mut app = TestApp::logged_in().await;
    let res = app
        .post_form(
            "/snippet/create",
            &[("title", "Frog"), ("content", "splash"), ("expires", "7")],
        )
        .await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/snippet/view/2"));

    let page = app.get("/snippet/view/2").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Snippet successfully created!"));
    assert!(page.body.contains("splash"));

    let again = app.get("/snippet/view/2").await;
    assert!(!again.body.contains("Snippet successfully created!"));
}

#[tokio::test]
async fn invalid_snippet_redisplays_the_form() {
    let mut app = TestApp::logged_in().await;
    let res = app
        .post_form(
            "/snippet/create",
            &[("title", ""), ("content", "kept text"), ("expires", "7")],
        )
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(res.body.contains("This field cannot be blank"));
    assert!(res.body.contains("kept text"));
    assert!(res.body.contains("value='7' checked"));
    assert_eq!(app.snippets.len(), 1);
}

#[tokio::test]
async fn expiry_outside_the_allowed_set_is_rejected() {
    let mut app = TestApp::logged_in().await;
    let res = app
        .post_form(
            "/snippet/create",
            &[("title", "t"), ("content", "c"), ("expires", "30")],
        )
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(res.body.contains("This field must equal 1, 7 or 365"));
}

#[tokio::test]
async fn undecodable_bodies_are_bad_requests() {
    let mut app = TestApp::logged_in().await;

    let res = app
        .post_raw(
            "/snippet/create",
            "application/x-www-form-urlencoded",
            b"title=t&content=c&expires=soon",
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .post_raw("/snippet/create", "application/json", b"{\"title\":\"t\"}")
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.snippets.len(), 1);
}
