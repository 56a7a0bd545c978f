#[cfg(test)]
mod router_tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, Response, StatusCode, header},
    };
    use rstest::rstest;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::api::{app_state::AppState, create_router, handlers::FOLLOW_OUTCOME_HEADER};
    use crate::config::config::AppConfig;
    use crate::storage::Storage;

    async fn app() -> Router {
        let mut config = AppConfig::development();
        config.security.api_keys = [
            ("alice-key", "alice"),
            ("bob-key", "bob"),
            ("corvex-key", "corvex"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let state = AppState::from_config(Storage::in_memory(), &config);
        for name in ["alice", "bob", "corvex"] {
            state.user_service.register(name, "", "", "").await.unwrap();
        }
        create_router(state)
    }

    fn request(method: &str, uri: &str, key: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = key {
            builder = builder.header("X-API-Key", key);
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
        app.clone().oneshot(req).await.unwrap()
    }

    async fn body_json(response: Response<Body>) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn location(response: &Response<Body>) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    fn feed_texts(feed: &Value) -> Vec<String> {
        feed["posts"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["text"].as_str().unwrap().to_string())
            .collect()
    }

    #[rstest]
    #[case("POST", "/api/v1/profiles/alice/follow")]
    #[case("POST", "/api/v1/profiles/alice/unfollow")]
    #[case("POST", "/api/v1/profiles/alice/toggle")]
    #[case("GET", "/api/v1/feed")]
    #[case("POST", "/api/v1/posts")]
    #[case("POST", "/api/v1/profiles/alice/posts/1/edit")]
    #[case("POST", "/api/v1/profiles/alice/posts/1/comment")]
    #[tokio::test]
    async fn test_anonymous_requests_redirect_to_login(#[case] method: &str, #[case] uri: &str) {
        let app = app().await;
        let response = send(&app, request(method, uri, None, Some(json!({"text": "x"})))).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        let expected = format!("/auth/login?next={}", urlencoding::encode(uri));
        assert_eq!(location(&response), expected);
    }

    #[tokio::test]
    async fn test_follow_redirects_to_profile() {
        let app = app().await;
        let response = send(
            &app,
            request("POST", "/api/v1/profiles/alice/follow", Some("bob-key"), None),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/api/v1/profiles/alice");
        assert_eq!(response.headers()[FOLLOW_OUTCOME_HEADER], "followed");

        let again = send(
            &app,
            request("POST", "/api/v1/profiles/alice/follow", Some("bob-key"), None),
        )
        .await;
        assert_eq!(again.status(), StatusCode::FOUND);
        assert_eq!(again.headers()[FOLLOW_OUTCOME_HEADER], "already_following");

        let profile = body_json(
            send(&app, request("GET", "/api/v1/profiles/alice", Some("bob-key"), None)).await,
        )
        .await;
        assert_eq!(profile["is_follow"], true);
        assert_eq!(profile["followers_count"], 1);
    }

    #[tokio::test]
    async fn test_feed_shows_followed_authors_only() {
        let app = app().await;
        send(&app, request("POST", "/api/v1/profiles/alice/follow", Some("bob-key"), None)).await;

        let created = send(
            &app,
            request("POST", "/api/v1/posts", Some("alice-key"), Some(json!({"text": "hello"}))),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);

        let bob_feed = body_json(send(&app, request("GET", "/api/v1/feed", Some("bob-key"), None)).await).await;
        assert_eq!(feed_texts(&bob_feed), vec!["hello"]);
        assert_eq!(bob_feed["authors"], json!(["alice"]));

        let corvex_feed =
            body_json(send(&app, request("GET", "/api/v1/feed", Some("corvex-key"), None)).await).await;
        assert!(feed_texts(&corvex_feed).is_empty());
        assert_eq!(corvex_feed["posts"]["num_pages"], 1);
    }

    #[tokio::test]
    async fn test_unfollow_removes_posts_from_feed() {
        let app = app().await;
        send(&app, request("POST", "/api/v1/profiles/alice/follow", Some("bob-key"), None)).await;
        send(
            &app,
            request("POST", "/api/v1/posts", Some("alice-key"), Some(json!({"text": "hello"}))),
        )
        .await;

        let response = send(
            &app,
            request("POST", "/api/v1/profiles/alice/unfollow", Some("bob-key"), None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[FOLLOW_OUTCOME_HEADER], "unfollowed");

        let feed = body_json(send(&app, request("GET", "/api/v1/feed", Some("bob-key"), None)).await).await;
        assert!(feed_texts(&feed).is_empty());

        let profile = body_json(
            send(&app, request("GET", "/api/v1/profiles/alice", Some("bob-key"), None)).await,
        )
        .await;
        assert_eq!(profile["is_follow"], false);
    }

    #[tokio::test]
    async fn test_self_follow_is_silent_noop() {
        let app = app().await;
        let response = send(
            &app,
            request("POST", "/api/v1/profiles/alice/follow", Some("alice-key"), None),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/api/v1/profiles/alice");
        assert_eq!(response.headers()[FOLLOW_OUTCOME_HEADER], "self_follow_ignored");

        let profile = body_json(
            send(&app, request("GET", "/api/v1/profiles/alice", Some("alice-key"), None)).await,
        )
        .await;
        assert_eq!(profile["is_follow"], false);
        assert_eq!(profile["followers_count"], 0);
        assert_eq!(profile["following_count"], 0);
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let app = app().await;
        let first = send(
            &app,
            request("POST", "/api/v1/profiles/alice/toggle", Some("bob-key"), None),
        )
        .await;
        assert_eq!(first.headers()[FOLLOW_OUTCOME_HEADER], "followed");

        let second = send(
            &app,
            request("POST", "/api/v1/profiles/alice/toggle", Some("bob-key"), None),
        )
        .await;
        assert_eq!(second.headers()[FOLLOW_OUTCOME_HEADER], "unfollowed");

        let followers = body_json(
            send(&app, request("GET", "/api/v1/profiles/alice/followers", None, None)).await,
        )
        .await;
        assert_eq!(followers["total"], 0);
    }

    #[tokio::test]
    async fn test_follow_unknown_user_is_404() {
        let app = app().await;
        let response = send(
            &app,
            request("POST", "/api/v1/profiles/nobody/follow", Some("bob-key"), None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let profile = send(&app, request("GET", "/api/v1/profiles/nobody", None, None)).await;
        assert_eq!(profile.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_credentials_are_401() {
        let app = app().await;
        let response = send(&app, request("GET", "/api/v1/feed", Some("wrong-key"), None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_anonymous_profile_is_not_following() {
        let app = app().await;
        send(&app, request("POST", "/api/v1/profiles/alice/follow", Some("bob-key"), None)).await;

        let profile = body_json(send(&app, request("GET", "/api/v1/profiles/alice", None, None)).await).await;
        assert_eq!(profile["is_follow"], false);
        assert_eq!(profile["followers_count"], 1);
    }

    #[tokio::test]
    async fn test_non_author_edit_redirects_without_change() {
        let app = app().await;
        let created = body_json(
            send(
                &app,
                request("POST", "/api/v1/posts", Some("alice-key"), Some(json!({"text": "original"}))),
            )
            .await,
        )
        .await;
        let id = created["id"].as_u64().unwrap();
        let post_uri = format!("/api/v1/profiles/alice/posts/{}", id);

        let response = send(
            &app,
            request(
                "POST",
                &format!("{}/edit", post_uri),
                Some("bob-key"),
                Some(json!({"text": "hijacked"})),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), post_uri);

        let detail = body_json(send(&app, request("GET", &post_uri, None, None)).await).await;
        assert_eq!(detail["post"]["text"], "original");

        let edited = send(
            &app,
            request(
                "POST",
                &format!("{}/edit", post_uri),
                Some("alice-key"),
                Some(json!({"text": "edited"})),
            ),
        )
        .await;
        assert_eq!(edited.status(), StatusCode::OK);
        assert_eq!(body_json(edited).await["text"], "edited");
    }

    #[tokio::test]
    async fn test_comment_redirects_to_post() {
        let app = app().await;
        let created = body_json(
            send(
                &app,
                request("POST", "/api/v1/posts", Some("alice-key"), Some(json!({"text": "post"}))),
            )
            .await,
        )
        .await;
        let post_uri = format!("/api/v1/profiles/alice/posts/{}", created["id"]);

        let response = send(
            &app,
            request(
                "POST",
                &format!("{}/comment", post_uri),
                Some("bob-key"),
                Some(json!({"text": "nice"})),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), post_uri);

        let detail = body_json(send(&app, request("GET", &post_uri, Some("bob-key"), None)).await).await;
        assert_eq!(detail["comments"][0]["text"], "nice");
        assert_eq!(detail["comments"][0]["author"], "bob");
        assert_eq!(detail["is_follow"], false);
    }

    #[rstest]
    #[case(None, 1, 10)]
    #[case(Some("2"), 2, 2)]
    #[case(Some("abc"), 1, 10)]
    #[case(Some("99"), 2, 2)]
    #[tokio::test]
    async fn test_index_pagination(
        #[case] page: Option<&str>,
        #[case] number: u64,
        #[case] items: usize,
    ) {
        let app = app().await;
        for i in 0..12 {
            send(
                &app,
                request(
                    "POST",
                    "/api/v1/posts",
                    Some("alice-key"),
                    Some(json!({"text": format!("post {}", i)})),
                ),
            )
            .await;
        }

        let uri = match page {
            Some(page) => format!("/api/v1/posts?page={}", page),
            None => "/api/v1/posts".to_string(),
        };
        let body = body_json(send(&app, request("GET", &uri, None, None)).await).await;

        assert_eq!(body["number"], number);
        assert_eq!(body["num_pages"], 2);
        assert_eq!(body["total"], 12);
        assert_eq!(body["items"].as_array().unwrap().len(), items);
    }

    #[tokio::test]
    async fn test_group_pages() {
        let app = app().await;
        let created = send(
            &app,
            request(
                "POST",
                "/api/v1/groups",
                Some("alice-key"),
                Some(json!({"slug": "rust", "title": "Rust"})),
            ),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);

        send(
            &app,
            request(
                "POST",
                "/api/v1/posts",
                Some("alice-key"),
                Some(json!({"text": "grouped", "group": "rust"})),
            ),
        )
        .await;
        send(
            &app,
            request("POST", "/api/v1/posts", Some("alice-key"), Some(json!({"text": "loose"}))),
        )
        .await;

        let page = body_json(send(&app, request("GET", "/api/v1/groups/rust", None, None)).await).await;
        assert_eq!(page["group"]["title"], "Rust");
        assert_eq!(page["posts"]["total"], 1);
        assert_eq!(page["posts"]["items"][0]["text"], "grouped");

        let missing = send(&app, request("GET", "/api/v1/groups/go", None, None)).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let unknown_group = send(
            &app,
            request(
                "POST",
                "/api/v1/posts",
                Some("alice-key"),
                Some(json!({"text": "lost", "group": "go"})),
            ),
        )
        .await;
        assert_eq!(unknown_group.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_user_cascades_follows() {
        let app = app().await;
        send(&app, request("POST", "/api/v1/profiles/alice/follow", Some("bob-key"), None)).await;

        let forbidden = send(&app, request("DELETE", "/api/v1/users/alice", Some("bob-key"), None)).await;
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let deleted = send(&app, request("DELETE", "/api/v1/users/alice", Some("alice-key"), None)).await;
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

        let following = body_json(
            send(&app, request("GET", "/api/v1/profiles/bob/following", None, None)).await,
        )
        .await;
        assert_eq!(following["total"], 0);
    }

    #[tokio::test]
    async fn test_register_user() {
        let app = app().await;
        let created = send(
            &app,
            request("POST", "/api/v1/users", None, Some(json!({"username": "dora"}))),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);

        let duplicate = send(
            &app,
            request("POST", "/api/v1/users", None, Some(json!({"username": "dora"}))),
        )
        .await;
        assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);

        let bad_email = send(
            &app,
            request(
                "POST",
                "/api/v1/users",
                None,
                Some(json!({"username": "eve", "email": "not-an-email"})),
            ),
        )
        .await;
        assert_eq!(bad_email.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bearer_token_authenticates() {
        let app = app().await;
        let issued = body_json(send(&app, request("POST", "/auth/token", Some("bob-key"), None)).await).await;
        let token = issued["token"].as_str().unwrap().to_string();

        let response = send(
            &app,
            Request::builder()
                .uri("/api/v1/feed")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_boundary_echoes_next() {
        let app = app().await;
        let response = send(
            &app,
            request("GET", "/auth/login?next=%2Fapi%2Fv1%2Ffeed", None, None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["details"], "/api/v1/feed");
    }

    #[tokio::test]
    async fn test_security_headers_present() {
        let app = app().await;
        let response = send(&app, request("GET", "/api/v1/posts", None, None)).await;
        assert_eq!(response.headers()["X-Frame-Options"], "DENY");
        assert_eq!(response.headers()["X-Content-Type-Options"], "nosniff");
    }
}
