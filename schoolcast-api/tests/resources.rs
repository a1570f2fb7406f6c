//! Endpoint behaviour against a mock backend

use std::sync::Arc;
use std::time::Duration;

use schoolcast_api::resources::{self, Admin, AdminDraft, School};
use schoolcast_api::{ApiClient, MemorySessionStore, Role, Session, SessionRepository, User};
use schoolcast_dispatch_core::Filters;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user() -> User {
    User {
        id: "u1".into(),
        name: "Root".into(),
        email: "root@schoolcast.app".into(),
        role: Role::SuperAdmin,
        school_id: None,
    }
}

fn client(server: &MockServer, session: Arc<dyn SessionRepository>) -> ApiClient {
    ApiClient::new(server.uri(), Duration::from_secs(5), session).unwrap()
}

fn signed_out(server: &MockServer) -> ApiClient {
    client(server, Arc::new(MemorySessionStore::new()))
}

fn admin_page() -> serde_json::Value {
    json!({
        "success": true,
        "data": {
            "items": [
                {"id": "a1", "name": "Ann", "email": "ann@school.org", "role": "ADMIN",
                 "schoolId": "s1", "school": {"id": "s1", "name": "Hill School"}},
                {"id": "a2", "name": "Bo", "email": "bo@schoolcast.app", "role": "SUPER_ADMIN",
                 "schoolId": null}
            ],
            "pagination": {"page": 1, "limit": 10, "total": 2, "totalPages": 1}
        }
    })
}

#[tokio::test]
async fn test_list_omits_blank_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admins"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "10"))
        .and(query_param_is_missing("search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(admin_page()))
        .expect(1)
        .mount(&server)
        .await;

    let filters = Filters {
        search: "   ".into(),
        ..Filters::default()
    };
    let page = resources::list::<Admin>(&signed_out(&server), &filters)
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].school_name(), Some("Hill School"));
    assert_eq!(page.items[1].role, Role::SuperAdmin);
    assert_eq!(page.pagination.total_pages, 1);
}

#[tokio::test]
async fn test_list_sends_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/schools"))
        .and(query_param("search", "hill"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"items": [], "pagination": {"page": 2, "limit": 10, "total": 11, "totalPages": 2}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filters = Filters {
        search: "hill".into(),
        page: 2,
        limit: 10,
    };
    let page = resources::list::<School>(&signed_out(&server), &filters)
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.pagination.total, 11);
}

#[tokio::test]
async fn test_server_message_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admins"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"success": false, "message": "Forbidden"})),
        )
        .mount(&server)
        .await;

    let err = resources::list::<Admin>(&signed_out(&server), &Filters::default())
        .await
        .unwrap_err();
    assert_eq!(err.message, "Forbidden");
}

#[tokio::test]
async fn test_fallback_message_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admins"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/schools/s9"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let client = signed_out(&server);
    let err = resources::list::<Admin>(&client, &Filters::default())
        .await
        .unwrap_err();
    assert_eq!(err.message, "Failed to fetch admins");

    let err = resources::remove::<School>(&client, "s9").await.unwrap_err();
    assert_eq!(err.message, "Failed to delete school");
}

#[tokio::test]
async fn test_unsuccessful_envelope_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admins/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;

    let err = resources::get::<Admin>(&signed_out(&server), "a1")
        .await
        .unwrap_err();
    assert_eq!(err.message, "Failed to fetch admin");
}

#[tokio::test]
async fn test_create_super_admin_sends_null_school() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admins"))
        .and(body_json(json!({
            "name": "Bo",
            "email": "bo@schoolcast.app",
            "role": "SUPER_ADMIN",
            "schoolId": null,
            "password": "secret1"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": {"id": "a3", "name": "Bo", "email": "bo@schoolcast.app", "role": "SUPER_ADMIN"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let draft = AdminDraft {
        name: "Bo".into(),
        email: "bo@schoolcast.app".into(),
        role: Role::SuperAdmin,
        school_id: Some("s1".into()),
        password: Some("secret1".into()),
    };
    let admin = resources::create::<Admin>(&signed_out(&server), &draft)
        .await
        .unwrap();
    assert_eq!(admin.id, "a3");
}

#[tokio::test]
async fn test_update_without_password_omits_it() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/admins/a1"))
        .and(body_json(json!({
            "name": "Ann B",
            "email": "ann@school.org",
            "role": "ADMIN",
            "schoolId": "s1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"id": "a1", "name": "Ann B", "email": "ann@school.org", "role": "ADMIN", "schoolId": "s1"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let draft = AdminDraft {
        name: "Ann B".into(),
        email: "ann@school.org".into(),
        role: Role::Admin,
        school_id: Some("s1".into()),
        password: Some(String::new()),
    };
    let admin = resources::update::<Admin>(&signed_out(&server), "a1", &draft)
        .await
        .unwrap();
    assert_eq!(admin.name, "Ann B");
}

#[tokio::test]
async fn test_bearer_token_from_session() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/admins/a1"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": null})))
        .expect(1)
        .mount(&server)
        .await;

    let session = Arc::new(MemorySessionStore::with_session(Session {
        token: "tok-123".into(),
        user: user(),
    }));
    let deleted = resources::remove::<Admin>(&client(&server, session), "a1")
        .await
        .unwrap();
    assert_eq!(deleted, "a1");
}
