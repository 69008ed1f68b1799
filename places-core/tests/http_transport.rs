//! End-to-end call sites over real HTTP against a wiremock server

use std::sync::Arc;

use places_core::api::{ImageUpload, LoginForm, NewPlaceForm, UpdatePlaceForm};
use places_core::error::GENERIC_FAILURE_MESSAGE;
use places_core::request::ReqwestTransport;
use places_core::session::Credentials;
use places_core::{
    ClientConfig, Destination, MemorySessionStore, Owner, PlacesApi, RequestError, SessionMachine,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn api_for(server: &MockServer) -> (PlacesApi, Arc<SessionMachine>) {
    let config = ClientConfig::new(format!("{}/api", server.uri()), server.uri());
    let session = Arc::new(SessionMachine::new(Arc::new(MemorySessionStore::new())));
    let transport = Arc::new(ReqwestTransport::new().unwrap());
    let api = PlacesApi::new(config.endpoints().unwrap(), transport, session.clone());
    (api, session)
}

fn new_place_form() -> NewPlaceForm {
    NewPlaceForm {
        title: "Tower".into(),
        description: "Tall building".into(),
        address: "Main St 1".into(),
        image: ImageUpload::new("tower.png", "image/png", vec![0x89, 0x50, 0x4E, 0x47]),
    }
}

#[tokio::test]
async fn login_posts_json_and_authenticates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .and(body_json(json!({"email": "max@example.com", "password": "secret"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"userId": "u1", "token": "t1"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let (api, session) = api_for(&server).await;
    let owner = Owner::new("login");
    let controller = owner.controller(api.transport());

    api.login(
        &controller,
        &LoginForm {
            email: "max@example.com".into(),
            password: "secret".into(),
        },
    )
    .await
    .unwrap();

    assert_eq!(session.snapshot().user_id(), Some("u1"));
    assert!(controller.last_result().is_some());
}

#[tokio::test]
async fn create_place_sends_multipart_with_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/places"))
        .and(header("Authorization", "Bearer t1"))
        .and(body_string_contains("name=\"creator\""))
        .and(body_string_contains("filename=\"tower.png\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "place": {"id": "p9", "title": "Tower", "description": "Tall building",
                      "address": "Main St 1", "creator": "u1"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    let (api, session) = api_for(&server).await;
    session.login(Credentials::new("u1", "t1")).await.unwrap();
    let owner = Owner::new("new-place");
    let controller = owner.controller(api.transport());

    let saved = api.create_place(&controller, &new_place_form()).await.unwrap();

    assert_eq!(saved.value.id, "p9");
    assert_eq!(saved.next, Destination::Users);
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn validation_failure_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/places/p1"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"message": "Too short"})))
        .mount(&server)
        .await;
    let (api, session) = api_for(&server).await;
    session.login(Credentials::new("u1", "t1")).await.unwrap();
    let owner = Owner::new("update-place");
    let controller = owner.controller(api.transport());

    let err = api
        .update_place(
            &controller,
            "p1",
            &UpdatePlaceForm {
                title: "T".into(),
                description: "x".into(),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        RequestError::Application {
            status: 422,
            message: "Too short".into()
        }
    );
    assert_eq!(controller.error().as_deref(), Some("Too short"));
    assert!(controller.last_result().is_none());
}

#[tokio::test]
async fn failure_without_message_uses_generic_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({})))
        .mount(&server)
        .await;
    let (api, _) = api_for(&server).await;
    let owner = Owner::new("users");
    let controller = owner.controller(api.transport());

    let _ = api.users(&controller).await;

    assert_eq!(controller.error().as_deref(), Some(GENERIC_FAILURE_MESSAGE));
}

#[tokio::test]
async fn malformed_body_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/places/user/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;
    let (api, _) = api_for(&server).await;
    let owner = Owner::new("user-places");
    let controller = owner.controller(api.transport());

    let err = api.user_places(&controller, "u1").await.unwrap_err();

    assert!(matches!(err, RequestError::Transport(_)));
    assert!(controller.error().is_some());
}

#[tokio::test]
async fn unreachable_server_is_transport_failure() {
    // Nothing listens on port 1
    let config = ClientConfig::new("http://127.0.0.1:1/api", "http://127.0.0.1:1");
    let session = Arc::new(SessionMachine::new(Arc::new(MemorySessionStore::new())));
    let api = PlacesApi::new(
        config.endpoints().unwrap(),
        Arc::new(ReqwestTransport::new().unwrap()),
        session,
    );
    let owner = Owner::new("users");
    let controller = owner.controller(api.transport());

    let err = api.users(&controller).await.unwrap_err();

    assert!(matches!(err, RequestError::Transport(_)));
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn delete_place_sends_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/places/p1"))
        .and(header("Authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Deleted place."})))
        .expect(1)
        .mount(&server)
        .await;
    let (api, session) = api_for(&server).await;
    session.login(Credentials::new("u1", "t1")).await.unwrap();
    let owner = Owner::new("place-item");
    let controller = owner.controller(api.transport());

    let response = api.delete_place(&controller, "p1").await.unwrap();

    assert_eq!(response.message, "Deleted place.");
}
