#![allow(clippy::unwrap_used)]
// Integration tests for call handler greetings and WAV media transfer.

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{any, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vmrest_api::{CallHandler, Entity, Error, Greeting, GreetingType, Session, User};

async fn setup() -> (MockServer, Session) {
    let server = MockServer::start().await;
    let session = Session::with_client(
        reqwest::Client::new(),
        &server.uri(),
        "admin",
        SecretString::from("test-password".to_owned()),
    )
    .unwrap();
    (server, session)
}

async fn mount_handler(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/vmrest/handlers/callhandlers/h-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ObjectId": "h-1",
            "URI": "/vmrest/handlers/callhandlers/h-1",
            "DisplayName": "Operator",
            "DtmfAccessId": "0",
            "Language": "1033",
            "Undeletable": "true"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_call_handler() {
    let (server, session) = setup().await;
    mount_handler(&server).await;

    let handler = Entity::<CallHandler>::fetch(&session, "h-1").await.unwrap();

    assert_eq!(handler.get().display_name.as_deref(), Some("Operator"));
    assert_eq!(handler.get().language, Some(1033));
    assert_eq!(handler.get().undeletable, Some(true));
}

#[tokio::test]
async fn test_fetch_and_update_greeting() {
    let (server, session) = setup().await;
    mount_handler(&server).await;

    Mock::given(method("GET"))
        .and(path("/vmrest/handlers/callhandlers/h-1/greetings/Standard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "URI": "/vmrest/handlers/callhandlers/h-1/greetings/Standard",
            "GreetingType": "Standard",
            "CallHandlerObjectId": "h-1",
            "Enabled": "false",
            "PlayWhat": "0"
        })))
        .mount(&server)
        .await;

    // Greetings are addressed through the server-supplied URI.
    Mock::given(method("PUT"))
        .and(path("/vmrest/handlers/callhandlers/h-1/greetings/Standard"))
        .and(body_json(json!({ "Enabled": "true" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let handler = Entity::<CallHandler>::fetch(&session, "h-1").await.unwrap();
    let mut greeting = handler
        .fetch_greeting(&session, GreetingType::Standard)
        .await
        .unwrap();

    assert_eq!(greeting.get().enabled, Some(false));

    greeting.set_field("Enabled", true).unwrap();
    greeting.update(&session).await.unwrap();

    assert_eq!(greeting.snapshot().enabled, Some(true));
    assert!(!greeting.has_pending_changes());
}

#[tokio::test]
async fn test_list_greetings() {
    let (server, session) = setup().await;
    mount_handler(&server).await;

    Mock::given(method("GET"))
        .and(path("/vmrest/handlers/callhandlers/h-1/greetings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@total": "2",
            "Greeting": [
                { "GreetingType": "Standard", "Enabled": "true" },
                { "GreetingType": "Off Hours", "Enabled": "false" }
            ]
        })))
        .mount(&server)
        .await;

    let handler = Entity::<CallHandler>::fetch(&session, "h-1").await.unwrap();
    let greetings = handler.list_greetings(&session).await.unwrap();

    assert_eq!(greetings.items.len(), 2);
    assert_eq!(greetings.items[1].greeting_type.as_deref(), Some("Off Hours"));
}

#[tokio::test]
async fn test_detached_greeting_shell_cannot_be_created() {
    let (server, session) = setup().await;

    // Greeting slots exist per handler; a dirty shell must be refused
    // locally rather than POSTed to the call handler collection.
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let mut greeting = Entity::<Greeting>::shell();
    greeting.set_field("Enabled", true).unwrap();

    let result = greeting.update(&session).await;
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    // Staged edits survive the refusal.
    assert!(greeting.has_pending_changes());
}

// ── WAV media ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_download_greeting_recording() {
    let (server, session) = setup().await;
    mount_handler(&server).await;

    Mock::given(method("GET"))
        .and(path("/vmrest/handlers/callhandlers/h-1/greetings/Standard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "URI": "/vmrest/handlers/callhandlers/h-1/greetings/Standard",
            "GreetingType": "Standard"
        })))
        .mount(&server)
        .await;

    let audio = b"RIFF....WAVEfmt fake-audio-bytes".to_vec();
    Mock::given(method("GET"))
        .and(path(
            "/vmrest/handlers/callhandlers/h-1/greetings/Standard/greetingstreamfiles/1033/audio",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(audio.clone()))
        .mount(&server)
        .await;

    let handler = Entity::<CallHandler>::fetch(&session, "h-1").await.unwrap();
    let greeting = handler
        .fetch_greeting(&session, GreetingType::Standard)
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("standard.wav");
    greeting
        .download_recording(&session, 1033, &local)
        .await
        .unwrap();

    assert_eq!(std::fs::read(&local).unwrap(), audio);
}

#[tokio::test]
async fn test_upload_voice_name_sends_wav_content_type() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/vmrest/users/u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ObjectId": "u-1",
            "Alias": "jdoe"
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/vmrest/users/u-1/voicename"))
        .and(header("content-type", "audio/wav"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("name.wav");
    std::fs::write(&local, b"RIFF....WAVEfmt voice-name").unwrap();

    let user = Entity::<User>::fetch(&session, "u-1").await.unwrap();
    user.upload_voice_name(&session, &local).await.unwrap();
}

#[tokio::test]
async fn test_voice_name_on_detached_shell_fails_locally() {
    let (_server, session) = setup().await;

    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("name.wav");

    let user = Entity::<User>::shell();
    let result = user.upload_voice_name(&session, &local).await;
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
}
