//! Integration tests for the robot bridge client
//!
//! Exercises session lifecycle, the probe/reconnect-once discipline, and the
//! audio/LED/gesture endpoints against a mocked bridge.

use domain::AudioFormat;
use integration_robot::{RobotClient, RobotConfig, RobotError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> RobotClient {
    RobotClient::new(RobotConfig {
        base_url: base_url.to_string(),
        auth_token: Some("bridge-token".to_string()),
        control_timeout_ms: 2000,
        playback_timeout_ms: 5000,
        led_group: "face".to_string(),
    })
    .unwrap()
}

fn session_ok(id: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "session_id": id }))
}

async fn mount_session(server: &MockServer, id: &str) {
    Mock::given(method("POST"))
        .and(path("/api/session"))
        .respond_with(session_ok(id))
        .mount(server)
        .await;
}

async fn mount_ping_ok(server: &MockServer, id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/session/{id}/ping")))
        .respond_with(ResponseTemplate::new(204))
        .mount(server)
        .await;
}

#[tokio::test]
async fn upload_opens_session_probes_and_delivers() {
    let server = MockServer::start().await;
    mount_session(&server, "s1").await;
    mount_ping_ok(&server, "s1").await;

    Mock::given(method("POST"))
        .and(path("/api/audio"))
        .and(header("X-Session", "s1"))
        .and(header("Content-Type", "audio/wav"))
        .and(header("Authorization", "Bearer bridge-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "audio_id": "a42" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let audio_id = client
        .upload_audio(vec![1, 2, 3], AudioFormat::Wav)
        .await
        .unwrap();

    assert_eq!(audio_id, "a42");
}

#[tokio::test]
async fn second_upload_reuses_the_live_session() {
    let server = MockServer::start().await;

    // Exactly one session for two deliveries
    Mock::given(method("POST"))
        .and(path("/api/session"))
        .respond_with(session_ok("s1"))
        .expect(1)
        .mount(&server)
        .await;
    mount_ping_ok(&server, "s1").await;

    Mock::given(method("POST"))
        .and(path("/api/audio"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "audio_id": "a1" })),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.upload_audio(vec![1], AudioFormat::Mp3).await.unwrap();
    client.upload_audio(vec![2], AudioFormat::Mp3).await.unwrap();
}

#[tokio::test]
async fn failed_probe_recreates_the_session_once() {
    let server = MockServer::start().await;

    // First session s1, then s2 after the probe fails
    Mock::given(method("POST"))
        .and(path("/api/session"))
        .respond_with(session_ok("s1"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/session"))
        .respond_with(session_ok("s2"))
        .mount(&server)
        .await;

    // The first delivery opens s1 without probing; the second delivery's
    // probe finds it dead
    Mock::given(method("GET"))
        .and(path("/api/session/s1/ping"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    // Closing the stale session is best-effort
    Mock::given(method("DELETE"))
        .and(path("/api/session/s1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/audio"))
        .and(header("X-Session", "s1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "audio_id": "a1" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/audio"))
        .and(header("X-Session", "s2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "audio_id": "a2" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert_eq!(
        client.upload_audio(vec![1], AudioFormat::Wav).await.unwrap(),
        "a1"
    );
    assert_eq!(
        client.upload_audio(vec![2], AudioFormat::Wav).await.unwrap(),
        "a2"
    );
}

#[tokio::test]
async fn failed_recreation_fails_the_delivery() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/session"))
        .respond_with(ResponseTemplate::new(503).set_body_string("bridge restarting"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .upload_audio(vec![1], AudioFormat::Wav)
        .await
        .unwrap_err();

    assert!(matches!(err, RobotError::Unavailable(_)));
}

#[tokio::test]
async fn play_blocks_until_bridge_reports_done() {
    let server = MockServer::start().await;
    mount_session(&server, "s1").await;

    Mock::given(method("POST"))
        .and(path("/api/audio/a42/play"))
        .and(header("X-Session", "s1"))
        .respond_with(
            ResponseTemplate::new(200).set_delay(std::time::Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let started = std::time::Instant::now();
    client.play_audio("a42").await.unwrap();
    assert!(started.elapsed() >= std::time::Duration::from_millis(100));
}

#[tokio::test]
async fn play_failure_is_playback_failed() {
    let server = MockServer::start().await;
    mount_session(&server, "s1").await;

    Mock::given(method("POST"))
        .and(path("/api/audio/a42/play"))
        .respond_with(ResponseTemplate::new(500).set_body_string("speaker fault"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.play_audio("a42").await.unwrap_err();
    assert!(matches!(err, RobotError::PlaybackFailed(_)));
}

#[tokio::test]
async fn delete_audio_hits_the_resource() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/audio/a42"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.delete_audio("a42").await.unwrap();
}

#[tokio::test]
async fn say_uses_the_builtin_voice_endpoint() {
    let server = MockServer::start().await;
    mount_session(&server, "s1").await;

    Mock::given(method("POST"))
        .and(path("/api/tts/say"))
        .and(body_partial_json(serde_json::json!({ "text": "fallback words" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.say("fallback words").await.unwrap();
}

#[tokio::test]
async fn led_fade_sends_group_and_rgb() {
    let server = MockServer::start().await;
    mount_session(&server, "s1").await;

    Mock::given(method("POST"))
        .and(path("/api/leds/fade"))
        .and(body_partial_json(serde_json::json!({
            "group": "face",
            "rgb": 0x00FF_FF00u32,
            "seconds": 0.5
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.fade_leds(0x00FF_FF00, 0.5).await.unwrap();
}

#[tokio::test]
async fn gesture_runs_by_name() {
    let server = MockServer::start().await;
    mount_session(&server, "s1").await;

    Mock::given(method("POST"))
        .and(path("/api/gestures/shake_head"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.run_gesture("shake_head").await.unwrap();
}

#[tokio::test]
async fn volume_is_normalized_to_unit_range() {
    let server = MockServer::start().await;
    mount_session(&server, "s1").await;

    Mock::given(method("POST"))
        .and(path("/api/audio/volume"))
        .and(body_partial_json(serde_json::json!({ "volume": 0.8 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.set_volume(80).await.unwrap();
}
