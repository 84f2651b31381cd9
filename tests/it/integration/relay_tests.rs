//! Relay Integration Tests
//!
//! Runs the relay on an ephemeral port and talks to it over real HTTP.

use crate::helpers::{GREEN, MapFetcher, png_bytes};
use overlayboard::customizer::Customizer;
use overlayboard::loader::{AssetLoader, Fetch, HttpFetcher, ImageSource};
use overlayboard::relay::{RELAY_PATH, RelayServer, relay_url};
use overlayboard::settings::Settings;
use std::sync::Arc;

const UPSTREAM: &str = "https://cdn.example/bear 1.png";

fn start_relay() -> (RelayServer, Arc<MapFetcher>) {
    let upstream = Arc::new(MapFetcher::new().with(UPSTREAM, png_bytes(12, 8, GREEN), false));
    let relay = RelayServer::start("127.0.0.1:0", upstream.clone()).unwrap();
    (relay, upstream)
}

fn client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder().no_proxy().build().unwrap()
}

#[test]
fn test_relay_serves_upstream_with_cors() {
    let (relay, upstream) = start_relay();

    let response = client().get(relay_url(&relay.endpoint(), UPSTREAM)).send().unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let header = |name: &str| {
        response
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    assert_eq!(header("access-control-allow-origin").as_deref(), Some("*"));
    assert_eq!(header("content-type").as_deref(), Some("image/png"));
    assert_eq!(header("cache-control").as_deref(), Some("public, max-age=86400"));
    assert_eq!(response.bytes().unwrap().to_vec(), png_bytes(12, 8, GREEN));

    // The relay decoded the percent-encoded target
    assert_eq!(upstream.requests(), vec![UPSTREAM.to_string()]);
}

#[test]
fn test_relay_rejects_missing_url() {
    let (relay, upstream) = start_relay();

    let response = client().get(relay.endpoint()).send().unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = serde_json::from_slice(&response.bytes().unwrap()).unwrap();
    assert_eq!(body["error"], "Missing URL");

    let response = client().get(format!("{}?url=", relay.endpoint())).send().unwrap();
    assert_eq!(response.status().as_u16(), 400);
    assert!(upstream.requests().is_empty());
}

#[test]
fn test_relay_unknown_path_is_not_found() {
    let (relay, _) = start_relay();
    let response = client().get(format!("http://{}/elsewhere", relay.addr())).send().unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[test]
fn test_relay_reports_upstream_failure() {
    let (relay, _) = start_relay();
    let response = client()
        .get(relay_url(&relay.endpoint(), "https://cdn.example/missing.png"))
        .send()
        .unwrap();
    assert_eq!(response.status().as_u16(), 500);
}

#[test]
fn test_relayed_image_is_readable() {
    let (relay, _) = start_relay();
    let fetcher = HttpFetcher::new("http://localhost:3000").unwrap();

    // Direct upstream bytes would be opaque; through the relay they are not
    let fetched = fetcher.fetch(&relay_url(&relay.endpoint(), UPSTREAM)).unwrap();
    assert!(fetched.readable);

    let loader = AssetLoader::new(Arc::new(fetcher), "http://localhost:3000").with_relay(Some(relay.endpoint()));
    let image = loader.load_blocking(&ImageSource::Url(UPSTREAM.to_string())).unwrap();
    assert!(image.is_readable());
    assert_eq!((image.natural_width(), image.natural_height()), (12, 8));
    assert_eq!(image.source(), UPSTREAM);
}

#[test]
fn test_relay_stops_on_drop() {
    let (relay, _) = start_relay();
    let addr = relay.addr();
    drop(relay);

    let result = client().get(format!("http://{}/image-proxy?url=x", addr)).send();
    assert!(result.is_err());
}

#[test]
fn test_relay_path_must_match_exactly() {
    let (relay, upstream) = start_relay();

    let url = format!("http://{}{}X?url={}", relay.addr(), RELAY_PATH, urlencoding::encode(UPSTREAM));
    let response = client().get(url).send().unwrap();
    assert_eq!(response.status().as_u16(), 404);
    assert!(upstream.requests().is_empty());
}

#[test]
fn test_default_settings_start_local_relay() {
    let customizer = Customizer::from_settings(Settings::default()).unwrap();
    let addr = customizer.local_relay().expect("relay started");
    assert!(addr.ip().is_loopback());

    // Cross-origin images are fetched through the relay, local ones directly
    let endpoint = format!("http://{}{}", addr, RELAY_PATH);
    assert_eq!(customizer.loader().relay_endpoint(), Some(endpoint.as_str()));
    assert_eq!(customizer.loader().route(UPSTREAM), relay_url(&endpoint, UPSTREAM));
    let local = format!("{}/assets/cap.png", Settings::default().app_origin);
    assert_eq!(customizer.loader().route(&local), local);

    // The relay is live and answers on its path
    let response = client().get(&endpoint).send().unwrap();
    assert_eq!(response.status().as_u16(), 400);

    drop(customizer);
    assert!(client().get(&endpoint).send().is_err());
}

#[test]
fn test_configured_relay_endpoint_is_used_as_is() {
    let settings = Settings {
        relay_endpoint: Some("http://relay.example/image-proxy".to_string()),
        ..Settings::default()
    };
    let customizer = Customizer::from_settings(settings).unwrap();

    assert_eq!(customizer.local_relay(), None);
    assert_eq!(
        customizer.loader().route(UPSTREAM),
        relay_url("http://relay.example/image-proxy", UPSTREAM)
    );
}
