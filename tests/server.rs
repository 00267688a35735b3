use serde_json::Value;
use sos_map::config::AppConfig;
use std::net::SocketAddr;
use std::time::Duration;

async fn spawn_server(config: AppConfig) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        sos_map::server::serve(listener, config).await.unwrap();
    });
    addr
}

/// GET a path and return (status, parsed JSON body).
async fn get_json(addr: SocketAddr, path: &str) -> (u16, Value) {
    let url = format!("http://{}{}", addr, path);
    tokio::task::spawn_blocking(move || match ureq::get(&url).call() {
        Ok(resp) => (resp.status(), resp.into_json().unwrap()),
        Err(ureq::Error::Status(code, resp)) => (code, resp.into_json().unwrap()),
        Err(e) => panic!("request failed: {}", e),
    })
    .await
    .unwrap()
}

async fn get_text(addr: SocketAddr, path: &str) -> (String, String) {
    let url = format!("http://{}{}", addr, path);
    tokio::task::spawn_blocking(move || {
        let resp = ureq::get(&url).call().unwrap();
        let content_type = resp.content_type().to_string();
        (content_type, resp.into_string().unwrap())
    })
    .await
    .unwrap()
}

fn names(body: &Value) -> Vec<String> {
    body["markers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_index_has_button_and_map() {
    let addr = spawn_server(AppConfig::defaults().unwrap()).await;
    let (content_type, html) = get_text(addr, "/").await;
    assert_eq!(content_type, "text/html");
    assert!(html.contains(r#"id="showMarkersButton""#));
    assert!(html.contains(r#"id="map""#));

    let (content_type, _) = get_text(addr, "/app.js").await;
    assert_eq!(content_type, "application/javascript");
}

#[tokio::test]
async fn test_markers_lists_ten_cities() {
    let addr = spawn_server(AppConfig::defaults().unwrap()).await;
    let (status, body) = get_json(addr, "/api/markers").await;
    assert_eq!(status, 200);

    let markers = body.as_array().unwrap();
    assert_eq!(markers.len(), 10);
    assert_eq!(markers[0]["name"], "Delhi");
    assert_eq!(
        markers[0]["popup"],
        "<b>Delhi</b><br/>Latitude: 28.7041<br/>Longitude: 77.1025"
    );
}

#[tokio::test]
async fn test_nearest_from_delhi() {
    let addr = spawn_server(AppConfig::defaults().unwrap()).await;
    let (status, body) = get_json(addr, "/api/nearest?lat=28.70&lon=77.10&limit=3").await;
    assert_eq!(status, 200);
    assert_eq!(names(&body), vec!["Delhi", "Jaipur", "Lucknow"]);
    assert_eq!(body["limit"], 3);
    assert_eq!(body["markers"][0]["rank"], 1);
}

#[tokio::test]
async fn test_nearest_default_limit_and_colors() {
    let config = AppConfig::defaults().unwrap().with_ranking(Some(7), Some(5));
    let addr = spawn_server(config).await;
    let (status, body) = get_json(addr, "/api/nearest?lat=20.0&lon=78.0").await;
    assert_eq!(status, 200);

    let markers = body["markers"].as_array().unwrap();
    assert_eq!(markers.len(), 7);
    let colors: Vec<&str> = markers.iter().map(|m| m["color"].as_str().unwrap()).collect();
    assert_eq!(colors, vec!["blue", "blue", "blue", "blue", "blue", "red", "red"]);

    let distances: Vec<f64> = markers.iter().map(|m| m["distance"].as_f64().unwrap()).collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_nearest_limit_above_count() {
    let addr = spawn_server(AppConfig::defaults().unwrap()).await;
    let (status, body) = get_json(addr, "/api/nearest?lat=15&lon=75&limit=50").await;
    assert_eq!(status, 200);
    assert_eq!(names(&body).len(), 10);
}

#[tokio::test]
async fn test_nearest_missing_coordinates() {
    let addr = spawn_server(AppConfig::defaults().unwrap()).await;
    let (status, body) = get_json(addr, "/api/nearest?lat=28.7").await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], 400);
    assert!(body["error"].as_str().unwrap().contains("lon"));
}

#[tokio::test]
async fn test_nearest_out_of_range() {
    let addr = spawn_server(AppConfig::defaults().unwrap()).await;
    let (status, body) = get_json(addr, "/api/nearest?lat=95&lon=10").await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid coordinates"));
}

#[tokio::test]
async fn test_nearest_malformed_number() {
    let addr = spawn_server(AppConfig::defaults().unwrap()).await;

    let (status, body) = get_json(addr, "/api/nearest?lat=abc&lon=77").await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], 400);
    assert!(body["error"].as_str().unwrap().contains("lat"));

    let (status, body) = get_json(addr, "/api/nearest?lat=28.7&lon=77&limit=-1").await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn test_locate_via_ip_lookup() {
    let mut upstream = mockito::Server::new_async().await;
    upstream
        .mock("GET", "/json/")
        .with_status(200)
        .with_body(r#"{"latitude": 26.9124, "longitude": 75.7873, "city": "Jaipur", "country_name": "India"}"#)
        .create_async()
        .await;

    let config = AppConfig::defaults()
        .unwrap()
        .with_ip_lookup_url(format!("{}/json/", upstream.url()));
    let addr = spawn_server(config).await;

    let (status, body) = get_json(addr, "/api/locate").await;
    assert_eq!(status, 200);
    assert_eq!(body["coords"]["latitude"], 26.9124);
    assert_eq!(body["source"], "IpApi");
    assert_eq!(body["label"], "Jaipur, India");
}

#[tokio::test]
async fn test_locate_upstream_failure() {
    let mut upstream = mockito::Server::new_async().await;
    upstream.mock("GET", "/json/").with_status(500).create_async().await;

    let config = AppConfig::defaults()
        .unwrap()
        .with_ip_lookup_url(format!("{}/json/", upstream.url()));
    let addr = spawn_server(config).await;

    let (status, body) = get_json(addr, "/api/locate").await;
    assert_eq!(status, 502);
    assert!(body["error"].as_str().unwrap().starts_with("Network error"));
}

#[tokio::test]
async fn test_location_error_message() {
    let addr = spawn_server(AppConfig::defaults().unwrap()).await;

    let (status, body) = get_json(addr, "/api/location-error?code=1&message=User%20denied").await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Permission to read the location was denied");

    let (_, body) = get_json(addr, "/api/location-error").await;
    assert_eq!(body["message"], "Geolocation is not supported by this client");
}

#[tokio::test]
async fn test_config_endpoint() {
    let addr = spawn_server(AppConfig::defaults().unwrap()).await;
    let (status, body) = get_json(addr, "/api/config").await;
    assert_eq!(status, 200);
    assert_eq!(body["world_zoom"], 2);
    assert_eq!(body["located_zoom"], 15);
    assert_eq!(body["limit"], 5);
    assert_eq!(body["highlighted"], 5);
}

#[tokio::test]
async fn test_locate_upstream_timeout() {
    let silent = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let config = AppConfig::defaults()
        .unwrap()
        .with_ip_lookup_url(format!("http://{}/json/", silent.local_addr().unwrap()))
        .with_lookup_timeout(Duration::from_millis(200));
    let addr = spawn_server(config).await;

    let (status, body) = get_json(addr, "/api/locate").await;
    assert_eq!(status, 504);
    assert_eq!(body["code"], 504);
    assert_eq!(body["error"], "Timed out while waiting for a position");
    drop(silent);
}
