//! End-to-end tests against a server bound to a local socket.

use std::net::SocketAddr;
use std::time::Duration;

use employee_portal::access::Role;
use employee_portal::store::CredentialStore;
use employee_portal::{HttpServer, Shutdown};
use reqwest::redirect::Policy;
use reqwest::StatusCode;

mod common;

async fn start(server: HttpServer, shutdown: &Shutdown) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    addr
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_register_login_and_browse() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("employeeData.csv");

    let mut config = common::test_config();
    config.credentials.path = csv_path.to_string_lossy().into_owned();
    config.credentials.persist = true;
    config.credentials.default_role = "engineer".into();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let addr = start(server, &shutdown).await;
    let client = client();
    let base = format!("http://{}", addr);

    let res = client
        .post(format!("{}/new_user", base))
        .form(&[("username", "grace"), ("password", "Compil3r!")])
        .send()
        .await
        .expect("Portal unreachable");
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(&base)
        .form(&[("username", "grace"), ("password", "Compil3r!")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    let location = res.headers()["location"].to_str().unwrap().to_string();
    assert_eq!(location, "/menu/grace");

    let menu = client.get(format!("{}{}", base, location)).send().await.unwrap();
    assert_eq!(menu.status(), StatusCode::OK);
    let body = menu.text().await.unwrap();
    assert!(body.contains("/menu_option/grace/4"));
    assert!(!body.contains("/menu_option/grace/2"));

    let docs = client
        .get(format!("{}/menu_option/grace/4", base))
        .send()
        .await
        .unwrap();
    assert_eq!(docs.text().await.unwrap(), "You accessed the Engineering Documents area!");

    shutdown.trigger();

    // The new employee survived to disk.
    let reloaded = CredentialStore::load(&csv_path, false);
    assert_eq!(reloaded.get_role("grace").unwrap(), Role::Engineer);
}

#[tokio::test]
async fn test_lockout_over_the_wire() {
    let shutdown = Shutdown::new();
    let addr = start(common::test_server(common::test_config()), &shutdown).await;
    let client = client();
    let base = format!("http://{}", addr);

    for _ in 0..3 {
        let res = client
            .post(&base)
            .form(&[("username", "alice"), ("password", "guess")])
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    let res = client
        .post(&base)
        .form(&[("username", "alice"), ("password", common::PASSWORD)])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        res.text().await.unwrap(),
        "You are locked from the system for too many attempts"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_missing_credential_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::test_config();
    config.credentials.path = dir.path().join("absent.csv").to_string_lossy().into_owned();

    let shutdown = Shutdown::new();
    let addr = start(HttpServer::new(config).unwrap(), &shutdown).await;

    let health: serde_json::Value = client()
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["users"], 0);

    shutdown.trigger();
}
