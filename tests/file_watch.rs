//! File source with hot reload, through the startup path.

use std::time::Duration;

use config_client::config::{ClientConfig, SourceConfig};
use config_client::lifecycle::{start_services, Shutdown};

mod common;

#[tokio::test]
async fn test_edit_is_served_without_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("application.toml");
    std::fs::write(&path, "[example]\nmessage = \"hello\"\n").unwrap();

    let mut config = ClientConfig::default();
    config.source = SourceConfig::File { path: path.clone() };
    config.refresh.watch_file = true;

    let shutdown = Shutdown::new();
    let services = start_services(&config, &shutdown).await.unwrap();
    let addr = common::start_client(services.endpoint.clone(), &shutdown).await;
    let client = common::http_client();
    let url = format!("http://{}/message", addr);

    assert_eq!(client.get(&url).send().await.unwrap().text().await.unwrap(), "hello");

    std::fs::write(&path, "[example]\nmessage = \"world\"\n").unwrap();

    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    loop {
        let body = client.get(&url).send().await.unwrap().text().await.unwrap();
        if body == "world" {
            break;
        }
        assert_eq!(body, "hello", "only old or new value may be served");
        assert!(tokio::time::Instant::now() < deadline, "edit was never picked up");
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    shutdown.trigger();
}
