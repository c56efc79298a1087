use patente_browser::{BrowserError, BrowserSession, SessionConfig};

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_session_open_and_close() {
    let session = BrowserSession::open(SessionConfig::default()).await;
    assert!(session.is_ok(), "Failed to open browser session");

    let mut session = session.unwrap();
    assert!(!session.is_closed());
    session.close().await;
    assert!(session.is_closed());
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_close_is_idempotent() {
    let mut session = BrowserSession::open(SessionConfig::default())
        .await
        .unwrap();

    session.close().await;
    session.close().await;
    assert!(session.is_closed());
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_navigation_and_page_reads() {
    let mut session = BrowserSession::open(SessionConfig::default())
        .await
        .unwrap();

    let result = session.navigate("https://example.com").await;
    assert!(result.is_ok(), "Navigation failed: {result:?}");

    let title = session.title().await.unwrap();
    assert!(!title.is_empty());

    let content = session.content().await.unwrap();
    assert!(content.contains("Example"));

    session.close().await;
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_operations_fail_after_close() {
    let mut session = BrowserSession::open(SessionConfig::default())
        .await
        .unwrap();
    session.close().await;

    let result = session.navigate("https://example.com").await;
    assert!(matches!(result, Err(BrowserError::Closed)));
}
