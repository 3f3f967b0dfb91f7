use std::time::Duration;

use solvex::solvex_cache::CodeStore;

#[tokio::test]
async fn test_issue_and_consume_once() {
    let store = CodeStore::memory();
    store
        .issue("ada@uni.edu", 123456, Duration::from_secs(600))
        .await
        .unwrap();

    assert_eq!(store.peek("ada@uni.edu").await, Some(123456));
    assert!(store.consume("ada@uni.edu", 123456).await.unwrap());
    assert!(!store.consume("ada@uni.edu", 123456).await.unwrap());
    assert_eq!(store.peek("ada@uni.edu").await, None);
}

#[tokio::test]
async fn test_wrong_code_keeps_entry() {
    let store = CodeStore::memory();
    store
        .issue("ada@uni.edu", 111111, Duration::from_secs(600))
        .await
        .unwrap();

    assert!(!store.consume("ada@uni.edu", 222222).await.unwrap());
    assert!(store.consume("ada@uni.edu", 111111).await.unwrap());
}

#[tokio::test]
async fn test_reissue_replaces_code() {
    let store = CodeStore::memory();
    store
        .issue("ada@uni.edu", 111111, Duration::from_secs(600))
        .await
        .unwrap();
    store
        .issue("ada@uni.edu", 222222, Duration::from_secs(600))
        .await
        .unwrap();

    assert!(!store.consume("ada@uni.edu", 111111).await.unwrap());
    assert!(store.consume("ada@uni.edu", 222222).await.unwrap());
}

#[tokio::test]
async fn test_expired_code_is_rejected() {
    let store = CodeStore::memory();
    store
        .issue("ada@uni.edu", 123456, Duration::from_millis(10))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(30)).await;

    assert_eq!(store.peek("ada@uni.edu").await, None);
    assert!(!store.consume("ada@uni.edu", 123456).await.unwrap());
}

#[tokio::test]
async fn test_codes_are_per_email() {
    let store = CodeStore::memory();
    store
        .issue("ada@uni.edu", 123456, Duration::from_secs(600))
        .await
        .unwrap();

    assert!(!store.consume("grace@uni.edu", 123456).await.unwrap());
    assert!(store.consume("ada@uni.edu", 123456).await.unwrap());
}
