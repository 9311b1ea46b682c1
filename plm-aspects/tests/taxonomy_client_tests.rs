//! Taxonomy client tests against a mockito server

use mockito::{Matcher, Mock, Server, ServerGuard};
use plm_aspects::error::AspectError;
use plm_aspects::models::{AspectUsage, InputMode, TruncationPolicy};
use plm_aspects::services::{AspectNormalizer, StaticTokenProvider, TaxonomyClient, TaxonomyProvider};
use plm_common::config::TaxonomyConfig;
use std::sync::Arc;

const ASPECTS_PATH: &str = "/commerce/taxonomy/v1/category_tree/0/get_item_aspects_for_category";
const TEST_TOKEN: &str = "test-token";

const CONTACTOR_BODY: &str = r#"{
    "categoryTreeId": "0",
    "aspects": [
        {
            "localizedAspectName": "Brand",
            "aspectConstraint": {"aspectUsage": "RECOMMENDED", "aspectRequired": true, "aspectMode": "FREE_TEXT"}
        },
        {
            "localizedAspectName": "Coil Voltage",
            "aspectConstraint": {
                "aspectUsage": "RECOMMENDED",
                "aspectMode": "SELECTION_ONLY",
                "itemToAspectCardinality": "MULTI"
            },
            "aspectValues": [
                {"localizedValue": "24 V DC"},
                {"localizedValue": "120 V AC"},
                {"localizedValue": "  "}
            ]
        },
        {
            "localizedAspectName": "Model",
            "aspectConstraint": {"aspectUsage": "OPTIONAL", "aspectMaxLength": 65}
        }
    ]
}"#;

fn client_for(server: &ServerGuard, token: Option<&str>) -> TaxonomyClient {
    let config = TaxonomyConfig {
        base_url: server.url(),
        ..TaxonomyConfig::default()
    };
    let tokens = Arc::new(StaticTokenProvider::new(token.map(str::to_string)));
    TaxonomyClient::new(&config, tokens).unwrap()
}

async fn mock_aspects(
    server: &mut ServerGuard,
    category_id: &str,
    status: usize,
    body: &str,
) -> Mock {
    server
        .mock("GET", ASPECTS_PATH)
        .match_query(Matcher::UrlEncoded("category_id".into(), category_id.into()))
        .match_header("authorization", format!("Bearer {}", TEST_TOKEN).as_str())
        .match_header("x-ebay-c-marketplace-id", "EBAY_US")
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(1)
        .create_async()
        .await
}

#[tokio::test]
async fn test_fetch_sends_token_and_marketplace() {
    let mut server = Server::new_async().await;
    let mock = mock_aspects(&mut server, "181732", 200, CONTACTOR_BODY).await;
    let client = client_for(&server, Some(TEST_TOKEN));

    let raw = client.fetch_item_aspects("181732").await.unwrap();

    mock.assert_async().await;
    assert_eq!(raw.aspects.len(), 3);
    assert_eq!(raw.aspects[1].localized_aspect_name, "Coil Voltage");
}

#[tokio::test]
async fn test_fetch_and_normalize() {
    let mut server = Server::new_async().await;
    let mock = mock_aspects(&mut server, "181732", 200, CONTACTOR_BODY).await;
    let client = client_for(&server, Some(TEST_TOKEN));

    let schema = AspectNormalizer::new(TruncationPolicy::untruncated())
        .fetch_schema(&client, "181732")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(schema.category_id, "181732");

    let brand = &schema.descriptors[0];
    assert_eq!(brand.usage, AspectUsage::Required);

    let coil = &schema.descriptors[1];
    assert_eq!(coil.input_mode, InputMode::SelectionOnly);
    assert_eq!(coil.allowed_values, vec!["24 V DC", "120 V AC"]);
    assert!(coil.multi_value);

    let model = &schema.descriptors[2];
    assert_eq!(model.usage, AspectUsage::Optional);
    assert_eq!(model.max_length, Some(65));
}

#[tokio::test]
async fn test_not_found_carries_status() {
    let mut server = Server::new_async().await;
    let mock = mock_aspects(
        &mut server,
        "999",
        404,
        r#"{"errors":[{"errorId":62004,"message":"The specified category ID was not found"}]}"#,
    )
    .await;
    let client = client_for(&server, Some(TEST_TOKEN));

    let err = client.fetch_item_aspects("999").await.unwrap_err();

    mock.assert_async().await;
    match err {
        AspectError::SchemaFetch { status, message } => {
            assert_eq!(status, Some(404));
            assert!(message.contains("62004"));
        }
        other => panic!("expected SchemaFetch, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_fetch_error() {
    let mut server = Server::new_async().await;
    let mock = mock_aspects(&mut server, "181732", 200, "{not json").await;
    let client = client_for(&server, Some(TEST_TOKEN));

    let err = client.fetch_item_aspects("181732").await.unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, AspectError::SchemaFetch { .. }));
    assert!(err.to_string().contains("malformed"));
}

#[tokio::test]
async fn test_missing_token_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let client = client_for(&server, Some("   "));

    let err = client.fetch_item_aspects("181732").await.unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, AspectError::SchemaFetch { status: None, .. }));
}

#[tokio::test]
async fn test_unreachable_provider() {
    let config = TaxonomyConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        ..TaxonomyConfig::default()
    };
    let client = TaxonomyClient::new(
        &config,
        Arc::new(StaticTokenProvider::new(Some(TEST_TOKEN.to_string()))),
    )
    .unwrap();

    let err = client.fetch_item_aspects("181732").await.unwrap_err();
    assert!(matches!(err, AspectError::SchemaFetch { status: None, .. }));
}
