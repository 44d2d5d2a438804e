//! Tests for the offer MCP tools

use std::sync::Arc;

use rmcp::handler::server::wrapper::Parameters;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::credentials::MemoryStore;
use crate::mcp::tools::{GetListingFeesParams, ManageOfferParams, OfferAction, OfferTools};
use crate::test_support::{
    TOKEN_PATH, executor_for, is_tool_error, seller_store, settings_for, tool_text,
};

const OFFER_PATH: &str = "/sell/inventory/v1/offer";

fn offer_tools(server: &MockServer, store: Arc<MemoryStore>) -> OfferTools<MemoryStore> {
    OfferTools::new(
        Arc::new(executor_for(server, store)),
        Arc::new(settings_for(server)),
    )
}

fn manage(
    sku: &str,
    action: OfferAction,
    offer_data: Option<Value>,
) -> Parameters<ManageOfferParams> {
    Parameters(ManageOfferParams {
        sku: sku.to_string(),
        action,
        offer_data,
    })
}

fn existing_offer() -> Value {
    json!({
        "offerId": "5001",
        "sku": "TEST-1",
        "marketplaceId": "EBAY_GB",
        "format": "FIXED_PRICE",
        "categoryId": "12345",
        "availableQuantity": 1,
        "merchantLocationKey": "warehouse-1",
        "pricingSummary": {"price": {"value": "20.00", "currency": "GBP"}},
        "listingPolicies": {"paymentPolicyId": "pay-1", "returnPolicyId": "ret-1", "fulfillmentPolicyId": "ful-1"}
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn test_modify_sends_merged_offer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(OFFER_PATH))
        .and(query_param("sku", "TEST-1"))
        .and(query_param("marketplace_id", "EBAY_GB"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"offers": [existing_offer()]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("{OFFER_PATH}/5001")))
        .and(body_partial_json(json!({"availableQuantity": 5, "categoryId": "12345"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let tools = offer_tools(&server, seller_store("token"));
    let result = tools
        .manage_offer(manage(
            "TEST-1",
            OfferAction::Modify,
            Some(json!({"availableQuantity": 5})),
        ))
        .await
        .unwrap();

    assert!(!is_tool_error(&result), "{}", tool_text(&result));
    let body: Value = serde_json::from_str(tool_text(&result)).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["action"], "modify");
    assert_eq!(body["offer_id"], "5001");
    // The mock keeps serving the old quantity, so verification flags it
    assert_eq!(body["discrepancies"][0]["field"], "availableQuantity");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_unknown_sku_returns_ebay_404() {
    let server = MockServer::start().await;
    let ebay_body = r#"{"errors":[{"errorId":25713,"domain":"API_INVENTORY","message":"This Offer is not available."}]}"#;
    Mock::given(method("GET"))
        .and(path(OFFER_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string(ebay_body))
        .mount(&server)
        .await;

    let tools = offer_tools(&server, seller_store("token"));
    let result = tools
        .manage_offer(manage("X", OfferAction::Get, None))
        .await
        .unwrap();

    assert!(is_tool_error(&result));
    let text = tool_text(&result);
    assert!(text.starts_with("manage_offer(get) failed"), "{text}");
    assert!(text.contains("HTTP 404"));
    assert!(text.contains("errorId\":25713"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stale_token_is_refreshed_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(OFFER_PATH))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(OFFER_PATH))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"offers": [existing_offer()]})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;

    let tools = offer_tools(&server, seller_store("stale"));
    let result = tools
        .manage_offer(manage("TEST-1", OfferAction::Get, None))
        .await
        .unwrap();

    assert!(!is_tool_error(&result), "{}", tool_text(&result));
    assert!(tool_text(&result).contains("\"categoryId\": \"12345\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_refresh_asks_for_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(OFFER_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})))
        .expect(1)
        .mount(&server)
        .await;

    let tools = offer_tools(&server, seller_store("stale"));
    let result = tools
        .manage_offer(manage("TEST-1", OfferAction::Publish, None))
        .await
        .unwrap();

    assert!(is_tool_error(&result));
    assert!(tool_text(&result).contains("trigger_ebay_login"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_input_never_reaches_ebay() {
    let server = MockServer::start().await;
    let tools = offer_tools(&server, seller_store("token"));

    let cases = [
        manage("", OfferAction::Get, None),
        manage(&"S".repeat(51), OfferAction::Get, None),
        manage("TEST-1", OfferAction::Modify, None),
        manage("TEST-1", OfferAction::Modify, Some(json!({}))),
        manage(
            "TEST-1",
            OfferAction::Get,
            Some(json!({"availableQuantity": 1})),
        ),
        manage("TEST-1", OfferAction::Modify, Some(json!({"lotSize": 0}))),
        manage(
            "TEST-1",
            OfferAction::Modify,
            Some(json!({"availableQuantity": -1})),
        ),
        manage(
            "TEST-1",
            OfferAction::Modify,
            Some(json!({"storeCategoryNames": ["/a", "/b", "/c"]})),
        ),
        manage(
            "TEST-1",
            OfferAction::Create,
            Some(json!({"merchantLocationKey": "k".repeat(37)})),
        ),
    ];

    for params in cases {
        let result = tools.manage_offer(params).await.unwrap();
        assert!(is_tool_error(&result));
        assert!(
            tool_text(&result).contains("Nothing was sent to eBay"),
            "{}",
            tool_text(&result)
        );
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_offer_data_may_be_a_json_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(OFFER_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"offers": [existing_offer()]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("{OFFER_PATH}/5001")))
        .and(body_partial_json(json!({"lotSize": 2})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let tools = offer_tools(&server, seller_store("token"));
    let result = tools
        .manage_offer(manage(
            "TEST-1",
            OfferAction::Modify,
            Some(json!(r#"{"lotSize": 2}"#)),
        ))
        .await
        .unwrap();
    assert!(!is_tool_error(&result), "{}", tool_text(&result));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_uses_configured_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(OFFER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 0, "offers": []})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(OFFER_PATH))
        .and(body_partial_json(json!({
            "sku": "NEW-1",
            "marketplaceId": "EBAY_GB",
            "format": "FIXED_PRICE",
            "listingDuration": "GTC",
            "merchantLocationKey": "warehouse-1",
            "listingPolicies": {
                "paymentPolicyId": "pay-1",
                "returnPolicyId": "ret-1",
                "fulfillmentPolicyId": "ful-1"
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"offerId": "6001"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(OFFER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"offers": [{
            "offerId": "6001",
            "sku": "NEW-1",
            "categoryId": "29792",
            "availableQuantity": 3,
            "pricingSummary": {"price": {"value": "7.5", "currency": "GBP"}}
        }]})))
        .mount(&server)
        .await;

    let tools = offer_tools(&server, seller_store("token"));
    let result = tools
        .manage_offer(manage(
            "NEW-1",
            OfferAction::Create,
            Some(json!({
                "categoryId": "29792",
                "availableQuantity": 3,
                "pricingSummary": {"price": {"value": "7.50", "currency": "GBP"}}
            })),
        ))
        .await
        .unwrap();

    assert!(!is_tool_error(&result), "{}", tool_text(&result));
    let body: Value = serde_json::from_str(tool_text(&result)).unwrap();
    assert_eq!(body["offer_id"], "6001");
    assert!(body.get("discrepancies").is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_listing_fees() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{OFFER_PATH}/get_listing_fees")))
        .and(body_partial_json(json!({"offers": [{"offerId": "1"}, {"offerId": "2"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"feeSummaries": []})))
        .expect(1)
        .mount(&server)
        .await;

    let tools = offer_tools(&server, seller_store("token"));
    let result = tools
        .get_listing_fees(Parameters(GetListingFeesParams {
            offer_ids: vec!["1".to_string(), "2".to_string()],
        }))
        .await
        .unwrap();
    assert!(!is_tool_error(&result));

    let too_many = tools
        .get_listing_fees(Parameters(GetListingFeesParams {
            offer_ids: (0..251).map(|i| i.to_string()).collect(),
        }))
        .await
        .unwrap();
    assert!(is_tool_error(&too_many));

    let none = tools
        .get_listing_fees(Parameters(GetListingFeesParams { offer_ids: vec![] }))
        .await
        .unwrap();
    assert!(is_tool_error(&none));
}
