//! HTTP API tests
//!
//! Drive the full router in-process with axum-test.

use axum::http::StatusCode;
use axum_test::TestServer;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use interface_api::{config::ApiConfig, create_router};
use test_utils::SettlementFixtures;

const SETTLEMENTS: &str = "/api/v1/settlements";

fn server() -> TestServer {
    TestServer::new(create_router(ApiConfig::default())).expect("test server should start")
}

fn strict_server() -> TestServer {
    let config = ApiConfig {
        strict_validation: true,
        ..ApiConfig::default()
    };
    TestServer::new(create_router(config)).expect("test server should start")
}

fn amount(value: &Value) -> Decimal {
    value
        .to_string()
        .parse()
        .unwrap_or_else(|_| panic!("{value} is not a number"))
}

/// Drops generated identifiers so two breakdowns of the same input compare equal
fn without_ids(mut breakdown: Value) -> Value {
    if let Some(object) = breakdown.as_object_mut() {
        object.remove("settlementId");
    }
    for category in ["medical", "loans", "liens"] {
        if let Some(items) = breakdown["reductions"][category]["perItem"].as_array_mut() {
            for item in items {
                if let Some(object) = item.as_object_mut() {
                    object.remove("id");
                }
            }
        }
    }
    breakdown
}

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let response = server().get("/health").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }
}

mod calculate_tests {
    use super::*;

    #[tokio::test]
    async fn test_prorata_breakdown() {
        let response = server()
            .post(&format!("{SETTLEMENTS}/calculate"))
            .json(&SettlementFixtures::prorata_pair_json())
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body = response.json::<Value>();
        let results = &body["calculatedResults"];
        assert_eq!(amount(&results["totalDamages"]), dec!(4000));
        assert_eq!(amount(&results["reductionPool"]), dec!(3000));
        assert_eq!(amount(&results["netProceeds"]), dec!(6000));
        assert_eq!(results["feasible"], true);

        let items = &results["reductions"]["medical"]["perItem"];
        assert_eq!(items[0]["name"], "Orthopedics");
        assert_eq!(items[0]["reductionType"], "prorata");
        assert_eq!(amount(&items[0]["reduction"]), dec!(750));
        assert_eq!(amount(&items[0]["finalAmount"]), dec!(2250));
        assert_eq!(amount(&items[1]["reduction"]), dec!(250));
        assert_eq!(amount(&items[1]["finalAmount"]), dec!(750));
        assert_eq!(amount(&results["reductions"]["medical"]["total"]), dec!(1000));
        assert_eq!(amount(&results["reductions"]["medical"]["totalFinal"]), dec!(3000));
        assert_eq!(body["warnings"], json!([]));
    }

    #[tokio::test]
    async fn test_percentage_breakdown() {
        let response = server()
            .post(&format!("{SETTLEMENTS}/calculate"))
            .json(&SettlementFixtures::percentage_only_json())
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let results = &response.json::<Value>()["calculatedResults"];
        assert_eq!(amount(&results["attorneyFeeAmount"]), dec!(3300));
        assert_eq!(amount(&results["reductions"]["medical"]["totalFinal"]), dec!(800));
        assert_eq!(amount(&results["reductions"]["loans"]["totalFinal"]), dec!(500));
        assert_eq!(amount(&results["reductions"]["liens"]["totalFinal"]), dec!(200));
        assert_eq!(results["reductions"]["liens"]["perItem"][0]["type"], "health");
        assert_eq!(amount(&results["netProceeds"]), dec!(4950));
    }

    #[tokio::test]
    async fn test_infeasible_settlement_is_reported() {
        let response = server()
            .post(&format!("{SETTLEMENTS}/calculate"))
            .json(&SettlementFixtures::infeasible_json())
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let results = &response.json::<Value>()["calculatedResults"];
        assert_eq!(amount(&results["netProceeds"]), dec!(-4300));
        assert_eq!(results["feasible"], false);
    }

    #[tokio::test]
    async fn test_category_defaults_fill_unset_policies() {
        let response = server()
            .post(&format!("{SETTLEMENTS}/calculate"))
            .json(&json!({
                "totalSettlementAmount": 5000,
                "caseExpenses": 0,
                "attorneyFees": { "type": "specific", "amount": 0 },
                "medicalPayment": 0,
                "preSettlementLoans": [{ "provider": "Funder", "amount": 1000 }],
                "reductions": { "loans": { "type": "percentage", "value": 25 } }
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let item = &response.json::<Value>()["calculatedResults"]["reductions"]["loans"]["perItem"][0];
        assert_eq!(amount(&item["reduction"]), dec!(250));
        assert_eq!(amount(&item["finalAmount"]), dec!(750));
    }

    #[tokio::test]
    async fn test_preview_matches_saved_breakdown() {
        let server = server();
        let preview = server
            .post(&format!("{SETTLEMENTS}/calculate"))
            .json(&SettlementFixtures::percentage_only_json())
            .await
            .json::<Value>();
        let saved = server
            .post(SETTLEMENTS)
            .json(&SettlementFixtures::percentage_only_json())
            .await
            .json::<Value>();

        assert_eq!(
            without_ids(preview["calculatedResults"].clone()),
            without_ids(saved["calculatedResults"].clone())
        );
    }
}

mod validation_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_gross_is_unprocessable() {
        let mut body = SettlementFixtures::prorata_pair_json();
        body.as_object_mut()
            .expect("fixture is an object")
            .remove("totalSettlementAmount");

        let response = server().post(&format!("{SETTLEMENTS}/calculate")).json(&body).await;
        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let error = response.json::<Value>();
        assert_eq!(error["error"], "validation_error");
        let message = error["message"].as_str().unwrap_or_default();
        assert!(message.contains("invalid settlement structure"), "{message}");
        assert!(message.contains("total_settlement_amount"), "{message}");
    }

    #[tokio::test]
    async fn test_missing_item_amount_is_unprocessable() {
        let response = server()
            .post(SETTLEMENTS)
            .json(&json!({
                "totalSettlementAmount": 5000,
                "caseExpenses": 0,
                "attorneyFees": { "type": "specific", "amount": 0 },
                "medicalPayment": 0,
                "medicalProviders": [{ "name": "Clinic" }]
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_unknown_reduction_type_is_unprocessable() {
        let response = server()
            .post(&format!("{SETTLEMENTS}/calculate"))
            .json(&json!({
                "totalSettlementAmount": 5000,
                "caseExpenses": 0,
                "attorneyFees": { "type": "specific", "amount": 0 },
                "medicalPayment": 0,
                "medicalProviders": [{ "name": "Clinic", "billedAmount": 100, "reductionType": "half" }]
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_out_of_range_percentage_warns_by_default() {
        let body = json!({
            "totalSettlementAmount": 5000,
            "caseExpenses": 0,
            "attorneyFees": { "type": "specific", "amount": 0 },
            "medicalPayment": 0,
            "medicalProviders": [
                { "name": "Clinic", "billedAmount": 1000, "reductionType": "percentage", "reductionValue": 150 }
            ]
        });

        let response = server().post(&format!("{SETTLEMENTS}/calculate")).json(&body).await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let result = response.json::<Value>();
        assert_eq!(result["warnings"].as_array().map(Vec::len), Some(1));
        let item = &result["calculatedResults"]["reductions"]["medical"]["perItem"][0];
        assert_eq!(amount(&item["finalAmount"]), dec!(-500));
    }

    #[tokio::test]
    async fn test_out_of_range_percentage_rejected_in_strict_mode() {
        let body = json!({
            "totalSettlementAmount": 5000,
            "caseExpenses": 0,
            "attorneyFees": { "type": "percentage", "amount": 120 },
            "medicalPayment": 0
        });

        let response = strict_server().post(&format!("{SETTLEMENTS}/calculate")).json(&body).await;
        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_amounts_beyond_the_cap_are_unprocessable() {
        let body = json!({
            "totalSettlementAmount": 5e28,
            "caseExpenses": 0,
            "attorneyFees": { "type": "specific", "amount": 0 },
            "medicalPayment": 5e28
        });

        let response = server().post(&format!("{SETTLEMENTS}/calculate")).json(&body).await;
        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        let message = response.json::<Value>()["message"].as_str().unwrap_or_default().to_string();
        assert!(message.contains("total_settlement_amount"), "{message}");
    }

    #[tokio::test]
    async fn test_huge_percentage_item_is_unprocessable_not_a_crash() {
        let body = json!({
            "totalSettlementAmount": 9000,
            "caseExpenses": 0,
            "attorneyFees": { "type": "specific", "amount": 0 },
            "medicalPayment": 0,
            "medicalProviders": [
                { "name": "Clinic", "billedAmount": 1e20, "reductionType": "percentage", "reductionValue": 1e12 }
            ]
        });

        let server = server();
        let response = server.post(SETTLEMENTS).json(&body).await;
        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let listed = server.get(SETTLEMENTS).await;
        assert_eq!(listed.json::<Value>().as_array().map(Vec::len), Some(0));
    }
}

mod crud_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_get() {
        let server = server();
        let created = server.post(SETTLEMENTS).json(&SettlementFixtures::prorata_pair_json()).await;
        assert_eq!(created.status_code(), StatusCode::CREATED);

        let created = created.json::<Value>();
        let id = created["id"].as_str().expect("id is a string").to_string();
        assert!(id.starts_with("STL-"));
        assert_eq!(created["medicalProviders"][0]["name"], "Orthopedics");
        assert_eq!(created["currency"], "USD");

        let fetched = server.get(&format!("{SETTLEMENTS}/{id}")).await;
        assert_eq!(fetched.status_code(), StatusCode::OK);
        let fetched = fetched.json::<Value>();
        assert_eq!(fetched["calculatedResults"], created["calculatedResults"]);
        assert_eq!(fetched["calculatedResults"]["settlementId"], id.as_str());
    }

    #[tokio::test]
    async fn test_update_recalculates() {
        let server = server();
        let created = server
            .post(SETTLEMENTS)
            .json(&SettlementFixtures::prorata_pair_json())
            .await
            .json::<Value>();
        let id = created["id"].as_str().expect("id is a string").to_string();

        let mut changed = SettlementFixtures::prorata_pair_json();
        changed["totalSettlementAmount"] = json!(6000);

        let updated = server.put(&format!("{SETTLEMENTS}/{id}")).json(&changed).await;
        assert_eq!(updated.status_code(), StatusCode::OK);

        let updated = updated.json::<Value>();
        assert_eq!(updated["id"], created["id"]);
        assert_eq!(updated["createdAt"], created["createdAt"]);
        assert_eq!(amount(&updated["totalSettlementAmount"]), dec!(6000));
        assert_eq!(amount(&updated["calculatedResults"]["reductionPool"]), dec!(2000));
        // Finals of the pool members sum to the pool: 1500 + 500
        assert_eq!(amount(&updated["calculatedResults"]["netProceeds"]), dec!(4000));

        let fetched = server.get(&format!("{SETTLEMENTS}/{id}")).await.json::<Value>();
        assert_eq!(fetched["calculatedResults"], updated["calculatedResults"]);
    }

    #[tokio::test]
    async fn test_partial_update_is_unprocessable() {
        let server = server();
        let created = server
            .post(SETTLEMENTS)
            .json(&SettlementFixtures::prorata_pair_json())
            .await
            .json::<Value>();
        let id = created["id"].as_str().expect("id is a string").to_string();

        let response = server
            .put(&format!("{SETTLEMENTS}/{id}"))
            .json(&json!({ "caseExpenses": 250 }))
            .await;
        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let fetched = server.get(&format!("{SETTLEMENTS}/{id}")).await.json::<Value>();
        assert_eq!(fetched["calculatedResults"], created["calculatedResults"]);
        assert_eq!(amount(&fetched["caseExpenses"]), amount(&created["caseExpenses"]));
    }

    #[tokio::test]
    async fn test_update_keeps_line_item_ids() {
        let server = server();
        let created = server
            .post(SETTLEMENTS)
            .json(&SettlementFixtures::prorata_pair_json())
            .await
            .json::<Value>();
        let id = created["id"].as_str().expect("id is a string").to_string();
        let item_id = created["medicalProviders"][0]["id"].clone();

        let mut changed = SettlementFixtures::prorata_pair_json();
        changed["medicalProviders"][0]["id"] = item_id.clone();

        let updated = server
            .put(&format!("{SETTLEMENTS}/{id}"))
            .json(&changed)
            .await
            .json::<Value>();
        assert_eq!(updated["medicalProviders"][0]["id"], item_id);
    }

    #[tokio::test]
    async fn test_list_in_creation_order() {
        let server = server();
        server.post(SETTLEMENTS).json(&SettlementFixtures::prorata_pair_json()).await;
        server.post(SETTLEMENTS).json(&SettlementFixtures::infeasible_json()).await;

        let response = server.get(SETTLEMENTS).await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let list = response.json::<Value>();
        let list = list.as_array().expect("list is an array");
        assert_eq!(list.len(), 2);
        assert_eq!(amount(&list[0]["totalSettlementAmount"]), dec!(9000));
        assert_eq!(amount(&list[1]["totalSettlementAmount"]), dec!(1000));
    }

    #[tokio::test]
    async fn test_delete() {
        let server = server();
        let created = server
            .post(SETTLEMENTS)
            .json(&SettlementFixtures::prorata_pair_json())
            .await
            .json::<Value>();
        let id = created["id"].as_str().expect("id is a string").to_string();

        let deleted = server.delete(&format!("{SETTLEMENTS}/{id}")).await;
        assert_eq!(deleted.status_code(), StatusCode::OK);
        assert_eq!(deleted.json::<Value>()["id"], id.as_str());

        let missing = server.get(&format!("{SETTLEMENTS}/{id}")).await;
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_settlement_is_not_found() {
        let server = server();
        let id = "STL-00000000-0000-0000-0000-000000000000";

        let response = server.get(&format!("{SETTLEMENTS}/{id}")).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "not_found");

        let response = server
            .put(&format!("{SETTLEMENTS}/{id}"))
            .json(&SettlementFixtures::prorata_pair_json())
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let response = server().get(&format!("{SETTLEMENTS}/not-an-id")).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }
}
