//! Integration tests for the SPM threshold engine.
//!
//! This test suite covers:
//! - Equivalence scale
//! - Published and forecast base thresholds
//! - End-to-end thresholds at cost levels, states and custom factors
//! - The comparison grid
//! - JSON data export
//! - Error cases

use std::collections::BTreeMap;
use std::str::FromStr;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

use spm_threshold::api::{AppState, create_router};
use spm_threshold::calculation::{
    base_threshold, compare_thresholds, compute_threshold, equivalence_scale, resolve_geoadj,
};
use spm_threshold::config::{
    ConfigLoader, CostLevelsConfig, ForecastConfig, SpmConfig, StatesConfig, ThresholdRow,
    ThresholdsConfig,
};
use spm_threshold::error::EngineError;
use spm_threshold::export::{SPM_CONFIG_FILE, write_data_files};
use spm_threshold::models::{GeoSelection, Tenure};

// =============================================================================
// Test Helpers
// =============================================================================

fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/spm").expect("Failed to load config")
}

fn create_router_for_test() -> Router {
    create_router(AppState::new(load_config()))
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Normalize decimal string by removing trailing zeros after decimal point
fn normalize_decimal(s: &str) -> String {
    Decimal::from_str(s).unwrap().normalize().to_string()
}

async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn create_request(year: i32, tenure: &str, adults: u32, children: u32, location: Value) -> Value {
    json!({
        "year": year,
        "tenure": tenure,
        "num_adults": adults,
        "num_children": children,
        "location": location
    })
}

fn assert_threshold_approx(result: &Value, expected: &str) {
    let actual = result["threshold"].as_str().unwrap();
    let actual_normalized = normalize_decimal(actual);
    let expected_normalized = normalize_decimal(expected);
    assert_eq!(
        actual_normalized, expected_normalized,
        "Expected threshold {}, got {}",
        expected_normalized, actual_normalized
    );
}

/// A one-year table with a single projected rate, for forecast tests.
fn single_year_config(rates: &[(i32, &str)], default_inflation: &str) -> SpmConfig {
    let mut years = BTreeMap::new();
    years.insert(
        2024,
        ThresholdRow {
            renter: decimal("39430"),
            owner_with_mortgage: decimal("39068"),
            owner_without_mortgage: decimal("32586"),
        },
    );
    let loader = load_config();
    SpmConfig::new(
        ThresholdsConfig {
            source_url: "https://www.bls.gov/pir/spm/spm_thresholds_2024.htm".to_string(),
            years,
        },
        ForecastConfig {
            default_inflation: decimal(default_inflation),
            cpi_projections: rates
                .iter()
                .map(|(year, rate)| (*year, decimal(rate)))
                .collect(),
        },
        CostLevelsConfig {
            cost_levels: loader.config().cost_levels().clone(),
        },
        StatesConfig {
            states: loader.config().states().clone(),
        },
    )
    .unwrap()
}

// =============================================================================
// Equivalence Scale
// =============================================================================

/// The reference family has a scale of exactly one
#[test]
fn test_reference_family_scale_is_one() {
    assert_eq!(equivalence_scale(2, 2), Decimal::ONE);
}

/// An empty household has a scale of zero
#[test]
fn test_empty_household_scale_is_zero() {
    assert_eq!(equivalence_scale(0, 0), Decimal::ZERO);
}

/// Scale never decreases as adults or children are added
#[test]
fn test_scale_is_non_decreasing() {
    for adults in 0..8u32 {
        for children in 0..8u32 {
            if adults == 0 && children == 0 {
                continue;
            }
            let scale = equivalence_scale(adults, children);
            assert!(scale >= Decimal::ZERO);
            assert!(
                equivalence_scale(adults + 1, children) >= scale,
                "adding an adult to ({}, {}) decreased the scale",
                adults,
                children
            );
            assert!(
                equivalence_scale(adults, children + 1) >= scale,
                "adding a child to ({}, {}) decreased the scale",
                adults,
                children
            );
        }
    }
}

// =============================================================================
// Base Thresholds
// =============================================================================

/// Published years return the tabulated figures unchanged
#[test]
fn test_published_years_match_table() {
    let loader = load_config();
    let config = loader.config();

    let expected = [
        (2024, Tenure::Renter, "39430"),
        (2024, Tenure::OwnerWithMortgage, "39068"),
        (2024, Tenure::OwnerWithoutMortgage, "32586"),
        (2023, Tenure::Renter, "36606"),
        (2023, Tenure::OwnerWithMortgage, "36192"),
        (2023, Tenure::OwnerWithoutMortgage, "30347"),
        (2022, Tenure::Renter, "33402"),
        (2022, Tenure::OwnerWithMortgage, "32949"),
        (2022, Tenure::OwnerWithoutMortgage, "27679"),
    ];

    for (year, tenure, amount) in expected {
        assert_eq!(
            base_threshold(year, tenure, config).unwrap(),
            decimal(amount),
            "{} {}",
            year,
            tenure
        );
    }
}

/// One year of projected inflation, rounded to whole dollars
#[test]
fn test_forecast_one_year() {
    let config = single_year_config(&[(2025, "0.025")], "0.020");

    // 39430 x 1.025 = 40415.75
    assert_eq!(
        base_threshold(2025, Tenure::Renter, &config).unwrap(),
        decimal("40416")
    );
}

/// Years past the projection table compound at the default rate
#[test]
fn test_forecast_beyond_projections_uses_default_rate() {
    let config = single_year_config(&[(2025, "0.025")], "0.020");

    // 39430 x 1.025 x 1.02 = 41224.065
    assert_eq!(
        base_threshold(2026, Tenure::Renter, &config).unwrap(),
        decimal("41224")
    );
}

/// Forecasts increase every year for every tenure
#[test]
fn test_forecast_is_strictly_increasing() {
    let loader = load_config();
    let config = loader.config();
    let latest = config.latest_published_year();

    for tenure in Tenure::ALL {
        let mut previous = base_threshold(latest, tenure, config).unwrap();
        for year in (latest + 1)..=(latest + 40) {
            let current = base_threshold(year, tenure, config).unwrap();
            assert!(
                current > previous,
                "{} {} = {} is not above {}",
                year,
                tenure,
                current,
                previous
            );
            previous = current;
        }
    }
}

/// Years before the table are rejected
#[test]
fn test_year_before_table_is_invalid_input() {
    let loader = load_config();
    let result = base_threshold(2021, Tenure::Renter, loader.config());
    assert!(matches!(
        result,
        Err(EngineError::InvalidInput { ref field, .. }) if field == "year"
    ));
}

/// Tenure strings outside the three options are rejected
#[test]
fn test_unknown_tenure_is_invalid_input() {
    let result = Tenure::from_str("council_housing");
    assert!(matches!(
        result,
        Err(EngineError::InvalidInput { ref field, .. }) if field == "tenure"
    ));
}

// =============================================================================
// Thresholds
// =============================================================================

/// Reference family renting at the national average
#[test]
fn test_reference_family_renter_2024() {
    let loader = load_config();
    let threshold =
        compute_threshold(2024, Tenure::Renter, 2, 2, decimal("1.00"), loader.config()).unwrap();
    assert_eq!(threshold, decimal("39430"));
}

/// Single adult owner without mortgage in a low-cost area
#[test]
fn test_single_owner_low_cost_2024() {
    let loader = load_config();
    let threshold = compute_threshold(
        2024,
        Tenure::OwnerWithoutMortgage,
        1,
        0,
        decimal("0.84"),
        loader.config(),
    )
    .unwrap();

    // 32586 / 2.1 x 0.84 = 13034.40
    assert!((threshold - decimal("13034.40")).abs() < decimal("0.01"));
}

/// Empty households get zero regardless of year, tenure or location
#[test]
fn test_empty_household_threshold_is_zero() {
    let loader = load_config();
    for year in [2022, 2024, 2031] {
        for tenure in Tenure::ALL {
            for geoadj in ["0.84", "1.00", "1.27", "3.5"] {
                let threshold =
                    compute_threshold(year, tenure, 0, 0, decimal(geoadj), loader.config())
                        .unwrap();
                assert_eq!(threshold, Decimal::ZERO);
            }
        }
    }
}

/// Unknown state codes are rejected
#[test]
fn test_unknown_state_is_unknown_location() {
    let loader = load_config();
    let result = resolve_geoadj(
        &GeoSelection::State {
            code: "ZZ".to_string(),
        },
        loader.config(),
    );
    assert!(matches!(result, Err(EngineError::UnknownLocation { .. })));
}

/// Presets and states resolve to their tabulated factors
#[test]
fn test_resolve_presets_and_states() {
    let loader = load_config();
    let config = loader.config();

    let cases = [
        ("low_cost", "0.84"),
        ("national_average", "1.00"),
        ("very_high_cost", "1.27"),
        ("DC", "1.25"),
        ("ms", "0.84"),
        ("custom:1.05", "1.05"),
    ];

    for (input, expected) in cases {
        let selection = GeoSelection::from_str(input).unwrap();
        assert_eq!(
            resolve_geoadj(&selection, config).unwrap(),
            decimal(expected),
            "{}",
            input
        );
    }
}

/// Every tenure and cost level for the reference family
#[test]
fn test_comparison_grid_reference_family() {
    let loader = load_config();
    let grid = compare_thresholds(2024, 2, 2, loader.config()).unwrap();

    assert_eq!(grid.locations.len(), 3);
    assert_eq!(
        grid.get(Tenure::OwnerWithMortgage, "High-cost"),
        Some(decimal("46881.60"))
    );
    assert_eq!(
        grid.get(Tenure::OwnerWithoutMortgage, "Low-cost"),
        Some(decimal("27372.24"))
    );
}

// =============================================================================
// HTTP API
// =============================================================================

/// Reference family via the API
#[tokio::test]
async fn test_api_reference_family() {
    let request = create_request(
        2024,
        "renter",
        2,
        2,
        json!({"type": "cost_level", "key": "national_average"}),
    );
    let (status, result) = post_json(create_router_for_test(), "/threshold", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_threshold_approx(&result, "39430");
    assert_eq!(normalize_decimal(result["monthly_threshold"].as_str().unwrap()), "3285.83");
    assert_eq!(result["base_source"], "published");
    let steps = result["audit_trace"]["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 4);
    let base_step = steps.iter().find(|s| s["rule_id"] == "base_threshold").unwrap();
    assert_eq!(
        base_step["output"]["source_url"],
        "https://www.bls.gov/pir/spm/spm_thresholds_2024.htm"
    );
}

/// Custom factors are applied as given
#[tokio::test]
async fn test_api_custom_geoadj() {
    let request = create_request(
        2023,
        "owner_with_mortgage",
        2,
        1,
        json!({"type": "custom", "geoadj": "1.10"}),
    );
    let (status, result) = post_json(create_router_for_test(), "/threshold", request).await;

    assert_eq!(status, StatusCode::OK);
    // 36192 x (1.5 + 0.3) / 2.1 x 1.10 = 34123.8857...
    let threshold = decimal(result["threshold"].as_str().unwrap());
    assert!((threshold - decimal("34123.886")).abs() < decimal("0.001"));
}

/// Forecast years carry the forecast factor and a warning
#[tokio::test]
async fn test_api_forecast_year() {
    let request = create_request(
        2025,
        "renter",
        2,
        2,
        json!({"type": "cost_level", "key": "national_average"}),
    );
    let (status, result) = post_json(create_router_for_test(), "/threshold", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_threshold_approx(&result, "40416");
    assert_eq!(result["base_source"], "forecast");
    assert_eq!(normalize_decimal(result["forecast_factor"].as_str().unwrap()), "1.025");
    let warnings = result["audit_trace"]["warnings"].as_array().unwrap();
    assert!(warnings.iter().any(|w| w["code"] == "FORECAST_BASE_THRESHOLD"));
}

/// Empty household via the API
#[tokio::test]
async fn test_api_empty_household() {
    let request = create_request(2024, "renter", 0, 0, json!({"type": "state", "code": "NY"}));
    let (status, result) = post_json(create_router_for_test(), "/threshold", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_threshold_approx(&result, "0");
    let warnings = result["audit_trace"]["warnings"].as_array().unwrap();
    assert!(warnings.iter().any(|w| w["code"] == "EMPTY_HOUSEHOLD"));
}

/// Unknown cost level returns UNKNOWN_LOCATION
#[tokio::test]
async fn test_api_unknown_cost_level() {
    let request = create_request(
        2024,
        "renter",
        1,
        0,
        json!({"type": "cost_level", "key": "lunar"}),
    );
    let (status, result) = post_json(create_router_for_test(), "/threshold", request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "UNKNOWN_LOCATION");
}

/// Unknown tenure is rejected before calculation
#[tokio::test]
async fn test_api_unknown_tenure() {
    let request = create_request(
        2024,
        "houseboat",
        1,
        0,
        json!({"type": "cost_level", "key": "low_cost"}),
    );
    let (status, result) = post_json(create_router_for_test(), "/threshold", request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "INVALID_INPUT");
}

/// Tenure labels are accepted as well as keys
#[tokio::test]
async fn test_api_tenure_label() {
    let request = create_request(
        2024,
        "Owner without mortgage",
        1,
        0,
        json!({"type": "cost_level", "key": "low_cost"}),
    );
    let (status, result) = post_json(create_router_for_test(), "/threshold", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["household"]["tenure"], "owner_without_mortgage");
    let threshold = decimal(result["threshold"].as_str().unwrap());
    assert!((threshold - decimal("13034.40")).abs() < decimal("0.01"));
}

/// Negative counts cannot be deserialized
#[tokio::test]
async fn test_api_negative_children() {
    let mut request = create_request(
        2024,
        "renter",
        1,
        0,
        json!({"type": "cost_level", "key": "low_cost"}),
    );
    request["num_children"] = json!(-1);
    let (status, _) = post_json(create_router_for_test(), "/threshold", request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// Years before the table return INVALID_INPUT
#[tokio::test]
async fn test_api_year_before_table() {
    let request = create_request(
        2010,
        "renter",
        2,
        2,
        json!({"type": "cost_level", "key": "national_average"}),
    );
    let (status, result) = post_json(create_router_for_test(), "/threshold", request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "INVALID_INPUT");
}

/// Comparison grid via the API
#[tokio::test]
async fn test_api_compare() {
    let (status, result) = post_json(
        create_router_for_test(),
        "/compare",
        json!({"year": 2024, "num_adults": 1, "num_children": 0}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let rows = result["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["tenure"], "renter");
    assert_eq!(rows[0]["thresholds"].as_array().unwrap().len(), 3);
}

// =============================================================================
// Export
// =============================================================================

/// The combined export matches the GET /config document
#[tokio::test]
async fn test_export_matches_config_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let loader = load_config();
    write_data_files(dir.path(), loader.config()).unwrap();
    let exported: Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(SPM_CONFIG_FILE)).unwrap())
            .unwrap();

    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/config")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let served: Value = serde_json::from_slice(&body_bytes).unwrap();

    assert_eq!(exported, served);
    assert_eq!(exported["states"].as_object().unwrap().len(), 51);
    assert_eq!(exported["costLevels"].as_object().unwrap().len(), 6);
}

/// The embedded tables are the same as the files on disk
#[test]
fn test_embedded_tables_match_config_directory() {
    let on_disk = load_config();
    let embedded = ConfigLoader::embedded().unwrap();

    assert_eq!(on_disk.config().thresholds(), embedded.config().thresholds());
    assert_eq!(on_disk.config().states(), embedded.config().states());
    assert_eq!(on_disk.config().cost_levels(), embedded.config().cost_levels());
}
