use axum::http::StatusCode;
use sea_orm::ConnectionTrait;
use serde_json::json;
use std::collections::HashSet;

mod common;
use common::{
    brands, get, seed_category, seed_vehicle, setup_test_app, setup_test_db, vehicle_payload,
    with_fields,
};

#[tokio::test]
async fn test_default_listing_shows_only_visible_available_vehicles() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_vehicle(&db, vehicle_payload("Opel", "Corsa", 2018, 7500.0)).await;
    seed_vehicle(
        &db,
        with_fields(vehicle_payload("Seat", "Ibiza", 2016, 6200.0), json!({"status": "SOLD"})),
    )
    .await;
    seed_vehicle(
        &db,
        with_fields(vehicle_payload("Ford", "Focus", 2019, 9800.0), json!({"isVisible": false})),
    )
    .await;
    let app = setup_test_app(db);

    let (status, page) = get(&app, "/api/vehicles").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(brands(&page), vec!["Opel"]);
    assert_eq!(page["pagination"]["total"], 1);
}

#[tokio::test]
async fn test_brand_filter_single_match() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_vehicle(&db, vehicle_payload("Opel", "Corsa", 2018, 7500.0)).await;
    seed_vehicle(&db, vehicle_payload("Renault", "Clio", 2017, 6900.0)).await;
    let app = setup_test_app(db);

    let (status, page) = get(&app, "/api/vehicles?brand=opel&page=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
    assert_eq!(
        page["pagination"],
        json!({"page": 1, "limit": 12, "total": 1, "totalPages": 1})
    );
}

#[tokio::test]
async fn test_search_matches_model_and_description() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_vehicle(&db, vehicle_payload("Opel", "Corsa", 2018, 7500.0)).await;
    seed_vehicle(
        &db,
        with_fields(
            vehicle_payload("Peugeot", "208", 2020, 11500.0),
            json!({"description": "Same platform as the new Corsa, one owner"}),
        ),
    )
    .await;
    seed_vehicle(&db, vehicle_payload("Kia", "Ceed", 2019, 10400.0)).await;
    let app = setup_test_app(db);

    let (_, page) = get(&app, "/api/vehicles?search=CORSA").await;
    let found: HashSet<String> = brands(&page).into_iter().collect();
    assert_eq!(found, HashSet::from(["Opel".to_string(), "Peugeot".to_string()]));
}

#[tokio::test]
async fn test_search_wildcards_match_literally() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_vehicle(&db, vehicle_payload("Opel", "Corsa", 2018, 7500.0)).await;
    let app = setup_test_app(db);

    let uri = format!(
        "/api/vehicles?search={}",
        url_escape::encode_component("%")
    );
    let (status, page) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["pagination"]["total"], 0);
}

#[tokio::test]
async fn test_accented_brand_matches_itself() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_vehicle(&db, vehicle_payload("Citroën", "C3", 2019, 9400.0)).await;
    seed_vehicle(&db, vehicle_payload("Citroen", "Berlingo", 2016, 7900.0)).await;
    let app = setup_test_app(db);

    for query in ["brand=Citroën", "brand=citroën", "search=citroën"] {
        let (key, value) = query.split_once('=').unwrap();
        let uri = format!(
            "/api/vehicles?{key}={}",
            url_escape::encode_component(value)
        );
        let (status, page) = get(&app, &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(brands(&page), vec!["Citroën"], "query {query}");
    }

    let (_, page) = get(&app, "/api/vehicles?brand=citro").await;
    assert_eq!(page["pagination"]["total"], 2);
}

#[tokio::test]
async fn test_price_range_is_inclusive() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_vehicle(&db, vehicle_payload("Fiat", "Panda", 2015, 4999.0)).await;
    seed_vehicle(&db, vehicle_payload("Opel", "Corsa", 2018, 5000.0)).await;
    seed_vehicle(&db, vehicle_payload("Seat", "Leon", 2019, 10000.0)).await;
    seed_vehicle(&db, vehicle_payload("Audi", "A3", 2020, 10001.0)).await;
    let app = setup_test_app(db);

    let (_, page) = get(&app, "/api/vehicles?minPrice=5000&maxPrice=10000").await;
    let found: HashSet<String> = brands(&page).into_iter().collect();
    assert_eq!(found, HashSet::from(["Opel".to_string(), "Seat".to_string()]));
}

#[tokio::test]
async fn test_inverted_year_range_matches_nothing() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_vehicle(&db, vehicle_payload("Opel", "Corsa", 2008, 3500.0)).await;
    let app = setup_test_app(db);

    let (status, page) = get(&app, "/api/vehicles?minYear=2010&maxYear=2005").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["data"], json!([]));
    assert_eq!(page["pagination"]["total"], 0);
    assert_eq!(page["pagination"]["totalPages"], 0);
}

#[tokio::test]
async fn test_page_past_the_end_is_empty_with_real_totals() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    for (index, model) in ["A1", "A3", "A4", "A5", "A6", "Q3"].iter().enumerate() {
        let year = 2014 + i32::try_from(index).unwrap();
        seed_vehicle(&db, vehicle_payload("Audi", model, year, 15000.0)).await;
    }
    let app = setup_test_app(db);

    let (status, page) = get(&app, "/api/vehicles?page=999&limit=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["data"], json!([]));
    assert_eq!(page["pagination"]["page"], 999);
    assert_eq!(page["pagination"]["total"], 6);
    assert_eq!(page["pagination"]["totalPages"], 2);
}

#[tokio::test]
async fn test_pages_do_not_overlap() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    for year in 2010..2017 {
        seed_vehicle(&db, vehicle_payload("Toyota", "Yaris", year, 8000.0)).await;
    }
    let app = setup_test_app(db);

    let mut seen = HashSet::new();
    for page_number in 1..=3 {
        let (_, page) = get(&app, &format!("/api/vehicles?limit=3&page={page_number}")).await;
        for item in page["data"].as_array().unwrap() {
            assert!(
                seen.insert(item["id"].as_str().unwrap().to_string()),
                "vehicle listed twice"
            );
        }
    }
    assert_eq!(seen.len(), 7);
}

#[tokio::test]
async fn test_malformed_params_are_ignored() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_vehicle(&db, vehicle_payload("Opel", "Corsa", 2018, 7500.0)).await;
    seed_vehicle(&db, vehicle_payload("Renault", "Clio", 2017, 6900.0)).await;
    let app = setup_test_app(db);

    let (status, page) = get(
        &app,
        "/api/vehicles?minPrice=cheap&maxYear=soon&fuelType=ROCKET&page=-4&limit=zero&featured=maybe",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["pagination"]["total"], 2);
    assert_eq!(page["pagination"]["page"], 1);
    assert_eq!(page["pagination"]["limit"], 12);
}

#[tokio::test]
async fn test_repeated_query_keys_keep_last_value() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_vehicle(&db, vehicle_payload("Fiat", "Panda", 2015, 500.0)).await;
    seed_vehicle(&db, vehicle_payload("Opel", "Corsa", 2018, 7500.0)).await;
    let app = setup_test_app(db);

    let (status, page) = get(&app, "/api/vehicles?minPrice=abc&minPrice=1000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(brands(&page), vec!["Opel"]);

    let (status, page) = get(&app, "/api/vehicles?minPrice=1000&minPrice=abc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["pagination"]["total"], 2);

    let (status, page) = get(&app, "/api/vehicles?brand=opel&brand=fiat").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(brands(&page), vec!["Fiat"]);
}

#[tokio::test]
async fn test_limit_is_capped() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let (_, page) = get(&app, "/api/vehicles?limit=5000").await;
    assert_eq!(page["pagination"]["limit"], 100);
}

#[tokio::test]
async fn test_enum_filters_are_case_insensitive() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_vehicle(
        &db,
        with_fields(
            vehicle_payload("Tesla", "Model 3", 2021, 32000.0),
            json!({"fuelType": "ELECTRIC", "transmission": "AUTOMATIC", "bodyType": "SEDAN"}),
        ),
    )
    .await;
    seed_vehicle(
        &db,
        with_fields(
            vehicle_payload("Opel", "Astra", 2017, 8900.0),
            json!({"fuelType": "DIESEL", "transmission": "MANUAL", "bodyType": "HATCHBACK"}),
        ),
    )
    .await;
    let app = setup_test_app(db);

    let (_, page) = get(&app, "/api/vehicles?fuelType=electric").await;
    assert_eq!(brands(&page), vec!["Tesla"]);

    let (_, page) = get(&app, "/api/vehicles?transmission=Manual&bodyType=hatchback").await;
    assert_eq!(brands(&page), vec!["Opel"]);
}

#[tokio::test]
async fn test_featured_vehicles_come_first() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_vehicle(
        &db,
        with_fields(vehicle_payload("Mazda", "MX-5", 2015, 14000.0), json!({"isFeatured": true})),
    )
    .await;
    seed_vehicle(&db, vehicle_payload("Honda", "Civic", 2019, 13500.0)).await;
    let app = setup_test_app(db);

    let (_, page) = get(&app, "/api/vehicles").await;
    assert_eq!(brands(&page), vec!["Mazda", "Honda"]);

    let (_, page) = get(&app, "/api/vehicles?featured=TRUE").await;
    assert_eq!(brands(&page), vec!["Mazda"]);
}

#[tokio::test]
async fn test_public_status_filter() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_vehicle(&db, vehicle_payload("Opel", "Corsa", 2018, 7500.0)).await;
    seed_vehicle(
        &db,
        with_fields(vehicle_payload("Seat", "Ibiza", 2016, 6200.0), json!({"status": "RESERVED"})),
    )
    .await;
    let app = setup_test_app(db);

    let (_, page) = get(&app, "/api/vehicles?status=reserved").await;
    assert_eq!(brands(&page), vec!["Seat"]);

    // The public catalog cannot lift the status restriction
    let (_, page) = get(&app, "/api/vehicles?status=ALL").await;
    assert_eq!(brands(&page), vec!["Opel"]);
}

#[tokio::test]
async fn test_category_filter() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let suvs = seed_category(&db, "SUVs").await;
    seed_vehicle(
        &db,
        with_fields(
            vehicle_payload("Dacia", "Duster", 2020, 12900.0),
            json!({"categoryId": suvs.id}),
        ),
    )
    .await;
    seed_vehicle(&db, vehicle_payload("Opel", "Corsa", 2018, 7500.0)).await;
    let app = setup_test_app(db);

    let (_, page) = get(&app, &format!("/api/vehicles?categoryId={}", suvs.id)).await;
    assert_eq!(brands(&page), vec!["Dacia"]);
    assert_eq!(page["data"][0]["category"]["slug"], "suvs");

    let (status, page) = get(&app, "/api/vehicles?categoryId=not-a-uuid").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["pagination"]["total"], 0);
}

#[tokio::test]
async fn test_listing_carries_primary_image() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_vehicle(
        &db,
        with_fields(
            vehicle_payload("Opel", "Corsa", 2018, 7500.0),
            json!({"images": ["https://cdn.example.com/front.jpg", "https://cdn.example.com/back.jpg"]}),
        ),
    )
    .await;
    let app = setup_test_app(db);

    let (_, page) = get(&app, "/api/vehicles").await;
    let image = &page["data"][0]["primaryImage"];
    assert_eq!(image["url"], "https://cdn.example.com/front.jpg");
    assert_eq!(image["altText"], "Opel Corsa - Image 1");
}

#[tokio::test]
async fn test_storage_failure_is_reported_as_unavailable() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    for table in ["inquiries", "vehicle_images", "vehicles"] {
        db.execute_unprepared(&format!("DROP TABLE {table}"))
            .await
            .expect("Failed to drop table");
    }
    let app = setup_test_app(db);

    let (status, body) = get(&app, "/api/vehicles?brand=opel").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "catalog_unavailable");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_brands_lists_distinct_public_brands() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_vehicle(&db, vehicle_payload("Opel", "Corsa", 2018, 7500.0)).await;
    seed_vehicle(&db, vehicle_payload("Opel", "Astra", 2017, 8900.0)).await;
    seed_vehicle(&db, vehicle_payload("Audi", "A3", 2020, 19000.0)).await;
    seed_vehicle(
        &db,
        with_fields(vehicle_payload("Volvo", "V40", 2016, 11000.0), json!({"isVisible": false})),
    )
    .await;
    let app = setup_test_app(db);

    let (status, body) = get(&app, "/api/vehicles/brands").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Audi", "Opel"]));
}

#[tokio::test]
async fn test_vehicle_page_by_slug() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_vehicle(
        &db,
        with_fields(
            vehicle_payload("Opel", "Corsa", 2018, 7500.0),
            json!({"images": ["https://cdn.example.com/corsa.jpg"], "features": ["Air conditioning"]}),
        ),
    )
    .await;
    seed_vehicle(&db, vehicle_payload("Opel", "Astra", 2017, 8900.0)).await;
    seed_vehicle(&db, vehicle_payload("Audi", "A3", 2020, 19000.0)).await;
    let app = setup_test_app(db);

    let (status, body) = get(&app, "/api/vehicles/slug/opel-corsa-2018").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "Corsa");
    assert_eq!(body["features"], json!(["Air conditioning"]));
    assert_eq!(body["images"].as_array().unwrap().len(), 1);
    let similar: Vec<&str> = body["similar"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["model"].as_str().unwrap())
        .collect();
    assert_eq!(similar, vec!["Astra"]);
}

#[tokio::test]
async fn test_hidden_vehicle_page_is_not_found() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_vehicle(
        &db,
        with_fields(vehicle_payload("Ford", "Focus", 2019, 9800.0), json!({"isVisible": false})),
    )
    .await;
    let app = setup_test_app(db);

    let (status, _) = get(&app, "/api/vehicles/slug/ford-focus-2019").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(&app, "/api/vehicles/slug/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_categories_with_counts() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let suvs = seed_category(&db, "SUVs").await;
    seed_category(&db, "Convertibles").await;
    seed_vehicle(
        &db,
        with_fields(
            vehicle_payload("Dacia", "Duster", 2020, 12900.0),
            json!({"categoryId": suvs.id}),
        ),
    )
    .await;
    let app = setup_test_app(db);

    let (status, body) = get(&app, "/api/categories").await;
    assert_eq!(status, StatusCode::OK);
    let counts: Vec<(String, u64)> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| {
            (
                c["slug"].as_str().unwrap().to_string(),
                c["vehicleCount"].as_u64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        counts,
        vec![("convertibles".to_string(), 0), ("suvs".to_string(), 1)]
    );
}

#[tokio::test]
async fn test_health() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let (status, body) = get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "up");
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let (status, doc) = get(&app, "/api/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    let paths = doc["paths"].as_object().expect("paths object");
    for path in [
        "/api/vehicles",
        "/api/vehicles/slug/{slug}",
        "/api/admin/vehicles/{id}",
        "/api/admin/inquiries/{id}",
    ] {
        assert!(paths.contains_key(path), "missing {path}");
    }
    assert!(doc["components"]["securitySchemes"]["bearer"].is_object());
}
