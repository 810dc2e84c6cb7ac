use actix_web::{test, web, App};
use farm::api::{routes::configure, AppState};
use farm::storage::memory::MemoryStore;

fn build_app() -> actix_web::App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(AppState::new(MemoryStore::default())))
        .configure(configure)
        .app_data(
            web::JsonConfig::default().error_handler(|err, _req| {
                let message = format!("{err}");
                actix_web::error::InternalError::from_response(
                    err,
                    actix_web::HttpResponse::BadRequest()
                        .json(serde_json::json!({ "error": message })),
                )
                .into()
            }),
        )
}

fn find_plot<'a>(body: &'a serde_json::Value, id: &str) -> &'a serde_json::Value {
    body["payload"]["farm"]["plots"]
        .as_array()
        .and_then(|plots| plots.iter().find(|p| p["id"] == id))
        .unwrap_or_else(|| panic!("plot {id} missing from response"))
}

fn assert_full_grid(body: &serde_json::Value) {
    let farm = &body["payload"]["farm"];
    let rows = farm["rows"].as_u64().unwrap();
    let cols = farm["cols"].as_u64().unwrap();
    let plots = farm["plots"].as_array().unwrap();
    assert_eq!(plots.len() as u64, rows * cols, "grid must stay complete");
    let mut cells: Vec<(u64, u64)> = plots
        .iter()
        .map(|p| (p["row"].as_u64().unwrap(), p["col"].as_u64().unwrap()))
        .collect();
    cells.sort_unstable();
    cells.dedup();
    assert_eq!(cells.len() as u64, rows * cols, "no duplicate coordinates");
}

// ---------------------------------------------------------------------------
// Scenario 1: merge a ridge, plant it, then reset the head
// ---------------------------------------------------------------------------
#[actix_web::test]
async fn scenario_merge_plant_reset() {
    let app = test::init_service(build_app()).await;

    // Merge a vertical strip on ridge 6 of the second farm
    let req = test::TestRequest::post()
        .uri("/api/farms/field-yu/merge")
        .set_json(serde_json::json!({ "plotIds": ["yu-2-6", "yu-0-6", "yu-1-6"] }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_full_grid(&body);
    assert_eq!(find_plot(&body, "yu-0-6")["isMergeStart"], true);
    assert_eq!(find_plot(&body, "yu-0-6")["mergeCount"], 3);
    assert_eq!(find_plot(&body, "yu-2-6")["mergedWith"], "yu-0-6");

    // Plant the head: status spreads over the group
    let req = test::TestRequest::put()
        .uri("/api/farms/field-yu/plots/yu-0-6")
        .set_json(serde_json::json!({ "cropId": "potato", "status": "planted" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(find_plot(&body, "yu-0-6")["crop"]["id"], "potato");
    for id in ["yu-1-6", "yu-2-6"] {
        assert_eq!(find_plot(&body, id)["status"], "planted");
        assert!(find_plot(&body, id).get("crop").is_none());
    }

    // Rendered grid shows one shape with the head's crop on every cell
    let req = test::TestRequest::get().uri("/api/farms/field-yu/grid").to_request();
    let grid: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(grid["payload"]["grid"][1][6]["hiddenBorders"]["top"], true);
    assert_eq!(grid["payload"]["grid"][1][6]["hiddenBorders"]["bottom"], true);
    assert_eq!(grid["payload"]["grid"][2][6]["crop"]["id"], "potato");

    // Resetting the head dissolves the group
    let req = test::TestRequest::post()
        .uri("/api/farms/field-yu/reset")
        .set_json(serde_json::json!({ "plotIds": ["yu-0-6"] }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_full_grid(&body);
    let head = find_plot(&body, "yu-0-6");
    assert_eq!(head["isMergeStart"], false);
    assert_eq!(head["status"], "empty");
    assert!(head.get("crop").is_none());
    assert!(head.get("plantedDate").is_none());
    for id in ["yu-1-6", "yu-2-6"] {
        assert!(find_plot(&body, id).get("mergedWith").is_none());
    }
}

// ---------------------------------------------------------------------------
// Scenario 2: unmerge the seeded daikon bed twice
// ---------------------------------------------------------------------------
#[actix_web::test]
async fn scenario_unmerge_is_idempotent() {
    let app = test::init_service(build_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/farms/field-yu/plots/yu-0-3/unmerge")
        .to_request();
    let first: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let head = find_plot(&first, "yu-0-3");
    assert_eq!(head["isMergeStart"], false);
    assert!(head.get("mergeCount").is_none());
    // cultivation state survives the split
    assert_eq!(head["crop"]["id"], "daikon");
    assert_eq!(head["status"], "harvest");
    for id in ["yu-1-3", "yu-2-3"] {
        assert!(find_plot(&first, id).get("mergedWith").is_none());
    }

    let req = test::TestRequest::post()
        .uri("/api/farms/field-yu/plots/yu-0-3/unmerge")
        .to_request();
    let second: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(first["payload"]["farm"], second["payload"]["farm"]);
}

// ---------------------------------------------------------------------------
// Scenario 3: a selection with an island only merges the start component
// ---------------------------------------------------------------------------
#[actix_web::test]
async fn scenario_island_left_out_of_merge() {
    let app = test::init_service(build_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/farms/sfc/merge")
        .set_json(serde_json::json!({ "plotIds": ["3-1", "3-2", "5-8"] }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["payload"]["outcome"]["count"], 2);
    assert_eq!(find_plot(&body, "3-2")["mergedWith"], "3-1");
    assert_eq!(find_plot(&body, "5-8")["isMergeStart"], false);
    assert!(find_plot(&body, "5-8").get("mergedWith").is_none());

    // the other farm is untouched
    let req = test::TestRequest::get().uri("/api/farms/field-yu").to_request();
    let other: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(find_plot(&other, "yu-0-3")["mergeCount"], 3);
}

// ---------------------------------------------------------------------------
// Scenario 4: custom crop lifecycle
// ---------------------------------------------------------------------------
#[actix_web::test]
async fn scenario_custom_crop_planted_then_removed() {
    let app = test::init_service(build_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/crops")
        .set_json(serde_json::json!({ "name": "Okra", "color": "#7CB342" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let created: serde_json::Value = test::read_body_json(resp).await;
    let crop_id = created["payload"]["id"].as_str().unwrap().to_string();
    assert!(crop_id.starts_with("custom_"));
    assert_eq!(created["payload"]["isCustom"], true);

    let req = test::TestRequest::put()
        .uri("/api/farms/sfc/plots/5-5")
        .set_json(serde_json::json!({ "cropId": &crop_id, "status": "planted" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(find_plot(&body, "5-5")["crop"]["name"], "Okra");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/crops/{crop_id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    let req = test::TestRequest::get().uri("/api/crops").to_request();
    let list: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list["payload"]["crops"].as_array().unwrap().len(), 10);

    // the plot keeps its copy of the removed crop
    let req = test::TestRequest::get().uri("/api/farms/sfc").to_request();
    let farm: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(find_plot(&farm, "5-5")["crop"]["name"], "Okra");
}

// ---------------------------------------------------------------------------
// Scenario 5: watering logs feed the grid
// ---------------------------------------------------------------------------
#[actix_web::test]
async fn scenario_watering_shows_on_grid() {
    let app = test::init_service(build_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/farms/sfc/logs")
        .set_json(serde_json::json!({
            "plotId": "0-1",
            "date": "2026-01-10",
            "type": "watering",
            "notes": "Evening watering"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let req = test::TestRequest::get().uri("/api/farms/sfc/grid").to_request();
    let grid: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(grid["payload"]["grid"][0][1]["lastWatering"], "2026-01-10");
    assert_eq!(grid["payload"]["grid"][0][0]["lastWatering"], "2026-01-07");
    assert!(grid["payload"]["grid"][0][2].get("lastWatering").is_none());
}
