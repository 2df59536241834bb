mod common;

use serde_json::{json, Value};

#[tokio::test]
async fn never_updated_driver_is_not_found() {
    let app = common::spawn_app().await;

    let response = app.get_location("nobody").await;

    assert_eq!(500, response.status().as_u16());
    assert_eq!(
        json!({ "message": "Driver couldn't be found" }),
        response.json::<Value>().await.unwrap()
    );
}

#[tokio::test]
async fn missing_driver_id_is_not_found() {
    let app = common::spawn_app().await;

    let response = app
        .client
        .get(&format!("{}/getDriverLoc", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(500, response.status().as_u16());
}

#[tokio::test]
async fn drivers_are_tracked_independently() {
    let app = common::spawn_app().await;
    app.update_location("driver-a", "10", "20", "F").await;
    app.update_location("driver-b", "-30", "-40", "B").await;

    let a: Value = app.get_location("driver-a").await.json().await.unwrap();
    let b: Value = app.get_location("driver-b").await.json().await.unwrap();

    assert_eq!(json!({ "latitude": 10.0, "longitude": 20.0 }), a);
    assert_eq!(json!({ "latitude": -30.0, "longitude": -40.0 }), b);
    assert_eq!(2, app.stored_drivers());
}

#[tokio::test]
async fn store_failure_is_reported_as_not_found() {
    let app = common::spawn_app_with_failing_store().await;

    let response = app.get_location("driver-1").await;

    assert_eq!(500, response.status().as_u16());
    assert_eq!(
        json!({ "message": "Driver couldn't be found" }),
        response.json::<Value>().await.unwrap()
    );
}

#[tokio::test]
async fn undecodable_query_is_reported_as_not_found() {
    let app = common::spawn_app().await;

    let response = app
        .client
        .get(&format!("{}/getDriverLoc?userid=a&userid=b", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(500, response.status().as_u16());
    assert_eq!(
        json!({ "message": "Driver couldn't be found" }),
        response.json::<Value>().await.unwrap()
    );
}
