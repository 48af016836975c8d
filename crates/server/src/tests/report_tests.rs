// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    create_and_login, create_operative, create_test_app, login_admin, send, send_raw,
};
use axum::{
    Router,
    http::{StatusCode, header},
    response::Response,
};

#[tokio::test]
async fn test_export_returns_csv_attachment() {
    let app: Router = create_test_app();
    let token: String = login_admin(&app).await;
    let operative_id: String =
        create_operative(&app, &token, "OPERATIVO CARRUSEL", "REGION 1").await;

    let response: Response = send_raw(&app, "GET", "/export.csv", Some(&token), None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let disposition: &str = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("attachment; filename=\"OPERATIVOS_"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let csv: String = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(csv.starts_with('\u{feff}'));
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().contains("\"ID\""));
    assert!(lines.next().unwrap().contains(&operative_id));
    assert!(lines.next().is_none());
}

#[tokio::test]
async fn test_export_rejects_inverted_range() {
    let app: Router = create_test_app();
    let token: String = login_admin(&app).await;

    let (status, body) = send(
        &app,
        "GET",
        "/export.csv?start=2024-03-10&end=2024-03-01",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("end"));
}

#[tokio::test]
async fn test_export_requires_permission() {
    let app: Router = create_test_app();
    let admin_token: String = login_admin(&app).await;
    let token: String =
        create_and_login(&app, &admin_token, "patrullero", "PATRULLERO", Some("REGION 1")).await;

    let (status, _) = send(&app, "GET", "/export.csv", Some(&token), None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_statistics_counts_visible_operatives() {
    let app: Router = create_test_app();
    let token: String = login_admin(&app).await;
    create_operative(&app, &token, "OPERATIVO CARRUSEL", "REGION 1").await;
    create_operative(&app, &token, "OPERATIVO CARRUSEL", "REGION 1").await;
    create_operative(&app, &token, "OPERATIVO ALCOHOLIMETRO", "REGION 3").await;

    let (status, body) = send(
        &app,
        "GET",
        "/statistics?region=TODOS",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["activeRegions"], 2);
    assert_eq!(body["knownRegions"], 5);
    assert_eq!(body["byType"][0]["label"], "CARRUSEL");
    assert_eq!(body["byType"][0]["count"], 2);

    let (_, filtered) = send(
        &app,
        "GET",
        "/statistics?region=REGION%203",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(filtered["total"], 1);
}

#[tokio::test]
async fn test_statistics_rejects_bad_filters() {
    let app: Router = create_test_app();
    let token: String = login_admin(&app).await;

    let (status, body) = send(&app, "GET", "/statistics?month=13", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("month"));

    let (status, body) = send(
        &app,
        "GET",
        "/statistics?shift=NOCTURNO",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("shift"));
}

#[tokio::test]
async fn test_statistics_requires_permission() {
    let app: Router = create_test_app();
    let admin_token: String = login_admin(&app).await;
    let token: String =
        create_and_login(&app, &admin_token, "patrullero", "PATRULLERO", Some("REGION 1")).await;

    let (status, _) = send(&app, "GET", "/statistics", Some(&token), None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}
