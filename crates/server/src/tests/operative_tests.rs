// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    create_and_login, create_operative, create_test_app, login_admin, operative_draft, send,
};
use axum::{Router, http::StatusCode};
use serde_json::{Value, json};

fn meeting_report() -> Value {
    json!({
        "result": "DISUACION",
        "reunionDetails": {
            "representativeName": "María López",
            "phone": "5551234567",
            "participantCount": 25,
            "petitions": "Más patrullaje"
        }
    })
}

#[tokio::test]
async fn test_create_operative_then_read_detail() {
    let app: Router = create_test_app();
    let token: String = login_admin(&app).await;

    let operative_id: String =
        create_operative(&app, &token, "Operativo Carrusel", "REGION 1").await;
    assert!(operative_id.starts_with("OP"));

    let (status, body) = send(
        &app,
        "GET",
        &format!("/operatives/{operative_id}"),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "OPERATIVO CARRUSEL");
    assert_eq!(body["status"], "ACTIVO");
    assert_eq!(body["region"], "REGION 1");
    assert_eq!(body["location"]["colony"], "CENTRO");
    assert_eq!(body["created_by"], "1");
    assert!(body["conclusion"].is_null());
    assert_eq!(body["capabilities"]["can_conclude"], true);
}

#[tokio::test]
async fn test_history_lists_created_operative() {
    let app: Router = create_test_app();
    let token: String = login_admin(&app).await;
    let operative_id: String =
        create_operative(&app, &token, "OPERATIVO ALCOHOLIMETRO", "REGION 2").await;

    let (status, body) = send(
        &app,
        "GET",
        "/operatives?view=history",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "history");
    let ids: Vec<&str> = body["operatives"]
        .as_array()
        .unwrap()
        .iter()
        .map(|operative| operative["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![operative_id.as_str()]);
}

#[tokio::test]
async fn test_search_filters_history() {
    let app: Router = create_test_app();
    let token: String = login_admin(&app).await;
    create_operative(&app, &token, "OPERATIVO CARRUSEL", "REGION 1").await;
    create_operative(&app, &token, "OPERATIVO MOTOCICLETAS", "REGION 3").await;

    let (status, body) = send(
        &app,
        "GET",
        "/operatives?view=history&search=motocicletas",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let operatives: &Vec<Value> = body["operatives"].as_array().unwrap();
    assert_eq!(operatives.len(), 1);
    assert_eq!(operatives[0]["region"], "REGION 3");
}

#[tokio::test]
async fn test_dashboard_requires_permission() {
    let app: Router = create_test_app();
    let admin_token: String = login_admin(&app).await;
    let token: String =
        create_and_login(&app, &admin_token, "patrullero", "PATRULLERO", Some("REGION 1")).await;

    let (status, _) = send(&app, "GET", "/operatives", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "GET",
        "/operatives?view=history",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_region_scoped_user_creates_in_assigned_region() {
    let app: Router = create_test_app();
    let admin_token: String = login_admin(&app).await;
    let token: String =
        create_and_login(&app, &admin_token, "patrullero", "PATRULLERO", Some("REGION 2")).await;

    let operative_id: String =
        create_operative(&app, &token, "OPERATIVO PIE TIERRA", "REGION 1").await;

    let (_, body) = send(
        &app,
        "GET",
        &format!("/operatives/{operative_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(body["region"], "REGION 2");
}

#[tokio::test]
async fn test_operative_outside_region_is_not_found() {
    let app: Router = create_test_app();
    let admin_token: String = login_admin(&app).await;
    let operative_id: String =
        create_operative(&app, &admin_token, "OPERATIVO CARRUSEL", "REGION 1").await;
    let token: String =
        create_and_login(&app, &admin_token, "patrullero", "PATRULLERO", Some("REGION 2")).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/operatives/{operative_id}"),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn test_create_operative_without_units_is_bad_request() {
    let app: Router = create_test_app();
    let token: String = login_admin(&app).await;
    let mut draft: Value = operative_draft("OPERATIVO CARRUSEL", "REGION 1");
    draft["units"] = json!([]);

    let (status, body) = send(&app, "POST", "/operatives", Some(&token), Some(draft)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("units"));
}

#[tokio::test]
async fn test_conclude_operative_once() {
    let app: Router = create_test_app();
    let token: String = login_admin(&app).await;
    let operative_id: String =
        create_operative(&app, &token, "OPERATIVO CARRUSEL", "REGION 1").await;
    let uri: String = format!("/operatives/{operative_id}/conclude");
    let report: Value = json!({ "result": "DISUACION", "peopleChecked": 12 });

    let (status, _) = send(&app, "POST", &uri, Some(&token), Some(report.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "POST", &uri, Some(&token), Some(report)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(
        &app,
        "GET",
        &format!("/operatives/{operative_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["status"], "CONCLUIDO");
    assert_eq!(body["conclusion"]["result"], "DISUACION");
    assert_eq!(body["conclusion"]["tallies"]["peopleChecked"], 12);
}

#[tokio::test]
async fn test_civic_judge_conclusion_requires_reason() {
    let app: Router = create_test_app();
    let token: String = login_admin(&app).await;
    let operative_id: String =
        create_operative(&app, &token, "OPERATIVO ALCOHOLIMETRO", "REGION 1").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/operatives/{operative_id}/conclude"),
        Some(&token),
        Some(json!({ "result": "DETENIDOS AL JUEZ CIVICO", "detaineesCount": 2 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("detention_reason"));
}

#[tokio::test]
async fn test_meeting_details_are_redacted_without_permission() {
    let app: Router = create_test_app();
    let admin_token: String = login_admin(&app).await;
    let operative_id: String =
        create_operative(&app, &admin_token, "REUNION VECINAL", "REGION 1").await;
    let (status, _) = send(
        &app,
        "POST",
        &format!("/operatives/{operative_id}/conclude"),
        Some(&admin_token),
        Some(meeting_report()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token: String =
        create_and_login(&app, &admin_token, "patrullero", "PATRULLERO", Some("REGION 1")).await;
    let uri: String = format!("/operatives/{operative_id}");

    let (_, restricted) = send(&app, "GET", &uri, Some(&token), None).await;
    let details: &Value = &restricted["conclusion"]["reunion_details"];
    assert_eq!(details["representative_name"], "RESTRINGIDO");
    assert_eq!(details["restricted"], true);

    let (_, full) = send(&app, "GET", &uri, Some(&admin_token), None).await;
    let details: &Value = &full["conclusion"]["reunion_details"];
    assert_eq!(details["representative_name"], "MARIA LOPEZ");
    assert_eq!(details["participant_count"], 25);
}

#[tokio::test]
async fn test_edit_operative_changes_fields() {
    let app: Router = create_test_app();
    let token: String = login_admin(&app).await;
    let operative_id: String =
        create_operative(&app, &token, "OPERATIVO CARRUSEL", "REGION 1").await;
    let uri: String = format!("/operatives/{operative_id}");

    let (status, _) = send(
        &app,
        "PATCH",
        &uri,
        Some(&token),
        Some(json!({ "quadrant": "C-2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(body["quadrant"], "C-2");
}

#[tokio::test]
async fn test_delete_operative_requires_permission() {
    let app: Router = create_test_app();
    let admin_token: String = login_admin(&app).await;
    let token: String =
        create_and_login(&app, &admin_token, "patrullero", "PATRULLERO", Some("REGION 1")).await;
    let operative_id: String =
        create_operative(&app, &token, "OPERATIVO CARRUSEL", "REGION 1").await;
    let uri: String = format!("/operatives/{operative_id}");

    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", &uri, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &uri, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
