//! Router tests of the staff dashboard.

mod common;

use axum::http::StatusCode;
use common::{body_text, get, header_value, post_form, send, Backend};
use rehla_core::{Role, SessionToken};
use rehla_service::{CourseService, DashboardAccountService, NewCourse, NewStaffRequest, StaffLoginRequest};

async fn staff_session(backend: &Backend, username: &str, role: Role, course_ids: &[&str]) -> SessionToken {
    let service = &backend.dashboard_account_service;
    if role == Role::Admin {
        service.bootstrap_admin(username, "admin-password").await.unwrap();
    } else {
        service
            .create_staff(NewStaffRequest {
                username: username.to_string(),
                password: "admin-password".to_string(),
                role,
                course_ids: course_ids.iter().map(ToString::to_string).collect(),
            })
            .await
            .unwrap();
    }
    service
        .login(StaffLoginRequest {
            username: username.to_string(),
            password: "admin-password".to_string(),
        })
        .await
        .unwrap()
        .session_token
}

async fn course(backend: &Backend, title: &str) -> String {
    backend
        .course_service
        .create_course(NewCourse {
            title: title.to_string(),
            ..NewCourse::default()
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_anonymous_staff_goes_to_login() {
    let backend = Backend::new();
    let response = send(backend.dashboard(), get("/courses", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(header_value(&response, "location"), Some("/login"));

    let response = send(backend.dashboard(), get("/login", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_sets_dashboard_cookie() {
    let backend = Backend::new();
    backend
        .dashboard_account_service
        .bootstrap_admin("admin", "admin-password")
        .await
        .unwrap();

    let response = send(
        backend.dashboard(),
        post_form("/login", "username=admin&password=admin-password", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(header_value(&response, "location"), Some("/"));
    assert!(header_value(&response, "set-cookie").is_some_and(|c| c.starts_with("dashboard_session_id=")));

    let response = send(
        backend.dashboard(),
        post_form("/login", "username=admin&password=nope-nope", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_manages_courses() {
    let backend = Backend::new();
    let token = staff_session(&backend, "admin", Role::Admin, &[]).await;
    let cookie = backend.dashboard_cookie(&token);
    course(&backend, "Physics").await;

    let response = send(backend.dashboard(), get("/courses", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Physics"));
}

#[tokio::test]
async fn test_corrector_is_kept_out_of_admin_pages() {
    let backend = Backend::new();
    let course_id = course(&backend, "Physics").await;
    let token = staff_session(&backend, "grader", Role::Corrector, &[&course_id]).await;
    let cookie = backend.dashboard_cookie(&token);

    let response = send(backend.dashboard(), get("/courses", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "unauthorized");

    let response = send(backend.dashboard(), get("/correct", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Physics"));
}

#[tokio::test]
async fn test_corrector_only_grades_assigned_courses() {
    let backend = Backend::new();
    let assigned = course(&backend, "Physics").await;
    let other = course(&backend, "Biology").await;
    let token = staff_session(&backend, "grader", Role::Corrector, &[&assigned]).await;
    let cookie = backend.dashboard_cookie(&token);

    let response = send(backend.dashboard(), get(&format!("/correct/{}", assigned), Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(backend.dashboard(), get(&format!("/correct/{}", other), Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cache_refresh_reports_back() {
    let backend = Backend::new();
    let token = staff_session(&backend, "admin", Role::Admin, &[]).await;
    let cookie = backend.dashboard_cookie(&token);
    let course_id = course(&backend, "Physics").await;

    let uri = format!("/cache/courses/{}/lecs", course_id);
    let response = send(backend.dashboard(), post_form(&uri, "", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        header_value(&response, "location"),
        Some("/cache?refreshed=lectures&count=0")
    );

    let response = send(
        backend.dashboard(),
        get("/cache?refreshed=lectures&count=0", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Refreshed 0 lectures"));
}
