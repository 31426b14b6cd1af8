//! Router tests of the public web site.

mod common;

use axum::http::StatusCode;
use common::{body_text, get, header_value, post_form, post_json, send, Backend};
use rehla_core::SessionToken;
use rehla_service::{
    AccountService, CourseService, EnrollmentService, LectureService, LoginRequest, NewCourse, NewLecture,
    SignupRequest,
};
use serde_json::json;

const PHONE: &str = "07701234567";
const PASSWORD: &str = "correct-horse";

fn signup_request() -> SignupRequest {
    SignupRequest {
        firstname: "Sara".to_string(),
        lastname: "Hadi".to_string(),
        phone_number: PHONE.to_string(),
        parent_phone_number: "07801234567".to_string(),
        password: PASSWORD.to_string(),
    }
}

async fn logged_in(backend: &Backend) -> (String, SessionToken) {
    let user_id = backend.account_service.signup(signup_request()).await.unwrap();
    let outcome = backend
        .account_service
        .login(LoginRequest {
            phone_number: PHONE.to_string(),
            password: PASSWORD.to_string(),
        })
        .await
        .unwrap();
    (user_id, outcome.session_token)
}

async fn course_with_lecture(backend: &Backend, order: i64) -> (String, String) {
    let course_id = backend
        .course_service
        .create_course(NewCourse {
            title: "Chemistry".to_string(),
            active: true,
            ..NewCourse::default()
        })
        .await
        .unwrap();
    let lecture_id = backend
        .lecture_service
        .create_lecture(
            &course_id,
            NewLecture {
                title: "Acids".to_string(),
                description: String::new(),
                order,
                video_url: "abc123".to_string(),
                free: false,
            },
        )
        .await
        .unwrap();
    (course_id, lecture_id)
}

#[tokio::test]
async fn test_ping_carries_security_headers() {
    let backend = Backend::new();
    let response = send(backend.web(), get("/ping", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_value(&response, "x-frame-options"), Some("deny"));
    assert_eq!(header_value(&response, "x-content-type-options"), Some("nosniff"));
    assert_eq!(header_value(&response, "referrer-policy"), Some("origin-when-cross-origin"));
    assert!(header_value(&response, "x-request-id").is_some());
    assert_eq!(body_text(response).await, "pong");
}

#[tokio::test]
async fn test_home_lists_active_courses() {
    let backend = Backend::new();
    course_with_lecture(&backend, 1).await;
    let response = send(backend.web(), get("/", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Chemistry"));
}

#[tokio::test]
async fn test_exam_needs_login() {
    let backend = Backend::new();
    let response = send(backend.web(), get("/courses/c1/exam/e1", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "loginRequired");
}

#[tokio::test]
async fn test_answer_upload_is_gated_before_body_is_read() {
    let backend = Backend::new();
    let response = send(backend.web(), post_form("/answers/c1/e1", "x=1", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "loginRequired");

    let (_, token) = logged_in(&backend).await;
    let (course_id, _) = course_with_lecture(&backend, 1).await;
    let cookie = backend.web_cookie(&token);
    let uri = format!("/answers/{}/e1", course_id);
    let response = send(backend.web(), post_form(&uri, "x=1", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "subRequired");
}

#[tokio::test]
async fn test_progress_needs_subscription() {
    let backend = Backend::new();
    let (_, token) = logged_in(&backend).await;
    let (course_id, _) = course_with_lecture(&backend, 1).await;
    let cookie = backend.web_cookie(&token);
    let response = send(backend.web(), get(&format!("/progress/{}", course_id), Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "subRequired");
}

#[tokio::test]
async fn test_locked_lecture_needs_subscription() {
    let backend = Backend::new();
    let (user_id, token) = logged_in(&backend).await;
    let (course_id, lecture_id) = course_with_lecture(&backend, 4).await;
    let cookie = backend.web_cookie(&token);
    let uri = format!("/courses/{}/lec/{}", course_id, lecture_id);

    let response = send(backend.web(), get(&uri, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "subRequired");

    backend
        .enrollment_service
        .subscribe(&user_id, &course_id, true)
        .await
        .unwrap();
    let response = send(backend.web(), get(&uri, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Acids"));
}

#[tokio::test]
async fn test_preview_lecture_is_open() {
    let backend = Backend::new();
    let (course_id, lecture_id) = course_with_lecture(&backend, 1).await;
    let uri = format!("/courses/{}/lec/{}", course_id, lecture_id);
    let response = send(backend.web(), get(&uri, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_signup_reports_field_errors() {
    let backend = Backend::new();
    let request = post_json(
        "/signup",
        json!({
            "firstname": "Sara",
            "lastname": "",
            "phone_number": "12345",
            "parent_phone_number": "07801234567",
            "password": "short"
        }),
    );
    let response = send(backend.web(), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let errors: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert!(errors.get("lastname").is_some());
    assert!(errors.get("phone_number").is_some());
    assert!(errors.get("password").is_some());
    assert!(errors.get("firstname").is_none());
}

#[tokio::test]
async fn test_signup_sets_session_and_rejects_taken_phone() {
    let backend = Backend::new();
    let body = serde_json::to_value(signup_request()).unwrap();

    let response = send(backend.web(), post_json("/signup", body.clone())).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = header_value(&response, "set-cookie").unwrap();
    assert!(cookie.starts_with("session_id="));
    assert!(cookie.contains("HttpOnly"));

    let response = send(backend.web(), post_json("/signup", body)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_redirects_through_htmx() {
    let backend = Backend::new();
    backend.account_service.signup(signup_request()).await.unwrap();

    let form = format!("phone_number={}&password={}", PHONE, PASSWORD);
    let response = send(backend.web(), post_form("/login", &form, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_value(&response, "hx-redirect"), Some("/"));
    assert!(header_value(&response, "set-cookie").is_some_and(|c| c.starts_with("session_id=")));

    let form = format!("phone_number={}&password=wrong-password", PHONE);
    let response = send(backend.web(), post_form("/login", &form, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "invalid credentials");
}

#[tokio::test]
async fn test_signed_in_user_cannot_open_login() {
    let backend = Backend::new();
    let (_, token) = logged_in(&backend).await;
    let cookie = backend.web_cookie(&token);
    let response = send(backend.web(), get("/login", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let backend = Backend::new();
    let (_, token) = logged_in(&backend).await;
    let cookie = backend.web_cookie(&token);

    let response = send(backend.web(), post_form("/logout", "", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_value(&response, "hx-redirect"), Some("/"));

    let response = send(backend.web(), get("/mycourses", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
