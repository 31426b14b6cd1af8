//! Routes of the public web site.

mod account;
mod learning;
mod pages;

use crate::middleware::{mark_subscription, require_subscription};
use crate::state::WebState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

/// Creates the web site routes. Routes under a `courseId` learn whether the
/// user is subscribed to that course before the handler runs; subscriber-only
/// routes reject everyone else before their body is read.
pub fn routes(state: &WebState) -> Router<WebState> {
    let course_scoped = Router::new()
        .route("/courses/:courseId", get(pages::course))
        .route("/courses/:courseId/lec/:lecId", get(pages::lecture))
        .route("/materials/:courseId", get(learning::course_materials))
        .route_layer(middleware::from_fn_with_state(state.clone(), mark_subscription));

    let subscriber_only = Router::new()
        .route("/courses/:courseId/exam/:examId", get(learning::exam))
        .route("/answers/:courseId/:examId", post(learning::submit_answer))
        .route("/progress/:courseId", get(learning::grades))
        .route("/progress/:courseId/:examId", get(learning::answer))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_subscription));

    Router::new()
        .route("/", get(pages::home))
        .route("/courses", get(pages::courses))
        .route("/materials", get(learning::materials))
        .route("/materials/free", get(learning::free_materials))
        .route("/progress", get(learning::progress))
        .route("/payments", get(learning::payments))
        .route("/payments/:courseId", get(learning::payment_history))
        .route("/mycourses", get(pages::my_courses))
        .route("/myprofile", get(account::profile))
        .route("/myprofile/img", post(account::change_profile_image))
        .route("/contact", get(account::contact_page).post(account::contact))
        .route("/reset", get(account::reset_page).post(account::reset_password))
        .route("/signup", get(account::signup_page).post(account::signup))
        .route("/login", get(account::login_page).post(account::login))
        .route("/logout", post(account::logout))
        .merge(course_scoped)
        .merge(subscriber_only)
}
