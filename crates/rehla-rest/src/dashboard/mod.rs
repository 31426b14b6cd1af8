//! Routes of the staff dashboard.
//!
//! Everything except the login page needs a staff session. Content, user
//! and cache management is for admins; grading is for correctors and
//! admins.

mod account;
mod cache;
mod content;
mod correct;
mod users;

use crate::middleware::{require_admin, require_corrector, require_login};
use crate::state::DashboardState;
use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

/// Creates the dashboard routes.
pub fn routes() -> Router<DashboardState> {
    let admin = Router::new()
        .route("/courses", get(content::courses).post(content::create_course))
        .route(
            "/courses/:courseId",
            get(content::course)
                .patch(content::update_course)
                .delete(content::delete_course),
        )
        .route("/courses/:courseId/lecs", get(content::lectures).post(content::create_lecture))
        .route(
            "/courses/:courseId/lecs/:lecId",
            get(content::lecture)
                .patch(content::update_lecture)
                .delete(content::delete_lecture),
        )
        .route("/courses/:courseId/exams", get(content::exams).post(content::create_exam))
        .route(
            "/courses/:courseId/exams/:examId",
            get(content::exam)
                .patch(content::update_exam)
                .delete(content::delete_exam),
        )
        .route("/courses/:courseId/mats", get(content::materials).post(content::create_material))
        .route(
            "/courses/:courseId/mats/:matId",
            get(content::material)
                .patch(content::update_material)
                .delete(content::delete_material),
        )
        .route("/users", get(users::users).post(users::create_user))
        .route(
            "/users/:userId",
            get(users::user).patch(users::update_user).delete(users::delete_user),
        )
        .route("/users/:userId/subs", post(users::subscribe))
        .route(
            "/users/:userId/subs/:courseId",
            patch(users::update_subscription).delete(users::unsubscribe),
        )
        .route("/users/:userId/subs/:courseId/payments", post(users::record_payment))
        .route(
            "/users/:userId/subs/:courseId/payments/:paymentId",
            delete(users::delete_payment),
        )
        .route("/staff", get(account::staff).post(account::create_staff))
        .route("/staff/:staffId", delete(account::delete_staff))
        .route("/cache", get(cache::status))
        .route("/cache/courses/:courseId", post(cache::refresh_course))
        .route("/cache/courses/:courseId/lecs", post(cache::refresh_lectures))
        .route("/cache/courses/:courseId/exams", post(cache::refresh_exams))
        .route("/cache/courses/:courseId/mats", post(cache::refresh_materials))
        .route_layer(middleware::from_fn(require_admin));

    let corrector = Router::new()
        .route("/correct", get(correct::courses))
        .route("/correct/:courseId", get(correct::exams))
        .route("/correct/:courseId/:examId", get(correct::answers))
        .route(
            "/correct/:courseId/:examId/:userId",
            get(correct::answer).patch(correct::grade),
        )
        .route_layer(middleware::from_fn(require_corrector));

    let staff = Router::new()
        .route("/", get(account::home))
        .route("/logout", post(account::logout))
        .merge(admin)
        .merge(corrector)
        .route_layer(middleware::from_fn(require_login));

    Router::new()
        .route("/login", get(account::login_page).post(account::login))
        .merge(staff)
}
