//! Subscriber management: accounts, subscriptions and payments.

use crate::extractors::Auth;
use crate::responses::{page, see_other, AppResult};
use crate::state::DashboardState;
use crate::views;
use crate::views::dashboard::SubscriptionPayments;
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
    Form,
};
use chrono::{NaiveDate, Utc};
use rehla_core::{Payment, RehlaError, SubscriptionPatch, UserPatch};
use rehla_service::NewUserRequest;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct SubscribeForm {
    course_id: String,
    #[serde(default)]
    active: bool,
}

/// An unchecked checkbox is simply missing from the form.
#[derive(Debug, Deserialize)]
pub(super) struct ActiveForm {
    #[serde(default)]
    active: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct PaymentForm {
    amount_paid: i64,
    valid_until: NaiveDate,
}

impl PaymentForm {
    /// Paid periods end at the last second of the chosen day.
    fn into_payment(self) -> Result<Payment, RehlaError> {
        let valid_until = self
            .valid_until
            .and_hms_opt(23, 59, 59)
            .ok_or_else(|| RehlaError::validation("invalid valid_until date"))?
            .and_utc();
        Ok(Payment {
            id: String::new(),
            amount_paid: self.amount_paid,
            date_of_payment: Utc::now(),
            valid_until,
        })
    }
}

fn user_url(user_id: &str) -> String {
    format!("/users/{}", user_id)
}

pub(super) async fn users(State(state): State<DashboardState>, auth: Auth) -> AppResult<Html<String>> {
    let staff = auth.user()?;
    let users = state.account_service.list_users().await?;
    Ok(page(views::dashboard::users(staff, &users)))
}

pub(super) async fn create_user(
    State(state): State<DashboardState>,
    Form(request): Form<NewUserRequest>,
) -> AppResult<Response> {
    let user_id = state.account_service.create_user(request).await?;
    Ok(see_other(&user_url(&user_id)).into_response())
}

pub(super) async fn user(
    State(state): State<DashboardState>,
    auth: Auth,
    Path(user_id): Path<String>,
) -> AppResult<Html<String>> {
    let staff = auth.user()?;
    let user = state.account_service.get_user(&user_id).await?;

    let mut subscriptions: Vec<SubscriptionPayments> = Vec::new();
    for subscription in state.enrollment_service.list_subscriptions(&user_id).await? {
        let payments = state
            .enrollment_service
            .list_payments(&user_id, &subscription.id)
            .await?;
        subscriptions.push((subscription, payments));
    }
    let courses = state.course_service.list_courses().await?;

    Ok(page(views::dashboard::user(staff, &user, &subscriptions, &courses)))
}

pub(super) async fn update_user(
    State(state): State<DashboardState>,
    Path(user_id): Path<String>,
    Form(patch): Form<UserPatch>,
) -> AppResult<Response> {
    state.account_service.update_user(&user_id, patch).await?;
    Ok(see_other(&user_url(&user_id)).into_response())
}

pub(super) async fn delete_user(
    State(state): State<DashboardState>,
    Path(user_id): Path<String>,
) -> AppResult<Response> {
    state.account_service.delete_user(&user_id).await?;
    Ok(see_other("/users").into_response())
}

pub(super) async fn subscribe(
    State(state): State<DashboardState>,
    Path(user_id): Path<String>,
    Form(form): Form<SubscribeForm>,
) -> AppResult<Response> {
    // the user must exist before a subscription can hang off it
    state.account_service.get_user(&user_id).await?;
    state
        .enrollment_service
        .subscribe(&user_id, &form.course_id, form.active)
        .await?;
    Ok(see_other(&user_url(&user_id)).into_response())
}

pub(super) async fn update_subscription(
    State(state): State<DashboardState>,
    Path((user_id, course_id)): Path<(String, String)>,
    Form(form): Form<ActiveForm>,
) -> AppResult<Response> {
    let patch = SubscriptionPatch {
        active: Some(form.active),
        ..SubscriptionPatch::default()
    };
    state
        .enrollment_service
        .update_subscription(&user_id, &course_id, patch)
        .await?;
    Ok(see_other(&user_url(&user_id)).into_response())
}

pub(super) async fn unsubscribe(
    State(state): State<DashboardState>,
    Path((user_id, course_id)): Path<(String, String)>,
) -> AppResult<Response> {
    state.enrollment_service.unsubscribe(&user_id, &course_id).await?;
    Ok(see_other(&user_url(&user_id)).into_response())
}

pub(super) async fn record_payment(
    State(state): State<DashboardState>,
    Path((user_id, course_id)): Path<(String, String)>,
    Form(form): Form<PaymentForm>,
) -> AppResult<Response> {
    let payment = form.into_payment()?;
    state
        .enrollment_service
        .record_payment(&user_id, &course_id, payment)
        .await?;
    Ok(see_other(&user_url(&user_id)).into_response())
}

pub(super) async fn delete_payment(
    State(state): State<DashboardState>,
    Path((user_id, course_id, payment_id)): Path<(String, String, String)>,
) -> AppResult<Response> {
    state
        .enrollment_service
        .delete_payment(&user_id, &course_id, &payment_id)
        .await?;
    Ok(see_other(&user_url(&user_id)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_payment_runs_to_end_of_day() {
        let form = PaymentForm {
            amount_paid: 25000,
            valid_until: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        };
        let payment = form.into_payment().unwrap();
        assert_eq!(payment.amount_paid, 25000);
        assert_eq!(payment.valid_until.day(), 31);
        assert_eq!(payment.valid_until.hour(), 23);
        assert_eq!(payment.valid_until.minute(), 59);
    }

    #[test]
    fn test_missing_checkbox_is_inactive() {
        let form: ActiveForm = serde_json::from_str("{}").unwrap();
        assert!(!form.active);
        let form: SubscribeForm = serde_json::from_str(r#"{"course_id":"c1"}"#).unwrap();
        assert!(!form.active);
        assert_eq!(form.course_id, "c1");
    }
}
