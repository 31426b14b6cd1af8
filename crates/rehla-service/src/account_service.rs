//! Account service traits for subscribers and staff.

use crate::dto::{
    ContactRequest, LoginOutcome, NewStaffRequest, NewUserRequest, ResetPasswordRequest,
    SignupRequest, StaffLoginRequest, LoginRequest, Upload,
};
use async_trait::async_trait;
use rehla_core::{DashboardUser, DashboardUserPatch, Interface, RehlaResult, SessionToken, User, UserPatch};

/// Subscriber account service trait.
#[async_trait]
pub trait AccountService: Interface + Send + Sync {
    /// Creates a subscriber and returns its id.
    async fn signup(&self, request: SignupRequest) -> RehlaResult<String>;

    /// Starts a new session, ending any previous one.
    async fn login(&self, request: LoginRequest) -> RehlaResult<LoginOutcome>;

    /// Ends a session.
    async fn logout(&self, user_id: &str, token: &SessionToken) -> RehlaResult<()>;

    /// Gets a subscriber.
    async fn get_user(&self, user_id: &str) -> RehlaResult<User>;

    /// Changes the password after checking the current one.
    async fn reset_password(&self, user_id: &str, request: ResetPasswordRequest) -> RehlaResult<()>;

    /// Replaces the profile image and returns its URL.
    async fn change_profile_image(&self, user_id: &str, image: Upload) -> RehlaResult<String>;

    /// Stores a contact form message.
    async fn send_contact_message(&self, request: ContactRequest) -> RehlaResult<()>;
}

/// Dashboard account service trait.
#[async_trait]
pub trait DashboardAccountService: Interface + Send + Sync {
    /// Starts a staff session, ending any previous one.
    async fn login(&self, request: StaffLoginRequest) -> RehlaResult<LoginOutcome>;

    /// Ends a staff session.
    async fn logout(&self, staff_id: &str, token: &SessionToken) -> RehlaResult<()>;

    /// Creates the first admin when no staff account exists.
    ///
    /// Returns `true` when an account was created.
    async fn bootstrap_admin(&self, username: &str, password: &str) -> RehlaResult<bool>;

    /// Lists staff accounts.
    async fn list_staff(&self) -> RehlaResult<Vec<DashboardUser>>;

    /// Creates a staff account and returns its id.
    async fn create_staff(&self, request: NewStaffRequest) -> RehlaResult<String>;

    /// Updates a staff account.
    async fn update_staff(&self, staff_id: &str, patch: DashboardUserPatch) -> RehlaResult<()>;

    /// Deletes a staff account.
    async fn delete_staff(&self, staff_id: &str) -> RehlaResult<()>;

    /// Lists subscribers.
    async fn list_users(&self) -> RehlaResult<Vec<User>>;

    /// Gets a subscriber.
    async fn get_user(&self, user_id: &str) -> RehlaResult<User>;

    /// Creates a subscriber and returns its id.
    async fn create_user(&self, request: NewUserRequest) -> RehlaResult<String>;

    /// Updates a subscriber.
    async fn update_user(&self, user_id: &str, patch: UserPatch) -> RehlaResult<()>;

    /// Deletes a subscriber and ends their session.
    async fn delete_user(&self, user_id: &str) -> RehlaResult<()>;
}
