//! Account service implementations for subscribers and staff.

use crate::account_service::{AccountService, DashboardAccountService};
use crate::cache::CacheInterface;
use crate::dto::{
    ContactRequest, LoginOutcome, LoginRequest, NewStaffRequest, NewUserRequest, ResetPasswordRequest,
    SignupRequest, StaffLoginRequest, Upload, IMAGE_TYPES,
};
use crate::session_service::{SessionCache, SessionKind};
use async_trait::async_trait;
use chrono::Utc;
use rehla_core::{
    ContactMessage, DashboardUser, DashboardUserPatch, FieldUpdates, RehlaError, RehlaResult, Role,
    SessionToken, User, UserPatch, ValidateExt,
};
use rehla_repository::{ContactRepository, DashboardUserRepository, ObjectStorage, UserRepository};
use rehla_security::{PasswordHasherInterface, Principal};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Creates a subscriber after checking the phone number is free.
async fn create_subscriber(
    users: &dyn UserRepository,
    hasher: &dyn PasswordHasherInterface,
    request: SignupRequest,
) -> RehlaResult<String> {
    request.validate_request()?;
    if users.find_by_phone(&request.phone_number).await?.is_some() {
        return Err(RehlaError::conflict("phone_number is already in use"));
    }

    let user = User {
        id: String::new(),
        firstname: request.firstname.trim().to_string(),
        lastname: request.lastname.trim().to_string(),
        phone_number: request.phone_number,
        parent_phone_number: request.parent_phone_number,
        password_hash: hasher.hash(&request.password)?,
        session_id: String::new(),
        img_url: String::new(),
        img_path: String::new(),
    };
    users.create(&user).await
}

/// Subscriber account service.
#[derive(Component)]
#[shaku(interface = AccountService)]
pub struct AccountServiceImpl {
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
    #[shaku(inject)]
    contact_repository: Arc<dyn ContactRepository>,
    #[shaku(inject)]
    password_hasher: Arc<dyn PasswordHasherInterface>,
    #[shaku(inject)]
    storage: Arc<dyn ObjectStorage>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl AccountServiceImpl {
    /// Creates a new account service.
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        contact_repository: Arc<dyn ContactRepository>,
        password_hasher: Arc<dyn PasswordHasherInterface>,
        storage: Arc<dyn ObjectStorage>,
        cache: Arc<dyn CacheInterface>,
    ) -> Self {
        Self {
            user_repository,
            contact_repository,
            password_hasher,
            storage,
            cache,
        }
    }

    fn sessions(&self) -> SessionCache<'_> {
        SessionCache::new(self.cache.as_ref(), SessionKind::Web)
    }

    async fn find_user(&self, user_id: &str) -> RehlaResult<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| RehlaError::not_found("User", user_id))
    }
}

#[async_trait]
impl AccountService for AccountServiceImpl {
    async fn signup(&self, request: SignupRequest) -> RehlaResult<String> {
        debug!("Signing up {}", request.phone_number);
        let user_id = create_subscriber(
            self.user_repository.as_ref(),
            self.password_hasher.as_ref(),
            request,
        )
        .await?;
        info!("User signed up: {}", user_id);
        Ok(user_id)
    }

    async fn login(&self, request: LoginRequest) -> RehlaResult<LoginOutcome> {
        request.validate_request()?;
        let user = self
            .user_repository
            .find_by_phone(&request.phone_number)
            .await?
            .ok_or(RehlaError::InvalidCredentials)?;
        if !self
            .password_hasher
            .verify(&request.password, &user.password_hash)?
        {
            debug!("Wrong password for user {}", user.id);
            return Err(RehlaError::InvalidCredentials);
        }

        self.sessions().forget(&user.session_id).await;

        let token = SessionToken::generate();
        let mut patch = UserPatch {
            session_id: Some(token.as_str().to_string()),
            ..UserPatch::default()
        };
        if self.password_hasher.needs_rehash(&user.password_hash) {
            patch.password_hash = Some(self.password_hasher.hash(&request.password)?);
        }
        let updates: FieldUpdates = patch.into();
        self.user_repository.update(&user.id, &updates).await?;
        self.sessions().remember(&token, &Principal::from(&user)).await;

        info!("User logged in: {}", user.id);
        Ok(LoginOutcome {
            user_id: user.id,
            session_token: token,
        })
    }

    async fn logout(&self, user_id: &str, token: &SessionToken) -> RehlaResult<()> {
        let updates: FieldUpdates = UserPatch {
            session_id: Some(String::new()),
            ..UserPatch::default()
        }
        .into();
        self.user_repository.update(user_id, &updates).await?;
        self.sessions().forget(token.as_str()).await;
        info!("User logged out: {}", user_id);
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> RehlaResult<User> {
        self.find_user(user_id).await
    }

    async fn reset_password(&self, user_id: &str, request: ResetPasswordRequest) -> RehlaResult<()> {
        request.validate_request()?;
        let user = self.find_user(user_id).await?;
        if !self
            .password_hasher
            .verify(&request.current_password, &user.password_hash)?
        {
            return Err(RehlaError::validation("current password is wrong"));
        }

        let updates: FieldUpdates = UserPatch {
            password_hash: Some(self.password_hasher.hash(&request.new_password)?),
            ..UserPatch::default()
        }
        .into();
        self.user_repository.update(user_id, &updates).await?;
        info!("Password changed: {}", user_id);
        Ok(())
    }

    async fn change_profile_image(&self, user_id: &str, image: Upload) -> RehlaResult<String> {
        let content_type = image.check(IMAGE_TYPES)?;
        self.find_user(user_id).await?;

        let path = User::image_path(user_id);
        self.storage.upload(&path, image.bytes, content_type).await?;
        let url = self.storage.public_url(&path);

        let updates: FieldUpdates = UserPatch {
            img_url: Some(url.clone()),
            img_path: Some(path),
            ..UserPatch::default()
        }
        .into();
        self.user_repository.update(user_id, &updates).await?;
        info!("Profile image changed: {}", user_id);
        Ok(url)
    }

    async fn send_contact_message(&self, request: ContactRequest) -> RehlaResult<()> {
        request.validate_request()?;
        let message = ContactMessage {
            full_name: request.full_name,
            phone_number: request.phone_number,
            message: request.message,
            created_at: Utc::now(),
        };
        let id = self.contact_repository.create(&message).await?;
        info!("Contact message stored: {}", id);
        Ok(())
    }
}

impl std::fmt::Debug for AccountServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountServiceImpl").finish_non_exhaustive()
    }
}

/// Dashboard account service for staff and subscriber administration.
#[derive(Component)]
#[shaku(interface = DashboardAccountService)]
pub struct DashboardAccountServiceImpl {
    #[shaku(inject)]
    staff_repository: Arc<dyn DashboardUserRepository>,
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
    #[shaku(inject)]
    password_hasher: Arc<dyn PasswordHasherInterface>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl DashboardAccountServiceImpl {
    /// Creates a new dashboard account service.
    pub fn new(
        staff_repository: Arc<dyn DashboardUserRepository>,
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasherInterface>,
        cache: Arc<dyn CacheInterface>,
    ) -> Self {
        Self {
            staff_repository,
            user_repository,
            password_hasher,
            cache,
        }
    }

    fn staff_sessions(&self) -> SessionCache<'_> {
        SessionCache::new(self.cache.as_ref(), SessionKind::Dashboard)
    }

    fn user_sessions(&self) -> SessionCache<'_> {
        SessionCache::new(self.cache.as_ref(), SessionKind::Web)
    }

    async fn find_staff(&self, staff_id: &str) -> RehlaResult<DashboardUser> {
        self.staff_repository
            .find_by_id(staff_id)
            .await?
            .ok_or_else(|| RehlaError::not_found("DashboardUser", staff_id))
    }

    async fn find_user(&self, user_id: &str) -> RehlaResult<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| RehlaError::not_found("User", user_id))
    }

    async fn insert_staff(&self, username: &str, password: &str, role: Role, course_ids: Vec<String>) -> RehlaResult<String> {
        if self.staff_repository.find_by_username(username).await?.is_some() {
            return Err(RehlaError::conflict("username is already in use"));
        }
        let staff = DashboardUser {
            id: String::new(),
            username: username.to_string(),
            role,
            password_hash: self.password_hasher.hash(password)?,
            session_id: String::new(),
            course_ids,
        };
        self.staff_repository.create(&staff).await
    }
}

#[async_trait]
impl DashboardAccountService for DashboardAccountServiceImpl {
    async fn login(&self, request: StaffLoginRequest) -> RehlaResult<LoginOutcome> {
        request.validate_request()?;
        let staff = self
            .staff_repository
            .find_by_username(&request.username)
            .await?
            .ok_or(RehlaError::InvalidCredentials)?;
        if !self
            .password_hasher
            .verify(&request.password, &staff.password_hash)?
        {
            debug!("Wrong password for staff {}", staff.id);
            return Err(RehlaError::InvalidCredentials);
        }

        self.staff_sessions().forget(&staff.session_id).await;

        let token = SessionToken::generate();
        let updates: FieldUpdates = DashboardUserPatch {
            session_id: Some(token.as_str().to_string()),
            ..DashboardUserPatch::default()
        }
        .into();
        self.staff_repository.update(&staff.id, &updates).await?;
        self.staff_sessions()
            .remember(&token, &Principal::from(&staff))
            .await;

        info!("Staff logged in: {} ({})", staff.username, staff.role);
        Ok(LoginOutcome {
            user_id: staff.id,
            session_token: token,
        })
    }

    async fn logout(&self, staff_id: &str, token: &SessionToken) -> RehlaResult<()> {
        let updates: FieldUpdates = DashboardUserPatch {
            session_id: Some(String::new()),
            ..DashboardUserPatch::default()
        }
        .into();
        self.staff_repository.update(staff_id, &updates).await?;
        self.staff_sessions().forget(token.as_str()).await;
        info!("Staff logged out: {}", staff_id);
        Ok(())
    }

    async fn bootstrap_admin(&self, username: &str, password: &str) -> RehlaResult<bool> {
        if !self.staff_repository.find_all().await?.is_empty() {
            debug!("Staff accounts exist, skipping admin bootstrap");
            return Ok(false);
        }
        let id = self
            .insert_staff(username, password, Role::Admin, Vec::new())
            .await?;
        info!("Bootstrapped admin account {} ({})", username, id);
        Ok(true)
    }

    async fn list_staff(&self) -> RehlaResult<Vec<DashboardUser>> {
        self.staff_repository.find_all().await
    }

    async fn create_staff(&self, request: NewStaffRequest) -> RehlaResult<String> {
        request.validate_request()?;
        if request.role == Role::Student {
            return Err(RehlaError::validation("staff role must be admin or corrector"));
        }
        let id = self
            .insert_staff(&request.username, &request.password, request.role, request.course_ids)
            .await?;
        info!("Staff created: {} ({})", request.username, id);
        Ok(id)
    }

    async fn update_staff(&self, staff_id: &str, patch: DashboardUserPatch) -> RehlaResult<()> {
        if patch.role == Some(Role::Student) {
            return Err(RehlaError::validation("staff role must be admin or corrector"));
        }
        let staff = self.find_staff(staff_id).await?;
        let updates: FieldUpdates = patch.into();
        if updates.is_empty() {
            return Ok(());
        }
        self.staff_repository.update(staff_id, &updates).await?;
        self.staff_sessions().forget(&staff.session_id).await;
        info!("Staff updated: {}", staff_id);
        Ok(())
    }

    async fn delete_staff(&self, staff_id: &str) -> RehlaResult<()> {
        let staff = self.find_staff(staff_id).await?;
        self.staff_repository.delete(staff_id).await?;
        self.staff_sessions().forget(&staff.session_id).await;
        info!("Staff deleted: {}", staff_id);
        Ok(())
    }

    async fn list_users(&self) -> RehlaResult<Vec<User>> {
        self.user_repository.find_all().await
    }

    async fn get_user(&self, user_id: &str) -> RehlaResult<User> {
        self.find_user(user_id).await
    }

    async fn create_user(&self, request: NewUserRequest) -> RehlaResult<String> {
        let user_id = create_subscriber(
            self.user_repository.as_ref(),
            self.password_hasher.as_ref(),
            request,
        )
        .await?;
        info!("User created from dashboard: {}", user_id);
        Ok(user_id)
    }

    async fn update_user(&self, user_id: &str, patch: UserPatch) -> RehlaResult<()> {
        let user = self.find_user(user_id).await?;
        if let Some(phone) = patch.phone_number.as_deref() {
            if phone != user.phone_number {
                if rehla_core::rules::phone_number(phone).is_err() {
                    return Err(RehlaError::validation(
                        "phone_number should be a valid iraqi number of 11 digits",
                    ));
                }
                if self.user_repository.find_by_phone(phone).await?.is_some() {
                    return Err(RehlaError::conflict("phone_number is already in use"));
                }
            }
        }

        let updates: FieldUpdates = patch.into();
        if updates.is_empty() {
            return Ok(());
        }
        self.user_repository.update(user_id, &updates).await?;
        self.user_sessions().forget(&user.session_id).await;
        info!("User updated from dashboard: {}", user_id);
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> RehlaResult<()> {
        let user = self.find_user(user_id).await?;
        self.user_repository.delete(user_id).await?;
        self.user_sessions().forget(&user.session_id).await;
        if !user.img_path.is_empty() {
            warn!("Profile image {} of deleted user {} left in storage", user.img_path, user_id);
        }
        info!("User deleted: {}", user_id);
        Ok(())
    }
}

impl std::fmt::Debug for DashboardAccountServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardAccountServiceImpl").finish_non_exhaustive()
    }
}
