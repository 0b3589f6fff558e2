//! In-memory port implementations shared by service tests.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rolegate_core::{AppError, AppResult, TokenRejection, UserIdentity};
use rolegate_domain::{
    AccessContext, AuditAction, EmailTemplate, EmailTemplateId, PermissionId, PermissionName,
    RoleGrant, RoleId, RoleName, UserId,
};
use tokio::sync::Mutex;

use crate::{
    AccessTokenClaims, AccessTokenService, AuditEvent, AuditLogEntry, AuditLogQuery,
    AuditRepository, AuthenticatedUser, AuthorizationRepository, EmailService,
    EmailTemplateRecord, EmailTemplateRepository, IssuedAccessToken, NewRole, NewUser,
    PasswordHasher, PasswordResetTokenRecord, PasswordResetTokenRepository, PermissionRecord,
    RoleRecord, SecurityAdminRepository, UserAccountUpdate, UserListQuery, UserProfileUpdate,
    UserRecord, UserRepository,
};

struct RoleRow {
    id: RoleId,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
}

struct TokenRow {
    record: PasswordResetTokenRecord,
    token_hash: String,
    used: bool,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct StoreState {
    users: Vec<UserRecord>,
    roles: Vec<RoleRow>,
    permissions: Vec<PermissionRecord>,
    role_permissions: BTreeSet<(RoleId, PermissionId)>,
    grants: Vec<(UserId, RoleGrant)>,
    audit: Vec<AuditEvent>,
    tokens: Vec<TokenRow>,
    templates: Vec<EmailTemplateRecord>,
}

impl StoreState {
    fn role_record(&self, role: &RoleRow) -> RoleRecord {
        let mut permissions: Vec<String> = self
            .permissions
            .iter()
            .filter(|permission| self.role_permissions.contains(&(role.id, permission.id)))
            .map(|permission| permission.name.clone())
            .collect();
        permissions.sort();

        RoleRecord {
            id: role.id,
            name: role.name.clone(),
            description: role.description.clone(),
            permissions,
            created_at: role.created_at,
            updated_at: role.created_at,
        }
    }

    fn user_mut(&mut self, user_id: UserId) -> AppResult<&mut UserRecord> {
        self.users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or_else(|| AppError::NotFound("user not found".to_owned()))
    }
}

/// Single in-memory store backing every persistence port.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
    fail_authorization_lookups: AtomicBool,
    fail_role_grants: AtomicBool,
}

impl InMemoryStore {
    pub fn fail_authorization_lookups(&self) {
        self.fail_authorization_lookups.store(true, Ordering::SeqCst);
    }

    pub fn fail_role_grants(&self) {
        self.fail_role_grants.store(true, Ordering::SeqCst);
    }

    pub async fn seed_permission(&self, name: &str) -> PermissionId {
        let name = PermissionName::new(name).unwrap_or_else(|_| panic!("valid permission"));
        self.create_permission(&name, "")
            .await
            .unwrap_or_else(|_| panic!("seed permission"))
            .id
    }

    pub async fn seed_role(&self, name: &str, permissions: &[&str]) -> RoleId {
        let mut permission_ids = Vec::new();
        for permission in permissions {
            let existing = self
                .find_permissions_by_name(&[(*permission).to_owned()])
                .await
                .unwrap_or_default();
            match existing.first() {
                Some(record) => permission_ids.push(record.id),
                None => permission_ids.push(self.seed_permission(permission).await),
            }
        }

        self.create_role(NewRole {
            name: RoleName::new(name).unwrap_or_else(|_| panic!("valid role")),
            description: String::new(),
            permission_ids,
        })
        .await
        .unwrap_or_else(|_| panic!("seed role"))
        .id
    }

    pub async fn seed_user(&self, email: &str, password: &str) -> UserRecord {
        self.create(NewUser {
            email: email.to_owned(),
            password_hash: FakePasswordHasher.hash_password(password).unwrap_or_default(),
            first_name: String::new(),
            last_name: String::new(),
            is_active: true,
        })
        .await
        .unwrap_or_else(|_| panic!("seed user"))
    }

    pub async fn seed_grant(
        &self,
        user_id: UserId,
        role_id: RoleId,
        expires_at: Option<DateTime<Utc>>,
    ) {
        self.grant_role(user_id, role_id, None, expires_at)
            .await
            .unwrap_or_else(|_| panic!("seed grant"));
    }

    pub async fn audit_actions(&self) -> Vec<AuditAction> {
        self.state
            .lock()
            .await
            .audit
            .iter()
            .map(|event| event.action)
            .collect()
    }

    pub async fn user(&self, user_id: UserId) -> Option<UserRecord> {
        self.find_by_id(user_id).await.ok().flatten()
    }

    pub async fn active_token_count(&self, user_id: UserId) -> usize {
        self.state
            .lock()
            .await
            .tokens
            .iter()
            .filter(|token| token.record.user_id == user_id && !token.used)
            .count()
    }

    pub async fn insert_token(&self, user_id: UserId, token_hash: &str, expires_at: DateTime<Utc>) {
        self.create_token(user_id, "seeded@example.com", token_hash, expires_at)
            .await
            .unwrap_or_else(|_| panic!("seed token"));
    }

    pub async fn role_names_with_grants(&self) -> BTreeSet<String> {
        let state = self.state.lock().await;
        state
            .grants
            .iter()
            .map(|(_, grant)| grant.role_name.clone())
            .collect()
    }
}

/// Builds a caller holding exactly the given roles and permissions.
pub fn actor(user_id: UserId, roles: &[&str], permissions: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser::new(
        user_id,
        UserIdentity::new(user_id.to_string(), "actor@example.com", "Actor"),
        AccessContext::new(
            roles.iter().map(|role| (*role).to_owned()),
            permissions.iter().map(|permission| (*permission).to_owned()),
        ),
    )
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|user| user.id == user_id).cloned())
    }

    async fn list(&self, query: UserListQuery) -> AppResult<Vec<UserRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .iter()
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.state.lock().await.users.len() as i64)
    }

    async fn create(&self, user: NewUser) -> AppResult<UserRecord> {
        let mut state = self.state.lock().await;
        if state
            .users
            .iter()
            .any(|existing| existing.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AppError::Conflict("email already exists".to_owned()));
        }

        let now = Utc::now();
        let record = UserRecord {
            id: UserId::new(),
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            is_active: user.is_active,
            failed_login_count: 0,
            locked_until: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        state.users.push(record.clone());
        Ok(record)
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        profile: &UserProfileUpdate,
    ) -> AppResult<UserRecord> {
        let mut state = self.state.lock().await;
        let user = state.user_mut(user_id)?;
        user.first_name = profile.first_name.clone();
        user.last_name = profile.last_name.clone();
        Ok(user.clone())
    }

    async fn update_account(
        &self,
        user_id: UserId,
        update: &UserAccountUpdate,
    ) -> AppResult<UserRecord> {
        let mut state = self.state.lock().await;
        if state
            .users
            .iter()
            .any(|user| user.id != user_id && user.email.eq_ignore_ascii_case(&update.email))
        {
            return Err(AppError::Conflict("email already exists".to_owned()));
        }

        let user = state.user_mut(user_id)?;
        user.email = update.email.clone();
        user.first_name = update.first_name.clone();
        user.last_name = update.last_name.clone();
        user.is_active = update.is_active;
        if let Some(password_hash) = &update.password_hash {
            user.password_hash = password_hash.clone();
            user.failed_login_count = 0;
            user.locked_until = None;
        }
        Ok(user.clone())
    }

    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let user = state.user_mut(user_id)?;
        user.password_hash = password_hash.to_owned();
        user.failed_login_count = 0;
        user.locked_until = None;
        Ok(())
    }

    async fn record_failed_login(
        &self,
        user_id: UserId,
        lock_threshold: i32,
        locked_until: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let user = state.user_mut(user_id)?;
        user.failed_login_count += 1;
        if user.failed_login_count >= lock_threshold {
            user.locked_until = Some(locked_until);
        }
        Ok(())
    }

    async fn record_successful_login(&self, user_id: UserId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let user = state.user_mut(user_id)?;
        user.failed_login_count = 0;
        user.locked_until = None;
        user.last_login_at = Some(Utc::now());
        Ok(())
    }

    async fn delete(&self, user_id: UserId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let before = state.users.len();
        state.users.retain(|user| user.id != user_id);
        if state.users.len() == before {
            return Err(AppError::NotFound("user not found".to_owned()));
        }
        state.grants.retain(|(holder, _)| *holder != user_id);
        for (_, grant) in &mut state.grants {
            if grant.granted_by == Some(user_id) {
                grant.granted_by = None;
            }
        }
        state.tokens.retain(|token| token.record.user_id != user_id);
        Ok(())
    }
}

#[async_trait]
impl SecurityAdminRepository for InMemoryStore {
    async fn list_roles(&self) -> AppResult<Vec<RoleRecord>> {
        let state = self.state.lock().await;
        let mut roles: Vec<RoleRecord> = state
            .roles
            .iter()
            .map(|role| state.role_record(role))
            .collect();
        roles.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(roles)
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .roles
            .iter()
            .find(|role| role.id == role_id)
            .map(|role| state.role_record(role)))
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<RoleRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .roles
            .iter()
            .find(|role| role.name == name)
            .map(|role| state.role_record(role)))
    }

    async fn create_role(&self, role: NewRole) -> AppResult<RoleRecord> {
        let mut state = self.state.lock().await;
        if state.roles.iter().any(|existing| existing.name == role.name.as_str()) {
            return Err(AppError::Conflict("role already exists".to_owned()));
        }

        let row = RoleRow {
            id: RoleId::new(),
            name: role.name.as_str().to_owned(),
            description: role.description,
            created_at: Utc::now(),
        };
        for permission_id in role.permission_ids {
            state.role_permissions.insert((row.id, permission_id));
        }
        let record = state.role_record(&row);
        state.roles.push(row);
        Ok(record)
    }

    async fn update_role(
        &self,
        role_id: RoleId,
        name: &RoleName,
        description: &str,
    ) -> AppResult<RoleRecord> {
        let mut state = self.state.lock().await;
        if state
            .roles
            .iter()
            .any(|role| role.id != role_id && role.name == name.as_str())
        {
            return Err(AppError::Conflict("role already exists".to_owned()));
        }

        let role = state
            .roles
            .iter_mut()
            .find(|role| role.id == role_id)
            .ok_or_else(|| AppError::NotFound("role not found".to_owned()))?;
        role.name = name.as_str().to_owned();
        role.description = description.to_owned();

        for (_, grant) in &mut state.grants {
            if grant.role_id == role_id {
                grant.role_name = name.as_str().to_owned();
            }
        }

        let role = state
            .roles
            .iter()
            .find(|role| role.id == role_id)
            .ok_or_else(|| AppError::NotFound("role not found".to_owned()))?;
        Ok(state.role_record(role))
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let before = state.roles.len();
        state.roles.retain(|role| role.id != role_id);
        if state.roles.len() == before {
            return Err(AppError::NotFound("role not found".to_owned()));
        }
        state.role_permissions.retain(|(role, _)| *role != role_id);
        state.grants.retain(|(_, grant)| grant.role_id != role_id);
        Ok(())
    }

    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> AppResult<RoleRecord> {
        let mut state = self.state.lock().await;
        state.role_permissions.retain(|(role, _)| *role != role_id);
        for permission_id in permission_ids {
            state.role_permissions.insert((role_id, *permission_id));
        }
        let role = state
            .roles
            .iter()
            .find(|role| role.id == role_id)
            .ok_or_else(|| AppError::NotFound("role not found".to_owned()))?;
        Ok(state.role_record(role))
    }

    async fn attach_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.state
            .lock()
            .await
            .role_permissions
            .insert((role_id, permission_id));
        Ok(())
    }

    async fn detach_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<bool> {
        Ok(self
            .state
            .lock()
            .await
            .role_permissions
            .remove(&(role_id, permission_id)))
    }

    async fn list_permissions(&self) -> AppResult<Vec<PermissionRecord>> {
        let mut permissions = self.state.lock().await.permissions.clone();
        permissions.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(permissions)
    }

    async fn find_permission(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<PermissionRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .permissions
            .iter()
            .find(|permission| permission.id == permission_id)
            .cloned())
    }

    async fn find_permissions_by_name(
        &self,
        names: &[String],
    ) -> AppResult<Vec<PermissionRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .permissions
            .iter()
            .filter(|permission| names.contains(&permission.name))
            .cloned()
            .collect())
    }

    async fn create_permission(
        &self,
        name: &PermissionName,
        description: &str,
    ) -> AppResult<PermissionRecord> {
        let mut state = self.state.lock().await;
        if state
            .permissions
            .iter()
            .any(|permission| permission.name == name.as_str())
        {
            return Err(AppError::Conflict("permission already exists".to_owned()));
        }

        let now = Utc::now();
        let record = PermissionRecord {
            id: PermissionId::new(),
            name: name.as_str().to_owned(),
            resource: name.resource().to_owned(),
            action: name.action().to_owned(),
            description: description.to_owned(),
            created_at: now,
            updated_at: now,
        };
        state.permissions.push(record.clone());
        Ok(record)
    }

    async fn update_permission(
        &self,
        permission_id: PermissionId,
        description: &str,
    ) -> AppResult<PermissionRecord> {
        let mut state = self.state.lock().await;
        let permission = state
            .permissions
            .iter_mut()
            .find(|permission| permission.id == permission_id)
            .ok_or_else(|| AppError::NotFound("permission not found".to_owned()))?;
        permission.description = description.to_owned();
        Ok(permission.clone())
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state
            .permissions
            .retain(|permission| permission.id != permission_id);
        state
            .role_permissions
            .retain(|(_, permission)| *permission != permission_id);
        Ok(())
    }

    async fn list_user_grants(&self, user_id: UserId) -> AppResult<Vec<RoleGrant>> {
        let state = self.state.lock().await;
        Ok(state
            .grants
            .iter()
            .filter(|(holder, _)| *holder == user_id)
            .map(|(_, grant)| grant.clone())
            .collect())
    }

    async fn grant_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        granted_by: Option<UserId>,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<RoleGrant> {
        if self.fail_role_grants.load(Ordering::SeqCst) {
            return Err(AppError::Internal("database unavailable".to_owned()));
        }
        let mut state = self.state.lock().await;
        let role_name = state
            .roles
            .iter()
            .find(|role| role.id == role_id)
            .map(|role| role.name.clone())
            .ok_or_else(|| AppError::NotFound("role not found".to_owned()))?;

        if let Some((_, grant)) = state
            .grants
            .iter_mut()
            .find(|(holder, grant)| *holder == user_id && grant.role_id == role_id)
        {
            grant.granted_by = granted_by;
            grant.expires_at = expires_at;
            return Ok(grant.clone());
        }

        let grant = RoleGrant {
            role_id,
            role_name,
            granted_at: Utc::now(),
            granted_by,
            expires_at,
        };
        state.grants.push((user_id, grant.clone()));
        Ok(grant)
    }

    async fn revoke_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.grants.len();
        state
            .grants
            .retain(|(holder, grant)| !(*holder == user_id && grant.role_id == role_id));
        Ok(state.grants.len() != before)
    }
}

#[async_trait]
impl AuthorizationRepository for InMemoryStore {
    async fn list_role_grants_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleGrant>> {
        if self.fail_authorization_lookups.load(Ordering::SeqCst) {
            return Err(AppError::Internal("database unavailable".to_owned()));
        }
        self.list_user_grants(user_id).await
    }

    async fn list_permission_names_for_roles(&self, role_ids: &[RoleId]) -> AppResult<Vec<String>> {
        let state = self.state.lock().await;
        let names: BTreeSet<String> = state
            .role_permissions
            .iter()
            .filter(|(role_id, _)| role_ids.contains(role_id))
            .filter_map(|(_, permission_id)| {
                state
                    .permissions
                    .iter()
                    .find(|permission| permission.id == *permission_id)
                    .map(|permission| permission.name.clone())
            })
            .collect();
        Ok(names.into_iter().collect())
    }
}

#[async_trait]
impl AuditRepository for InMemoryStore {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.state.lock().await.audit.push(event);
        Ok(())
    }

    async fn list_recent_entries(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
        let state = self.state.lock().await;
        Ok(state
            .audit
            .iter()
            .rev()
            .skip(query.offset)
            .take(query.limit)
            .enumerate()
            .map(|(index, event)| AuditLogEntry {
                event_id: index.to_string(),
                subject: event.subject.clone(),
                action: event.action.as_str().to_owned(),
                resource_type: event.resource_type.clone(),
                resource_id: event.resource_id.clone(),
                detail: event.detail.clone(),
                created_at: Utc::now(),
            })
            .collect())
    }
}

#[async_trait]
impl PasswordResetTokenRepository for InMemoryStore {
    async fn create_token(
        &self,
        user_id: UserId,
        email: &str,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<uuid::Uuid> {
        let id = uuid::Uuid::new_v4();
        self.state.lock().await.tokens.push(TokenRow {
            record: PasswordResetTokenRecord {
                id,
                user_id,
                email: email.to_owned(),
                expires_at,
            },
            token_hash: token_hash.to_owned(),
            used: false,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn consume_valid_token(
        &self,
        token_hash: &str,
    ) -> AppResult<Option<PasswordResetTokenRecord>> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let token = state.tokens.iter_mut().find(|token| {
            token.token_hash == token_hash && !token.used && token.record.expires_at > now
        });

        Ok(token.map(|token| {
            token.used = true;
            token.record.clone()
        }))
    }

    async fn invalidate_tokens_for_user(&self, user_id: UserId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        for token in &mut state.tokens {
            if token.record.user_id == user_id {
                token.used = true;
            }
        }
        Ok(())
    }

    async fn count_recent_tokens(&self, email: &str, since: DateTime<Utc>) -> AppResult<i64> {
        let state = self.state.lock().await;
        Ok(state
            .tokens
            .iter()
            .filter(|token| token.record.email == email && token.created_at >= since)
            .count() as i64)
    }
}

#[async_trait]
impl EmailTemplateRepository for InMemoryStore {
    async fn list_templates(&self) -> AppResult<Vec<EmailTemplateRecord>> {
        Ok(self.state.lock().await.templates.clone())
    }

    async fn find_template(
        &self,
        template_id: EmailTemplateId,
    ) -> AppResult<Option<EmailTemplateRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .templates
            .iter()
            .find(|record| record.template.id() == template_id)
            .cloned())
    }

    async fn find_template_by_name(&self, name: &str) -> AppResult<Option<EmailTemplateRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .templates
            .iter()
            .find(|record| record.template.name() == name)
            .cloned())
    }

    async fn create_template(&self, template: &EmailTemplate) -> AppResult<EmailTemplateRecord> {
        let mut state = self.state.lock().await;
        if state
            .templates
            .iter()
            .any(|record| record.template.name() == template.name())
        {
            return Err(AppError::Conflict("template already exists".to_owned()));
        }

        let now = Utc::now();
        let record = EmailTemplateRecord {
            template: template.clone(),
            created_at: now,
            updated_at: now,
        };
        state.templates.push(record.clone());
        Ok(record)
    }

    async fn update_template(&self, template: &EmailTemplate) -> AppResult<EmailTemplateRecord> {
        let mut state = self.state.lock().await;
        let record = state
            .templates
            .iter_mut()
            .find(|record| record.template.id() == template.id())
            .ok_or_else(|| AppError::NotFound("template not found".to_owned()))?;
        record.template = template.clone();
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete_template(&self, template_id: EmailTemplateId) -> AppResult<()> {
        self.state
            .lock()
            .await
            .templates
            .retain(|record| record.template.id() != template_id);
        Ok(())
    }
}

/// Reversible stand-in for Argon2 that keeps tests fast.
pub struct FakePasswordHasher;

impl PasswordHasher for FakePasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}

/// Captures outgoing email instead of sending it.
#[derive(Default)]
pub struct RecordingEmailService {
    sent: Mutex<Vec<SentEmail>>,
}

/// One captured email.
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub text_body: String,
}

impl RecordingEmailService {
    pub async fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl EmailService for RecordingEmailService {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        _html_body: Option<&str>,
    ) -> AppResult<()> {
        self.sent.lock().await.push(SentEmail {
            to: to.to_owned(),
            subject: subject.to_owned(),
            text_body: text_body.to_owned(),
        });
        Ok(())
    }
}

/// Token service encoding claims as `user_id|email|expires_at_timestamp`.
pub struct FakeTokenService;

impl AccessTokenService for FakeTokenService {
    fn issue(&self, user_id: UserId, email: &str) -> AppResult<IssuedAccessToken> {
        let expires_at = Utc::now() + Duration::minutes(30);
        Ok(IssuedAccessToken {
            token: format!("{user_id}|{email}|{}", expires_at.timestamp()),
            expires_at,
        })
    }

    fn verify(&self, token: &str) -> Result<AccessTokenClaims, TokenRejection> {
        if token == "forged" {
            return Err(TokenRejection::InvalidSignature);
        }

        let mut parts = token.split('|');
        let (Some(user_id), Some(email), Some(expires_at), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenRejection::Malformed);
        };

        let user_id = user_id.parse::<UserId>().map_err(|_| TokenRejection::Malformed)?;
        let expires_at = expires_at
            .parse::<i64>()
            .ok()
            .and_then(|timestamp| DateTime::from_timestamp(timestamp, 0))
            .ok_or(TokenRejection::Malformed)?;

        if expires_at <= Utc::now() {
            return Err(TokenRejection::Expired);
        }

        Ok(AccessTokenClaims {
            user_id,
            email: email.to_owned(),
            issued_at: expires_at - Duration::minutes(30),
            expires_at,
        })
    }
}
