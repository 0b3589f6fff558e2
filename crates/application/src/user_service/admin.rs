use rolegate_domain::validate_password;

use super::registration::normalize_name;
use super::*;

impl UserService {
    /// Lists accounts for administrators.
    pub async fn list_users(
        &self,
        actor: &AuthenticatedUser,
        query: UserListQuery,
    ) -> AppResult<UserPage> {
        require_users_permission(actor, false)?;

        let query = UserListQuery {
            limit: query.limit.clamp(1, USER_LIST_MAX_LIMIT),
            offset: query.offset,
        };
        let users = self.user_repository.list(query).await?;
        let total = self.user_repository.count().await?;

        Ok(UserPage { users, total })
    }

    /// Returns one account for administrators.
    pub async fn get_user(
        &self,
        actor: &AuthenticatedUser,
        user_id: UserId,
    ) -> AppResult<UserRecord> {
        require_users_permission(actor, false)?;
        self.require_user(user_id).await
    }

    /// Creates an account on behalf of an administrator.
    pub async fn create_user(
        &self,
        actor: &AuthenticatedUser,
        input: CreateUserInput,
    ) -> AppResult<UserRecord> {
        require_users_permission(actor, true)?;

        let email_address = EmailAddress::new(&input.email)?;
        validate_password(&input.password)?;

        let password_hash = self.password_hasher.hash_password(&input.password)?;
        let user = self
            .user_repository
            .create(NewUser {
                email: email_address.into(),
                password_hash,
                first_name: normalize_name(&input.first_name, "first name")?,
                last_name: normalize_name(&input.last_name, "last name")?,
                is_active: input.is_active,
            })
            .await?;

        self.append_audit(actor, AuditAction::UserCreated, user.id, None)
            .await?;

        Ok(user)
    }

    /// Updates an account on behalf of an administrator.
    pub async fn update_user(
        &self,
        actor: &AuthenticatedUser,
        user_id: UserId,
        input: UpdateUserInput,
    ) -> AppResult<UserRecord> {
        require_users_permission(actor, true)?;

        if user_id == actor.user_id() && input.is_active == Some(false) {
            return Err(AppError::Validation(
                "you cannot deactivate your own account".to_owned(),
            ));
        }

        let existing = self.require_user(user_id).await?;

        let email = match input.email.as_deref() {
            Some(email) => EmailAddress::new(email)?.into(),
            None => existing.email,
        };
        let first_name = match input.first_name.as_deref() {
            Some(first_name) => normalize_name(first_name, "first name")?,
            None => existing.first_name,
        };
        let last_name = match input.last_name.as_deref() {
            Some(last_name) => normalize_name(last_name, "last name")?,
            None => existing.last_name,
        };

        let new_password_hash = match input.password.as_deref() {
            Some(password) => {
                validate_password(password)?;
                Some(self.password_hasher.hash_password(password)?)
            }
            None => None,
        };

        let password_changed = new_password_hash.is_some();
        let updated = self
            .user_repository
            .update_account(
                user_id,
                &UserAccountUpdate {
                    email,
                    first_name,
                    last_name,
                    is_active: input.is_active.unwrap_or(existing.is_active),
                    password_hash: new_password_hash,
                },
            )
            .await?;

        self.append_audit(
            actor,
            AuditAction::UserUpdated,
            user_id,
            password_changed.then(|| "password reset by administrator".to_owned()),
        )
        .await?;

        Ok(updated)
    }

    /// Deletes an account and its grants. Administrators cannot delete themselves.
    pub async fn delete_user(&self, actor: &AuthenticatedUser, user_id: UserId) -> AppResult<()> {
        require_users_permission(actor, true)?;

        if user_id == actor.user_id() {
            return Err(AppError::Validation(
                "you cannot delete your own account".to_owned(),
            ));
        }

        let user = self.require_user(user_id).await?;
        self.user_repository.delete(user_id).await?;

        self.append_audit(actor, AuditAction::UserDeleted, user_id, Some(user.email))
            .await
    }
}
