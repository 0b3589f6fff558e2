use super::registration::normalize_name;
use super::*;

impl UserService {
    /// Returns the caller's own account.
    pub async fn profile(&self, user_id: UserId) -> AppResult<UserRecord> {
        self.require_user(user_id).await
    }

    /// Updates the caller's own name fields.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        first_name: &str,
        last_name: &str,
    ) -> AppResult<UserRecord> {
        let profile = UserProfileUpdate {
            first_name: normalize_name(first_name, "first name")?,
            last_name: normalize_name(last_name, "last name")?,
        };

        self.user_repository.update_profile(user_id, &profile).await
    }
}
