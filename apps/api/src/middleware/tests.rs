use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, HeaderValue, Request, StatusCode, header};
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use chrono::{DateTime, Duration, Utc};
use rolegate_application::{
    AccessTokenClaims, AccessTokenService, AuthenticatedUser, AuthenticationService,
    AuthorizationRepository, AuthorizationService, IssuedAccessToken, NewUser, UserAccountUpdate,
    UserListQuery, UserProfileUpdate, UserRecord, UserRepository,
};
use rolegate_core::{AppError, AppResult, TokenRejection};
use rolegate_domain::{AccessRequirement, RoleGrant, RoleId, UserId};
use tower::ServiceExt;

use super::{extract_bearer, require_access, require_auth};

const VALID_TOKEN: &str = "valid-token";
const EXPIRED_TOKEN: &str = "expired-token";

struct FakeTokenService {
    user_id: UserId,
}

impl AccessTokenService for FakeTokenService {
    fn issue(&self, _user_id: UserId, _email: &str) -> AppResult<IssuedAccessToken> {
        Err(AppError::Internal("not used".to_owned()))
    }

    fn verify(&self, token: &str) -> Result<AccessTokenClaims, TokenRejection> {
        match token {
            VALID_TOKEN => Ok(AccessTokenClaims {
                user_id: self.user_id,
                email: "alice@example.com".to_owned(),
                issued_at: Utc::now(),
                expires_at: Utc::now() + Duration::minutes(5),
            }),
            EXPIRED_TOKEN => Err(TokenRejection::Expired),
            _ => Err(TokenRejection::InvalidSignature),
        }
    }
}

struct FakeUserRepository {
    users: HashMap<UserId, UserRecord>,
}

fn unused<T>() -> AppResult<T> {
    Err(AppError::Internal("not used".to_owned()))
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_email(&self, _email: &str) -> AppResult<Option<UserRecord>> {
        unused()
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self.users.get(&user_id).cloned())
    }

    async fn list(&self, _query: UserListQuery) -> AppResult<Vec<UserRecord>> {
        unused()
    }

    async fn count(&self) -> AppResult<i64> {
        unused()
    }

    async fn create(&self, _user: NewUser) -> AppResult<UserRecord> {
        unused()
    }

    async fn update_profile(
        &self,
        _user_id: UserId,
        _profile: &UserProfileUpdate,
    ) -> AppResult<UserRecord> {
        unused()
    }

    async fn update_account(
        &self,
        _user_id: UserId,
        _update: &UserAccountUpdate,
    ) -> AppResult<UserRecord> {
        unused()
    }

    async fn update_password(&self, _user_id: UserId, _password_hash: &str) -> AppResult<()> {
        unused()
    }

    async fn record_failed_login(
        &self,
        _user_id: UserId,
        _lock_threshold: i32,
        _locked_until: DateTime<Utc>,
    ) -> AppResult<()> {
        unused()
    }

    async fn record_successful_login(&self, _user_id: UserId) -> AppResult<()> {
        unused()
    }

    async fn delete(&self, _user_id: UserId) -> AppResult<()> {
        unused()
    }
}

struct FakeAuthorizationRepository {
    role_id: RoleId,
    role_name: String,
}

#[async_trait]
impl AuthorizationRepository for FakeAuthorizationRepository {
    async fn list_role_grants_for_user(&self, _user_id: UserId) -> AppResult<Vec<RoleGrant>> {
        Ok(vec![RoleGrant {
            role_id: self.role_id,
            role_name: self.role_name.clone(),
            granted_at: Utc::now(),
            granted_by: None,
            expires_at: None,
        }])
    }

    async fn list_permission_names_for_roles(
        &self,
        _role_ids: &[RoleId],
    ) -> AppResult<Vec<String>> {
        Ok(vec!["users.read".to_owned()])
    }
}

fn user_record(user_id: UserId, is_active: bool) -> UserRecord {
    let now = Utc::now();
    UserRecord {
        id: user_id,
        email: "alice@example.com".to_owned(),
        password_hash: "hash".to_owned(),
        first_name: "Alice".to_owned(),
        last_name: "Liddell".to_owned(),
        is_active,
        failed_login_count: 0,
        locked_until: None,
        last_login_at: None,
        created_at: now,
        updated_at: now,
    }
}

fn authentication_service(role_name: &str, is_active: bool) -> AuthenticationService {
    let user_id = UserId::new();
    let users = HashMap::from([(user_id, user_record(user_id, is_active))]);

    AuthenticationService::new(
        Arc::new(FakeTokenService { user_id }),
        Arc::new(FakeUserRepository { users }),
        AuthorizationService::new(Arc::new(FakeAuthorizationRepository {
            role_id: RoleId::new(),
            role_name: role_name.to_owned(),
        })),
    )
}

async fn whoami(axum::Extension(user): axum::Extension<AuthenticatedUser>) -> String {
    user.identity().email().to_owned()
}

fn router(role_name: &str, is_active: bool, requirement: AccessRequirement) -> Router {
    let admin_routes = Router::new()
        .route("/admin", get(whoami))
        .route_layer(from_fn_with_state(requirement, require_access));

    Router::new()
        .route("/me", get(whoami))
        .merge(admin_routes)
        .route_layer(from_fn_with_state(
            authentication_service(role_name, is_active),
            require_auth,
        ))
}

async fn status_of(app: Router, path: &str, authorization: Option<&str>) -> StatusCode {
    let mut builder = Request::builder().uri(path);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let request = builder
        .body(Body::empty())
        .unwrap_or_else(|error| panic!("request should build: {error}"));

    app.oneshot(request)
        .await
        .unwrap_or_else(|error| panic!("router should respond: {error}"))
        .status()
}

#[test]
fn extract_bearer_requires_scheme_and_token() {
    let mut headers = HeaderMap::new();
    assert_eq!(extract_bearer(&headers), None);

    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer  abc "));
    assert_eq!(extract_bearer(&headers), Some("abc"));

    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
    assert_eq!(extract_bearer(&headers), None);

    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));
    assert_eq!(extract_bearer(&headers), None);
}

#[tokio::test]
async fn missing_or_rejected_tokens_are_unauthorized() {
    let requirement = AccessRequirement::any_role(["admin"]);

    assert_eq!(
        status_of(router("admin", true, requirement.clone()), "/me", None).await,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        status_of(
            router("admin", true, requirement.clone()),
            "/me",
            Some("Bearer forged-token")
        )
        .await,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        status_of(
            router("admin", true, requirement),
            "/me",
            Some("Bearer expired-token")
        )
        .await,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn inactive_account_is_unauthorized_even_with_valid_token() {
    let status = status_of(
        router("admin", false, AccessRequirement::any_role(["admin"])),
        "/me",
        Some("Bearer valid-token"),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_token_reaches_authenticated_route() {
    let status = status_of(
        router("user", true, AccessRequirement::any_role(["admin"])),
        "/me",
        Some("Bearer valid-token"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn admin_route_requires_any_configured_role() {
    let denied = status_of(
        router("user", true, AccessRequirement::any_role(["admin", "owner"])),
        "/admin",
        Some("Bearer valid-token"),
    )
    .await;
    let allowed = status_of(
        router("owner", true, AccessRequirement::any_role(["admin", "owner"])),
        "/admin",
        Some("Bearer valid-token"),
    )
    .await;

    assert_eq!(denied, StatusCode::FORBIDDEN);
    assert_eq!(allowed, StatusCode::OK);
}

#[tokio::test]
async fn permission_requirement_uses_resolved_permissions() {
    let allowed = status_of(
        router("auditor", true, AccessRequirement::permission("users.read")),
        "/admin",
        Some("Bearer valid-token"),
    )
    .await;
    let denied = status_of(
        router("auditor", true, AccessRequirement::permission("users.write")),
        "/admin",
        Some("Bearer valid-token"),
    )
    .await;

    assert_eq!(allowed, StatusCode::OK);
    assert_eq!(denied, StatusCode::FORBIDDEN);
}

