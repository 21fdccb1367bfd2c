use async_trait::async_trait;
use chrono::{DateTime, Utc};
use taskhub_application::{
    AccessTokenRepository, NewUser, ProfileUpdate, UserRecord, UserRepository,
};
use taskhub_core::{AppError, AppResult};
use taskhub_domain::{UserId, UserProfile};

use super::{InMemoryAccessRepository, StoredToken};

#[async_trait]
impl UserRepository for InMemoryAccessRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|user| user.profile.username == username)
            .cloned())
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self.state.read().await.users.get(&user_id).cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<UserRecord> {
        let mut state = self.state.write().await;
        if state.users.values().any(|existing| {
            existing.profile.username == user.username.as_str()
                || existing.profile.email == user.email.as_str()
        }) {
            return Err(AppError::Conflict(
                "an account with this username or email already exists".to_owned(),
            ));
        }

        let record = UserRecord {
            profile: UserProfile {
                id: UserId::new(),
                username: user.username.into(),
                email: user.email.into(),
                first_name: user.first_name,
                last_name: user.last_name,
            },
            password_hash: user.password_hash,
            is_active: true,
            created_at: Utc::now(),
            last_login_at: None,
        };
        state.users.insert(record.profile.id, record.clone());
        Ok(record)
    }

    async fn record_login(&self, user_id: UserId, at: DateTime<Utc>) -> AppResult<()> {
        let mut state = self.state.write().await;
        if let Some(user) = state.users.get_mut(&user_id) {
            user.last_login_at = Some(at);
        }
        Ok(())
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> AppResult<Option<UserRecord>> {
        let mut state = self.state.write().await;
        if let Some(email) = &update.email
            && state
                .users
                .values()
                .any(|user| user.profile.id != user_id && user.profile.email == email.as_str())
        {
            return Err(AppError::Conflict(
                "an account with this username or email already exists".to_owned(),
            ));
        }

        let Some(user) = state.users.get_mut(&user_id) else {
            return Ok(None);
        };
        if let Some(first_name) = &update.first_name {
            user.profile.first_name.clone_from(first_name);
        }
        if let Some(last_name) = &update.last_name {
            user.profile.last_name.clone_from(last_name);
        }
        if let Some(email) = &update.email {
            user.profile.email = email.as_str().to_owned();
        }
        if let Some(is_active) = update.is_active {
            user.is_active = is_active;
        }
        Ok(Some(user.clone()))
    }

    async fn update_password_hash(&self, user_id: UserId, password_hash: &str) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let Some(user) = state.users.get_mut(&user_id) else {
            return Ok(false);
        };
        user.password_hash = password_hash.to_owned();
        Ok(true)
    }
}

#[async_trait]
impl AccessTokenRepository for InMemoryAccessRepository {
    async fn store_token(
        &self,
        token_hash: &str,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.tokens.insert(
            token_hash.to_owned(),
            StoredToken {
                user_id,
                expires_at,
                revoked_at: None,
            },
        );
        Ok(())
    }

    async fn find_active_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UserId>> {
        let state = self.state.read().await;
        Ok(state
            .tokens
            .get(token_hash)
            .filter(|token| token.is_active(now))
            .map(|token| token.user_id))
    }

    async fn revoke_token(&self, token_hash: &str, at: DateTime<Utc>) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let Some(token) = state
            .tokens
            .get_mut(token_hash)
            .filter(|token| token.is_active(at))
        else {
            return Ok(false);
        };

        token.revoked_at = Some(at);
        Ok(true)
    }
}
