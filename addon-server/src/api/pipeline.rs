//! Steps shared by every callback: authorize the host, identify the user,
//! load their keys, and resolve the member account behind the open email.

use crate::auth::UserIdentity;
use crate::error::UpstreamResultExt;
use crate::gmail;
use crate::openpath::OpenPathCredentials;
use crate::secrets::CredentialBundle;
use crate::state::AppState;
use neon_client::{AccountSummary, NeonApi, NeonCredentials};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::event::AddonEvent;
use std::sync::Arc;

/// Reject the callback unless the system token names our service account
pub async fn authorize(state: &AppState, event: &AddonEvent) -> AppResult<()> {
    let Some(token) = event.system_id_token() else {
        tracing::warn!("Callback without a system token");
        return Err(AppError::unauthorized());
    };
    if state.verifier.verify_caller(token).await {
        Ok(())
    } else {
        Err(AppError::unauthorized())
    }
}

/// The Gmail user behind an authorized callback
pub async fn identify(state: &AppState, event: &AddonEvent) -> AppResult<UserIdentity> {
    let token = event
        .user_id_token()
        .ok_or_else(|| AppError::new(ErrorCode::TokenInvalid))?;
    state
        .verifier
        .identify_user(token)
        .await
        .ok_or_else(|| AppError::new(ErrorCode::TokenInvalid))
}

/// An authorized user with their stored API keys
pub struct Caller {
    pub identity: UserIdentity,
    pub credentials: CredentialBundle,
}

impl Caller {
    /// Neon client bound to this user's key
    pub fn neon(&self, state: &AppState) -> Arc<dyn NeonApi> {
        state.neon.connect(NeonCredentials::new(
            state.config.neon_api_user.clone(),
            self.credentials.neon_api_key.clone(),
        ))
    }

    pub fn openpath_credentials(&self) -> OpenPathCredentials {
        OpenPathCredentials {
            user: self.credentials.openpath_user.clone(),
            key: self.credentials.openpath_key.clone(),
        }
    }
}

pub async fn caller(state: &AppState, event: &AddonEvent) -> AppResult<Caller> {
    authorize(state, event).await?;
    let identity = identify(state, event).await?;
    let credentials = state.credentials.get_user_keys(&identity).await?;
    Ok(Caller {
        identity,
        credentials,
    })
}

/// Exactly one Neon account for the email
pub async fn resolve_account(neon: &dyn NeonApi, email: &str) -> AppResult<AccountSummary> {
    let mut accounts = neon
        .search_accounts_by_email(email)
        .await
        .or_failed(ErrorCode::AccountLookupFailed, "Account lookup")?;
    match accounts.len() {
        0 => Err(AppError::account_not_found()),
        1 => Ok(accounts.remove(0)),
        count => {
            tracing::info!(count, "Email matches several Neon accounts");
            Err(AppError::multiple_accounts(count))
        }
    }
}

/// The member the open email is about
pub struct Member {
    pub email: String,
    pub account: AccountSummary,
}

pub async fn member(state: &AppState, event: &AddonEvent, neon: &dyn NeonApi) -> AppResult<Member> {
    let email = gmail::member_email(state.mail.as_ref(), event, &state.config.org_domain).await?;
    let account = resolve_account(neon, &email).await?;
    tracing::debug!(account_id = %account.account_id, "Resolved member account");
    Ok(Member { email, account })
}
