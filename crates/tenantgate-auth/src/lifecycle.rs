//! Password lifecycle
//!
//! Changing and resetting passwords. These are the only operations that
//! replace a stored digest after an account is created.

use tenantgate_org::Identity;
use tenantgate_rbac::Operation;
use tenantgate_store::IdentityStore;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::jwt::IssuedToken;
use crate::service::{enforce, AuthService};
use crate::validation::require;

impl<S: IdentityStore + ?Sized> AuthService<S> {
    /// Change the caller's own password.
    ///
    /// # Arguments
    ///
    /// * `caller` - Authenticated caller
    /// * `old_password` - Current password, as proof
    /// * `new_password` - Replacement password
    ///
    /// # Returns
    ///
    /// A fresh token so the session continues, or:
    /// - [`AuthError::InvalidOldPassword`] if `old_password` is wrong
    /// - [`AuthError::Validation`] if the new password equals the old one or is out of bounds
    #[instrument(skip(self, caller, old_password, new_password), fields(user_id = %caller.user_id))]
    pub async fn change_password(
        &self,
        caller: &Identity,
        old_password: &str,
        new_password: &str,
    ) -> AuthResult<IssuedToken> {
        enforce(
            caller,
            &Operation::ChangePassword {
                target_user_id: caller.user_id,
            },
        )?;
        require("old password", old_password)?;
        require("new password", new_password)?;

        let mut user = self
            .store
            .find_user_by_id(caller.user_id)
            .await?
            .ok_or_else(|| AuthError::NotFound("user".to_string()))?;

        if !self.hasher.verify_async(user.password_hash(), old_password).await {
            warn!("Password change with wrong old password");
            return Err(AuthError::InvalidOldPassword);
        }

        if old_password == new_password {
            return Err(AuthError::Validation(
                "new password must differ from the old password".to_string(),
            ));
        }
        self.policy.check_password(new_password)?;

        let digest = self.hasher.hash_async(new_password).await?;
        user.replace_password_hash(digest);
        self.store.save_user(&user).await?;

        info!("Password changed");
        self.tokens
            .issue(user.id, &user.username, user.role, user.organization_id)
    }

    /// Set another account's password without proof of the old one.
    ///
    /// Super-admins may reset anyone. Organization admins may reset
    /// non-admin accounts of their own organization.
    ///
    /// # Returns
    ///
    /// - [`AuthError::Forbidden`] if the caller's role cannot reset passwords at all,
    ///   or the target is outside its scope
    /// - [`AuthError::NotFound`] if the target does not exist
    /// - [`AuthError::Validation`] if the new password is out of bounds
    #[instrument(skip(self, caller, new_password), fields(caller = %caller.user_id))]
    pub async fn reset_password(
        &self,
        caller: &Identity,
        target_user_id: Uuid,
        new_password: &str,
    ) -> AuthResult<()> {
        enforce(caller, &Operation::ResetPasswordAny)?;

        self.policy.check_password(new_password)?;

        let mut target = self
            .store
            .find_user_by_id(target_user_id)
            .await?
            .ok_or_else(|| AuthError::NotFound("user".to_string()))?;

        enforce(
            caller,
            &Operation::ResetPassword {
                target_organization_id: target.organization_id,
                target_role: target.role,
            },
        )?;

        let digest = self.hasher.hash_async(new_password).await?;
        target.replace_password_hash(digest);
        self.store.save_user(&target).await?;

        info!(target_user_id = %target.id, "Password reset");
        Ok(())
    }
}
