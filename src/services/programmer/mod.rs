//! Programmer operations.
//!
//! Every mutating operation runs the same sequence and stops at the first
//! step that rejects: decode the body, load the target, check ownership,
//! merge, validate, save. Nothing reaches the store unless every step
//! before `save` succeeded.

pub mod authorization;
pub mod merge;
pub mod projection;
pub mod validation;

use std::sync::Arc;

pub use authorization::{authorize_mutation, require_user, AuthorizationError};
pub use merge::{merge, MalformedBody, MergeMode, RequestBody};
pub use projection::{project, project_all, ProgrammerList, ProgrammerView};
pub use validation::{FieldErrors, ValidationRules};

use crate::database::{Programmer, ProgrammerStore};
use crate::error::ApiError;
use crate::middleware::AuthUser;

pub struct ProgrammerService {
    store: Arc<dyn ProgrammerStore>,
    rules: ValidationRules,
}

impl ProgrammerService {
    pub fn new(store: Arc<dyn ProgrammerStore>, rules: ValidationRules) -> Self {
        Self { store, rules }
    }

    pub async fn list(&self) -> Result<ProgrammerList, ApiError> {
        let programmers = self.store.find_all().await?;
        Ok(project_all(&programmers))
    }

    pub async fn show(&self, nickname: &str) -> Result<ProgrammerView, ApiError> {
        let programmer = self.find_or_404(nickname).await?;
        Ok(project(&programmer))
    }

    pub async fn create(&self, raw_body: &[u8], caller: Option<&AuthUser>) -> Result<ProgrammerView, ApiError> {
        let body = RequestBody::decode(raw_body)?;
        let user = require_user(caller)?;

        let mut programmer = Programmer::new();
        let type_errors = merge(MergeMode::Replace, &body, &mut programmer, user);

        let saved = self.validate_and_save(programmer, type_errors).await?;
        tracing::info!(
            "Programmer {:?} created by {} ({})",
            saved.nickname,
            user.name,
            user.id
        );
        Ok(project(&saved))
    }

    /// PUT (`MergeMode::Replace`) and PATCH (`MergeMode::Partial`)
    pub async fn update(
        &self,
        nickname: &str,
        raw_body: &[u8],
        mode: MergeMode,
        caller: Option<&AuthUser>,
    ) -> Result<ProgrammerView, ApiError> {
        let body = RequestBody::decode(raw_body)?;
        let mut programmer = self.find_or_404(nickname).await?;
        let user = authorize_mutation(&programmer, caller)?;

        let type_errors = merge(mode, &body, &mut programmer, user);

        let saved = self.validate_and_save(programmer, type_errors).await?;
        tracing::info!("Programmer {} updated ({:?})", nickname, mode);
        Ok(project(&saved))
    }

    /// Deleting a programmer that does not exist succeeds without checks
    pub async fn delete(&self, nickname: &str, caller: Option<&AuthUser>) -> Result<(), ApiError> {
        let Some(programmer) = self.store.find_by_nickname(nickname).await? else {
            tracing::debug!("Delete of missing programmer {} is a no-op", nickname);
            return Ok(());
        };

        authorize_mutation(&programmer, caller)?;
        self.store.delete(&programmer).await?;
        tracing::info!("Programmer {} deleted", nickname);
        Ok(())
    }

    async fn find_or_404(&self, nickname: &str) -> Result<Programmer, ApiError> {
        self.store
            .find_by_nickname(nickname)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("The programmer {} does not exist!", nickname)))
    }

    async fn validate_and_save(
        &self,
        programmer: Programmer,
        mut errors: FieldErrors,
    ) -> Result<Programmer, ApiError> {
        errors.extend(self.rules.validate(&programmer, self.store.as_ref()).await?);
        if !errors.is_empty() {
            tracing::debug!("Validation failed on {:?}", errors.fields());
            return Err(ApiError::validation_error(errors));
        }

        Ok(self.store.save(programmer).await?)
    }
}
