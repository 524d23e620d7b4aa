//! Invariant checks for catalog records
//!
//! Bundled and downloaded data is trusted; validation runs on every provider
//! that caller-supplied data was folded into.

use super::types::{AuthType, Model, Provider};
use crate::error::ValidationError;

impl Provider {
    /// Check this provider and every model it owns.
    ///
    /// Returns the first violated invariant. Models are visited in name order
    /// so the reported error is stable.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyProviderName);
        }

        if self.auth_type == Some(AuthType::ApiKey) && self.api_key.is_empty() {
            return Err(ValidationError::MissingApiKey {
                provider: self.name.clone(),
            });
        }

        for model in self.models.values() {
            model.validate_for(&self.name)?;
        }

        Ok(())
    }
}

impl Model {
    /// Check this model's own invariants, reporting `provider` as its owner
    pub fn validate_for(&self, provider: &str) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyModelName {
                provider: provider.to_string(),
            });
        }

        let Some(chat) = &self.apis.chat_completion else {
            return Ok(());
        };

        let context = chat.context;
        if context.max_input <= 0 {
            return Err(ValidationError::NonPositiveMaxInput {
                provider: provider.to_string(),
                model: self.name.clone(),
                value: context.max_input,
            });
        }
        if context.max_output <= 0 {
            return Err(ValidationError::NonPositiveMaxOutput {
                provider: provider.to_string(),
                model: self.name.clone(),
                value: context.max_output,
            });
        }
        if context.max_output > context.max_input {
            return Err(ValidationError::OutputExceedsInput {
                provider: provider.to_string(),
                model: self.name.clone(),
                max_input: context.max_input,
                max_output: context.max_output,
            });
        }
        if chat.parameters.max_tokens <= 0 {
            return Err(ValidationError::NonPositiveMaxTokens {
                provider: provider.to_string(),
                model: self.name.clone(),
                value: chat.parameters.max_tokens,
            });
        }

        Ok(())
    }

    /// Check this model against its recorded owner
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_for(&self.provider)
    }
}
