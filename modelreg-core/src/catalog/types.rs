//! Provider and model capability descriptors
//!
//! These records map 1:1 to the YAML files shipped in the catalog:
//! `provider.yaml` decodes into a [`Provider`], every other `.yaml` file
//! under a provider directory decodes into a [`Model`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How a provider is offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    /// Pay-per-token API access
    Api,
    /// Access bundled with a consumer subscription
    Subscription,
    /// A router in front of several upstream vendors
    Aggregator,
}

/// Credential scheme a provider expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    ApiKey,
    Oauth2,
    AwsCredentials,
}

/// Wire format spoken by a chat-completion endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiFormat {
    Openai,
    Anthropic,
    Gemini,
    Codex,
    Bedrock,
}

impl ProviderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Api => "api",
            ProviderType::Subscription => "subscription",
            ProviderType::Aggregator => "aggregator",
        }
    }
}

impl AuthType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::ApiKey => "api_key",
            AuthType::Oauth2 => "oauth2",
            AuthType::AwsCredentials => "aws_credentials",
        }
    }
}

impl ApiFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiFormat::Openai => "openai",
            ApiFormat::Anthropic => "anthropic",
            ApiFormat::Gemini => "gemini",
            ApiFormat::Codex => "codex",
            ApiFormat::Bedrock => "bedrock",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ApiFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An upstream AI vendor or endpoint configuration (provider.yaml)
///
/// Enum-valued fields are optional: `None` is the "unset" value that the
/// merge rules treat as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    /// Unique provider key, e.g. `"openai"`
    pub name: String,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub provider_type: Option<ProviderType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<AuthType>,

    /// Secret; required when `auth_type` is `api_key`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_url: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Models keyed by model name.
    ///
    /// The loader ignores this field in provider manifests and attaches
    /// models from their own files; custom providers supplied through
    /// configuration may declare models inline.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub models: BTreeMap<String, Model>,
}

/// A named capability profile belonging to exactly one provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,

    /// Name of the owning provider. Rewritten whenever the model is attached
    /// to a provider; never read from data files.
    #[serde(skip)]
    pub provider: String,

    #[serde(default)]
    pub apis: Apis,
}

/// API surfaces a model exposes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Apis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_completion: Option<ChatCompletion>,
}

/// Chat-completion capability descriptor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_format: Option<ApiFormat>,

    /// Endpoint path relative to the provider's base URL
    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub context: Context,

    #[serde(default)]
    pub features: Features,

    #[serde(default)]
    pub parameters: Parameters,
}

/// Context window limits in tokens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default)]
    pub max_input: i64,
    #[serde(default)]
    pub max_output: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    #[serde(default)]
    pub tool_use: bool,
    #[serde(default)]
    pub thinking: bool,
    #[serde(default)]
    pub thinking_levels: bool,
    #[serde(default)]
    pub structured_output: bool,
    #[serde(default)]
    pub audio_input: bool,
    #[serde(default)]
    pub image_output: bool,
}

/// Default request parameters
///
/// Keys other than `temperature` and `max_tokens` are collected into
/// `extra` for provider-specific settings (`top_p`, `reasoning_effort`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    #[serde(default)]
    pub temperature: f64,

    #[serde(default)]
    pub max_tokens: i64,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml_ng::Value>,
}

impl Provider {
    /// Create an empty provider with just a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Attach a model, pointing its back-reference at this provider.
    ///
    /// The model is keyed by its own name; an existing entry is replaced.
    pub fn insert_model(&mut self, mut model: Model) {
        model.provider = self.name.clone();
        self.models.insert(model.name.clone(), model);
    }

    /// Look up a model by name
    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    /// Rewrite every model's back-reference to this provider
    pub(crate) fn relink_models(&mut self) {
        for model in self.models.values_mut() {
            model.provider.clone_from(&self.name);
        }
    }
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Shorthand for `apis.chat_completion`
    pub fn chat_completion(&self) -> Option<&ChatCompletion> {
        self.apis.chat_completion.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_yaml_parse() {
        let yaml = r#"
name: openai
type: api
auth_type: api_key
base_url: https://api.openai.com
description: OpenAI platform
"#;
        let provider: Provider = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(provider.name, "openai");
        assert_eq!(provider.provider_type, Some(ProviderType::Api));
        assert_eq!(provider.auth_type, Some(AuthType::ApiKey));
        assert!(provider.api_key.is_empty());
        assert!(provider.models.is_empty());
    }

    #[test]
    fn test_model_yaml_parse_with_extra_parameters() {
        let yaml = r#"
name: o3
apis:
  chat_completion:
    api_format: openai
    endpoint: /v1/chat/completions
    context:
      max_input: 200000
      max_output: 100000
    features:
      tool_use: true
      thinking: true
    parameters:
      max_tokens: 32000
      reasoning_effort: medium
"#;
        let model: Model = serde_yaml_ng::from_str(yaml).unwrap();
        let chat = model.chat_completion().unwrap();
        assert_eq!(chat.api_format, Some(ApiFormat::Openai));
        assert_eq!(chat.context.max_input, 200_000);
        assert!(chat.features.thinking);
        assert!(!chat.features.audio_input);
        assert_eq!(chat.parameters.max_tokens, 32_000);
        assert_eq!(chat.parameters.temperature, 0.0);
        assert_eq!(
            chat.parameters.extra.get("reasoning_effort"),
            Some(&serde_yaml_ng::Value::from("medium"))
        );
        assert!(model.provider.is_empty());
    }

    #[test]
    fn test_model_without_apis() {
        let model: Model = serde_yaml_ng::from_str("name: embed-only\n").unwrap();
        assert!(model.chat_completion().is_none());
    }

    #[test]
    fn test_unknown_enum_value_is_decode_error() {
        let result: Result<Provider, _> = serde_yaml_ng::from_str("name: x\ntype: freemium\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_insert_model_sets_back_reference() {
        let mut provider = Provider::new("acme");
        provider.insert_model(Model::new("m1"));
        assert_eq!(provider.model("m1").unwrap().provider, "acme");
    }
}
