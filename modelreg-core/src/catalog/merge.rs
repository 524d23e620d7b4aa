//! Layered merge of catalog records
//!
//! Bundled data, downloaded updates and caller overrides are all combined by
//! applying one record's non-zero fields onto another. A field that holds
//! its type's zero value (empty string, `0`, `false`, `None`) in the override
//! is treated as absent, so an override can never reset a field to zero.
//! Parameter extras merge per key and always overwrite, since a key being
//! present is the only signal a map entry carries.

use super::types::{ChatCompletion, Model, Parameters, Provider};

/// Assign `source` to `target` unless `source` is the zero value of `T`
pub fn set_if_not_zero<T>(target: &mut T, source: &T)
where
    T: PartialEq + Default + Clone,
{
    if *source != T::default() {
        target.clone_from(source);
    }
}

impl Provider {
    /// Apply `other`'s non-zero fields onto this provider.
    ///
    /// The name is the merge key and is left untouched. Models present on
    /// both sides merge recursively; models only in `other` are copied in and
    /// re-pointed at this provider.
    pub fn merge(&mut self, other: &Provider) {
        set_if_not_zero(&mut self.provider_type, &other.provider_type);
        set_if_not_zero(&mut self.auth_type, &other.auth_type);
        set_if_not_zero(&mut self.api_key, &other.api_key);
        set_if_not_zero(&mut self.base_url, &other.base_url);
        set_if_not_zero(&mut self.description, &other.description);

        for (name, incoming) in &other.models {
            match self.models.get_mut(name) {
                Some(existing) => existing.merge(incoming),
                None => {
                    let mut copied = incoming.clone();
                    copied.provider.clone_from(&self.name);
                    self.models.insert(name.clone(), copied);
                }
            }
        }
    }

    /// Independent deep copy whose models all point back at the copy
    pub fn deep_copy(&self) -> Provider {
        let mut copied = self.clone();
        copied.relink_models();
        copied
    }
}

impl Model {
    /// Apply `other`'s non-zero fields onto this model.
    ///
    /// A chat-completion descriptor only on the override side is copied over
    /// whole; one on both sides merges field by field.
    pub fn merge(&mut self, other: &Model) {
        set_if_not_zero(&mut self.name, &other.name);

        if let Some(incoming) = &other.apis.chat_completion {
            match self.apis.chat_completion.as_mut() {
                Some(existing) => existing.merge(incoming),
                None => self.apis.chat_completion = Some(incoming.clone()),
            }
        }
    }
}

impl ChatCompletion {
    pub fn merge(&mut self, other: &ChatCompletion) {
        set_if_not_zero(&mut self.api_format, &other.api_format);
        set_if_not_zero(&mut self.endpoint, &other.endpoint);

        set_if_not_zero(&mut self.context.max_input, &other.context.max_input);
        set_if_not_zero(&mut self.context.max_output, &other.context.max_output);

        let features = &mut self.features;
        set_if_not_zero(&mut features.tool_use, &other.features.tool_use);
        set_if_not_zero(&mut features.thinking, &other.features.thinking);
        set_if_not_zero(&mut features.thinking_levels, &other.features.thinking_levels);
        set_if_not_zero(&mut features.structured_output, &other.features.structured_output);
        set_if_not_zero(&mut features.audio_input, &other.features.audio_input);
        set_if_not_zero(&mut features.image_output, &other.features.image_output);

        self.parameters.merge(&other.parameters);
    }
}

impl Parameters {
    pub fn merge(&mut self, other: &Parameters) {
        set_if_not_zero(&mut self.temperature, &other.temperature);
        set_if_not_zero(&mut self.max_tokens, &other.max_tokens);

        for (key, value) in &other.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{ApiFormat, Apis, AuthType, Context, Features, ProviderType};
    use pretty_assertions::assert_eq;
    use serde_yaml_ng::Value;

    fn gpt4_base() -> Provider {
        let mut base = Provider {
            name: "openai".to_string(),
            provider_type: Some(ProviderType::Api),
            auth_type: Some(AuthType::ApiKey),
            api_key: "base-key".to_string(),
            base_url: "https://api.openai.com".to_string(),
            description: "Base description".to_string(),
            ..Default::default()
        };
        base.insert_model(Model {
            name: "gpt-4".to_string(),
            apis: Apis {
                chat_completion: Some(ChatCompletion {
                    api_format: Some(ApiFormat::Openai),
                    endpoint: "/v1/chat/completions".to_string(),
                    context: Context {
                        max_input: 8000,
                        max_output: 4000,
                    },
                    features: Features {
                        tool_use: true,
                        structured_output: true,
                        ..Default::default()
                    },
                    parameters: Parameters {
                        temperature: 0.7,
                        ..Default::default()
                    },
                }),
            },
            ..Default::default()
        });
        base
    }

    fn gpt4_override() -> Provider {
        let mut over = Provider {
            name: "openai".to_string(),
            api_key: "override-key".to_string(),
            base_url: "https://custom.api.com".to_string(),
            ..Default::default()
        };
        over.insert_model(Model {
            name: "gpt-4".to_string(),
            apis: Apis {
                chat_completion: Some(ChatCompletion {
                    context: Context {
                        max_input: 0,
                        max_output: 8000,
                    },
                    parameters: Parameters {
                        max_tokens: 1000,
                        ..Default::default()
                    },
                    ..Default::default()
                }),
            },
            ..Default::default()
        });
        over.insert_model(Model {
            name: "gpt-3.5".to_string(),
            apis: Apis {
                chat_completion: Some(ChatCompletion {
                    api_format: Some(ApiFormat::Openai),
                    endpoint: "/v1/chat/completions".to_string(),
                    ..Default::default()
                }),
            },
            ..Default::default()
        });
        over
    }

    #[test]
    fn test_set_if_not_zero() {
        let mut s = "old".to_string();
        set_if_not_zero(&mut s, &String::new());
        assert_eq!(s, "old");
        set_if_not_zero(&mut s, &"new".to_string());
        assert_eq!(s, "new");

        let mut flag = true;
        set_if_not_zero(&mut flag, &false);
        assert!(flag);

        let mut n = 100i64;
        set_if_not_zero(&mut n, &0);
        assert_eq!(n, 100);
        set_if_not_zero(&mut n, &-50);
        assert_eq!(n, -50);

        let mut kind = Some(ProviderType::Api);
        set_if_not_zero(&mut kind, &None);
        assert_eq!(kind, Some(ProviderType::Api));
        set_if_not_zero(&mut kind, &Some(ProviderType::Subscription));
        assert_eq!(kind, Some(ProviderType::Subscription));
    }

    #[test]
    fn test_provider_merge() {
        let mut base = gpt4_base();
        base.merge(&gpt4_override());

        assert_eq!(base.api_key, "override-key");
        assert_eq!(base.base_url, "https://custom.api.com");
        assert_eq!(base.description, "Base description");
        assert_eq!(base.provider_type, Some(ProviderType::Api));
        assert_eq!(base.models.len(), 2);

        let chat = base.models["gpt-4"].chat_completion().unwrap();
        assert_eq!(chat.context.max_input, 8000);
        assert_eq!(chat.context.max_output, 8000);
        assert_eq!(chat.parameters.temperature, 0.7);
        assert_eq!(chat.parameters.max_tokens, 1000);
        assert!(chat.features.tool_use);

        assert_eq!(base.models["gpt-3.5"].provider, "openai");
    }

    #[test]
    fn test_merge_repoints_new_models_at_target() {
        let mut base = Provider::new("mine");
        let mut other = Provider::new("mine");
        let mut stray = Model::new("m");
        stray.provider = "somewhere-else".to_string();
        other.models.insert("m".to_string(), stray);

        base.merge(&other);
        assert_eq!(base.models["m"].provider, "mine");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let over = gpt4_override();

        let mut once = gpt4_base();
        once.merge(&over);

        let mut twice = once.clone();
        twice.merge(&over);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_model_merge_renames_and_keeps_unset_fields() {
        let mut base = gpt4_base().models["gpt-4"].clone();
        let over = Model {
            name: "gpt-4-turbo".to_string(),
            apis: Apis {
                chat_completion: Some(ChatCompletion {
                    features: Features {
                        thinking: true,
                        ..Default::default()
                    },
                    ..Default::default()
                }),
            },
            ..Default::default()
        };

        base.merge(&over);

        assert_eq!(base.name, "gpt-4-turbo");
        let chat = base.chat_completion().unwrap();
        assert!(chat.features.thinking);
        assert!(chat.features.tool_use);
        assert_eq!(chat.context.max_input, 8000);
    }

    #[test]
    fn test_model_merge_adopts_missing_chat_completion() {
        let mut base = Model::new("bare");
        let over = gpt4_base().models["gpt-4"].clone();

        base.merge(&over);

        assert_eq!(base.name, "gpt-4");
        assert_eq!(base.apis, over.apis);
    }

    #[test]
    fn test_chat_completion_merge_extras() {
        let mut base = ChatCompletion {
            parameters: Parameters {
                temperature: 0.7,
                extra: [
                    ("top_p".to_string(), Value::from(0.9)),
                    ("seed".to_string(), Value::from(7)),
                ]
                .into_iter()
                .collect(),
                ..Default::default()
            },
            ..Default::default()
        };
        let over = ChatCompletion {
            endpoint: "/v1/chat/completions/new".to_string(),
            parameters: Parameters {
                temperature: 0.5,
                max_tokens: 1000,
                extra: [("seed".to_string(), Value::Null)].into_iter().collect(),
            },
            ..Default::default()
        };

        base.merge(&over);

        assert_eq!(base.endpoint, "/v1/chat/completions/new");
        assert_eq!(base.parameters.temperature, 0.5);
        assert_eq!(base.parameters.max_tokens, 1000);
        assert_eq!(base.parameters.extra["top_p"], Value::from(0.9));
        // present key wins even when its value is null
        assert_eq!(base.parameters.extra["seed"], Value::Null);
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let original = gpt4_base();
        let mut copied = original.deep_copy();

        assert_eq!(copied, original);
        assert_eq!(copied.models["gpt-4"].provider, "openai");

        copied.api_key = "new-key".to_string();
        copied.name = "openai-copy".to_string();
        copied.relink_models();
        copied
            .models
            .get_mut("gpt-4")
            .and_then(|m| m.apis.chat_completion.as_mut())
            .unwrap()
            .context
            .max_input = 1;

        assert_eq!(original.api_key, "base-key");
        assert_eq!(original.models["gpt-4"].provider, "openai");
        assert_eq!(
            original.models["gpt-4"].chat_completion().unwrap().context.max_input,
            8000
        );
    }
}
