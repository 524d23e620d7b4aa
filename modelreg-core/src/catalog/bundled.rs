//! Catalog data compiled into the library
//!
//! Used whenever no downloaded release exists in the config directory.
//! Paths mirror the release layout below `providers/`.

/// Release tag the bundled data corresponds to
pub const BUNDLED_VERSION: &str = "v0.1.0";

/// `(relative path, YAML contents)` for every bundled file
pub const FILES: &[(&str, &str)] = &[
    (
        "anthropic/models/claude-opus-4.yaml",
        include_str!("../../providers/anthropic/models/claude-opus-4.yaml"),
    ),
    (
        "anthropic/models/claude-sonnet-4.yaml",
        include_str!("../../providers/anthropic/models/claude-sonnet-4.yaml"),
    ),
    (
        "anthropic/provider.yaml",
        include_str!("../../providers/anthropic/provider.yaml"),
    ),
    (
        "bedrock/models/claude-sonnet-4.yaml",
        include_str!("../../providers/bedrock/models/claude-sonnet-4.yaml"),
    ),
    (
        "bedrock/provider.yaml",
        include_str!("../../providers/bedrock/provider.yaml"),
    ),
    (
        "deepseek/models/deepseek-chat.yaml",
        include_str!("../../providers/deepseek/models/deepseek-chat.yaml"),
    ),
    (
        "deepseek/models/deepseek-reasoner.yaml",
        include_str!("../../providers/deepseek/models/deepseek-reasoner.yaml"),
    ),
    (
        "deepseek/provider.yaml",
        include_str!("../../providers/deepseek/provider.yaml"),
    ),
    (
        "gemini/models/gemini-2.5-flash.yaml",
        include_str!("../../providers/gemini/models/gemini-2.5-flash.yaml"),
    ),
    (
        "gemini/models/gemini-2.5-pro.yaml",
        include_str!("../../providers/gemini/models/gemini-2.5-pro.yaml"),
    ),
    (
        "gemini/provider.yaml",
        include_str!("../../providers/gemini/provider.yaml"),
    ),
    (
        "openai/models/gpt-4.1.yaml",
        include_str!("../../providers/openai/models/gpt-4.1.yaml"),
    ),
    (
        "openai/models/gpt-4o.yaml",
        include_str!("../../providers/openai/models/gpt-4o.yaml"),
    ),
    (
        "openai/models/o3.yaml",
        include_str!("../../providers/openai/models/o3.yaml"),
    ),
    (
        "openai/provider.yaml",
        include_str!("../../providers/openai/provider.yaml"),
    ),
    (
        "openrouter/models/auto.yaml",
        include_str!("../../providers/openrouter/models/auto.yaml"),
    ),
    (
        "openrouter/provider.yaml",
        include_str!("../../providers/openrouter/provider.yaml"),
    ),
];
