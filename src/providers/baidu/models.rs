//! Qianfan model name to endpoint slug
//!
//! Each ERNIE model is served from its own path under
//! `/rpc/2.0/ai_custom/v1/wenxinworkshop/chat/`.

const ENDPOINTS: &[(&str, &str)] = &[
    ("ernie-bot-turbo", "eb-instant"),
    ("ernie-bot", "completions"),
    ("ernie-bot-4", "completions_pro"),
    ("ernie-bot-8k", "ernie_bot_8k"),
    ("ernie-3.5-8k", "completions"),
    ("ernie-4.0-8k", "completions_pro"),
    ("ernie-speed-8k", "ernie_speed"),
    ("ernie-speed-128k", "ernie-speed-128k"),
    ("ernie-lite-8k", "ernie-lite-8k"),
    ("ernie-tiny-8k", "ernie-tiny-8k"),
];

/// Endpoint slug for `model`. Unknown names (custom deployments) are used
/// as the slug directly, lowercased.
pub fn endpoint_for(model: &str) -> String {
    let normalized = model.trim().to_ascii_lowercase();
    ENDPOINTS
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, slug)| (*slug).to_string())
        .unwrap_or(normalized)
}
