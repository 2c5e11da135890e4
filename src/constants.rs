/// Constants module to avoid magic numbers in the codebase

// Network Configuration
pub const DEFAULT_ENDPOINT: &str = "https://api.deepseek.com/v1";
pub const COMPLETIONS_PATH: &str = "/chat/completions";
pub const MODELS_PATH: &str = "/models";
pub const API_KEY_ENV: &str = "DEEPCHAT_API_KEY";
pub const FALLBACK_API_KEY_ENV: &str = "DEEPSEEK_API_KEY";

// Timeouts
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 600; // 10 minutes for long completions
pub const HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;

// Completion parameters (fixed by the remote API contract)
pub const MODEL_ID: &str = "deepseek-chat";
pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: usize = 2048;

// Conversation
pub const GREETING: &str = "Hello! I am your DeepSeek assistant. How can I help you today?";
pub const ERROR_PREFIX: &str = "Error: ";

// HTML surface
pub const PENDING_ELEMENT_ID: &str = "loading-indicator";

// UI Configuration
pub const UI_REFRESH_INTERVAL_MS: u64 = 50;
pub const UI_SCROLL_LINES: u16 = 3;
