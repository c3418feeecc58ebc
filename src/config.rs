use derive_more::Display;
use serde::Serialize;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TEMPLATE_PATH: &str = "public/template-final.html";
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-3-opus-20240229";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_HTTP_RETRIES: u32 = 2;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[display("claude")]
    Claude,
    #[display("openai")]
    OpenAi,
}

impl ProviderKind {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "claude" | "anthropic" => Some(Self::Claude),
            "openai" | "gpt" => Some(Self::OpenAi),
            _ => None,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Self::Claude => Self::OpenAi,
            Self::OpenAi => Self::Claude,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub model: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub template_path: String,
    pub primary: ProviderKind,
    pub claude: ProviderConfig,
    pub openai: ProviderConfig,
    pub max_tokens: u32,
    pub http_retries: u32,
}

fn non_empty(key: &str) -> Option<String> {
    envmnt::get_parse::<_, String, _>(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match non_empty(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("Unable to parse {key}={raw}, using default");
            default
        }),
        None => default,
    }
}

impl Config {
    pub fn from_env() -> Self {
        let primary = match non_empty("AI_PROVIDER") {
            Some(raw) => ProviderKind::parse(&raw).unwrap_or_else(|| {
                log::warn!("Unknown AI_PROVIDER {raw}, using claude");
                ProviderKind::Claude
            }),
            None => ProviderKind::Claude,
        };
        Self {
            port: parse_or("PORT", DEFAULT_PORT),
            template_path: non_empty("TEMPLATE_PATH")
                .unwrap_or_else(|| DEFAULT_TEMPLATE_PATH.to_string()),
            primary,
            claude: ProviderConfig {
                api_key: non_empty("CLAUDE_API_KEY"),
                model: non_empty("CLAUDE_MODEL").unwrap_or_else(|| DEFAULT_CLAUDE_MODEL.to_string()),
            },
            openai: ProviderConfig {
                api_key: non_empty("OPENAI_API_KEY"),
                model: non_empty("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            },
            max_tokens: parse_or("AI_MAX_TOKENS", DEFAULT_MAX_TOKENS),
            http_retries: parse_or("HTTP_RETRIES", DEFAULT_HTTP_RETRIES),
        }
    }

    /// Providers in attempt order: the configured primary, then the other one.
    pub fn provider_order(&self) -> [ProviderKind; 2] {
        [self.primary, self.primary.other()]
    }
}
