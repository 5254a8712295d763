//! Configuration management
//!
//! 設定は以下の優先順位で読み込まれます:
//! 1. 環境変数
//! 2. fact-hub.toml 設定ファイル
//! 3. デフォルト値
//!
//! 設定ファイル内では `${VAR_NAME}` 形式で環境変数を展開できます。

use serde::{Deserialize, Serialize};
use std::path::Path;

use fact_calendar::MonthView;

use crate::Error;

/// Default config file looked up by [`Config::load`]
pub const CONFIG_FILE: &str = "fact-hub.toml";

/// LLM Provider type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Google Gemini `generateContent` API
    #[default]
    Gemini,
    /// OpenAI-compatible chat completions API
    OpenAi,
}

impl LlmProvider {
    /// Parse a provider name; anything unknown falls back to Gemini
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "openai" | "glm" | "zai" | "minimax" => LlmProvider::OpenAi,
            _ => LlmProvider::Gemini,
        }
    }
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key. May be empty: chat calls then fail and fall back.
    #[serde(skip_serializing, default)]
    pub api_key: String,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// API provider
    #[serde(default)]
    pub provider: LlmProvider,

    /// Base URL (optional, for custom endpoints)
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            provider: LlmProvider::Gemini,
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// HTTP API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Bind address
    #[serde(default = "default_api_host")]
    pub host: String,

    /// Port for HTTP API server
    #[serde(default = "default_api_port")]
    pub port: u16,

    /// Allowed CORS origins (e.g., ["http://localhost:5173"])
    /// If empty, any origin is allowed
    #[serde(default)]
    pub allowed_origins: Option<Vec<String>>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_api_host(),
            port: default_api_port(),
            allowed_origins: None,
        }
    }
}

fn default_api_host() -> String {
    "127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
    3000
}

/// Calendar configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Year shown when the calendar first opens
    #[serde(default = "default_start_year")]
    pub start_year: i32,

    /// Month (1-12) shown when the calendar first opens
    #[serde(default = "default_start_month")]
    pub start_month: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            start_year: default_start_year(),
            start_month: default_start_month(),
        }
    }
}

fn default_start_year() -> i32 {
    2025
}

fn default_start_month() -> u32 {
    10
}

/// Simulated conversation pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Whether typing delays are applied at all
    #[serde(default = "default_true")]
    pub delays_enabled: bool,

    /// Pause before the teammate starts "typing" after a connection
    #[serde(default = "default_connect_delay_ms")]
    pub connect_delay_ms: u64,

    /// Fixed part of the teammate typing delay
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,

    /// Upper bound of the random part of the teammate typing delay
    #[serde(default = "default_reply_jitter_ms")]
    pub reply_jitter_ms: u64,

    /// Pause before the facilitator asks its question
    #[serde(default = "default_facilitator_delay_ms")]
    pub facilitator_delay_ms: u64,

    /// The facilitator speaks when the transcript length is a multiple of this
    #[serde(default = "default_facilitator_interval")]
    pub facilitator_interval: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            delays_enabled: true,
            connect_delay_ms: default_connect_delay_ms(),
            reply_delay_ms: default_reply_delay_ms(),
            reply_jitter_ms: default_reply_jitter_ms(),
            facilitator_delay_ms: default_facilitator_delay_ms(),
            facilitator_interval: default_facilitator_interval(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_connect_delay_ms() -> u64 {
    1000
}

fn default_reply_delay_ms() -> u64 {
    1500
}

fn default_reply_jitter_ms() -> u64 {
    1000
}

fn default_facilitator_delay_ms() -> u64 {
    2000
}

fn default_facilitator_interval() -> usize {
    4
}

/// Competition catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// TOML file replacing the embedded catalog
    pub path: Option<String>,
}

/// Main configuration for the FACT hub
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub calendar: CalendarConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Config {
    /// 設定ファイルから環境変数を展開する
    ///
    /// `${VAR_NAME}` 形式の文字列を環境変数の値に置換します。
    /// 環境変数が存在しない場合は空文字列になります。
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::with_capacity(value.len());
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next(); // '{' を消費

                let mut var_name = String::new();
                while let Some(c) = chars.next_if(|&c| c != '}') {
                    var_name.push(c);
                }
                chars.next(); // '}' を消費

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// TOML 設定ファイルから設定を読み込む
    ///
    /// 設定ファイル内の `${VAR_NAME}` は環境変数の値に置換されます。
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();

        let toml_content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let mut cfg = Self::from_toml_str(&toml_content)?;

        // 既存の環境変数で上書き（環境変数が優先）
        cfg.apply_env_overrides()?;

        Ok(cfg)
    }

    /// Parse TOML content (after `${VAR}` expansion), without env overrides
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let expanded_content = Self::expand_env_vars(content);

        let config: TomlConfig = toml::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

        let cfg = Self::from_toml_config(config);
        cfg.start_month()?;
        Ok(cfg)
    }

    /// デフォルトパスから設定を読み込む
    ///
    /// 1. `./fact-hub.toml`
    /// 2. 見つからない場合は環境変数のみ
    pub fn load() -> crate::Result<Self> {
        if Path::new(CONFIG_FILE).exists() {
            return Self::from_toml_file(CONFIG_FILE);
        }

        Self::from_env()
    }

    /// TOML 構造から Config を構築
    fn from_toml_config(toml: TomlConfig) -> Self {
        let llm = toml.llm.unwrap_or_default();
        let llm_config = LlmConfig {
            api_key: llm.api_key.unwrap_or_default(),
            model: llm.model.unwrap_or_else(default_model),
            provider: LlmProvider::parse(&llm.provider.unwrap_or_default()),
            base_url: llm.base_url,
            timeout_secs: llm.timeout_secs.unwrap_or_else(default_timeout_secs),
        };

        let api = toml.api.unwrap_or_default();
        let api_config = ApiConfig {
            host: api.host.unwrap_or_else(default_api_host),
            port: api.port.unwrap_or_else(default_api_port),
            allowed_origins: api.allowed_origins,
        };

        let calendar = toml.calendar.unwrap_or_default();
        let calendar_config = CalendarConfig {
            start_year: calendar.start_year.unwrap_or_else(default_start_year),
            start_month: calendar.start_month.unwrap_or_else(default_start_month),
        };

        let chat = toml.chat.unwrap_or_default();
        let chat_config = ChatConfig {
            delays_enabled: chat.delays_enabled.unwrap_or(true),
            connect_delay_ms: chat.connect_delay_ms.unwrap_or_else(default_connect_delay_ms),
            reply_delay_ms: chat.reply_delay_ms.unwrap_or_else(default_reply_delay_ms),
            reply_jitter_ms: chat.reply_jitter_ms.unwrap_or_else(default_reply_jitter_ms),
            facilitator_delay_ms: chat
                .facilitator_delay_ms
                .unwrap_or_else(default_facilitator_delay_ms),
            facilitator_interval: chat
                .facilitator_interval
                .unwrap_or_else(default_facilitator_interval),
        };

        let catalog = toml.catalog.unwrap_or_default();

        Config {
            llm: llm_config,
            api: api_config,
            calendar: calendar_config,
            chat: chat_config,
            catalog: CatalogConfig { path: catalog.path },
        }
    }

    /// 環境変数で設定を上書きする
    fn apply_env_overrides(&mut self) -> crate::Result<()> {
        // GEMINI_API_KEY first so that LLM_API_KEY wins when both are set
        for var in ["GEMINI_API_KEY", "LLM_API_KEY"] {
            if let Ok(api_key) = std::env::var(var) {
                if !api_key.is_empty() {
                    self.llm.api_key = api_key;
                }
            }
        }

        if let Ok(model) = std::env::var("LLM_MODEL") {
            if !model.is_empty() {
                self.llm.model = model;
            }
        }

        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            if !provider.is_empty() {
                self.llm.provider = LlmProvider::parse(&provider);
            }
        }

        if let Ok(base_url) = std::env::var("LLM_BASE_URL") {
            if !base_url.is_empty() {
                self.llm.base_url = Some(base_url);
            }
        }

        if let Ok(host) = std::env::var("API_HOST") {
            if !host.is_empty() {
                self.api.host = host;
            }
        }
        if let Ok(port) = std::env::var("API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }
        if let Ok(origins) = std::env::var("API_ALLOWED_ORIGINS") {
            self.api.allowed_origins = Some(
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            );
        }

        if let Ok(start) = std::env::var("CALENDAR_START") {
            let view: MonthView = start
                .parse()
                .map_err(|e| Error::Config(format!("CALENDAR_START: {}", e)))?;
            self.calendar.start_year = view.year();
            self.calendar.start_month = view.month();
        }

        if let Ok(enabled) = std::env::var("CHAT_DELAYS") {
            self.chat.delays_enabled = enabled.to_lowercase() != "false";
        }

        if let Ok(path) = std::env::var("CATALOG_PATH") {
            if !path.is_empty() {
                self.catalog.path = Some(path);
            }
        }

        Ok(())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut cfg = Self::default();
        cfg.apply_env_overrides()?;

        if cfg.llm.api_key.is_empty() {
            tracing::warn!("LLM_API_KEY / GEMINI_API_KEY not set; chat features will use fallback replies");
        }

        Ok(cfg)
    }

    /// Get the effective LLM configuration
    pub fn llm_config(&self) -> &LlmConfig {
        &self.llm
    }

    /// The month the calendar opens on
    pub fn start_month(&self) -> crate::Result<MonthView> {
        Ok(MonthView::new(
            self.calendar.start_year,
            self.calendar.start_month,
        )?)
    }
}

// ============================================================================
// TOML 構造体定義（ファイル解析用）
// ============================================================================

/// TOML ファイル用のトップレベル構造
#[derive(Debug, Deserialize)]
struct TomlConfig {
    /// LLM 設定
    llm: Option<TomlLlmConfig>,
    /// HTTP API 設定
    api: Option<TomlApiConfig>,
    /// カレンダー設定
    calendar: Option<TomlCalendarConfig>,
    /// チャット設定
    chat: Option<TomlChatConfig>,
    /// カタログ設定
    catalog: Option<TomlCatalogConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlLlmConfig {
    /// API プロバイダー ("gemini" または "openai")
    #[serde(default)]
    provider: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlApiConfig {
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    port: Option<u16>,
    /// 許可する CORS オリジン
    #[serde(default)]
    allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlCalendarConfig {
    start_year: Option<i32>,
    start_month: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlChatConfig {
    delays_enabled: Option<bool>,
    connect_delay_ms: Option<u64>,
    reply_delay_ms: Option<u64>,
    reply_jitter_ms: Option<u64>,
    facilitator_delay_ms: Option<u64>,
    facilitator_interval: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlCatalogConfig {
    path: Option<String>,
}
