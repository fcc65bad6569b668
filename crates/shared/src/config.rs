//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Outgoing email configuration.
    #[serde(default)]
    pub email: EmailConfig,
    /// Payment gateway credentials.
    #[serde(default)]
    pub payments: PaymentsConfig,
    /// Public application settings.
    #[serde(default)]
    pub app: AppSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT settings as read from configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    86400 // 24 hours
}

/// SMTP configuration used to email documents to clients.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP relay host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: String,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: String,
    /// Sender address.
    #[serde(default = "default_from_email")]
    pub from_email: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    1025
}

fn default_from_email() -> String {
    "noreply@invoxa.app".to_string()
}

fn default_from_name() -> String {
    "Invoxa".to_string()
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
        }
    }
}

/// Payment gateway configuration. Every gateway is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentsConfig {
    /// PayPal REST credentials.
    pub paypal: Option<PayPalConfig>,
    /// Paystack credentials.
    pub paystack: Option<PaystackConfig>,
    /// Yoco credentials.
    pub yoco: Option<YocoConfig>,
    /// Professional plan prices charged through Paystack and Yoco.
    #[serde(default)]
    pub pricing: PricingConfig,
}

/// Professional plan prices, in the currency's minor unit (cents, kobo).
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// ISO 4217 code the prices are in.
    #[serde(default = "default_pricing_currency")]
    pub currency: String,
    /// Price of one month.
    #[serde(default = "default_monthly_minor")]
    pub monthly_minor: u64,
    /// Price of one year.
    #[serde(default = "default_annual_minor")]
    pub annual_minor: u64,
}

fn default_pricing_currency() -> String {
    "ZAR".to_string()
}

fn default_monthly_minor() -> u64 {
    19_900
}

fn default_annual_minor() -> u64 {
    199_000
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: default_pricing_currency(),
            monthly_minor: default_monthly_minor(),
            annual_minor: default_annual_minor(),
        }
    }
}

/// PayPal REST API credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct PayPalConfig {
    /// API base URL (sandbox or live).
    #[serde(default = "default_paypal_base_url")]
    pub base_url: String,
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
}

fn default_paypal_base_url() -> String {
    "https://api-m.sandbox.paypal.com".to_string()
}

/// Paystack credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct PaystackConfig {
    /// API base URL.
    #[serde(default = "default_paystack_base_url")]
    pub base_url: String,
    /// Secret key, also used to sign webhooks.
    pub secret_key: String,
}

fn default_paystack_base_url() -> String {
    "https://api.paystack.co".to_string()
}

/// Yoco credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct YocoConfig {
    /// API base URL.
    #[serde(default = "default_yoco_base_url")]
    pub base_url: String,
    /// Secret key.
    pub secret_key: String,
}

fn default_yoco_base_url() -> String {
    "https://payments.yoco.com".to_string()
}

/// Public application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    /// Public base URL of the web app, used for gateway callbacks.
    #[serde(default = "default_app_base_url")]
    pub base_url: String,
}

fn default_app_base_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            base_url: default_app_base_url(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("INVOXA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("INVOXA__DATABASE__URL", Some("postgres://localhost/invoxa_test")),
                ("INVOXA__JWT__SECRET", Some("secret")),
                ("INVOXA__SERVER__PORT", Some("9090")),
                ("INVOXA__PAYMENTS__PAYSTACK__SECRET_KEY", Some("sk_test_123")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/invoxa_test");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.jwt.secret, "secret");
                assert_eq!(config.jwt.access_token_expiry_secs, 86400);
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.server.host, "0.0.0.0");

                let paystack = config.payments.paystack.unwrap();
                assert_eq!(paystack.secret_key, "sk_test_123");
                assert_eq!(paystack.base_url, "https://api.paystack.co");
                assert!(config.payments.paypal.is_none());
                assert!(config.payments.yoco.is_none());
                assert_eq!(config.payments.pricing.monthly_minor, 19_900);
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars(
            [
                ("INVOXA__DATABASE__URL", None::<&str>),
                ("INVOXA__JWT__SECRET", Some("secret")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }

    #[test]
    fn test_email_config_default() {
        let config = EmailConfig::default();
        assert_eq!(config.smtp_host, "localhost");
        assert_eq!(config.smtp_port, 1025);
        assert_eq!(config.from_name, "Invoxa");
    }
}
