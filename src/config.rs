use clap::Parser;

pub const PASSWORD_RESET_EXPIRED_MINUTES: i64 = 15;
pub const DEFAULT_CURRENCY: &str = "INR";
pub const TOP_EVENTS_LIMIT: usize = 5;

#[derive(Debug, Parser, Clone)]
pub struct Config {
    #[clap(long, env, default_value_t = 8080)]
    pub port: u16,

    #[clap(long, env, default_value_t = true)]
    pub swagger_enabled: bool,

    #[clap(long, env, default_value = "info")]
    pub log_level: String,

    #[clap(long, env)]
    pub database_url: String,

    #[clap(long, env, default_value_t = true)]
    pub run_migrations: bool,

    #[clap(long, env)]
    pub jwt_secret: String,

    /// Token lifetime in seconds.
    #[clap(long, env, default_value_t = 86400)]
    pub jwt_expires_in: i64,

    #[clap(long, env, default_value_t = bcrypt::DEFAULT_COST)]
    pub bcrypt_cost: u32,

    #[clap(long, env)]
    pub admin_email: String,

    #[clap(long, env)]
    pub admin_password: String,

    #[clap(long, env, default_value = "*")]
    pub cors_allowed_origins: String,

    #[clap(long, env, default_value = "./uploads")]
    pub upload_dir: String,

    #[clap(long, env, default_value = "http://localhost:3000")]
    pub public_base_url: String,

    #[clap(long, env, default_value = "")]
    pub razorpay_key_id: String,

    #[clap(long, env, default_value = "")]
    pub razorpay_key_secret: String,

    #[clap(long, env, default_value = "https://api.razorpay.com/v1")]
    pub razorpay_base_url: String,

    #[clap(long, env, default_value_t = 15)]
    pub gateway_timeout_secs: u64,

    #[clap(long, env)]
    pub rabbitmq_uri: Option<String>,

    #[clap(long, env, default_value = "mail_service")]
    pub mail_queue: String,

    /// Hour of day (UTC) at which event reminders go out.
    #[clap(long, env, default_value_t = 8)]
    pub reminder_hour_utc: u32,

    #[clap(long, env, default_value = "local")]
    pub app_env: String,
}

impl Config {
    /// Settings for tests and local tooling; nothing is read from the environment.
    pub fn for_tests(database_url: &str) -> Self {
        Config {
            port: 0,
            swagger_enabled: false,
            log_level: "debug".to_string(),
            database_url: database_url.to_string(),
            run_migrations: true,
            jwt_secret: "test-secret".to_string(),
            jwt_expires_in: 3600,
            bcrypt_cost: 4,
            admin_email: "admin@unbound.test".to_string(),
            admin_password: "admin-password".to_string(),
            cors_allowed_origins: "*".to_string(),
            upload_dir: std::env::temp_dir()
                .join("unbound-uploads")
                .to_string_lossy()
                .into_owned(),
            public_base_url: "http://localhost:3000".to_string(),
            razorpay_key_id: String::new(),
            razorpay_key_secret: String::new(),
            razorpay_base_url: "http://127.0.0.1:9".to_string(),
            gateway_timeout_secs: 1,
            rabbitmq_uri: None,
            mail_queue: "mail_service".to_string(),
            reminder_hour_utc: 8,
            app_env: "test".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_from_args() {
        let config = Config::try_parse_from([
            "unbound_backend",
            "--database-url",
            "postgres://localhost/unbound",
            "--jwt-secret",
            "secret",
            "--admin-email",
            "admin@example.com",
            "--admin-password",
            "pw",
        ])
        .unwrap();

        assert_eq!(config.jwt_expires_in, 86400);
        assert_eq!(config.mail_queue, "mail_service");
        assert!(config.rabbitmq_uri.is_none());
    }
}
