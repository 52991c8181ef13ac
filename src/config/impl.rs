use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

impl AppConfig {
    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // 首先加载默认配置文件
            .add_source(File::with_name("config").required(false))
            // 然后根据环境加载特定配置文件
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // 最后加载环境变量覆盖
            .add_source(
                Environment::with_prefix("GAMS")
                    .separator("_")
                    .try_parsing(true),
            );

        // 支持从环境变量加载
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.unix_socket_path", std::env::var("UNIX_SOCKET").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("cache.default_ttl", std::env::var("CACHE_TTL").ok())?
            .set_override_option(
                "grading.lock_after_submit",
                std::env::var("GRADING_LOCK_AFTER_SUBMIT").ok(),
            )?;

        let config = builder.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;

        // 处理工作线程数
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        Ok(app_config)
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 获取服务器绑定地址
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 提交后是否锁定成绩
    pub fn grades_locked_after_submit(&self) -> bool {
        self.grading.lock_after_submit
    }

    /// 获取 Unix 套接字路径 (如果配置了)
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    const MINIMAL: &str = r#"
        [app]
        system_name = "GAMS"
        environment = "development"
        log_level = "debug"

        [server]
        host = "0.0.0.0"
        port = 9000
        unix_socket_path = ""
        workers = 4
        max_workers = 8

        [server.timeouts]
        client_request = 5000
        client_disconnect = 1000
        keep_alive = 75

        [server.limits]
        max_payload_size = 1024

        [jwt]
        secret = "s"

        [database]
        url = "sqlite::memory:"
        pool_size = 1
        timeout = 5

        [cache]
        default_ttl = 60

        [cache.memory]
        max_capacity = 100

        [cors]
        allowed_origins = []
        allowed_methods = []
        allowed_headers = []
        max_age = 60
    "#;

    fn parse(extra: &str) -> AppConfig {
        Config::builder()
            .add_source(File::from_str(&format!("{MINIMAL}\n{extra}"), FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("config should parse")
    }

    #[test]
    fn test_grading_section_defaults_to_unlocked() {
        let config = parse("");
        assert!(!config.grades_locked_after_submit());
        assert_eq!(config.jwt.leeway, 0);
    }

    #[test]
    fn test_grading_lock_can_be_enabled() {
        let config = parse("[grading]\nlock_after_submit = true");
        assert!(config.grades_locked_after_submit());
    }

    #[test]
    fn test_environment_helpers() {
        let config = parse("");
        assert!(config.is_development());
        assert!(!config.is_production());
        assert_eq!(config.server_bind_address(), "0.0.0.0:9000");
    }
}
