/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (`.env` 文件在启动时加载):
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 4000 | HTTP / Socket.IO 端口 |
/// | TABLE_COUNT | 20 | 桌台数量 (编号 1..=N) |
/// | TABLE_CAPACITY | 4 | 每桌座位数 |
/// | LOG_LEVEL | info | 日志级别 (RUST_LOG 优先) |
/// | LOG_DIR | 未设置 | 日志目录, 存在时按天滚动写文件 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 TABLE_COUNT=32 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub table_count: u32,
    pub table_capacity: u32,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// development | staging | production
    pub environment: String,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置, 未设置时使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: env_or("HTTP_PORT", 4000),
            table_count: env_or("TABLE_COUNT", 20),
            table_capacity: env_or("TABLE_CAPACITY", 4),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// 覆盖端口和桌台数量
    ///
    /// 常用于测试场景
    pub fn with_overrides(http_port: u16, table_count: u32) -> Self {
        let mut config = Self::from_env();
        config.http_port = http_port;
        config.table_count = table_count;
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
