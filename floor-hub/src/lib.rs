//! Floor Hub - 餐厅楼面实时同步中心
//!
//! # 架构概述
//!
//! Waiter tablets, cashier stations and kitchen displays connect over
//! Socket.IO. The hub keeps the authoritative table and order state in
//! memory and pushes every change to the terminals that need it.
//!
//! - **桌台** (`tables`): occupancy and attached devices per table
//! - **订单** (`orders`): active orders, totals and status transitions
//! - **会话** (`sessions`): connected terminals, roles and rooms
//! - **中心** (`hub`): single-writer event loop, routing, disconnect cleanup
//! - **传输** (`transport`): Socket.IO adapter
//!
//! # 模块结构
//!
//! ```text
//! floor-hub/src/
//! ├── core/          # 配置、错误、服务器
//! ├── api/           # HTTP 健康检查
//! ├── hub/           # 事件处理、广播路由、断线清理
//! ├── tables/        # 桌台状态存储
//! ├── orders/        # 订单账本、金额计算
//! ├── sessions/      # 连接注册表
//! ├── transport/     # Socket.IO
//! └── utils/         # 日志
//! ```

pub mod api;
pub mod core;
pub mod hub;
pub mod orders;
pub mod sessions;
pub mod tables;
pub mod transport;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerError};
pub use hub::{Hub, HubHandle};
pub use orders::OrderLedger;
pub use sessions::ConnectionRegistry;
pub use tables::TableStore;
pub use utils::init_logger;

/// 设置运行环境: 加载 `.env`, 读取配置, 初始化日志
pub fn setup_environment() -> Config {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger(&config.log_level, config.log_dir.as_deref());
    config
}

pub fn print_banner() {
    println!(
        r#"
    ______                    __  __      __
   / ____/___  ____  _____   / / / /_  __/ /_
  / /_  / __ \/ __ \/ ___/  / /_/ / / / / __ \
 / __/ / /_/ / /_/ / /     / __  / /_/ / /_/ /
/_/    \____/\____/_/     /_/ /_/\__,_/_.___/
    "#
    );
}
