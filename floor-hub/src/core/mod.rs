//! 核心模块 - 配置、错误与服务器启动
//!
//! - [`Config`] - 服务器配置
//! - [`Server`] - HTTP + Socket.IO 服务器
//! - [`ServerError`] - 服务器错误

pub mod config;
pub mod error;
pub mod server;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
