//! Kitchen Server - 厨房显示路由服务
//!
//! 把收银端的订单路由到厨房屏幕，跟踪订单和菜品的出餐状态，
//! 并按屏幕配置的商品分类过滤可见菜品。
//!
//! # 模块结构
//!
//! ```text
//! kitchen-server/src/
//! ├── core/          # 配置、状态、错误、HTTP 服务器
//! ├── db/            # redb 存储
//! ├── screens/       # 厨房屏幕配置 (ScreenRegistry)
//! ├── orders/        # 订单路由与对账 (OrderRouter)
//! ├── services/      # 主数据缓存、消息总线、HTTP 组装
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志等工具
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod orders;
pub mod screens;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use db::KitchenStorage;
pub use orders::OrderRouter;
pub use screens::ScreenRegistry;
pub use services::{CatalogService, MessageBus, OrderNotifier};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境: 加载 .env, 初始化日志
pub fn setup_environment() -> Result<Config, Box<dyn std::error::Error>> {
    if let Err(e) = dotenv::dotenv() {
        // .env is optional
        eprintln!("No .env loaded: {}", e);
    }

    let config = Config::from_env();
    init_logger_with_file(
        Some(&config.log_level),
        config.is_production(),
        config.log_dir.as_deref(),
    );
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    __ __ _ __       __
   / //_/(_) /______/ /_  ___  ____
  / ,<  / / __/ ___/ __ \/ _ \/ __ \
 / /| |/ / /_/ /__/ / / /  __/ / / /
/_/ |_/_/\__/\___/_/ /_/\___/_/ /_/
    "#
    );
}
