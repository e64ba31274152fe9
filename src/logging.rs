//! 日志系统配置
//!
//! 基于 Bevy 的 `LogPlugin`（tracing），窗口与无窗口模式共用

use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;

/// 默认过滤规则，压低渲染后端的噪声
const DEFAULT_FILTER: &str = "wgpu=error,naga=warn,random_chooser=debug";

/// 构建日志插件
///
/// 环境变量 `RUST_LOG` 存在时优先生效：
///
/// ```bash
/// RUST_LOG=info cargo run          # info 及以上级别
/// RUST_LOG=debug cargo run         # debug 及以上级别
/// RUST_LOG=warn cargo run          # 仅警告和错误
/// ```
#[must_use]
pub fn log_plugin() -> LogPlugin {
    LogPlugin {
        level: Level::INFO,
        filter: DEFAULT_FILTER.to_string(),
        ..default()
    }
}
