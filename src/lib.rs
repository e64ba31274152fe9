//! Random Chooser
//!
//! 在固定名单中转动并随机揭晓一人。核心状态机不依赖 Bevy，
//! 界面、音频与调度以插件形式组装。

pub mod components;
pub mod config;
pub mod controller;
pub mod logging;
pub mod plugins;
pub mod resources;
pub mod roster;
pub mod schedule;
pub mod spring;
