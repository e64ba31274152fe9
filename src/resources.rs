//! 共享资源定义
//!
//! 定义所有跨插件使用的Resource类型

use std::path::PathBuf;

use anyhow::Result;
use bevy::prelude::*;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{self, SpinSettings};
use crate::controller::SelectionController;

/// 命令行参数
#[derive(Parser, Resource, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct ExecArgs {
    /// 抽选参数配置文件（TOML）
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// 随机数种子，指定后结果可复现
    #[arg(long)]
    pub seed: Option<u64>,
    /// 无窗口、无音频运行，结果输出到标准输出
    #[arg(long)]
    pub headless: bool,
    /// 无窗口模式下连续抽选的次数
    #[arg(long, default_value_t = 1)]
    pub spins: u32,
    /// 覆盖 tick 间隔（毫秒）
    #[arg(long)]
    pub tick_ms: Option<u64>,
}

impl ExecArgs {
    /// 合并配置文件与命令行覆盖项
    ///
    /// # Errors
    ///
    /// - 配置文件读取或解析失败
    /// - 覆盖后的参数越界
    pub fn resolve_settings(&self) -> Result<SpinSettings> {
        let mut settings = match self.config.as_deref() {
            Some(path) => config::load_settings(path)?,
            None => SpinSettings::default(),
        };
        if let Some(ms) = self.tick_ms {
            settings.tick_interval = std::time::Duration::from_millis(ms);
        }
        settings.validate()?;
        Ok(settings)
    }
}

/// 当前生效的抽选参数
#[derive(Resource, Clone, Debug)]
pub struct ChooserSettings(pub SpinSettings);

/// 抽选用随机数源
#[derive(Resource)]
pub struct SpinRng(pub StdRng);

impl SpinRng {
    /// 有种子时确定性初始化，否则取系统熵
    #[must_use]
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_os_rng()),
        }
    }
}

/// 抽选控制器资源
#[derive(Resource)]
pub struct ChooserState {
    /// 控制器本体
    pub controller: SelectionController,
}
