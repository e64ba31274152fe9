//! 抽选参数定义与解析

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Deserializer};

use crate::spring::MIN_RESPONSE;

/// 抽选运行参数
///
/// 所有字段均可省略，省略时取默认值。
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SpinSettings {
    /// 每次 tick 的间隔
    #[serde(rename = "tick_interval_ms", deserialize_with = "de_duration_ms")]
    pub tick_interval: Duration,
    /// 自动停止前需要完成的圈数
    pub lap_threshold: u32,
    /// 转动时按下的缩放
    pub pulse_scale: f32,
    /// 揭晓时的放大倍数
    pub overshoot_scale: f32,
    /// 揭晓后到回弹之间的延迟
    #[serde(rename = "settle_delay_ms", deserialize_with = "de_duration_ms")]
    pub settle_delay: Duration,
    /// 弹簧响应时间（秒）
    pub spring_response: f32,
    /// 弹簧阻尼比
    pub spring_damping: f32,
}

impl Default for SpinSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            lap_threshold: 3,
            pulse_scale: 0.95,
            overshoot_scale: 1.2,
            settle_delay: Duration::from_millis(300),
            spring_response: 0.5,
            spring_damping: 0.6,
        }
    }
}

impl SpinSettings {
    /// 检查参数取值范围
    ///
    /// # Errors
    ///
    /// - 时间间隔为 0
    /// - 圈数为 0
    /// - 缩放或弹簧参数越界
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.tick_interval.is_zero(), "tick_interval_ms 必须大于 0");
        ensure!(!self.settle_delay.is_zero(), "settle_delay_ms 必须大于 0");
        ensure!(self.lap_threshold >= 1, "lap_threshold 至少为 1");
        ensure!(
            self.pulse_scale > 0.0 && self.overshoot_scale > 0.0,
            "缩放必须为正数"
        );
        ensure!(
            self.spring_response >= MIN_RESPONSE,
            "spring_response 不得小于 {MIN_RESPONSE}"
        );
        ensure!(
            self.spring_damping > 0.0 && self.spring_damping <= 1.0,
            "spring_damping 必须位于 (0, 1]"
        );
        Ok(())
    }
}

/// 从 TOML 字符串解析抽选参数
///
/// # Errors
///
/// - TOML 解析失败
/// - 配置字段反序列化失败
/// - 参数取值越界
pub fn parse_settings_str(s: &str) -> Result<SpinSettings> {
    let cfg: SpinSettings = toml::from_str(s)?;
    cfg.validate()?;
    Ok(cfg)
}

/// 从指定路径加载抽选参数（TOML）
///
/// # Errors
///
/// - 读取文件失败
/// - TOML 解析失败
/// - 参数取值越界
#[cfg(any(not(target_arch = "wasm32"), target_os = "wasi"))]
pub fn load_settings(path: &Path) -> Result<SpinSettings> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("读取配置失败: {}", path.display()))?;
    parse_settings_str(&s).with_context(|| format!("配置无效: {}", path.display()))
}

/// 从指定路径加载抽选参数（TOML）
///
/// # Errors
///
/// - WASM 目标不支持直接读取本地文件
#[cfg(all(target_arch = "wasm32", not(target_os = "wasi")))]
pub fn load_settings(_path: &Path) -> Result<SpinSettings> {
    anyhow::bail!("load_settings is not available on wasm")
}

/// 反序列化毫秒为 `Duration`
fn de_duration_ms<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let ms = u64::deserialize(deserializer)?;
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = parse_settings_str("").unwrap();
        assert_eq!(cfg, SpinSettings::default());
    }

    #[test]
    fn partial_override() {
        let cfg = parse_settings_str("tick_interval_ms = 50\nlap_threshold = 5\n").unwrap();
        assert_eq!(cfg.tick_interval, Duration::from_millis(50));
        assert_eq!(cfg.lap_threshold, 5);
        assert_eq!(cfg.settle_delay, Duration::from_millis(300));
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(parse_settings_str("lap_threshold = 0").is_err());
        assert!(parse_settings_str("tick_interval_ms = 0").is_err());
        assert!(parse_settings_str("spring_damping = 1.5").is_err());
        assert!(parse_settings_str("spring_response = 0.005").is_err());
        assert!(parse_settings_str("spring_response = 0.02").is_ok());
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(parse_settings_str("participants = [\"Max\"]").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_settings(Path::new("/nonexistent/chooser.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("chooser.toml"));
    }
}
