//! 系统集合定义
//!
//! `Update` 中按 输入 -> 逻辑 -> 音频 -> 渲染 的顺序执行

use bevy::prelude::*;

/// 抽选相关系统集合
#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ChooserSet {
    /// 处理按钮等输入，发出启动请求
    Input,
    /// 推进控制器状态
    Logic,
    /// 消费音频指令
    Audio,
    /// 同步显示
    Render,
}
