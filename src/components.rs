//! 跨插件组件定义
//!
//! 定义所有跨插件使用的Component类型

use bevy::prelude::*;

/// 头像容器，缩放动画作用于此实体
#[derive(Component)]
pub struct PortraitFrame;

/// 头像图片
#[derive(Component)]
pub struct PortraitImage;

/// 候选者名称文本
#[derive(Component)]
pub struct CandidateName;

/// 抽选按钮
#[derive(Component)]
pub struct ChooseButton;

/// 抽选按钮文字
#[derive(Component)]
pub struct ChooseButtonLabel;
