//! 抽选界面插件
//!
//! 负责头像、名称与按钮的场景搭建和逐帧同步

use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::components::{
    CandidateName, ChooseButton, ChooseButtonLabel, PortraitFrame, PortraitImage,
};
use crate::plugins::spin_driver::StartSpinRequest;
use crate::resources::{ChooserSettings, ChooserState};
use crate::roster::CandidateId;
use crate::schedule::ChooserSet;
use crate::spring::ScaleSpring;

/// 头像边长
const PORTRAIT_SIZE: f32 = 200.0;
/// 头像边框宽度
const BORDER_WIDTH: f32 = 2.0;
/// 头像中心纵坐标
const PORTRAIT_Y: f32 = 80.0;
/// 名称文本纵坐标
const NAME_Y: f32 = -50.0;
/// 按钮尺寸
const BUTTON_SIZE: Vec2 = Vec2::new(200.0, 50.0);

/// 可点击时的按钮颜色
const BUTTON_READY: Color = Color::srgb(0.0, 0.48, 1.0);
/// 转动中的按钮颜色
const BUTTON_BUSY: Color = Color::srgb(0.56, 0.56, 0.58);
/// 头像边框颜色
const BORDER_COLOR: Color = Color::srgb(0.0, 0.48, 1.0);

/// 按钮文字
const LABEL_READY: &str = "Choose";
/// 转动中的按钮文字
const LABEL_BUSY: &str = "Thinking...";

/// 头像缩放动画状态
#[derive(Resource)]
pub struct PortraitSpring(pub ScaleSpring);

/// 候选者头像句柄
#[derive(Resource, Default)]
pub struct PortraitImages(HashMap<CandidateId, Handle<Image>>);

/// 抽选界面插件
pub struct ChooserViewPlugin;

impl Plugin for ChooserViewPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PortraitImages>()
            .add_systems(Startup, (load_portraits, setup_scene).chain())
            .add_systems(Update, handle_choose_button.in_set(ChooserSet::Input))
            .add_systems(
                Update,
                (animate_portrait_scale, sync_displayed_candidate, sync_button)
                    .in_set(ChooserSet::Render),
            );
    }
}

/// 预加载所有候选者头像
fn load_portraits(
    asset_server: Res<AssetServer>,
    state: Res<ChooserState>,
    mut images: ResMut<PortraitImages>,
) {
    for candidate in state.controller.roster().iter() {
        let handle = asset_server.load(candidate.image.clone());
        images.0.insert(candidate.id, handle);
    }
}

/// 搭建场景
fn setup_scene(
    mut commands: Commands,
    state: Res<ChooserState>,
    settings: Res<ChooserSettings>,
    images: Res<PortraitImages>,
) {
    commands.spawn(Camera2d);
    commands.insert_resource(PortraitSpring(ScaleSpring::new(
        settings.0.spring_response,
        settings.0.spring_damping,
    )));

    let shown = state.controller.displayed_or_first();
    let image = images.0.get(&shown.id).cloned().unwrap_or_default();

    // 头像与边框，缩放作用于容器
    commands
        .spawn((
            PortraitFrame,
            Transform::from_xyz(0.0, PORTRAIT_Y, 0.0),
            Visibility::default(),
        ))
        .with_children(|frame| {
            frame.spawn((
                Sprite {
                    color: BORDER_COLOR,
                    custom_size: Some(Vec2::splat(PORTRAIT_SIZE + BORDER_WIDTH * 2.0)),
                    ..default()
                },
                Transform::from_xyz(0.0, 0.0, 0.0),
            ));
            frame.spawn((
                PortraitImage,
                Sprite {
                    image,
                    custom_size: Some(Vec2::splat(PORTRAIT_SIZE)),
                    ..default()
                },
                Transform::from_xyz(0.0, 0.0, 1.0),
            ));
        });

    commands.spawn((
        CandidateName,
        Text2d::new(shown.name.clone()),
        TextFont {
            font_size: 40.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Transform::from_xyz(0.0, NAME_Y, 0.0),
    ));

    // 底部按钮
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::FlexEnd,
            padding: UiRect::bottom(Val::Px(120.0)),
            ..default()
        })
        .with_children(|root| {
            root.spawn((
                Button,
                ChooseButton,
                Node {
                    width: Val::Px(BUTTON_SIZE.x),
                    height: Val::Px(BUTTON_SIZE.y),
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::Center,
                    ..default()
                },
                BackgroundColor(BUTTON_READY),
            ))
            .with_children(|button| {
                button.spawn((
                    ChooseButtonLabel,
                    Text::new(LABEL_READY),
                    TextFont {
                        font_size: 26.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                ));
            });
        });
}

/// 按钮点击发出启动请求，转动中忽略
fn handle_choose_button(
    q_button: Query<&Interaction, (Changed<Interaction>, With<ChooseButton>)>,
    state: Res<ChooserState>,
    mut requests: MessageWriter<StartSpinRequest>,
) {
    if state.controller.is_running() {
        return;
    }
    if q_button.iter().any(|i| *i == Interaction::Pressed) {
        requests.write(StartSpinRequest);
    }
}

/// 弹簧缓动到目标缩放
fn animate_portrait_scale(
    time: Res<Time>,
    state: Res<ChooserState>,
    spring: Option<ResMut<PortraitSpring>>,
    mut q_frame: Query<&mut Transform, With<PortraitFrame>>,
) {
    let Some(mut spring) = spring else {
        return;
    };
    let target = state.controller.visual_scale();
    if spring.0.is_at_rest(target) {
        return;
    }
    let value = spring.0.step(target, time.delta_secs());
    for mut tf in &mut q_frame {
        tf.scale = Vec3::new(value, value, 1.0);
    }
}

/// 显示的候选者变化时更新头像与名称
fn sync_displayed_candidate(
    state: Res<ChooserState>,
    images: Res<PortraitImages>,
    mut shown: Local<Option<CandidateId>>,
    mut q_image: Query<&mut Sprite, With<PortraitImage>>,
    mut q_name: Query<&mut Text2d, With<CandidateName>>,
) {
    let candidate = state.controller.displayed_or_first();
    if *shown == Some(candidate.id) {
        return;
    }
    *shown = Some(candidate.id);

    if let Some(handle) = images.0.get(&candidate.id) {
        for mut sprite in &mut q_image {
            sprite.image = handle.clone();
        }
    }
    for mut text in &mut q_name {
        text.0.clone_from(&candidate.name);
    }
}

/// 按转动状态切换按钮外观
fn sync_button(
    state: Res<ChooserState>,
    mut q_button: Query<&mut BackgroundColor, With<ChooseButton>>,
    mut q_label: Query<&mut Text, With<ChooseButtonLabel>>,
) {
    let running = state.controller.is_running();
    let (color, label) = if running {
        (BUTTON_BUSY, LABEL_BUSY)
    } else {
        (BUTTON_READY, LABEL_READY)
    };
    for mut bg in &mut q_button {
        if bg.0 != color {
            bg.0 = color;
        }
    }
    for mut text in &mut q_label {
        if text.0 != label {
            text.0 = label.to_string();
        }
    }
}
