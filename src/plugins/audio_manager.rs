//! 音频管理插件
//!
//! 负责音效资源的加载与播放控制。资源加载失败时静默降级为空操作。

use bevy::asset::LoadState;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;
use bevy_kira_audio::{AudioApp, AudioChannel, AudioControl, AudioSource as KiraAudioSource};

use crate::controller::{AudioCue, LoopSound, OneShotSound};
use crate::plugins::spin_driver::AudioCueMessage;
use crate::schedule::ChooserSet;

/// 循环音通道标记
#[derive(Resource)]
pub struct SpinLoopChannel;

/// 提示音通道标记
#[derive(Resource)]
pub struct ChimeChannel;

/// 已加载的音效句柄
#[derive(Resource)]
pub struct SoundBank {
    /// 转动循环音
    spinning: Handle<KiraAudioSource>,
    /// 揭晓提示音
    win: Handle<KiraAudioSource>,
    /// 已报告过加载失败的资源
    warned: HashSet<&'static str>,
}

/// 音频管理插件
pub struct AudioManagerPlugin;

impl Plugin for AudioManagerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(bevy_kira_audio::AudioPlugin)
            .add_audio_channel::<SpinLoopChannel>()
            .add_audio_channel::<ChimeChannel>()
            .add_systems(Startup, load_sounds)
            .add_systems(Update, handle_audio_cues.in_set(ChooserSet::Audio));
    }
}

/// 启动时加载音效
fn load_sounds(mut commands: Commands, asset_server: Res<AssetServer>) {
    let spinning = asset_server.load(LoopSound::Spinning.asset_path());
    let win = asset_server.load(OneShotSound::Win.asset_path());
    commands.insert_resource(SoundBank {
        spinning,
        win,
        warned: HashSet::default(),
    });
}

/// 音效资源的加载状况
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundStatus {
    /// 已加载，可以播放
    Ready,
    /// 仍在加载
    Loading,
    /// 加载失败
    Failed,
}

/// 对一次播放请求的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackDecision {
    /// 播放
    Play,
    /// 静默跳过
    Skip,
    /// 跳过并报告加载失败
    SkipAndWarn,
}

/// 由资源是否就绪与加载状态得出音效状况
#[must_use]
pub fn sound_status(loaded: bool, load_state: Option<&LoadState>) -> SoundStatus {
    if loaded {
        SoundStatus::Ready
    } else if matches!(load_state, Some(LoadState::Failed(_))) {
        SoundStatus::Failed
    } else {
        SoundStatus::Loading
    }
}

/// 决定是否播放；同一资源的加载失败只报告一次
pub fn decide_playback(
    status: SoundStatus,
    path: &'static str,
    warned: &mut HashSet<&'static str>,
) -> PlaybackDecision {
    match status {
        SoundStatus::Ready => PlaybackDecision::Play,
        SoundStatus::Loading => PlaybackDecision::Skip,
        SoundStatus::Failed if warned.insert(path) => PlaybackDecision::SkipAndWarn,
        SoundStatus::Failed => PlaybackDecision::Skip,
    }
}

/// 取出可播放的句柄；未就绪或加载失败时返回 `None`
fn ready_handle(
    handle: &Handle<KiraAudioSource>,
    path: &'static str,
    assets: &Assets<KiraAudioSource>,
    asset_server: &AssetServer,
    warned: &mut HashSet<&'static str>,
) -> Option<Handle<KiraAudioSource>> {
    let load_state = asset_server.get_load_state(handle.id());
    let status = sound_status(assets.get(handle).is_some(), load_state.as_ref());
    match decide_playback(status, path, warned) {
        PlaybackDecision::Play => Some(handle.clone()),
        PlaybackDecision::SkipAndWarn => {
            warn!("音效未能加载，后续播放将被忽略: {}", path);
            None
        }
        PlaybackDecision::Skip => {
            debug!("音效不可用，跳过: {}", path);
            None
        }
    }
}

/// 处理音频指令
fn handle_audio_cues(
    mut cues: MessageReader<AudioCueMessage>,
    bank: Option<ResMut<SoundBank>>,
    assets: Res<Assets<KiraAudioSource>>,
    asset_server: Res<AssetServer>,
    loop_channel: Res<AudioChannel<SpinLoopChannel>>,
    chime_channel: Res<AudioChannel<ChimeChannel>>,
) {
    let Some(mut bank) = bank else {
        return;
    };
    let bank = &mut *bank;

    for AudioCueMessage(cue) in cues.read() {
        match *cue {
            AudioCue::PlayLoop(sound) => {
                let handle = match sound {
                    LoopSound::Spinning => &bank.spinning,
                };
                let Some(handle) = ready_handle(
                    handle,
                    sound.asset_path(),
                    &assets,
                    &asset_server,
                    &mut bank.warned,
                ) else {
                    continue;
                };
                loop_channel.stop();
                loop_channel.play(handle).looped();
            }
            AudioCue::StopLoop(_) => {
                // 停止即回到开头，下次播放从头开始
                loop_channel.stop();
            }
            AudioCue::PlayOnce(sound) => {
                let handle = match sound {
                    OneShotSound::Win => &bank.win,
                };
                let Some(handle) = ready_handle(
                    handle,
                    sound.asset_path(),
                    &assets,
                    &asset_server,
                    &mut bank.warned,
                ) else {
                    continue;
                };
                chime_channel.play(handle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPIN: &str = LoopSound::Spinning.asset_path();
    const WIN: &str = OneShotSound::Win.asset_path();

    #[test]
    fn status_follows_asset_and_load_state() {
        assert_eq!(sound_status(true, None), SoundStatus::Ready);
        assert_eq!(sound_status(false, None), SoundStatus::Loading);
        assert_eq!(
            sound_status(false, Some(&LoadState::Loading)),
            SoundStatus::Loading
        );
        assert_eq!(
            sound_status(false, Some(&LoadState::NotLoaded)),
            SoundStatus::Loading
        );
    }

    #[test]
    fn failed_sound_warns_once_then_stays_silent() {
        let mut warned = HashSet::default();
        let decisions: Vec<_> = (0..4)
            .map(|_| decide_playback(SoundStatus::Failed, SPIN, &mut warned))
            .collect();
        assert_eq!(
            decisions,
            [
                PlaybackDecision::SkipAndWarn,
                PlaybackDecision::Skip,
                PlaybackDecision::Skip,
                PlaybackDecision::Skip,
            ]
        );
        // 其他资源的失败单独报告
        assert_eq!(
            decide_playback(SoundStatus::Failed, WIN, &mut warned),
            PlaybackDecision::SkipAndWarn
        );
        assert_eq!(warned.len(), 2);
    }

    #[test]
    fn loading_sound_is_skipped_without_warning() {
        let mut warned = HashSet::default();
        assert_eq!(
            decide_playback(SoundStatus::Loading, WIN, &mut warned),
            PlaybackDecision::Skip
        );
        assert!(warned.is_empty());
        assert_eq!(
            decide_playback(SoundStatus::Ready, WIN, &mut warned),
            PlaybackDecision::Play
        );
    }
}
