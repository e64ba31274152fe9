//! 抽选驱动插件
//!
//! 负责启动请求、定时 tick 与揭晓后的延迟回弹

use anyhow::{Context, Result};
use bevy::prelude::*;

use crate::config::SpinSettings;
use crate::controller::{AudioCue, SelectionController, SettleToken, TickOutcome};
use crate::resources::{ChooserSettings, ChooserState, ExecArgs, SpinRng};
use crate::roster::{Candidate, CandidateId, Roster, builtin_candidates};
use crate::schedule::ChooserSet;

/// 启动抽选请求
#[derive(Message, Clone, Copy, Debug, Default)]
pub struct StartSpinRequest;

/// 音频指令消息
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AudioCueMessage(pub AudioCue);

/// 揭晓消息
#[derive(Message, Clone, Debug)]
pub struct SpinRevealed {
    /// 选中的候选者
    pub candidate: CandidateId,
    /// 候选者名称
    pub name: String,
}

/// 转动计时器，仅在转动期间存在
#[derive(Resource, Default)]
pub struct SpinClock {
    timer: Option<Timer>,
}

impl SpinClock {
    /// 计时器是否处于启用状态
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.timer.is_some()
    }
}

/// 等待触发的回弹
#[derive(Resource, Default)]
pub struct PendingSettle {
    pending: Option<(SettleToken, Timer)>,
}

impl PendingSettle {
    /// 是否有尚未触发的回弹
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// 抽选驱动插件
pub struct SpinDriverPlugin {
    /// 抽选参数
    pub settings: SpinSettings,
    /// 候选名单
    pub roster: Roster,
    /// 随机数种子
    pub seed: Option<u64>,
}

impl SpinDriverPlugin {
    /// 由命令行参数与内置名单组装
    ///
    /// # Errors
    ///
    /// - 配置无效
    /// - 内置名单无效
    pub fn from_args(args: &ExecArgs) -> Result<Self> {
        Self::with_candidates(args, builtin_candidates())
    }

    /// 由命令行参数与给定候选者组装
    ///
    /// # Errors
    ///
    /// - 配置无效
    /// - 候选者为空或标识重复
    pub fn with_candidates(args: &ExecArgs, candidates: Vec<Candidate>) -> Result<Self> {
        let settings = args.resolve_settings()?;
        let roster = Roster::new(candidates).context("候选名单无效")?;
        Ok(Self {
            settings,
            roster,
            seed: args.seed,
        })
    }
}

impl Plugin for SpinDriverPlugin {
    fn build(&self, app: &mut App) {
        let controller = SelectionController::new(self.roster.clone(), &self.settings);
        app.insert_resource(ChooserSettings(self.settings.clone()))
            .insert_resource(SpinRng::from_seed(self.seed))
            .insert_resource(ChooserState { controller })
            .init_resource::<SpinClock>()
            .init_resource::<PendingSettle>()
            .add_message::<StartSpinRequest>()
            .add_message::<AudioCueMessage>()
            .add_message::<SpinRevealed>()
            .configure_sets(
                Update,
                (
                    ChooserSet::Input,
                    ChooserSet::Logic,
                    ChooserSet::Audio,
                    ChooserSet::Render,
                )
                    .chain(),
            )
            .add_systems(Startup, log_settings)
            .add_systems(
                Update,
                (handle_start_requests, settle_reveal, advance_spin)
                    .chain()
                    .in_set(ChooserSet::Logic),
            );
    }
}

/// 输出当前生效的参数
fn log_settings(settings: Res<ChooserSettings>, state: Res<ChooserState>) {
    let s = &settings.0;
    info!(
        "抽选参数: {} 人 | tick {:?} | {} 圈 | 回弹延迟 {:?}",
        state.controller.roster().len(),
        s.tick_interval,
        s.lap_threshold,
        s.settle_delay
    );
}

/// 将控制器收集到的音频指令转发为消息
fn flush_cues(cues: Vec<AudioCue>, writer: &mut MessageWriter<AudioCueMessage>) {
    for cue in cues {
        writer.write(AudioCueMessage(cue));
    }
}

/// 处理启动请求并启用计时器
fn handle_start_requests(
    mut requests: MessageReader<StartSpinRequest>,
    mut state: ResMut<ChooserState>,
    mut clock: ResMut<SpinClock>,
    settings: Res<ChooserSettings>,
    mut cue_writer: MessageWriter<AudioCueMessage>,
) {
    let mut cues = Vec::new();
    for _ in requests.read() {
        if state.controller.start(&mut cues) {
            debug!("开始转动，起始索引 {}", state.controller.current_index());
            clock.timer = Some(Timer::new(settings.0.tick_interval, TimerMode::Repeating));
        }
    }
    flush_cues(cues, &mut cue_writer);
}

/// 按计时器推进控制器
#[allow(clippy::too_many_arguments)]
fn advance_spin(
    time: Res<Time>,
    mut state: ResMut<ChooserState>,
    mut clock: ResMut<SpinClock>,
    mut rng: ResMut<SpinRng>,
    mut pending: ResMut<PendingSettle>,
    settings: Res<ChooserSettings>,
    mut cue_writer: MessageWriter<AudioCueMessage>,
    mut revealed: MessageWriter<SpinRevealed>,
) {
    let Some(timer) = clock.timer.as_mut() else {
        return;
    };
    timer.tick(time.delta());
    let fired = timer.times_finished_this_tick();

    let mut cues = Vec::new();
    for _ in 0..fired {
        match state.controller.tick(&mut cues, &mut rng.0) {
            TickOutcome::Advanced {
                lap_completed: true,
                ..
            } => {
                debug!("完成一圈: {}", state.controller.laps_completed());
            }
            TickOutcome::Advanced { .. } | TickOutcome::Ignored => {}
            TickOutcome::Stopped(reveal) => {
                // 停止后不再投递 tick
                clock.timer = None;
                pending.pending = Some((
                    reveal.token,
                    Timer::new(settings.0.settle_delay, TimerMode::Once),
                ));
                let name = state
                    .controller
                    .roster()
                    .by_id(reveal.chosen)
                    .map(|c| c.name.clone())
                    .unwrap_or_default();
                if reveal.previous == Some(reveal.chosen) {
                    warn!("名单中没有其他候选者，揭晓结果与停止前相同: {}", name);
                }
                info!("揭晓: {}", name);
                revealed.write(SpinRevealed {
                    candidate: reveal.chosen,
                    name,
                });
                break;
            }
        }
    }
    flush_cues(cues, &mut cue_writer);
}

/// 延迟结束后回弹缩放
fn settle_reveal(
    time: Res<Time>,
    mut state: ResMut<ChooserState>,
    mut pending: ResMut<PendingSettle>,
) {
    let Some((token, timer)) = pending.pending.as_mut() else {
        return;
    };
    timer.tick(time.delta());
    if !timer.just_finished() {
        return;
    }
    let token = *token;
    pending.pending = None;
    if !state.controller.settle(token) {
        debug!("回弹令牌已过期，忽略");
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn from_args_uses_builtin_roster() {
        let args = ExecArgs::parse_from(["random-chooser", "--seed", "4", "--tick-ms", "20"]);
        let plugin = SpinDriverPlugin::from_args(&args).unwrap();
        let names: Vec<&str> = plugin.roster.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Max", "Jameson", "Gabe", "Chaden"]);
        assert_eq!(plugin.seed, Some(4));
        assert_eq!(plugin.settings.tick_interval.as_millis(), 20);
    }

    #[test]
    fn invalid_roster_surfaces_as_startup_error() {
        let args = ExecArgs::parse_from(["random-chooser"]);
        let Err(err) = SpinDriverPlugin::with_candidates(&args, Vec::new()) else {
            panic!("空名单应当被拒绝");
        };
        let msg = format!("{err:#}");
        assert!(msg.contains("候选名单无效"), "{msg}");
        assert!(msg.contains("候选名单为空"), "{msg}");

        let dup = vec![Candidate::named(1, "A"), Candidate::named(1, "B")];
        let Err(err) = SpinDriverPlugin::with_candidates(&args, dup) else {
            panic!("重复标识应当被拒绝");
        };
        assert!(format!("{err:#}").contains("候选者标识重复: 1"));
    }

    #[test]
    fn config_error_reported_before_roster() {
        let args = ExecArgs::parse_from(["random-chooser", "--tick-ms", "0"]);
        let Err(err) = SpinDriverPlugin::from_args(&args) else {
            panic!("tick 间隔为 0 应当被拒绝");
        };
        assert!(format!("{err:#}").contains("tick_interval_ms"));
    }
}
