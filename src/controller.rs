//! 抽选控制器
//!
//! 显式状态机 `Idle -> Spinning(laps) -> Revealing(token) -> Idle`，
//! 由外部的 tick 与启动请求推进，不依赖具体的调度方式。
//! 音频通过注入的 [`AudioService`] 通知。

use rand::Rng;

use crate::config::SpinSettings;
use crate::roster::{Candidate, CandidateId, Roster};

/// 可循环播放的音效
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopSound {
    /// 转动中的循环音
    Spinning,
}

impl LoopSound {
    /// 资源路径（相对 assets 目录）
    #[must_use]
    pub const fn asset_path(self) -> &'static str {
        match self {
            Self::Spinning => "sounds/spinning.mp3",
        }
    }
}

/// 单次播放的音效
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OneShotSound {
    /// 揭晓提示音
    Win,
}

impl OneShotSound {
    /// 资源路径（相对 assets 目录）
    #[must_use]
    pub const fn asset_path(self) -> &'static str {
        match self {
            Self::Win => "sounds/win.mp3",
        }
    }
}

/// 音频服务接口
///
/// 资源未能加载时，实现方应把调用当作空操作。
pub trait AudioService {
    /// 开始循环播放
    fn play_loop(&mut self, sound: LoopSound);
    /// 停止循环播放并回到开头
    fn stop(&mut self, sound: LoopSound);
    /// 播放一次
    fn play_once(&mut self, sound: OneShotSound);
}

/// 控制器发出的音频指令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// 开始循环
    PlayLoop(LoopSound),
    /// 停止循环
    StopLoop(LoopSound),
    /// 单次播放
    PlayOnce(OneShotSound),
}

/// 收集指令，稍后统一转发
impl AudioService for Vec<AudioCue> {
    fn play_loop(&mut self, sound: LoopSound) {
        self.push(AudioCue::PlayLoop(sound));
    }

    fn stop(&mut self, sound: LoopSound) {
        self.push(AudioCue::StopLoop(sound));
    }

    fn play_once(&mut self, sound: OneShotSound) {
        self.push(AudioCue::PlayOnce(sound));
    }
}

/// 揭晓动画回弹的取消令牌
///
/// 每次 `start` 都会递增代数，旧令牌随之失效。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SettleToken(u64);

/// 控制器阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinPhase {
    /// 空闲
    Idle,
    /// 转动中
    Spinning {
        /// 已完成圈数
        laps_completed: u32,
    },
    /// 已揭晓，等待缩放回弹
    Revealing {
        /// 回弹令牌
        token: SettleToken,
    },
}

/// 一次揭晓的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reveal {
    /// 停止前显示的候选者
    pub previous: Option<CandidateId>,
    /// 最终选中的候选者
    pub chosen: CandidateId,
    /// 回弹令牌
    pub token: SettleToken,
}

/// 单次 tick 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// 未在转动，忽略
    Ignored,
    /// 前进一格
    Advanced {
        /// 新的索引
        index: usize,
        /// 本次是否完成一圈
        lap_completed: bool,
    },
    /// 达到圈数阈值并自动停止
    Stopped(Reveal),
}

/// 抽选控制器
#[derive(Debug, Clone)]
pub struct SelectionController {
    roster: Roster,
    current_index: usize,
    phase: SpinPhase,
    displayed: Option<CandidateId>,
    visual_scale: f32,
    pressed: bool,
    generation: u64,
    lap_threshold: u32,
    pulse_scale: f32,
    overshoot_scale: f32,
}

impl SelectionController {
    /// 创建控制器
    #[must_use]
    pub fn new(roster: Roster, settings: &SpinSettings) -> Self {
        Self {
            roster,
            current_index: 0,
            phase: SpinPhase::Idle,
            displayed: None,
            visual_scale: 1.0,
            pressed: false,
            generation: 0,
            lap_threshold: settings.lap_threshold,
            pulse_scale: settings.pulse_scale,
            overshoot_scale: settings.overshoot_scale,
        }
    }

    /// 候选名单
    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    /// 当前阶段
    #[must_use]
    pub const fn phase(&self) -> SpinPhase {
        self.phase
    }

    /// 是否转动中
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.phase, SpinPhase::Spinning { .. })
    }

    /// 当前索引
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    /// 本轮已完成圈数，非转动阶段为 0
    #[must_use]
    pub const fn laps_completed(&self) -> u32 {
        match self.phase {
            SpinPhase::Spinning { laps_completed } => laps_completed,
            _ => 0,
        }
    }

    /// 当前显示的候选者
    #[must_use]
    pub fn displayed(&self) -> Option<&Candidate> {
        self.displayed.and_then(|id| self.roster.by_id(id))
    }

    /// 当前显示的候选者，首次抽选前退回名单第一人
    #[must_use]
    pub fn displayed_or_first(&self) -> &Candidate {
        self.displayed().unwrap_or_else(|| self.roster.first())
    }

    /// 目标缩放
    #[must_use]
    pub const fn visual_scale(&self) -> f32 {
        self.visual_scale
    }

    /// 开始转动
    ///
    /// 已在转动时为空操作，返回 `false`。
    pub fn start<A: AudioService + ?Sized>(&mut self, audio: &mut A) -> bool {
        if self.is_running() {
            return false;
        }
        // 使尚未触发的回弹失效
        self.generation = self.generation.wrapping_add(1);
        self.phase = SpinPhase::Spinning { laps_completed: 0 };
        // 转动期间显示的总是当前索引处的候选者
        self.displayed = self.roster.get(self.current_index).map(|c| c.id);
        self.pressed = true;
        self.visual_scale = self.pulse_scale;
        audio.play_loop(LoopSound::Spinning);
        true
    }

    /// 推进一格
    pub fn tick<A, R>(&mut self, audio: &mut A, rng: &mut R) -> TickOutcome
    where
        A: AudioService + ?Sized,
        R: Rng + ?Sized,
    {
        let SpinPhase::Spinning { laps_completed } = self.phase else {
            return TickOutcome::Ignored;
        };
        let n = self.roster.len();
        self.current_index = (self.current_index + 1) % n;
        self.displayed = self.roster.get(self.current_index).map(|c| c.id);

        self.pressed = !self.pressed;
        self.visual_scale = if self.pressed { self.pulse_scale } else { 1.0 };

        let lap_completed = self.current_index == n - 1;
        let laps = if lap_completed {
            laps_completed + 1
        } else {
            laps_completed
        };
        self.phase = SpinPhase::Spinning {
            laps_completed: laps,
        };

        if laps >= self.lap_threshold
            && let Some(reveal) = self.stop(audio, rng)
        {
            return TickOutcome::Stopped(reveal);
        }
        TickOutcome::Advanced {
            index: self.current_index,
            lap_completed,
        }
    }

    /// 停止转动并揭晓结果
    ///
    /// 未在转动时返回 `None`。
    pub fn stop<A, R>(&mut self, audio: &mut A, rng: &mut R) -> Option<Reveal>
    where
        A: AudioService + ?Sized,
        R: Rng + ?Sized,
    {
        if !self.is_running() {
            return None;
        }
        let token = SettleToken(self.generation);
        self.phase = SpinPhase::Revealing { token };
        audio.stop(LoopSound::Spinning);

        let previous = self.displayed;
        let idx = self.roster.pick_excluding(previous, rng);
        let chosen = self.roster.get(idx).map(|c| c.id)?;
        self.displayed = Some(chosen);

        audio.play_once(OneShotSound::Win);
        self.pressed = false;
        self.visual_scale = self.overshoot_scale;

        Some(Reveal {
            previous,
            chosen,
            token,
        })
    }

    /// 回弹到正常大小
    ///
    /// 令牌过期（期间又开始了新的一轮）时为空操作，返回 `false`。
    pub fn settle(&mut self, token: SettleToken) -> bool {
        match self.phase {
            SpinPhase::Revealing { token: current } if current == token => {
                self.phase = SpinPhase::Idle;
                self.visual_scale = 1.0;
                true
            }
            _ => false,
        }
    }
}
