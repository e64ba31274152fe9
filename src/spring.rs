//! 缩放弹簧动画
//!
//! 阻尼谐振子，角频率为 `2π / response`，阻尼比为 `damping`。
//! 以子步长做半隐式欧拉积分，子步长同时受帧长与角频率约束，帧间隔较大或弹簧很硬时仍保持稳定。

use std::f32::consts::TAU;

/// 最大积分子步长（秒）
const MAX_SUBSTEP: f32 = 1.0 / 240.0;

/// 单个子步内 `omega * h` 的上限，保证半隐式欧拉在阻尼比不超过 1 时收敛
const MAX_PHASE_STEP: f32 = 0.5;

/// 允许配置的最小响应时间（秒）
pub const MIN_RESPONSE: f32 = 0.02;

/// 视为静止的阈值
const REST_EPSILON: f32 = 1e-4;

/// 缩放弹簧
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleSpring {
    value: f32,
    velocity: f32,
    omega: f32,
    damping: f32,
}

impl ScaleSpring {
    /// 以给定响应时间与阻尼比创建，初始值为 1.0
    #[must_use]
    pub fn new(response: f32, damping: f32) -> Self {
        Self {
            value: 1.0,
            velocity: 0.0,
            omega: TAU / response,
            damping,
        }
    }

    /// 当前值
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// 是否已静止在目标处
    #[must_use]
    pub fn is_at_rest(&self, target: f32) -> bool {
        (self.value - target).abs() < REST_EPSILON && self.velocity.abs() < REST_EPSILON
    }

    /// 朝目标推进 `dt` 秒，返回新值
    pub fn step(&mut self, target: f32, dt: f32) -> f32 {
        if dt <= 0.0 {
            return self.value;
        }
        let max_h = MAX_SUBSTEP.min(MAX_PHASE_STEP / self.omega);
        let steps = (dt / max_h).ceil().max(1.0);
        let h = dt / steps;
        for _ in 0..steps as u32 {
            let accel = -self.omega * self.omega * (self.value - target)
                - 2.0 * self.damping * self.omega * self.velocity;
            self.velocity += accel * h;
            self.value += self.velocity * h;
        }
        self.value
    }
}

impl Default for ScaleSpring {
    fn default() -> Self {
        Self::new(0.5, 0.6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_to_target() {
        let mut spring = ScaleSpring::default();
        for _ in 0..300 {
            spring.step(1.2, 1.0 / 60.0);
        }
        assert!((spring.value() - 1.2).abs() < 1e-3);
    }

    #[test]
    fn underdamped_overshoots_but_stays_bounded() {
        let mut spring = ScaleSpring::default();
        let mut peak = 1.0_f32;
        for _ in 0..120 {
            peak = peak.max(spring.step(1.2, 1.0 / 60.0));
        }
        assert!(peak > 1.2);
        assert!(peak < 1.4);
    }

    #[test]
    fn large_frame_delta_is_stable() {
        let mut spring = ScaleSpring::default();
        for _ in 0..20 {
            spring.step(0.95, 0.25);
        }
        assert!((spring.value() - 0.95).abs() < 1e-3);
    }

    #[test]
    fn stiffest_accepted_spring_stays_finite() {
        for damping in [0.05, 0.6, 1.0] {
            let mut spring = ScaleSpring::new(MIN_RESPONSE, damping);
            for _ in 0..120 {
                let v = spring.step(1.2, 1.0 / 60.0);
                assert!(v.is_finite(), "发散: damping {damping}");
            }
            assert!((spring.value() - 1.2).abs() < 1e-3);
        }
    }

    #[test]
    fn very_short_response_does_not_diverge() {
        let mut spring = ScaleSpring::new(0.005, 0.6);
        for _ in 0..60 {
            spring.step(1.2, 1.0 / 60.0);
        }
        assert!(spring.value().is_finite());
        assert!((spring.value() - 1.2).abs() < 1e-3);
    }

    #[test]
    fn zero_delta_is_noop() {
        let mut spring = ScaleSpring::default();
        assert!((spring.step(2.0, 0.0) - 1.0).abs() < f32::EPSILON);
        assert!(spring.is_at_rest(1.0));
    }
}
