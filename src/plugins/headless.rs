//! 无窗口运行插件
//!
//! 连续抽选指定次数，每次揭晓输出一行名称，全部完成后退出

use bevy::app::AppExit;
use bevy::prelude::*;

use crate::controller::SpinPhase;
use crate::plugins::spin_driver::{SpinRevealed, StartSpinRequest};
use crate::resources::{ChooserState, ExecArgs};
use crate::schedule::ChooserSet;

/// 无窗口运行进度
#[derive(Resource, Debug, Default)]
pub struct HeadlessRun {
    /// 尚未发出的抽选次数
    remaining: u32,
    /// 已揭晓次数
    revealed: u32,
    /// 目标次数
    total: u32,
}

/// 无窗口运行插件
pub struct HeadlessPlugin;

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HeadlessRun>()
            .add_systems(Startup, plan_run)
            .add_systems(Update, request_next_spin.in_set(ChooserSet::Input))
            .add_systems(Update, print_reveals.in_set(ChooserSet::Render));
    }
}

/// 读取命令行确定抽选次数
fn plan_run(args: Option<Res<ExecArgs>>, mut run: ResMut<HeadlessRun>) {
    let total = args.map_or(1, |a| a.spins);
    *run = HeadlessRun {
        remaining: total,
        revealed: 0,
        total,
    };
}

/// 上一轮完全结束后发起下一轮
fn request_next_spin(
    state: Res<ChooserState>,
    mut run: ResMut<HeadlessRun>,
    mut requests: MessageWriter<StartSpinRequest>,
) {
    if run.remaining == 0 || state.controller.phase() != SpinPhase::Idle {
        return;
    }
    run.remaining -= 1;
    requests.write(StartSpinRequest);
}

/// 输出揭晓结果，全部完成后退出
fn print_reveals(
    mut reveals: MessageReader<SpinRevealed>,
    mut run: ResMut<HeadlessRun>,
    mut exit: MessageWriter<AppExit>,
) {
    for reveal in reveals.read() {
        println!("{}", reveal.name);
        run.revealed += 1;
    }
    if run.revealed >= run.total {
        exit.write(AppExit::Success);
    }
}
