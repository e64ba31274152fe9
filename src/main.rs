//! # Random Chooser 主程序

use bevy::prelude::*;
use clap::Parser;
use random_chooser::logging;
use random_chooser::plugins::{
    AudioManagerPlugin, ChooserViewPlugin, HeadlessPlugin, SpinDriverPlugin,
};
use random_chooser::resources::ExecArgs;

fn main() -> AppExit {
    let args = ExecArgs::parse();
    let driver = match SpinDriverPlugin::from_args(&args) {
        Ok(driver) => driver,
        Err(e) => {
            eprintln!("{e:#}");
            return AppExit::error();
        }
    };

    let mut app = App::new();
    // 无窗口模式下使用 MinimalPlugins，否则使用 DefaultPlugins
    if args.headless {
        app.add_plugins((MinimalPlugins, logging::log_plugin()))
            .add_plugins(driver)
            .add_plugins(HeadlessPlugin);
    } else {
        app.add_plugins(
            DefaultPlugins
                .set(logging::log_plugin())
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Random Chooser".into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .add_plugins(driver)
        .add_plugins((AudioManagerPlugin, ChooserViewPlugin));
    }
    app.insert_resource(args).run()
}
