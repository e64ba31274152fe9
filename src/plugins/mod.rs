//! 插件模块
//!
//! 包含所有功能插件的实现

pub mod audio_manager;
pub mod chooser_view;
pub mod headless;
pub mod spin_driver;

pub use audio_manager::AudioManagerPlugin;
pub use chooser_view::ChooserViewPlugin;
pub use headless::HeadlessPlugin;
pub use spin_driver::SpinDriverPlugin;
