pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod demo;
pub mod geometry;
pub mod renderer;
pub mod scene;
pub mod types;
pub mod ui;

pub use config::DemoConfig;
pub use demo::Demo;
pub use renderer::{plan_frame, FrameReport, PassTarget, SceneRenderer};
