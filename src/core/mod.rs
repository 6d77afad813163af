pub mod clock;
pub mod controller;
pub mod gpu_context;
pub mod input_adapter;
pub mod loading;
pub mod render_target;
pub mod surface;
pub mod timer;

pub use clock::{FrameClock, FrameTime};
pub use controller::{Button, Controller};
pub use gpu_context::GpuContext;
pub use input_adapter::WinitController;
pub use loading::{LoadingProgress, SetupStage};
pub use render_target::{RenderTarget, ScreenTargets, TargetSize};
pub use surface::{SurfaceRecovery, WindowSurface};
pub use timer::FpsCounter;
