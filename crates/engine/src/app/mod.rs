mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;
mod tools;

pub use loop_runner::{run_app, AppError, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{text_extent, DrawCommand, DrawList, Renderer, Rgba};
pub use scene::{FrameTime, InputSnapshot, Rect, Scene, SceneCommand, SceneKey, Vec2};
pub(crate) use tools::OverlayData;
