// Engine module - scene graph, camera, animation and GPU rendering

pub mod animation;
pub mod camera;
pub mod components;
pub mod geometry;
pub mod glow;
pub mod input;
pub mod mesh;
pub mod overlay;
pub mod renderer;
pub mod scene;

// Re-export commonly used items
pub use animation::FrameClock;
pub use input::InputState;
pub use overlay::{FrameStats, Overlay, OverlayContent, StatsAccumulator};
pub use renderer::Renderer;
pub use scene::{ContainerSize, SceneContext};
