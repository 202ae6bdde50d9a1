//! Rendering module
//!
//! Backends receive a `Scene` built from read-only state and never see the
//! simulation itself.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;
pub mod text;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use shapes::{Scene, Shape, build_scene};
pub use text::TextRenderer;

/// Drawing capability injected into the session
pub trait Renderer {
    fn draw(&mut self, scene: &Scene);
}

impl<T: Renderer + ?Sized> Renderer for Box<T> {
    fn draw(&mut self, scene: &Scene) {
        (**self).draw(scene)
    }
}

/// Discards every frame
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw(&mut self, _scene: &Scene) {}
}
