//! Inkboard Render Library
//!
//! Renderer abstraction and implementations for Inkboard.
//! The default implementation rasterizes frames on the CPU with tiny-skia.

mod renderer;
mod skia_impl;

pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
pub use skia_impl::SkiaRenderer;
