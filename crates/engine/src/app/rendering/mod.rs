mod draw_list;
mod raster;
mod renderer;
mod text;

pub use draw_list::{DrawCommand, DrawList, Rgba};
pub use renderer::Renderer;
pub use text::text_extent;

pub(crate) use raster::{blend_rect, draw_rect_outline};
pub(crate) use text::draw_text;
