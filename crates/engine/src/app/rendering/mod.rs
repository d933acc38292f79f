mod canvas;
pub(crate) mod font;
mod renderer;

pub(crate) use renderer::Renderer;
