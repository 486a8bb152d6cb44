pub mod html;
pub mod render;
