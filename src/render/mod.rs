//! Rendering stages built on top of the media engine

pub mod ffwd;
pub mod montage;

pub use ffwd::render_fast_forward;
pub use montage::render_montage;
