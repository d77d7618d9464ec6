pub mod components;
pub mod screens;
pub mod text;
pub mod theme;

pub use theme::Theme;
