pub mod app;
pub mod canvas;
pub mod strings;
pub mod theme;
