mod app;
mod dom;
mod logger;
mod palette;
mod persistence;
mod render;

pub use app::run;
