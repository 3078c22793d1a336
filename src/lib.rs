pub mod animation;
pub mod config;
pub mod controller;
pub mod effect;
pub mod enemy;
pub mod gameplay;
pub mod render;
pub mod settings;
pub mod sprites;
pub mod surface;
pub mod ui;
