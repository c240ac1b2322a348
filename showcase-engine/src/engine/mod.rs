pub mod assets;
pub mod camera;
pub mod core;
pub mod device;
pub mod hud;
pub mod loading;
pub mod overlay;
pub mod quality;
pub mod scene;
pub mod scroll;
pub mod systems;
