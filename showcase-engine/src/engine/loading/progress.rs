use bevy::prelude::*;

#[derive(Resource, Default, Debug)]
pub struct LoadingProgress {
    pub config_requested: bool,
    pub config_loaded: bool,
    pub scroll_runtime_ready: bool,
}

impl LoadingProgress {
    pub fn is_ready(&self) -> bool {
        self.config_loaded && self.scroll_runtime_ready
    }

    /// Share of loading stages completed, in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        let stages = [
            self.config_requested,
            self.config_loaded,
            self.scroll_runtime_ready,
        ];
        stages.iter().filter(|done| **done).count() as f32 / stages.len() as f32
    }
}
