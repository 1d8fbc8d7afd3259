//! Frame timing.

use bevy_ecs::prelude::*;

/// Length of one frame in seconds, passed to every scene update.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
pub struct TimeStep(pub f32);

impl TimeStep {
    pub fn seconds(self) -> f32 {
        self.0
    }

    pub fn millis(self) -> f32 {
        self.0 * 1000.0
    }
}

impl From<f32> for TimeStep {
    fn from(seconds: f32) -> Self {
        Self(seconds)
    }
}

/// Time resource updated by the scene at the start of every frame.
#[derive(Resource, Debug, Clone, Default)]
pub struct TimeRes {
    /// Seconds elapsed in the current frame.
    pub delta: f32,
    /// Seconds accumulated while the scene was playing.
    pub elapsed: f64,
    /// Frames updated since the world was created.
    pub frame: u64,
}

impl TimeRes {
    pub fn advance(&mut self, ts: TimeStep, playing: bool) {
        self.delta = ts.seconds();
        self.frame += 1;
        if playing {
            self.elapsed += f64::from(ts.seconds());
        }
    }
}
