//! Collect-then-flush instanced drawing.
//!
//! Draws are grouped by model during the frame. [`InstanceRenderer::end`]
//! hands each group to the backend as a single instanced draw, in model
//! handle order, and leaves the renderer empty.

use std::collections::BTreeMap;

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::ModelHandle;

/// Per-instance transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawInstance {
    pub position: Vec3,
    /// Euler angles in radians.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl DrawInstance {
    pub fn model_matrix(&self) -> Mat4 {
        let r = self.rotation;
        let rotation = Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z);
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

/// Consumer of flushed instance groups.
pub trait RenderBackend {
    fn draw_instanced(&mut self, model: ModelHandle, instances: &[DrawInstance]);
}

/// Backend that only counts what it is asked to draw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessBackend {
    pub draw_calls: usize,
    pub instances: usize,
}

impl RenderBackend for HeadlessBackend {
    fn draw_instanced(&mut self, model: ModelHandle, instances: &[DrawInstance]) {
        log::trace!("draw {:?} x{}", model, instances.len());
        self.draw_calls += 1;
        self.instances += instances.len();
    }
}

#[derive(Debug, Clone, Default)]
pub struct InstanceRenderer {
    batches: BTreeMap<ModelHandle, Vec<DrawInstance>>,
}

impl InstanceRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop anything collected since the last flush.
    pub fn begin(&mut self) {
        for instances in self.batches.values_mut() {
            instances.clear();
        }
    }

    pub fn draw(&mut self, model: ModelHandle, position: Vec3, rotation: Vec3, scale: Vec3) {
        self.batches.entry(model).or_default().push(DrawInstance {
            position,
            rotation,
            scale,
        });
    }

    /// Flush one instanced draw per model, then clear.
    pub fn end(&mut self, backend: &mut dyn RenderBackend) {
        for (&model, instances) in &mut self.batches {
            if instances.is_empty() {
                continue;
            }
            backend.draw_instanced(model, instances);
            instances.clear();
        }
    }

    /// Instances collected for `model` this frame.
    pub fn instances(&self, model: ModelHandle) -> &[DrawInstance] {
        self.batches.get(&model).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn instance_count(&self) -> usize {
        self.batches.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.instance_count() == 0
    }
}
