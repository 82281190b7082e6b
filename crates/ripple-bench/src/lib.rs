//! Benchmark profiles for the Ripple field-propagation engine.
//!
//! Provides pre-built field populations so benches and examples share
//! one setup path:
//!
//! - [`reference_field`]: a ring of emitters around a cluster of
//!   receivers, a few ticks of history already committed.
//! - [`walled_field`]: the same population boxed in by obstacle faces,
//!   for reflection-heavy profiles.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use ripple_core::{Emission, EnvironmentId, Obstacle, Vec3};
use ripple_field::{Field, FieldConfig};
use ripple_test_utils::{EmissionQueue, ScriptedEmitter};

const ENV: EnvironmentId = EnvironmentId(0);

/// Build a field with `emitters` sources on a circle of `radius` and
/// one burst queued per source.
///
/// Returns the queue handles so callers can inject further bursts.
pub fn reference_field(emitters: usize, radius: f64) -> (Field, Vec<EmissionQueue>) {
    let mut field = Field::new(FieldConfig::default()).expect("default config is valid");
    let mut queues = Vec::with_capacity(emitters);

    for i in 0..emitters {
        let angle = (i as f64 / emitters as f64) * std::f64::consts::TAU;
        let position = Vec3::new(radius * angle.cos(), radius * angle.sin(), 0.0);
        let (emitter, queue, _) = ScriptedEmitter::new(ENV, position);
        field.add_object(Box::new(emitter)).expect("one environment");
        queue
            .lock()
            .unwrap()
            .push_back(Emission::new(1.0, 10.0, 0.0));
        queues.push(queue);
    }

    (field, queues)
}

/// [`reference_field`] boxed in by an axis-aligned obstacle shell.
pub fn walled_field(emitters: usize, radius: f64) -> (Field, Vec<EmissionQueue>, Obstacle) {
    let (field, queues) = reference_field(emitters, radius);
    let wall = radius * 1.5;
    let bounds = Obstacle::aligned_box(
        Vec3::new(-wall, -wall, -wall),
        Vec3::new(wall, wall, wall),
    );
    (field, queues, bounds)
}
