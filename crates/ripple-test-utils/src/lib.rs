//! Shared test fixtures for the Ripple workspace.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod fixtures;

pub use fixtures::{
    new_emission_queue, new_reading_log, EmissionQueue, ReadingLog, RecordingReceiver,
    ScriptedEmitter, StaticBackend, StaticShape,
};
