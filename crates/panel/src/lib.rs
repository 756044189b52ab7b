//! Subcard Panel
//!
//! The stateful side of Subcard: a session that turns typed text into
//! numbered subtitle cards, remembers style and output settings between
//! runs, and stores clip positions in nine preset slots.
//!
//! Host access, storage and folder choosing are passed in explicitly, so the
//! same session runs against a real host bridge or an in-memory one.

pub mod panel;
pub mod presets;
pub mod status;
pub mod store;
pub mod writer;

pub use panel::{GenerateOutcome, GeneratedCard, PanelOptions, SubtitlePanel};
pub use presets::{InteractionMode, PresetAction, PresetController, PresetOutcome};
pub use status::StatusMessage;
pub use store::{
    load_record, save_record, JsonFileStore, KeyValueStore, MemoryStore, StoreError,
    OUTPUT_NAMESPACE, PRESETS_NAMESPACE, STYLE_NAMESPACE,
};
pub use writer::{next_sequence_number, OutputError, SequentialWriter};
