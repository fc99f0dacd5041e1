pub mod ttl;

pub use ttl::{LogEmitter, NullEmitter, RecordingEmitter, TtlEmitter};
