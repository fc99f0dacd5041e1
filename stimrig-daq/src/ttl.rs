use tracing::info;

/// Binding to the acquisition hardware's event-marker line.
///
/// Returns `false` when the hardware rejected or dropped the code; the
/// caller logs that and keeps sequencing. A failed marker degrades
/// synchronization, it never aborts a trial.
pub trait TtlEmitter {
    fn emit(&mut self, code: i32) -> bool;
}

/// Emitter for sessions running without acquisition hardware attached.
#[derive(Debug, Default, Clone)]
pub struct NullEmitter;

impl TtlEmitter for NullEmitter {
    fn emit(&mut self, _code: i32) -> bool {
        true
    }
}

/// Logs each code instead of driving a device.
#[derive(Debug, Default, Clone)]
pub struct LogEmitter;

impl TtlEmitter for LogEmitter {
    fn emit(&mut self, code: i32) -> bool {
        info!(code, "TTL");
        true
    }
}

/// Captures emitted codes for assertions; can be told to fail.
#[derive(Debug, Default, Clone)]
pub struct RecordingEmitter {
    pub codes: Vec<i32>,
    pub fail: bool,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            codes: Vec::new(),
            fail: true,
        }
    }
}

impl TtlEmitter for RecordingEmitter {
    fn emit(&mut self, code: i32) -> bool {
        self.codes.push(code);
        !self.fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_emitter_keeps_order() {
        let mut ttl = RecordingEmitter::new();
        assert!(ttl.emit(10));
        assert!(ttl.emit(21));
        assert!(ttl.emit(40));
        assert_eq!(ttl.codes, [10, 21, 40]);
    }

    #[test]
    fn failing_emitter_still_records() {
        let mut ttl = RecordingEmitter::failing();
        assert!(!ttl.emit(99));
        assert_eq!(ttl.codes, [99]);
    }
}
