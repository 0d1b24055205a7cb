//! Decoder states

/// Position of the decoder within one transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecoderState {
    /// Waiting for the start marker after a boundary
    Idle,
    /// Expecting a row number or the terminating marker
    AwaitingRow,
    /// Copying row data into the framebuffer
    ReceivingData,
    /// Row complete, expecting the row marker
    AwaitingNextRowOrEnd,
    /// Transaction terminated cleanly
    Done,
    /// Malformed stream; frozen until the next boundary
    Error,
}

impl DecoderState {
    /// Short label for reports
    pub fn label(&self) -> &'static str {
        match self {
            DecoderState::Idle => "idle",
            DecoderState::AwaitingRow => "row",
            DecoderState::ReceivingData => "data",
            DecoderState::AwaitingNextRowOrEnd => "active",
            DecoderState::Done => "done",
            DecoderState::Error => "error",
        }
    }
}
