//! Sequence numbers for superseding requests.

/// Identifier attached to a dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceNumber(u64);

impl SequenceNumber {
    /// Raw value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out monotonically increasing sequence numbers and remembers the
/// latest one.
///
/// A response may only be applied if it answers the latest request; anything
/// older has been superseded.
///
/// # Example
///
/// ```
/// use shared::session::RequestSequence;
///
/// let mut sequence = RequestSequence::new();
/// let first = sequence.advance();
/// let second = sequence.advance();
///
/// assert!(!sequence.is_latest(first));
/// assert!(sequence.is_latest(second));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    /// Creates a sequence that has not issued anything yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next sequence number, superseding every earlier one.
    pub fn advance(&mut self) -> SequenceNumber {
        self.latest += 1;
        SequenceNumber(self.latest)
    }

    /// Latest issued number, if any.
    #[must_use]
    pub fn latest(&self) -> Option<SequenceNumber> {
        (self.latest > 0).then_some(SequenceNumber(self.latest))
    }

    /// Returns `true` if `seq` is the most recently issued number.
    #[must_use]
    pub fn is_latest(&self, seq: SequenceNumber) -> bool {
        self.latest > 0 && seq.0 == self.latest
    }
}
