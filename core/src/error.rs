use thiserror::Error;

/// Rule failures surfaced to the transport. Display strings are the
/// diagnostics embedded in `cannot flip this card: ...` responses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlipError {
    #[error("no card at ({row},{col})")]
    BadCoord { row: usize, col: usize },
    #[error("card has been removed")]
    Gone,
    #[error("you already control this card")]
    SelfControlled,
    #[error("card is controlled by another player")]
    Controlled,
    #[error("second card is the same as the first")]
    SameCard,
    #[error("timed out waiting for the card to be released")]
    Timeout,
}
