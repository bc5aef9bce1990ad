use crate::driver::DriverError;
use thiserror::Error;
use trading::{ItemId, StoreError, UnacceptableValue};

/// Which side of the platform's quantity bounds was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityBound {
    Max,
    Min,
}

impl QuantityBound {
    fn label(&self) -> &'static str {
        match self {
            QuantityBound::Max => "Max",
            QuantityBound::Min => "Min",
        }
    }

    fn relation(&self) -> &'static str {
        match self {
            QuantityBound::Max => "below",
            QuantityBound::Min => "above",
        }
    }
}

/// Every failure a gateway operation can report.
///
/// All variants are scoped to the single interaction in progress; none of
/// them is retried automatically.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// A required UI element could not be located.
    #[error("Element `{0}` is not found")]
    ElementNotFound(String),

    #[error("Session has expired")]
    SessionExpired,

    /// An operation was invoked outside a state that allows it.
    #[error("Window hasn't been opened yet")]
    DialogNotOpen,

    #[error("Instrument '{0}' is not found")]
    InstrumentNotFound(String),

    #[error("{} quantity reached, need to be {} {limit}", .bound.label(), .bound.relation())]
    QuantityLimit { bound: QuantityBound, limit: i64 },

    #[error("Cannot buy more than it's possible")]
    BuyNotAllowed,

    /// A creation or edit payload is missing a field or carries a malformed one.
    #[error("{0}")]
    InputValidation(String),

    /// The platform kept the dialog open and reported this text.
    #[error("Confirmation rejected: {0}")]
    ConfirmationRejected(String),

    #[error(transparent)]
    UnacceptableValue(#[from] UnacceptableValue),

    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),

    /// No key mapping exists for the internal id.
    #[error("Guid of `{0}` item is not found")]
    NotFound(ItemId),

    /// The platform has no row for the key.
    #[error("Position is not found, id: {0}")]
    PositionNotFound(String),

    #[error("Position table is empty")]
    TableEmpty,

    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// Text read from the UI did not have the expected shape.
    #[error("Cannot read {what} from `{text}`")]
    MalformedText { what: &'static str, text: String },

    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// A background task died before reporting.
    #[error("Task failed: {0}")]
    TaskFailed(String),
}

impl GatewayError {
    /// True for errors the HTTP boundary reports as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GatewayError::NotFound(_) | GatewayError::PositionNotFound(_)
        )
    }
}

/// A specialized Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
