//! Error taxonomy for building, reconciling and scheduling.

use std::fmt;

use thiserror::Error;

use crate::scheduler::Input;
use crate::value::Value;

/// A malformed UI description.
///
/// Always returned synchronously from the build call that hit it.
#[derive(Debug, Error)]
#[error("{cause} at `{ancestry}`: {value}")]
pub struct DescriptionError {
    /// Chain of tags leading to the offending value, e.g. `root -> div#app -> ul`.
    pub ancestry: String,
    /// Debug rendering of the offending value.
    pub value: String,
    pub cause: DescriptionCause,
}

impl DescriptionError {
    pub(crate) fn new(ancestry: &str, value: &Value, cause: DescriptionCause) -> Self {
        Self {
            ancestry: ancestry.to_owned(),
            value: format!("{value:?}"),
            cause,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DescriptionCause {
    #[error("value is not a recognized description shape")]
    UnrecognizedShape,
    #[error("description sequence must hold 1 to 3 items, found {0}")]
    SequenceLength(usize),
    #[error("first item of a description must be a tag string or a component")]
    UnexpectedHead,
    #[error("tag `{0}` does not match `name[#id][.class]*[|style]`")]
    InvalidTag(String),
    #[error("attributes must be a mapping")]
    AttributesNotMapping,
    #[error("children must be a sequence")]
    ChildrenNotSequence,
    #[error("key `{0}` may only contain word characters and dashes")]
    InvalidKey(String),
    #[error("key must be a string or a number")]
    KeyNotScalar,
    #[error("duplicate key `{0}`")]
    DuplicateKey(String),
}

/// Failure reported by a [`Host`](crate::Host) operation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("host operation failed: {message}")]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure while materializing or patching a live tree.
///
/// The live tree keeps whatever mutations were applied before the failure and
/// still records every child that reached the screen.
#[derive(Debug, Error)]
pub enum ReconciliationError {
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("child `{0}` is listed in the child order but missing from the child map")]
    MissingChild(String),
}

/// Readiness inputs still missing after the diagnostic delay.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("could not draw, still missing: {}", MissingList(.missing))]
pub struct ConfigurationError {
    pub missing: Vec<Input>,
}

struct MissingList<'a>(&'a [Input]);

impl fmt::Display for MissingList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, input) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{input}")?;
        }
        Ok(())
    }
}

/// Any error a render root can report.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Description(#[from] DescriptionError),
    #[error(transparent)]
    Reconciliation(#[from] ReconciliationError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl From<HostError> for Error {
    fn from(error: HostError) -> Self {
        Error::Reconciliation(ReconciliationError::Host(error))
    }
}
