//! Request payloads accepted by the execute endpoints.

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::encode::Encode;
use crate::operation::{GetAllElements, GetElements, GetWalks, Limit, Operation, OperationChain};

/// A document to submit: a typed operation or a raw JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A pre-built JSON document, sent as-is.
    Raw(Value),
    /// An operation, encoded at submission time.
    Operation(Operation),
}

impl Payload {
    /// Produce the JSON request body.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Raw(value) => value.clone(),
            Self::Operation(op) => op.encode(),
        }
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Raw(value) => value.serialize(serializer),
            Self::Operation(op) => op.serialize(serializer),
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Raw(value)
    }
}

impl From<Operation> for Payload {
    fn from(op: Operation) -> Self {
        Self::Operation(op)
    }
}

macro_rules! payload_from_operation {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Payload {
                fn from(op: $ty) -> Self {
                    Self::Operation(op.into())
                }
            }
        )*
    };
}

payload_from_operation!(GetAllElements, GetElements, Limit, GetWalks, OperationChain);
