use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

use crate::record::{FieldKey, RawRecord};

pub trait DecodeError: Clone + Send + Sync + 'static {
    fn message(&self) -> String;
}

// decode and encode must be total and pure; a codec that panics is a defect
// in the codec, not a condition the controller recovers from.
pub trait FormCodec: Send + Sync + 'static {
    type Value: Clone + Send + Sync + 'static;
    type Error: DecodeError;

    fn decode(&self, raw: &RawRecord) -> Result<Self::Value, Self::Error>;
    fn encode(&self, value: &Self::Value) -> RawRecord;
}

pub trait FormSchema: Clone + Send + Sync + 'static {
    type Fields;
    type Codec: FormCodec<Value = Self>;

    fn fields() -> Self::Fields;
    fn schema() -> Self::Codec;
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SchemaError {
    MissingField(FieldKey),
    InvalidField { key: FieldKey, detail: String },
}

impl SchemaError {
    pub fn key(&self) -> &FieldKey {
        match self {
            SchemaError::MissingField(key) => key,
            SchemaError::InvalidField { key, .. } => key,
        }
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::MissingField(key) => write!(f, "field `{key}` is missing"),
            SchemaError::InvalidField { key, detail } => {
                write!(f, "field `{key}` is invalid: {detail}")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

impl DecodeError for SchemaError {
    fn message(&self) -> String {
        self.to_string()
    }
}

pub struct FnCodec<T, E, D, En> {
    decode: D,
    encode: En,
    _marker: PhantomData<fn() -> (T, E)>,
}

pub fn from_fns<T, E, D, En>(decode: D, encode: En) -> FnCodec<T, E, D, En>
where
    T: Clone + Send + Sync + 'static,
    E: DecodeError,
    D: Fn(&RawRecord) -> Result<T, E> + Send + Sync + 'static,
    En: Fn(&T) -> RawRecord + Send + Sync + 'static,
{
    FnCodec {
        decode,
        encode,
        _marker: PhantomData,
    }
}

impl<T, E, D, En> FormCodec for FnCodec<T, E, D, En>
where
    T: Clone + Send + Sync + 'static,
    E: DecodeError,
    D: Fn(&RawRecord) -> Result<T, E> + Send + Sync + 'static,
    En: Fn(&T) -> RawRecord + Send + Sync + 'static,
{
    type Value = T;
    type Error = E;

    fn decode(&self, raw: &RawRecord) -> Result<T, E> {
        (self.decode)(raw)
    }

    fn encode(&self, value: &T) -> RawRecord {
        (self.encode)(value)
    }
}
