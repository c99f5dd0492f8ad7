mod binding;
mod codec;
mod controller;
mod draft;
mod event;
mod record;


pub use formbind_schema_derive::FormSchema;

pub use binding::FieldBinding;
pub use codec::{DecodeError, FnCodec, FormCodec, FormSchema, SchemaError, from_fns};
pub use controller::{
    FormController, FormError, FormId, FormPhase, FormResult, FormSnapshot, ObserverId,
    SubmitOutcome,
};
pub use draft::{DraftStore, InMemoryDraftStore};
pub use event::{ChangeEvent, FormSubmission, SubmitEvent, ValueChange};
pub use record::{FieldKey, RawRecord};
