use crate::record::RawRecord;

pub trait ChangeEvent {
    fn value(&self) -> &str;
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValueChange(String);

impl ValueChange {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl ChangeEvent for ValueChange {
    fn value(&self) -> &str {
        &self.0
    }
}

// The narrow capability set a submit trigger must expose: a preventable
// default action plus an optional already-flattened field map. How the host
// scrapes its widget tree into that map is the host's concern.
pub trait SubmitEvent {
    fn prevent_default(&mut self);
    fn form_fields(&self) -> Option<RawRecord>;
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FormSubmission {
    fields: Option<RawRecord>,
    default_prevented: bool,
}

impl FormSubmission {
    pub fn new(fields: RawRecord) -> Self {
        Self {
            fields: Some(fields),
            default_prevented: false,
        }
    }

    pub fn without_target() -> Self {
        Self {
            fields: None,
            default_prevented: false,
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

impl SubmitEvent for FormSubmission {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    fn form_fields(&self) -> Option<RawRecord> {
        self.fields.clone()
    }
}
