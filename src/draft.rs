use std::collections::BTreeMap;
use std::convert::Infallible;
use std::sync::{Arc, RwLock};

use crate::codec::FormCodec;
use crate::controller::{FormController, FormError, FormId, FormResult, read_lock};
use crate::record::RawRecord;

pub trait DraftStore: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    fn save(&self, form_id: FormId, record: &RawRecord) -> Result<(), Self::Error>;
    fn load(&self, form_id: FormId) -> Result<Option<RawRecord>, Self::Error>;
    fn clear(&self, form_id: FormId) -> Result<(), Self::Error>;
}

#[derive(Clone)]
pub struct InMemoryDraftStore {
    state: Arc<RwLock<BTreeMap<FormId, RawRecord>>>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }
}

impl Default for InMemoryDraftStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftStore for InMemoryDraftStore {
    type Error = Infallible;

    fn save(&self, form_id: FormId, record: &RawRecord) -> Result<(), Self::Error> {
        let mut state = match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.insert(form_id, record.clone());
        Ok(())
    }

    fn load(&self, form_id: FormId) -> Result<Option<RawRecord>, Self::Error> {
        let state = match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let record = state.get(&form_id).cloned();
        Ok(record)
    }

    fn clear(&self, form_id: FormId) -> Result<(), Self::Error> {
        let mut state = match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.remove(&form_id);
        Ok(())
    }
}

impl<C> FormController<C>
where
    C: FormCodec,
{
    pub fn save_draft<S>(&self, store: &S) -> FormResult<()>
    where
        S: DraftStore,
    {
        let state = read_lock(&self.state, "saving draft")?;
        store
            .save(state.id, &state.form)
            .map_err(|error| FormError::DraftSaveFailed(error.to_string()))
    }

    // A loaded draft goes through set_form, so it lands in Valid or Invalid
    // like any other bulk replacement.
    pub fn load_draft<S>(&self, store: &S) -> FormResult<bool>
    where
        S: DraftStore,
    {
        let form_id = self.form_id()?;
        let Some(draft) = store
            .load(form_id)
            .map_err(|error| FormError::DraftLoadFailed(error.to_string()))?
        else {
            return Ok(false);
        };
        self.set_form(draft)?;
        Ok(true)
    }

    pub fn clear_draft<S>(&self, store: &S) -> FormResult<()>
    where
        S: DraftStore,
    {
        let form_id = self.form_id()?;
        store
            .clear(form_id)
            .map_err(|error| FormError::DraftClearFailed(error.to_string()))
    }
}
