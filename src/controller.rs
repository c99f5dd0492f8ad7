use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::codec::{DecodeError, FormCodec};
use crate::event::SubmitEvent;
use crate::record::{FieldKey, RawRecord};

static FORM_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);
static OBSERVER_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FormId(pub u64);

impl FormId {
    pub fn next() -> Self {
        Self(FORM_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ObserverId(pub u64);

impl ObserverId {
    pub fn next() -> Self {
        Self(OBSERVER_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst))
    }
}

// Pristine is only the freshly constructed both-absent state; once a
// reconcile has run, the form moves between Valid and Invalid forever.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FormPhase {
    Pristine,
    Valid,
    Invalid,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmitOutcome {
    Dispatched,
    Rejected,
    NoTarget,
}

#[derive(Clone, Debug)]
pub struct FormSnapshot<T, E> {
    pub form: RawRecord,
    pub data: Option<T>,
    pub error: Option<E>,
    pub phase: FormPhase,
    pub is_valid: bool,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FormError {
    StatePoisoned(&'static str),
    DraftLoadFailed(String),
    DraftSaveFailed(String),
    DraftClearFailed(String),
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::StatePoisoned(context) => {
                write!(f, "form state lock poisoned while {context}")
            }
            FormError::DraftLoadFailed(error) => write!(f, "failed to load draft: {error}"),
            FormError::DraftSaveFailed(error) => write!(f, "failed to save draft: {error}"),
            FormError::DraftClearFailed(error) => write!(f, "failed to clear draft: {error}"),
        }
    }
}

impl std::error::Error for FormError {}

pub type FormResult<T> = Result<T, FormError>;

pub(crate) type ObserverFn<T, E> = Arc<dyn Fn(&FormSnapshot<T, E>) + Send + Sync>;

pub(crate) struct FormState<T, E> {
    pub(crate) id: FormId,
    pub(crate) form: RawRecord,
    pub(crate) data: Option<T>,
    pub(crate) error: Option<E>,
}

impl<T, E> FormState<T, E> {
    fn phase(&self) -> FormPhase {
        match (&self.data, &self.error) {
            (None, None) => FormPhase::Pristine,
            (_, None) => FormPhase::Valid,
            (_, Some(_)) => FormPhase::Invalid,
        }
    }
}

pub struct FormController<C>
where
    C: FormCodec,
{
    pub(crate) codec: Arc<C>,
    pub(crate) state: Arc<RwLock<FormState<C::Value, C::Error>>>,
    pub(crate) observers: Arc<RwLock<BTreeMap<ObserverId, ObserverFn<C::Value, C::Error>>>>,
}

impl<C> Clone for FormController<C>
where
    C: FormCodec,
{
    fn clone(&self) -> Self {
        Self {
            codec: self.codec.clone(),
            state: self.state.clone(),
            observers: self.observers.clone(),
        }
    }
}

impl<C> FormController<C>
where
    C: FormCodec,
{
    pub fn new(codec: C) -> Self {
        Self {
            codec: Arc::new(codec),
            state: Arc::new(RwLock::new(FormState {
                id: FormId::next(),
                form: RawRecord::new(),
                data: None,
                error: None,
            })),
            observers: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    pub fn form_id(&self) -> FormResult<FormId> {
        Ok(read_lock(&self.state, "reading form id")?.id)
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot<C::Value, C::Error>> {
        let state = read_lock(&self.state, "creating form snapshot")?;
        Ok(FormSnapshot {
            form: state.form.clone(),
            data: state.data.clone(),
            error: state.error.clone(),
            phase: state.phase(),
            is_valid: state.error.is_none(),
        })
    }

    pub fn form(&self) -> FormResult<RawRecord> {
        Ok(read_lock(&self.state, "reading form record")?.form.clone())
    }

    pub fn data(&self) -> FormResult<Option<C::Value>> {
        Ok(read_lock(&self.state, "reading decoded data")?.data.clone())
    }

    pub fn error(&self) -> FormResult<Option<C::Error>> {
        Ok(read_lock(&self.state, "reading decode error")?.error.clone())
    }

    pub fn error_message(&self) -> FormResult<Option<String>> {
        Ok(read_lock(&self.state, "reading decode error message")?
            .error
            .as_ref()
            .map(DecodeError::message))
    }

    pub fn is_valid(&self) -> FormResult<bool> {
        Ok(read_lock(&self.state, "reading validity")?.error.is_none())
    }

    pub fn phase(&self) -> FormResult<FormPhase> {
        Ok(read_lock(&self.state, "reading form phase")?.phase())
    }

    // Bulk replacement: the candidate is taken as-is, keys missing from it
    // are cleared. Per-field merging is set_value's job.
    pub fn set_form(&self, next: RawRecord) -> FormResult<()> {
        self.reconcile(next)
    }

    pub fn set_value(&self, key: impl Into<FieldKey>, raw: impl Into<String>) -> FormResult<()> {
        let candidate = {
            read_lock(&self.state, "building merge candidate")?
                .form
                .merged(key, raw)
        };
        self.reconcile(candidate)
    }

    pub fn submit_with<F>(
        &self,
        event: &mut dyn SubmitEvent,
        handler: F,
    ) -> FormResult<SubmitOutcome>
    where
        F: FnOnce(C::Value),
    {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("form_submit").entered();

        event.prevent_default();
        let Some(fields) = event.form_fields() else {
            return Ok(SubmitOutcome::NoTarget);
        };

        // One-shot validate-and-dispatch from the event's own snapshot. The
        // tracked form and data stay untouched on both outcomes.
        match self.codec.decode(&fields) {
            Ok(value) => {
                handler(value);
                Ok(SubmitOutcome::Dispatched)
            }
            Err(error) => {
                {
                    let mut state = write_lock(&self.state, "recording submit failure")?;
                    state.error = Some(error);
                }
                self.notify_observers()?;
                Ok(SubmitOutcome::Rejected)
            }
        }
    }

    pub fn register_observer<F>(&self, observer: F) -> FormResult<ObserverId>
    where
        F: Fn(&FormSnapshot<C::Value, C::Error>) + Send + Sync + 'static,
    {
        let id = ObserverId::next();
        let mut observers = write_lock(&self.observers, "registering observer")?;
        observers.insert(id, Arc::new(observer));
        Ok(id)
    }

    pub fn unregister_observer(&self, id: ObserverId) -> FormResult<bool> {
        let mut observers = write_lock(&self.observers, "unregistering observer")?;
        Ok(observers.remove(&id).is_some())
    }

    pub(crate) fn reconcile(&self, candidate: RawRecord) -> FormResult<()> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("form_reconcile", field_count = candidate.len()).entered();

        let outcome = self.codec.decode(&candidate);
        {
            let mut state = write_lock(&self.state, "reconciling form state")?;
            match outcome {
                Ok(value) => {
                    state.form = self.codec.encode(&value);
                    state.data = Some(value);
                    state.error = None;
                }
                Err(error) => {
                    // Keep what the user typed, exactly. No partial encode.
                    state.form = candidate;
                    state.data = None;
                    state.error = Some(error);
                }
            }
        }
        self.notify_observers()
    }

    pub(crate) fn notify_observers(&self) -> FormResult<()> {
        // Observers are cloned out before invocation so a callback can call
        // back into the controller without deadlocking on the registry lock.
        let observers = read_lock(&self.observers, "notifying observers")?
            .values()
            .cloned()
            .collect::<Vec<_>>();
        if observers.is_empty() {
            return Ok(());
        }
        let snapshot = self.snapshot()?;
        for observer in observers {
            observer(&snapshot);
        }
        Ok(())
    }
}

pub(crate) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(crate) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
