use crate::codec::FormCodec;
use crate::controller::{FormController, FormResult};
use crate::event::{ChangeEvent, SubmitEvent};
use crate::record::FieldKey;

impl<C> FormController<C>
where
    C: FormCodec,
{
    pub fn update(&self, key: FieldKey) -> impl Fn(&str) + Send + Sync + 'static {
        let controller = self.clone();
        move |raw: &str| drop(controller.set_value(key.clone(), raw))
    }

    pub fn field(&self, key: FieldKey) -> FieldBinding<C> {
        FieldBinding {
            key,
            controller: self.clone(),
        }
    }

    pub fn submit<F>(&self, handler: F) -> impl FnMut(&mut dyn SubmitEvent) + Send + Sync + 'static
    where
        F: FnMut(C::Value) + Send + Sync + 'static,
    {
        let controller = self.clone();
        let mut handler = handler;
        move |event: &mut dyn SubmitEvent| drop(controller.submit_with(event, &mut handler))
    }
}

pub struct FieldBinding<C>
where
    C: FormCodec,
{
    key: FieldKey,
    controller: FormController<C>,
}

impl<C> Clone for FieldBinding<C>
where
    C: FormCodec,
{
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            controller: self.controller.clone(),
        }
    }
}

impl<C> FieldBinding<C>
where
    C: FormCodec,
{
    pub fn key(&self) -> &FieldKey {
        &self.key
    }

    // None when the field was never entered, not the empty string.
    pub fn value(&self) -> FormResult<Option<String>> {
        Ok(self
            .controller
            .form()?
            .get(self.key.as_str())
            .map(str::to_owned))
    }

    pub fn on_change(&self, event: &dyn ChangeEvent) -> FormResult<()> {
        self.controller.set_value(self.key.clone(), event.value())
    }

    pub fn set(&self, raw: impl Into<String>) -> FormResult<()> {
        self.controller.set_value(self.key.clone(), raw)
    }
}
