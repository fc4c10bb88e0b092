use std::sync::Arc;

use crate::{Notify, Store};

mod submit_form;

pub use submit_form::SubmitFormInput;

/// Intake and notification for contact submissions.
///
/// `store` is `None` when persistence is disabled.
#[derive(Clone)]
pub struct Command {
    pub store: Option<Arc<dyn Store>>,
    pub notifier: Arc<dyn Notify>,
}

impl Command {
    pub fn new(store: Option<Arc<dyn Store>>, notifier: Arc<dyn Notify>) -> Self {
        Self { store, notifier }
    }
}
