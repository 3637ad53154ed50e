use crate::i18n::TranslationTable;
use std::fmt;

/// Callback invoked after a successful language switch with the new code and
/// its table.
pub type Subscriber = Box<dyn FnMut(&str, &TranslationTable)>;

/// Append-only list of language-change subscribers, dispatched synchronously
/// in registration order.
#[derive(Default)]
pub struct ChangeBus {
    subscribers: Vec<Subscriber>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&str, &TranslationTable) + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn notify(&mut self, language: &str, table: &TranslationTable) {
        for subscriber in &mut self.subscribers {
            subscriber(language, table);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl fmt::Debug for ChangeBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
