// core/tests/common/mod.rs
//
// Scriptable adaptor shared by the controller integration tests. Every call
// is appended to a shared journal so tests can check ordering after the
// adaptor has been moved into the controller.
#![allow(dead_code)]

use libkeyboarding_core::{
    AdaptorError, AdaptorId, Category, FocusEvent, InputLanguage, KeyboardDefinition,
    RetrievingAdaptor, SetupApplication,
};
use std::sync::{Arc, Mutex};

pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

pub struct MockAdaptor {
    id: &'static str,
    category: Category,
    applicable: bool,
    fail_initialize: bool,
    fail_enumeration: bool,
    keyboards: Vec<(String, String, Category)>,
    fail_activation: Vec<String>,
    default: Option<(String, String)>,
    host_active: Option<(String, String)>,
    setup: Option<SetupApplication>,
    secondary_setup: bool,
    journal: Journal,
}

impl MockAdaptor {
    pub fn new(id: &'static str, category: Category, journal: &Journal) -> Self {
        Self {
            id,
            category,
            applicable: true,
            fail_initialize: false,
            fail_enumeration: false,
            keyboards: Vec::new(),
            fail_activation: Vec::new(),
            default: None,
            host_active: None,
            setup: None,
            secondary_setup: false,
            journal: Arc::clone(journal),
        }
    }

    pub fn primary(journal: &Journal) -> Self {
        Self::new("sys", Category::Primary, journal)
    }

    pub fn secondary(journal: &Journal) -> Self {
        Self::new("im", Category::Secondary, journal)
    }

    pub fn keyboard(self, layout: &str, locale: &str) -> Self {
        let category = self.category;
        self.keyboard_in(category, layout, locale)
    }

    /// Enumerate a keyboard of another category than the adaptor's own.
    pub fn keyboard_in(mut self, category: Category, layout: &str, locale: &str) -> Self {
        self.keyboards.push((layout.to_string(), locale.to_string(), category));
        self
    }

    pub fn not_applicable(mut self) -> Self {
        self.applicable = false;
        self
    }

    pub fn failing_initialize(mut self) -> Self {
        self.fail_initialize = true;
        self
    }

    pub fn failing_enumeration(mut self) -> Self {
        self.fail_enumeration = true;
        self
    }

    pub fn failing_activation(mut self, layout: &str) -> Self {
        self.fail_activation.push(layout.to_string());
        self
    }

    pub fn default_keyboard(mut self, layout: &str, locale: &str) -> Self {
        self.default = Some((layout.to_string(), locale.to_string()));
        self
    }

    pub fn host_active(mut self, layout: &str, locale: &str) -> Self {
        self.host_active = Some((layout.to_string(), locale.to_string()));
        self
    }

    pub fn setup(mut self, program: &str, secondary: bool) -> Self {
        self.setup = Some(SetupApplication::new(program));
        self.secondary_setup = secondary;
        self
    }

    pub fn boxed(self) -> Box<dyn RetrievingAdaptor> {
        Box::new(self)
    }

    fn record(&self, entry: String) {
        self.journal.lock().unwrap().push(format!("{}:{}", self.id, entry));
    }

    fn definition(&self, layout: &str, locale: &str) -> KeyboardDefinition {
        self.definition_in(self.category, layout, locale)
    }

    fn definition_in(&self, category: Category, layout: &str, locale: &str) -> KeyboardDefinition {
        let kb = KeyboardDefinition::new(layout, locale, category, AdaptorId(self.id));
        match category {
            Category::Primary => kb.with_input_language(InputLanguage::new(locale, layout)),
            Category::Secondary => kb,
        }
    }
}

impl RetrievingAdaptor for MockAdaptor {
    fn id(&self) -> AdaptorId {
        AdaptorId(self.id)
    }

    fn category(&self) -> Category {
        self.category
    }

    fn is_applicable(&self) -> bool {
        self.applicable
    }

    fn initialize(&mut self) -> Result<(), AdaptorError> {
        self.record("initialize".to_string());
        if self.fail_initialize {
            return Err(AdaptorError::Unavailable(format!("{} is broken", self.id)));
        }
        Ok(())
    }

    fn close(&mut self) {
        self.record("close".to_string());
    }

    fn available_keyboards(&mut self) -> Result<Vec<KeyboardDefinition>, AdaptorError> {
        if self.fail_enumeration {
            return Err(AdaptorError::Parse("garbled listing".to_string()));
        }
        Ok(self
            .keyboards
            .iter()
            .map(|(layout, locale, category)| self.definition_in(*category, layout, locale))
            .collect())
    }

    fn activate(&mut self, keyboard: &KeyboardDefinition) -> Result<(), AdaptorError> {
        self.record(format!("activate {}|{}", keyboard.layout(), keyboard.locale()));
        if self.fail_activation.iter().any(|l| l == keyboard.layout()) {
            return Err(AdaptorError::UnknownKeyboard(keyboard.layout().to_string()));
        }
        Ok(())
    }

    fn deactivate(&mut self, keyboard: &KeyboardDefinition) {
        self.record(format!("deactivate {}|{}", keyboard.layout(), keyboard.locale()));
    }

    fn create_definition(&self, layout: &str, locale: &str) -> KeyboardDefinition {
        self.definition(layout, locale).with_available(false)
    }

    fn default_keyboard(&self) -> Option<KeyboardDefinition> {
        self.default
            .as_ref()
            .map(|(layout, locale)| self.definition(layout, locale))
    }

    fn active_keyboard(&self) -> Option<(String, String)> {
        self.host_active.clone()
    }

    fn setup_application(&self) -> Option<SetupApplication> {
        self.setup.clone()
    }

    fn is_secondary_setup_application(&self) -> bool {
        self.secondary_setup
    }

    fn focus_event(&mut self, event: &FocusEvent<'_>) {
        match event {
            FocusEvent::Added { target, handler } => {
                self.record(format!("added {} handler={}", target, handler.is_some()))
            }
            FocusEvent::Removing { target } => self.record(format!("removing {}", target)),
        }
    }
}
