//! Primary-category adaptor over the X keyboard extension.
//!
//! Keyboards are the layouts and variants of the XKB rules list. The layout
//! key is the XKB name (`de`, `de(nodeadkeys)`), the display name is the
//! rules-list description and the locale comes from [`crate::locales`].

use crate::config::XkbConfig;
use crate::host::{SystemHost, XkbHost};
use crate::locales::locale_for_layout;
use crate::rules::{parse_query, parse_rules_list, split_layout_name, XkbLayout};
use libkeyboarding_core::{
    AdaptorError, AdaptorId, Category, InputLanguage, KeyboardDefinition, RetrievingAdaptor,
    SetupApplication,
};
use tracing::{debug, info, warn};

pub const XKB: AdaptorId = AdaptorId("xkb");

pub struct XkbAdaptor<H = SystemHost> {
    host: H,
    config: XkbConfig,
    layouts: Vec<XkbLayout>,
    /// Layout in effect when the adaptor was initialized; the system default
    /// and the neutral state.
    initial: Option<String>,
}

impl XkbAdaptor<SystemHost> {
    pub fn new(config: XkbConfig) -> Self {
        Self::with_host(SystemHost::new(&config), config)
    }
}

impl<H: XkbHost> XkbAdaptor<H> {
    pub fn with_host(host: H, config: XkbConfig) -> Self {
        Self {
            host,
            config,
            layouts: Vec::new(),
            initial: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    fn definition(&self, layout: &XkbLayout) -> KeyboardDefinition {
        self.definition_named(&layout.name(), &layout.description)
    }

    fn definition_named(&self, name: &str, description: &str) -> KeyboardDefinition {
        let locale = locale_for_layout(name, &self.config.locale_overrides).unwrap_or("");
        let kb = KeyboardDefinition::new(name, locale, Category::Primary, XKB).with_name(description);
        if locale.is_empty() {
            kb
        } else {
            kb.with_input_language(InputLanguage::new(locale, description))
        }
    }

    /// Definition for a layout name reported by the host.
    fn definition_for(&self, name: &str) -> KeyboardDefinition {
        match self.layouts.iter().find(|l| l.name() == name) {
            Some(layout) => self.definition(layout),
            None => self.definition_named(name, name),
        }
    }

    fn query_current(&self) -> Option<String> {
        match self.host.query().and_then(|output| parse_query(&output)) {
            Ok(query) => query.current(),
            Err(e) => {
                warn!(error = %e, "could not query the current XKB layout");
                None
            }
        }
    }

    /// Switch the host to `name` unless the host already reports it.
    fn switch_to(&mut self, name: &str) -> Result<(), AdaptorError> {
        if self.query_current().as_deref() == Some(name) {
            debug!(layout = name, "layout already active");
            return Ok(());
        }
        let (code, variant) = split_layout_name(name);
        self.host.set_layout(code, variant)
    }
}

impl<H: XkbHost> RetrievingAdaptor for XkbAdaptor<H> {
    fn id(&self) -> AdaptorId {
        XKB
    }

    fn category(&self) -> Category {
        Category::Primary
    }

    fn is_applicable(&self) -> bool {
        self.host.is_present()
    }

    fn initialize(&mut self) -> Result<(), AdaptorError> {
        let rules = self.host.rules()?;
        self.layouts = parse_rules_list(&rules)?;
        self.initial = self.query_current();
        info!(
            layouts = self.layouts.len(),
            initial = self.initial.as_deref().unwrap_or("<unknown>"),
            "XKB adaptor initialized"
        );
        Ok(())
    }

    fn close(&mut self) {
        self.layouts.clear();
    }

    fn available_keyboards(&mut self) -> Result<Vec<KeyboardDefinition>, AdaptorError> {
        Ok(self.layouts.iter().map(|l| self.definition(l)).collect())
    }

    fn activate(&mut self, keyboard: &KeyboardDefinition) -> Result<(), AdaptorError> {
        let name = keyboard.layout();
        if !self.layouts.iter().any(|l| l.name() == name) {
            return Err(AdaptorError::UnknownKeyboard(name.to_string()));
        }
        self.switch_to(name)
    }

    fn deactivate(&mut self, keyboard: &KeyboardDefinition) {
        let Some(initial) = self.initial.clone() else {
            return;
        };
        if let Err(e) = self.switch_to(&initial) {
            warn!(keyboard = %keyboard, error = %e, "could not restore the initial XKB layout");
        }
    }

    fn create_definition(&self, layout: &str, locale: &str) -> KeyboardDefinition {
        KeyboardDefinition::new(layout, locale, Category::Primary, XKB).with_available(false)
    }

    fn default_keyboard(&self) -> Option<KeyboardDefinition> {
        self.initial.as_deref().map(|name| self.definition_for(name))
    }

    fn active_keyboard(&self) -> Option<(String, String)> {
        let kb = self.definition_for(&self.query_current()?);
        Some((kb.layout().to_string(), kb.locale().to_string()))
    }

    fn setup_application(&self) -> Option<SetupApplication> {
        self.config
            .setup_program
            .as_ref()
            .map(|program| SetupApplication::new(program).with_arguments(self.config.setup_arguments.iter().cloned()))
    }
}
