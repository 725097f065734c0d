//! Secondary-category adaptor over IBus.
//!
//! Every IBus engine is a keyboard: the engine name is the layout key, the
//! engine description the display name. IBus has no system default; the
//! primary adaptor owns that.

use crate::config::IbusConfig;
use crate::engines::{parse_engine_list, IbusEngine};
use crate::host::{IbusHost, SystemHost};
use libkeyboarding_core::{
    AdaptorError, AdaptorId, Category, FocusEvent, FocusTarget, KeyboardDefinition,
    RetrievingAdaptor, SetupApplication,
};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

pub const IBUS: AdaptorId = AdaptorId("ibus");

pub struct IbusAdaptor<H = SystemHost> {
    host: H,
    config: IbusConfig,
    engines: Vec<IbusEngine>,
    focus_targets: BTreeSet<FocusTarget>,
}

impl IbusAdaptor<SystemHost> {
    pub fn new(config: IbusConfig) -> Self {
        Self::with_host(SystemHost::new(&config), config)
    }
}

impl<H: IbusHost> IbusAdaptor<H> {
    pub fn with_host(host: H, config: IbusConfig) -> Self {
        Self {
            host,
            config,
            engines: Vec::new(),
            focus_targets: BTreeSet::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Focus targets IBus input is currently attached to.
    pub fn focus_targets(&self) -> impl Iterator<Item = FocusTarget> + '_ {
        self.focus_targets.iter().copied()
    }

    fn definition(engine: &IbusEngine) -> KeyboardDefinition {
        KeyboardDefinition::new(&engine.name, engine.locale(), Category::Secondary, IBUS)
            .with_name(&engine.description)
    }

    /// Switch to `name` unless IBus already reports it as the global engine.
    fn switch_to(&mut self, name: &str) -> Result<(), AdaptorError> {
        match self.host.current_engine() {
            Ok(current) if current == name => {
                debug!(engine = name, "engine already active");
                return Ok(());
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, "could not query the current IBus engine"),
        }
        self.host.set_engine(name)
    }
}

impl<H: IbusHost> RetrievingAdaptor for IbusAdaptor<H> {
    fn id(&self) -> AdaptorId {
        IBUS
    }

    fn category(&self) -> Category {
        Category::Secondary
    }

    fn is_applicable(&self) -> bool {
        self.host.is_present()
    }

    fn initialize(&mut self) -> Result<(), AdaptorError> {
        let listing = self.host.list_engines()?;
        let include_xkb = self.config.include_xkb_engines;
        self.engines = parse_engine_list(&listing)?
            .into_iter()
            .filter(|e| include_xkb || !e.is_xkb())
            .collect();
        info!(engines = self.engines.len(), "IBus adaptor initialized");
        Ok(())
    }

    fn close(&mut self) {
        self.engines.clear();
        self.focus_targets.clear();
    }

    fn available_keyboards(&mut self) -> Result<Vec<KeyboardDefinition>, AdaptorError> {
        Ok(self.engines.iter().map(Self::definition).collect())
    }

    fn activate(&mut self, keyboard: &KeyboardDefinition) -> Result<(), AdaptorError> {
        let name = keyboard.layout();
        if !self.engines.iter().any(|e| e.name == name) {
            return Err(AdaptorError::UnknownKeyboard(name.to_string()));
        }
        self.switch_to(name)
    }

    fn deactivate(&mut self, keyboard: &KeyboardDefinition) {
        let neutral = self.config.neutral_engine.clone();
        if let Err(e) = self.switch_to(&neutral) {
            warn!(keyboard = %keyboard, engine = %neutral, error = %e, "could not switch IBus to the neutral engine");
        }
    }

    fn create_definition(&self, layout: &str, locale: &str) -> KeyboardDefinition {
        KeyboardDefinition::new(layout, locale, Category::Secondary, IBUS).with_available(false)
    }

    fn active_keyboard(&self) -> Option<(String, String)> {
        let name = self.host.current_engine().ok()?;
        let engine = self.engines.iter().find(|e| e.name == name)?;
        Some((engine.name.clone(), engine.locale()))
    }

    fn setup_application(&self) -> Option<SetupApplication> {
        self.config.setup_program.as_ref().map(SetupApplication::new)
    }

    fn is_secondary_setup_application(&self) -> bool {
        true
    }

    fn focus_event(&mut self, event: &FocusEvent<'_>) {
        match event {
            FocusEvent::Added { target, .. } => {
                self.focus_targets.insert(*target);
            }
            FocusEvent::Removing { target } => {
                self.focus_targets.remove(target);
            }
        }
        debug!(?event, attached = self.focus_targets.len(), "IBus focus targets changed");
    }
}
