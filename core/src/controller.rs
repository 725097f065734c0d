//! The keyboard controller.
//!
//! `KeyboardController` owns the installed adaptors (one per [`Category`]),
//! the registry they populate, the currently active keyboard and the
//! registered focus targets. It is an explicitly constructed context object:
//! the application creates it at startup with [`KeyboardController::initialize`],
//! passes it to whatever needs keyboards, and calls
//! [`shutdown`](KeyboardController::shutdown) at teardown.
//!
//! ## Single writer
//!
//! Every operation that changes state takes `&mut self`, so exclusive access
//! is enforced at compile time. The controller is `Send`; wrap it in a
//! `Mutex` if several threads must drive it. Adaptor calls are synchronous
//! and may block on the host subsystem.
//!
//! ## Active keyboard
//!
//! The active keyboard is either the zero sentinel (nothing tracked) or a
//! definition taken from the current registry. Replacing the adaptors resets
//! it to zero, so a definition from a previous registry never survives.

use crate::adaptor::{AdaptorTable, RetrievingAdaptor, SetupApplication};
use crate::definition::{Category, InputLanguage, KeyboardDefinition};
use crate::error::{KeyboardError, Result};
use crate::focus::{EventHandler, FocusEvent, FocusListener, FocusTarget, FocusTargets};
use crate::legacy::{self, WritingSystem};
use crate::registry::KeyboardRegistry;
use crate::report::Reporter;
use crate::resolver;
use crate::Config;
use ahash::AHashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of an activation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The adaptor switched the host to the keyboard.
    Activated,
    /// Nothing to activate: the zero sentinel, or an identifier that did not
    /// resolve.
    NoKeyboard,
    /// The adaptor could not switch; the previous keyboard stays active.
    Failed,
}

/// Adaptors and the keyboards they contributed. Built completely before it
/// replaces the previous one.
struct Installed {
    adaptors: AdaptorTable,
    registry: KeyboardRegistry,
    active: KeyboardDefinition,
}

/// Once-per-identifier user notifications.
struct Warnings {
    enabled: bool,
    already_warned: AHashSet<String>,
    reporter: Arc<dyn Reporter>,
}

impl Warnings {
    fn warn_once(&mut self, identifier: &str, message: String) {
        if !self.enabled {
            return;
        }
        if self.already_warned.insert(identifier.to_string()) {
            self.reporter.notify_user_of_problem(&message);
        } else {
            debug!(identifier, "problem already reported");
        }
    }
}

pub struct KeyboardController {
    config: Config,
    installed: Option<Installed>,
    warnings: Warnings,
    focus: FocusTargets,
}

impl KeyboardController {
    /// Create a controller and install `adaptors`.
    ///
    /// Fails with [`KeyboardError::NoPrimaryAdaptor`] when none of the
    /// adaptors can serve primary system keyboards; no controller exists in
    /// that case.
    pub fn initialize(
        adaptors: Vec<Box<dyn RetrievingAdaptor>>,
        config: Config,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self> {
        let installed = match stage(adaptors) {
            Ok(installed) => installed,
            Err(e) => {
                reporter.write_event(&format!("Keyboard controller failed to initialize: {}", e));
                return Err(e);
            }
        };
        let controller = Self {
            warnings: Warnings {
                enabled: config.notify_unresolved,
                already_warned: AHashSet::new(),
                reporter,
            },
            config,
            installed: Some(installed),
            focus: FocusTargets::default(),
        };
        controller.report_adaptors();
        Ok(controller)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_disposed(&self) -> bool {
        self.installed.is_none()
    }

    fn installed(&self) -> Result<&Installed> {
        self.installed.as_ref().ok_or(KeyboardError::Disposed)
    }

    fn installed_mut(&mut self) -> Result<&mut Installed> {
        self.installed.as_mut().ok_or(KeyboardError::Disposed)
    }

    // ========== Adaptor lifecycle ==========

    /// Replace the installed adaptors.
    ///
    /// Adaptors that are not applicable on this host are dropped; for each
    /// category the last applicable adaptor wins. An adaptor that fails to
    /// initialize is left out, one that fails to enumerate is kept without
    /// keyboards. If no primary adaptor remains, the previous adaptors,
    /// registry and active keyboard stay in place and
    /// [`KeyboardError::NoPrimaryAdaptor`] is returned.
    ///
    /// Focus targets that are still registered are announced to the new
    /// adaptors, so every later `Removing` follows an `Added`.
    pub fn reset_adaptors(&mut self, adaptors: Vec<Box<dyn RetrievingAdaptor>>) -> Result<()> {
        self.installed()?;
        let mut staged = stage(adaptors)?;
        for (target, handler) in self.focus.registered() {
            let event = FocusEvent::Added { target, handler };
            for adaptor in staged.adaptors.iter_mut() {
                adaptor.focus_event(&event);
            }
        }
        if let Some(mut previous) = self.installed.replace(staged) {
            previous.adaptors.close_all();
        }
        self.report_adaptors();
        Ok(())
    }

    /// Re-enumerate the installed adaptors into a fresh registry.
    ///
    /// The active keyboard survives only if it is still enumerated.
    pub fn update_available_keyboards(&mut self) -> Result<()> {
        let installed = self.installed_mut()?;
        let registry = enumerate(&mut installed.adaptors);
        let active = registry
            .lookup(installed.active.layout(), installed.active.locale())
            .cloned()
            .unwrap_or(KeyboardDefinition::ZERO);
        installed.registry = registry;
        installed.active = active;
        Ok(())
    }

    /// Close every adaptor. Later calls fail with
    /// [`KeyboardError::Disposed`]; calling `shutdown` again does nothing.
    pub fn shutdown(&mut self) {
        if let Some(mut installed) = self.installed.take() {
            installed.adaptors.close_all();
            info!("keyboard controller shut down");
        }
    }

    fn report_adaptors(&self) {
        let Some(installed) = self.installed.as_ref() else {
            return;
        };
        let ids = installed
            .adaptors
            .ids()
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        info!(adaptors = %ids, keyboards = installed.registry.len(), "keyboard adaptors installed");
        self.warnings.reporter.add_property("KeyboardAdaptors", &ids);
        self.warnings
            .reporter
            .write_event(&format!("Keyboard adaptors in use: {}", ids));
    }

    /// Ids of the installed adaptors, primary first.
    pub fn adaptor_ids(&self) -> Result<Vec<crate::AdaptorId>> {
        Ok(self.installed()?.adaptors.ids())
    }

    // ========== Lookups ==========

    pub fn registry(&self) -> Result<&KeyboardRegistry> {
        Ok(&self.installed()?.registry)
    }

    /// Resolve a keyboard identifier in any supported format. Returns the
    /// zero sentinel when nothing matches.
    pub fn get_keyboard(&self, identifier: &str) -> Result<KeyboardDefinition> {
        let registry = &self.installed()?.registry;
        Ok(resolver::resolve(registry, identifier).clone())
    }

    /// Direct composite lookup.
    pub fn get_keyboard_by(&self, layout: &str, locale: &str) -> Result<KeyboardDefinition> {
        let registry = &self.installed()?.registry;
        Ok(resolver::lookup_composite(registry, layout, locale).clone())
    }

    /// The keyboard stored on `ws`, or the zero sentinel.
    pub fn keyboard_for_writing_system<W>(&self, ws: &W) -> Result<KeyboardDefinition>
    where
        W: WritingSystem + ?Sized,
    {
        self.installed()?;
        Ok(ws.local_keyboard().cloned().unwrap_or(KeyboardDefinition::ZERO))
    }

    /// The keyboard whose host input language equals `language`.
    ///
    /// Layout names reported by some hosts are unreliable, so this matches
    /// the whole input language rather than the name.
    pub fn keyboard_for_language(&self, language: &InputLanguage) -> Result<KeyboardDefinition> {
        let registry = &self.installed()?.registry;
        Ok(registry
            .find(|kb| kb.input_language() == Some(language))
            .cloned()
            .unwrap_or(KeyboardDefinition::ZERO))
    }

    /// Every registered keyboard, including ones that are no longer
    /// installed on the host.
    pub fn all_keyboards(&self) -> Result<impl Iterator<Item = &KeyboardDefinition>> {
        Ok(self.installed()?.registry.iter())
    }

    /// Keyboards that can be used right now.
    pub fn available_keyboards(&self) -> Result<impl Iterator<Item = &KeyboardDefinition>> {
        Ok(self.installed()?.registry.available())
    }

    /// The registered keyboard for `(layout, locale)`, or an unregistered,
    /// unavailable definition synthesized by the primary adaptor.
    pub fn create_keyboard_definition(&self, layout: &str, locale: &str) -> Result<KeyboardDefinition> {
        let installed = self.installed()?;
        Ok(match installed.registry.lookup(layout, locale) {
            Some(existing) => existing.clone(),
            None => installed.adaptors.primary().create_definition(layout, locale),
        })
    }

    /// The system default keyboard, as designated by the primary adaptor.
    pub fn default_keyboard(&self) -> Result<KeyboardDefinition> {
        let installed = self.installed()?;
        Ok(default_from(installed))
    }

    /// The active keyboard.
    ///
    /// When nothing has been activated through the controller, the primary
    /// adaptor is asked what the host is using; the zero sentinel is returned
    /// if that cannot be determined.
    pub fn active_keyboard(&mut self) -> Result<KeyboardDefinition> {
        let query_host = self.config.query_host_active;
        let installed = self.installed_mut()?;
        if installed.active.is_zero() && query_host {
            if let Some((layout, locale)) = installed.adaptors.primary().active_keyboard() {
                if let Some(kb) = installed.registry.lookup(&layout, &locale) {
                    debug!(keyboard = %kb, "active keyboard taken from host");
                    installed.active = kb.clone();
                }
            }
        }
        Ok(installed.active.clone())
    }

    // ========== Activation ==========

    /// Activate `keyboard` through the adaptor serving its category.
    ///
    /// The zero sentinel is a no-op. Failures are reported to the user once
    /// per keyboard and leave the previously active keyboard in place.
    pub fn set_keyboard(&mut self, keyboard: &KeyboardDefinition) -> Result<Activation> {
        let installed = self.installed.as_mut().ok_or(KeyboardError::Disposed)?;
        if keyboard.is_zero() {
            debug!("no keyboard to activate");
            return Ok(Activation::NoKeyboard);
        }

        let identifier = keyboard.legacy_id();
        let registered = installed
            .registry
            .lookup(keyboard.layout(), keyboard.locale())
            .filter(|kb| kb.is_available())
            .cloned();
        let Some((registered, category)) = registered.and_then(|kb| kb.category().map(|c| (kb, c))) else {
            self.warnings.warn_once(
                &identifier,
                format!("The keyboard '{}' is not installed on this computer.", keyboard.name()),
            );
            return Ok(Activation::Failed);
        };

        if installed.adaptors.get(category).is_none() {
            warn!(keyboard = %registered, %category, "no adaptor installed for keyboard category");
            self.warnings.warn_once(
                &identifier,
                format!("No keyboard system is available to activate '{}'.", registered.name()),
            );
            return Ok(Activation::Failed);
        }

        let previous = installed.active.clone();
        let switching_category = !previous.is_zero() && previous.category() != Some(category);
        if switching_category {
            deactivate_in(&mut installed.adaptors, &previous);
        }

        let Some(adaptor) = installed.adaptors.get_mut(category) else {
            return Ok(Activation::Failed);
        };

        match adaptor.activate(&registered) {
            Ok(()) => {
                info!(keyboard = %registered, adaptor = %adaptor.id(), "keyboard activated");
                installed.active = registered;
                Ok(Activation::Activated)
            }
            Err(e) => {
                warn!(keyboard = %registered, adaptor = %adaptor.id(), error = %e, "keyboard activation failed");
                if switching_category {
                    if let Some(previous_adaptor) = previous.category().and_then(|c| installed.adaptors.get_mut(c)) {
                        if let Err(e) = previous_adaptor.activate(&previous) {
                            warn!(keyboard = %previous, error = %e, "could not restore previous keyboard");
                        }
                    }
                }
                self.warnings.warn_once(
                    &identifier,
                    format!("The keyboard '{}' could not be activated: {}", registered.name(), e),
                );
                Ok(Activation::Failed)
            }
        }
    }

    /// Resolve `identifier` and activate the result. An identifier that does
    /// not resolve is reported once per controller lifetime.
    pub fn set_keyboard_by_id(&mut self, identifier: &str) -> Result<Activation> {
        let keyboard = self.get_keyboard(identifier)?;
        if keyboard.is_zero() {
            self.warnings.warn_once(
                identifier,
                format!("Could not find a keyboard ime that had a keyboard named '{}'", identifier),
            );
            return Ok(Activation::NoKeyboard);
        }
        self.set_keyboard(&keyboard)
    }

    pub fn set_keyboard_by(&mut self, layout: &str, locale: &str) -> Result<Activation> {
        let keyboard = self.get_keyboard_by(layout, locale)?;
        self.set_keyboard(&keyboard)
    }

    /// Activate the keyboard of `ws`.
    ///
    /// A writing system without a keyboard of its own is resolved through
    /// its legacy fields; a match is stored back on `ws`.
    pub fn set_keyboard_for_writing_system<W>(&mut self, ws: &mut W) -> Result<Activation>
    where
        W: WritingSystem + ?Sized,
    {
        let mut keyboard = self.keyboard_for_writing_system(&*ws)?;
        if keyboard.is_zero() {
            if let Some(legacy) = self.legacy_for_writing_system(&*ws)? {
                debug!(language = ws.language_tag(), keyboard = %legacy, "writing system keyboard taken from legacy fields");
                ws.set_local_keyboard(legacy.clone());
                keyboard = legacy;
            }
        }
        self.set_keyboard(&keyboard)
    }

    pub fn set_keyboard_for_language(&mut self, language: &InputLanguage) -> Result<Activation> {
        let keyboard = self.keyboard_for_language(language)?;
        self.set_keyboard(&keyboard)
    }

    /// Activate the system default keyboard.
    pub fn activate_default_keyboard(&mut self) -> Result<Activation> {
        let keyboard = self.default_keyboard()?;
        self.set_keyboard(&keyboard)
    }

    /// Return the active keyboard's subsystem to its neutral state and stop
    /// tracking it.
    pub fn deactivate_keyboard(&mut self) -> Result<()> {
        let installed = self.installed_mut()?;
        let active = std::mem::replace(&mut installed.active, KeyboardDefinition::ZERO);
        if !active.is_zero() {
            deactivate_in(&mut installed.adaptors, &active);
        }
        Ok(())
    }

    // ========== Legacy writing systems ==========

    /// The keyboard named by the obsolete fields of `ws`, if any.
    ///
    /// Does not fall back to the default keyboard; a match found here may be
    /// stored on the writing system, a default must not be.
    pub fn legacy_for_writing_system<W>(&self, ws: &W) -> Result<Option<KeyboardDefinition>>
    where
        W: WritingSystem + ?Sized,
    {
        let registry = &self.installed()?.registry;
        if !self.config.legacy_lookup {
            return Ok(None);
        }
        Ok(legacy::resolve_legacy(registry, ws).cloned())
    }

    /// The keyboard to use for `ws` when it has none: the legacy match, or
    /// the system default.
    pub fn default_for_writing_system<W>(&self, ws: &W) -> Result<KeyboardDefinition>
    where
        W: WritingSystem + ?Sized,
    {
        match self.legacy_for_writing_system(ws)? {
            Some(keyboard) => Ok(keyboard),
            None => self.default_keyboard(),
        }
    }

    // ========== Setup applications ==========

    /// Program to configure keyboards. The secondary adaptor's program is
    /// preferred unless it only supplements the primary one.
    pub fn keyboard_setup_application(&self) -> Result<Option<SetupApplication>> {
        let adaptors = &self.installed()?.adaptors;
        let secondary = adaptors
            .get(Category::Secondary)
            .filter(|a| !a.is_secondary_setup_application())
            .and_then(|a| a.setup_application());
        Ok(secondary.or_else(|| adaptors.primary().setup_application()))
    }

    pub fn secondary_keyboard_setup_application(&self) -> Result<Option<SetupApplication>> {
        let adaptors = &self.installed()?.adaptors;
        Ok(adaptors
            .get(Category::Secondary)
            .filter(|a| a.is_secondary_setup_application())
            .and_then(|a| a.setup_application()))
    }

    pub fn has_secondary_keyboard_setup_application(&self) -> Result<bool> {
        let adaptors = &self.installed()?.adaptors;
        Ok(adaptors
            .get(Category::Secondary)
            .map_or(false, |a| a.is_secondary_setup_application()))
    }

    // ========== Focus targets ==========

    /// Register a UI target for keyboarding, optionally with an
    /// adaptor-specific event handler. Registering again replaces the handler.
    pub fn register_focus_target(&mut self, target: FocusTarget, handler: Option<EventHandler>) -> Result<()> {
        let installed = self.installed.as_mut().ok_or(KeyboardError::Disposed)?;
        self.focus.insert(target, handler.clone());
        let event = FocusEvent::Added {
            target,
            handler: handler.as_ref(),
        };
        for adaptor in installed.adaptors.iter_mut() {
            adaptor.focus_event(&event);
        }
        self.focus.notify(&event);
        debug!(%target, "focus target registered");
        Ok(())
    }

    /// Unregister a UI target. Listeners are told before the target is
    /// removed. Unknown targets are ignored.
    pub fn unregister_focus_target(&mut self, target: FocusTarget) -> Result<()> {
        let installed = self.installed.as_mut().ok_or(KeyboardError::Disposed)?;
        if !self.focus.contains(target) {
            return Ok(());
        }
        let event = FocusEvent::Removing { target };
        for adaptor in installed.adaptors.iter_mut() {
            adaptor.focus_event(&event);
        }
        self.focus.notify(&event);
        self.focus.remove(target);
        debug!(%target, "focus target unregistered");
        Ok(())
    }

    /// Add a listener for focus notifications. Listeners are called in the
    /// order they were added, after the installed adaptors.
    pub fn add_focus_listener<L>(&mut self, listener: L) -> Result<()>
    where
        L: FocusListener + 'static,
    {
        self.installed()?;
        self.focus.add_listener(Box::new(listener));
        Ok(())
    }

    pub fn is_focus_target_registered(&self, target: FocusTarget) -> Result<bool> {
        self.installed()?;
        Ok(self.focus.contains(target))
    }

    /// Event handler registered with `target`; `None` if the target is not
    /// registered or was registered without one.
    pub fn focus_handler(&self, target: FocusTarget) -> Result<Option<EventHandler>> {
        self.installed()?;
        Ok(self.focus.handler(target).cloned().flatten())
    }

    pub fn focus_target_count(&self) -> Result<usize> {
        self.installed()?;
        Ok(self.focus.len())
    }
}

impl Drop for KeyboardController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn default_from(installed: &Installed) -> KeyboardDefinition {
    match installed.adaptors.primary().default_keyboard() {
        Some(kb) => installed
            .registry
            .lookup(kb.layout(), kb.locale())
            .cloned()
            .unwrap_or(kb),
        None => KeyboardDefinition::ZERO,
    }
}

fn deactivate_in(adaptors: &mut AdaptorTable, keyboard: &KeyboardDefinition) {
    if let Some(adaptor) = keyboard.category().and_then(|c| adaptors.get_mut(c)) {
        debug!(keyboard = %keyboard, adaptor = %adaptor.id(), "deactivating keyboard");
        adaptor.deactivate(keyboard);
    }
}

/// Select, initialize and enumerate `adaptors` without touching any
/// installed state.
fn stage(adaptors: Vec<Box<dyn RetrievingAdaptor>>) -> Result<Installed> {
    let mut primary: Option<Box<dyn RetrievingAdaptor>> = None;
    let mut secondary: Option<Box<dyn RetrievingAdaptor>> = None;
    let mut unused = Vec::new();

    for adaptor in adaptors {
        if !adaptor.is_applicable() {
            debug!(adaptor = %adaptor.id(), "adaptor not applicable on this host");
            unused.push(adaptor);
            continue;
        }
        let slot = match adaptor.category() {
            Category::Primary => &mut primary,
            Category::Secondary => &mut secondary,
        };
        if let Some(replaced) = slot.replace(adaptor) {
            unused.push(replaced);
        }
    }
    for mut adaptor in unused {
        adaptor.close();
    }

    let primary = primary.and_then(initialize);
    let secondary = secondary.and_then(initialize);
    let Some(primary) = primary else {
        if let Some(mut secondary) = secondary {
            secondary.close();
        }
        return Err(KeyboardError::NoPrimaryAdaptor);
    };

    let mut adaptors = AdaptorTable::new(primary, secondary);
    let registry = enumerate(&mut adaptors);
    Ok(Installed {
        adaptors,
        registry,
        active: KeyboardDefinition::ZERO,
    })
}

fn initialize(mut adaptor: Box<dyn RetrievingAdaptor>) -> Option<Box<dyn RetrievingAdaptor>> {
    match adaptor.initialize() {
        Ok(()) => Some(adaptor),
        Err(e) => {
            warn!(adaptor = %adaptor.id(), error = %e, "adaptor failed to initialize; not installed");
            adaptor.close();
            None
        }
    }
}

fn enumerate(adaptors: &mut AdaptorTable) -> KeyboardRegistry {
    let mut registry = KeyboardRegistry::new();
    for adaptor in adaptors.iter_mut() {
        match adaptor.available_keyboards() {
            Ok(keyboards) => {
                let added = registry.extend(keyboards);
                debug!(adaptor = %adaptor.id(), added, "keyboards registered");
            }
            Err(e) => {
                warn!(adaptor = %adaptor.id(), error = %e, "keyboard enumeration failed; adaptor contributes no keyboards");
            }
        }
    }
    registry
}
