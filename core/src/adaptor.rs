//! Retrieving adaptors.
//!
//! A retrieving adaptor bridges the controller to one native input subsystem
//! (the system layout switcher, an input-method framework, ...). Every adaptor
//! serves exactly one [`Category`]; the controller dispatches on that and
//! nothing else.

use crate::definition::{AdaptorId, Category, KeyboardDefinition};
use crate::error::AdaptorError;
use crate::focus::FocusEvent;
use std::process::Command;
use tracing::debug;

/// Program a front-end can launch to let the user configure keyboards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupApplication {
    pub program: String,
    pub arguments: Vec<String>,
}

impl SetupApplication {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            arguments: Vec::new(),
        }
    }

    pub fn with_arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments = arguments.into_iter().map(Into::into).collect();
        self
    }
}

/// Contract implemented once per input subsystem.
///
/// Calls are synchronous and may block on the host subsystem. The controller
/// owns installed adaptors exclusively and calls them from one thread at a
/// time.
pub trait RetrievingAdaptor: Send {
    /// Short name used in logs and diagnostics.
    fn id(&self) -> AdaptorId;

    fn category(&self) -> Category;

    /// Whether the backing subsystem exists on this host. Adaptors that are
    /// not applicable are never installed.
    fn is_applicable(&self) -> bool;

    fn initialize(&mut self) -> Result<(), AdaptorError>;

    /// Release every subsystem handle. Must be idempotent.
    fn close(&mut self);

    /// Keyboards this subsystem currently offers, in a stable order. The
    /// controller inserts them into its registry; adaptors never do.
    fn available_keyboards(&mut self) -> Result<Vec<KeyboardDefinition>, AdaptorError>;

    /// Switch the host to `keyboard`. Activating the keyboard that is already
    /// active succeeds.
    fn activate(&mut self, keyboard: &KeyboardDefinition) -> Result<(), AdaptorError>;

    /// Return the subsystem to its neutral state. Never fails, also when
    /// nothing is active.
    fn deactivate(&mut self, keyboard: &KeyboardDefinition);

    /// Synthesize a definition for a keyboard that was not enumerated. The
    /// result is unavailable unless the adaptor verified otherwise.
    fn create_definition(&self, layout: &str, locale: &str) -> KeyboardDefinition;

    /// The system default keyboard. Only primary adaptors have one.
    fn default_keyboard(&self) -> Option<KeyboardDefinition> {
        None
    }

    /// Live query of the host's current keyboard as `(layout, locale)`.
    fn active_keyboard(&self) -> Option<(String, String)> {
        None
    }

    fn setup_application(&self) -> Option<SetupApplication> {
        None
    }

    /// True when this adaptor's setup program supplements, rather than
    /// replaces, the primary adaptor's.
    fn is_secondary_setup_application(&self) -> bool {
        false
    }

    /// Focus notifications, delivered before external listeners.
    fn focus_event(&mut self, _event: &FocusEvent<'_>) {}
}

/// The installed adaptors: exactly one primary, at most one secondary.
pub(crate) struct AdaptorTable {
    primary: Box<dyn RetrievingAdaptor>,
    secondary: Option<Box<dyn RetrievingAdaptor>>,
}

impl AdaptorTable {
    pub(crate) fn new(
        primary: Box<dyn RetrievingAdaptor>,
        secondary: Option<Box<dyn RetrievingAdaptor>>,
    ) -> Self {
        Self { primary, secondary }
    }

    pub(crate) fn primary(&self) -> &dyn RetrievingAdaptor {
        self.primary.as_ref()
    }

    pub(crate) fn get(&self, category: Category) -> Option<&dyn RetrievingAdaptor> {
        match category {
            Category::Primary => Some(self.primary.as_ref()),
            Category::Secondary => self.secondary.as_deref(),
        }
    }

    pub(crate) fn get_mut(&mut self, category: Category) -> Option<&mut (dyn RetrievingAdaptor + 'static)> {
        match category {
            Category::Primary => Some(self.primary.as_mut()),
            Category::Secondary => self.secondary.as_deref_mut(),
        }
    }

    /// Installed adaptors, primary first.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn RetrievingAdaptor>> {
        std::iter::once(&mut self.primary).chain(self.secondary.iter_mut())
    }

    pub(crate) fn ids(&self) -> Vec<AdaptorId> {
        std::iter::once(self.primary.id())
            .chain(self.secondary.as_ref().map(|a| a.id()))
            .collect()
    }

    pub(crate) fn close_all(&mut self) {
        for adaptor in self.iter_mut() {
            adaptor.close();
        }
    }
}

/// Run a host program and return its standard output.
///
/// A non-zero exit status becomes [`AdaptorError::CommandFailed`]; a program
/// that cannot be started becomes [`AdaptorError::Io`].
pub fn run_program(program: &str, args: &[&str]) -> Result<String, AdaptorError> {
    debug!(program, ?args, "running host program");
    let output = Command::new(program).args(args).output()?;
    if !output.status.success() {
        return Err(AdaptorError::CommandFailed {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
