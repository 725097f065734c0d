// libibus/tests/adaptor.rs
//
// Integration tests for IbusAdaptor against a scripted host.
//
// Tests cover:
// - Engine enumeration, xkb engine filtering and locales
// - Activation and switching to the neutral engine
// - Re-activation after the engine was changed outside the process
// - Setup application flags
// - Focus target tracking
// - Switching between a primary stub and IBus through KeyboardController

use libibus::{IbusAdaptor, IbusConfig, IbusHost};
use libkeyboarding_core::{
    Activation, AdaptorError, AdaptorId, Category, Config, FocusTarget, KeyboardController,
    KeyboardDefinition, MemoryReporter, RetrievingAdaptor,
};
use std::sync::{Arc, Mutex};

const LISTING: &str = "\
language: English
  xkb:us::eng - English (US)
language: Chinese
  pinyin - Pinyin
  libzhuyin - New Zhuyin
language: Hindi
  m17n:hi:inscript - inscript (m17n)
";

#[derive(Clone)]
struct FakeHost {
    engine: Arc<Mutex<String>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeHost {
    fn new(engine: &str) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine.to_string())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl IbusHost for FakeHost {
    fn is_present(&self) -> bool {
        true
    }

    fn list_engines(&self) -> Result<String, AdaptorError> {
        Ok(LISTING.to_string())
    }

    fn current_engine(&self) -> Result<String, AdaptorError> {
        Ok(self.engine.lock().unwrap().clone())
    }

    fn set_engine(&mut self, name: &str) -> Result<(), AdaptorError> {
        self.calls.lock().unwrap().push(name.to_string());
        *self.engine.lock().unwrap() = name.to_string();
        Ok(())
    }
}

fn initialized(host: &FakeHost, config: IbusConfig) -> IbusAdaptor<FakeHost> {
    let mut adaptor = IbusAdaptor::with_host(host.clone(), config);
    adaptor.initialize().unwrap();
    adaptor
}

#[test]
fn test_enumerates_engines_without_xkb() {
    let host = FakeHost::new("xkb:us::eng");
    let mut adaptor = initialized(&host, IbusConfig::default());
    let keyboards = adaptor.available_keyboards().unwrap();

    let keys: Vec<_> = keyboards
        .iter()
        .map(|kb| (kb.layout().to_string(), kb.locale().to_string()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("pinyin".to_string(), "zh-CN".to_string()),
            ("libzhuyin".to_string(), "zh-TW".to_string()),
            ("m17n:hi:inscript".to_string(), "hi".to_string()),
        ]
    );
    assert!(keyboards.iter().all(|kb| kb.category() == Some(Category::Secondary)));
    assert_eq!(keyboards[0].name(), "Pinyin");
}

#[test]
fn test_xkb_engines_when_configured() {
    let host = FakeHost::new("xkb:us::eng");
    let config = IbusConfig::from_toml_str("include_xkb_engines = true").unwrap();
    let mut adaptor = initialized(&host, config);
    let keyboards = adaptor.available_keyboards().unwrap();
    assert_eq!(keyboards.len(), 4);
    assert_eq!(keyboards[0].locale(), "en");
}

#[test]
fn test_activate_and_deactivate() {
    let host = FakeHost::new("xkb:us::eng");
    let mut adaptor = initialized(&host, IbusConfig::default());
    let keyboards = adaptor.available_keyboards().unwrap();

    adaptor.activate(&keyboards[0]).unwrap();
    adaptor.activate(&keyboards[0]).unwrap();
    assert_eq!(
        adaptor.active_keyboard(),
        Some(("pinyin".to_string(), "zh-CN".to_string()))
    );
    adaptor.deactivate(&keyboards[0]);
    adaptor.deactivate(&keyboards[0]);
    assert_eq!(host.calls(), vec!["pinyin", "xkb:us::eng"]);
}

#[test]
fn test_activate_after_external_engine_change() {
    let host = FakeHost::new("xkb:us::eng");
    let mut adaptor = initialized(&host, IbusConfig::default());
    let keyboards = adaptor.available_keyboards().unwrap();

    adaptor.activate(&keyboards[0]).unwrap();
    *host.engine.lock().unwrap() = "libzhuyin".to_string();
    adaptor.activate(&keyboards[0]).unwrap();
    assert_eq!(host.calls(), vec!["pinyin", "pinyin"]);
    assert_eq!(
        adaptor.active_keyboard(),
        Some(("pinyin".to_string(), "zh-CN".to_string()))
    );
}

#[test]
fn test_activate_unknown_engine_fails() {
    let host = FakeHost::new("xkb:us::eng");
    let mut adaptor = initialized(&host, IbusConfig::default());
    let unknown = adaptor.create_definition("mozc-jp", "ja");
    assert!(matches!(adaptor.activate(&unknown), Err(AdaptorError::UnknownKeyboard(_))));
}

#[test]
fn test_setup_application_is_secondary() {
    let adaptor = IbusAdaptor::with_host(FakeHost::new(""), IbusConfig::default());
    assert!(adaptor.is_secondary_setup_application());
    assert_eq!(adaptor.setup_application().unwrap().program, "ibus-setup");
    assert!(adaptor.default_keyboard().is_none());
}

struct PrimaryStub;

impl RetrievingAdaptor for PrimaryStub {
    fn id(&self) -> AdaptorId {
        AdaptorId("stub")
    }

    fn category(&self) -> Category {
        Category::Primary
    }

    fn is_applicable(&self) -> bool {
        true
    }

    fn initialize(&mut self) -> Result<(), AdaptorError> {
        Ok(())
    }

    fn close(&mut self) {}

    fn available_keyboards(&mut self) -> Result<Vec<KeyboardDefinition>, AdaptorError> {
        Ok(vec![KeyboardDefinition::new("us", "en-US", Category::Primary, AdaptorId("stub"))])
    }

    fn activate(&mut self, _keyboard: &KeyboardDefinition) -> Result<(), AdaptorError> {
        Ok(())
    }

    fn deactivate(&mut self, _keyboard: &KeyboardDefinition) {}

    fn create_definition(&self, layout: &str, locale: &str) -> KeyboardDefinition {
        KeyboardDefinition::new(layout, locale, Category::Primary, AdaptorId("stub")).with_available(false)
    }
}

#[test]
fn test_through_controller() {
    let host = FakeHost::new("xkb:us::eng");
    let reporter = Arc::new(MemoryReporter::new());
    let adaptors: Vec<Box<dyn RetrievingAdaptor>> = vec![
        Box::new(PrimaryStub),
        Box::new(IbusAdaptor::with_host(host.clone(), IbusConfig::default())),
    ];
    let mut controller = KeyboardController::initialize(
        adaptors,
        Config::default(),
        reporter.clone(),
    )
    .unwrap();

    assert_eq!(controller.set_keyboard_by_id("pinyin-zh-CN").unwrap(), Activation::Activated);
    assert_eq!(controller.set_keyboard_by_id("us-en-US").unwrap(), Activation::Activated);
    // Leaving IBus for a system layout switches it to the neutral engine.
    assert_eq!(host.calls(), vec!["pinyin", "xkb:us::eng"]);

    assert_eq!(
        controller
            .secondary_keyboard_setup_application()
            .unwrap()
            .map(|a| a.program),
        Some("ibus-setup".to_string())
    );
    assert_eq!(reporter.property("KeyboardAdaptors").as_deref(), Some("stub, ibus"));
}

#[test]
fn test_focus_targets_follow_registration() {
    let mut adaptor = IbusAdaptor::with_host(FakeHost::new(""), IbusConfig::default());
    adaptor.focus_event(&libkeyboarding_core::FocusEvent::Added {
        target: FocusTarget(1),
        handler: None,
    });
    adaptor.focus_event(&libkeyboarding_core::FocusEvent::Added {
        target: FocusTarget(2),
        handler: None,
    });
    adaptor.focus_event(&libkeyboarding_core::FocusEvent::Removing { target: FocusTarget(1) });
    assert_eq!(adaptor.focus_targets().collect::<Vec<_>>(), vec![FocusTarget(2)]);
}
