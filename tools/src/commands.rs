use anyhow::{Context, Result, bail};
use libibus::IbusAdaptor;
use libkeyboarding_core::{
    Activation, KeyboardController, KeyboardDefinition, RetrievingAdaptor, TracingReporter,
    WritingSystemDefinition,
};
use libxkb::XkbAdaptor;
use std::sync::Arc;
use tracing::debug;

use crate::config::KbdctlConfig;

pub fn start(config: KbdctlConfig) -> Result<KeyboardController> {
    let adaptors: Vec<Box<dyn RetrievingAdaptor>> = vec![
        Box::new(XkbAdaptor::new(config.xkb)),
        Box::new(IbusAdaptor::new(config.ibus)),
    ];
    let controller =
        KeyboardController::initialize(adaptors, config.controller, Arc::new(TracingReporter))
            .context("starting keyboard controller (is an X display available?)")?;
    debug!(keyboards = controller.registry()?.len(), "keyboard controller ready");
    Ok(controller)
}

fn print_keyboard(kb: &KeyboardDefinition) {
    let category = kb.category().map_or("unknown".to_string(), |c| c.to_string());
    let marker = if kb.is_available() { "" } else { " (not installed)" };
    println!("{:<32} {:<10} {}{}", kb.legacy_id(), category, kb.name(), marker);
}

pub fn list(controller: &KeyboardController, all: bool, json: bool) -> Result<()> {
    let keyboards: Vec<&KeyboardDefinition> = if all {
        controller.all_keyboards()?.collect()
    } else {
        controller.available_keyboards()?.collect()
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&keyboards)?);
        return Ok(());
    }
    for kb in keyboards {
        print_keyboard(kb);
    }
    Ok(())
}

pub fn resolve(controller: &KeyboardController, id: &str) -> Result<()> {
    let kb = controller.get_keyboard(id)?;
    if kb.is_zero() {
        bail!("no keyboard matches '{}'", id);
    }
    print_keyboard(&kb);
    Ok(())
}

pub fn legacy(
    controller: &KeyboardController,
    language: String,
    lcid: Option<String>,
    keyboard: Option<String>,
) -> Result<()> {
    let mut ws = WritingSystemDefinition::new(language);
    ws.windows_lcid = lcid;
    ws.keyboard = keyboard;

    match controller.legacy_for_writing_system(&ws)? {
        Some(kb) => print_keyboard(&kb),
        None => {
            let default = controller.default_keyboard()?;
            println!("no legacy match; the default keyboard would be used:");
            print_keyboard(&default);
        }
    }
    Ok(())
}

pub fn activate(controller: &mut KeyboardController, id: &str) -> Result<()> {
    match controller.set_keyboard_by_id(id)? {
        Activation::Activated => {
            print_keyboard(&controller.active_keyboard()?);
            Ok(())
        }
        Activation::NoKeyboard => bail!("no keyboard matches '{}'", id),
        Activation::Failed => bail!("keyboard '{}' could not be activated", id),
    }
}

pub fn active(controller: &mut KeyboardController) -> Result<()> {
    let kb = controller.active_keyboard()?;
    if kb.is_zero() {
        println!("{}", kb);
    } else {
        print_keyboard(&kb);
    }
    Ok(())
}

pub fn default(controller: &KeyboardController) -> Result<()> {
    let kb = controller.default_keyboard()?;
    if kb.is_zero() {
        bail!("the system default keyboard could not be determined");
    }
    print_keyboard(&kb);
    Ok(())
}

pub fn setup(controller: &KeyboardController) -> Result<()> {
    let print = |label: &str, app: Option<libkeyboarding_core::SetupApplication>| match app {
        Some(app) => println!("{:<10} {} {}", label, app.program, app.arguments.join(" ")),
        None => println!("{:<10} -", label),
    };
    print("keyboards", controller.keyboard_setup_application()?);
    if controller.has_secondary_keyboard_setup_application()? {
        print("input", controller.secondary_keyboard_setup_application()?);
    }
    Ok(())
}
