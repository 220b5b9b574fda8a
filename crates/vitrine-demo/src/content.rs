#![forbid(unsafe_code)]

//! Static page content: hero copy and the service cards.

use vitrine_core::card::{CardDef, CardRegistry};

/// Hero headline.
pub const HERO_TITLE: &str = "The Bench — Repairs & Code";

/// Hero subtitle, revealed by the typewriter.
pub const HERO_SUBTITLE: &str =
    "Laptop technician • Web developer • Electronics & microcontroller enthusiast";

/// Hero-level commit control label and destination.
pub const ABOUT_LABEL: &str = "[ About me → profile.html ]";

/// Destination of the hero commit control.
pub const ABOUT_LINK: &str = "profile.html";

/// Register the service cards in display order.
pub fn register_cards(registry: &mut CardRegistry) {
    let defs = [
        CardDef::new()
            .title("Repair Services")
            .description("Laptop diagnostics, component-level board repair, and thermal service.")
            .target_link("order.html#repair"),
        CardDef::new()
            .title("Web Development")
            .description("Responsive sites, dashboards, and small web apps built to order.")
            .target_link("order.html#web"),
        CardDef::new()
            .title("Electronics")
            .description("Arduino and microcontroller prototypes, sensors, and automation.")
            .target_link("order.html#electronics"),
        CardDef::new()
            .title("Data Recovery")
            .description("Disk imaging and file recovery from failing drives.")
            .target_link("order.html#recovery"),
        CardDef::new()
            .title("Upgrades")
            .description("Memory, storage, and battery upgrades with clean installs.")
            .target_link("order.html#upgrades"),
        CardDef::new().title("Consulting"), // link and description fall back
    ];
    for def in defs {
        registry.register(def);
    }
}
