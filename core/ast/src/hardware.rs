use std::collections::BTreeSet;

use rustc_hash::FxHashSet;

/// Hardware a program actually touches, collected during validation and
/// consumed by code generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedHardware {
    components: FxHashSet<String>,
    timers: BTreeSet<u8>,
    serial: bool,
    brick_light: bool,
}

impl UsedHardware {
    pub fn add_component(&mut self, name: &str) {
        self.components.insert(name.to_string());
    }

    pub fn add_timer(&mut self, timer: u8) {
        self.timers.insert(timer);
    }

    pub fn set_serial_used(&mut self) {
        self.serial = true;
    }

    pub fn set_brick_light_used(&mut self) {
        self.brick_light = true;
    }

    #[must_use]
    pub fn uses_component(&self, name: &str) -> bool {
        self.components.contains(name)
    }

    /// Timer numbers in ascending order.
    pub fn timers(&self) -> impl Iterator<Item = u8> + '_ {
        self.timers.iter().copied()
    }

    #[must_use]
    pub fn uses_serial(&self) -> bool {
        self.serial
    }

    #[must_use]
    pub fn uses_brick_light(&self) -> bool {
        self.brick_light
    }
}
