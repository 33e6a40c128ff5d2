use heapless::Vec;

use crate::{AnalogSource, RegisterError, ADC_MAX, MAX_KEYS};

/// One key binding: a name and the ADC count expected while it is held
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEntry<'a> {
    pub name: &'a str,
    pub value: u16,
}

/// Bounded table of key bindings tied to one analog source
///
/// Entries are append-only and kept in registration order; when two entries
/// share a value, resolution returns the earliest one. All `wait_*` methods
/// are blocking busy-spins with no timeout, matching the single-context
/// firmware loops this is meant for.
pub struct AnalogKeypad<'a, S> {
    source: S,
    idle_value: u16,
    last_raw: u16,
    entries: Vec<KeyEntry<'a>, MAX_KEYS>,
}

impl<'a, S: AnalogSource> AnalogKeypad<'a, S> {
    /// Create an empty table reading from `source`
    pub fn new(source: S) -> Self {
        Self::with_idle_value(source, 0)
    }

    /// Create an empty table with an explicit idle-line value
    ///
    /// The idle value is stored for callers to query but plays no part in
    /// resolution, which always treats 0 and anything at/above `ADC_MAX` as
    /// "no key down".
    pub fn with_idle_value(source: S, idle_value: u16) -> Self {
        Self {
            source,
            idle_value,
            last_raw: 0,
            entries: Vec::new(),
        }
    }

    /// Add one key binding
    ///
    /// The name must be non-empty and the value strictly inside the
    /// conversion range; both rails are reserved for the idle line.
    pub fn register_key(&mut self, name: &'a str, value: u16) -> Result<(), RegisterError> {
        if name.is_empty() {
            return Err(RegisterError::NameEmpty);
        }
        if value == 0 || value >= ADC_MAX {
            return Err(RegisterError::ForbiddenValue);
        }
        if self.entries.len() >= MAX_KEYS {
            return Err(RegisterError::SizeExceeded);
        }
        // Cannot fail, capacity was just checked
        self.entries.push(KeyEntry { name, value }).ok();
        Ok(())
    }

    /// Add a batch of key bindings, paired by index
    ///
    /// Fails with `NotSameLength` before touching the table if the slices
    /// differ in length; otherwise registers in order and stops at the first
    /// failure, leaving earlier registrations in place.
    pub fn register_keys(&mut self, names: &[&'a str], values: &[u16]) -> Result<(), RegisterError> {
        if names.len() != values.len() {
            return Err(RegisterError::NotSameLength);
        }
        for (&name, &value) in names.iter().zip(values) {
            self.register_key(name, value)?;
        }
        Ok(())
    }

    /// Whether any entry carries this name
    pub fn has_name(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Whether any entry carries this ADC count
    pub fn has_value(&self, value: u16) -> bool {
        self.entries.iter().any(|e| e.value == value)
    }

    /// Sample the source once and resolve the reading to a key name
    ///
    /// Returns `None` for a boundary reading (line idle at either rail) or
    /// a value no entry matches. The raw reading is remembered either way
    /// so `wait_change` can detect the line moving.
    pub fn get_pressed(&mut self) -> Option<&'a str> {
        let raw = self.source.read();
        self.last_raw = raw;

        if raw == 0 || raw >= ADC_MAX {
            return None;
        }
        self.entries.iter().find(|e| e.value == raw).map(|e| e.name)
    }

    /// Whether `key` is the key currently held
    pub fn is_pressed(&mut self, key: &str) -> bool {
        !key.is_empty() && self.get_pressed() == Some(key)
    }

    /// Spin until the raw reading differs from the last stored sample
    pub fn wait_change(&mut self) {
        while self.source.read() == self.last_raw {}
    }

    /// Spin until no key resolves
    pub fn wait_unpressed(&mut self) {
        while self.get_pressed().is_some() {}
    }

    /// Spin until some registered key is held, and return its name
    pub fn wait_pressed(&mut self) -> &'a str {
        loop {
            if let Some(name) = self.get_pressed() {
                return name;
            }
        }
    }

    /// Spin until the named key is held
    pub fn wait_key(&mut self, key: &str) {
        while !self.is_pressed(key) {}
    }

    /// The registered entries, in registration order
    pub fn entries(&self) -> &[KeyEntry<'a>] {
        &self.entries
    }

    /// Registered names, in registration order
    pub fn key_names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    /// Registered values, in registration order
    pub fn key_values(&self) -> impl Iterator<Item = u16> + '_ {
        self.entries.iter().map(|e| e.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The idle-line value given at construction. Stored only; resolution
    /// uses the fixed rail boundaries.
    pub fn idle_value(&self) -> u16 {
        self.idle_value
    }

    /// The raw count from the most recent sample
    pub fn last_reading(&self) -> u16 {
        self.last_raw
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::FnSource;
    use std::cell::Cell;
    use std::rc::Rc;

    // Source that replays a fixed script, holding the final reading forever.
    // Shares its cursor so tests can check how many samples were consumed.
    fn scripted(
        samples: &'static [u16],
    ) -> (AnalogKeypad<'static, FnSource<impl FnMut() -> u16>>, Rc<Cell<usize>>) {
        let cursor = Rc::new(Cell::new(0));
        let shared = cursor.clone();
        let source = FnSource(move || {
            let i = shared.get();
            shared.set(i + 1);
            samples[i.min(samples.len() - 1)]
        });
        (AnalogKeypad::new(source), cursor)
    }

    fn steady(value: u16) -> AnalogKeypad<'static, FnSource<impl FnMut() -> u16>> {
        AnalogKeypad::new(FnSource(move || value))
    }

    #[test]
    fn register_then_lookup() {
        let mut pad = steady(0);

        assert!(pad.is_empty());
        pad.register_key("enter", 512).unwrap();
        pad.register_key("esc", 300).unwrap();

        assert_eq!(pad.len(), 2);
        assert!(pad.has_name("enter"));
        assert!(pad.has_value(512));
        assert!(pad.has_name("esc"));
        assert!(pad.has_value(300));
        assert!(!pad.has_name("tab"));
        assert!(!pad.has_value(301));

        assert_eq!(pad.entries()[0], KeyEntry { name: "enter", value: 512 });
        let names: Vec<&str, MAX_KEYS> = pad.key_names().collect();
        assert_eq!(&names[..], &["enter", "esc"]);
        let values: Vec<u16, MAX_KEYS> = pad.key_values().collect();
        assert_eq!(&values[..], &[512, 300]);
    }

    #[test]
    fn empty_name_rejected() {
        let mut pad = steady(0);
        assert_eq!(pad.register_key("", 100), Err(RegisterError::NameEmpty));
        assert_eq!(pad.register_key("", 0), Err(RegisterError::NameEmpty));
        assert!(pad.is_empty());
    }

    #[test]
    fn boundary_values_rejected() {
        let mut pad = steady(0);
        assert_eq!(pad.register_key("a", 0), Err(RegisterError::ForbiddenValue));
        assert_eq!(pad.register_key("a", 1023), Err(RegisterError::ForbiddenValue));
        assert_eq!(pad.register_key("a", 2000), Err(RegisterError::ForbiddenValue));
        assert!(pad.is_empty());

        // Both edges of the allowed range are fine
        assert_eq!(pad.register_key("low", 1), Ok(()));
        assert_eq!(pad.register_key("high", 1022), Ok(()));
    }

    #[test]
    fn capacity_is_strict() {
        let mut pad = steady(0);
        let names = [
            "k1", "k2", "k3", "k4", "k5", "k6", "k7", "k8", "k9", "k10", "k11", "k12", "k13",
            "k14", "k15", "k16", "k17", "k18", "k19", "k20", "k21", "k22", "k23", "k24", "k25",
        ];
        for (i, &name) in names.iter().enumerate() {
            assert_eq!(pad.register_key(name, (i + 1) as u16), Ok(()));
        }
        assert_eq!(pad.len(), MAX_KEYS);
        assert_eq!(pad.register_key("k26", 26), Err(RegisterError::SizeExceeded));
        assert_eq!(pad.len(), MAX_KEYS);
    }

    #[test]
    fn batch_register() {
        let mut pad = steady(0);
        pad.register_keys(&["a", "b", "c"], &[100, 200, 300]).unwrap();
        assert_eq!(pad.len(), 3);
        assert!(pad.has_name("c"));
    }

    #[test]
    fn batch_length_mismatch_registers_nothing() {
        let mut pad = steady(0);
        assert_eq!(
            pad.register_keys(&["a", "b"], &[100]),
            Err(RegisterError::NotSameLength)
        );
        assert!(pad.is_empty());
    }

    #[test]
    fn batch_stops_at_first_failure() {
        let mut pad = steady(0);
        assert_eq!(
            pad.register_keys(&["a", "b", "c"], &[100, 1023, 300]),
            Err(RegisterError::ForbiddenValue)
        );
        // "a" made it in before the bad pair; "c" never got a look
        assert!(pad.has_name("a"));
        assert!(!pad.has_name("b"));
        assert!(!pad.has_name("c"));
    }

    #[test]
    fn resolve_readings() {
        let (mut pad, _) = scripted(&[100, 500, 0, 1023, 300]);
        pad.register_keys(&["A", "B"], &[100, 500]).unwrap();

        assert_eq!(pad.get_pressed(), Some("A"));
        assert_eq!(pad.get_pressed(), Some("B"));
        assert_eq!(pad.get_pressed(), None); // idle at 0
        assert_eq!(pad.get_pressed(), None); // idle at the top rail
        assert_eq!(pad.get_pressed(), None); // 300 is not registered
        assert_eq!(pad.last_reading(), 300);
    }

    #[test]
    fn duplicate_value_resolves_to_first() {
        let (mut pad, _) = scripted(&[400]);
        pad.register_key("first", 400).unwrap();
        pad.register_key("second", 400).unwrap();
        assert_eq!(pad.get_pressed(), Some("first"));
    }

    #[test]
    fn is_pressed_tracks_current_reading() {
        let (mut pad, _) = scripted(&[100, 500, 100]);
        pad.register_keys(&["A", "B"], &[100, 500]).unwrap();

        assert!(pad.is_pressed("A"));
        assert!(!pad.is_pressed("A")); // B is down now
        assert!(!pad.is_pressed("")); // empty never matches, sample or not
    }

    #[test]
    fn wait_pressed_returns_at_first_hit() {
        let (mut pad, cursor) = scripted(&[0, 300, 500]);
        pad.register_keys(&["A", "B"], &[100, 500]).unwrap();

        assert_eq!(pad.wait_pressed(), "B");
        // Skipped exactly the idle and unregistered readings, nothing more
        assert_eq!(cursor.get(), 3);
    }

    #[test]
    fn wait_unpressed_spins_until_idle() {
        let (mut pad, cursor) = scripted(&[100, 100, 0]);
        pad.register_key("A", 100).unwrap();

        pad.wait_unpressed();
        assert_eq!(cursor.get(), 3);
        assert_eq!(pad.last_reading(), 0);
    }

    #[test]
    fn wait_key_matches_only_the_named_key() {
        let (mut pad, cursor) = scripted(&[500, 0, 100]);
        pad.register_keys(&["A", "B"], &[100, 500]).unwrap();

        pad.wait_key("A"); // passes over B and an idle gap
        assert_eq!(cursor.get(), 3);
    }

    #[test]
    fn wait_change_compares_against_last_sample() {
        let (mut pad, cursor) = scripted(&[100, 100, 100, 107]);
        pad.register_key("A", 100).unwrap();

        assert_eq!(pad.get_pressed(), Some("A"));
        pad.wait_change();
        // Spun through the two repeats, stopped on the new reading
        assert_eq!(cursor.get(), 4);
        // wait_change itself does not store the fresh sample
        assert_eq!(pad.last_reading(), 100);
    }

    #[test]
    fn idle_value_is_stored_but_inert() {
        let samples: &'static [u16] = &[900];
        let mut pad = AnalogKeypad::with_idle_value(FnSource(move || samples[0]), 900);
        pad.register_key("A", 900).unwrap();

        assert_eq!(pad.idle_value(), 900);
        // Resolution ignores the configured idle value entirely
        assert_eq!(pad.get_pressed(), Some("A"));
    }
}
