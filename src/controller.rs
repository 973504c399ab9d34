//! Picker controller: binding registry, active time value, and popup state.
//!
//! ## Usage
//!
//! One [`TimePickerController`] backs every field that shares a picker. It
//! owns the single active [`TimeValue`], remembers which binding the popup is
//! pointed at, and keeps each binding's text in step with adjustments.
use std::{collections::HashMap, sync::Arc, time::SystemTime};

use derive_setters::Setters;
use parking_lot::RwLock;
use tessera_ui::{PxPosition, PxSize};
use tracing::debug;

use crate::time_value::{ClockMode, TimeValue};

/// Per-binding configuration, immutable after [`TimePickerController::bind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Setters)]
pub struct TimePickerConfig {
    /// Seed for the binding's initial time. `None` resolves to the current
    /// time at bind.
    #[setters(strip_option)]
    pub initial_time: Option<SystemTime>,
    /// Clock convention used to display, step, and parse the time.
    pub clock_mode: ClockMode,
}

impl Default for TimePickerConfig {
    fn default() -> Self {
        Self {
            initial_time: None,
            clock_mode: ClockMode::TwelveHour,
        }
    }
}

/// Which part of the time a stepper control mutates.
///
/// Carried explicitly by each arrow control; the target field is never
/// inferred from control placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepField {
    /// The hour cell.
    Hours,
    /// The minute cell.
    Minutes,
    /// The AM/PM cell. Either step direction flips it.
    Meridiem,
}

/// Direction of a stepper control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    /// The up arrow.
    Increment,
    /// The down arrow.
    Decrement,
}

/// Opaque handle to a binding, returned by [`TimePickerController::bind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(usize);

/// Window-space rectangle of a bound field, captured while it is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldAnchor {
    /// Top-left corner of the field, relative to the window.
    pub origin: PxPosition,
    /// Measured size of the field.
    pub size: PxSize,
}

/// Shared table of field anchors.
///
/// Fields write their on-screen rectangle here every frame and the popup
/// overlay reads the active one back when placing itself. The table lives
/// outside the reactive state slot so the per-frame writes do not retrigger
/// builds.
#[derive(Clone, Default)]
pub struct AnchorTable {
    inner: Arc<RwLock<HashMap<FieldId, FieldAnchor>>>,
}

impl AnchorTable {
    /// Stores the latest on-screen rectangle for `id`.
    pub fn store(&self, id: FieldId, anchor: FieldAnchor) {
        self.inner.write().insert(id, anchor);
    }

    /// The last stored rectangle for `id`, if the field has been drawn.
    pub fn get(&self, id: FieldId) -> Option<FieldAnchor> {
        self.inner.read().get(&id).copied()
    }
}

impl PartialEq for AnchorTable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

struct Binding {
    key: String,
    index: usize,
    mode: ClockMode,
    initial: TimeValue,
    text: String,
}

/// Shared picker state: the binding registry, the active [`TimeValue`], and
/// the identity of the binding the popup is currently shown for.
///
/// Bindings live for the lifetime of the controller; there is no unbind.
pub struct TimePickerController {
    value: TimeValue,
    bindings: Vec<Binding>,
    active: Option<FieldId>,
    anchors: AnchorTable,
}

impl TimePickerController {
    /// Creates a controller with no bindings, seeded with the current time.
    pub fn new() -> Self {
        Self {
            value: TimeValue::now(),
            bindings: Vec::new(),
            active: None,
            anchors: AnchorTable::default(),
        }
    }

    /// Registers a binding for `(key, index)` and returns its handle.
    ///
    /// Idempotent: binding an already-bound `(key, index)` returns the
    /// existing handle and changes nothing.
    pub fn bind(&mut self, key: &str, index: usize, config: &TimePickerConfig) -> FieldId {
        if let Some(existing) = self.lookup(key, index) {
            debug!(key, index, "field already bound, keeping existing binding");
            return existing;
        }
        let initial = config
            .initial_time
            .map(TimeValue::from_timestamp)
            .unwrap_or_else(TimeValue::now);
        self.bindings.push(Binding {
            key: key.to_owned(),
            index,
            mode: config.clock_mode,
            initial,
            text: String::new(),
        });
        debug!(key, index, mode = ?config.clock_mode, "bound time picker field");
        FieldId(self.bindings.len() - 1)
    }

    /// Shows the popup for `id`, reconciling the binding's text first.
    ///
    /// Empty text loads the binding's configured initial time. Text that
    /// differs from the current formatted value is parsed; unparsable text is
    /// ignored and the prior value kept. The binding's text is then rewritten
    /// from the value. Unknown ids are ignored.
    pub fn activate(&mut self, id: FieldId) {
        let Some(binding) = self.bindings.get(id.0) else {
            return;
        };
        if binding.text.is_empty() {
            self.value = binding.initial;
        } else if binding.text != self.value.format(binding.mode) {
            match TimeValue::parse(&binding.text, binding.mode) {
                Ok(parsed) => self.value = parsed,
                Err(error) => {
                    debug!(text = %binding.text, %error, "keeping prior value");
                }
            }
        }
        self.active = Some(id);
        self.render_text(id);
    }

    /// Hides the popup. The value is untouched.
    pub fn dismiss(&mut self) {
        self.active = None;
    }

    /// Applies a stepper control to the active binding's value and rewrites
    /// its text. No-op while the popup is hidden.
    pub fn adjust(&mut self, field: StepField, direction: StepDirection) {
        let Some(id) = self.active else {
            return;
        };
        let mode = self.bindings[id.0].mode;
        match (field, direction) {
            (StepField::Hours, StepDirection::Increment) => self.value.increment_hour(mode),
            (StepField::Hours, StepDirection::Decrement) => self.value.decrement_hour(mode),
            (StepField::Minutes, StepDirection::Increment) => self.value.increment_minute(),
            (StepField::Minutes, StepDirection::Decrement) => self.value.decrement_minute(),
            (StepField::Meridiem, _) => {
                // The meridiem cell is hidden on a 24-hour clock.
                if mode == ClockMode::TwentyFourHour {
                    return;
                }
                self.value.toggle_meridiem();
            }
        }
        self.render_text(id);
    }

    /// Overwrites a binding's text, as the host page may do to the underlying
    /// input. The next [`TimePickerController::activate`] reconciles it.
    pub fn set_text(&mut self, id: FieldId, text: impl Into<String>) {
        if let Some(binding) = self.bindings.get_mut(id.0) {
            binding.text = text.into();
        }
    }

    /// Read-only query: the binding's text if non-empty, otherwise the
    /// current value formatted in the binding's mode. `index` selects among
    /// bindings sharing `key`, defaulting to the first.
    pub fn current_value(&self, key: &str, index: Option<usize>) -> Option<String> {
        let id = self.lookup(key, index.unwrap_or(0))?;
        let binding = &self.bindings[id.0];
        if binding.text.is_empty() {
            Some(self.value.format(binding.mode))
        } else {
            Some(binding.text.clone())
        }
    }

    /// The handle already issued for `(key, index)`, if bound.
    pub fn binding(&self, key: &str, index: usize) -> Option<FieldId> {
        self.lookup(key, index)
    }

    /// The shared anchor table. Cloning the table clones the handle, not the
    /// anchors.
    pub fn anchors(&self) -> AnchorTable {
        self.anchors.clone()
    }

    /// The binding the popup is currently shown for, if any.
    pub fn active(&self) -> Option<FieldId> {
        self.active
    }

    /// Whether the popup is shown.
    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// The active time value.
    pub fn value(&self) -> TimeValue {
        self.value
    }

    /// A binding's current text. Empty until first activation.
    pub fn text(&self, id: FieldId) -> &str {
        self.bindings
            .get(id.0)
            .map(|binding| binding.text.as_str())
            .unwrap_or_default()
    }

    /// A binding's clock mode.
    pub fn mode(&self, id: FieldId) -> ClockMode {
        self.bindings
            .get(id.0)
            .map(|binding| binding.mode)
            .unwrap_or_default()
    }

    fn render_text(&mut self, id: FieldId) {
        let mode = self.bindings[id.0].mode;
        self.bindings[id.0].text = self.value.format(mode);
    }

    fn lookup(&self, key: &str, index: usize) -> Option<FieldId> {
        self.bindings
            .iter()
            .position(|binding| binding.key == key && binding.index == index)
            .map(FieldId)
    }
}

impl Default for TimePickerController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;

    fn config_at(hour: u8, minute: u8, clock_mode: ClockMode) -> TimePickerConfig {
        let secs = hour as u64 * 3_600 + minute as u64 * 60;
        TimePickerConfig::default()
            .initial_time(UNIX_EPOCH + Duration::from_secs(secs))
            .clock_mode(clock_mode)
    }

    #[test]
    fn bind_is_idempotent_per_field() {
        let mut controller = TimePickerController::new();
        let config = config_at(9, 0, ClockMode::TwelveHour);
        let first = controller.bind("alarm", 0, &config);
        let second = controller.bind("alarm", 0, &config);
        assert_eq!(first, second);
        assert_eq!(controller.bindings.len(), 1);

        let other = controller.bind("alarm", 1, &config);
        assert_ne!(first, other);
        assert_eq!(controller.bindings.len(), 2);
    }

    #[test]
    fn activation_loads_the_configured_initial_time() {
        let mut controller = TimePickerController::new();
        let id = controller.bind("start", 0, &config_at(14, 5, ClockMode::TwelveHour));
        assert_eq!(controller.text(id), "");

        controller.activate(id);
        assert!(controller.is_open());
        assert_eq!(controller.text(id), "2 : 05 PM");
    }

    #[test]
    fn activation_reconciles_valid_text() {
        let mut controller = TimePickerController::new();
        let id = controller.bind("start", 0, &config_at(14, 5, ClockMode::TwelveHour));
        controller.set_text(id, "9 : 30 AM");

        controller.activate(id);
        assert_eq!(controller.value(), TimeValue::new(9, 30));
        assert_eq!(controller.text(id), "9 : 30 AM");
    }

    #[test]
    fn activation_ignores_unparsable_text() {
        let mut controller = TimePickerController::new();
        let id = controller.bind("start", 0, &config_at(14, 5, ClockMode::TwelveHour));
        controller.activate(id);
        let before = controller.value();

        controller.set_text(id, "garbage");
        controller.activate(id);
        assert_eq!(controller.value(), before);
        assert_eq!(controller.text(id), "2 : 05 PM");
    }

    #[test]
    fn adjustments_rewrite_the_active_text() {
        let mut controller = TimePickerController::new();
        let id = controller.bind("start", 0, &config_at(12, 0, ClockMode::TwelveHour));
        controller.activate(id);

        for _ in 0..10 {
            controller.adjust(StepField::Hours, StepDirection::Increment);
        }
        assert_eq!(controller.text(id), "10 : 00 PM");

        controller.adjust(StepField::Minutes, StepDirection::Decrement);
        assert_eq!(controller.text(id), "10 : 59 PM");

        controller.adjust(StepField::Meridiem, StepDirection::Increment);
        assert_eq!(controller.text(id), "10 : 59 AM");
        controller.adjust(StepField::Meridiem, StepDirection::Decrement);
        assert_eq!(controller.text(id), "10 : 59 PM");
    }

    #[test]
    fn meridiem_adjust_is_inert_on_a_twenty_four_hour_clock() {
        let mut controller = TimePickerController::new();
        let id = controller.bind("start", 0, &config_at(14, 5, ClockMode::TwentyFourHour));
        controller.activate(id);
        assert_eq!(controller.text(id), "14 : 05");

        controller.adjust(StepField::Meridiem, StepDirection::Increment);
        assert_eq!(controller.text(id), "14 : 05");
    }

    #[test]
    fn adjust_without_an_active_binding_does_nothing() {
        let mut controller = TimePickerController::new();
        let id = controller.bind("start", 0, &config_at(14, 5, ClockMode::TwelveHour));
        let before = controller.value();

        controller.adjust(StepField::Hours, StepDirection::Increment);
        assert_eq!(controller.value(), before);
        assert_eq!(controller.text(id), "");
    }

    #[test]
    fn dismiss_hides_without_touching_the_value() {
        let mut controller = TimePickerController::new();
        let id = controller.bind("start", 0, &config_at(14, 5, ClockMode::TwelveHour));
        controller.activate(id);
        controller.adjust(StepField::Hours, StepDirection::Increment);
        let value = controller.value();

        controller.dismiss();
        assert!(!controller.is_open());
        assert_eq!(controller.value(), value);
        assert_eq!(controller.text(id), "3 : 05 PM");
    }

    #[test]
    fn bindings_share_one_value_and_reconcile_on_return() {
        let mut controller = TimePickerController::new();
        let first = controller.bind("slot", 0, &config_at(9, 0, ClockMode::TwelveHour));
        let second = controller.bind("slot", 1, &config_at(14, 5, ClockMode::TwelveHour));

        controller.activate(first);
        controller.adjust(StepField::Hours, StepDirection::Increment);
        assert_eq!(controller.text(first), "10 : 00 AM");

        // Moving to the second binding repoints the shared value.
        controller.activate(second);
        assert_eq!(controller.text(second), "2 : 05 PM");
        controller.adjust(StepField::Minutes, StepDirection::Increment);
        assert_eq!(controller.text(second), "2 : 06 PM");

        // Returning to the first parses its text back into the value.
        controller.activate(first);
        assert_eq!(controller.value(), TimeValue::new(10, 0));
        assert_eq!(controller.text(first), "10 : 00 AM");
    }

    #[test]
    fn current_value_prefers_text_and_degrades_to_none() {
        let mut controller = TimePickerController::new();
        let first = controller.bind("slot", 0, &config_at(9, 0, ClockMode::TwelveHour));
        controller.bind("slot", 1, &config_at(14, 5, ClockMode::TwentyFourHour));

        // Empty text falls back to the formatted shared value.
        let formatted = controller.value().format(ClockMode::TwelveHour);
        assert_eq!(controller.current_value("slot", None), Some(formatted));

        controller.activate(first);
        assert_eq!(
            controller.current_value("slot", None).as_deref(),
            Some("9 : 00 AM")
        );
        // The second binding still has no text, so it reports the shared
        // value in its own mode.
        assert_eq!(
            controller.current_value("slot", Some(1)).as_deref(),
            Some("9 : 00")
        );

        assert_eq!(controller.current_value("unknown", None), None);
        assert_eq!(controller.current_value("slot", Some(7)), None);
    }

    #[test]
    fn anchor_table_is_shared_between_clones() {
        use tessera_ui::Px;

        let mut controller = TimePickerController::new();
        let id = controller.bind("start", 0, &config_at(9, 0, ClockMode::TwelveHour));

        let writer = controller.anchors();
        let reader = controller.anchors();
        assert_eq!(writer, reader);
        assert_eq!(reader.get(id), None);

        let anchor = FieldAnchor {
            origin: PxPosition::new(Px(40), Px(120)),
            size: PxSize {
                width: Px(200),
                height: Px(48),
            },
        };
        writer.store(id, anchor);
        assert_eq!(reader.get(id), Some(anchor));
    }
}
