//! Popup overlay provider.
//!
//! ## Usage
//!
//! Wrap the main UI in [`time_picker_provider`] and hand the same controller
//! to it and to every [`time_picker_field`](crate::field::time_picker_field).
//! The provider draws the popup above the main content, directly below
//! whichever field is active, and dismisses it on Escape or a click that
//! lands outside both the popup and its field.
use std::sync::Arc;

use derive_setters::Setters;
use parking_lot::RwLock;
use tessera_ui::{
    ComputedData, Constraint, CursorEventContent, Dp, MeasurementError, PressKeyEventType, Px,
    PxPosition, PxSize, RenderSlot, State,
    layout::{LayoutInput, LayoutOutput, LayoutSpec, RenderInput},
    remember, tessera, winit,
};

use tessera_components::pos_misc::is_position_in_rect;

use crate::{
    controller::{FieldAnchor, FieldId, TimePickerController},
    popup::{TimePickerPopupArgs, time_picker_popup},
    time_value::ClockMode,
};

/// Vertical gap between the active field and the popup.
const POPUP_GAP: Dp = Dp(5.0);

/// Configuration for [`time_picker_provider`].
#[derive(Clone, PartialEq, Setters)]
pub struct TimePickerProviderArgs {
    /// Controller shared with every bound field.
    #[setters(skip)]
    pub controller: State<TimePickerController>,
    /// Title shown in the popup header.
    #[setters(into)]
    pub title: String,
    /// The always-visible base UI containing the fields.
    #[setters(skip)]
    pub main_content: Option<RenderSlot>,
}

impl TimePickerProviderArgs {
    /// Creates args with the required shared controller.
    pub fn new(controller: State<TimePickerController>) -> Self {
        Self {
            controller,
            title: "Pick Your Time".to_string(),
            main_content: None,
        }
    }

    /// Sets the main content slot.
    pub fn main_content<F>(mut self, main_content: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.main_content = Some(RenderSlot::new(main_content));
        self
    }

    /// Sets the main content slot using a shared render slot.
    pub fn main_content_shared(mut self, main_content: impl Into<RenderSlot>) -> Self {
        self.main_content = Some(main_content.into());
        self
    }
}

/// # time_picker_provider
///
/// Provide the shared time picker popup above the main UI.
///
/// ## Usage
///
/// Install once, near the top of the window content. Exactly one popup
/// exists per provider no matter how many fields are bound; it is shown for
/// the binding that was activated last.
///
/// ## Parameters
///
/// - `args` — the shared controller, popup title, and main content; see
///   [`TimePickerProviderArgs`].
#[tessera]
pub fn time_picker_provider(args: &TimePickerProviderArgs) {
    let args = args.clone();
    let controller = args.controller;
    let main_content = args
        .main_content
        .unwrap_or_else(|| RenderSlot::new(|| {}));

    main_content.render();

    let Some((id, mode)) = controller.with(|c| c.active().map(|id| (id, c.mode(id)))) else {
        return;
    };
    // The field publishes its rectangle while drawing, so a binding that was
    // activated before ever being drawn has no anchor yet. Skip the popup
    // until one exists.
    let Some(anchor) = controller.with(|c| c.anchors()).get(id) else {
        return;
    };

    popup_overlay_node(&PopupOverlayArgs {
        controller,
        id,
        mode,
        title: args.title,
        anchor,
    });
}

#[derive(Clone, PartialEq)]
struct PopupOverlayArgs {
    controller: State<TimePickerController>,
    id: FieldId,
    mode: ClockMode,
    title: String,
    anchor: FieldAnchor,
}

/// On-screen rectangle of the placed popup, in overlay coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PopupBounds {
    origin: PxPosition,
    size: ComputedData,
}

/// Cells shared between the overlay layout and its input handler.
///
/// `origin` is the overlay's own window position, captured while drawing,
/// used to translate the window-space field anchor into overlay coordinates.
/// `bounds` is the popup rectangle written during measure and read back when
/// hit-testing outside clicks.
#[derive(Clone, Default)]
struct OverlayCells {
    origin: Arc<RwLock<Option<PxPosition>>>,
    bounds: Arc<RwLock<Option<PopupBounds>>>,
}

impl PartialEq for OverlayCells {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.origin, &other.origin) && Arc::ptr_eq(&self.bounds, &other.bounds)
    }
}

#[tessera]
fn popup_overlay_node(args: &PopupOverlayArgs) {
    let args = args.clone();
    let controller = args.controller;
    let cells = remember(OverlayCells::default).with(|c| c.clone());

    input_handler(make_dismiss_handler(
        controller,
        args.id,
        args.anchor,
        cells.clone(),
    ));
    layout(PopupOverlayLayout {
        anchor: args.anchor,
        gap: POPUP_GAP.to_px(),
        cells,
    });

    time_picker_popup(&TimePickerPopupArgs {
        controller,
        mode: args.mode,
        title: args.title,
    });
}

/// Places the popup panel below the active field, clamped to the overlay.
#[derive(Clone, PartialEq)]
struct PopupOverlayLayout {
    anchor: FieldAnchor,
    gap: Px,
    cells: OverlayCells,
}

impl LayoutSpec for PopupOverlayLayout {
    fn measure(
        &self,
        input: &LayoutInput<'_>,
        output: &mut LayoutOutput<'_>,
    ) -> Result<ComputedData, MeasurementError> {
        let Some(popup_id) = input.children_ids().first().copied() else {
            return Ok(ComputedData {
                width: Px(0),
                height: Px(0),
            });
        };
        let popup_size = input.measure_child(popup_id, &Constraint::NONE)?;

        let overlay_origin = (*self.cells.origin.read()).unwrap_or(PxPosition::ZERO);
        let available = PxSize {
            width: input
                .parent_constraint()
                .width()
                .get_max()
                .unwrap_or(Px::MAX),
            height: input
                .parent_constraint()
                .height()
                .get_max()
                .unwrap_or(Px::MAX),
        };
        let position =
            resolve_popup_position(self.anchor, overlay_origin, popup_size, available, self.gap);
        output.place_child(popup_id, position);

        *self.cells.bounds.write() = Some(PopupBounds {
            origin: position,
            size: popup_size,
        });

        // Cover the window when bounded so document-order stacking puts the
        // popup above the main content wherever it lands.
        Ok(ComputedData {
            width: input
                .parent_constraint()
                .width()
                .get_max()
                .unwrap_or(position.x + popup_size.width),
            height: input
                .parent_constraint()
                .height()
                .get_max()
                .unwrap_or(position.y + popup_size.height),
        })
    }

    fn record(&self, input: &RenderInput<'_>) {
        if let Some(abs) = input.metadata_mut().abs_position {
            *self.cells.origin.write() = Some(abs);
        }
    }
}

/// Resolve the popup's top-left corner in overlay coordinates: below the
/// anchored field with a small gap, nudged back inside the available area
/// when it would overflow an edge.
fn resolve_popup_position(
    anchor: FieldAnchor,
    overlay_origin: PxPosition,
    popup_size: ComputedData,
    available: PxSize,
    gap: Px,
) -> PxPosition {
    let mut x = anchor.origin.x - overlay_origin.x;
    let mut y = anchor.origin.y - overlay_origin.y + anchor.size.height + gap;

    let max_x = available.width - popup_size.width;
    let max_y = available.height - popup_size.height;
    if max_x > Px::ZERO {
        x = x.min(max_x);
    }
    if max_y > Px::ZERO {
        y = y.min(max_y);
    }
    if x < Px::ZERO {
        x = Px::ZERO;
    }
    if y < Px::ZERO {
        y = Px::ZERO;
    }

    PxPosition::new(x, y)
}

fn dismiss_if_still_active(controller: State<TimePickerController>, id: FieldId) {
    controller.with_mut(|c| {
        // Another field may have claimed the popup within this same frame.
        if c.active() == Some(id) {
            c.dismiss();
        }
    });
}

/// Build the overlay input handler: Escape dismisses, and so does releasing
/// a click outside both the popup and the field it is anchored to.
fn make_dismiss_handler(
    controller: State<TimePickerController>,
    id: FieldId,
    anchor: FieldAnchor,
    cells: OverlayCells,
) -> Box<dyn Fn(tessera_ui::InputHandlerInput<'_>) + Send + Sync> {
    Box::new(move |input: tessera_ui::InputHandlerInput<'_>| {
        for event in input.keyboard_events.drain(..) {
            if event.state == winit::event::ElementState::Pressed
                && let winit::keyboard::PhysicalKey::Code(winit::keyboard::KeyCode::Escape) =
                    event.physical_key
            {
                dismiss_if_still_active(controller, id);
                return;
            }
        }

        let Some(cursor) = input.cursor_position_rel else {
            return;
        };
        let released = input.cursor_events.iter().any(|event| {
            matches!(
                &event.content,
                CursorEventContent::Released(PressKeyEventType::Left)
            )
        });
        if !released {
            return;
        }

        let overlay_origin = (*cells.origin.read()).unwrap_or(PxPosition::ZERO);
        let field_origin = PxPosition::new(
            anchor.origin.x - overlay_origin.x,
            anchor.origin.y - overlay_origin.y,
        );
        let in_field = is_position_in_rect(
            cursor,
            field_origin,
            anchor.size.width,
            anchor.size.height,
        );
        let in_popup = (*cells.bounds.read()).is_some_and(|bounds| {
            is_position_in_rect(cursor, bounds.origin, bounds.size.width, bounds.size.height)
        });
        if !in_field && !in_popup {
            dismiss_if_still_active(controller, id);
        }
    })
}
