//! The bindable text field. Clicking it asks the shared controller to show
//! the popup for this binding; the field itself never accepts typed input.
use derive_setters::Setters;
use tessera_ui::{
    ComputedData, DimensionValue, Dp, MeasurementError, Modifier, Px, PxPosition, PxSize, State,
    layout::{LayoutInput, LayoutOutput, LayoutSpec, RenderInput},
    remember, tessera, use_context,
};

use tessera_components::{
    alignment::Alignment,
    modifier::ModifierExt as _,
    shape_def::Shape,
    surface::{SurfaceArgs, SurfaceStyle, surface},
    text::{TextArgs, text},
    theme::MaterialTheme,
};

use crate::controller::{AnchorTable, FieldAnchor, FieldId, TimePickerConfig, TimePickerController};

/// Configuration for [`time_picker_field`].
#[derive(Clone, PartialEq, Setters)]
pub struct TimePickerFieldArgs {
    /// Optional modifier chain applied to the field.
    pub modifier: Modifier,
    /// Groups fields that belong together, like a form name.
    #[setters(into)]
    pub key: String,
    /// Disambiguates fields sharing the same key.
    pub index: usize,
    /// Per-binding time picker configuration.
    pub config: TimePickerConfig,
    /// Optional external controller shared with other fields and the
    /// provider.
    ///
    /// When this is `None`, the field creates and owns a private controller,
    /// and the popup never shows because no provider observes it. Most
    /// callers pass the controller they gave to
    /// [`time_picker_provider`](crate::provider::time_picker_provider).
    #[setters(skip)]
    pub controller: Option<State<TimePickerController>>,
}

impl Default for TimePickerFieldArgs {
    fn default() -> Self {
        Self {
            modifier: Modifier::new().constrain(
                Some(DimensionValue::Wrap {
                    min: Some(Dp(160.0).into()),
                    max: None,
                }),
                Some(DimensionValue::Fixed(Dp(40.0).into())),
            ),
            key: String::new(),
            index: 0,
            config: TimePickerConfig::default(),
            controller: None,
        }
    }
}

impl TimePickerFieldArgs {
    /// Sets the shared controller.
    pub fn controller(mut self, controller: State<TimePickerController>) -> Self {
        self.controller = Some(controller);
        self
    }
}

/// # time_picker_field
///
/// Render a read-only text field bound to a shared time picker.
///
/// ## Usage
///
/// Place anywhere inside the main content of a
/// [`time_picker_provider`](crate::provider::time_picker_provider), passing
/// the same controller to both. Clicking the field opens the shared popup
/// directly below it; the selected time is written back as text.
///
/// ## Parameters
///
/// - `args` — field key, index, and picker configuration; see
///   [`TimePickerFieldArgs`].
#[tessera]
pub fn time_picker_field(args: &TimePickerFieldArgs) {
    let args = args.clone();
    let controller = args
        .controller
        .unwrap_or_else(|| remember(TimePickerController::new));
    let key = args.key;
    let index = args.index;
    let config = args.config;

    // Bind lazily so steady-state builds only read the controller.
    let id = match controller.with(|c| c.binding(&key, index)) {
        Some(id) => id,
        None => controller.with_mut(|c| c.bind(&key, index, &config)),
    };
    let (field_text, open) =
        controller.with(|c| (c.text(id).to_owned(), c.active() == Some(id)));
    let anchors = controller.with(|c| c.anchors());

    layout(FieldAnchorLayout { id, anchors });

    let theme = use_context::<MaterialTheme>()
        .expect("MaterialTheme must be provided")
        .get();
    let scheme = theme.color_scheme;
    let typography = theme.typography;
    let border_color = if open { scheme.primary } else { scheme.outline };

    surface(&SurfaceArgs::with_child(
        SurfaceArgs::default()
            .modifier(args.modifier)
            .style(SurfaceStyle::Outlined {
                color: border_color,
                width: Dp(1.0),
            })
            .shape(Shape::rounded_rectangle(Dp(4.0)))
            .content_alignment(Alignment::CenterStart)
            .on_click(move || {
                controller.with_mut(|c| c.activate(id));
            }),
        move || {
            let field_text = field_text.clone();
            Modifier::new().padding_all(Dp(12.0)).run(move || {
                text(&TextArgs::default()
                    .text(field_text.clone())
                    .size(typography.body_large.font_size)
                    .color(scheme.on_surface));
            });
        },
    ));
}

/// Wraps the field surface and publishes its on-screen rectangle to the
/// shared anchor table, so the provider can place the popup under it.
///
/// The absolute position read here was assigned while drawing the previous
/// frame, which is current by the time the user clicks the field.
#[derive(Clone, PartialEq)]
struct FieldAnchorLayout {
    id: FieldId,
    anchors: AnchorTable,
}

impl LayoutSpec for FieldAnchorLayout {
    fn measure(
        &self,
        input: &LayoutInput<'_>,
        output: &mut LayoutOutput<'_>,
    ) -> Result<ComputedData, MeasurementError> {
        let Some(child_id) = input.children_ids().first().copied() else {
            return Ok(ComputedData {
                width: Px(0),
                height: Px(0),
            });
        };
        let computed = input.measure_child_in_parent_constraint(child_id)?;
        output.place_child(child_id, PxPosition::ZERO);
        Ok(computed)
    }

    fn record(&self, input: &RenderInput<'_>) {
        let metadata = input.metadata_mut();
        if let (Some(origin), Some(size)) = (metadata.abs_position, metadata.computed_data) {
            self.anchors.store(
                self.id,
                FieldAnchor {
                    origin,
                    size: PxSize {
                        width: size.width,
                        height: size.height,
                    },
                },
            );
        }
    }
}
