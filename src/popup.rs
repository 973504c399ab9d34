//! The shared popup panel: stepper arrows for each time part plus a close
//! affordance. One panel instance serves every bound field; the provider
//! shows it for whichever binding is active.
use tessera_ui::{Dp, Modifier, State, tessera, use_context};

use tessera_components::{
    alignment::{Alignment, CrossAxisAlignment, MainAxisAlignment},
    column::{ColumnArgs, column},
    modifier::ModifierExt as _,
    row::{RowArgs, row},
    shape_def::Shape,
    spacer::{SpacerArgs, spacer},
    surface::{SurfaceArgs, SurfaceStyle, surface},
    text::{TextArgs, text},
    theme::MaterialTheme,
};

use crate::{
    controller::{StepDirection, StepField, TimePickerController},
    time_value::{ClockMode, Meridiem},
};

const VALUE_CELL_WIDTH: Dp = Dp(64.0);
const VALUE_CELL_HEIGHT: Dp = Dp(48.0);
const VALUE_CELL_RADIUS: Dp = Dp(12.0);
const STEP_BUTTON_SIZE: Dp = Dp(28.0);
const GROUP_GAP: Dp = Dp(12.0);

/// Render props for [`time_picker_popup`].
#[derive(Clone, PartialEq)]
pub(crate) struct TimePickerPopupArgs {
    pub(crate) controller: State<TimePickerController>,
    pub(crate) mode: ClockMode,
    pub(crate) title: String,
}

/// The popup panel itself, without placement. The provider positions it
/// under the active field.
#[tessera]
pub(crate) fn time_picker_popup(args: &TimePickerPopupArgs) {
    let args = args.clone();
    let controller = args.controller;
    let mode = args.mode;
    let title = args.title;
    let value = controller.with(|c| c.value());
    let theme = use_context::<MaterialTheme>()
        .expect("MaterialTheme must be provided")
        .get();
    let scheme = theme.color_scheme;
    let typography = theme.typography;

    let hour_display = value.hour_for_display(mode).to_string();
    let minute_display = format!("{:02}", value.minute());
    let meridiem = value.meridiem();

    surface(&SurfaceArgs::with_child(
        SurfaceArgs::default()
            .style(SurfaceStyle::Filled {
                color: scheme.surface_container_high,
            })
            .elevation(Dp(3.0))
            .shape(Shape::rounded_rectangle(VALUE_CELL_RADIUS))
            .block_input(true),
        move || {
            let title = title.clone();
            let hour_display = hour_display.clone();
            let minute_display = minute_display.clone();
            Modifier::new().padding_all(Dp(16.0)).run(move || {
                let title = title.clone();
                let hour_display = hour_display.clone();
                let minute_display = minute_display.clone();
                column(ColumnArgs::default(), move |scope| {
                    let title = title.clone();
                    scope.child(move || {
                        popup_header(title.clone(), controller);
                    });
                    scope.child(|| {
                        spacer(&SpacerArgs::new(Modifier::new().height(GROUP_GAP)));
                    });
                    scope.child(move || {
                        let hour_display = hour_display.clone();
                        let minute_display = minute_display.clone();
                        row(
                            RowArgs::default()
                                .main_axis_alignment(MainAxisAlignment::Center)
                                .cross_axis_alignment(CrossAxisAlignment::Center),
                            move |row_scope| {
                                let hour_display = hour_display.clone();
                                row_scope.child(move || {
                                    stepper_group(
                                        StepField::Hours,
                                        hour_display.clone(),
                                        controller,
                                    );
                                });
                                row_scope.child(|| {
                                    spacer(&SpacerArgs::new(Modifier::new().width(Dp(6.0))));
                                });
                                row_scope.child(move || {
                                    text(&TextArgs::default()
                                        .text(":")
                                        .size(typography.headline_small.font_size)
                                        .color(scheme.on_surface_variant));
                                });
                                row_scope.child(|| {
                                    spacer(&SpacerArgs::new(Modifier::new().width(Dp(6.0))));
                                });
                                let minute_display = minute_display.clone();
                                row_scope.child(move || {
                                    stepper_group(
                                        StepField::Minutes,
                                        minute_display.clone(),
                                        controller,
                                    );
                                });
                                if mode == ClockMode::TwelveHour {
                                    row_scope.child(|| {
                                        spacer(&SpacerArgs::new(
                                            Modifier::new().width(GROUP_GAP),
                                        ));
                                    });
                                    let meridiem_display = match meridiem {
                                        Meridiem::Am => "AM",
                                        Meridiem::Pm => "PM",
                                    };
                                    row_scope.child(move || {
                                        stepper_group(
                                            StepField::Meridiem,
                                            meridiem_display.to_string(),
                                            controller,
                                        );
                                    });
                                }
                            },
                        );
                    });
                });
            });
        },
    ));
}

fn popup_header(title: String, controller: State<TimePickerController>) {
    let theme = use_context::<MaterialTheme>()
        .expect("MaterialTheme must be provided")
        .get();
    let scheme = theme.color_scheme;
    let typography = theme.typography;

    row(
        RowArgs::default().cross_axis_alignment(CrossAxisAlignment::Center),
        move |scope| {
            let title = title.clone();
            scope.child(move || {
                text(&TextArgs::default()
                    .text(title.clone())
                    .size(typography.title_medium.font_size)
                    .color(scheme.on_surface));
            });
            scope.child(|| {
                spacer(&SpacerArgs::new(Modifier::new().width(Dp(16.0))));
            });
            scope.child(move || {
                step_button("×", move || {
                    controller.with_mut(|c| c.dismiss());
                });
            });
        },
    );
}

/// One column of up arrow, value cell, down arrow, wired to a single
/// [`StepField`]. Either arrow of the meridiem column flips it.
fn stepper_group(field: StepField, value: String, controller: State<TimePickerController>) {
    column(
        ColumnArgs::default().cross_axis_alignment(CrossAxisAlignment::Center),
        move |scope| {
            scope.child(move || {
                step_button("+", move || {
                    controller.with_mut(|c| c.adjust(field, StepDirection::Increment));
                });
            });
            scope.child(|| {
                spacer(&SpacerArgs::new(Modifier::new().height(Dp(6.0))));
            });
            let value_text = value.clone();
            scope.child(move || {
                value_cell(value_text.clone());
            });
            scope.child(|| {
                spacer(&SpacerArgs::new(Modifier::new().height(Dp(6.0))));
            });
            scope.child(move || {
                step_button("-", move || {
                    controller.with_mut(|c| c.adjust(field, StepDirection::Decrement));
                });
            });
        },
    );
}

fn value_cell(value: String) {
    let theme = use_context::<MaterialTheme>()
        .expect("MaterialTheme must be provided")
        .get();
    let scheme = theme.color_scheme;
    let typography = theme.typography;
    surface(&SurfaceArgs::with_child(
        SurfaceArgs::default()
            .modifier(
                Modifier::new()
                    .width(VALUE_CELL_WIDTH)
                    .height(VALUE_CELL_HEIGHT),
            )
            .style(SurfaceStyle::Filled {
                color: scheme.surface_container_low,
            })
            .shape(Shape::rounded_rectangle(VALUE_CELL_RADIUS))
            .content_alignment(Alignment::Center),
        move || {
            let value = value.clone();
            text(&TextArgs::default()
                .text(value)
                .size(typography.headline_small.font_size)
                .color(scheme.on_surface));
        },
    ));
}

fn step_button(label: &'static str, on_click: impl Fn() + Send + Sync + 'static) {
    let theme = use_context::<MaterialTheme>()
        .expect("MaterialTheme must be provided")
        .get();
    let scheme = theme.color_scheme;
    let typography = theme.typography;
    surface(&SurfaceArgs::with_child(
        SurfaceArgs::default()
            .modifier(Modifier::new().size(STEP_BUTTON_SIZE, STEP_BUTTON_SIZE))
            .style(SurfaceStyle::Filled {
                color: scheme.surface_container_low,
            })
            .shape(Shape::capsule())
            .content_alignment(Alignment::Center)
            .on_click(on_click),
        move || {
            text(&TextArgs::default()
                .text(label)
                .size(typography.body_medium.font_size)
                .color(scheme.on_surface));
        },
    ));
}
