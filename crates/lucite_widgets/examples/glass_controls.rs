//! Scripted pointer input against the switch and slider models
//!
//! Simulates a user toggling a switch and scrubbing a slider, stepping the
//! scheduler so the lift feedback on the knob and thumb is visible.

use std::time::Duration;

use anyhow::Result;
use lucite_animation::TransitionScheduler;
use lucite_core::{event_types, Color, Event, GlassStyle};
use lucite_widgets::prelude::*;

const STEP: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let scheduler = TransitionScheduler::new();
    let mut ctx = WidgetContext::new(scheduler.handle());

    let mut toggle = glass_switch()
        .on_tint(Color::from_hex(0x9B59B6))
        .on_change(|on| println!("switch changed to: {on}"))
        .build(&mut ctx);

    let mut volume = glass_slider()
        .range(0.0, 100.0)
        .initial(50.0)
        .on_change(|value| println!("slider value: {value:.0}"))
        .build(&mut ctx);

    let mut panel = glass_surface(&mut ctx);

    // Toggle the switch: enter, press (knob lifts), release (value flips)
    toggle.handle_event(&mut ctx, &Event::of(event_types::POINTER_ENTER));
    toggle.handle_event(&mut ctx, &Event::of(event_types::POINTER_DOWN));
    scheduler.advance(STEP);
    println!(
        "knob while pressed: scale {:.2}, elevation {:.1}",
        toggle.knob_params().scale,
        toggle.knob_params().elevation
    );
    toggle.handle_event(&mut ctx, &Event::of(event_types::POINTER_UP));
    for _ in 0..6 {
        toggle.update(&mut ctx, STEP);
        scheduler.advance(STEP);
    }
    println!(
        "switch settled: on={}, knob at {:.2}",
        toggle.is_on(&ctx),
        toggle.knob_progress()
    );

    // Scrub the slider from the middle to the far end
    volume.handle_event(&mut ctx, &Event::of(event_types::POINTER_ENTER));
    volume.handle_event(&mut ctx, &Event::pointer(event_types::POINTER_DOWN, 100.0, 0.0));
    for x in [120.0, 150.0, 180.0, 200.0] {
        volume.handle_event(&mut ctx, &Event::pointer(event_types::POINTER_MOVE, x, 0.0));
        scheduler.advance(STEP);
    }
    println!(
        "thumb while dragging: elevation {:.1}",
        volume.thumb_params().elevation
    );
    volume.handle_event(&mut ctx, &Event::pointer(event_types::POINTER_UP, 200.0, 0.0));
    while scheduler.advance(STEP) {}
    println!("slider released at {:.0}", volume.value());

    // Swap the panel's material
    panel.set_style(&mut ctx, GlassStyle::frosted());
    let repaint = ctx.take_dirty();
    println!("widgets needing repaint after the script: {}", repaint.len());
    Ok(())
}
