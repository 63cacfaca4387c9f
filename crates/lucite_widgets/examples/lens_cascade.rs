//! The lens showcase: a tapped lens plus a staggered cascade
//!
//! One standalone lens is lifted by a scheduled request half a second in;
//! a session then cascades three more through a lift-and-drop cycle, each
//! starting 200ms after its neighbor.

use std::time::Duration;

use anyhow::Result;
use lucite_animation::{
    get_scheduler, set_global_scheduler, ChoreoSession, Choreography, Pose, TransitionRequest,
    TransitionScheduler,
};
use lucite_widgets::prelude::*;

const STEP: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let scheduler = TransitionScheduler::new();
    set_global_scheduler(scheduler.handle());

    let mut ctx = WidgetContext::new(get_scheduler());

    // A single lens, lifted on a delay like a hover highlight
    let solo = lens().diameter(60.0).build(&mut ctx);
    get_scheduler().schedule(
        solo.element(),
        Duration::from_millis(500),
        TransitionRequest::to(Pose::Lifted)
            .on_complete(|outcome| tracing::info!(?outcome, "solo lens settled")),
    );

    // Three lenses cascading: lift at 500ms + i*200ms, drop 500ms later
    let cascade = ChoreoSession::uniform(get_scheduler(), 3, LensConfig::default().lift);
    cascade.begin(
        Choreography::lift_then_drop(Duration::from_millis(500))
            .with_stagger(|index| Duration::from_millis(500 + 200 * index as u64)),
    )?;

    for frame in 0..24 {
        scheduler.advance(STEP);
        let states: Vec<String> = cascade
            .elements()
            .iter()
            .map(|element| format!("{:?}", element.state()))
            .collect();
        println!(
            "{:>4}ms  solo: {:?}  cascade: [{}]",
            (frame + 1) * 100,
            solo.element().state(),
            states.join(", ")
        );
    }

    cascade.end();
    solo.set_lifted(false, true);
    while scheduler.advance(STEP) {}
    println!("showcase done");
    Ok(())
}
