//! Perpetual lift/drop wave over a row of elements
//!
//! Runs the engine on a stepped timeline and draws each element's
//! elevation as a bar, then tears the session down mid-wave.

use std::time::Duration;

use anyhow::Result;
use lucite_animation::{ChoreoSession, Choreography, LiftStyle, TransitionScheduler};

const STEP: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let scheduler = TransitionScheduler::new();
    let session = ChoreoSession::uniform(
        scheduler.handle(),
        4,
        LiftStyle::default().duration(Duration::from_millis(300)),
    );

    session.begin(
        Choreography::wave(Duration::from_millis(200)).stagger_each(Duration::from_millis(150)),
    )?;

    println!("wave running (each column is one element's elevation):");
    for frame in 0..30 {
        scheduler.advance(STEP);
        let row: Vec<String> = session
            .elements()
            .iter()
            .map(|element| {
                let elevation = element.params().elevation;
                format!("{:<10}", "#".repeat(elevation.round() as usize))
            })
            .collect();
        println!("{:>4}ms  {}", (frame + 1) * 100, row.join(" "));
    }

    session.end();
    tracing::info!("session ended; draining the timeline stays silent");

    // Everything outstanding was cancelled or silenced; in-flight visuals
    // settle and the timeline goes quiet
    let mut active = true;
    while active {
        active = scheduler.advance(STEP);
    }
    println!("timeline idle");
    Ok(())
}
