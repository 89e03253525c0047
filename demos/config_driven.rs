//! Example: Configuration-driven step generation.
//!
//! This example demonstrates how to:
//! - Load stepgen channel configuration from TOML
//! - Convert physical rates into segment register values
//! - Run a multi-channel system tick by tick
//! - Mirror one channel onto STEP/DIR pins
//!
//! Run with: `cargo run --example config_driven --features std`

use stepgen_dds::{
    config::{parse_config, StepsPerSec, StepsPerSecSquared},
    motor::{StepgenBuilder, StepgenSystem},
    segment::{Segment, SegmentCommand},
    Result,
};

/// Output pin that counts its rising edges.
struct CountingPin {
    level: bool,
    rising: u32,
}

impl CountingPin {
    fn new() -> Self {
        Self {
            level: false,
            rising: 0,
        }
    }
}

impl embedded_hal::digital::ErrorType for CountingPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for CountingPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        self.level = false;
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        if !self.level {
            self.rising += 1;
        }
        self.level = true;
        Ok(())
    }
}

const CONFIG: &str = r#"
clock_frequency = 1_000_000

[stepgens.x]
pick_off = { position = 28, velocity = 28, acceleration = 28 }

[stepgens.x.timing]
steplen_ns = 16000
dir_hold_ns = 16000
dir_setup_ns = 32000

[stepgens.y]
pick_off = { position = 28, velocity = 28, acceleration = 28 }
soft_stop = true
invert_direction = true
"#;

fn main() -> Result<()> {
    println!("=== Configuration-Driven Step Generation ===\n");

    let config = parse_config(CONFIG)?;
    stepgen_dds::validate_config(&config)?;
    println!(
        "Loaded {} stepgen(s) at {} Hz",
        config.stepgens.len(),
        config.clock_frequency
    );

    let clock = config.clock_frequency;
    let mut system = StepgenSystem::from_config(&config)?;

    // Each channel ramps to its rate, then a second segment reverses it
    for (name, rate) in [("x", 7_812.5), ("y", -3_906.25)] {
        let pick_off = system
            .channel(name)
            .map(|c| c.stepgen().layout().pick_off())
            .unwrap_or_default();
        let accel = StepsPerSecSquared(60_000.0).to_register(pick_off, clock);
        let command = SegmentCommand {
            first: Segment::new(StepsPerSec(rate).to_register(pick_off, clock), accel),
            second: Segment::new(StepsPerSec(-rate).to_register(pick_off, clock), accel),
            apply_time: 0,
            first_duration: 20_000,
        };
        system.stage(name, command)?;
        system.set_enabled(name, true)?;
        println!("Staged {}: {} steps/s, then {} steps/s", name, rate, -rate);
    }

    for _ in 0..40_000 {
        system.tick();
    }

    println!("\n=== After {} ticks ===", system.now());
    for name in ["x", "y"] {
        if let Some(channel) = system.channel(name) {
            let status = channel.status();
            println!(
                "{}: steps={} velocity={} dir={:?}",
                name, status.steps, status.velocity, status.outputs.dir
            );
        }
    }

    // The same configuration drives a single axis bound to pins
    println!("\n=== Pin-Driven Axis ===");
    let mut axis = StepgenBuilder::new()
        .from_config(&config, "x")?
        .step_pin(CountingPin::new())
        .dir_pin(CountingPin::new())
        .build()?;

    let pick_off = axis.stepgen().layout().pick_off();
    axis.stage_segment(SegmentCommand::single(
        Segment::new(StepsPerSec(7_812.5).to_register(pick_off, clock), 0),
        0,
    ))?;
    axis.set_enabled(true);

    for now in 0..10_000 {
        axis.tick(now)?;
    }

    let steps = axis.status().steps;
    let (step_pin, _dir_pin) = axis.release();
    println!("STEP rising edges: {} (position {} steps)", step_pin.rising, steps);

    println!("\n=== Example Complete ===");
    Ok(())
}
