//! Stepgen system facade for multi-channel configuration.
//!
//! Owns every generator of a configuration and ticks them against one
//! shared wall clock.

use heapless::{FnvIndexMap, String};

use crate::config::{validate_config, StepTiming, SystemConfig, MAX_STEPGENS};
use crate::error::{ConfigError, Error, Result};
use crate::segment::SegmentCommand;
use crate::stepgen::{Stepgen, StepgenOutputs, StepgenStatus, TickInputs};

/// One channel of the system.
#[derive(Debug, Clone)]
pub struct Channel {
    stepgen: Stepgen,
    timing: StepTiming,
    enabled: bool,
    reset_pending: bool,
}

impl Channel {
    /// Wrap a generator with its timing. The channel starts disabled.
    pub fn new(stepgen: Stepgen, timing: StepTiming) -> Self {
        Self {
            stepgen,
            timing,
            enabled: false,
            reset_pending: false,
        }
    }

    /// Underlying generator.
    #[inline]
    pub fn stepgen(&self) -> &Stepgen {
        &self.stepgen
    }

    /// Current timing.
    #[inline]
    pub fn timing(&self) -> StepTiming {
        self.timing
    }

    /// `true` if the channel is enabled.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current outputs.
    #[inline]
    pub fn outputs(&self) -> StepgenOutputs {
        self.stepgen.outputs()
    }

    /// Status readback.
    #[inline]
    pub fn status(&self) -> StepgenStatus {
        self.stepgen.status()
    }

    fn tick(&mut self, now: u64) -> StepgenOutputs {
        let outputs = self.stepgen.tick(&TickInputs {
            enable: self.enabled,
            reset: self.reset_pending,
            timing: self.timing,
            now,
        });
        self.reset_pending = false;
        outputs
    }
}

/// A set of named generators sharing one wall clock.
///
/// # Example
///
/// ```rust,ignore
/// use stepgen_dds::motor::StepgenSystem;
///
/// let config = stepgen_dds::load_config("stepgen.toml")?;
/// let mut system = StepgenSystem::from_config(&config)?;
///
/// system.set_enabled("x", true)?;
/// system.stage("x", command)?;
///
/// loop {
///     system.tick();
///     let out = system.channel("x").unwrap().outputs();
/// }
/// ```
#[derive(Debug, Clone)]
pub struct StepgenSystem {
    clock_frequency: u32,
    wall_clock: u64,
    channels: FnvIndexMap<String<32>, Channel, MAX_STEPGENS>,
}

impl StepgenSystem {
    /// Create an empty system.
    pub fn new(clock_frequency: u32) -> Self {
        Self {
            clock_frequency,
            wall_clock: 0,
            channels: FnvIndexMap::new(),
        }
    }

    /// Create a system with one channel per configured stepgen.
    ///
    /// # Errors
    ///
    /// Returns an error if the clock frequency is zero or a timing does
    /// not fit a cycle counter.
    pub fn from_config(config: &SystemConfig) -> Result<Self> {
        validate_config(config)?;

        let mut system = Self::new(config.clock_frequency);
        for (name, stepgen) in config.stepgens.iter() {
            let timing = stepgen.timing.to_cycles(config.clock_frequency)?;
            system.add_channel(name.as_str(), Stepgen::from_config(stepgen), timing)?;
        }
        Ok(system)
    }

    /// Add a named channel.
    ///
    /// # Errors
    ///
    /// - `ConfigError::DuplicateStepgenName` if the name is taken
    /// - `ConfigError::TooManyStepgens` if the system is full
    pub fn add_channel(&mut self, name: &str, stepgen: Stepgen, timing: StepTiming) -> Result<()> {
        let key: String<32> = String::try_from(name).map_err(|_| {
            let mut msg = String::new();
            let _ = msg.push_str("stepgen name too long");
            Error::Config(ConfigError::ParseError(msg))
        })?;

        if self.channels.contains_key(&key) {
            return Err(Error::Config(ConfigError::DuplicateStepgenName(key)));
        }

        self.channels
            .insert(key, Channel::new(stepgen, timing))
            .map_err(|_| Error::Config(ConfigError::TooManyStepgens(MAX_STEPGENS + 1)))?;
        Ok(())
    }

    /// Tick rate in hertz.
    #[inline]
    pub fn clock_frequency(&self) -> u32 {
        self.clock_frequency
    }

    /// Wall-clock value the next tick will sample.
    #[inline]
    pub fn now(&self) -> u64 {
        self.wall_clock
    }

    /// Number of channels.
    #[inline]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// `true` if the system has no channels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Check if a channel exists.
    pub fn has_stepgen(&self, name: &str) -> bool {
        self.channel(name).is_some()
    }

    /// List all channel names.
    pub fn stepgen_names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(|s| s.as_str())
    }

    /// Get a channel by name.
    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    fn channel_mut(&mut self, name: &str) -> Result<&mut Channel> {
        self.channels
            .iter_mut()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
            .ok_or_else(|| {
                Error::Config(ConfigError::StepgenNotFound(
                    String::try_from(name).unwrap_or_default(),
                ))
            })
    }

    /// Enable or disable a channel.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<()> {
        self.channel_mut(name)?.enabled = enabled;
        Ok(())
    }

    /// Replace a channel's timing.
    pub fn set_timing(&mut self, name: &str, timing: StepTiming) -> Result<()> {
        self.channel_mut(name)?.timing = timing;
        Ok(())
    }

    /// Reset a channel on the next tick.
    pub fn request_reset(&mut self, name: &str) -> Result<()> {
        self.channel_mut(name)?.reset_pending = true;
        Ok(())
    }

    /// Stage a segment command on a channel.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::StepgenNotFound` for an unknown channel, or the
    /// staging error of the channel's scheduler.
    pub fn stage(&mut self, name: &str, command: SegmentCommand) -> Result<()> {
        self.channel_mut(name)?.stepgen.stage_segment(command)?;
        Ok(())
    }

    /// Advance every channel by one tick at the current wall clock, then
    /// advance the clock.
    pub fn tick(&mut self) {
        let now = self.wall_clock;
        for (_, channel) in self.channels.iter_mut() {
            channel.tick(now);
        }
        self.wall_clock = self.wall_clock.wrapping_add(1);
    }

    /// Outputs of every channel, in configuration order.
    pub fn outputs(&self) -> impl Iterator<Item = (&str, StepgenOutputs)> {
        self.channels.iter().map(|(k, v)| (k.as_str(), v.outputs()))
    }
}
