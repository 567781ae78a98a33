use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::config::ClockConfig;
use crate::error::Result;
use crate::geometry::Geometry;
use crate::scene::{face_scene, hands_scene};
use crate::surface::{Mount, Surface};
use crate::time::{SystemClock, TickSchedule, TimeSource};

/// Fluent clock builder. Options only take effect when [`initialize`](Self::initialize) runs.
///
/// ```no_run
/// use clockface::{ClockRenderer, Mount, Result};
///
/// fn start<M: Mount>(mount: M) -> Result<()> {
///     let _clock = ClockRenderer::new(240.0)
///         .with_minute_marks()
///         .with_roman_numerals()
///         .with_label("Quartz", None)
///         .initialize(mount)?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClockRenderer {
    config: ClockConfig,
    tick_interval: Duration,
}

impl ClockRenderer {
    pub fn new(size: f64) -> Self {
        Self::from_config(ClockConfig::new(size))
    }

    pub fn from_config(config: ClockConfig) -> Self {
        Self {
            config,
            tick_interval: TickSchedule::DEFAULT_INTERVAL,
        }
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn with_minute_marks(mut self) -> Self {
        self.config.minute_marks = true;
        self
    }

    pub fn with_numbers(mut self) -> Self {
        self.config.numbers = true;
        self
    }

    /// Sets an italic label drawn above the center; `custom_font` only affects the label.
    pub fn with_label(mut self, text: impl Into<String>, custom_font: Option<&str>) -> Self {
        self.config.label = Some(text.into());
        self.config.label_font = custom_font.map(str::to_owned);
        self
    }

    /// Roman numerals in a serif family. Enables numbers as well.
    pub fn with_roman_numerals(mut self) -> Self {
        self.config.numbers = true;
        self.config.roman = true;
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn initialize<M: Mount>(self, mount: M) -> Result<RunningClock<M, SystemClock>> {
        self.initialize_with(mount, SystemClock)
    }

    /// Attaches the live surface, pre-renders the face, draws the first tick and
    /// arms the timer for the next one.
    pub fn initialize_with<M: Mount, T: TimeSource>(
        self,
        mut mount: M,
        time_source: T,
    ) -> Result<RunningClock<M, T>> {
        let geometry = Geometry::new(&self.config);
        let extent = geometry.surface_extent();
        let live = mount.attach(extent, extent);

        let mut buffer = live.duplicate();
        buffer.render(&face_scene(&self.config, &geometry));
        debug!(
            "clock initialized: {extent}px, minute marks: {}, numbers: {}, roman: {}",
            self.config.minute_marks,
            self.config.numbers_enabled(),
            self.config.roman
        );

        let mut clock = RunningClock {
            config: self.config,
            geometry,
            buffer,
            live,
            mount,
            time_source,
            schedule: TickSchedule::new(self.tick_interval),
        };
        clock.tick()?;
        clock.schedule.arm(Instant::now());
        Ok(clock)
    }
}

/// Render state of an initialized clock.
#[derive(Debug)]
pub struct RunningClock<M: Mount, T: TimeSource = SystemClock> {
    config: ClockConfig,
    geometry: Geometry,
    buffer: M::Surface,
    live: M::Surface,
    mount: M,
    time_source: T,
    schedule: TickSchedule,
}

impl<M: Mount, T: TimeSource> RunningClock<M, T> {
    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// The pre-rendered face.
    pub fn buffer(&self) -> &M::Surface {
        &self.buffer
    }

    /// The surface shown through the mount.
    pub fn live(&self) -> &M::Surface {
        &self.live
    }

    pub fn mount(&self) -> &M {
        &self.mount
    }

    pub fn mount_mut(&mut self) -> &mut M {
        &mut self.mount
    }

    /// Repaints the live surface for the current time and presents it.
    pub fn tick(&mut self) -> Result<()> {
        let now = self.time_source.now();
        trace!(
            "tick {:02}:{:02}:{:02}.{:03}",
            now.hours,
            now.minutes,
            now.seconds,
            now.millis
        );
        self.live.clear();
        self.live.draw_image(&self.buffer);
        self.live
            .render(&hands_scene(&self.config, &self.geometry, now));
        self.mount.present(&self.live)
    }

    /// Ticks if the timer has fired by `now`, then re-arms it from the moment the
    /// tick finished. Returns whether a tick ran.
    pub fn poll(&mut self, now: Instant) -> Result<bool> {
        if !self.schedule.take_due(now) {
            return Ok(false);
        }
        let result = self.tick();
        self.schedule.arm(Instant::now());
        result.map(|()| true)
    }

    /// When the next tick is due, or `None` once stopped.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.schedule.deadline()
    }

    pub fn is_running(&self) -> bool {
        !self.schedule.is_cancelled()
    }

    /// Cancels the repeating tick. The last frame stays on the surfaces.
    pub fn stop(&mut self) {
        if self.is_running() {
            debug!("clock stopped");
        }
        self.schedule.cancel();
    }

    /// Stops the clock and hands the mount back.
    pub fn into_mount(mut self) -> M {
        self.stop();
        self.mount
    }
}
