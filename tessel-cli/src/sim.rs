//! An in-memory canvas with a replenishing charge counter.
//!
//! Charges regenerate one at a time on a fixed period, measured on a shared
//! [`VirtualClock`], up to a maximum. Each confirmed pixel spends one charge.

use std::collections::HashMap;
use std::time::Duration;

use tessel_core::{Action, ColorId, ControlKind, ControlSurface, MissingControl, Point};
use tessel_core::VirtualClock;

/// Simulated paint UI.
pub struct SimulatedCanvas {
    clock: VirtualClock,
    charges: u32,
    max_charges: u32,
    regen: Duration,
    /// Virtual time up to which regeneration has been credited.
    credited_until: Duration,
    paint_mode: bool,
    target: Option<Point>,
    color: Option<ColorId>,
    painted: HashMap<Point, ColorId>,
    /// Colors whose controls do not exist on this canvas.
    missing_colors: Vec<ColorId>,
    refill_requests: u64,
    wasted_confirms: u64,
}

impl SimulatedCanvas {
    /// A canvas starting with `charges` charges that regain one per `regen`,
    /// never exceeding `max_charges`.
    pub fn new(clock: VirtualClock, charges: u32, max_charges: u32, regen: Duration) -> Self {
        let max_charges = max_charges.max(1);
        Self {
            credited_until: clock.elapsed(),
            clock,
            charges: charges.min(max_charges),
            max_charges,
            regen: regen.max(Duration::from_millis(1)),
            paint_mode: false,
            target: None,
            color: None,
            painted: HashMap::new(),
            missing_colors: Vec::new(),
            refill_requests: 0,
            wasted_confirms: 0,
        }
    }

    /// Pretend the color control for `color` is absent.
    pub fn without_color(mut self, color: ColorId) -> Self {
        self.missing_colors.push(color);
        self
    }

    /// Pixels painted so far.
    pub const fn painted(&self) -> &HashMap<Point, ColorId> {
        &self.painted
    }

    /// Refill requests received.
    pub const fn refill_requests(&self) -> u64 {
        self.refill_requests
    }

    /// Confirms issued with no charge, target, or color.
    pub const fn wasted_confirms(&self) -> u64 {
        self.wasted_confirms
    }

    fn regenerate(&mut self) {
        let now = self.clock.elapsed();
        if self.charges >= self.max_charges {
            self.credited_until = now;
            return;
        }
        let since = now.saturating_sub(self.credited_until);
        let gained = since.as_nanos() / self.regen.as_nanos();
        if gained == 0 {
            return;
        }
        let gained = u32::try_from(gained).unwrap_or(u32::MAX);
        self.charges = self.charges.saturating_add(gained).min(self.max_charges);
        self.credited_until += self.regen * gained;
        if self.charges == self.max_charges {
            self.credited_until = now;
        }
    }
}

impl ControlSurface for SimulatedCanvas {
    fn query_capacity(&mut self) -> u32 {
        self.regenerate();
        self.charges
    }

    fn trigger_refill(&mut self) {
        self.refill_requests += 1;
    }

    fn engage(&mut self, action: Action) -> Result<(), MissingControl> {
        match action {
            Action::EnterPaintMode => self.paint_mode = true,
            Action::TargetCoordinate { absolute, .. } => {
                if self.paint_mode {
                    self.target = Some(absolute);
                }
            }
            Action::SelectColor(color) => {
                if self.missing_colors.contains(&color) {
                    return Err(MissingControl::new(ControlKind::ColorButton));
                }
                self.color = Some(color);
            }
            Action::Confirm => {
                self.regenerate();
                match (self.target.take(), self.color.take()) {
                    (Some(at), Some(color)) if self.charges > 0 => {
                        self.charges -= 1;
                        let _ = self.painted.insert(at, color);
                    }
                    _ => self.wasted_confirms += 1,
                }
            }
        }
        Ok(())
    }
}
