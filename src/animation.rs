//! Decorative bouncing ball, driven one frame at a time.
//!
//! The loop is a two-state machine. `play` moves it to running and asks the
//! scheduler for a frame, `pause` moves it back and cancels that frame, and
//! each delivered frame advances the ball and asks for the next one. Frames
//! that arrive after a pause, or that belong to an earlier run, are ignored.

use egui::{Pos2, Vec2};

use crate::config::BounceConfig;

/// Identifies one requested animation frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

/// Source of per-frame callbacks.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameId;
    fn cancel_frame(&mut self, frame: FrameId);
}

/// Schedules frames by asking egui for another repaint.
///
/// egui has no way to revoke a repaint request, so cancelling only relies on
/// the animation dropping frames it no longer expects.
pub struct RepaintScheduler {
    ctx: egui::Context,
    next_id: u64,
}

impl RepaintScheduler {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx, next_id: 0 }
    }
}

impl FrameScheduler for RepaintScheduler {
    fn request_frame(&mut self) -> FrameId {
        self.next_id += 1;
        self.ctx.request_repaint();
        FrameId(self.next_id)
    }

    fn cancel_frame(&mut self, _frame: FrameId) {}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LoopState {
    Stopped,
    Running {
        pending: FrameId,
        /// Time of the previous frame, `None` until the first frame of a run.
        last_frame: Option<f64>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ball {
    pub position: Pos2,
    pub velocity: Vec2,
}

#[derive(Debug, Clone)]
pub struct BounceAnimation {
    config: BounceConfig,
    ball: Ball,
    state: LoopState,
}

impl BounceAnimation {
    pub fn new(config: BounceConfig) -> Self {
        let ball = Ball {
            position: Pos2::new(config.radius, config.radius),
            velocity: Vec2::from(config.initial_velocity),
        };
        Self {
            config,
            ball,
            state: LoopState::Stopped,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running { .. })
    }

    pub fn ball(&self) -> Ball {
        self.ball
    }

    pub fn radius(&self) -> f32 {
        self.config.radius
    }

    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.config.width, self.config.height)
    }

    /// The frame this animation is waiting for, if running.
    pub fn pending_frame(&self) -> Option<FrameId> {
        match self.state {
            LoopState::Running { pending, .. } => Some(pending),
            LoopState::Stopped => None,
        }
    }

    pub fn play(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.is_running() {
            return;
        }
        self.state = LoopState::Running {
            pending: scheduler.request_frame(),
            last_frame: None,
        };
        log::debug!("Bounce animation started");
    }

    pub fn pause(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let LoopState::Running { pending, .. } = self.state {
            scheduler.cancel_frame(pending);
            self.state = LoopState::Stopped;
            log::debug!("Bounce animation paused");
        }
    }

    /// Handle a delivered frame at time `now` (seconds).
    ///
    /// Returns true if the ball moved.
    pub fn on_frame(&mut self, frame: FrameId, now: f64, scheduler: &mut dyn FrameScheduler) -> bool {
        let LoopState::Running { pending, last_frame } = self.state else {
            return false;
        };
        if pending != frame {
            return false;
        }

        let elapsed = last_frame.map_or(0.0, |last| (now - last).max(0.0) as f32);
        self.step(elapsed.min(self.config.max_step_secs));

        self.state = LoopState::Running {
            pending: scheduler.request_frame(),
            last_frame: Some(now),
        };
        true
    }

    /// Advance the ball by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        let Ball {
            mut position,
            mut velocity,
        } = self.ball;
        let r = self.config.radius;
        let max_x = self.config.width - r;
        let max_y = self.config.height - r;
        let restitution = self.config.restitution;

        velocity.y += self.config.gravity * dt;
        position += velocity * dt;

        if position.x < r {
            position.x = r + (r - position.x);
            velocity.x = -velocity.x * restitution;
        } else if position.x > max_x {
            position.x = max_x - (position.x - max_x);
            velocity.x = -velocity.x * restitution;
        }

        if position.y > max_y {
            position.y = max_y - (position.y - max_y);
            velocity.y = -velocity.y * restitution;
        } else if position.y < r {
            position.y = r + (r - position.y);
            velocity.y = -velocity.y * restitution;
        }

        // Reflection can overshoot on very large steps
        position.x = position.x.clamp(r, max_x);
        position.y = position.y.clamp(r, max_y);

        self.ball = Ball { position, velocity };
    }
}
