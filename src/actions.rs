//! Turning gesture decisions into desktop actions.
//!
//! [`ActionMapper`] converts accepted decisions into [`Action`] values:
//! normalized pointer positions become clamped screen pixels, scrolls get
//! their step count and drag gestures are paired. Executing an action is
//! the job of an [`ActionSink`]; OS input injection lives outside this
//! crate behind that trait.

use crate::{
    config::MouseConfig,
    filters::{create_filter, PositionFilter},
    gesture::{GestureDecision, GestureKind},
    utils::clamp_to_axis,
    Error, Result,
};
use log::{debug, info};
use std::fmt;

/// One desktop input action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Absolute pointer move in screen pixels
    MoveTo { x: i32, y: i32 },
    LeftClick,
    RightClick,
    DoubleClick,
    /// Scroll by this many steps, positive is up
    Scroll(i32),
    DragStart,
    DragEnd,
    ZoomIn,
    ZoomOut,
    NextSlide,
    PrevSlide,
    Screenshot,
}

impl Action {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MoveTo { .. } => "move_to",
            Self::LeftClick => "left_click",
            Self::RightClick => "right_click",
            Self::DoubleClick => "double_click",
            Self::Scroll(_) => "scroll",
            Self::DragStart => "drag_start",
            Self::DragEnd => "drag_end",
            Self::ZoomIn => "zoom_in",
            Self::ZoomOut => "zoom_out",
            Self::NextSlide => "next_slide",
            Self::PrevSlide => "prev_slide",
            Self::Screenshot => "screenshot",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoveTo { x, y } => write!(f, "move_to({x}, {y})"),
            Self::Scroll(steps) => write!(f, "scroll({steps})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Executes actions against some input backend
pub trait ActionSink: Send {
    /// Perform one action
    ///
    /// # Errors
    ///
    /// Returns `ActionError` if the backend rejects the action
    fn execute(&mut self, action: &Action) -> Result<()>;

    /// Release any held buttons
    ///
    /// # Errors
    ///
    /// Returns `ActionError` if the backend rejects the release
    fn release_all(&mut self) -> Result<()> {
        Ok(())
    }

    /// Get sink name
    fn name(&self) -> &str;
}

/// Sink that keeps every executed action in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    actions: Vec<Action>,
    reject: bool,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every `execute` fails
    #[must_use]
    pub fn rejecting() -> Self {
        Self {
            actions: Vec::new(),
            reject: true,
        }
    }

    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn take(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.actions)
    }
}

impl ActionSink for RecordingSink {
    fn execute(&mut self, action: &Action) -> Result<()> {
        if self.reject {
            return Err(Error::ActionError(format!("Rejected {action}")));
        }
        self.actions.push(*action);
        Ok(())
    }

    fn name(&self) -> &str {
        "RecordingSink"
    }
}

/// Sink that only reports actions through the log
#[derive(Debug, Default)]
pub struct LogSink;

impl ActionSink for LogSink {
    fn execute(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::MoveTo { .. } => debug!("Action: {action}"),
            _ => info!("Action: {action}"),
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "LogSink"
    }
}

/// Maps accepted gesture decisions to actions
pub struct ActionMapper {
    screen_width: u32,
    screen_height: u32,
    movement_speed: f64,
    scroll_speed: i32,
    filter: Option<Box<dyn PositionFilter>>,
    last_position: Option<(f64, f64)>,
    dragging: bool,
}

impl ActionMapper {
    /// # Errors
    ///
    /// Returns `FilterError` if smoothing is on and the filter cannot be built
    pub fn new(config: &MouseConfig) -> Result<Self> {
        let filter = if config.smoothing {
            Some(create_filter(&config.filter, config.smoothing_factor)?)
        } else {
            None
        };
        if let Some(filter) = &filter {
            info!("Pointer smoothing: {}", filter.name());
        }

        Ok(Self {
            screen_width: config.screen_width,
            screen_height: config.screen_height,
            movement_speed: config.movement_speed,
            scroll_speed: config.scroll_speed,
            filter,
            last_position: None,
            dragging: false,
        })
    }

    /// Action for one decision; `None` when nothing should happen.
    ///
    /// NONE and debounce-suppressed decisions never produce an action.
    pub fn map(&mut self, decision: &GestureDecision) -> Option<Action> {
        if !decision.is_actionable() {
            return None;
        }

        match decision.kind {
            GestureKind::MouseMove => decision.position.map(|(x, y)| self.move_to(x, y)),
            GestureKind::LeftClick => Some(Action::LeftClick),
            GestureKind::RightClick => Some(Action::RightClick),
            GestureKind::DoubleClick => Some(Action::DoubleClick),
            GestureKind::ScrollUp => Some(Action::Scroll(self.scroll_speed)),
            GestureKind::ScrollDown => Some(Action::Scroll(-self.scroll_speed)),
            GestureKind::DragStart if !self.dragging => {
                self.dragging = true;
                Some(Action::DragStart)
            }
            GestureKind::DragEnd if self.dragging => {
                self.dragging = false;
                Some(Action::DragEnd)
            }
            GestureKind::ZoomIn => Some(Action::ZoomIn),
            GestureKind::ZoomOut => Some(Action::ZoomOut),
            GestureKind::NextSlide => Some(Action::NextSlide),
            GestureKind::PrevSlide => Some(Action::PrevSlide),
            GestureKind::Screenshot => Some(Action::Screenshot),
            _ => None,
        }
    }

    fn move_to(&mut self, nx: f64, ny: f64) -> Action {
        let mut target = (nx * f64::from(self.screen_width), ny * f64::from(self.screen_height));

        if let Some((lx, ly)) = self.last_position {
            if (self.movement_speed - 1.0).abs() > f64::EPSILON {
                target = (
                    lx + (target.0 - lx) * self.movement_speed,
                    ly + (target.1 - ly) * self.movement_speed,
                );
            }
        }
        if let Some(filter) = &mut self.filter {
            target = filter.apply(target.0, target.1);
        }

        let x = clamp_to_axis(target.0, self.screen_width);
        let y = clamp_to_axis(target.1, self.screen_height);

        self.last_position = Some((f64::from(x), f64::from(y)));
        Action::MoveTo { x, y }
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Forget pointer history and drag state
    pub fn reset(&mut self) {
        self.last_position = None;
        self.dragging = false;
        if let Some(filter) = &mut self.filter {
            filter.reset();
        }
    }
}
