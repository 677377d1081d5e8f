//! Signal lines leaving the board
//!
//! Outward-facing pins (serial data out, monitored clock) are [`OutputLine`]s
//! with handlers registered by the host. CPU interrupt pins are latched in
//! [`InterruptLines`] and forwarded to the CPU by the machine loop.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Level of an interrupt input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineState {
    /// Line released
    #[default]
    Clear,
    /// Line pulled active
    Assert,
}

impl LineState {
    /// `Assert` for true, `Clear` for false
    pub fn from_bool(active: bool) -> Self {
        if active {
            LineState::Assert
        } else {
            LineState::Clear
        }
    }

    /// Whether the line is asserted
    pub fn is_asserted(self) -> bool {
        self == LineState::Assert
    }
}

type LineHandler = Box<dyn FnMut(bool)>;

/// A named single-bit output with synchronous observers.
///
/// Every `set` invokes all handlers in registration order before returning,
/// whether or not the level changed.
pub struct OutputLine {
    name: &'static str,
    state: bool,
    handlers: Vec<LineHandler>,
}

impl OutputLine {
    /// Create a low line with no handlers
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: false,
            handlers: Vec::new(),
        }
    }

    /// Register a handler
    pub fn connect<F>(&mut self, handler: F)
    where
        F: FnMut(bool) + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    /// Drive the line
    pub fn set(&mut self, state: bool) {
        self.state = state;
        for handler in &mut self.handlers {
            handler(state);
        }
    }

    /// Last driven level
    pub fn state(&self) -> bool {
        self.state
    }
}

impl fmt::Debug for OutputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputLine")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// Interrupt inputs of the sound CPU as driven by the board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterruptLines {
    nmi: LineState,
    irq: LineState,
    dirty: bool,
}

impl InterruptLines {
    /// Drive the non-maskable interrupt
    pub fn set_nmi(&mut self, state: LineState) {
        if self.nmi != state {
            self.dirty = true;
        }
        self.nmi = state;
    }

    /// Drive the maskable interrupt
    pub fn set_irq(&mut self, state: LineState) {
        if self.irq != state {
            self.dirty = true;
        }
        self.irq = state;
    }

    /// Current NMI level
    pub fn nmi(&self) -> LineState {
        self.nmi
    }

    /// Current IRQ level
    pub fn irq(&self) -> LineState {
        self.irq
    }

    /// Levels changed since the last call, if any
    pub fn take_changes(&mut self) -> Option<(LineState, LineState)> {
        if self.dirty {
            self.dirty = false;
            Some((self.nmi, self.irq))
        } else {
            None
        }
    }

    /// Release both lines
    pub fn reset(&mut self) {
        self.set_nmi(LineState::Clear);
        self.set_irq(LineState::Clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_output_line_calls_handlers_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut line = OutputLine::new("txd");

        let first = Rc::clone(&seen);
        line.connect(move |state| first.borrow_mut().push(("a", state)));
        let second = Rc::clone(&seen);
        line.connect(move |state| second.borrow_mut().push(("b", state)));

        line.set(true);
        line.set(true);

        assert!(line.state());
        assert_eq!(
            *seen.borrow(),
            vec![("a", true), ("b", true), ("a", true), ("b", true)]
        );
    }

    #[test]
    fn test_interrupt_lines_report_only_changes() {
        let mut lines = InterruptLines::default();
        assert_eq!(lines.take_changes(), None);

        lines.set_nmi(LineState::Assert);
        assert_eq!(
            lines.take_changes(),
            Some((LineState::Assert, LineState::Clear))
        );

        lines.set_nmi(LineState::Assert);
        assert_eq!(lines.take_changes(), None);

        lines.reset();
        assert_eq!(lines.take_changes(), Some((LineState::Clear, LineState::Clear)));
    }
}
