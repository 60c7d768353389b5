//! The ambient state of one parse call, made explicit.
//!
//! Privilege level, source label and the name of the directive being
//! processed are ambient to a parse and must nest correctly across
//! recursive file inclusion. They live on a [`ParseContext`] value owned
//! by the parse session; nesting goes through
//! [`ParseContext::with_frame`], which restores the outer frame on every
//! exit path.

use std::mem;

/// Ambient state of the source currently being parsed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParseContext {
    /// Whether directives from the current source run with elevated
    /// privilege.
    pub privileged: bool,
    /// Label of the current source, used in diagnostics and provenance.
    pub source: String,
    /// Name of the directive currently being processed, if any.
    pub current_directive: Option<String>,
}

/// One saved frame of [`ParseContext`] state.
#[derive(Debug, Clone)]
pub struct ContextFrame {
    privileged: bool,
    source: String,
    current_directive: Option<String>,
}

impl ParseContext {
    /// Context for the command-line source.
    pub fn command_line(privileged: bool) -> Self {
        Self {
            privileged,
            source: "command line".to_owned(),
            current_directive: None,
        }
    }

    /// Swap in privilege and source label for a nested source, returning
    /// the saved outer frame. Every `push` must be paired with exactly one
    /// [`ParseContext::pop`]; prefer [`ParseContext::with_frame`] where the
    /// nested work fits in a closure.
    #[must_use = "the returned frame must be handed back to pop()"]
    pub fn push(&mut self, privileged: bool, source: impl Into<String>) -> ContextFrame {
        let saved = ContextFrame {
            privileged: self.privileged,
            source: mem::replace(&mut self.source, source.into()),
            current_directive: self.current_directive.take(),
        };
        self.privileged = privileged;
        saved
    }

    /// Restore a frame saved by [`ParseContext::push`].
    pub fn pop(&mut self, frame: ContextFrame) {
        self.privileged = frame.privileged;
        self.source = frame.source;
        self.current_directive = frame.current_directive;
    }

    /// Run `f` with privilege and source label swapped for a nested
    /// source, restoring the outer frame afterwards. The push/pop pair
    /// balances across arbitrary recursion depth because the restore is
    /// unconditional on the return path, error or not.
    pub fn with_frame<T>(
        &mut self,
        privileged: bool,
        source: impl Into<String>,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let frame = self.push(privileged, source);
        let out = f(self);
        self.pop(frame);
        out
    }
}
