//! A leveled, compiled-out-in-release build trace.
//!
//! `None < Default < Success < Result < Verbose`, gated behind
//! `#[cfg(debug_assertions)]` so it costs nothing in a release build.
//! Used to report engine-internal progress: new DFA states discovered,
//! partition-refinement passes, conflicts found.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BuildLog {
    None,
    Default,
    Success,
    Result,
    Verbose,
}

impl BuildLog {
    fn order(self) -> u8 {
        match self {
            BuildLog::None => 0,
            BuildLog::Default => 1,
            BuildLog::Success => 2,
            BuildLog::Result => 3,
            BuildLog::Verbose => 4,
        }
    }

    /// Emit `message()` if `self`'s level is at least as verbose as `level`.
    /// A no-op call in release builds (the closure is never invoked).
    #[allow(unused_variables)]
    pub fn trace(self, level: BuildLog, message: impl FnOnce() -> String) {
        #[cfg(debug_assertions)]
        {
            if self.order() >= level.order() {
                println!("[langforge] {}", message());
            }
        }
    }
}

impl Default for BuildLog {
    fn default() -> Self {
        BuildLog::None
    }
}

impl fmt::Display for BuildLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
