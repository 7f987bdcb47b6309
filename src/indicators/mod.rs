// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free rolling-window indicators over an adjusted-close
// series.  Every function returns a series that is date-aligned with its
// input: same length, `None` until the window's minimum period is satisfied.
// Callers never have to re-index the output against the input bars.

pub mod bollinger;
pub mod returns;
pub mod rsi;
pub mod sma;
