//! Theme and Colors
//!
//! Counsel's palette - restrained, readable colors for long reading
//! sessions. Statute citations get a warm accent so they stand out
//! from answer prose without shouting.

use ratatui::style::Color;

// ============================================================================
// Transcript Colors
// ============================================================================

/// Counsel's signature blue (assistant prefix, title banner)
pub const COUNSEL_BLUE: Color = Color::Rgb(120, 170, 255);

/// User input green
pub const USER_GREEN: Color = Color::Rgb(130, 220, 130);

/// System/dim text (hints, status bar, page labels)
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

// ============================================================================
// Citation Colors
// ============================================================================

/// Act/Section labels in the source disclosure
pub const SOURCE_GOLD: Color = Color::Rgb(230, 190, 100);
