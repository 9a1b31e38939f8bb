//! Fixed selectors, glyphs, colors, and timings for the page features.

// ── Markup contract ─────────────────────────────────────────────

pub const THEME_TOGGLE_ID: &str = "themeToggle";
pub const THEME_ICON_SELECTOR: &str = ".theme-icon";
pub const NAV_LINK_SELECTOR: &str = ".nav-item";
pub const SECTION_SELECTOR: &str = ".content-section";
pub const CODE_BLOCK_SELECTOR: &str = ".code-block";
pub const CODE_SELECTOR: &str = "code";
pub const SIDEBAR_NAV_SELECTOR: &str = ".sidebar-nav";
pub const CLICKABLE_IMAGE_SELECTOR: &str = ".clickable-image";
pub const IMAGE_SELECTOR: &str = "img";
pub const MODAL_ID: &str = "imageModal";
pub const MODAL_IMAGE_ID: &str = "modalImage";
pub const MODAL_CLOSE_SELECTOR: &str = ".modal-close";

/// Class marking the highlighted navigation link.
pub const ACTIVE_CLASS: &str = "active";

// ── Injected controls ───────────────────────────────────────────

pub const COPY_BUTTON_CLASS: &str = "copy-btn";
pub const BACK_TO_TOP_CLASS: &str = "back-to-top";
pub const MOBILE_TOGGLE_CLASS: &str = "mobile-nav-toggle";

// ── Glyphs ──────────────────────────────────────────────────────

pub const GLYPH_MOON: &str = "🌙";
pub const GLYPH_SUN: &str = "☀️";
pub const GLYPH_COPY: &str = "📋";
pub const GLYPH_COPIED: &str = "✅";
pub const GLYPH_UP: &str = "↑";
pub const GLYPH_MENU: &str = "☰";
pub const GLYPH_CLOSE: &str = "✕";

// ── Colors ──────────────────────────────────────────────────────

pub const COPY_IDLE_BACKGROUND: &str = "rgba(59, 130, 246, 0.8)";
pub const COPY_SUCCESS_BACKGROUND: &str = "rgba(16, 185, 129, 0.8)";

// ── Timings (milliseconds) ──────────────────────────────────────

/// Duration of the theme toggle's rotation before it is reset.
pub const THEME_SPIN_MS: u32 = 300;

/// How long the copy button shows the success glyph.
pub const COPY_FEEDBACK_MS: u32 = 2000;

// ── Key names ───────────────────────────────────────────────────

pub const KEY_ESCAPE: &str = "Escape";
