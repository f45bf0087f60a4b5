/*
 * Defines shared constants for the progress window: the logical control
 * identifier of the cancel button, default texts, and the fixed name of the
 * session attribute that selects the headless testing mode. The host maps
 * the logical control ID to its native control handle.
 */

use crate::host::types::ControlId;

// Logical ID for the optional cancel button.
pub const ID_BUTTON_CANCEL: ControlId = ControlId::new(1001);

// Default window title when the caller supplies none.
pub const DEFAULT_TITLE: &str = "Job in progress";

// Default description label when the caller supplies none.
pub const DEFAULT_DESCRIPTION: &str = "Please wait...";

// Replacement label for the cancel button once cancellation is underway.
pub const CLOSING_LABEL: &str = "Closing...";

// Session attribute that, when true, bypasses the overlay entirely and runs
// the operation inline (e.g., in automated tests where no focus event will
// ever arrive).
pub const NO_PROGRESS_WINDOW_ATTRIBUTE: &str = "NoProgressWindow";
