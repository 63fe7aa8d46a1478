//! Calibration input: the points a user marks on the plan and the session
//! value that carries them, together with the rest of the user's settings,
//! into the engine.
//!
//! # Roles
//!
//! | Role        | Always required | Purpose                               |
//! |-------------|-----------------|---------------------------------------|
//! | Entrance    | yes             | anchor tying pixel space to the map   |
//! | ScaleStart  | yes             | one end of the scale bar              |
//! | ScaleEnd    | yes             | other end of the scale bar            |
//! | NorthBase   | with arrow      | tail of the plan's north arrow        |
//! | NorthTip    | with arrow      | head of the plan's north arrow        |

mod points;
mod session;

pub use points::{CalibrationPoint, CalibrationPointStore, CalibrationRole, DisplayFrame};
pub use session::CalibrationSession;
