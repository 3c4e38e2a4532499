//! The seven-level period hierarchy: levels, the id codec, and navigation.

pub mod id;
pub mod level;
pub mod navigate;

pub use id::{PeriodId, PeriodIdError, PeriodKey};
pub use level::Level;
pub use navigate::{Direction, Navigator};
