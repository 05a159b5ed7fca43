//! Domain model (ids, status, errors, task constants).

pub mod errors;
pub mod ids;
pub mod status;
pub mod task;

pub use self::errors::TaskError;
pub use self::ids::TaskId;
pub use self::status::TaskStatus;
pub use self::task::{PLACEHOLDER, ResultMap};
