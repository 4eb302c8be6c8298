mod contact;
mod record;
mod task;

pub use contact::*;
pub use record::*;
pub use task::*;

pub(crate) use contact::checked_frequency;
