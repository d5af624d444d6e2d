/// Single tracked subject
pub mod entity;

/// Tracker options builder
pub mod options;

/// Crossing events and the callback trait that receives them
pub mod notify;

/// Association of observations with tracked entities: greedy and Hungarian solvers
mod assignment;

/// Registry of live tracked entities
pub mod person_trackers;
