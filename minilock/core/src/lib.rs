//! A multi-granularity 2V2PL lock scheduler over an in-memory catalog.
//!
//! ```
//! use minilock::database::{Database, DatabaseConfig};
//! use minilock_scheduler::Outcome;
//!
//! let db = Database::open_in_memory(&DatabaseConfig::default()).unwrap();
//! let mut session = db.session().unwrap();
//! let steps = session.execute("w1(x) w2(x) c1").unwrap();
//! assert_eq!(steps[1].outcome(), Some(Outcome::Deferred));
//! assert_eq!(steps[2].outcome(), Some(Outcome::Committed));
//! ```

pub mod database;
pub mod demo;
pub mod display;
pub mod error;
pub mod session;
