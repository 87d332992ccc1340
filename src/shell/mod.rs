//! Shell communication module.
//!
//! This module drives a `sqlite3` command-line process as a child and speaks
//! a sentinel-framed request/response protocol over its pipes. No SQLite
//! library is linked; the shell binary is the engine.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                     Host Application (Rust)                     │
//! │  ┌──────────────────────────────────────────────────────────┐  │
//! │  │                     Session (Async)                      │  │
//! │  │  - Spawns sqlite3 as a child process                     │  │
//! │  │  - One command in flight, framed by a sentinel print     │  │
//! │  │  - Deadline-bounded wait, stderr => engine error         │  │
//! │  └──────────────────────────────────────────────────────────┘  │
//! │                │                 ▲                ▲             │
//! │       stdin (SQL + .print)   stdout (JSON)    stderr            │
//! │                ▼                 │                │             │
//! └────────────────────────────────────────────────────────────────┘
//!                                   │
//!                                   ▼
//! ┌────────────────────────────────────────────────────────────────┐
//! │               sqlite3 Shell (Child Process)                     │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use shellite::shell::{Session, SessionConfig};
//!
//! let mut session = Session::in_memory(SessionConfig::default()).await?;
//! let rows = session.sql("SELECT 1+1").await?;
//! session.close().await?;
//! ```

mod decode;
mod error;
mod frame;
mod session;

pub use decode::{decode, DecodeMode, QueryOutput, Row};
pub use error::{SessionError, SessionResult};
pub use frame::SENTINEL;
pub use session::{Session, SessionConfig, MEMORY};
