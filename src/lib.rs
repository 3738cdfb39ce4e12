//! coursenav: grouped course navigation for a navigation drawer
//!
//! Layers, innermost first:
//! - `domain`: entries, headers, ordering, enddate classification, toggle state
//! - `application`: grouping engine, toggle controller, menu service
//! - `infrastructure`: in-memory document, list-item renderer, snapshots, DI
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
