//! Standard exit codes (BSD sysexits.h compatible)

/// Command line usage error
pub const USAGE: i32 = 64;

/// Snapshot or menu data error
pub const DATAERR: i32 = 65;

/// A menu build is already running
pub const UNAVAILABLE: i32 = 69;

/// Internal software error (anchor missing, document failure)
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
