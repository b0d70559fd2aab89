//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: i32 = 0;

/// Operation cancelled at a confirmation prompt
pub const CANCELLED: i32 = 1;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Data format error (malformed kubeconfig or manifest)
pub const DATAERR: i32 = 65;

/// Cannot open input (missing file, not a git repo)
pub const NOINPUT: i32 = 66;

/// Service unavailable (wrapped tool not installed)
pub const UNAVAILABLE: i32 = 69;

/// Internal software error (wrapped tool failed)
pub const SOFTWARE: i32 = 70;

/// Can't create output file
pub const CANTCREAT: i32 = 73;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
