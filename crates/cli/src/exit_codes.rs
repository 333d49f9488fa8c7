//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of
//! the shell contract; scripts rely on them.
//!
//! | Range | Domain    | Description                              |
//! |-------|-----------|------------------------------------------|
//! | 0     | Universal | Success                                  |
//! | 1     | Universal | General error (unspecified)              |
//! | 2     | Universal | CLI usage error (bad args, missing file) |
//! | 3-9   | share     | Share-link codes                         |
//! | 10-19 | run       | Execution backend codes                  |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Share token failed to decode (malformed base64/JSON, unknown language).
pub const EXIT_SHARE_DECODE: u8 = 3;

/// Backend failed to initialize (interpreter missing or too old).
pub const EXIT_RUN_INIT: u8 = 10;

/// Script run ended with error lines in the log.
pub const EXIT_RUN_SCRIPT: u8 = 11;
