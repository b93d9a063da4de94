// Constants for the tape interpreter

use crate::memory::Cell;

/// Value stored into the cursor cell when `,` reads past the end of input.
/// Matches C's `EOF`; reads back as byte 255 under either cell width.
pub const EOF_SENTINEL: Cell = -1;

/// Exit code for a run that completed normally
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for a `[` whose matching `]` never appears
pub const EXIT_UNMATCHED_OPEN: i32 = 2;

/// Exit code for a `]` with no active loop
pub const EXIT_UNMATCHED_CLOSE: i32 = 3;

/// Exit code for a read or write failure on a program stream
pub const EXIT_IO_FAULT: i32 = 4;

/// Exit code for a source or input file that cannot be opened
pub const EXIT_UNAVAILABLE: i32 = 5;

/// Exit code for a malformed command line (BSD `EX_USAGE`)
pub const EXIT_USAGE: i32 = 64;

/// Default snapshot memory budget for the visualizer (256 MiB)
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 256 * 1024 * 1024;
