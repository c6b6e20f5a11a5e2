//! # relcore Configuration Constants
//!
//! Index geometry lives here rather than in the index modules so that the
//! defaults used by `Table` and the defaults used by the indexes themselves
//! cannot drift apart.
//!
//! ## Dependency Graph
//!
//! ```text
//! MIN_TREE_ORDER (3)
//!       │
//!       └─> DEFAULT_TREE_ORDER (must be >=)
//!             A leaf holds ORDER - 1 keys, an internal node ORDER children.
//!             Below 3 a split cannot leave both halves non-empty.
//!
//! HASH_INITIAL_BUCKETS (4, power of two)
//!       │
//!       └─> mod1 starts here, mod2 = 2 * mod1
//!
//! HASH_SLOTS_PER_BUCKET (4)
//!       │
//!       └─> load factor = entries / (buckets * slots)
//!             split when it exceeds HASH_SPLIT_LOAD_PERCENT
//! ```
//!
//! ## Critical Invariants
//!
//! 1. `DEFAULT_TREE_ORDER >= MIN_TREE_ORDER`
//! 2. `HASH_INITIAL_BUCKETS` is a non-zero power of two
//! 3. `0 < HASH_SPLIT_LOAD_PERCENT < 100`

// ============================================================================
// B+TREE CONFIGURATION
// ============================================================================

/// Smallest branching factor for which leaf and interior splits are defined.
pub const MIN_TREE_ORDER: usize = 3;

/// Default branching factor (maximum children of an interior node).
pub const DEFAULT_TREE_ORDER: usize = 3;

const _: () = assert!(
    DEFAULT_TREE_ORDER >= MIN_TREE_ORDER,
    "DEFAULT_TREE_ORDER must be at least MIN_TREE_ORDER"
);

// ============================================================================
// LINEAR HASH CONFIGURATION
// ============================================================================

/// Number of key/value slots in a home or overflow bucket.
pub const HASH_SLOTS_PER_BUCKET: usize = 4;

/// Number of home buckets before the first split (initial `mod1`).
pub const HASH_INITIAL_BUCKETS: usize = 4;

/// A split is triggered once the load factor strictly exceeds this percentage.
pub const HASH_SPLIT_LOAD_PERCENT: usize = 50;

const _: () = assert!(HASH_SLOTS_PER_BUCKET > 0, "buckets need at least one slot");

const _: () = assert!(
    HASH_INITIAL_BUCKETS.is_power_of_two(),
    "HASH_INITIAL_BUCKETS must be a power of two"
);

const _: () = assert!(
    HASH_SPLIT_LOAD_PERCENT > 0 && HASH_SPLIT_LOAD_PERCENT < 100,
    "HASH_SPLIT_LOAD_PERCENT must be between 1 and 99"
);

// ============================================================================
// DISPLAY
// ============================================================================

/// Column width used when rendering a table as text.
pub const DISPLAY_COLUMN_WIDTH: usize = 15;
