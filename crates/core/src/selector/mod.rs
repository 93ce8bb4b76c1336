//! Server selection: turns a formed match into a declarative allocation
//! request for the external allocator.

mod types;

pub use types::{
    build_allocation, AllocationRequest, PlayerSelector, SelectorError, ServerSelector,
    ServerState, ANNOTATION_EXPECTED_PLAYERS, ANNOTATION_MATCH_ID, LABEL_FLEET,
    LABEL_SHOULD_ALLOCATE,
};
