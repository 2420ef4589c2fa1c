//! Result mappers, one per query shape.
//!
//! Each mapper owns the accumulator it fills and is driven row by row by the
//! query executor.

pub mod code_lists;
pub mod codes;
pub mod common;
pub mod editions;

pub use code_lists::{CodeListMapper, CodeListsMapper};
pub use codes::{CodeMapper, CodeScope, CodesMapper};
pub use common::CountMapper;
pub use editions::{EditionMapper, EditionsMapper};
