//! A stack bytecode interpreter whose polymorphic instructions (`Add`,
//! `Print`) dispatch through per-site monomorphic inline caches.
//!
//! The pieces, leaves first: [`object`] supplies the closed value model,
//! [`bytecode`] the encoded instruction format, [`MethodTable`] the fixed
//! (kind, selector) → operation registry, [`CacheCell`] the per-site
//! memoization, and [`run`] the execution loop tying them together.

pub mod cache;
pub mod interpreter;
pub mod registry;
pub mod unit;

pub use cache::{CacheCell, DispatchOutcome};
pub use interpreter::{RuntimeError, STACK_CAPACITY, run, run_with_output};
pub use registry::{MethodTable, NativeFn};
pub use unit::CodeUnit;
