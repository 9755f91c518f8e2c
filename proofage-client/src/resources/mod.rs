//! Typed wrappers around the ProofAge REST endpoints.

mod verification;
mod workspace;

pub use verification::{Verification, Verifications};
pub use workspace::Workspace;
