//! Page retrieval and section extraction.
//!
//! [`fetch`] is the single network boundary of the pipeline; [`clean`]
//! turns raw markup into the plain text of the target section.

pub mod clean;
pub mod fetch;
