//! Journey-stage progression.

pub mod machine;
