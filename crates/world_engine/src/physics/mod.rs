//! Geometric queries against world geometry
//!
//! Broad-phase bounding-box rejection followed by narrow-phase exact
//! triangle tests, run only on broad-phase hits. A miss is a normal
//! outcome, represented as `None`, never an error.
//!
//! # Module Organization
//!
//! - [`collision`] - Geometric primitives (rays, boxes, triangles) and
//!   mesh-based collision geometry
//! - [`raycaster`] - Entity-level two-phase tests and screen-space picking

pub mod collision;
pub mod raycaster;

pub use raycaster::{cast_pickray, intersect_entity, LightHit, RaycastFilter, RaycastHit};
