#![forbid(unsafe_code)]

//! Core: geometric primitives and the crop/rotate/flip transform state.
//!
//! # Role in Retouch
//! `retouch-core` is the value layer. It owns the immutable
//! [`GeometricTransformState`] that every history command captures, plus
//! the [`Rect`]/[`Size`] primitives it is expressed in.
//!
//! # Primary responsibilities
//! - **GeometricTransformState**: pure `with_*` mutation, normalization,
//!   validation, and unit↔pixel coordinate mapping.
//! - **AspectRatio**: ratio constraints and centered fitting of the crop.
//!
//! # How it fits in the system
//! The runtime (`retouch-runtime`) wraps before/after pairs of these states
//! into undoable commands. Nothing here knows about history; everything here
//! is a plain value that can be cloned into a command without aliasing live
//! edit state.

pub mod geometry;
pub mod transform;

pub use geometry::{Rect, Size};
pub use transform::{AspectRatio, GeometricTransformState};
