//! Dual problem solver for the standard TSVM
//!
//! This module implements the clipped dual coordinate descent (ClipDCD)
//! algorithm from "A clipping dual coordinate descent algorithm for solving
//! support vector machines" by Peng, Chen and Kang: each Lagrange multiplier
//! is updated analytically and clipped into the box constraint [0, C].

pub mod clipdcd;

pub use self::clipdcd::*;
