//! TSVM estimators
//!
//! Two binary classifiers sharing one prediction contract: the standard
//! TSVM, which solves a pair of dual quadratic programs with the ClipDCD
//! solver, and the least-squares variant (LSTSVM), which replaces the QPs
//! with closed-form linear-system solves.

pub mod base;
pub mod lstsvm;
pub mod tsvm;

pub use self::base::*;
pub use self::lstsvm::*;
pub use self::tsvm::*;
