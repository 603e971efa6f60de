//! # lcis_models (L2: Business Logic)
//!
//! Formula calculators and the blend optimiser.
//!
//! This crate provides:
//! - Six independent calculators behind the `Calculator` trait (`calculators`)
//! - `CalculatorKind` enum dispatch, resolvable from stable metric names
//! - Deterministic grid scan of the chemistry-blend score (`optimiser`)
//!
//! ## Design Principles
//!
//! - **Unit-struct calculators** with no state; all inputs arrive in a validated `ParameterSet`
//! - **Enum dispatch** over trait objects at the crate boundary
//! - **Explicit defaults** declared in each schema and recorded when applied
//! - **Clamp before combine**: every factor is brought into its domain before the
//!   combination rule runs

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod calculators;
pub mod optimiser;
