//! # lcis_core: Foundation Layer for the LCIS Formula Engine
//!
//! ## Layer 1 (Foundation) Role
//!
//! lcis_core is the bottom layer of the engine and provides:
//! - Error taxonomy: `ValidationError`, `ComputationError`, `DomainError` (`types::error`)
//! - Raw and validated inputs: `RawParameters`, `ParameterSet` (`types::params`)
//! - Auditable outputs: `ResultRecord`, `Combination` (`types::record`)
//! - Input contracts and validation: `InputSchema`, `Domain` (`schema`)
//! - Explicit clamping helpers (`math::clamp`)
//! - The `Calculator` trait every formula implements (`traits`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other lcis_* crates, with minimal external dependencies:
//! - thiserror: structured error enums
//! - serde: serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use lcis_core::schema::{Domain, FieldSpec, InputSchema};
//! use lcis_core::types::RawParameters;
//!
//! let schema = InputSchema::new("example")
//!     .field(FieldSpec::required("ratio", Domain::UnitInterval, "A ratio"))
//!     .field(FieldSpec::defaulted("rate", Domain::NonNegative, 0.1, "A rate"));
//!
//! let raw = RawParameters::new().with("ratio", 0.4);
//! let params = schema.validate(&raw).unwrap();
//!
//! assert_eq!(params.number("ratio").unwrap(), 0.4);
//! assert_eq!(params.number("rate").unwrap(), 0.1);
//! assert!(params.is_defaulted("rate"));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for parameters, records and units

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod schema;
pub mod traits;
pub mod types;
