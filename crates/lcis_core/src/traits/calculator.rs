//! The `Calculator` trait.

use crate::schema::InputSchema;
use crate::types::{EvaluationError, ParameterSet, RawParameters, ResultRecord};

/// A pure, stateless formula mapping a validated parameter set to a
/// result record.
///
/// # Invariants
/// - `evaluate` is deterministic and has no side effects
/// - `evaluate` rejects a `ParameterSet` validated for another metric
/// - every factor is clamped to its domain before combination
///
/// # Examples
/// ```
/// use lcis_core::schema::{Domain, FieldSpec, InputSchema};
/// use lcis_core::traits::Calculator;
/// use lcis_core::types::{
///     Combination, EvaluationError, ParameterSet, RawParameters, RecordBuilder, ResultRecord,
///     Unit,
/// };
///
/// struct Doubler;
///
/// impl Calculator for Doubler {
///     fn metric(&self) -> &'static str {
///         "doubler"
///     }
///
///     fn schema(&self) -> InputSchema {
///         InputSchema::new("doubler").field(FieldSpec::required("x", Domain::Real, "Input"))
///     }
///
///     fn evaluate(&self, params: &ParameterSet) -> Result<ResultRecord, EvaluationError> {
///         params.ensure_for(self.metric())?;
///         let x = params.number("x")?;
///         Ok(RecordBuilder::new(self.metric(), Unit::Score, Combination::Product)
///             .factor("x", x)
///             .factor("two", 2.0)
///             .build()?)
///     }
/// }
///
/// let record = Doubler.evaluate_raw(&RawParameters::new().with("x", 1.5)).unwrap();
/// assert_eq!(record.final_value(), 3.0);
/// ```
pub trait Calculator: Send + Sync {
    /// Stable metric name, also the calculator's lookup key.
    fn metric(&self) -> &'static str;

    /// Input contract.
    fn schema(&self) -> InputSchema;

    /// Evaluates a validated parameter set.
    ///
    /// # Errors
    /// - `Validation` if the set was validated for another metric
    /// - `Computation` if a factor or the result is not finite
    /// - `Domain` if a formula precondition is violated
    fn evaluate(&self, params: &ParameterSet) -> Result<ResultRecord, EvaluationError>;

    /// Validates `raw` against [`Calculator::schema`] and evaluates it.
    fn evaluate_raw(&self, raw: &RawParameters) -> Result<ResultRecord, EvaluationError> {
        let params = self.schema().validate(raw)?;
        self.evaluate(&params)
    }
}
