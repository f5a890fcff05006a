//! Engine-neutral mixed-integer linear model.
//!
//! The builder writes into a [`MilpModel`]; a [`MilpSolver`](super::MilpSolver)
//! translates it into whatever its engine wants. Keeping the model plain data
//! means it can be inspected (counted, logged, tested) without an engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Handle to a model variable (its position in the model).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VarId(pub usize);

/// Variable domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VarKind {
    /// 0/1 integer.
    Binary,
    /// Real, bounded below.
    Continuous { lower: f64 },
}

/// A declared variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Display name (e.g. `officiates[Anna,8-0]`).
    pub name: String,
    /// Domain.
    pub kind: VarKind,
}

/// Affine expression `Σ coef·var + constant`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearExpr {
    /// `(variable, coefficient)` terms. A variable may appear more than once;
    /// coefficients add.
    pub terms: Vec<(VarId, f64)>,
    /// Constant offset.
    pub constant: f64,
}

impl LinearExpr {
    /// Creates the zero expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of variables with coefficient 1.
    pub fn sum<I: IntoIterator<Item = VarId>>(vars: I) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
            constant: 0.0,
        }
    }

    /// Adds `coef · var`.
    pub fn term(mut self, var: VarId, coef: f64) -> Self {
        self.terms.push((var, coef));
        self
    }

    /// Adds a constant.
    pub fn plus(mut self, constant: f64) -> Self {
        self.constant += constant;
        self
    }

    /// Adds `coef · var` in place.
    pub fn add_term(&mut self, var: VarId, coef: f64) {
        self.terms.push((var, coef));
    }

    /// Evaluates the expression against a value vector indexed by `VarId`.
    ///
    /// Variables outside `values` evaluate to 0.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(v, c)| c * values.get(v.0).copied().unwrap_or(0.0))
            .sum::<f64>()
            + self.constant
    }

    /// Whether the expression has no variable terms.
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Relation between an expression and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    /// `expr ≤ rhs`
    LessEq,
    /// `expr ≥ rhs`
    GreaterEq,
    /// `expr = rhs`
    Equal,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Comparison::LessEq => "<=",
            Comparison::GreaterEq => ">=",
            Comparison::Equal => "==",
        };
        f.write_str(s)
    }
}

/// Which rule a constraint encodes. Used for reporting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConstraintFamily {
    Coverage,
    QualificationFloor,
    QualificationCeiling,
    ConflictExclusion,
    ConsecutiveCap,
    ColleagueLockStep,
    AvailabilityGate,
    SingleFinal,
    FirstLastLinkage,
    ConsecutiveAttendance,
    DeviationLinkage,
}

impl ConstraintFamily {
    /// Stable snake_case name for logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            ConstraintFamily::Coverage => "coverage",
            ConstraintFamily::QualificationFloor => "qualification_floor",
            ConstraintFamily::QualificationCeiling => "qualification_ceiling",
            ConstraintFamily::ConflictExclusion => "conflict_exclusion",
            ConstraintFamily::ConsecutiveCap => "consecutive_cap",
            ConstraintFamily::ColleagueLockStep => "colleague_lock_step",
            ConstraintFamily::AvailabilityGate => "availability_gate",
            ConstraintFamily::SingleFinal => "single_final",
            ConstraintFamily::FirstLastLinkage => "first_last_linkage",
            ConstraintFamily::ConsecutiveAttendance => "consecutive_attendance",
            ConstraintFamily::DeviationLinkage => "deviation_linkage",
        }
    }
}

/// `expr (≤ | ≥ | =) rhs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    /// Rule this constraint belongs to.
    pub family: ConstraintFamily,
    /// Left-hand side.
    pub expr: LinearExpr,
    /// Relation.
    pub cmp: Comparison,
    /// Right-hand side.
    pub rhs: f64,
}

impl LinearConstraint {
    /// Whether `values` satisfy the constraint within `tolerance`.
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.cmp {
            Comparison::LessEq => lhs <= self.rhs + tolerance,
            Comparison::GreaterEq => lhs >= self.rhs - tolerance,
            Comparison::Equal => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

/// A minimisation MILP.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MilpModel {
    /// Model name.
    pub name: String,
    /// Declared variables; `VarId(i)` is `variables[i]`.
    pub variables: Vec<Variable>,
    /// Constraints in emission order.
    pub constraints: Vec<LinearConstraint>,
    /// Objective to minimise.
    pub objective: LinearExpr,
}

impl MilpModel {
    /// Creates an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Declares a binary variable.
    pub fn add_binary(&mut self, name: impl Into<String>) -> VarId {
        self.push_var(name.into(), VarKind::Binary)
    }

    /// Declares a continuous variable bounded below by `lower`.
    pub fn add_continuous(&mut self, name: impl Into<String>, lower: f64) -> VarId {
        self.push_var(name.into(), VarKind::Continuous { lower })
    }

    fn push_var(&mut self, name: String, kind: VarKind) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(Variable { name, kind });
        id
    }

    /// Adds `expr cmp rhs`.
    pub fn add_constraint(
        &mut self,
        family: ConstraintFamily,
        expr: LinearExpr,
        cmp: Comparison,
        rhs: f64,
    ) {
        self.constraints.push(LinearConstraint {
            family,
            expr,
            cmp,
            rhs,
        });
    }

    /// Sets the objective to minimise.
    pub fn minimize(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    /// Number of declared variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Number of binary variables.
    pub fn binary_count(&self) -> usize {
        self.variables
            .iter()
            .filter(|v| v.kind == VarKind::Binary)
            .count()
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Number of constraints per family.
    pub fn constraint_count_by_family(&self) -> BTreeMap<ConstraintFamily, usize> {
        let mut counts = BTreeMap::new();
        for c in &self.constraints {
            *counts.entry(c.family).or_insert(0) += 1;
        }
        counts
    }

    /// Number of constraints in one family.
    pub fn family_count(&self, family: ConstraintFamily) -> usize {
        self.constraints.iter().filter(|c| c.family == family).count()
    }

    /// Constraints violated by `values` (for checking engine output).
    pub fn violated_constraints(&self, values: &[f64], tolerance: f64) -> Vec<&LinearConstraint> {
        self.constraints
            .iter()
            .filter(|c| !c.is_satisfied(values, tolerance))
            .collect()
    }
}
