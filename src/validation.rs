use std::fmt;

/// A single constraint violation on one input field.
///
/// Violations are plain data: they name the field, say which constraint was
/// broken and carry a human-readable message. They never include the
/// rejected value itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    field: String,
    kind: ViolationKind,
    message: String,
}

impl FieldViolation {
    /// Creates a new violation for `field`.
    pub fn new(field: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }

    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the violated constraint.
    pub fn kind(&self) -> ViolationKind {
        self.kind
    }

    /// Returns the human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// The kind of constraint a field violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// A mandatory field was left unset
    Required,
    /// A number was below its minimum bound
    MinValue {
        /// The inclusive lower bound
        min: i64,
    },
    /// A number was above its maximum bound
    MaxValue {
        /// The inclusive upper bound
        max: i64,
    },
    /// A string was shorter than allowed
    MinLength {
        /// The minimum length in characters
        min: usize,
    },
    /// A string was longer than allowed
    MaxLength {
        /// The maximum length in characters
        max: usize,
    },
    /// A list held more elements than allowed
    MaxItems {
        /// The maximum number of elements
        max: usize,
    },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Required => write!(f, "required"),
            ViolationKind::MinValue { min } => write!(f, "minimum value {}", min),
            ViolationKind::MaxValue { max } => write!(f, "maximum value {}", max),
            ViolationKind::MinLength { min } => write!(f, "minimum length {}", min),
            ViolationKind::MaxLength { max } => write!(f, "maximum length {}", max),
            ViolationKind::MaxItems { max } => write!(f, "maximum items {}", max),
        }
    }
}

/// The complete set of violations found in one input.
///
/// An empty set means the input is valid. A non-empty set is surfaced as a
/// single aggregate error, never partially.
///
/// # Examples
///
/// ```
/// use typed_ops::{Checks, ViolationKind};
///
/// let errors = Checks::new("ExampleInput")
///     .min_value("PageSize", Some(0), 1)
///     .max_items("Names", &["a", "b", "c"], 2)
///     .finish();
///
/// assert_eq!(errors.len(), 2);
/// assert_eq!(errors.get("PageSize").unwrap().kind(), ViolationKind::MinValue { min: 1 });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    context: &'static str,
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    /// Returns the name of the validated type.
    pub fn context(&self) -> &'static str {
        self.context
    }

    /// Returns true if no constraint was violated.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns all violations in the order they were checked.
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Returns the first violation recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&FieldViolation> {
        self.violations.iter().find(|v| v.field == field)
    }

    /// Returns true if `field` has at least one violation.
    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Converts the set into a `Result`, failing when it is non-empty.
    ///
    /// # Errors
    ///
    /// Returns `self` if any violation was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} validation error(s) found in {}",
            self.violations.len(),
            self.context
        )?;
        for violation in &self.violations {
            write!(f, "\n- {}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Accumulating constraint checker.
///
/// Every method runs its check and records a violation on failure, then
/// hands the checker back so checks chain. Nothing short-circuits: all
/// checks run regardless of earlier failures. `Checks` is consumed by value
/// and `finish` yields an immutable [`ValidationErrors`].
#[derive(Debug)]
#[must_use = "call `finish` to obtain the collected violations"]
pub struct Checks {
    context: &'static str,
    violations: Vec<FieldViolation>,
}

impl Checks {
    /// Starts checking an input of the named type.
    pub fn new(context: &'static str) -> Self {
        Self {
            context,
            violations: Vec::new(),
        }
    }

    /// Requires an optional field to be set.
    pub fn required<T>(self, field: &str, value: Option<&T>) -> Self {
        let failed = value.is_none();
        self.record(failed, || {
            FieldViolation::new(field, ViolationKind::Required, "missing required field")
        })
    }

    /// Requires a present number to be at least `min`. Unset values pass.
    pub fn min_value(self, field: &str, value: Option<i64>, min: i64) -> Self {
        let failed = value.is_some_and(|v| v < min);
        self.record(failed, || {
            FieldViolation::new(
                field,
                ViolationKind::MinValue { min },
                format!("minimum field value of {}", min),
            )
        })
    }

    /// Requires a present number to be at most `max`. Unset values pass.
    pub fn max_value(self, field: &str, value: Option<i64>, max: i64) -> Self {
        let failed = value.is_some_and(|v| v > max);
        self.record(failed, || {
            FieldViolation::new(
                field,
                ViolationKind::MaxValue { max },
                format!("maximum field value of {}", max),
            )
        })
    }

    /// Requires a present string to hold at least `min` characters.
    pub fn min_len(self, field: &str, value: Option<&str>, min: usize) -> Self {
        let failed = value.is_some_and(|v| v.chars().count() < min);
        self.record(failed, || {
            FieldViolation::new(
                field,
                ViolationKind::MinLength { min },
                format!("minimum field size of {}", min),
            )
        })
    }

    /// Requires a present string to hold at most `max` characters.
    pub fn max_len(self, field: &str, value: Option<&str>, max: usize) -> Self {
        let failed = value.is_some_and(|v| v.chars().count() > max);
        self.record(failed, || {
            FieldViolation::new(
                field,
                ViolationKind::MaxLength { max },
                format!("maximum field size of {}", max),
            )
        })
    }

    /// Requires every element of a string list to hold at least `min`
    /// characters. Offending elements are reported as `Field[index]`.
    pub fn each_min_len<S: AsRef<str>>(self, field: &str, values: &[S], min: usize) -> Self {
        values.iter().enumerate().fold(self, |checks, (i, v)| {
            checks.min_len(&format!("{}[{}]", field, i), Some(v.as_ref()), min)
        })
    }

    /// Requires a list to hold at most `max` elements.
    pub fn max_items<T>(self, field: &str, values: &[T], max: usize) -> Self {
        let failed = values.len() > max;
        self.record(failed, || {
            FieldViolation::new(
                field,
                ViolationKind::MaxItems { max },
                format!("maximum number of items of {}", max),
            )
        })
    }

    /// Finishes checking and returns the collected violations.
    pub fn finish(self) -> ValidationErrors {
        ValidationErrors {
            context: self.context,
            violations: self.violations,
        }
    }

    fn record(mut self, failed: bool, violation: impl FnOnce() -> FieldViolation) -> Self {
        if failed {
            self.violations.push(violation());
        }
        self
    }
}

/// Types whose fields carry declared constraints.
///
/// Implementations must be pure and must run every check (see [`Checks`]).
pub trait Validate {
    /// Checks every constraint and returns all violations found.
    fn validate(&self) -> ValidationErrors;
}

/// A value that has passed validation.
///
/// `Validated<T>` has no public constructor: the only way to obtain one is
/// [`validate_input`]. Code that accepts a `Validated<T>` therefore never
/// sees an input that skipped its constraint checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated<T> {
    inner: T,
}

impl<T> Validated<T> {
    pub(crate) fn new_unchecked(value: T) -> Self {
        Self { inner: value }
    }

    /// Consumes the wrapper and returns the validated value.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> AsRef<T> for Validated<T> {
    fn as_ref(&self) -> &T {
        &self.inner
    }
}

/// Validates `input`, promoting it to [`Validated<T>`] on success.
///
/// # Errors
///
/// Returns the complete [`ValidationErrors`] set if any constraint fails.
///
/// # Examples
///
/// ```
/// use typed_ops::operations::DescribeSslPoliciesInput;
/// use typed_ops::validate_input;
///
/// let ok = validate_input(DescribeSslPoliciesInput::default());
/// assert!(ok.is_ok());
///
/// let bad = DescribeSslPoliciesInput { page_size: Some(0), ..Default::default() };
/// let errors = validate_input(bad).unwrap_err();
/// assert!(errors.contains("PageSize"));
/// ```
pub fn validate_input<T: Validate>(input: T) -> Result<Validated<T>, ValidationErrors> {
    input.validate().into_result()?;
    Ok(Validated::new_unchecked(input))
}
