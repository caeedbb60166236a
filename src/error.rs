use std::fmt;

/// Errors raised while building, simulating or plotting a system.
#[derive(Debug)]
pub enum ControlError {
    /// Matrix or vector shapes are not conformable.
    DimensionMismatch {
        what: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// A matrix that has to be inverted is singular.
    Singular(&'static str),
    /// Transfer function denominator is identically zero.
    ZeroDenominator,
    /// Numerator degree exceeds denominator degree.
    ImproperTransferFunction { num_degree: usize, den_degree: usize },
    /// Operation only defined for single-input single-output systems.
    NotSiso { inputs: usize, outputs: usize },
    /// The (A, B) pair is not controllable.
    Uncontrollable,
    /// Requested closed-loop poles are not closed under conjugation.
    InvalidPoles,
    /// Time vector is empty or not uniformly spaced.
    InvalidTime(&'static str),
    /// Plotting backend failure.
    Plot(String),
    Io(std::io::Error),
    Config(String),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ControlError::DimensionMismatch {
                what,
                expected,
                found,
            } => write!(
                f,
                "{} has shape {}x{}, expected {}x{}",
                what, found.0, found.1, expected.0, expected.1
            ),
            ControlError::Singular(what) => write!(f, "{} is singular", what),
            ControlError::ZeroDenominator => write!(f, "transfer function denominator is zero"),
            ControlError::ImproperTransferFunction {
                num_degree,
                den_degree,
            } => write!(
                f,
                "improper transfer function: numerator degree {} > denominator degree {}",
                num_degree, den_degree
            ),
            ControlError::NotSiso { inputs, outputs } => write!(
                f,
                "expected a SISO system, got {} inputs and {} outputs",
                inputs, outputs
            ),
            ControlError::Uncontrollable => write!(f, "system is not controllable"),
            ControlError::InvalidPoles => {
                write!(f, "complex poles must come in conjugate pairs")
            }
            ControlError::InvalidTime(reason) => write!(f, "invalid time vector: {}", reason),
            ControlError::Plot(msg) => write!(f, "plotting failed: {}", msg),
            ControlError::Io(err) => write!(f, "I/O error: {}", err),
            ControlError::Config(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ControlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ControlError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ControlError {
    fn from(err: std::io::Error) -> Self {
        ControlError::Io(err)
    }
}

impl From<toml::de::Error> for ControlError {
    fn from(err: toml::de::Error) -> Self {
        ControlError::Config(err.to_string())
    }
}

pub(crate) fn check_shape(
    what: &'static str,
    found: (usize, usize),
    expected: (usize, usize),
) -> Result<(), ControlError> {
    if found != expected {
        return Err(ControlError::DimensionMismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}
