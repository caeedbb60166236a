use crate::control::transfer_function::TransferFunction;

pub use crate::control::polynomial::format as poly_to_string;

/// Lowercase file-name fragment with spaces turned into underscores.
pub fn slug(label: &str) -> String {
    label.trim().to_lowercase().replace(' ', "_")
}

/// `G(s) = (num) / (den)`.
pub fn tf_title(tf: &TransferFunction) -> String {
    format!("G(s) = {}", tf)
}

/// `bode_{label}_num_{coefficients}_den_{coefficients}`, each coefficient
/// printed in its shortest form and joined with underscores.
pub fn tf_filename(tf: &TransferFunction, label: &str) -> String {
    format!(
        "bode_{}_num_{}_den_{}",
        label,
        join_coefficients(tf.num()),
        join_coefficients(tf.den())
    )
}

fn join_coefficients(coefficients: &[f64]) -> String {
    coefficients
        .iter()
        .map(|c| format!("{}", c))
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_is_built_from_coefficients() {
        let lead = TransferFunction::new(&[5.0, 10.0], &[1.0, 10.0]).unwrap();
        assert_eq!(tf_filename(&lead, "lead"), "bode_lead_num_5_10_den_1_10");
        let lag = TransferFunction::new(&[0.5, 2.5], &[1.0, 0.2]).unwrap();
        assert_eq!(tf_filename(&lag, "lag"), "bode_lag_num_0.5_2.5_den_1_0.2");
    }

    #[test]
    fn title_reads_as_a_ratio() {
        let tf = TransferFunction::new(&[25.0, 25.0], &[1.0, 4.0, 20.0, 32.0, 0.0]).unwrap();
        assert_eq!(tf_title(&tf), "G(s) = (25s + 25) / (s^4 + 4s^3 + 20s^2 + 32s)");
    }

    #[test]
    fn slug_lowercases_and_joins() {
        assert_eq!(slug("Stable 1st-Order"), "stable_1st-order");
    }
}
