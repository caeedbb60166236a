//! Real polynomials stored as coefficient vectors in descending powers,
//! `[a0, a1, ..., an]` meaning `a0 s^n + ... + an`.

use nalgebra as na;
use na::Complex;

const TRIM_TOLERANCE: f64 = 1e-12;

/// Strips leading coefficients that are negligible against the largest one.
/// The zero polynomial is returned as `[0.0]`.
pub fn trim(p: &[f64]) -> Vec<f64> {
    let scale = p.iter().fold(0.0f64, |acc, c| acc.max(c.abs()));
    if scale == 0.0 {
        return vec![0.0];
    }
    let first = p
        .iter()
        .position(|c| c.abs() > TRIM_TOLERANCE * scale)
        .unwrap_or(p.len() - 1);
    p[first..].to_vec()
}

pub fn degree(p: &[f64]) -> usize {
    trim(p).len() - 1
}

pub fn is_zero(p: &[f64]) -> bool {
    p.iter().all(|&c| c == 0.0)
}

pub fn add(a: &[f64], b: &[f64]) -> Vec<f64> {
    let len = a.len().max(b.len());
    let mut out = vec![0.0; len];
    for (i, c) in a.iter().enumerate() {
        out[len - a.len() + i] += c;
    }
    for (i, c) in b.iter().enumerate() {
        out[len - b.len() + i] += c;
    }
    out
}

pub fn sub(a: &[f64], b: &[f64]) -> Vec<f64> {
    add(a, &scale(b, -1.0))
}

pub fn scale(p: &[f64], k: f64) -> Vec<f64> {
    p.iter().map(|c| c * k).collect()
}

pub fn mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return vec![0.0];
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// Coefficients of `p(-s)`.
pub fn reflect(p: &[f64]) -> Vec<f64> {
    let n = p.len();
    p.iter()
        .enumerate()
        .map(|(i, &c)| if (n - 1 - i) % 2 == 1 { -c } else { c })
        .collect()
}

pub fn eval(p: &[f64], x: f64) -> f64 {
    p.iter().fold(0.0, |acc, &c| acc * x + c)
}

pub fn eval_complex(p: &[f64], s: Complex<f64>) -> Complex<f64> {
    p.iter()
        .fold(Complex::new(0.0, 0.0), |acc, &c| acc * s + Complex::new(c, 0.0))
}

/// Human-readable form such as `5s + 10` or `s^2 + 0.5s + 1`.
pub fn format(p: &[f64]) -> String {
    let order = p.len().saturating_sub(1);
    let terms: Vec<String> = p
        .iter()
        .enumerate()
        .filter(|&(_, &c)| c != 0.0)
        .map(|(i, &c)| {
            let power = order - i;
            let coeff = match c {
                c if power > 0 && c == 1.0 => String::new(),
                c if power > 0 && c == -1.0 => "-".to_string(),
                c => format!("{}", c),
            };
            match power {
                0 => coeff,
                1 => format!("{}s", coeff),
                _ => format!("{}s^{}", coeff, power),
            }
        })
        .collect();
    if terms.is_empty() {
        return "0".to_string();
    }
    terms.join(" + ")
}

/// Roots via the eigenvalues of the companion matrix. Trailing zero
/// coefficients are returned as exact roots at the origin.
pub fn roots(p: &[f64]) -> Vec<Complex<f64>> {
    let p = trim(p);
    let mut roots = Vec::new();

    let mut end = p.len();
    while end > 1 && p[end - 1] == 0.0 {
        roots.push(Complex::new(0.0, 0.0));
        end -= 1;
    }
    let p = &p[..end];
    let n = p.len() - 1;
    if n == 0 {
        return roots;
    }

    let mut companion = na::DMatrix::<f64>::zeros(n, n);
    for j in 0..n {
        companion[(0, j)] = -p[j + 1] / p[0];
    }
    for i in 1..n {
        companion[(i, i - 1)] = 1.0;
    }
    roots.extend(companion.complex_eigenvalues().iter().cloned());
    roots
}

/// Monic real polynomial with the given roots. Fails when the roots are
/// not closed under conjugation.
pub fn from_roots(roots: &[Complex<f64>]) -> Option<Vec<f64>> {
    let mut acc = vec![Complex::new(1.0, 0.0)];
    for r in roots {
        let mut next = vec![Complex::new(0.0, 0.0); acc.len() + 1];
        for (i, c) in acc.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c * r;
        }
        acc = next;
    }
    let scale = acc.iter().fold(1.0f64, |m, c| m.max(c.norm()));
    if acc.iter().any(|c| c.im.abs() > 1e-9 * scale) {
        return None;
    }
    Some(acc.iter().map(|c| c.re).collect())
}

/// Rewrites an even polynomial in `s` as a polynomial in `x = -s^2`, so
/// that evaluating at `s = jw` becomes evaluating at `x = w^2`.
/// Odd-power coefficients are ignored.
pub fn even_part_in_w2(p: &[f64]) -> Vec<f64> {
    collect_in_w2(p, 0)
}

/// Same as [`even_part_in_w2`] for the odd part divided by `s`: the odd
/// part of `p` at `s = jw` equals `jw` times the returned polynomial at `w^2`.
pub fn odd_part_in_w2(p: &[f64]) -> Vec<f64> {
    collect_in_w2(p, 1)
}

fn collect_in_w2(p: &[f64], parity: usize) -> Vec<f64> {
    let n = p.len();
    let mut ascending = Vec::new();
    for (i, &c) in p.iter().enumerate() {
        let power = n - 1 - i;
        if power % 2 != parity {
            continue;
        }
        let k = (power - parity) / 2;
        if ascending.len() <= k {
            ascending.resize(k + 1, 0.0);
        }
        ascending[k] += if k % 2 == 1 { -c } else { c };
    }
    if ascending.is_empty() {
        return vec![0.0];
    }
    ascending.reverse();
    ascending
}

/// Non-negative real roots of `p`, sorted ascending.
pub fn nonnegative_real_roots(p: &[f64]) -> Vec<f64> {
    if is_zero(p) {
        return Vec::new();
    }
    let mut out: Vec<f64> = roots(p)
        .into_iter()
        .filter(|r| r.im.abs() <= 1e-7 * (1.0 + r.re.abs()) && r.re >= -1e-9)
        .map(|r| r.re.max(0.0))
        .collect();
    out.sort_by(|a, b| a.total_cmp(b));
    out.dedup_by(|a, b| (*a - *b).abs() <= 1e-9 * (1.0 + b.abs()));
    out
}
