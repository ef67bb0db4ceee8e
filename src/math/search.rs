//! Golden-section search for a one-dimensional minimum.
//!
//! Used to polish the MA coefficient after the grid search has bracketed the
//! minimum to within one grid step.

/// Inverse golden ratio, `(√5 - 1) / 2`.
const INV_PHI: f64 = 0.618_033_988_749_894_9;

/// Minimize `f` on `[lo, hi]`, returning `(x, f(x))`.
///
/// Assumes `f` is unimodal on the bracket. Runs a fixed number of iterations so
/// the result is deterministic.
pub fn golden_section_min<F>(mut f: F, lo: f64, hi: f64, iters: usize) -> (f64, f64)
where
    F: FnMut(f64) -> f64,
{
    let (mut a, mut b) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let mut c = b - INV_PHI * (b - a);
    let mut d = a + INV_PHI * (b - a);
    let mut fc = f(c);
    let mut fd = f(d);

    for _ in 0..iters {
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - INV_PHI * (b - a);
            fc = f(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + INV_PHI * (b - a);
            fd = f(d);
        }
    }

    let x = 0.5 * (a + b);
    (x, f(x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn finds_parabola_minimum() {
        let (x, fx) = golden_section_min(|x| (x - 0.3) * (x - 0.3) + 1.0, -1.0, 1.0, 80);
        assert_abs_diff_eq!(x, 0.3, epsilon = 1e-8);
        assert_abs_diff_eq!(fx, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn boundary_minimum_stays_in_bracket() {
        let (x, _) = golden_section_min(|x| x, 0.0, 1.0, 60);
        assert!((0.0..1e-8).contains(&x));
    }
}
