//! Text exports of a model.
use crate::Model;
use std::fmt::Write;

impl Model {
    /// The model in the `*_hr.dat` format of Wannier90.
    ///
    /// After a header line come the number of orbitals, the number of lattice
    /// vectors of the full table (both members of every $\\{\bm G,-\bm G\\}$
    /// pair), their degeneracies (all 1, fifteen per line) and one line
    /// `G1 G2 G3 m n Re Im` per matrix element, with 1-based orbital indices,
    /// `m` running fastest.
    pub fn to_hr(&self) -> String {
        let full = self.hoppings.expand();
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = writeln!(out, " written by tbmodels {}", env!("CARGO_PKG_VERSION"));
        let _ = writeln!(out, "{:12}", self.size);
        let _ = writeln!(out, "{:12}", full.len());
        let weights: Vec<&str> = vec!["    1"; full.len()];
        for chunk in weights.chunks(15) {
            let _ = writeln!(out, "{}", chunk.concat());
        }
        for (g, hop) in full.iter() {
            let [g1, g2, g3] = g.components();
            for n in 0..self.size {
                for m in 0..self.size {
                    let t = hop.get(m, n);
                    // adding 0.0 turns -0.0 into 0.0
                    let _ = writeln!(
                        out,
                        "{:5}{:5}{:5}{:5}{:5}{:12.6}{:12.6}",
                        g1,
                        g2,
                        g3,
                        m + 1,
                        n + 1,
                        t.re + 0.0,
                        t.im + 0.0
                    );
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::lattice::LatticeVector;
    use crate::sparse::HoppingMatrix;
    use num_complex::Complex64;

    const REFERENCE: &str = "           3
           7
    1    1    1    1    1    1    1
   -1   -1    0    1    1    0.000000    0.000000
   -1   -1    0    2    1    0.000000    0.000000
   -1   -1    0    3    1    0.000000    0.000000
   -1   -1    0    1    2   -0.100000    0.000000
   -1   -1    0    2    2    0.000000    0.000000
   -1   -1    0    3    2    0.000000    0.000000
   -1   -1    0    1    3    0.000000    0.000000
   -1   -1    0    2    3    0.000000    0.000000
   -1   -1    0    3    3    0.000000    0.000000
   -1    0    0    1    1    0.211000    0.000000
   -1    0    0    2    1    0.000000    0.000000
   -1    0    0    3    1    0.000000    0.000000
   -1    0    0    1    2    0.000000    0.100000
   -1    0    0    2    2   -0.211000    0.000000
   -1    0    0    3    2    0.000000    0.000000
   -1    0    0    1    3    0.000000    0.000000
   -1    0    0    2    3    0.000000    0.000000
   -1    0    0    3    3    0.000000    0.000000
    0   -1    0    1    1    0.211000    0.000000
    0   -1    0    2    1    0.000000    0.000000
    0   -1    0    3    1    0.000000    0.000000
    0   -1    0    1    2    0.000000   -0.100000
    0   -1    0    2    2   -0.211000    0.000000
    0   -1    0    3    2    0.000000    0.000000
    0   -1    0    1    3    0.000000    0.000000
    0   -1    0    2    3    0.000000    0.000000
    0   -1    0    3    3    0.000000    0.000000
    0    0    0    1    1    1.000000    0.000000
    0    0    0    2    1    0.100000    0.000000
    0    0    0    3    1    0.000000    0.000000
    0    0    0    1    2    0.100000    0.000000
    0    0    0    2    2   -1.000000    0.000000
    0    0    0    3    2    0.000000    0.000000
    0    0    0    1    3    0.000000    0.000000
    0    0    0    2    3    0.000000    0.000000
    0    0    0    3    3    0.000000    0.000000
    0    1    0    1    1    0.211000    0.000000
    0    1    0    2    1    0.000000    0.100000
    0    1    0    3    1    0.000000    0.000000
    0    1    0    1    2    0.000000    0.000000
    0    1    0    2    2   -0.211000    0.000000
    0    1    0    3    2    0.000000    0.000000
    0    1    0    1    3    0.000000    0.000000
    0    1    0    2    3    0.000000    0.000000
    0    1    0    3    3    0.000000    0.000000
    1    0    0    1    1    0.211000    0.000000
    1    0    0    2    1    0.000000   -0.100000
    1    0    0    3    1    0.000000    0.000000
    1    0    0    1    2    0.000000    0.000000
    1    0    0    2    2   -0.211000    0.000000
    1    0    0    3    2    0.000000    0.000000
    1    0    0    1    3    0.000000    0.000000
    1    0    0    2    3    0.000000    0.000000
    1    0    0    3    3    0.000000    0.000000
    1    1    0    1    1    0.000000    0.000000
    1    1    0    2    1   -0.100000    0.000000
    1    1    0    3    1    0.000000    0.000000
    1    1    0    1    2    0.000000    0.000000
    1    1    0    2    2    0.000000    0.000000
    1    1    0    3    2    0.000000    0.000000
    1    1    0    1    3    0.000000    0.000000
    1    1    0    2    3    0.000000    0.000000
    1    1    0    3    3    0.000000    0.000000";

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn three_orbitals() -> Model {
        let hop = |v: Vec<(usize, usize, Complex64)>| HoppingMatrix::from_triplets((3, 3), v).unwrap();
        let (t1, t2) = (0.1, 0.211);
        Model::new(
            vec![
                (LatticeVector::new([-1, -1, 0]), hop(vec![(0, 1, c(-t1, 0.0))])),
                (LatticeVector::new([-1, 0, 0]), hop(vec![(0, 0, c(t2, 0.0)), (0, 1, c(0.0, t1)), (1, 1, c(-t2, 0.0))])),
                (LatticeVector::new([0, -1, 0]), hop(vec![(0, 0, c(t2, 0.0)), (0, 1, c(0.0, -t1)), (1, 1, c(-t2, 0.0))])),
                (
                    LatticeVector::ZERO,
                    hop(vec![(0, 0, c(1.0, 0.0)), (1, 0, c(t1, 0.0)), (0, 1, c(t1, 0.0)), (1, 1, c(-1.0, 0.0))]),
                ),
                (LatticeVector::new([0, 1, 0]), hop(vec![(0, 0, c(t2, 0.0)), (1, 0, c(0.0, t1)), (1, 1, c(-t2, 0.0))])),
                (LatticeVector::new([1, 0, 0]), hop(vec![(0, 0, c(t2, 0.0)), (1, 0, c(0.0, -t1)), (1, 1, c(-t2, 0.0))])),
                (LatticeVector::new([1, 1, 0]), hop(vec![(1, 0, c(-t1, 0.0))])),
            ],
            ModelConfig {
                occ: Some(1),
                pos: Some(ndarray::array![[0.0, 0.0, 0.0], [0.5, 0.5, 0.2], [0.75, 0.15, 0.6]]),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn reference_listing() {
        let hr = three_orbitals().to_hr();
        let lines: Vec<&str> = hr.lines().skip(1).collect();
        let expected: Vec<&str> = REFERENCE.lines().collect();
        assert_eq!(lines, expected);
    }

    #[test]
    fn weights_wrap_after_fifteen() {
        let chain = Model::new(
            (1..=8isize).map(|x| ([x, 0, 0], ndarray::array![[1.0]])),
            ModelConfig {
                contains_cc: false,
                ..Default::default()
            },
        )
        .unwrap();
        let hr = chain.to_hr();
        let lines: Vec<&str> = hr.lines().collect();
        assert_eq!(lines[2].trim(), "16");
        assert_eq!(lines[3], "    1".repeat(15));
        assert_eq!(lines[4], "    1");
        assert_eq!(lines.len(), 5 + 16);
    }
}
