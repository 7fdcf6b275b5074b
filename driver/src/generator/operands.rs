use anyhow::Context;
use matmulcore::Matrix;
use rand::{rngs::StdRng, SeedableRng};

/// Both multiplication operands, filled from one seeded generator.
pub struct Operands {
    pub lhs: Matrix,
    pub rhs: Matrix,
}

fn random_matrix(
    width: usize,
    height: usize,
    bound: i64,
    rng: &mut StdRng,
) -> anyhow::Result<Matrix> {
    let mut matrix = Matrix::new(width, height)
        .with_context(|| format!("allocating {}x{} matrix", height, width))?;
    matrix
        .fill_random(bound, rng)
        .context("filling matrix with random values")?;
    Ok(matrix)
}

/// Builds `lhs` (`one_width x one_height`) and `rhs` (`two_width x two_height`).
///
/// The same seed always yields the same operands.
pub fn build_operands(
    one: (usize, usize),
    two: (usize, usize),
    bound: i64,
    seed: u64,
) -> anyhow::Result<Operands> {
    let mut rng = StdRng::seed_from_u64(seed);
    let lhs = random_matrix(one.0, one.1, bound, &mut rng)?;
    let rhs = random_matrix(two.0, two.1, bound, &mut rng)?;
    Ok(Operands { lhs, rhs })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operands_have_requested_shapes() {
        let ops = build_operands((10, 5), (4, 10), 20, 1).unwrap();
        assert_eq!((ops.lhs.width(), ops.lhs.height()), (10, 5));
        assert_eq!((ops.rhs.width(), ops.rhs.height()), (4, 10));
        assert!(ops.lhs.as_slice().iter().all(|&v| (1..20).contains(&v)));
    }

    #[test]
    fn same_seed_reproduces_operands() {
        let first = build_operands((6, 6), (6, 6), 9, 13).unwrap();
        let second = build_operands((6, 6), (6, 6), 9, 13).unwrap();
        assert_eq!(first.lhs, second.lhs);
        assert_eq!(first.rhs, second.rhs);
    }

    #[test]
    fn zero_width_is_reported() {
        let err = build_operands((0, 3), (3, 3), 20, 0).err().unwrap();
        assert!(err.to_string().contains("allocating"));
    }
}
