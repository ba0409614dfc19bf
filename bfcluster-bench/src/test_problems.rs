//! Synthetic block-structured similarity matrices for demos and benchmarks.

use nalgebra::DMatrix;

/// Planted-partition similarity: `blocks` groups of `block_size` points.
#[derive(Debug, Clone, Copy)]
pub struct BlockSimilarity {
    pub blocks: usize,
    pub block_size: usize,
    /// Similarity between points of the same block
    pub within: f64,
    /// Similarity between points of different blocks
    pub between: f64,
    /// Half-width of the uniform symmetric perturbation
    pub noise: f64,
    pub seed: u64,
}

impl BlockSimilarity {
    pub fn dim(&self) -> usize {
        self.blocks * self.block_size
    }

    /// Block label of point `i`.
    pub fn label(&self, i: usize) -> usize {
        i / self.block_size
    }

    /// Build the symmetric n×n matrix.
    ///
    /// Entries are drawn in upper-triangular row order from the LCG, so a
    /// given seed always yields the same matrix.
    pub fn build(&self) -> DMatrix<f64> {
        let n = self.dim();
        let mut rng_state = self.seed;
        let mut rand = || -> f64 {
            rng_state = rng_state.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((rng_state >> 33) as f64) / (u32::MAX as f64)
        };

        let mut s = DMatrix::zeros(n, n);
        for i in 0..n {
            for j in i..n {
                let base = if self.label(i) == self.label(j) { self.within } else { self.between };
                let v = base + self.noise * (2.0 * rand() - 1.0);
                s[(i, j)] = v;
                s[(j, i)] = v;
            }
        }
        s
    }
}

/// Benchmark instance definition.
#[derive(Clone)]
pub struct BenchProblem {
    pub name: &'static str,
    pub similarity: BlockSimilarity,
    pub nclust: Vec<usize>,
}

fn block(blocks: usize, block_size: usize, noise: f64, seed: u64) -> BlockSimilarity {
    BlockSimilarity { blocks, block_size, within: 0.9, between: 0.1, noise, seed }
}

/// Fixed suite run by `bfcluster bench`.
pub fn bench_suite() -> Vec<BenchProblem> {
    vec![
        BenchProblem {
            name: "BLOCK_2x2_CLEAN",
            similarity: BlockSimilarity { blocks: 2, block_size: 2, within: 1.0, between: 0.0, noise: 0.0, seed: 0 },
            nclust: vec![2, 3, 4],
        },
        BenchProblem {
            name: "BLOCK_3x4_NOISY",
            similarity: block(3, 4, 0.05, 7),
            nclust: vec![2, 3, 4],
        },
        BenchProblem {
            name: "BLOCK_4x8_NOISY",
            similarity: block(4, 8, 0.1, 12345),
            nclust: vec![2, 3, 4, 5, 6],
        },
        BenchProblem {
            name: "BLOCK_5x10_NOISY",
            similarity: block(5, 10, 0.2, 12345),
            nclust: (2..=8).collect(),
        },
        BenchProblem {
            name: "BLOCK_8x16_NOISY",
            similarity: block(8, 16, 0.2, 2024),
            nclust: vec![4, 6, 8, 10, 12],
        },
    ]
}
