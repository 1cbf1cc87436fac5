use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest number of named feature slots one card evaluation can consume.
pub const MIN_GENOME_LEN: usize = 10;
pub const DEFAULT_GENOME_LEN: usize = 60;

#[derive(Debug, Clone, PartialEq)]
pub enum GenomeError {
    TooShort { len: usize, min: usize },
    OutOfRange { index: usize, value: f64 },
    LengthMismatch { left: usize, right: usize },
}

impl fmt::Display for GenomeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenomeError::TooShort { len, min } => {
                write!(f, "genome has {len} genes, at least {min} are required")
            }
            GenomeError::OutOfRange { index, value } => {
                write!(f, "gene {index} is {value}, outside [-1, 1]")
            }
            GenomeError::LengthMismatch { left, right } => {
                write!(f, "cannot cross genomes of length {left} and {right}")
            }
        }
    }
}

impl std::error::Error for GenomeError {}

/// Shape of a mutation step; the per-gene rate is supplied by the caller
/// because it changes over a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MutationParams {
    /// Chance that a mutated gene is redrawn instead of nudged.
    pub large_jump: f64,
    /// Half-width of the nudge.
    pub impulse: f64,
}

impl Default for MutationParams {
    fn default() -> Self {
        Self {
            large_jump: 0.3,
            impulse: 0.2,
        }
    }
}

/// Declarer scoring weights, each in `[-1, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Genome {
    genes: Vec<f64>,
}

impl Genome {
    pub fn new(genes: Vec<f64>) -> Result<Self, GenomeError> {
        if genes.len() < MIN_GENOME_LEN {
            return Err(GenomeError::TooShort {
                len: genes.len(),
                min: MIN_GENOME_LEN,
            });
        }
        if let Some((index, value)) = genes
            .iter()
            .copied()
            .enumerate()
            .find(|(_, value)| !(-1.0..=1.0).contains(value))
        {
            return Err(GenomeError::OutOfRange { index, value });
        }
        Ok(Self { genes })
    }

    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Result<Self, GenomeError> {
        let genes = (0..len).map(|_| rng.gen_range(-1.0..=1.0)).collect();
        Self::new(genes)
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn genes(&self) -> &[f64] {
        &self.genes
    }

    /// Each gene mutates with probability `rate`.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rate: f64, params: &MutationParams, rng: &mut R) {
        for gene in &mut self.genes {
            if rng.gen_bool(rate.clamp(0.0, 1.0)) {
                if rng.gen_bool(params.large_jump.clamp(0.0, 1.0)) {
                    *gene = rng.gen_range(-1.0..=1.0);
                } else {
                    let nudge = rng.gen_range(-params.impulse..=params.impulse);
                    *gene = (*gene + nudge).clamp(-1.0, 1.0);
                }
            }
        }
    }

    /// Multi-point crossover with `points` distinct cuts in `1..len`; the
    /// child switches parent at every cut, starting from `self`.
    pub fn crossover<R: Rng + ?Sized>(
        &self,
        other: &Genome,
        points: usize,
        rng: &mut R,
    ) -> Result<Genome, GenomeError> {
        if self.len() != other.len() {
            return Err(GenomeError::LengthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        let cuts = cut_points(self.len(), points, rng);
        let mut from_other = false;
        let mut next_cut = cuts.iter().peekable();
        let genes = (0..self.len())
            .map(|position| {
                while next_cut.next_if(|cut| **cut == position).is_some() {
                    from_other = !from_other;
                }
                if from_other {
                    other.genes[position]
                } else {
                    self.genes[position]
                }
            })
            .collect();
        Ok(Genome { genes })
    }
}

fn cut_points<R: Rng + ?Sized>(len: usize, points: usize, rng: &mut R) -> Vec<usize> {
    if len < 2 {
        return Vec::new();
    }
    let available = len - 1;
    let mut cuts: Vec<usize> = index::sample(rng, available, points.min(available))
        .into_iter()
        .map(|offset| offset + 1)
        .collect();
    cuts.sort_unstable();
    cuts
}

impl TryFrom<Vec<f64>> for Genome {
    type Error = GenomeError;

    fn try_from(genes: Vec<f64>) -> Result<Self, Self::Error> {
        Genome::new(genes)
    }
}

impl From<Genome> for Vec<f64> {
    fn from(genome: Genome) -> Self {
        genome.genes
    }
}

#[cfg(test)]
mod tests {
    use super::{Genome, GenomeError, MIN_GENOME_LEN, MutationParams, cut_points};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn constant(value: f64, len: usize) -> Genome {
        Genome::new(vec![value; len]).unwrap()
    }

    #[test]
    fn rejects_short_and_out_of_range_genomes() {
        assert_eq!(
            Genome::new(vec![0.0; MIN_GENOME_LEN - 1]),
            Err(GenomeError::TooShort {
                len: MIN_GENOME_LEN - 1,
                min: MIN_GENOME_LEN
            })
        );
        let mut genes = vec![0.0; 12];
        genes[4] = 1.5;
        assert!(matches!(
            Genome::new(genes),
            Err(GenomeError::OutOfRange { index: 4, .. })
        ));
    }

    #[test]
    fn random_genes_are_in_range() {
        let mut rng = StdRng::seed_from_u64(9);
        let genome = Genome::random(60, &mut rng).unwrap();
        assert_eq!(genome.len(), 60);
        assert!(genome.genes().iter().all(|g| (-1.0..=1.0).contains(g)));
    }

    #[test]
    fn mutation_respects_rate_and_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut untouched = constant(0.95, 40);
        untouched.mutate(0.0, &MutationParams::default(), &mut rng);
        assert_eq!(untouched, constant(0.95, 40));

        let mut mutated = constant(0.95, 40);
        mutated.mutate(1.0, &MutationParams::default(), &mut rng);
        assert_ne!(mutated, constant(0.95, 40));
        assert!(mutated.genes().iter().all(|g| (-1.0..=1.0).contains(g)));
    }

    #[test]
    fn small_steps_stay_within_impulse() {
        let mut rng = StdRng::seed_from_u64(2);
        let params = MutationParams {
            large_jump: 0.0,
            impulse: 0.2,
        };
        let mut genome = constant(0.0, 30);
        genome.mutate(1.0, &params, &mut rng);
        assert!(genome.genes().iter().all(|g| g.abs() <= 0.2 + 1e-12));
    }

    #[test]
    fn crossover_copies_contiguous_segments() {
        let mut rng = StdRng::seed_from_u64(3);
        let left = constant(-1.0, 20);
        let right = constant(1.0, 20);
        let child = left.crossover(&right, 2, &mut rng).unwrap();
        assert_eq!(child.genes()[0], -1.0);
        let switches = child
            .genes()
            .windows(2)
            .filter(|pair| pair[0] != pair[1])
            .count();
        assert_eq!(switches, 2);
    }

    #[test]
    fn crossover_rejects_length_mismatch() {
        let mut rng = StdRng::seed_from_u64(4);
        let err = constant(0.0, 12).crossover(&constant(0.0, 14), 2, &mut rng);
        assert_eq!(err, Err(GenomeError::LengthMismatch { left: 12, right: 14 }));
    }

    #[test]
    fn cut_points_are_distinct_and_inside() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let cuts = cut_points(12, 3, &mut rng);
            assert_eq!(cuts.len(), 3);
            assert!(cuts.windows(2).all(|pair| pair[0] < pair[1]));
            assert!(cuts.iter().all(|cut| (1..12).contains(cut)));
        }
        assert_eq!(cut_points(3, 5, &mut rng), vec![1, 2]);
    }

    #[test]
    fn serde_validates() {
        let json = serde_json::to_string(&constant(0.5, 10)).unwrap();
        assert!(json.starts_with('['));
        assert!(serde_json::from_str::<Genome>("[0.1, 0.2]").is_err());
    }
}
