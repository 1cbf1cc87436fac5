pub mod declarer;
pub mod defense;
pub mod filler;
pub mod genome;
pub mod policy;

pub use declarer::DeclarerStrategy;
pub use defense::DefensePolicy;
pub use genome::{Genome, GenomeError, MutationParams};
pub use policy::{CardChooser, PlayContext};
