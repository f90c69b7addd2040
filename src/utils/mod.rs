use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub mod logging;
pub mod num;
pub mod random_instance;

pub type Random = Pcg64Mcg;

pub fn create_seeded_rng(seed: i128) -> Random {
    let mut rng = Pcg64Mcg::from_seed(seed.to_le_bytes());
    // discard the first three
    rng.next_u64();
    rng.next_u64();
    rng.next_u64();
    rng
}
