/*!
   Utilities for random value generation.
*/

use rand::Rng;

pub fn random_u32() -> u32 {
    let mut rng = rand::thread_rng();
    rng.gen()
}

pub fn random_u64() -> u64 {
    let mut rng = rand::thread_rng();
    rng.gen()
}

/**
   A random name suffix, used to keep the artifacts of concurrent test
   runs apart.
*/
pub fn random_string() -> String {
    format!("{:x}", random_u64())
}

/// Generates a random `u128` value between the given min and max.
pub fn random_u128_range(min: u128, max: u128) -> u128 {
    let mut rng = rand::thread_rng();
    rng.gen_range(min..max)
}
