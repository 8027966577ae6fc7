//! mimc sponge over the pallas base field
//!
//! this hash is shared bit-for-bit with the send/withdraw circuits. a change
//! here does not raise an error anywhere; it silently makes every proof fail.
//!
//! ## construction
//!
//! - permutation: mimc feistel, s-box x^5, 220 rounds
//! - round constants: blake3 xof of [`ROUND_CONSTANT_DOMAIN`] || round index,
//!   reduced from 64 bytes; first and last constants are zero
//! - sponge: rate 1, capacity 1, key 0, one output element
//!
//! x^5 is used because gcd(5, p - 1) = 1 for the pallas base field, the same
//! exponent its poseidon instantiation uses.

use std::sync::OnceLock;

use pasta_curves::group::ff::Field;
use pasta_curves::Fp;

use crate::field::Fr;

/// number of feistel rounds
pub const MIMC_ROUNDS: usize = 220;

/// domain separator for round constant generation
pub const ROUND_CONSTANT_DOMAIN: &[u8] = b"cloakroom.mimc-sponge.rc.v1";

fn round_constants() -> &'static [Fp] {
    static CONSTANTS: OnceLock<Vec<Fp>> = OnceLock::new();
    CONSTANTS.get_or_init(|| {
        (0..MIMC_ROUNDS)
            .map(|i| {
                if i == 0 || i == MIMC_ROUNDS - 1 {
                    Fp::ZERO
                } else {
                    Fr::from_domain(ROUND_CONSTANT_DOMAIN, i as u32).0
                }
            })
            .collect()
    })
}

/// mimc feistel permutation keyed by `k`
fn feistel(mut xl: Fp, mut xr: Fp, k: Fp) -> (Fp, Fp) {
    let constants = round_constants();
    for (i, c) in constants.iter().enumerate() {
        let t = xl + k + *c;
        let t5 = t.square().square() * t;
        if i < MIMC_ROUNDS - 1 {
            let next = xr + t5;
            xr = xl;
            xl = next;
        } else {
            xr += t5;
        }
    }
    (xl, xr)
}

/// absorb `inputs` one element at a time and squeeze a single element
pub fn sponge(inputs: &[Fr]) -> Fr {
    let mut xl = Fp::ZERO;
    let mut xr = Fp::ZERO;
    for input in inputs {
        xl += input.0;
        (xl, xr) = feistel(xl, xr, Fp::ZERO);
    }
    Fr(xl)
}

/// 1-to-1 hash
pub fn hash1(x: Fr) -> Fr {
    sponge(&[x])
}

/// 2-to-1 compression used for merkle nodes
pub fn hash_pair(left: Fr, right: Fr) -> Fr {
    sponge(&[left, right])
}

/// 4-to-1 hash used for commitments
pub fn hash4(a: Fr, b: Fr, c: Fr, d: Fr) -> Fr {
    sponge(&[a, b, c, d])
}
