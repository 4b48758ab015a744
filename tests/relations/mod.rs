#![allow(dead_code)]

use curve25519_dalek::{RistrettoPoint, Scalar};
use ff::Field;
use group::Group;
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};

use sigma_compose::{DiscreteLogEquality, ModPDiscreteLog};

pub type G = RistrettoPoint;

/// Knowledge of `x` with `X = x * G` for the standard generator.
pub fn discrete_logarithm(rng: &mut (impl RngCore + CryptoRng)) -> (DiscreteLogEquality<G>, Scalar) {
    let x = Scalar::random(&mut *rng);
    let statement = DiscreteLogEquality::from_witness(vec![G::generator()], &x).unwrap();
    (statement, x)
}

/// Knowledge of `x` with `X = x * G` and `Y = x * H` for a random `H`.
#[allow(non_snake_case)]
pub fn dleq(rng: &mut (impl RngCore + CryptoRng)) -> (DiscreteLogEquality<G>, Scalar) {
    let x = Scalar::random(&mut *rng);
    let H = G::random(&mut *rng);
    let statement = DiscreteLogEquality::from_witness(vec![G::generator(), H], &x).unwrap();
    (statement, x)
}

/// A discrete-log statement whose witness nobody knows.
pub fn unknown_discrete_logarithm(rng: &mut (impl RngCore + CryptoRng)) -> DiscreteLogEquality<G> {
    DiscreteLogEquality::schnorr(G::generator(), G::random(&mut *rng)).unwrap()
}

/// Schnorr over the order-1019 subgroup of `Z_2039^*`, generated by 4.
pub fn modp_discrete_logarithm(x: u32) -> (ModPDiscreteLog, BigUint) {
    let x = BigUint::from(x);
    let statement = ModPDiscreteLog::from_witness(
        BigUint::from(2039u32),
        BigUint::from(1019u32),
        BigUint::from(4u32),
        &x,
    )
    .unwrap();
    (statement, x)
}
