//! A Bayer-Groth verifiable shuffle of ElGamal ciphertexts over a
//! safe-prime group: the NIZK a mix node attaches to a shuffled batch so
//! anyone holding the public inputs can check the output is a permutation
//! and rerandomization of the input, without learning which.
//!
//! `zkp::shuffle_argument` is the entry point most callers want;
//! everything under `zkp::*` below it is the nested argument chain that
//! makes it sound (`zero_argument` at the bottom, composed upward through
//! `hadamard_argument`, `single_value_product_argument`, `product_argument`,
//! and `multi_exponentiation_argument`).

pub mod commitment;
pub mod config;
pub mod elgamal;
pub mod error;
pub mod group;
pub mod hash;
pub mod matrix_utils;
pub mod shuffle_op;
pub mod zkp;
