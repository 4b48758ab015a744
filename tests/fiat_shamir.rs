use std::collections::BTreeMap;

use rand::rngs::OsRng;

use sigma_compose::{
    FiatShamirProofSystem, PartialKnowledge, ProofOfPartialKnowledge, SigmaProtocol,
};

mod relations;
use relations::*;

#[test]
fn proof_is_bound_to_additional_data() {
    let mut rng = OsRng;
    let (statement, x) = dleq(&mut rng);
    let nizk = FiatShamirProofSystem::new(b"fiat-shamir-binding", statement);

    let proof = nizk.create_proof(&x, b"transfer 10 coins", &mut rng).unwrap();
    assert!(nizk.check_proof(&proof, b"transfer 10 coins"));
    assert!(!nizk.check_proof(&proof, b"transfer 11 coins"));
    assert!(!nizk.check_proof(&proof, b"transfer 10 coins "));
}

#[test]
fn every_single_byte_mutation_invalidates_the_proof() {
    let mut rng = OsRng;
    let (statement, x) = discrete_logarithm(&mut rng);
    let nizk = FiatShamirProofSystem::new(b"fiat-shamir-mutation", statement);
    let proof = nizk.create_proof(&x, b"ad", &mut rng).unwrap();
    let bytes = nizk.serialize_proof(&proof);
    assert!(nizk.check_serialized_proof(&bytes, b"ad"));

    for index in 0..bytes.len() {
        for flip in [0x01u8, 0x80] {
            let mut mutated = bytes.clone();
            mutated[index] ^= flip;
            assert!(
                !nizk.check_serialized_proof(&mutated, b"ad"),
                "mutation at byte {index} accepted"
            );
        }
    }
}

#[test]
fn proof_does_not_transfer_to_another_statement() {
    let mut rng = OsRng;
    let (statement, x) = discrete_logarithm(&mut rng);
    let (other, _) = discrete_logarithm(&mut rng);
    let nizk = FiatShamirProofSystem::new(b"fiat-shamir-statement", statement);
    let proof = nizk.create_proof(&x, b"", &mut rng).unwrap();

    let bytes = nizk.serialize_proof(&proof);
    let other = FiatShamirProofSystem::new(b"fiat-shamir-statement", other);
    assert!(!other.check_serialized_proof(&bytes, b""));
}

#[test]
fn modp_proof_round_trips() {
    let mut rng = OsRng;
    let (statement, x) = modp_discrete_logarithm(1000);
    let nizk = FiatShamirProofSystem::new(b"fiat-shamir-modp", statement);
    let proof = nizk.create_proof(&x, b"m", &mut rng).unwrap();
    let restored = nizk.restore_proof(&nizk.serialize_proof(&proof)).unwrap();
    assert!(nizk.check_proof(&restored, b"m"));
    assert!(!nizk.check_proof(&restored, b"n"));
}

#[test]
fn partial_knowledge_signature() {
    let mut rng = OsRng;
    let (a, xa) = discrete_logarithm(&mut rng);
    let (b, _) = discrete_logarithm(&mut rng);
    let (c, xc) = dleq(&mut rng);
    let formula = PartialKnowledge::and([
        PartialKnowledge::or([PartialKnowledge::leaf("a", a), PartialKnowledge::leaf("b", b)]),
        PartialKnowledge::leaf("c", c),
    ]);
    let nizk = FiatShamirProofSystem::new(
        b"fiat-shamir-partial",
        ProofOfPartialKnowledge::new(formula).unwrap(),
    );

    let witnesses = BTreeMap::from([("a".to_string(), xa), ("c".to_string(), xc)]);
    let proof = nizk.create_proof(&witnesses, b"policy", &mut rng).unwrap();
    let bytes = nizk.serialize_proof(&proof);
    assert!(nizk.check_serialized_proof(&bytes, b"policy"));
    assert!(!nizk.check_serialized_proof(&bytes, b"other policy"));

    // The challenge is never part of the proof.
    let announcement_len = nizk.protocol().serialize_announcement(&proof.announcement).len();
    let response_len = nizk.protocol().serialize_response(&proof.response).len();
    assert_eq!(bytes.len(), 8 + announcement_len + response_len);
}
