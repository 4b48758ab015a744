use curve25519_dalek::Scalar;
use num_bigint::BigUint;
use rand::rngs::OsRng;

use sigma_compose::{
    run_honestly, ChallengeSpace, SigmaProtocol, SigmaProtocolSimulator, SigmaProtocolTranscript,
};

mod relations;
use relations::*;

#[test]
fn completeness_for_every_relation() {
    let mut rng = OsRng;
    for _ in 0..16 {
        let (dlog, x) = discrete_logarithm(&mut rng);
        assert!(run_honestly(&dlog, &x, &mut rng).unwrap().verify(&dlog));

        let (dleq, x) = dleq(&mut rng);
        assert!(run_honestly(&dleq, &x, &mut rng).unwrap().verify(&dleq));
    }
    let (modp, x) = modp_discrete_logarithm(777);
    assert!(run_honestly(&modp, &x, &mut rng).unwrap().verify(&modp));
}

#[test]
fn special_soundness_extracts_the_witness() {
    let mut rng = OsRng;
    let (dleq, x) = dleq(&mut rng);

    // The secret is consumed by the first response; the second accepting
    // response for the same announcement is derived from the witness.
    let (announcement, secret) = dleq.generate_announcement(&x, &mut rng).unwrap();
    let c1 = dleq.generate_challenge(&mut rng);
    let c2 = c1 + Scalar::ONE;
    let r1 = dleq.generate_response(secret, &c1).unwrap();
    let r2 = r1 + (c2 - c1) * x;
    assert!(dleq.check_transcript(&announcement, &c2, &r2));

    let first = SigmaProtocolTranscript::new(announcement.clone(), c1, r1);
    let second = SigmaProtocolTranscript::new(announcement, c2, r2);
    assert_eq!(dleq.extract_witness(&first, &second), Some(x));

    // Same challenge twice gives nothing to extract.
    assert_eq!(dleq.extract_witness(&first, &first), None);
}

#[test]
fn simulated_transcripts_verify_without_witness() {
    let mut rng = OsRng;
    let statement = unknown_discrete_logarithm(&mut rng);
    for _ in 0..16 {
        let challenge = statement.generate_challenge(&mut rng);
        let transcript = statement.simulate_transcript(&challenge, &mut rng).unwrap();
        assert_eq!(transcript.challenge, challenge);
        assert!(transcript.verify(&statement));
    }

    let (modp, _) = modp_discrete_logarithm(3);
    for c in [0u32, 1, 500, 1018] {
        let transcript = modp
            .simulate_transcript(&BigUint::from(c), &mut rng)
            .unwrap();
        assert!(transcript.verify(&modp));
    }
}

#[test]
fn transcript_with_other_challenge_fails() {
    let mut rng = OsRng;
    let (dlog, x) = discrete_logarithm(&mut rng);
    let transcript = run_honestly(&dlog, &x, &mut rng).unwrap();
    let tampered = SigmaProtocolTranscript::<_>::new(
        transcript.announcement.clone(),
        transcript.challenge + Scalar::ONE,
        transcript.response,
    );
    assert!(!tampered.verify(&dlog));
}

#[test]
fn challenges_restore_through_the_space() {
    let mut rng = OsRng;
    let (dlog, _) = discrete_logarithm(&mut rng);
    let challenge = dlog.generate_challenge(&mut rng);
    let bytes = dlog.serialize_challenge(&challenge);
    assert_eq!(bytes.len(), dlog.challenge_space().challenge_len());
    assert_eq!(dlog.restore_challenge(&bytes).unwrap(), challenge);

    let (modp, _) = modp_discrete_logarithm(3);
    assert_eq!(modp.challenge_space().size(), Some(BigUint::from(1019u32)));
    assert!(modp.restore_challenge(&[0x03, 0xfb]).is_err());
}
