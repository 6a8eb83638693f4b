use super::*;
use curve::{CurveError, RandomField};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use subtle::ConstantTimeEq;

const VECTOR: [u8; 5] = [1, 2, 3, 255, 0];

fn setup_keys(seed: u64) -> (Parameters, Keypair, StdRng) {
    let mut rng = StdRng::seed_from_u64(seed);
    let params = Parameters::setup();
    let keypair = Keypair::generate(&params, &mut rng);
    (params, keypair, rng)
}

fn secret_scalar(sk: &SecretKey) -> ScalarField {
    ScalarField::from_bytes(&sk.to_bytes()).unwrap()
}

#[test]
fn test_key_relation() {
    let (_, keypair, _) = setup_keys(1);
    let sk = secret_scalar(keypair.secret_key());
    assert!(!sk.is_zero());
    assert_eq!(
        *keypair.verification_key().as_point(),
        Affine::generator() * sk
    );
}

#[test]
fn test_secret_key_bytes_round_trip() {
    let (params, keypair, _) = setup_keys(2);
    let restored = SecretKey::from_bytes(&keypair.secret_key().to_bytes()).unwrap();
    assert_eq!(&restored, keypair.secret_key());
    assert_eq!(restored.verification_key(&params), keypair.verification_key());
    assert_eq!(format!("{restored:?}"), "SecretKey(..)");
}

#[test]
fn test_sign_verify() {
    let (params, keypair, mut rng) = setup_keys(42);
    let vk = keypair.verification_key();
    let message = Message::hash(&VECTOR);

    let sig = keypair.secret_key().sign(&params, &message, None, &mut rng);
    assert!(vk.verify(&params, &message, &sig));
}

#[test]
fn test_verify_rejects_wrong_message() {
    let (params, keypair, mut rng) = setup_keys(42);
    let vk = keypair.verification_key();
    let sig = keypair
        .secret_key()
        .sign(&params, &Message::hash(b"pay 10"), None, &mut rng);

    assert!(!vk.verify(&params, &Message::hash(b"pay 11"), &sig));
}

#[test]
fn test_verify_rejects_wrong_key() {
    let (params, keypair, mut rng) = setup_keys(42);
    let message = Message::hash(&VECTOR);
    let sig = keypair.secret_key().sign(&params, &message, None, &mut rng);

    let other = Keypair::generate(&params, &mut rng);
    assert!(!other.verification_key().verify(&params, &message, &sig));
}

#[test]
fn test_tampered_fields_are_rejected() {
    let (params, keypair, mut rng) = setup_keys(7);
    let vk = keypair.verification_key();
    let message = Message::hash(&VECTOR);
    let sig = keypair.secret_key().sign(&params, &message, None, &mut rng);
    let one = ScalarField::ONE;

    let mut tampered = Vec::new();
    for i in 0..5 {
        let mut t = sig;
        match i {
            0 => t.sigma.c0 += one,
            1 => t.sigma.c1 += one,
            2 => t.sigma.z1 += one,
            3 => t.theta.m0 += one,
            _ => t.theta.z0 += Affine::generator(),
        }
        tampered.push(t);
    }

    for t in &tampered {
        assert_ne!(t, &sig);
        assert!(!vk.verify(&params, &message, t));
    }
}

#[test]
fn test_identity_points_are_rejected() {
    let (params, keypair, mut rng) = setup_keys(8);
    let message = Message::hash(&VECTOR);
    let mut sig = keypair.secret_key().sign(&params, &message, None, &mut rng);
    sig.theta.z0 = Affine::INFINITY;
    assert!(!keypair.verification_key().verify(&params, &message, &sig));

    assert_eq!(
        VerificationKey::try_from(Affine::INFINITY),
        Err(SchnorrError::InvalidPoint)
    );
}

#[test]
fn test_message_bit_flips_are_rejected() {
    let (params, keypair, mut rng) = setup_keys(9);
    let vk = keypair.verification_key();
    let bytes = b"transfer 100 to alice".to_vec();
    let sig = keypair
        .secret_key()
        .sign(&params, &Message::hash(&bytes), None, &mut rng);

    for bit in [0, 7, 8, 63, bytes.len() * 8 - 1] {
        let mut flipped = bytes.clone();
        flipped[bit / 8] ^= 1 << (bit % 8);
        assert!(!vk.verify(&params, &Message::hash(&flipped), &sig));
    }
}

#[test]
fn test_policy_is_bound() {
    let (params, keypair, mut rng) = setup_keys(10);
    let vk = keypair.verification_key();
    let message = Message::hash(&VECTOR);
    let policy = Policy::new(100);

    let sig = keypair
        .secret_key()
        .sign(&params, &message, Some(&policy), &mut rng);

    assert!(vk.verify_with_policy(&params, &message, Some(&policy), &sig));
    assert!(!vk.verify_with_policy(&params, &message, Some(&Policy::new(101)), &sig));
    assert!(!vk.verify(&params, &message, &sig));
}

#[test]
fn test_delegated_signatures_verify() {
    let (params, keypair, mut rng) = setup_keys(11);
    let vk = keypair.verification_key();

    let result = keypair
        .secret_key()
        .delegate(&params, &DelegationSpec::new(3), &mut rng);
    assert_eq!(result.revocation_keys().len(), 3);
    for (token, key) in result.delegation_info().tokens().zip(result.revocation_keys()) {
        assert_eq!(&token.revocation_key(), key);
    }

    let (mut tokens, _) = result.into_parts();
    for i in 0..3u8 {
        let message = Message::hash(&[i]);
        let sig = tokens.delegated_sign(&params, &message).unwrap();
        assert!(vk.verify(&params, &message, &sig));
        assert_eq!(tokens.len(), 2 - usize::from(i));
    }

    assert_eq!(
        tokens.delegated_sign(&params, &Message::hash(b"one too many")),
        Err(SchnorrError::TokenExhausted)
    );
}

#[test]
fn test_delegation_with_policy() {
    let (params, keypair, mut rng) = setup_keys(12);
    let vk = keypair.verification_key();
    let policy = Policy::new(25);
    let spec = DelegationSpec::new(1).with_policy(policy);

    let (mut tokens, _) = keypair
        .secret_key()
        .delegate(&params, &spec, &mut rng)
        .into_parts();
    let message = Message::hash(&VECTOR);
    let sig = tokens.delegated_sign(&params, &message).unwrap();

    assert!(vk.verify_with_policy(&params, &message, Some(&policy), &sig));
    assert!(!vk.verify(&params, &message, &sig));
}

#[test]
fn test_zero_tokens() {
    let (params, keypair, mut rng) = setup_keys(13);
    let result = keypair
        .secret_key()
        .delegate(&params, &DelegationSpec::new(0), &mut rng);
    assert!(result.delegation_info().is_empty());
    assert!(result.revocation_keys().is_empty());

    let (mut tokens, _) = result.into_parts();
    assert_eq!(tokens.take_token().err(), Some(SchnorrError::TokenExhausted));
}

#[test]
fn test_token_is_a_proof_on_its_tag() {
    let (params, keypair, mut rng) = setup_keys(14);
    let vk = *keypair.verification_key().as_point();
    let token = keypair.secret_key().issue_token(&params, None, &mut rng);

    // z0 * G - c0 * vk recomputes the token commitment.
    let r0 = Affine::generator() * token.z0() - vk * token.c0();
    let c0 = signatures::token_challenge(&token.m0(), &ScalarField::ZERO, &vk, &r0);
    assert_eq!(c0, token.c0());
}

#[test]
fn test_token_nonce_is_deterministic() {
    let (params, keypair, mut rng) = setup_keys(15);
    let token = keypair.secret_key().issue_token(&params, None, &mut rng);
    let copy = SigningToken::from_bytes(&token.to_bytes()).unwrap();
    let message = Message::hash(&VECTOR);

    assert_eq!(token.sign(&params, &message), copy.sign(&params, &message));
}

#[test]
fn test_token_reuse_exposes_token_secret() {
    let (params, keypair, mut rng) = setup_keys(16);
    let vk = keypair.verification_key();
    let token = keypair.secret_key().issue_token(&params, None, &mut rng);
    let z0 = token.z0();
    let copy = SigningToken::from_bytes(&token.to_bytes()).unwrap();

    let sig_a = token.sign(&params, &Message::hash(b"first"));
    let sig_b = copy.sign(&params, &Message::hash(b"second"));
    assert_eq!(sig_a.theta_z0(), sig_b.theta_z0());

    let recovered = (sig_a.sigma_z1() - sig_b.sigma_z1())
        * (sig_a.sigma_c1() - sig_b.sigma_c1()).invert().unwrap();
    assert_eq!(recovered, z0);

    // With z0 and the public c0, m0 anyone can sign under the token.
    let mut forged_bytes = [0u8; TOKEN_SIZE];
    forged_bytes[..32].copy_from_slice(&recovered.to_bytes());
    forged_bytes[32..64].copy_from_slice(&sig_a.sigma_c0().to_bytes());
    forged_bytes[64..].copy_from_slice(&sig_a.theta_m0().to_bytes());
    let forged = SigningToken::from_bytes(&forged_bytes)
        .unwrap()
        .sign(&params, &Message::hash(b"forged"));
    assert!(vk.verify(&params, &Message::hash(b"forged"), &forged));
}

#[test]
fn test_signing_does_not_repeat_tags() {
    let (params, keypair, mut rng) = setup_keys(17);
    let message = Message::hash(&VECTOR);
    let a = keypair.secret_key().sign(&params, &message, None, &mut rng);
    let b = keypair.secret_key().sign(&params, &message, None, &mut rng);
    assert_ne!(a.theta_m0(), b.theta_m0());
    assert_ne!(a, b);
}

#[test]
fn test_revoked_token_is_rejected() {
    let (params, keypair, mut rng) = setup_keys(18);
    let vk = keypair.verification_key();
    let message = Message::hash(&VECTOR);

    let (mut tokens, keys) = keypair
        .secret_key()
        .delegate(&params, &DelegationSpec::new(2), &mut rng)
        .into_parts();
    let first = tokens.delegated_sign(&params, &message).unwrap();
    let second = tokens.delegated_sign(&params, &message).unwrap();

    let mut state = RevocationState::new();
    assert!(state.revoke(keys[0]));
    assert!(!state.revoke(keys[0]));
    assert!(state.is_revoked(&keys[0]));

    assert_eq!(
        state.verify(&params, &vk, &message, None, &first),
        Err(SchnorrError::RevokedToken)
    );
    assert_eq!(state.verify(&params, &vk, &message, None, &second), Ok(true));
    // A valid signature is still valid when revocation is not consulted.
    assert!(vk.verify(&params, &message, &first));
}

#[test]
fn test_token_accepted_once_per_verifier() {
    let (params, keypair, mut rng) = setup_keys(19);
    let vk = keypair.verification_key();
    let message = Message::hash(&VECTOR);
    let sig = keypair.secret_key().sign(&params, &message, None, &mut rng);

    let mut state = RevocationState::new();
    assert_eq!(state.verify(&params, &vk, &message, None, &sig), Ok(true));
    assert_eq!(state.len(), 1);
    assert_eq!(
        state.verify(&params, &vk, &message, None, &sig),
        Err(SchnorrError::RevokedToken)
    );
}

#[test]
fn test_invalid_signature_leaves_state_unchanged() {
    let (params, keypair, mut rng) = setup_keys(20);
    let vk = keypair.verification_key();
    let sig = keypair
        .secret_key()
        .sign(&params, &Message::hash(b"a"), None, &mut rng);

    let mut state = RevocationState::new();
    assert_eq!(
        state.verify(&params, &vk, &Message::hash(b"b"), None, &sig),
        Ok(false)
    );
    assert!(state.is_empty());
    assert_eq!(state.verify(&params, &vk, &Message::hash(b"a"), None, &sig), Ok(true));
}

#[test]
fn test_signature_bytes_round_trip() {
    let (params, keypair, mut rng) = setup_keys(21);
    let sig = keypair
        .secret_key()
        .sign(&params, &Message::hash(&VECTOR), None, &mut rng);
    let bytes = sig.to_bytes();

    assert_eq!(bytes.len(), SIG_SIZE);
    assert_eq!(&bytes[..32], &sig.sigma_c0().to_bytes());
    assert_eq!(&bytes[128..], &sig.theta_z0().to_bytes());
    assert_eq!(Signature::from_bytes(&bytes), Ok(sig));
    assert_eq!(Signature::from_slice(&bytes), Ok(sig));
}

#[test]
fn test_decoding_errors() {
    let (params, keypair, mut rng) = setup_keys(22);
    let sig = keypair
        .secret_key()
        .sign(&params, &Message::hash(&VECTOR), None, &mut rng);
    let bytes = sig.to_bytes();

    assert_eq!(
        Signature::from_slice(&bytes[..SIG_SIZE - 1]),
        Err(SchnorrError::Curve(CurveError::InvalidEncoding))
    );

    let mut out_of_range = bytes;
    out_of_range[32..64].fill(0xff);
    assert_eq!(
        Signature::from_bytes(&out_of_range),
        Err(SchnorrError::Curve(CurveError::InvalidEncoding))
    );

    let mut off_curve = bytes;
    off_curve[128] ^= 1;
    assert_eq!(
        Signature::from_bytes(&off_curve),
        Err(SchnorrError::Curve(CurveError::PointNotOnCurve))
    );

    assert_eq!(
        VerificationKey::from_bytes(&[0u8; PK_SIZE]),
        Err(SchnorrError::InvalidPoint)
    );
    assert_eq!(
        SecretKey::from_bytes(&[0u8; SK_SIZE]).err(),
        Some(SchnorrError::Curve(CurveError::InvalidEncoding))
    );
    assert_eq!(
        SigningToken::from_bytes(&[0xff; TOKEN_SIZE]).err(),
        Some(SchnorrError::Curve(CurveError::InvalidEncoding))
    );
}

#[test]
fn test_verification_key_bytes_round_trip() {
    let (_, keypair, _) = setup_keys(23);
    let vk = keypair.verification_key();
    assert_eq!(VerificationKey::from_bytes(&vk.to_bytes()), Ok(vk));
}

#[test]
fn test_bincode_round_trip() {
    let (params, keypair, mut rng) = setup_keys(24);
    let vk = keypair.verification_key();
    let message = Message::hash(&VECTOR);
    let (tokens, keys) = keypair
        .secret_key()
        .delegate(&params, &DelegationSpec::new(2), &mut rng)
        .into_parts();

    let encoded = bincode::serialize(&tokens).unwrap();
    let mut decoded: DelegationInfo = bincode::deserialize(&encoded).unwrap();
    assert_eq!(decoded, tokens);

    let sig = decoded.delegated_sign(&params, &message).unwrap();
    let sig_bytes = bincode::serialize(&sig).unwrap();
    let sig_back: Signature = bincode::deserialize(&sig_bytes).unwrap();
    assert_eq!(sig_back, sig);

    let vk_back: VerificationKey = bincode::deserialize(&bincode::serialize(&vk).unwrap()).unwrap();
    assert!(vk_back.verify(&params, &message, &sig_back));

    let keys_back: Vec<RevocationKey> =
        bincode::deserialize(&bincode::serialize(&keys).unwrap()).unwrap();
    assert_eq!(keys_back, keys);

    let params_back: Parameters =
        bincode::deserialize(&bincode::serialize(&params).unwrap()).unwrap();
    assert_eq!(params_back, params);
}

#[test]
fn test_bincode_rejects_identity_key() {
    let encoded = bincode::serialize(&Affine::INFINITY).unwrap();
    assert!(bincode::deserialize::<VerificationKey>(&encoded).is_err());
    assert!(bincode::deserialize::<Parameters>(&encoded).is_err());
}

#[test]
fn test_end_to_end_api() {
    let params = api::setup();
    let keypair = api::keygen(params.clone());
    let (sk, vk) = keypair.clone().into_parts();
    assert_eq!(api::get_pk(keypair), vk);

    let scalar = api::hash_to_field(&VECTOR);
    assert_eq!(scalar, api::hash_to_field(&VECTOR));
    let message = Message::from(scalar);

    let direct = api::sign(params.clone(), sk.clone(), message.clone(), None);
    assert!(api::verify(&params, &vk, &message, None, &direct));

    let result = api::delegate(params.clone(), sk, 2);
    let (mut tokens, keys) = result.into_parts();
    let delegated = api::delegated_sign(params.clone(), &mut tokens, message.clone()).unwrap();
    assert!(api::verify(&params, &vk, &message, None, &delegated));
    assert_eq!(tokens.len(), 1);

    let mut state = RevocationState::new();
    api::revoke(&mut state, &keys);
    assert_eq!(
        state.verify(&params, &vk, &message, None, &delegated),
        Err(SchnorrError::RevokedToken)
    );
    assert_eq!(state.verify(&params, &vk, &message, None, &direct), Ok(true));

    let last = api::delegated_sign(params.clone(), &mut tokens, message.clone()).unwrap();
    assert!(api::verify(&params, &vk, &message, None, &last));
    assert_eq!(
        api::delegated_sign(params, &mut tokens, message),
        Err(SchnorrError::TokenExhausted)
    );
}

#[test]
fn test_empty_delegation_via_api() {
    let params = api::setup();
    let (sk, _) = api::keygen(params.clone()).into_parts();
    let result = api::delegate(params, sk, 0);
    assert!(result.delegation_info().is_empty());
    assert!(result.revocation_keys().is_empty());
}

#[test]
fn test_api_verify_checks_policy() {
    let params = api::setup();
    let (sk, vk) = api::keygen(params.clone()).into_parts();
    let message = Message::hash(b"transfer");
    let policy = Policy::new(250);

    let sig = api::sign(params.clone(), sk, message.clone(), Some(policy));
    assert!(api::verify(&params, &vk, &message, Some(&policy), &sig));
    assert!(!api::verify(&params, &vk, &message, None, &sig));
    assert!(!api::verify(&params, &vk, &message, Some(&Policy::new(251)), &sig));
}

#[test]
fn test_secret_equality_is_by_value() {
    let (params, keypair, mut rng) = setup_keys(31);
    let sk = keypair.secret_key().clone();
    let same = SecretKey::from_bytes(&sk.to_bytes()).unwrap();
    let other = SecretKey::random(&mut rng);
    assert!(bool::from(sk.ct_eq(&same)));
    assert_eq!(sk, same);
    assert_ne!(sk, other);

    let token = sk.issue_token(&params, None, &mut rng);
    let copy = SigningToken::from_bytes(&token.to_bytes()).unwrap();
    assert!(bool::from(token.ct_eq(&copy)));
    assert_eq!(token, copy);
    assert_ne!(token, sk.issue_token(&params, None, &mut rng));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn prop_sign_verify_any_message(bytes in proptest::collection::vec(any::<u8>(), 0..64), seed in any::<u64>()) {
        let (params, keypair, mut rng) = setup_keys(seed);
        let message = Message::hash(&bytes);
        let sig = keypair.secret_key().sign(&params, &message, None, &mut rng);
        prop_assert!(keypair.verification_key().verify(&params, &message, &sig));
    }

    #[test]
    fn prop_random_signature_rejected(seed in any::<u64>()) {
        let (params, keypair, mut rng) = setup_keys(seed);
        let sig = Signature {
            sigma: Sigma {
                c0: ScalarField::random(&mut rng),
                c1: ScalarField::random(&mut rng),
                z1: ScalarField::random(&mut rng),
            },
            theta: Theta {
                m0: ScalarField::random(&mut rng),
                z0: Affine::generator() * ScalarField::random_nonzero(&mut rng),
            },
        };
        prop_assert!(!keypair.verification_key().verify(&params, &Message::hash(&VECTOR), &sig));
    }
}
