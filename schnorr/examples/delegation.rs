use rand::SeedableRng;
use rand::rngs::StdRng;
use schnorr_tokens::{
    DelegationInfo, DelegationSpec, Keypair, Message, Parameters, Policy, RevocationState,
    Signature, VerificationKey,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut rng = StdRng::seed_from_u64(42);
    let params = Parameters::setup();
    let keypair = Keypair::generate(&params, &mut rng);
    let policy = Policy::new(100);

    // Issuer side: hand two tokens to a delegate, keep the revocation keys.
    let spec = DelegationSpec::new(2).with_policy(policy);
    let (tokens, revocation_keys) = keypair
        .secret_key()
        .delegate(&params, &spec, &mut rng)
        .into_parts();

    let vk_bytes = bincode::serialize(&keypair.verification_key()).expect("serialize vk");
    let token_bytes = bincode::serialize(&tokens).expect("serialize tokens");

    // Delegate side: sign with the first token.
    let mut tokens: DelegationInfo = bincode::deserialize(&token_bytes).expect("deserialize tokens");
    let message = Message::hash(b"pay 100 to bob");
    let sig = tokens.delegated_sign(&params, &message).expect("delegated sign");
    let sig_bytes = bincode::serialize(&sig).expect("serialize sig");

    // Verifier side.
    let vk: VerificationKey = bincode::deserialize(&vk_bytes).expect("deserialize vk");
    let sig: Signature = bincode::deserialize(&sig_bytes).expect("deserialize sig");
    let mut state = RevocationState::new();
    let ok = state
        .verify(&params, &vk, &message, Some(&policy), &sig)
        .expect("token not revoked");
    assert!(ok);
    println!("delegated signature accepted, {} token(s) left", tokens.len());

    // Revoking the second token makes its signatures unacceptable.
    state.revoke(revocation_keys[1]);
    let late = tokens.delegated_sign(&params, &message).expect("delegated sign");
    match state.verify(&params, &vk, &message, Some(&policy), &late) {
        Err(err) => println!("second token rejected: {err}"),
        Ok(_) => unreachable!("revoked token was accepted"),
    }
}
