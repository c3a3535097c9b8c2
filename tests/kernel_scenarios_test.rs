use crystalline::core::identity::{CrystallineIdentity, CrystallineSecure, ProtocolMode};
use crystalline::core::oracle::MarketOracle;
use crystalline::core::proof::{ProofGenerator, WitnessSet};
use crystalline::{
    ActionStatus, Axiom, CrystallineError, DeonticEngine, Kernel, Norm, PartitionLabel,
    PartitionRegistry, SealedPacket, StateSet, TomlConfig, Transaction, TrustedInput, WorldState,
};

#[test]
fn test_mixer_guard_blocks_double_spend() {
    let mut kernel = Kernel::new();
    kernel.enforce(Axiom::Extensionality);
    kernel.enforce(Axiom::Regularity);
    kernel.enforce(Axiom::Choice);

    let mut state = StateSet::new("mixer_commitments_root");
    let tx = Transaction::new_withdrawal("0xabc123...proof", "100_ETH");

    let proof = kernel.verify_transition(&state, &tx).unwrap();
    assert!(proof.is_verified);

    // Commit the withdrawal, then replay it.
    state.elements.insert(tx.id().to_string());
    let err = kernel.verify_transition(&state, &tx).unwrap_err();
    assert!(matches!(err, CrystallineError::AxiomaticViolation { .. }));
}

#[test]
fn test_sandbox_sovereignty_flow() {
    let kernel = Kernel::default_policy();
    let mut registry = PartitionRegistry::default();
    registry.create("WHATSAPP_SANDBOX", "sandbox-token").unwrap();

    let incoming = "user_message_payload_77";
    assert_eq!(kernel.check_compliance(incoming), ActionStatus::Allowed);

    registry
        .insert("WHATSAPP_SANDBOX", "sandbox-token", incoming)
        .unwrap();
    assert!(registry.elements("WHATSAPP_SANDBOX", "other-app").is_err());
    assert_eq!(
        registry.elements("WHATSAPP_SANDBOX", "sandbox-token").unwrap().len(),
        1
    );
}

#[test]
fn test_sealed_message_survives_untrusted_transport() {
    let kernel = Kernel::default_policy();
    let recipient = "0x_sovereign_identity_proof_8822";
    let message = "The revolution begins at dawn. Logic is Physics.";

    let transported = kernel.seal_as_set(message, recipient).unwrap().to_base64();
    assert!(!transported.contains("revolution"));

    let received = SealedPacket::from_base64(&transported).unwrap();
    assert_eq!(kernel.open_set(&received, recipient).unwrap(), message);

    let blind = kernel
        .seal_to_blind_carrier(TrustedInput::capture("Secret"), "recipient_id_proof_99")
        .unwrap();
    assert!(kernel.open_set(&blind, recipient).is_err());
}

#[test]
fn test_policy_file_drives_kernel() {
    let config = TomlConfig::from_toml_str(
        r#"
[kernel]
enforce = ["regularity"]

[deontic]
strategy = "strict_safety"

[[deontic.norms]]
id = "TRACKING"
modality = "prohibition"
priority = 1

[partition]
max_label_len = 8
"#,
    )
    .unwrap();

    let kernel = Kernel::from_config(&config).unwrap();
    assert!(kernel.is_enforced(Axiom::Regularity));
    assert!(!kernel.is_enforced(Axiom::Choice));
    assert_eq!(kernel.check_compliance("TRACKING pixel"), ActionStatus::Forbidden);
    assert_eq!(kernel.check_compliance("plain text"), ActionStatus::Allowed);
    assert!(kernel.verify_partition("SHORT"));
    assert!(!kernel.verify_partition("MUCH_TOO_LONG"));
    assert!(PartitionLabel::is_valid("MUCH_TOO_LONG"));
}

#[test]
fn test_market_witness_feeds_deontic_check() {
    let oracle = MarketOracle::new("oracle-1");
    let data = oracle.fetch_live_projection("ETH");
    assert!(oracle.verify_data_integrity(&data));

    let mut engine = DeonticEngine::new();
    engine.add_norm(Norm::prohibition("ETHICAL_MEV_GUARD", 10));
    let verdict = engine.check(
        1.0,
        &WorldState {
            collateral_ratio: 2.0,
            network_slippage: 0.02,
            market_volatility: 0.1,
        },
    );
    assert!(!verdict.is_allowed);

    let generator = ProofGenerator::new();
    let mut witnesses = WitnessSet::new();
    witnesses.push(generator.generate_witness(&oracle.generate_market_witness(&data), "quote"));
    assert_eq!(witnesses.verify_all(&generator, "oracle-1", "kernel"), 1);
}

#[test]
fn test_identity_signs_and_encrypts() {
    let alice = CrystallineIdentity::generate(ProtocolMode::Ed25519);
    let bob = CrystallineIdentity::generate(ProtocolMode::Secp256k1);
    let participants: [&dyn CrystallineSecure; 2] = [&alice, &bob];

    for signer in participants {
        let signature = signer.sign_data(b"commitment");
        assert!(signer.verify_data(b"commitment", &signature));
    }
    let signature = alice.sign_data(b"commitment");
    assert!(!bob.verify_data(b"commitment", &signature));

    let sealed = alice
        .encrypt_for_ecosystem(b"hi bob", bob.public_key_hex().as_bytes())
        .unwrap();
    let packet = SealedPacket::from_bytes(&sealed).unwrap();
    assert_eq!(packet.ciphertext.len(), b"hi bob".len() + 16);
}
