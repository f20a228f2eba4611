use proptest::prelude::*;

use rollcall_types::{
    AttendanceStatus, AuditRecord, EventKey, HolderKey, Nonce, RejectionReason, Timestamp, Token,
    TokenId, TokenSignature,
};

proptest! {
    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// plus_secs then elapsed_since recovers the offset.
    #[test]
    fn timestamp_plus_then_elapsed(base in 0u64..1_000_000, offset in 0u64..1_000_000) {
        let t = Timestamp::new(base);
        prop_assert_eq!(t.elapsed_since(t.plus_secs(offset)), offset);
    }

    /// Grace deadline classification agrees with manual arithmetic.
    #[test]
    fn token_grace_deadline(expiry in 0u64..1_000_000, grace in 0u64..1_000, now in 0u64..2_000_000) {
        let token = Token {
            id: TokenId::new([0u8; 32]),
            nonce: Nonce::new("00"),
            holder: HolderKey::parse("S1").unwrap(),
            event: EventKey::parse("E1").unwrap(),
            signature: TokenSignature::new([0u8; 32]),
            expires_at: Timestamp::new(expiry),
            used: false,
            created_at: Timestamp::EPOCH,
        };
        let now = Timestamp::new(now);
        prop_assert_eq!(now > token.grace_deadline(grace), now.as_secs() > expiry + grace);
        prop_assert_eq!(token.is_on_time(now), now.as_secs() <= expiry);
    }

    /// Signature hex encoding is lossless.
    #[test]
    fn signature_hex_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let sig = TokenSignature::new(bytes);
        prop_assert_eq!(TokenSignature::from_hex(&sig.to_hex()).unwrap(), sig);
    }

    /// Any key without the separator and within bounds parses.
    #[test]
    fn holder_key_accepts_plain_identifiers(raw in "[A-Za-z0-9_./-]{1,128}") {
        let key = HolderKey::parse(raw.clone()).unwrap();
        prop_assert_eq!(key.as_str(), raw.as_str());
    }

    /// Any key containing the separator is refused.
    #[test]
    fn holder_key_refuses_separator(prefix in "[a-z]{0,10}", suffix in "[a-z]{0,10}") {
        let raw = format!("{prefix}|{suffix}");
        prop_assert!(HolderKey::parse(raw).is_err());
    }

    /// Audit records survive the storage encoding.
    #[test]
    fn audit_record_bincode_roundtrip(at in 0u64..u64::MAX, missing_holder in any::<bool>()) {
        let rec = AuditRecord::rejected(
            if missing_holder { None } else { Some(HolderKey::parse("S100").unwrap()) },
            Some(EventKey::parse("E1").unwrap()),
            Some(Nonce::new("abcd")),
            RejectionReason::TokenExpired,
            Timestamp::new(at),
        );
        let encoded = bincode::serialize(&rec).unwrap();
        let decoded: AuditRecord = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded.status, AttendanceStatus::Failed);
        prop_assert_eq!(decoded, rec);
    }
}
