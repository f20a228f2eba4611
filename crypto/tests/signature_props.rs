use proptest::prelude::*;

use rollcall_crypto::sign_token;
use rollcall_types::{EventKey, HolderKey, HolderSecret, Nonce};

fn key() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{1,24}"
}

proptest! {
    /// Sign(h, e, n, s) == Sign(h, e, n, s).
    #[test]
    fn signature_is_deterministic(h in key(), e in key(), n in "[0-9a-f]{32}", s in prop::collection::vec(any::<u8>(), 1..64)) {
        let h = HolderKey::parse(h).unwrap();
        let e = EventKey::parse(e).unwrap();
        let n = Nonce::new(n);
        let s = HolderSecret::new(s);
        prop_assert_eq!(sign_token(&h, &e, &n, &s), sign_token(&h, &e, &n, &s));
    }

    /// Changing exactly one of the four inputs changes the signature.
    #[test]
    fn signature_changes_with_any_field(
        h in key(),
        e in key(),
        n in "[0-9a-f]{32}",
        s in prop::collection::vec(any::<u8>(), 1..64),
        which in 0usize..4,
    ) {
        let holder = HolderKey::parse(h.clone()).unwrap();
        let event = EventKey::parse(e.clone()).unwrap();
        let nonce = Nonce::new(n.clone());
        let secret = HolderSecret::new(s.clone());
        let base = sign_token(&holder, &event, &nonce, &secret);

        let changed = match which {
            0 => sign_token(&HolderKey::parse(format!("{h}x")).unwrap(), &event, &nonce, &secret),
            1 => sign_token(&holder, &EventKey::parse(format!("{e}x")).unwrap(), &nonce, &secret),
            2 => sign_token(&holder, &event, &Nonce::new(format!("{n}0")), &secret),
            _ => {
                let mut s2 = s.clone();
                s2.push(0);
                sign_token(&holder, &event, &nonce, &HolderSecret::new(s2))
            }
        };
        prop_assert_ne!(base, changed);
    }
}
