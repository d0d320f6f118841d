use fieldcrypt::{FieldCipher, FieldCryptError, KdfParams, MasterSecret};
use proptest::prelude::*;
use proptest::test_runner::Config;

fn cipher(secret: &str) -> FieldCipher<MasterSecret> {
    let kdf = KdfParams::new(4, 8, 1).expect("valid params");
    FieldCipher::with_kdf_params(MasterSecret::from(secret), kdf)
}

proptest! {
    #![proptest_config(Config::with_cases(64))]

    #[test]
    fn any_string_round_trips(s in any::<String>()) {
        let c = cipher("prop-secret");
        let token = c.encrypt(&s).expect("encrypt");
        prop_assert_eq!(c.decrypt(&token).expect("decrypt"), s);
    }

    #[test]
    fn any_bytes_round_trip(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        let c = cipher("prop-secret");
        let token = c.encrypt_bytes(&data).expect("encrypt");
        prop_assert_eq!(c.decrypt_bytes(&token).expect("decrypt"), data);
    }

    #[test]
    fn token_shape_holds(s in ".{0,64}") {
        let token = cipher("prop-secret").encrypt(&s).expect("encrypt");
        let (iv, ct) = token.split_once(':').expect("separator");
        prop_assert_eq!(iv.len(), 32);
        prop_assert!(!ct.is_empty() && ct.len() % 32 == 0);
        prop_assert!(token
            .bytes()
            .all(|b| b == b':' || b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
    }

    #[test]
    fn colonless_input_is_malformed(s in "[^:]{0,64}") {
        let err = cipher("prop-secret").decrypt(&s).unwrap_err();
        prop_assert!(matches!(err, FieldCryptError::MalformedToken(_)));
    }
}
