//! Property tests for HTTP Basic credentials and request framing

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use monitview_core::{ConnectionParams, basic_auth_token, build_request};
use proptest::prelude::*;
use secrecy::SecretString;

proptest! {
    /// Property: the token decodes back to `user:password`
    #[test]
    fn token_decodes_to_credentials(
        user in "[a-zA-Z0-9_.-]{0,32}",
        password in "[ -~]{0,64}",
    ) {
        let token = basic_auth_token(&user, &password);
        let decoded = STANDARD.decode(token.as_bytes()).unwrap();
        prop_assert_eq!(decoded, format!("{user}:{password}").into_bytes());
    }

    /// Property: a request has exactly one blank line, at the end
    #[test]
    fn request_ends_with_single_blank_line(
        host in "[a-z][a-z0-9-]{0,20}(\\.[a-z]{2,6})?",
        port in 1u16..=65535,
        user in "[a-z]{1,12}",
        password in "[a-zA-Z0-9]{0,24}",
    ) {
        let params = ConnectionParams::new(host.clone(), port)
            .unwrap()
            .with_credentials(user, SecretString::from(password));
        let request = build_request(&params);

        prop_assert!(request.ends_with("\r\n\r\n"));
        prop_assert_eq!(request.matches("\r\n\r\n").count(), 1);
        let host_header = format!("\r\nHost: {host}\r\n");
        prop_assert!(request.contains(&host_header));
    }
}
