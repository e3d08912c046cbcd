// tests/property/identity_test.rs

//! Properties of connection identity derivation: deterministic, and distinct
//! for distinct (identity, host, port) triples.

use featherq_client::{ConnId, ConsumerIdentity};
use proptest::prelude::*;

const NAME: &str = "[A-Za-z0-9._-]{1,20}";
const HOST: &str = "[a-z0-9][a-z0-9.-]{0,30}";

proptest! {
    #[test]
    fn test_derivation_is_deterministic(
        topic in NAME,
        channel in NAME,
        host in HOST,
        port in 1u16..,
    ) {
        let identity = ConsumerIdentity::new(topic, channel);
        let first = ConnId::from_address(&identity, &host, port);
        let second = ConnId::from_address(&identity, &host, port);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_distinct_ports_yield_distinct_ids(
        topic in NAME,
        channel in NAME,
        host in HOST,
        port_a in 1u16..,
        port_b in 1u16..,
    ) {
        prop_assume!(port_a != port_b);
        let identity = ConsumerIdentity::new(topic, channel);
        prop_assert_ne!(
            ConnId::from_address(&identity, &host, port_a),
            ConnId::from_address(&identity, &host, port_b)
        );
    }

    #[test]
    fn test_distinct_hosts_yield_distinct_ids(
        topic in NAME,
        channel in NAME,
        host_a in HOST,
        host_b in HOST,
        port in 1u16..,
    ) {
        prop_assume!(host_a != host_b);
        let identity = ConsumerIdentity::new(topic, channel);
        prop_assert_ne!(
            ConnId::from_address(&identity, &host_a, port),
            ConnId::from_address(&identity, &host_b, port)
        );
    }

    #[test]
    fn test_distinct_identities_yield_distinct_ids(
        topic_a in NAME,
        topic_b in NAME,
        channel in NAME,
        host in HOST,
        port in 1u16..,
    ) {
        prop_assume!(topic_a != topic_b);
        prop_assert_ne!(
            ConnId::from_address(&ConsumerIdentity::new(topic_a, channel.clone()), &host, port),
            ConnId::from_address(&ConsumerIdentity::new(topic_b, channel), &host, port)
        );
    }
}
