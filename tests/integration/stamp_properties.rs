use std::cmp::Ordering;

use ccnv::name::canonical_cmp;
use ccnv::stamp::{compare, encode, VersionTime};
use ccnv::types::FUTURE_VERSION;
use ccnv::{Name, TemplateBuilder, VersionStamp};
use proptest::prelude::*;

const NANOS: i128 = 1_000_000_000;
/// One tick, rounded up to whole nanoseconds.
const TICK_NANOS: i128 = 244_141;
/// Largest whole second whose tick value fits the six-byte encoding.
const MAX_SECS: i64 = (1 << 36) - 1;

fn time_strategy() -> impl Strategy<Value = (i64, u32)> {
    (1..MAX_SECS, 0u32..1_000_000_000)
}

fn total_nanos(secs: i64, nanos: u32) -> i128 {
    i128::from(secs) * NANOS + i128::from(nanos)
}

fn stamp_nanos(stamp: &VersionStamp) -> i128 {
    i128::from(stamp.seconds()) * NANOS + i128::from(stamp.subsec_nanos())
}

proptest! {
    #[test]
    fn later_times_never_compare_lower(a in time_strategy(), b in time_strategy()) {
        let (t1, t2) = if total_nanos(a.0, a.1) <= total_nanos(b.0, b.1) { (a, b) } else { (b, a) };
        let e1 = encode(VersionTime::At { secs: t1.0, nanos: t1.1 }).unwrap();
        let e2 = encode(VersionTime::At { secs: t2.0, nanos: t2.1 }).unwrap();
        let order = compare(&e1, &e2).unwrap();
        prop_assert_ne!(order, Ordering::Greater);
        if total_nanos(t2.0, t2.1) - total_nanos(t1.0, t1.1) >= TICK_NANOS {
            prop_assert_eq!(order, Ordering::Less);
        }
        // Encoded length never shrinks as time moves forward
        prop_assert!(e1.len() <= e2.len());
    }

    #[test]
    fn decode_is_within_one_tick((secs, nanos) in time_strategy()) {
        let encoded = encode(VersionTime::At { secs, nanos }).unwrap();
        let decoded = VersionStamp::decode(&encoded).unwrap();
        let error = (stamp_nanos(&decoded) - total_nanos(secs, nanos)).abs();
        prop_assert!(error <= TICK_NANOS, "off by {} ns", error);
    }

    #[test]
    fn template_admits_only_between_bound_and_future(
        (secs, nanos) in (1_100_000_000i64..2_000_000_000, 0u32..1_000_000_000),
        candidate in proptest::collection::vec(any::<u8>(), 0..12),
    ) {
        let bound = VersionStamp::from_time(secs, nanos).unwrap().encode();
        let mut builder = TemplateBuilder::new();
        let template = builder.build_for_bound(&bound).unwrap();

        prop_assert!(!template.admits(&bound));
        prop_assert!(!template.admits(&FUTURE_VERSION));
        let above_bound = canonical_cmp(&candidate, &bound) == Ordering::Greater;
        let below_future = canonical_cmp(&candidate, &FUTURE_VERSION) == Ordering::Less;
        prop_assert_eq!(template.admits(&candidate), above_bound && below_future);
    }

    #[test]
    fn failed_replacement_leaves_name_unchanged(
        old in 1i64..MAX_SECS,
        back in 0i64..1_000_000,
    ) {
        let new = (old - back).max(1);
        let mut name = Name::from_components(["p"]);
        name.append(&VersionStamp::from_time(old, 0).unwrap().encode());
        let before = name.as_bytes().to_vec();

        let index = name.split().unwrap();
        let candidate = VersionStamp::from_time(new, 0).unwrap().encode();
        prop_assert!(name.replace_last_if_version(&index, &candidate, true).is_err());
        prop_assert_eq!(name.as_bytes(), &before[..]);
    }
}
