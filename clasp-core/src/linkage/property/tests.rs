//! Proptest and rstest runners for the linkage properties.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::test_utils::suite_proptest_config;

use super::invariants::{
    run_centroid_property, run_component_agreement_property, run_determinism_property,
    run_relabel_bound_property,
};
use super::strategies::{generate_fixture, linkage_fixture_strategy};
use super::types::GraphShape;

/// Generates an rstest function that replays a property over fixed
/// `(shape, seed)` cases.
macro_rules! parameterised_property_test {
    ($test_name:ident, $runner:path, $expectation:expr) => {
        #[rstest::rstest]
        #[case::unique_42(GraphShape::Unique, 42)]
        #[case::unique_999(GraphShape::Unique, 999)]
        #[case::identical_42(GraphShape::ManyIdentical, 42)]
        #[case::identical_7777(GraphShape::ManyIdentical, 7777)]
        #[case::sparse_42(GraphShape::Sparse, 42)]
        #[case::disconnected_42(GraphShape::Disconnected, 42)]
        #[case::disconnected_999(GraphShape::Disconnected, 999)]
        #[case::edgeless_42(GraphShape::Edgeless, 42)]
        fn $test_name(#[case] shape: GraphShape, #[case] seed: u64) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let fixture = generate_fixture(shape, &mut rng);
            $runner(&fixture).expect($expectation);
        }
    };
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn linkage_matches_components(fixture in linkage_fixture_strategy()) {
        run_component_agreement_property(&fixture)?;
    }

    #[test]
    fn linkage_relabel_bound(fixture in linkage_fixture_strategy()) {
        run_relabel_bound_property(&fixture)?;
    }

    #[test]
    fn linkage_centroid_tracks_sizes(fixture in linkage_fixture_strategy()) {
        run_centroid_property(&fixture)?;
    }

    #[test]
    fn linkage_is_deterministic(fixture in linkage_fixture_strategy()) {
        run_determinism_property(&fixture)?;
    }
}

parameterised_property_test!(
    component_agreement_rstest,
    run_component_agreement_property,
    "linkage must agree with components"
);

parameterised_property_test!(
    relabel_bound_rstest,
    run_relabel_bound_property,
    "relabelling must stay within N log2 N"
);

parameterised_property_test!(
    centroid_rstest,
    run_centroid_property,
    "centroid must track replayed sizes"
);

parameterised_property_test!(
    determinism_rstest,
    run_determinism_property,
    "repeated runs must agree"
);
