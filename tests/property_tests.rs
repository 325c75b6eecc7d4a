//! Property tests for capture and comparison invariants.

use proptest::prelude::*;
use simd_oracle::element::ulp_distance_f32;
use simd_oracle::{results_equal, Diagnostic, ElementType, ResultsSet};

fn element_type() -> impl Strategy<Value = ElementType> {
    proptest::sample::select(ElementType::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_pushed_record_is_zeroed(ty in element_type(), len in 1usize..64) {
        let mut set = ResultsSet::new("zeroed");
        let record = set.push(ty, len, "prop.rs", 1);
        prop_assert_eq!(record.data().len(), len * ty.size());
        prop_assert!(record.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn prop_sequence_numbers_restart_per_section(
        layout in proptest::collection::vec(0usize..5, 1..6)
    ) {
        let mut set = ResultsSet::new("layout");
        for (i, &count) in layout.iter().enumerate() {
            if i > 0 {
                set.sync_archs();
            }
            for _ in 0..count {
                set.push(ElementType::Uint8, 16, "prop.rs", 1);
            }
        }
        prop_assert_eq!(set.num_sections(), layout.len());
        prop_assert_eq!(set.num_results(), layout.iter().sum::<usize>());
        for section in set.sections() {
            let seqs: Vec<u32> = section.iter().map(|r| r.seq()).collect();
            let expected: Vec<u32> = (1..=section.len() as u32).collect();
            prop_assert_eq!(seqs, expected);
        }
    }

    #[test]
    fn prop_self_comparison_is_clean(
        ints in proptest::collection::vec(any::<i32>(), 1..32),
        floats in proptest::collection::vec(
            any::<f64>().prop_filter("not NaN", |v| !v.is_nan()),
            1..32,
        ),
    ) {
        let mut set = ResultsSet::new("self");
        set.push_values(&ints, "prop.rs", 1);
        set.sync_archs();
        set.push_values(&floats, "prop.rs", 2);

        let mut diags: Vec<Diagnostic> = Vec::new();
        prop_assert!(results_equal(&set, "a", &set, "b", &mut diags));
        prop_assert!(diags.is_empty());
    }

    #[test]
    fn prop_integer_flip_is_reported(
        values in proptest::collection::vec(any::<u16>(), 1..32),
        pick in any::<proptest::sample::Index>(),
        bit in 0u32..16,
    ) {
        let index = pick.index(values.len());
        let mut flipped = values.clone();
        flipped[index] ^= 1 << bit;

        let mut a = ResultsSet::new("flip");
        a.push_values(&values, "prop.rs", 1);
        let mut b = ResultsSet::new("flip");
        b.push_values(&flipped, "prop.rs", 1);

        let mut diags: Vec<Diagnostic> = Vec::new();
        prop_assert!(!results_equal(&a, "a", &b, "b", &mut diags));
        prop_assert_eq!(diags.len(), 1);
    }

    #[test]
    fn prop_ulp_tolerance_is_inclusive(
        value in 1.0e-30f32..1.0e30,
        tolerance in 0u32..64,
    ) {
        let at = f32::from_bits(value.to_bits() + tolerance);
        let past = f32::from_bits(value.to_bits() + tolerance + 1);
        prop_assert_eq!(ulp_distance_f32(value, at), u64::from(tolerance));

        let mut a = ResultsSet::new("ulp");
        a.push_values(&[value], "prop.rs", 1);
        let mut b_at = ResultsSet::new("ulp");
        b_at.set_precision(tolerance);
        b_at.push_values(&[at], "prop.rs", 1);
        let mut b_past = ResultsSet::new("ulp");
        b_past.set_precision(tolerance);
        b_past.push_values(&[past], "prop.rs", 1);

        let mut diags: Vec<Diagnostic> = Vec::new();
        prop_assert!(results_equal(&a, "a", &b_at, "b", &mut diags));
        prop_assert!(!results_equal(&a, "a", &b_past, "b", &mut diags));
    }
}
