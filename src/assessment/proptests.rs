//! Property-based tests for scoring

use super::scorer::count_to_f64;
use super::*;
use proptest::prelude::*;

fn arb_answers() -> impl Strategy<Value = Vec<i64>> {
    proptest::collection::vec(0i64..=4, QUESTION_COUNT)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // With 25 questions the maximum is exactly 100, so percentage == total
    #[test]
    fn prop_percentage_equals_total(answers in arb_answers()) {
        let report = score(&answers).unwrap();
        let total: i64 = answers.iter().sum();

        prop_assert_eq!(i64::from(report.total_score), total);
        prop_assert!((report.percentage - f64::from(report.total_score)).abs() < 1e-9);
        prop_assert_eq!(report.severity_tier, SeverityTier::from_percentage(report.percentage));
    }

    // Category scores stay in range and match the per-category mean
    #[test]
    fn prop_category_scores_in_range(answers in arb_answers()) {
        let report = score(&answers).unwrap();
        prop_assert_eq!(report.category_scores.len(), Category::ALL.len());

        for (category, &value) in &report.category_scores {
            prop_assert!((0.0..=100.0).contains(&value));
            let indices = category.question_indices();
            let sum: i32 = indices.iter().map(|&i| i32::try_from(answers[i]).unwrap()).sum();
            let expected = 100.0 * (f64::from(sum) / count_to_f64(indices.len())) / 4.0;
            prop_assert!((value - expected).abs() < 1e-9);
        }
    }

    // Any length other than 25 is rejected
    #[test]
    fn prop_wrong_length_rejected(answers in proptest::collection::vec(0i64..=4, 0..40)) {
        prop_assume!(answers.len() != QUESTION_COUNT);
        let rejected = matches!(score(&answers), Err(AssessmentError::WrongLength { .. }));
        prop_assert!(rejected, "wrong length accepted: {}", answers.len());
    }

    // A single out-of-range value anywhere is rejected
    #[test]
    fn prop_out_of_range_rejected(
        mut answers in arb_answers(),
        position in 0..QUESTION_COUNT,
        bad in prop_oneof![i64::MIN..0i64, 5i64..i64::MAX],
    ) {
        answers[position] = bad;
        let err = score(&answers).unwrap_err();
        prop_assert_eq!(err, AssessmentError::OutOfRange { question: position, value: bad, max: 4 });
    }

    // Every report lands in exactly one dashboard bucket
    #[test]
    fn prop_buckets_count_every_report(sheets in proptest::collection::vec(arb_answers(), 0..10)) {
        let reports: Vec<_> = sheets.iter().map(|a| score(a).unwrap()).collect();
        let counts = analyze_test_results(&reports);
        prop_assert_eq!(usize::try_from(counts.total()).unwrap(), reports.len());
    }
}
