//! End-to-end scenarios over the public API.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;
use exemplar_core::matchers::{Matcher, MatcherExt, be_greater_than, be_less_than, equal};
use exemplar_core::{
    Evaluated, ExpectationCounter, OutcomeKind, RunOptions, Specification, expect, expect_with,
};
use pretty_assertions::assert_eq;

fn add_one(value: i32) -> i32 {
    value + 1
}

fn single_example_spec<F>(body: F) -> Specification
where
    F: FnMut(&exemplar_core::ExampleContext) -> Result<(), exemplar_core::Error> + 'static,
{
    let mut spec = Specification::new("scenario");
    spec.specify("a calculator").should(|examples| {
        examples.example("add one", body);
    });
    spec
}

fn only_example(spec: &Specification) -> &exemplar_core::Example {
    &spec.systems()[0].examples()[0]
}

#[test]
fn adds_one_passes() {
    let mut spec = single_example_spec(|cx| {
        cx.expect(add_one(0)).must(equal(1));
        Ok(())
    });

    let stats = spec.run(&RunOptions::default());
    assert!(stats.is_success());
    assert!(only_example(&spec).outcomes().is_empty());
}

#[test]
fn adds_one_failure_names_both_values() {
    let mut spec = single_example_spec(|cx| {
        cx.expect(add_one(0)).must(equal(2));
        Ok(())
    });

    let stats = spec.run(&RunOptions::default());
    assert_eq!(stats.failures, 1);

    let outcomes = only_example(&spec).outcomes();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].kind(), OutcomeKind::Failure);
    assert!(outcomes[0].message().contains('1'));
    assert!(outcomes[0].message().contains('2'));
}

#[test]
fn plan_only_never_invokes_bodies() {
    let invoked = Rc::new(Cell::new(false));
    let flag = invoked.clone();
    let mut spec = single_example_spec(move |_| {
        flag.set(true);
        Ok(())
    });

    spec.run(&RunOptions::default().with_plan_only(true));
    assert!(!invoked.get());
    assert!(only_example(&spec).outcomes().is_empty());
}

#[test]
fn unbound_failure_is_returned_to_the_caller() {
    let Evaluated::Failed(failure) = expect(add_one(0)).must(equal(2)) else {
        panic!("1 is not 2");
    };
    assert_eq!(failure.message(), "1 is not equal to 2");
    assert!(failure.expectation().expectable().value().is_ok_and(|v| v == 1));
}

#[test]
fn or_recovers_and_xor_rejects_double_match() {
    assert!(expect(1).must(equal(2)).or(equal(1)).is_passed());
    assert!(expect(1).must(equal(1)).xor(equal(1)).is_failed());
}

#[test]
fn bound_evaluation_records_one_outcome_per_false_verdict() -> Result<()> {
    let values = [0, 1, 2, 3, 4, 5];
    let matchers: Vec<Box<dyn Matcher<i32>>> = vec![
        Box::new(equal(2)),
        Box::new(be_greater_than(2)),
        Box::new(be_less_than(3).negate()),
    ];

    let mut expected_failures = 0;
    for value in values {
        for matcher in &matchers {
            if !matcher.apply(&value, None)?.success {
                expected_failures += 1;
            }
        }
    }

    let mut spec = single_example_spec(move |cx| {
        for value in values {
            for matcher in &matchers {
                cx.expect(value).must(matcher);
            }
        }
        Ok(())
    });

    let stats = spec.run(&RunOptions::default());
    assert_eq!(stats.failures, expected_failures);
    assert_eq!(stats.errors, 0);
    assert_eq!(stats.expectations, 18);
    Ok(())
}

#[test]
fn undecided_regex_match_is_an_error_even_when_negated() -> Result<()> {
    let matcher = exemplar_core::matchers::match_regex(r"^(a|a)*\1b")?;
    let mut spec = single_example_spec(move |cx| {
        cx.expect("a".repeat(40)).not().must(&matcher);
        Ok(())
    });

    let stats = spec.run(&RunOptions::default());
    assert_eq!(stats.executed, 1);
    assert_eq!(stats.expectations, 1);
    assert_eq!(stats.failures, 0);
    assert_eq!(stats.errors, 1);
    Ok(())
}

#[test]
fn listener_counts_real_applications_only() {
    let counter = ExpectationCounter::new();
    let calls = Cell::new(0);

    let evaluated = expect_with(|| {
        calls.set(calls.get() + 1);
        7
    })
    .with_listener(&counter)
    .must(exemplar_core::matchers::always_ok())
    .and(equal(7))
    .and(equal(7).or(equal(8)));

    assert!(evaluated.is_passed());
    assert_eq!(counter.count(), 2);
    assert_eq!(calls.get(), 2);
}

#[test]
fn rerunning_after_reset_starts_clean() -> Result<()> {
    let mut spec = single_example_spec(|cx| {
        cx.expect("abc").must(equal("abd"));
        Ok(())
    });

    let first = spec.run(&RunOptions::default());
    let second = spec.run(&RunOptions::default());
    assert_eq!(first, second);

    spec.reset();
    let third = spec.run(&RunOptions::default());
    assert_eq!(first, third);
    assert_eq!(only_example(&spec).outcomes().len(), 1);

    Ok(())
}
